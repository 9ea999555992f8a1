//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`api_routes`] registers every handler below; the server mounts it under
//! `/api` behind the session middleware.

use actix_web::web;

pub mod auth;
pub mod catalogue;
pub mod error;
pub mod health;
pub mod recipes;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register the REST API.
///
/// Literal segments are registered ahead of the `{id}` routes that would
/// otherwise capture them (`/users/me`, `/recipes/download_shopping_cart`).
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use foodgram::inbound::http::api_routes;
///
/// let app = App::new().service(web::scope("/api").configure(api_routes));
/// ```
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    error::configure_extractors(cfg);
    cfg.service(auth::login)
        .service(auth::logout)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::current_user)
        .service(users::update_current_user)
        .service(users::delete_current_user)
        .service(users::list_subscriptions)
        .service(users::get_user)
        .service(users::subscribe)
        .service(users::unsubscribe)
        .service(catalogue::list_tags)
        .service(catalogue::create_tag)
        .service(catalogue::get_tag)
        .service(catalogue::update_tag)
        .service(catalogue::delete_tag)
        .service(catalogue::list_ingredients)
        .service(catalogue::create_ingredient)
        .service(catalogue::get_ingredient)
        .service(catalogue::update_ingredient)
        .service(catalogue::delete_ingredient)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::download_shopping_cart)
        .service(recipes::get_recipe)
        .service(recipes::replace_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(recipes::add_favorite)
        .service(recipes::remove_favorite)
        .service(recipes::add_to_shopping_cart)
        .service(recipes::remove_from_shopping_cart);
}
