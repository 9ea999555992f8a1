//! Users and subscriptions API handlers.
//!
//! ```text
//! GET    /api/users
//! POST   /api/users
//! GET    /api/users/me
//! PATCH  /api/users/me
//! DELETE /api/users/me
//! GET    /api/users/subscriptions?recipes_limit=3
//! GET    /api/users/{id}
//! POST   /api/users/{id}/subscribe?recipes_limit=3
//! DELETE /api/users/{id}/subscribe
//! ```
//!
//! The literal `me` and `subscriptions` routes must be registered before
//! `/users/{id}`.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{DomainError, UserId, UserPatch, UserRegistration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    CreateUserRequest, SubscriptionResponse, UpdateUserRequest, UserResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_limit};

const USER_ID: FieldName = FieldName::new("id");
const RECIPES_LIMIT: FieldName = FieldName::new("recipes_limit");

/// Optional cap on the recipes embedded in each subscription.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RecipesLimitQuery {
    /// Non-negative; omitted means no cap.
    #[param(value_type = Option<u32>)]
    pub recipes_limit: Option<String>,
}

impl RecipesLimitQuery {
    fn limit(&self) -> Result<Option<usize>, DomainError> {
        parse_limit(self.recipes_limit.as_deref(), RECIPES_LIMIT)
    }
}

/// List every user, flagging the ones the caller follows.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users ordered by username", body = [UserResponse]),
        (status = 503, description = "Storage unavailable", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let viewer = session.user_id()?;
    let users = state.users.list(viewer.as_ref()).await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 409, description = "Email or username taken", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let registration = UserRegistration::try_from(payload.into_inner())?;
    let user = state.users.register(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// The authenticated caller.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state.users.me(&user_id).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Update some of the caller's profile fields.
#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 409, description = "Email or username taken", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[patch("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let patch = UserPatch::try_from(payload.into_inner())?;
    let user = state.users.update_me(&user_id, patch).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Delete the caller's account together with their recipes.
#[utoipa::path(
    delete,
    path = "/api/users/me",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorised", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "deleteCurrentUser"
)]
#[delete("/users/me")]
pub async fn delete_current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.users.delete_me(&user_id).await?;
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

/// Authors the caller follows, oldest subscription first.
#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    params(RecipesLimitQuery),
    responses(
        (status = 200, description = "Followed authors", body = [SubscriptionResponse]),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "listSubscriptions"
)]
#[get("/users/subscriptions")]
pub async fn list_subscriptions(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RecipesLimitQuery>,
) -> ApiResult<web::Json<Vec<SubscriptionResponse>>> {
    let user_id = session.require_user_id()?;
    let summaries = state.users.subscriptions(&user_id, query.limit()?).await?;
    Ok(web::Json(
        summaries.into_iter().map(SubscriptionResponse::from).collect(),
    ))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed id", body = DomainError),
        (status = 404, description = "Unknown user", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id: UserId = parse_id(&path, USER_ID)?;
    let viewer = session.user_id()?;
    let profile = state.users.get(viewer.as_ref(), &id).await?;
    Ok(web::Json(UserResponse::from(profile)))
}

/// Follow an author.
#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    params(("id" = String, Path, description = "Author id"), RecipesLimitQuery),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Self-subscription or malformed id", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "Unknown author", body = DomainError),
        (status = 409, description = "Already subscribed", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "subscribe"
)]
#[post("/users/{id}/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<RecipesLimitQuery>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let author: UserId = parse_id(&path, USER_ID)?;
    let summary = state
        .users
        .subscribe(&follower, &author, query.limit()?)
        .await?;
    Ok(HttpResponse::Created().json(SubscriptionResponse::from(summary)))
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    params(("id" = String, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "Not subscribed", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "unsubscribe"
)]
#[delete("/users/{id}/subscribe")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let author: UserId = parse_id(&path, USER_ID)?;
    state.users.unsubscribe(&follower, &author).await?;
    Ok(HttpResponse::NoContent().finish())
}
