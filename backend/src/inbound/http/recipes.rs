//! Recipe, favourites and shopping cart handlers.
//!
//! ```text
//! GET    /api/recipes?author=…&tags=lunch&tags=dinner&is_favorited=1
//! POST   /api/recipes
//! GET    /api/recipes/download_shopping_cart
//! GET    /api/recipes/{id}
//! PUT    /api/recipes/{id}
//! PATCH  /api/recipes/{id}
//! DELETE /api/recipes/{id}
//! POST   /api/recipes/{id}/favorite       DELETE /api/recipes/{id}/favorite
//! POST   /api/recipes/{id}/shopping_cart  DELETE /api/recipes/{id}/shopping_cart
//! ```

use actix_web::http::header::{ContentDisposition, ContentType};
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use tracing::debug;

use crate::domain::ports::RecipeCollection;
use crate::domain::{DomainError, RecipeDraft, RecipeId, RecipePatch, SHOPPING_LIST_FILENAME};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    RecipePatchRequest, RecipeRequest, RecipeResponse, ShortRecipeResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_recipe_query};

const RECIPE_ID: FieldName = FieldName::new("id");

fn recipe_id(path: &str) -> Result<RecipeId, DomainError> {
    parse_id(path, RECIPE_ID)
}

/// Browse recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/recipes",
    params(
        ("author" = Option<String>, Query, description = "Author id"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs; any match", explode = true),
        ("is_favorited" = Option<u8>, Query, description = "1 to list the caller's favourites"),
        ("is_in_shopping_cart" = Option<u8>, Query, description = "1 to list the caller's cart")
    ),
    responses(
        (status = 200, description = "Recipes", body = [RecipeResponse]),
        (status = 400, description = "Invalid filter", body = DomainError)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security([])
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let query = parse_recipe_query(req.query_string())?;
    let viewer = session.user_id()?;
    let views = state.recipes.list(viewer.as_ref(), query).await?;
    Ok(web::Json(views.into_iter().map(RecipeResponse::from).collect()))
}

/// Publish a recipe as the caller.
#[utoipa::path(
    post,
    path = "/api/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request or unknown tag/ingredient", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let draft = RecipeDraft::try_from(payload.into_inner())?;
    let view = state.recipes.create(&author, draft).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(view)))
}

/// Download the caller's aggregated shopping list as a text attachment.
#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    responses(
        (status = 200, description = "Shopping list", content_type = "text/plain", body = String,
            headers(("Content-Disposition" = String, description = "attachment; filename=\"shopping_list.txt\""))),
        (status = 401, description = "Unauthorised", body = DomainError)
    ),
    tags = ["recipes"],
    operation_id = "downloadShoppingCart"
)]
#[get("/recipes/download_shopping_cart")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let list = state.recipes.shopping_list(&user_id).await?;
    debug!(%user_id, lines = list.items().len(), "shopping list rendered");
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .insert_header(ContentDisposition::attachment(SHOPPING_LIST_FILENAME))
        .body(list.render()))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 400, description = "Malformed id", body = DomainError),
        (status = 404, description = "Unknown recipe", body = DomainError)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security([])
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let id = recipe_id(&path)?;
    let viewer = session.user_id()?;
    let view = state.recipes.get(viewer.as_ref(), &id).await?;
    Ok(web::Json(RecipeResponse::from(view)))
}

/// Replace every writable field; author only.
#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 403, description = "Not the author", body = DomainError),
        (status = 404, description = "Unknown recipe", body = DomainError)
    ),
    tags = ["recipes"],
    operation_id = "replaceRecipe"
)]
#[put("/recipes/{id}")]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let caller = session.require_user_id()?;
    let id = recipe_id(&path)?;
    let draft = RecipeDraft::try_from(payload.into_inner())?;
    let view = state.recipes.replace(&caller, &id, draft).await?;
    Ok(web::Json(RecipeResponse::from(view)))
}

/// Update the supplied fields; author only.
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipePatchRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 403, description = "Not the author", body = DomainError),
        (status = 404, description = "Unknown recipe", body = DomainError)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecipePatchRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let caller = session.require_user_id()?;
    let id = recipe_id(&path)?;
    let patch = RecipePatch::from(payload.into_inner());
    let view = state.recipes.patch(&caller, &id, patch).await?;
    Ok(web::Json(RecipeResponse::from(view)))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 403, description = "Not the author", body = DomainError),
        (status = 404, description = "Unknown recipe", body = DomainError)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let id = recipe_id(&path)?;
    state.recipes.delete(&caller, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn add_to_collection(
    state: &HttpState,
    session: &SessionContext,
    collection: RecipeCollection,
    path: &str,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = recipe_id(path)?;
    let summary = state.recipes.add_to(collection, &user_id, &id).await?;
    Ok(HttpResponse::Created().json(ShortRecipeResponse::from(summary)))
}

async fn remove_from_collection(
    state: &HttpState,
    session: &SessionContext,
    collection: RecipeCollection,
    path: &str,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = recipe_id(path)?;
    state.recipes.remove_from(collection, &user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Favourited", body = ShortRecipeResponse),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "Unknown recipe", body = DomainError),
        (status = 409, description = "Already favourited", body = DomainError)
    ),
    tags = ["recipes"],
    operation_id = "addFavorite"
)]
#[post("/recipes/{id}/favorite")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    add_to_collection(&state, &session, RecipeCollection::Favorites, &path).await
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from favourites"),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "Not a favourite", body = DomainError)
    ),
    tags = ["recipes"],
    operation_id = "removeFavorite"
)]
#[delete("/recipes/{id}/favorite")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove_from_collection(&state, &session, RecipeCollection::Favorites, &path).await
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added to the cart", body = ShortRecipeResponse),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "Unknown recipe", body = DomainError),
        (status = 409, description = "Already in the cart", body = DomainError)
    ),
    tags = ["recipes"],
    operation_id = "addToShoppingCart"
)]
#[post("/recipes/{id}/shopping_cart")]
pub async fn add_to_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    add_to_collection(&state, &session, RecipeCollection::ShoppingCart, &path).await
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from the cart"),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "Not in the cart", body = DomainError)
    ),
    tags = ["recipes"],
    operation_id = "removeFromShoppingCart"
)]
#[delete("/recipes/{id}/shopping_cart")]
pub async fn remove_from_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove_from_collection(&state, &session, RecipeCollection::ShoppingCart, &path).await
}
