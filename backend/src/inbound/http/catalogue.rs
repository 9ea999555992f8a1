//! Tag and ingredient catalogue handlers.
//!
//! ```text
//! GET    /api/tags            GET    /api/ingredients?name=fl
//! POST   /api/tags            POST   /api/ingredients
//! GET    /api/tags/{id}       GET    /api/ingredients/{id}
//! PATCH  /api/tags/{id}       PATCH  /api/ingredients/{id}
//! DELETE /api/tags/{id}       DELETE /api/ingredients/{id}
//! ```
//!
//! Reads are public; writes need a session.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{
    DomainError, IngredientDraft, IngredientFilter, IngredientId, IngredientPatch, TagDraft, TagId,
    TagPatch,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    IngredientPatchRequest, IngredientRequest, IngredientResponse, TagPatchRequest, TagRequest,
    TagResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const ID: FieldName = FieldName::new("id");

/// Case-insensitive name prefix for the ingredient search box.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct IngredientSearchQuery {
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/tags",
    responses((status = 200, description = "Tags ordered by slug", body = [TagResponse])),
    tags = ["catalogue"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.catalogue.list_tags().await?;
    Ok(web::Json(tags.into_iter().map(TagResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = TagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 409, description = "Name, colour or slug taken", body = DomainError)
    ),
    tags = ["catalogue"],
    operation_id = "createTag"
)]
#[post("/tags")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<TagRequest>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let draft = TagDraft::try_from(payload.into_inner())?;
    let tag = state.catalogue.create_tag(draft).await?;
    Ok(HttpResponse::Created().json(TagResponse::from(tag)))
}

#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    params(("id" = String, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 404, description = "Unknown tag", body = DomainError)
    ),
    tags = ["catalogue"],
    operation_id = "getTag",
    security([])
)]
#[get("/tags/{id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TagResponse>> {
    let id: TagId = parse_id(&path, ID)?;
    let tag = state.catalogue.get_tag(&id).await?;
    Ok(web::Json(TagResponse::from(tag)))
}

#[utoipa::path(
    patch,
    path = "/api/tags/{id}",
    params(("id" = String, Path, description = "Tag id")),
    request_body = TagPatchRequest,
    responses(
        (status = 200, description = "Updated tag", body = TagResponse),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "Unknown tag", body = DomainError),
        (status = 409, description = "Name, colour or slug taken", body = DomainError)
    ),
    tags = ["catalogue"],
    operation_id = "updateTag"
)]
#[patch("/tags/{id}")]
pub async fn update_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<TagPatchRequest>,
) -> ApiResult<web::Json<TagResponse>> {
    session.require_user_id()?;
    let id: TagId = parse_id(&path, ID)?;
    let patch = TagPatch::try_from(payload.into_inner())?;
    let tag = state.catalogue.update_tag(&id, patch).await?;
    Ok(web::Json(TagResponse::from(tag)))
}

#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    params(("id" = String, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "Unknown tag", body = DomainError)
    ),
    tags = ["catalogue"],
    operation_id = "deleteTag"
)]
#[delete("/tags/{id}")]
pub async fn delete_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id: TagId = parse_id(&path, ID)?;
    state.catalogue.delete_tag(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    params(IngredientSearchQuery),
    responses((status = 200, description = "Ingredients ordered by name", body = [IngredientResponse])),
    tags = ["catalogue"],
    operation_id = "listIngredients",
    security([])
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    query: web::Query<IngredientSearchQuery>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let filter = IngredientFilter::by_prefix(query.name.as_deref());
    let ingredients = state.catalogue.list_ingredients(&filter).await?;
    Ok(web::Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    request_body = IngredientRequest,
    responses(
        (status = 201, description = "Ingredient created", body = IngredientResponse),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 409, description = "Name and unit already listed", body = DomainError)
    ),
    tags = ["catalogue"],
    operation_id = "createIngredient"
)]
#[post("/ingredients")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<IngredientRequest>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let draft = IngredientDraft::try_from(payload.into_inner())?;
    let ingredient = state.catalogue.create_ingredient(draft).await?;
    Ok(HttpResponse::Created().json(IngredientResponse::from(ingredient)))
}

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    params(("id" = String, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Unknown ingredient", body = DomainError)
    ),
    tags = ["catalogue"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let id: IngredientId = parse_id(&path, ID)?;
    let ingredient = state.catalogue.get_ingredient(&id).await?;
    Ok(web::Json(IngredientResponse::from(ingredient)))
}

#[utoipa::path(
    patch,
    path = "/api/ingredients/{id}",
    params(("id" = String, Path, description = "Ingredient id")),
    request_body = IngredientPatchRequest,
    responses(
        (status = 200, description = "Updated ingredient", body = IngredientResponse),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "Unknown ingredient", body = DomainError),
        (status = 409, description = "Name and unit already listed", body = DomainError)
    ),
    tags = ["catalogue"],
    operation_id = "updateIngredient"
)]
#[patch("/ingredients/{id}")]
pub async fn update_ingredient(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<IngredientPatchRequest>,
) -> ApiResult<web::Json<IngredientResponse>> {
    session.require_user_id()?;
    let id: IngredientId = parse_id(&path, ID)?;
    let patch = IngredientPatch::try_from(payload.into_inner())?;
    let ingredient = state.catalogue.update_ingredient(&id, patch).await?;
    Ok(web::Json(IngredientResponse::from(ingredient)))
}

#[utoipa::path(
    delete,
    path = "/api/ingredients/{id}",
    params(("id" = String, Path, description = "Ingredient id")),
    responses(
        (status = 204, description = "Ingredient deleted"),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "Unknown ingredient", body = DomainError)
    ),
    tags = ["catalogue"],
    operation_id = "deleteIngredient"
)]
#[delete("/ingredients/{id}")]
pub async fn delete_ingredient(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id: IngredientId = parse_id(&path, ID)?;
    state.catalogue.delete_ingredient(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
