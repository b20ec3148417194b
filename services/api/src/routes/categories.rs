//! `/admin/categories`

use axum::extract::State;
use common::{
    extract::{JsonBody, PathParam, QueryParams},
    response::Reply,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{Category, CategoryRequest},
    query::{ListParams, Page},
};

pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Reply<Page<Category>>> {
    let page = state.category_repository.list(&params).await?;
    Ok(Reply::ok("List categories", page))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CategoryRequest>,
) -> ApiResult<Reply<Category>> {
    let name = payload.validate().map_err(ApiError::Validation)?;
    let category = state.category_repository.create(&name).await?;
    Ok(Reply::created("Category created", category))
}

pub async fn get(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Reply<Category>> {
    let category = state
        .category_repository
        .get(id)
        .await
        .map_err(|e| ApiError::entity(e, "Category"))?;
    Ok(Reply::ok("Category detail", category))
}

pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<CategoryRequest>,
) -> ApiResult<Reply<Category>> {
    let name = payload.validate().map_err(ApiError::Validation)?;
    let category = state
        .category_repository
        .update(id, &name)
        .await
        .map_err(|e| ApiError::entity(e, "Category"))?;
    Ok(Reply::ok("Category updated", category))
}

pub async fn delete(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Reply<()>> {
    state
        .category_repository
        .delete(id)
        .await
        .map_err(|e| ApiError::entity(e, "Category"))?;
    Ok(Reply::done("Category deleted"))
}
