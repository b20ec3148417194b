//! `/admin/transactions`

use axum::extract::State;
use common::{
    extract::{JsonBody, PathParam, QueryParams},
    response::Reply,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{StatusUpdateRequest, Transaction, TransactionUpdateRequest},
    query::{ListParams, Page},
};

pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Reply<Page<Transaction>>> {
    let page = state.transaction_repository.list(&params).await?;
    Ok(Reply::ok("List transactions", page))
}

pub async fn get(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Reply<Transaction>> {
    let transaction = state
        .transaction_repository
        .get(id)
        .await
        .map_err(|e| ApiError::entity(e, "Transaction"))?;
    Ok(Reply::ok("Transaction detail", transaction))
}

pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<TransactionUpdateRequest>,
) -> ApiResult<Reply<Transaction>> {
    let update = payload.validate().map_err(ApiError::Validation)?;
    let transaction = state
        .transaction_repository
        .update(id, &update)
        .await
        .map_err(|e| ApiError::entity(e, "Transaction"))?;
    Ok(Reply::ok("Transaction updated", transaction))
}

pub async fn update_status(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<StatusUpdateRequest>,
) -> ApiResult<Reply<Transaction>> {
    let status_id = payload.validate().map_err(ApiError::Validation)?;
    let transaction = state
        .transaction_repository
        .update_status(id, status_id)
        .await
        .map_err(|e| ApiError::entity(e, "Transaction"))?;
    Ok(Reply::ok("Transaction status updated", transaction))
}

pub async fn delete(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Reply<()>> {
    state
        .transaction_repository
        .delete(id)
        .await
        .map_err(|e| ApiError::entity(e, "Transaction"))?;
    Ok(Reply::done("Transaction deleted"))
}
