//! Reference data for the admin forms

use axum::extract::State;
use common::response::Reply;

use crate::{
    AppState,
    error::ApiResult,
    models::{LookupItem, Size},
    repositories::LookupTable,
};

pub async fn sizes(State(state): State<AppState>) -> ApiResult<Reply<Vec<Size>>> {
    let sizes = state.lookup_repository.sizes().await?;
    Ok(Reply::ok("List sizes", sizes))
}

async fn names(state: &AppState, table: LookupTable, message: &str) -> ApiResult<Reply<Vec<LookupItem>>> {
    let items = state.lookup_repository.list(table).await?;
    Ok(Reply::ok(message, items))
}

pub async fn variants(State(state): State<AppState>) -> ApiResult<Reply<Vec<LookupItem>>> {
    names(&state, LookupTable::Variants, "List variants").await
}

pub async fn transaction_statuses(
    State(state): State<AppState>,
) -> ApiResult<Reply<Vec<LookupItem>>> {
    names(&state, LookupTable::TransactionStatuses, "List transaction statuses").await
}

pub async fn payment_methods(State(state): State<AppState>) -> ApiResult<Reply<Vec<LookupItem>>> {
    names(&state, LookupTable::PaymentMethods, "List payment methods").await
}

pub async fn shipping_methods(State(state): State<AppState>) -> ApiResult<Reply<Vec<LookupItem>>> {
    names(&state, LookupTable::ShippingMethods, "List shipping methods").await
}
