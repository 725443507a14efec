use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::{
    auth::CurrentUser,
    error::ApiError,
    models::{AddAssetReq, AddContractReq, SendReq, SendResp, StatusResp, WalletSnapshot},
    state::AppState,
    store::StoreError,
    utils::{now_ms, parse_amount, wallet_address},
};

pub async fn get_state(State(st): State<Arc<AppState>>) -> Json<WalletSnapshot> {
    Json(st.store.snapshot().await)
}

pub async fn send(
    State(st): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<SendReq>, JsonRejection>,
) -> Result<Json<SendResp>, ApiError> {
    let Json(req) = body?;
    let amount = parse_amount(&req.amount).ok_or(StoreError::InvalidTransfer)?;

    let tx = st
        .store
        .record_transfer(&req.to, &req.asset, amount, wallet_address(&user.0), now_ms())
        .await?;
    tracing::info!(id = %tx.id, coin = %tx.coin, amount = tx.amount, to = %tx.to, "transfer recorded");

    Ok(Json(SendResp { status: "success", tx }))
}

pub async fn add_contract(
    State(st): State<Arc<AppState>>,
    body: Result<Json<AddContractReq>, JsonRejection>,
) -> Result<Json<StatusResp>, ApiError> {
    let Json(req) = body?;
    let entry = st
        .store
        .add_watch(&req.address, req.label.as_deref(), now_ms())
        .await?;
    tracing::info!(address = %entry.address, label = %entry.label, "watchlist entry added");
    Ok(Json(StatusResp::success()))
}

pub async fn remove_contract(
    State(st): State<Arc<AppState>>,
    Path(addr): Path<String>,
) -> Json<StatusResp> {
    let removed = st.store.remove_watch(&addr).await;
    tracing::info!(address = %addr, removed, "watchlist entries removed");
    Json(StatusResp::success())
}

pub async fn add_asset(
    State(st): State<Arc<AppState>>,
    body: Result<Json<AddAssetReq>, JsonRejection>,
) -> Result<Json<StatusResp>, ApiError> {
    let Json(req) = body?;
    let amount = parse_amount(&req.amount).ok_or(StoreError::InvalidHolding)?;
    let holding = st.store.add_holding(&req.symbol, amount).await?;
    tracing::info!(symbol = %holding.symbol, amount = holding.amount, "holding added");
    Ok(Json(StatusResp::success()))
}
