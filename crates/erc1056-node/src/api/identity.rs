//! Read-only identity queries.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use erc1056_ledger::AttributeRecord;
use erc1056_registry::{Address, ChangePointer, LoggedEvent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{parse_address, parse_tag};
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub identity: Address,
    pub owner: Address,
}

#[derive(Debug, Serialize)]
pub struct ChangedResponse {
    pub identity: Address,
    pub changed: ChangePointer,
}

#[derive(Debug, Serialize)]
pub struct DelegateResponse {
    pub valid: bool,
}

#[derive(Debug, Deserialize)]
pub struct AttributesQuery {
    /// Only attributes still valid at the current ledger time
    #[serde(default)]
    pub active: bool,
}

pub async fn get_owner(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
) -> Result<Json<OwnerResponse>, ApiError> {
    let identity = parse_address(&identity)?;
    let owner = state.ledger.current_controller(identity).await?;
    Ok(Json(OwnerResponse { identity, owner }))
}

pub async fn get_changed(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
) -> Result<Json<ChangedResponse>, ApiError> {
    let identity = parse_address(&identity)?;
    let changed = state.ledger.last_change_pointer(identity).await?;
    Ok(Json(ChangedResponse { identity, changed }))
}

pub async fn get_delegate(
    State(state): State<Arc<AppState>>,
    Path((identity, delegate_type, delegate)): Path<(String, String, String)>,
) -> Result<Json<DelegateResponse>, ApiError> {
    let identity = parse_address(&identity)?;
    let delegate_type = parse_tag(&delegate_type)?;
    let delegate = parse_address(&delegate)?;

    let valid = state
        .ledger
        .is_valid_delegate(identity, delegate_type, delegate)
        .await?;
    Ok(Json(DelegateResponse { valid }))
}

/// Events of the identity, newest first
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
) -> Result<Json<Vec<LoggedEvent>>, ApiError> {
    let identity = parse_address(&identity)?;
    let history = state.ledger.journal().history(identity).await?;
    Ok(Json(history))
}

pub async fn get_attributes(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
    Query(query): Query<AttributesQuery>,
) -> Result<Json<Vec<AttributeRecord>>, ApiError> {
    let identity = parse_address(&identity)?;
    let journal = state.ledger.journal();

    let records = if query.active {
        let now = state.ledger.now().await;
        journal.active_attributes(identity, now).await?
    } else {
        journal.attributes(identity).await?
    };
    Ok(Json(records))
}
