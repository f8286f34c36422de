//! Relayed meta-transactions.
//!
//! The node cannot authenticate a direct sender, so every mutation here
//! carries the controller's signature and is submitted with the configured
//! relayer as sender.

use axum::{
    extract::{Path, State},
    response::Json,
};
use erc1056_registry::{signing_digest, Action, ChangePointer, LoggedEvent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{parse_address, parse_signature, parse_tag, parse_value};
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct DigestResponse {
    pub nonce: ChangePointer,
    /// `0x` hex digest the controller must sign
    pub digest: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeOwnerSignedRequest {
    pub signature: String, // hex r ‖ s ‖ v
    pub new_owner: String,
}

#[derive(Debug, Deserialize)]
pub struct AddDelegateSignedRequest {
    pub signature: String,
    pub delegate_type: String,
    pub delegate: String,
    pub validity: u64,
}

#[derive(Debug, Deserialize)]
pub struct RevokeDelegateSignedRequest {
    pub signature: String,
    pub delegate_type: String,
    pub delegate: String,
}

#[derive(Debug, Deserialize)]
pub struct SetAttributeSignedRequest {
    pub signature: String,
    pub name: String,
    pub value: String, // hex
    pub validity: u64,
}

#[derive(Debug, Deserialize)]
pub struct RevokeAttributeSignedRequest {
    pub signature: String,
    pub name: String,
    pub value: String, // hex
}

/// Digest to sign for `action` at the identity's current nonce
pub async fn get_digest(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
    Json(action): Json<Action>,
) -> Result<Json<DigestResponse>, ApiError> {
    let identity = parse_address(&identity)?;
    let nonce = state.ledger.last_change_pointer(identity).await?;
    let digest = signing_digest(&state.ledger.registry_address(), nonce, &action);

    Ok(Json(DigestResponse {
        nonce,
        digest: format!("0x{}", hex::encode(digest)),
    }))
}

pub async fn change_owner_signed(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
    Json(req): Json<ChangeOwnerSignedRequest>,
) -> Result<Json<LoggedEvent>, ApiError> {
    let identity = parse_address(&identity)?;
    let signature = parse_signature(&req.signature)?;
    let new_owner = parse_address(&req.new_owner)?;

    let logged = state
        .ledger
        .change_owner_signed(state.config.relayer_address, identity, &signature, new_owner)
        .await?;
    Ok(Json(logged))
}

pub async fn add_delegate_signed(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
    Json(req): Json<AddDelegateSignedRequest>,
) -> Result<Json<LoggedEvent>, ApiError> {
    let identity = parse_address(&identity)?;
    let signature = parse_signature(&req.signature)?;
    let delegate_type = parse_tag(&req.delegate_type)?;
    let delegate = parse_address(&req.delegate)?;

    let logged = state
        .ledger
        .add_delegate_signed(
            state.config.relayer_address,
            identity,
            &signature,
            delegate_type,
            delegate,
            req.validity,
        )
        .await?;
    Ok(Json(logged))
}

pub async fn revoke_delegate_signed(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
    Json(req): Json<RevokeDelegateSignedRequest>,
) -> Result<Json<LoggedEvent>, ApiError> {
    let identity = parse_address(&identity)?;
    let signature = parse_signature(&req.signature)?;
    let delegate_type = parse_tag(&req.delegate_type)?;
    let delegate = parse_address(&req.delegate)?;

    let logged = state
        .ledger
        .revoke_delegate_signed(
            state.config.relayer_address,
            identity,
            &signature,
            delegate_type,
            delegate,
        )
        .await?;
    Ok(Json(logged))
}

pub async fn set_attribute_signed(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
    Json(req): Json<SetAttributeSignedRequest>,
) -> Result<Json<LoggedEvent>, ApiError> {
    let identity = parse_address(&identity)?;
    let signature = parse_signature(&req.signature)?;
    let name = parse_tag(&req.name)?;
    let value = parse_value(&req.value)?;

    let logged = state
        .ledger
        .set_attribute_signed(
            state.config.relayer_address,
            identity,
            &signature,
            name,
            value,
            req.validity,
        )
        .await?;
    Ok(Json(logged))
}

pub async fn revoke_attribute_signed(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
    Json(req): Json<RevokeAttributeSignedRequest>,
) -> Result<Json<LoggedEvent>, ApiError> {
    let identity = parse_address(&identity)?;
    let signature = parse_signature(&req.signature)?;
    let name = parse_tag(&req.name)?;
    let value = parse_value(&req.value)?;

    let logged = state
        .ledger
        .revoke_attribute_signed(state.config.relayer_address, identity, &signature, name, value)
        .await?;
    Ok(Json(logged))
}
