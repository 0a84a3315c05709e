use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::auth::CurrentUser;
use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_amount, validate_chain_id, validate_pool_id, validate_score};
use crate::chain::ContractCall;
use crate::store::{TxRecord, WalletSnapshot};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SwitchNetworkRequest {
    pub chain_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct InvestRequest {
    pub pool_id: String,
    pub amount_eth: f64,
}

#[derive(Debug, Deserialize)]
pub struct YieldRequest {
    pub pool_id: String,
}

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    pub course_id: String,
    pub score: u32,
}

#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub course_id: String,
}

/// Current wallet state
///
/// GET /api/wallet
pub async fn get_wallet(State(state): State<Arc<AppState>>) -> Json<WalletSnapshot> {
    Json(state.wallet.snapshot())
}

/// Connect the wallet and record the address on the user's profile
///
/// POST /api/wallet/connect
pub async fn connect(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<WalletSnapshot>, ApiError> {
    let snapshot = state.wallet.connect().await?;
    if let Some(address) = &snapshot.address {
        // The synthetic admin-token user is not in the registry
        if state.users.get(&user.id).is_some() {
            state
                .users
                .set_wallet_address(&user.id, Some(address.clone()))?;
        }
        info!(address = %address, "Wallet connected");
    }
    Ok(Json(snapshot))
}

/// Disconnect the wallet
///
/// POST /api/wallet/disconnect
pub async fn disconnect(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WalletSnapshot>, ApiError> {
    Ok(Json(state.wallet.disconnect()?))
}

/// Switch networks
///
/// POST /api/wallet/network
pub async fn switch_network(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SwitchNetworkRequest>,
) -> Result<Json<WalletSnapshot>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_chain_id(request.chain_id) {
        errors.add("chain_id", e);
    }
    errors.finish()?;

    Ok(Json(state.wallet.switch_network(request.chain_id).await?))
}

/// Transaction history, newest first
///
/// GET /api/wallet/transactions
pub async fn transactions(State(state): State<Arc<AppState>>) -> Json<Vec<TxRecord>> {
    Json(state.wallet.transactions())
}

/// Invest in a pool
///
/// POST /api/wallet/invest
pub async fn invest(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InvestRequest>,
) -> Result<Json<TxRecord>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_pool_id(&request.pool_id) {
        errors.add("pool_id", e);
    }
    if let Err(e) = validate_amount(request.amount_eth) {
        errors.add("amount_eth", e);
    }
    errors.finish()?;

    let record = state
        .wallet
        .submit(ContractCall::Invest {
            pool_id: request.pool_id,
            amount_eth: request.amount_eth,
        })
        .await?;
    Ok(Json(record))
}

/// Trigger yield generation for a pool
///
/// POST /api/wallet/yield
pub async fn generate_yield(
    State(state): State<Arc<AppState>>,
    Json(request): Json<YieldRequest>,
) -> Result<Json<TxRecord>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_pool_id(&request.pool_id) {
        errors.add("pool_id", e);
    }
    errors.finish()?;

    let record = state
        .wallet
        .submit(ContractCall::GenerateYield {
            pool_id: request.pool_id,
        })
        .await?;
    Ok(Json(record))
}

/// Submit a quiz result on-chain
///
/// POST /api/wallet/quiz
pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuizRequest>,
) -> Result<Json<TxRecord>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_score(request.score) {
        errors.add("score", e);
    }
    errors.finish()?;

    if state.catalog.get(&request.course_id).is_none() {
        return Err(ApiError::not_found(format!(
            "Course '{}' not found",
            request.course_id
        )));
    }

    let record = state
        .wallet
        .submit(ContractCall::SubmitQuiz {
            course_id: request.course_id,
            score: request.score,
        })
        .await?;
    Ok(Json(record))
}

/// Claim a course reward on-chain
///
/// POST /api/wallet/claim
pub async fn claim_reward(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClaimRequest>,
) -> Result<Json<TxRecord>, ApiError> {
    if state.catalog.get(&request.course_id).is_none() {
        return Err(ApiError::not_found(format!(
            "Course '{}' not found",
            request.course_id
        )));
    }

    let record = state
        .wallet
        .submit(ContractCall::ClaimReward {
            course_id: request.course_id,
        })
        .await?;
    Ok(Json(record))
}
