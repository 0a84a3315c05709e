use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::auth::CurrentUser;
use super::error::ApiError;
use crate::chain::ContractCall;
use crate::store::{Certificate, StoreError, TxRecord};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MintRequest {
    pub course_id: String,
}

#[derive(Debug, Serialize)]
pub struct MintResponse {
    pub certificate: Certificate,
    pub transaction: TxRecord,
}

/// Mint a completion certificate to the connected wallet
///
/// POST /api/certificates/mint
pub async fn mint(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<MintRequest>,
) -> Result<(StatusCode, Json<MintResponse>), ApiError> {
    let course = state
        .catalog
        .get(&request.course_id)
        .ok_or_else(|| ApiError::not_found(format!("Course '{}' not found", request.course_id)))?;

    let recipient = state
        .wallet
        .snapshot()
        .address
        .ok_or(StoreError::WalletNotConnected)?;

    let transaction = state
        .wallet
        .submit(ContractCall::MintCertificate {
            course_id: course.id.clone(),
            recipient: recipient.clone(),
        })
        .await?;

    let tx_hash = transaction.hash.clone().unwrap_or_default();
    let certificate = state
        .certificates
        .mint(&course.id, &course.title, &recipient, &tx_hash);

    info!(course = %course.slug, recipient = %recipient, "Certificate minted");
    Ok((
        StatusCode::CREATED,
        Json(MintResponse {
            certificate,
            transaction,
        }),
    ))
}

/// Certificates held by the current wallet (or the user's recorded address)
///
/// GET /api/certificates
pub async fn list_certificates(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Json<Vec<Certificate>> {
    let recipient = state.wallet.snapshot().address.or(user.wallet_address);
    let certificates = match recipient {
        Some(address) => state.certificates.list_for(&address),
        None => Vec::new(),
    };
    Json(certificates)
}

/// Fetch one certificate
///
/// GET /api/certificates/:id
pub async fn get_certificate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Certificate>, ApiError> {
    Ok(Json(state.certificates.get(&id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorCode;
    use crate::api::wallet::connect;
    use crate::chain::DEMO_ADDRESS;
    use crate::config::Config;
    use crate::store::Documents;

    fn test_state() -> (Arc<AppState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let docs = Documents::open(dir.path()).unwrap();
        let mut config = Config::default();
        config.chain.connect_delay_ms = 0;
        config.chain.call_delay_ms = 0;
        (Arc::new(AppState::with_documents(config, docs)), dir)
    }

    fn jane(state: &AppState) -> CurrentUser {
        let (user, _) = state.users.sign_up("Jane", "jane@test.com", "pw").unwrap();
        CurrentUser(user)
    }

    #[tokio::test]
    async fn test_mint_requires_connected_wallet() {
        let (state, _dir) = test_state();
        let err = mint(
            State(state.clone()),
            jane(&state),
            Json(MintRequest {
                course_id: "1".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn test_mint_then_list_roundtrip() {
        let (state, _dir) = test_state();
        let who = jane(&state);
        connect(State(state.clone()), who).await.unwrap();

        let jane_again = CurrentUser(state.users.get_by_email("jane@test.com").unwrap());
        let (status, Json(response)) = mint(
            State(state.clone()),
            jane_again,
            Json(MintRequest {
                course_id: "1".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.certificate.recipient, DEMO_ADDRESS);
        assert_eq!(response.certificate.course_title, "Blockchain Fundamentals");
        assert_eq!(
            response.certificate.tx_hash,
            response.transaction.hash.clone().unwrap()
        );

        let jane_again = CurrentUser(state.users.get_by_email("jane@test.com").unwrap());
        let Json(list) = list_certificates(State(state.clone()), jane_again).await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, response.certificate.id);
    }

    #[tokio::test]
    async fn test_mint_unknown_course_not_found() {
        let (state, _dir) = test_state();
        let err = mint(
            State(state.clone()),
            jane(&state),
            Json(MintRequest {
                course_id: "404".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_get_unknown_certificate_not_found() {
        let (state, _dir) = test_state();
        let err = get_certificate(State(state), Path("nope".into()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
