//! Completion certificates minted through the wallet layer.
//!
//! Records are immutable once created; there is no update or delete
//! surface.

use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use super::StoreError;

#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    pub id: String,
    pub token_id: u64,
    pub course_id: String,
    pub course_title: String,
    pub recipient: String,
    pub issued_at: String,
    pub image_url: String,
    pub tx_hash: String,
}

#[derive(Default)]
pub struct CertificateStore {
    certificates: DashMap<String, Certificate>,
    next_token_id: AtomicU64,
}

impl CertificateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly minted certificate.
    pub fn mint(
        &self,
        course_id: &str,
        course_title: &str,
        recipient: &str,
        tx_hash: &str,
    ) -> Certificate {
        let token_id = self.next_token_id.fetch_add(1, Ordering::Relaxed) + 1;
        let certificate = Certificate {
            id: uuid::Uuid::new_v4().to_string(),
            token_id,
            course_id: course_id.to_string(),
            course_title: course_title.to_string(),
            recipient: recipient.to_string(),
            issued_at: Utc::now().to_rfc3339(),
            image_url: format!("https://certificates.gradxp.io/{}.png", token_id),
            tx_hash: tx_hash.to_string(),
        };
        self.certificates
            .insert(certificate.id.clone(), certificate.clone());
        tracing::info!(token_id, course_id, "Certificate minted");
        certificate
    }

    pub fn get(&self, id: &str) -> Result<Certificate, StoreError> {
        self.certificates
            .get(id)
            .map(|c| c.clone())
            .ok_or_else(|| StoreError::CertificateNotFound(id.to_string()))
    }

    /// Certificates held by a wallet address, oldest first.
    pub fn list_for(&self, recipient: &str) -> Vec<Certificate> {
        let mut list: Vec<Certificate> = self
            .certificates
            .iter()
            .filter(|entry| entry.value().recipient.eq_ignore_ascii_case(recipient))
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by_key(|c| c.token_id);
        list
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}
