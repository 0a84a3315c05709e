pub mod api;
pub mod chain;
pub mod config;
pub mod store;

use anyhow::Result;
use std::sync::Arc;

use chain::ChainClient;
use config::Config;
use store::{
    CertificateStore, CourseCatalog, Documents, EnrollmentStore, UserStore, WalletSimulator,
};

/// Shared application state.
///
/// Constructed explicitly at startup (or per test) and dropped at shutdown;
/// nothing in the crate holds module-global state.
pub struct AppState {
    pub config: Config,
    pub users: UserStore,
    pub catalog: CourseCatalog,
    pub enrollments: EnrollmentStore,
    pub certificates: CertificateStore,
    pub wallet: WalletSimulator,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let docs = Documents::open(&config.server.data_dir)?;
        Ok(Self::with_documents(config, docs))
    }

    /// Build state over an explicit document store. Tests use this with a
    /// temporary directory.
    pub fn with_documents(config: Config, docs: Documents) -> Self {
        let chain = Arc::new(ChainClient::from_config(&config.chain));
        let users = UserStore::load(docs.clone(), config.auth.session_days);
        let wallet = WalletSimulator::new(docs, chain, &config.chain);
        Self {
            config,
            users,
            catalog: CourseCatalog::with_seed(),
            enrollments: EnrollmentStore::new(),
            certificates: CertificateStore::new(),
            wallet,
        }
    }
}
