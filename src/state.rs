use std::sync::Arc;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusHandle;

use scholaris_auth::TokenCodec;
use scholaris_cache::{CacheConfig, RevocationStore, connect_revocation_store};
use scholaris_config::{CorsConfig, JwtConfig};
use scholaris_core::{BcryptVerifier, CredentialVerifier};
use scholaris_db::{PgStore, SchoolStore, init_db_pool};

use crate::middleware::ownership::OwnershipRegistry;
use crate::modules::auth::service::SessionIssuer;

/// Shared, read-only state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SchoolStore>,
    pub codec: Arc<TokenCodec>,
    pub sessions: SessionIssuer,
    pub ownership: Arc<OwnershipRegistry>,
    pub cors_config: CorsConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wires the components together around an existing store and revocation list.
    pub fn new(
        store: Arc<dyn SchoolStore>,
        jwt_config: &JwtConfig,
        revocations: Arc<dyn RevocationStore>,
        cors_config: CorsConfig,
    ) -> Self {
        Self::with_verifier(
            store,
            jwt_config,
            revocations,
            Arc::new(BcryptVerifier),
            cors_config,
        )
    }

    pub fn with_verifier(
        store: Arc<dyn SchoolStore>,
        jwt_config: &JwtConfig,
        revocations: Arc<dyn RevocationStore>,
        verifier: Arc<dyn CredentialVerifier>,
        cors_config: CorsConfig,
    ) -> Self {
        let codec = Arc::new(TokenCodec::new(jwt_config));
        let sessions = SessionIssuer::new(store.clone(), codec.clone(), verifier, revocations);

        Self {
            store,
            codec,
            sessions,
            ownership: Arc::new(OwnershipRegistry::standard()),
            cors_config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

/// Builds the production state from the environment.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env().context("Invalid JWT configuration")?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&database_url)
        .await
        .context("Failed to connect to database")?;

    let revocations = connect_revocation_store(CacheConfig::from_env())
        .await
        .context("Failed to connect to Redis")?;

    Ok(AppState::new(
        Arc::new(PgStore::new(pool)),
        &jwt_config,
        revocations,
        CorsConfig::from_env(),
    ))
}
