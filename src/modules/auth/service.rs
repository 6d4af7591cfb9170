//! Session issuance: login, refresh-token rotation and logout.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use scholaris_auth::{AccessClaims, RefreshClaims, SignedClaims, TokenCodec, TokenKind, TokenPair};
use scholaris_cache::RevocationStore;
use scholaris_core::{AuthError, CredentialVerifier};
use scholaris_db::SchoolStore;
use scholaris_models::{Account, Identity};

use crate::metrics::{
    track_login_failure, track_login_success, track_token_revoked, track_tokens_issued,
};

#[derive(Clone)]
pub struct SessionIssuer {
    store: Arc<dyn SchoolStore>,
    codec: Arc<TokenCodec>,
    verifier: Arc<dyn CredentialVerifier>,
    revocations: Arc<dyn RevocationStore>,
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl SessionIssuer {
    pub fn new(
        store: Arc<dyn SchoolStore>,
        codec: Arc<TokenCodec>,
        verifier: Arc<dyn CredentialVerifier>,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        Self {
            store,
            codec,
            verifier,
            revocations,
        }
    }

    /// Authenticates by email and password.
    ///
    /// Unknown email, wrong password and a non-active account all surface as
    /// [`AuthError::InvalidCredentials`]; the real reason is only logged.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Identity, TokenPair), AuthError> {
        let Some(credentials) = self.store.find_credentials_by_email(email).await? else {
            self.verifier.verify_absent(password);
            info!(reason = "unknown_email", "Login rejected");
            track_login_failure("unknown_email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verifier.verify(password, &credentials.password_hash) {
            info!(user_id = %credentials.account.id, reason = "bad_password", "Login rejected");
            track_login_failure("bad_password");
            return Err(AuthError::InvalidCredentials);
        }

        let account = credentials.account;
        if !account.status.is_active() {
            info!(user_id = %account.id, status = %account.status, reason = "inactive", "Login rejected");
            track_login_failure("inactive");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_pair(&account)?;

        if let Err(e) = self.store.record_login(account.id).await {
            warn!(user_id = %account.id, error = %e, "Failed to record last login");
        }

        track_login_success(account.role.as_str());
        info!(user_id = %account.id, role = %account.role, "Login succeeded");

        let mut identity = Identity::from(account);
        identity.last_login = Some(Utc::now());
        Ok((identity, tokens))
    }

    /// Exchanges a refresh token for a brand new pair and revokes the old one.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let verified = self.codec.verify::<RefreshClaims>(refresh_token)?;

        if self.revocations.is_revoked(&verified.claims.jti).await? {
            warn!(user_id = %verified.claims.user_id, "Revoked refresh token presented");
            return Err(AuthError::TokenInvalid);
        }

        let account = self
            .store
            .find_account(verified.claims.user_id)
            .await?
            .filter(|account| account.status.is_active())
            .ok_or(AuthError::AccountInactive)?;

        self.revoke(&verified).await?;
        let tokens = self.issue_pair(&account)?;

        info!(user_id = %account.id, "Refresh token rotated");
        Ok(tokens)
    }

    /// Revokes a refresh token server side. Logging out twice is not an error,
    /// and neither is logging out with a token that has already expired.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let verified = match self.codec.verify::<RefreshClaims>(refresh_token) {
            Ok(verified) => verified,
            Err(AuthError::TokenExpired) => return Ok(()),
            Err(e) => return Err(e),
        };

        self.revoke(&verified).await?;
        info!(user_id = %verified.claims.user_id, "Refresh token revoked");
        Ok(())
    }

    async fn revoke(&self, verified: &SignedClaims<RefreshClaims>) -> Result<(), AuthError> {
        let ttl = self.codec.revocation_ttl(verified, Utc::now().timestamp());
        self.revocations
            .revoke(&verified.claims.jti, ttl)
            .await?;
        track_token_revoked();
        Ok(())
    }

    fn issue_pair(&self, account: &Account) -> Result<TokenPair, AuthError> {
        let access = AccessClaims {
            user_id: account.id,
            email: account.email.clone(),
            user_type: account.role,
            status: account.status,
        };
        let refresh = RefreshClaims::new(account.id, account.role);

        let pair = self.codec.issue_pair(&access, &refresh)?;
        track_tokens_issued(TokenKind::Access);
        track_tokens_issued(TokenKind::Refresh);
        Ok(pair)
    }
}
