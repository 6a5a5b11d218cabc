// src/auth.rs
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::core::{CredentialProvider, PortalApi};
use crate::error::{PortalError, PortalResult};
use crate::types::{CandidateDraft, RecruiterLogin, RecruiterRegistration, TokenResponse};

/// Claims the API puts in its tokens. Only read for display; the signature
/// is the server's business.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: Option<Value>,
    pub sub: Option<Value>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Read claims without verifying the signature or expiry.
    pub fn inspect(token: &str) -> PortalResult<Self> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| PortalError::Credentials(format!("Stored token is not a readable JWT: {}", e)))
    }

    /// Subject identity, whichever claim the server used.
    pub fn subject(&self) -> Option<String> {
        self.id
            .as_ref()
            .or(self.sub.as_ref())
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map_or(false, |exp| exp <= now)
    }
}

/// Register/login flows that persist the returned token.
pub struct AuthService {
    api: Arc<dyn PortalApi>,
    credentials: Arc<dyn CredentialProvider>,
}

impl AuthService {
    pub fn new(api: Arc<dyn PortalApi>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { api, credentials }
    }

    pub async fn register_candidate(&self, draft: &CandidateDraft) -> PortalResult<()> {
        draft.validate().map_err(PortalError::Validation)?;
        let response = self.api.register_candidate(draft).await;
        self.persist("candidate registration", response)
    }

    pub async fn register_recruiter(&self, registration: &RecruiterRegistration) -> PortalResult<()> {
        registration.validate().map_err(PortalError::Validation)?;
        let response = self.api.register_recruiter(registration).await;
        self.persist("recruiter registration", response)
    }

    pub async fn login_recruiter(&self, login: &RecruiterLogin) -> PortalResult<()> {
        login.validate().map_err(PortalError::Validation)?;
        let response = self.api.login_recruiter(login).await;
        self.persist("recruiter login", response)
    }

    pub fn logout(&self) -> PortalResult<()> {
        self.credentials.clear()
    }

    /// Claims of the stored token, `None` when logged out.
    pub fn current_claims(&self) -> PortalResult<Option<TokenClaims>> {
        match self.credentials.token()? {
            Some(token) => TokenClaims::inspect(&token).map(Some),
            None => Ok(None),
        }
    }

    fn persist(&self, flow: &str, response: PortalResult<TokenResponse>) -> PortalResult<()> {
        match response {
            Ok(TokenResponse { token }) => {
                self.credentials.store(&token)?;
                info!("{} succeeded, token stored", flow);
                Ok(())
            }
            Err(e) => {
                error!("{} failed: {}", flow, e);
                Err(e)
            }
        }
    }
}
