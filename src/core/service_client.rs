// src/core/service_client.rs
//! HTTP client for the job-portal API - JSON bodies, bearer-token auth

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace};

use crate::core::api::PortalApi;
use crate::core::credentials::CredentialProvider;
use crate::error::{PortalError, PortalResult};
use crate::types::{
    Application, ApplyRequest, Candidate, CandidateDraft, CandidateUpdate, ProfileUpdate,
    RecruiterLogin, RecruiterRegistration, Requirement, RequirementDraft, TokenResponse,
};

const CANDIDATE_REGISTER_ENDPOINT: &str = "/api/auth/candidate/register";
const RECRUITER_REGISTER_ENDPOINT: &str = "/api/auth/recruiter/register";
const RECRUITER_LOGIN_ENDPOINT: &str = "/api/auth/recruiter/login";
const CANDIDATES_ENDPOINT: &str = "/candidates";
const CANDIDATE_ENDPOINT: &str = "/api/candidates";
const PROFILE_ENDPOINT: &str = "/api/candidates/profile";
const REQUIREMENTS_ENDPOINT: &str = "/requirements";
const ALL_APPLICATIONS_ENDPOINT: &str = "/api/all-applications";
const MY_APPLICATIONS_ENDPOINT: &str = "/api/my-applications";
const APPLY_ENDPOINT: &str = "/api/apply";

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ServiceClient {
    /// Create a client. `timeout` of `None` leaves requests unbounded.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> PortalResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Request with the stored bearer token. Fails with `MissingToken`
    /// before any I/O when nothing is stored.
    pub fn authorized(&self, method: Method, endpoint: &str) -> PortalResult<RequestBuilder> {
        let token = self.credentials.token()?.ok_or(PortalError::MissingToken)?;
        Ok(self
            .client
            .request(method, self.url(endpoint))
            .bearer_auth(token))
    }

    /// Request that carries the token only when one is stored.
    pub fn optionally_authorized(
        &self,
        method: Method,
        endpoint: &str,
    ) -> PortalResult<RequestBuilder> {
        let builder = self.client.request(method, self.url(endpoint));
        Ok(match self.credentials.token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> PortalResult<reqwest::Response> {
        let response = builder.send().await.map_err(|e| {
            error!("Request to {} failed: {}", endpoint, e);
            PortalError::Transport(e)
        })?;

        let status = response.status();
        trace!("Response status for {}: {}", endpoint, status);

        if status.is_success() {
            Ok(response)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("API error from {} ({}): {}", endpoint, status, error_text);
            Err(PortalError::from_response(status, &error_text))
        }
    }

    async fn decode<R>(&self, response: reqwest::Response, endpoint: &str) -> PortalResult<R>
    where
        R: DeserializeOwned,
    {
        let response_text = response.text().await?;
        debug!("Raw response from {}: {}", endpoint, response_text);

        serde_json::from_str::<R>(&response_text).map_err(|e| {
            error!("Failed to parse response from {}: {}", endpoint, e);
            PortalError::Decode {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Authenticated GET returning JSON
    pub async fn get<R>(&self, endpoint: &str) -> PortalResult<R>
    where
        R: DeserializeOwned,
    {
        info!("GET {}", self.url(endpoint));
        let response = self
            .send(self.authorized(Method::GET, endpoint)?, endpoint)
            .await?;
        self.decode(response, endpoint).await
    }

    /// Authenticated write with a JSON body; the response body is ignored.
    pub async fn write_json<T>(&self, method: Method, endpoint: &str, payload: &T) -> PortalResult<()>
    where
        T: Serialize + ?Sized,
    {
        info!("{} {}", method, self.url(endpoint));
        let builder = self.authorized(method, endpoint)?.json(payload);
        self.send(builder, endpoint).await?;
        Ok(())
    }

    /// Authenticated DELETE
    pub async fn delete(&self, endpoint: &str) -> PortalResult<()> {
        info!("DELETE {}", self.url(endpoint));
        self.send(self.authorized(Method::DELETE, endpoint)?, endpoint)
            .await?;
        Ok(())
    }

    /// POST to an auth endpoint and read back the token.
    async fn post_for_token<T>(&self, endpoint: &str, payload: &T) -> PortalResult<TokenResponse>
    where
        T: Serialize + ?Sized,
    {
        info!("POST {}", self.url(endpoint));
        let builder = self
            .optionally_authorized(Method::POST, endpoint)?
            .json(payload);
        let response = self.send(builder, endpoint).await?;
        self.decode(response, endpoint).await
    }
}

#[async_trait]
impl PortalApi for ServiceClient {
    async fn register_candidate(&self, draft: &CandidateDraft) -> PortalResult<TokenResponse> {
        self.post_for_token(CANDIDATE_REGISTER_ENDPOINT, draft).await
    }

    async fn register_recruiter(
        &self,
        registration: &RecruiterRegistration,
    ) -> PortalResult<TokenResponse> {
        self.post_for_token(RECRUITER_REGISTER_ENDPOINT, registration)
            .await
    }

    async fn login_recruiter(&self, login: &RecruiterLogin) -> PortalResult<TokenResponse> {
        self.post_for_token(RECRUITER_LOGIN_ENDPOINT, login).await
    }

    async fn list_candidates(&self) -> PortalResult<Vec<Candidate>> {
        self.get(CANDIDATES_ENDPOINT).await
    }

    async fn update_candidate(&self, id: u64, update: &CandidateUpdate) -> PortalResult<()> {
        let endpoint = format!("{}/{}", CANDIDATE_ENDPOINT, id);
        self.write_json(Method::PUT, &endpoint, update).await
    }

    async fn delete_candidate(&self, id: u64) -> PortalResult<()> {
        self.delete(&format!("{}/{}", CANDIDATE_ENDPOINT, id)).await
    }

    async fn profile(&self) -> PortalResult<Candidate> {
        self.get(PROFILE_ENDPOINT).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> PortalResult<()> {
        self.write_json(Method::PUT, PROFILE_ENDPOINT, update).await
    }

    async fn delete_profile(&self) -> PortalResult<()> {
        self.delete(PROFILE_ENDPOINT).await
    }

    async fn list_requirements(&self) -> PortalResult<Vec<Requirement>> {
        self.get(REQUIREMENTS_ENDPOINT).await
    }

    async fn create_requirement(&self, draft: &RequirementDraft) -> PortalResult<()> {
        self.write_json(Method::POST, REQUIREMENTS_ENDPOINT, draft)
            .await
    }

    async fn update_requirement(&self, id: u64, draft: &RequirementDraft) -> PortalResult<()> {
        let endpoint = format!("{}/{}", REQUIREMENTS_ENDPOINT, id);
        self.write_json(Method::PUT, &endpoint, draft).await
    }

    async fn delete_requirement(&self, id: u64) -> PortalResult<()> {
        self.delete(&format!("{}/{}", REQUIREMENTS_ENDPOINT, id))
            .await
    }

    async fn all_applications(&self) -> PortalResult<Vec<Application>> {
        self.get(ALL_APPLICATIONS_ENDPOINT).await
    }

    async fn my_applications(&self) -> PortalResult<Vec<Requirement>> {
        self.get(MY_APPLICATIONS_ENDPOINT).await
    }

    async fn apply(&self, job_id: u64) -> PortalResult<()> {
        let endpoint = format!("{}/{}", APPLY_ENDPOINT, job_id);
        self.write_json(Method::POST, &endpoint, &ApplyRequest { job_id })
            .await
    }
}
