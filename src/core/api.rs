// src/core/api.rs
//! The remote API as the views see it. `ServiceClient` is the HTTP
//! implementation; tests substitute an in-memory one.

use async_trait::async_trait;

use crate::error::PortalResult;
use crate::types::{
    Application, Candidate, CandidateDraft, CandidateUpdate, ProfileUpdate, RecruiterLogin,
    RecruiterRegistration, Requirement, RequirementDraft, TokenResponse,
};

#[async_trait]
pub trait PortalApi: Send + Sync {
    // auth
    async fn register_candidate(&self, draft: &CandidateDraft) -> PortalResult<TokenResponse>;
    async fn register_recruiter(
        &self,
        registration: &RecruiterRegistration,
    ) -> PortalResult<TokenResponse>;
    async fn login_recruiter(&self, login: &RecruiterLogin) -> PortalResult<TokenResponse>;

    // candidates
    async fn list_candidates(&self) -> PortalResult<Vec<Candidate>>;
    async fn update_candidate(&self, id: u64, update: &CandidateUpdate) -> PortalResult<()>;
    async fn delete_candidate(&self, id: u64) -> PortalResult<()>;

    // self-service profile, keyed by the token's identity
    async fn profile(&self) -> PortalResult<Candidate>;
    async fn update_profile(&self, update: &ProfileUpdate) -> PortalResult<()>;
    async fn delete_profile(&self) -> PortalResult<()>;

    // requirements
    async fn list_requirements(&self) -> PortalResult<Vec<Requirement>>;
    async fn create_requirement(&self, draft: &RequirementDraft) -> PortalResult<()>;
    async fn update_requirement(&self, id: u64, draft: &RequirementDraft) -> PortalResult<()>;
    async fn delete_requirement(&self, id: u64) -> PortalResult<()>;

    // applications
    async fn all_applications(&self) -> PortalResult<Vec<Application>>;
    /// Jobs the current candidate has applied to.
    async fn my_applications(&self) -> PortalResult<Vec<Requirement>>;
    async fn apply(&self, job_id: u64) -> PortalResult<()>;
}
