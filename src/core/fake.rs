// src/core/fake.rs
//! In-memory `PortalApi` for view tests. Records every call and can be told
//! to fail specific operations.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::core::api::PortalApi;
use crate::error::{PortalError, PortalResult};
use crate::types::{
    Application, Candidate, CandidateDraft, CandidateUpdate, ProfileUpdate, RecruiterLogin,
    RecruiterRegistration, Requirement, RequirementDraft, TokenResponse,
};

#[derive(Default)]
pub struct FakeState {
    pub candidates: Vec<Candidate>,
    pub requirements: Vec<Requirement>,
    pub applications: Vec<Application>,
    pub applied: Vec<Requirement>,
    pub profile: Option<Candidate>,
    pub calls: Vec<String>,
    pub failing: HashMap<&'static str, StatusCode>,
    pub next_id: u64,
}

#[derive(Default)]
pub struct FakeApi {
    pub state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.state.lock().expect("fake lock").next_id = 100;
        api
    }

    pub fn with_candidates(self, candidates: Vec<Candidate>) -> Self {
        self.state.lock().expect("fake lock").candidates = candidates;
        self
    }

    pub fn with_requirements(self, requirements: Vec<Requirement>) -> Self {
        self.state.lock().expect("fake lock").requirements = requirements;
        self
    }

    pub fn with_applications(self, applications: Vec<Application>) -> Self {
        self.state.lock().expect("fake lock").applications = applications;
        self
    }

    pub fn with_applied(self, applied: Vec<Requirement>) -> Self {
        self.state.lock().expect("fake lock").applied = applied;
        self
    }

    pub fn with_profile(self, profile: Candidate) -> Self {
        self.state.lock().expect("fake lock").profile = Some(profile);
        self
    }

    pub fn fail(&self, operation: &'static str) {
        self.fail_with(operation, StatusCode::INTERNAL_SERVER_ERROR);
    }

    pub fn fail_with(&self, operation: &'static str, status: StatusCode) {
        self.state
            .lock()
            .expect("fake lock")
            .failing
            .insert(operation, status);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().expect("fake lock").calls.clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(':').next() == Some(operation))
            .count()
    }

    fn enter(&self, call: String, operation: &'static str) -> PortalResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().expect("fake lock");
        state.calls.push(call);
        if let Some(status) = state.failing.get(operation).copied() {
            return Err(PortalError::Api {
                status,
                message: None,
            });
        }
        Ok(state)
    }
}

pub fn candidate(id: u64, name: &str, experience: Option<u32>) -> Candidate {
    Candidate {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        contact: "555-0100".to_string(),
        city: "Leeds".to_string(),
        skills: "Rust, SQL".to_string(),
        profile_image: None,
        experience,
        current_role: None,
        education: None,
        expected_salary: None,
        availability: None,
        status: None,
    }
}

pub fn requirement(id: u64, position: &str) -> Requirement {
    Requirement {
        id,
        position: position.to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        description: "Build things".to_string(),
        salary: None,
        skills_required: "Rust".to_string(),
        experience: Some(2),
    }
}

pub fn application(candidate_id: u64, requirement_id: u64) -> Application {
    Application {
        candidate_id,
        requirement_id,
        applied_date: "2024-01-01".to_string(),
        status: "pending".to_string(),
    }
}

#[async_trait]
impl PortalApi for FakeApi {
    async fn register_candidate(&self, draft: &CandidateDraft) -> PortalResult<TokenResponse> {
        let mut state = self.enter(format!("register_candidate:{}", draft.name), "register_candidate")?;
        let id = state.next_id;
        state.next_id += 1;
        state.candidates.push(Candidate {
            id,
            name: draft.name.clone(),
            email: draft.email.clone(),
            contact: draft.contact.clone(),
            city: draft.city.clone(),
            skills: draft.skills.clone(),
            profile_image: None,
            experience: None,
            current_role: None,
            education: None,
            expected_salary: None,
            availability: None,
            status: None,
        });
        Ok(TokenResponse {
            token: format!("candidate-token-{}", id),
        })
    }

    async fn register_recruiter(
        &self,
        registration: &RecruiterRegistration,
    ) -> PortalResult<TokenResponse> {
        self.enter(format!("register_recruiter:{}", registration.email), "register_recruiter")?;
        Ok(TokenResponse {
            token: "recruiter-token".to_string(),
        })
    }

    async fn login_recruiter(&self, login: &RecruiterLogin) -> PortalResult<TokenResponse> {
        self.enter(format!("login_recruiter:{}", login.email), "login_recruiter")?;
        Ok(TokenResponse {
            token: "recruiter-token".to_string(),
        })
    }

    async fn list_candidates(&self) -> PortalResult<Vec<Candidate>> {
        let state = self.enter("list_candidates".to_string(), "list_candidates")?;
        Ok(state.candidates.clone())
    }

    async fn update_candidate(&self, id: u64, update: &CandidateUpdate) -> PortalResult<()> {
        let mut state = self.enter(format!("update_candidate:{}", id), "update_candidate")?;
        if let Some(existing) = state.candidates.iter_mut().find(|c| c.id == id) {
            existing.name = update.name.clone();
            existing.experience = Some(update.experience);
            existing.availability = Some(update.availability);
            existing.status = Some(update.status);
        }
        Ok(())
    }

    async fn delete_candidate(&self, id: u64) -> PortalResult<()> {
        let mut state = self.enter(format!("delete_candidate:{}", id), "delete_candidate")?;
        state.candidates.retain(|c| c.id != id);
        Ok(())
    }

    async fn profile(&self) -> PortalResult<Candidate> {
        let state = self.enter("profile".to_string(), "profile")?;
        state.profile.clone().ok_or(PortalError::Api {
            status: StatusCode::NOT_FOUND,
            message: Some("Profile not found".to_string()),
        })
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> PortalResult<()> {
        let mut state = self.enter("update_profile".to_string(), "update_profile")?;
        if let Some(profile) = state.profile.as_mut() {
            profile.name = update.name.clone();
            profile.email = update.email.clone();
            profile.contact = update.contact.clone();
            profile.city = update.city.clone();
            profile.skills = update.skills.clone();
        }
        Ok(())
    }

    async fn delete_profile(&self) -> PortalResult<()> {
        let mut state = self.enter("delete_profile".to_string(), "delete_profile")?;
        state.profile = None;
        Ok(())
    }

    async fn list_requirements(&self) -> PortalResult<Vec<Requirement>> {
        let state = self.enter("list_requirements".to_string(), "list_requirements")?;
        Ok(state.requirements.clone())
    }

    async fn create_requirement(&self, draft: &RequirementDraft) -> PortalResult<()> {
        let mut state = self.enter(format!("create_requirement:{}", draft.position), "create_requirement")?;
        let id = state.next_id;
        state.next_id += 1;
        state.requirements.push(Requirement {
            id,
            position: draft.position.clone(),
            company: draft.company.clone(),
            location: draft.location.clone(),
            description: draft.description.clone(),
            salary: Some(draft.salary.clone()),
            skills_required: draft.skills_required.clone(),
            experience: Some(draft.experience),
        });
        Ok(())
    }

    async fn update_requirement(&self, id: u64, draft: &RequirementDraft) -> PortalResult<()> {
        let mut state = self.enter(format!("update_requirement:{}", id), "update_requirement")?;
        if let Some(existing) = state.requirements.iter_mut().find(|r| r.id == id) {
            existing.position = draft.position.clone();
            existing.company = draft.company.clone();
            existing.experience = Some(draft.experience);
        }
        Ok(())
    }

    async fn delete_requirement(&self, id: u64) -> PortalResult<()> {
        let mut state = self.enter(format!("delete_requirement:{}", id), "delete_requirement")?;
        state.requirements.retain(|r| r.id != id);
        Ok(())
    }

    async fn all_applications(&self) -> PortalResult<Vec<Application>> {
        let state = self.enter("all_applications".to_string(), "all_applications")?;
        Ok(state.applications.clone())
    }

    async fn my_applications(&self) -> PortalResult<Vec<Requirement>> {
        let state = self.enter("my_applications".to_string(), "my_applications")?;
        Ok(state.applied.clone())
    }

    async fn apply(&self, job_id: u64) -> PortalResult<()> {
        let mut state = self.enter(format!("apply:{}", job_id), "apply")?;
        if let Some(job) = state.requirements.iter().find(|r| r.id == job_id).cloned() {
            state.applied.push(job);
        }
        Ok(())
    }
}
