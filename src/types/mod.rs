// src/types/mod.rs
//! Wire types exchanged with the job-portal API

pub mod application;
pub mod auth;
pub mod candidate;
pub mod requirement;

pub use application::Application;
pub use auth::{ApplyRequest, RecruiterLogin, RecruiterRegistration, TokenResponse};
pub use candidate::{
    Availability, Candidate, CandidateDraft, CandidateForm, CandidateStatus, CandidateUpdate,
    ProfileUpdate,
};
pub use requirement::{Requirement, RequirementDraft, RequirementForm, Salary};
