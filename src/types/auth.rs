// src/types/auth.rs
use serde::{Deserialize, Serialize};

use crate::utils::require_field;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RecruiterRegistration {
    pub fn validate(&self) -> Result<(), String> {
        require_field("Name", &self.name)?;
        require_field("Email", &self.email)?;
        require_field("Password", &self.password)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterLogin {
    pub email: String,
    pub password: String,
}

impl RecruiterLogin {
    pub fn validate(&self) -> Result<(), String> {
        require_field("Email", &self.email)?;
        require_field("Password", &self.password)
    }
}

/// Every auth endpoint answers with a bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Body for `POST /api/apply/:jobId`.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyRequest {
    #[serde(rename = "jobId")]
    pub job_id: u64,
}
