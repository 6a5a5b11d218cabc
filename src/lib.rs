// src/lib.rs
//! Client for the job portal API: recruiters manage candidates and job
//! requirements, candidates browse and apply to jobs and keep their profile.

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod reconciler;
pub mod types;
pub mod utils;
pub mod views;

pub use auth::{AuthService, TokenClaims};
pub use config::PortalConfig;
pub use crate::core::{CredentialProvider, FileCredentialStore, PortalApi, ServiceClient};
pub use error::{PortalError, PortalResult};
pub use views::{CandidateBoard, JobBoard, Notice, ProfileView, RequirementBoard};
