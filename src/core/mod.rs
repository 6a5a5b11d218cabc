// src/core/mod.rs
//! Remote collaborator and credential plumbing shared by every view

pub mod api;
pub mod credentials;
pub mod service_client;

#[cfg(test)]
pub mod fake;

pub use api::PortalApi;
pub use credentials::{CredentialProvider, FileCredentialStore, MemoryCredentials, TOKEN_KEY};
pub use service_client::ServiceClient;
