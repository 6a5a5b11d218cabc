// src/views/profile.rs
//! Candidate self-service profile. Deleting the profile also ends the session.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::{CredentialProvider, PortalApi};
use crate::error::PortalResult;
use crate::types::{Candidate, ProfileUpdate};
use crate::views::confirm::{DeleteConfirmation, PendingDelete};
use crate::views::notice::Notice;

pub struct ProfileView {
    api: Arc<dyn PortalApi>,
    credentials: Arc<dyn CredentialProvider>,
    profile: Option<Candidate>,
    form: ProfileUpdate,
    editing: bool,
    delete: DeleteConfirmation,
}

impl ProfileView {
    pub fn new(api: Arc<dyn PortalApi>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            api,
            credentials,
            profile: None,
            form: ProfileUpdate::default(),
            editing: false,
            delete: DeleteConfirmation::default(),
        }
    }

    pub async fn refresh(&mut self) -> PortalResult<()> {
        let profile = self.api.profile().await.map_err(|e| {
            error!("Error fetching profile: {}", e);
            e
        })?;
        self.form = ProfileUpdate::from_candidate(&profile);
        self.profile = Some(profile);
        Ok(())
    }

    pub fn profile(&self) -> Option<&Candidate> {
        self.profile.as_ref()
    }

    pub fn form(&self) -> &ProfileUpdate {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProfileUpdate {
        &mut self.form
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn start_edit(&mut self) {
        if let Some(profile) = &self.profile {
            self.form = ProfileUpdate::from_candidate(profile);
        }
        self.editing = true;
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
    }

    pub async fn save(&mut self) -> Notice {
        if let Err(msg) = self.form.validate() {
            return Notice::error(msg);
        }

        match self.api.update_profile(&self.form).await {
            Ok(()) => {
                self.editing = false;
                if let Err(e) = self.refresh().await {
                    warn!("Reload after profile update failed: {}", e);
                }
                Notice::success("Your profile has been updated successfully.")
            }
            Err(e) => {
                error!("Error updating profile: {}", e);
                Notice::error(e.user_message("Failed to update profile. Please try again."))
            }
        }
    }

    /// Needs a loaded profile to capture the display name.
    pub fn request_delete(&mut self) -> Option<&PendingDelete> {
        let (id, name) = self.profile.as_ref().map(|p| (p.id, p.name.clone()))?;
        Some(self.delete.request(id, name))
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.delete.pending()
    }

    pub fn cancel_delete(&mut self) {
        self.delete.cancel();
    }

    /// Delete the profile and drop the stored token.
    pub async fn confirm_delete(&mut self) -> Option<Notice> {
        self.delete.take()?;

        let notice = match self.api.delete_profile().await {
            Ok(()) => {
                self.profile = None;
                self.form = ProfileUpdate::default();
                self.editing = false;
                if let Err(e) = self.credentials.clear() {
                    warn!("Profile deleted but token could not be cleared: {}", e);
                } else {
                    info!("Profile deleted, session ended");
                }
                Notice::success("Your profile has been deleted successfully.")
            }
            Err(e) => {
                error!("Error deleting profile: {}", e);
                Notice::error(e.user_message("Failed to delete profile. Please try again."))
            }
        };
        Some(notice)
    }
}
