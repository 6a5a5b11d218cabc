// src/views/requirements.rs
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::PortalApi;
use crate::error::PortalResult;
use crate::reconciler::RequirementQuery;
use crate::types::{Requirement, RequirementForm};
use crate::views::confirm::{DeleteConfirmation, PendingDelete};
use crate::views::notice::Notice;

/// Recruiter's job requirement list with add/edit/delete.
pub struct RequirementBoard {
    api: Arc<dyn PortalApi>,
    requirements: Vec<Requirement>,
    pub query: RequirementQuery,
    form: RequirementForm,
    editing: Option<u64>,
    delete: DeleteConfirmation,
}

impl RequirementBoard {
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self {
            api,
            requirements: Vec::new(),
            query: RequirementQuery::default(),
            form: RequirementForm::default(),
            editing: None,
            delete: DeleteConfirmation::default(),
        }
    }

    pub async fn refresh(&mut self) -> PortalResult<()> {
        let requirements = self.api.list_requirements().await.map_err(|e| {
            error!("Error fetching requirements: {}", e);
            e
        })?;
        info!("Loaded {} requirements", requirements.len());
        self.requirements = requirements;
        Ok(())
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn find(&self, id: u64) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id == id)
    }

    pub fn visible(&self) -> Vec<Requirement> {
        self.query.apply(&self.requirements)
    }

    pub fn form(&self) -> &RequirementForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RequirementForm {
        &mut self.form
    }

    pub fn editing(&self) -> Option<u64> {
        self.editing
    }

    pub fn start_create(&mut self) {
        self.reset_form();
    }

    pub fn start_edit(&mut self, id: u64) -> bool {
        match self.find(id) {
            Some(requirement) => {
                self.form = RequirementForm::from_requirement(requirement);
                self.editing = Some(id);
                true
            }
            None => {
                warn!("Cannot edit unknown requirement {}", id);
                false
            }
        }
    }

    pub fn reset_form(&mut self) {
        self.form = RequirementForm::default();
        self.editing = None;
    }

    pub async fn submit(&mut self) -> Notice {
        let draft = match self.form.to_draft() {
            Ok(draft) => draft,
            Err(msg) => return Notice::error(msg),
        };

        let (result, success, fallback) = match self.editing {
            Some(id) => (
                self.api.update_requirement(id, &draft).await,
                format!("{} updated successfully!", draft.position),
                "Update failed. Try again.",
            ),
            None => (
                self.api.create_requirement(&draft).await,
                format!("New requirement for {} added successfully!", draft.position),
                "Addition failed. Try again.",
            ),
        };

        match result {
            Ok(()) => {
                self.reload_after_write().await;
                self.reset_form();
                Notice::success(success)
            }
            Err(e) => {
                error!("Error submitting requirement: {}", e);
                Notice::error(e.user_message(fallback))
            }
        }
    }

    pub fn request_delete(&mut self, id: u64) -> Option<&PendingDelete> {
        let position = self.find(id)?.position.clone();
        Some(self.delete.request(id, position))
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.delete.pending()
    }

    pub fn cancel_delete(&mut self) {
        self.delete.cancel();
    }

    pub async fn confirm_delete(&mut self) -> Option<Notice> {
        let target = self.delete.take()?;

        let notice = match self.api.delete_requirement(target.id).await {
            Ok(()) => {
                self.reload_after_write().await;
                Notice::success(format!(
                    "{} requirement deleted successfully!",
                    target.display_name
                ))
            }
            Err(e) => {
                error!("Error deleting requirement {}: {}", target.id, e);
                Notice::error(e.user_message("Failed to delete. Try again."))
            }
        };
        Some(notice)
    }

    async fn reload_after_write(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!("Reload after write failed, keeping previous list: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fake::{requirement, FakeApi};
    use crate::types::Salary;

    fn seeded() -> Arc<FakeApi> {
        Arc::new(FakeApi::new().with_requirements(vec![
            requirement(10, "Backend Dev"),
            requirement(11, "Data Analyst"),
        ]))
    }

    fn fill(form: &mut RequirementForm) {
        form.position = "Rust Engineer".into();
        form.company = "Ferrous".into();
        form.location = "Berlin".into();
        form.description = "Services".into();
        form.salary = "90000".into();
        form.skills_required = "Rust".into();
        form.experience = "4".into();
    }

    #[tokio::test]
    async fn test_create_then_refetch() {
        let fake = seeded();
        let mut board = RequirementBoard::new(fake.clone());
        board.refresh().await.expect("refresh");

        fill(board.form_mut());
        let notice = board.submit().await;

        assert_eq!(
            notice,
            Notice::success("New requirement for Rust Engineer added successfully!")
        );
        assert_eq!(board.requirements().len(), 3);
        assert_eq!(fake.count("create_requirement"), 1);
        assert_eq!(fake.count("list_requirements"), 2);
        let created = board
            .requirements()
            .iter()
            .find(|r| r.position == "Rust Engineer")
            .expect("created");
        assert_eq!(created.salary, Some(Salary::Amount(90000.0)));
    }

    #[tokio::test]
    async fn test_failed_create_keeps_list() {
        let fake = seeded();
        let mut board = RequirementBoard::new(fake.clone());
        board.refresh().await.expect("refresh");
        let before = board.requirements().to_vec();

        fake.fail("create_requirement");
        fill(board.form_mut());
        let notice = board.submit().await;

        assert_eq!(notice, Notice::error("Addition failed. Try again."));
        assert_eq!(board.requirements(), before.as_slice());
        assert_eq!(fake.count("list_requirements"), 1);
    }

    #[tokio::test]
    async fn test_edit_mode_updates() {
        let fake = seeded();
        let mut board = RequirementBoard::new(fake.clone());
        board.refresh().await.expect("refresh");

        assert!(board.start_edit(10));
        assert_eq!(board.form().position, "Backend Dev");
        board.form_mut().position = "Senior Backend Dev".into();
        board.form_mut().salary = "70000".into();
        let notice = board.submit().await;

        assert_eq!(notice, Notice::success("Senior Backend Dev updated successfully!"));
        assert_eq!(fake.count("update_requirement"), 1);
        assert_eq!(fake.count("create_requirement"), 0);
        assert_eq!(board.find(10).map(|r| r.position.as_str()), Some("Senior Backend Dev"));
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let fake = seeded();
        let mut board = RequirementBoard::new(fake.clone());
        board.refresh().await.expect("refresh");

        assert!(board.confirm_delete().await.is_none());
        board.request_delete(11);
        let notice = board.confirm_delete().await.expect("confirmed");

        assert_eq!(notice, Notice::success("Data Analyst requirement deleted successfully!"));
        assert_eq!(fake.count("delete_requirement"), 1);
        assert_eq!(board.requirements().len(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_form_is_rejected_locally() {
        let fake = seeded();
        let mut board = RequirementBoard::new(fake.clone());
        fill(board.form_mut());
        board.form_mut().description.clear();

        let notice = board.submit().await;
        assert_eq!(notice, Notice::error("Description is required"));
        assert!(fake.calls().is_empty());
    }
}
