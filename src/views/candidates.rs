// src/views/candidates.rs
//! Recruiter's candidate list: candidates joined with their applications,
//! searchable and sortable, with add/edit/delete that always reload.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::PortalApi;
use crate::error::PortalResult;
use crate::reconciler::{exclude_linked_for, join_map, CandidateQuery};
use crate::types::{Application, Candidate, CandidateForm, Requirement};
use crate::views::confirm::{DeleteConfirmation, PendingDelete};
use crate::views::notice::Notice;

pub struct CandidateBoard {
    api: Arc<dyn PortalApi>,
    candidates: Vec<Candidate>,
    applications: Vec<Application>,
    pub query: CandidateQuery,
    form: CandidateForm,
    editing: Option<u64>,
    delete: DeleteConfirmation,
}

impl CandidateBoard {
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self {
            api,
            candidates: Vec::new(),
            applications: Vec::new(),
            query: CandidateQuery::default(),
            form: CandidateForm::default(),
            editing: None,
            delete: DeleteConfirmation::default(),
        }
    }

    /// Reload candidates, then applications. A failed fetch keeps the last
    /// successfully fetched collection.
    pub async fn refresh(&mut self) -> PortalResult<()> {
        let candidates = self.api.list_candidates().await.map_err(|e| {
            error!("Error fetching candidates: {}", e);
            e
        })?;
        self.candidates = candidates;

        let applications = self.api.all_applications().await.map_err(|e| {
            error!("Error fetching candidate applications: {}", e);
            e
        })?;
        self.applications = applications;

        info!(
            "Loaded {} candidates and {} applications",
            self.candidates.len(),
            self.applications.len()
        );
        Ok(())
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn find(&self, id: u64) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Candidates after search, filters and sort.
    pub fn visible(&self) -> Vec<Candidate> {
        self.query.apply(&self.candidates)
    }

    /// Candidate id to the requirement ids they applied to.
    pub fn application_map(&self) -> BTreeMap<u64, Vec<u64>> {
        join_map(&self.candidates, &self.applications)
    }

    pub fn applied_jobs(&self, candidate_id: u64) -> Vec<u64> {
        self.application_map()
            .remove(&candidate_id)
            .unwrap_or_default()
    }

    /// Most recent application date, skipping unparseable dates.
    pub fn last_applied(&self, candidate_id: u64) -> Option<NaiveDate> {
        self.applications
            .iter()
            .filter(|app| app.candidate_id == candidate_id)
            .filter_map(|app| app.applied_on())
            .max()
    }

    /// Requirements the candidate has not applied to yet.
    pub fn open_requirements_for(
        &self,
        candidate_id: u64,
        requirements: &[Requirement],
    ) -> Vec<Requirement> {
        exclude_linked_for(requirements, &self.applications, candidate_id)
    }

    pub fn form(&self) -> &CandidateForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CandidateForm {
        &mut self.form
    }

    pub fn editing(&self) -> Option<u64> {
        self.editing
    }

    pub fn start_create(&mut self) {
        self.reset_form();
    }

    /// Prefill the form from a listed candidate. Returns false for unknown ids.
    pub fn start_edit(&mut self, id: u64) -> bool {
        match self.find(id) {
            Some(candidate) => {
                self.form = CandidateForm::from_candidate(candidate);
                self.editing = Some(id);
                true
            }
            None => {
                warn!("Cannot edit unknown candidate {}", id);
                false
            }
        }
    }

    pub fn reset_form(&mut self) {
        self.form = CandidateForm::default();
        self.editing = None;
    }

    /// One write (update when editing, registration otherwise), then a full
    /// reload on success. On failure nothing local changes.
    pub async fn submit(&mut self) -> Notice {
        match self.editing {
            Some(id) => self.submit_update(id).await,
            None => self.submit_create().await,
        }
    }

    async fn submit_create(&mut self) -> Notice {
        let draft = match self.form.to_draft() {
            Ok(draft) => draft,
            Err(msg) => return Notice::error(msg),
        };

        match self.api.register_candidate(&draft).await {
            Ok(_) => {
                self.reload_after_write().await;
                self.reset_form();
                Notice::success(format!(
                    "Candidate {} has been added successfully!",
                    draft.name
                ))
            }
            Err(e) => {
                error!("Error submitting candidate: {}", e);
                Notice::error(e.user_message("Failed to add new candidate. Please try again."))
            }
        }
    }

    async fn submit_update(&mut self, id: u64) -> Notice {
        let update = match self.form.to_update() {
            Ok(update) => update,
            Err(msg) => return Notice::error(msg),
        };

        match self.api.update_candidate(id, &update).await {
            Ok(()) => {
                self.reload_after_write().await;
                self.reset_form();
                Notice::success(format!(
                    "{}'s information has been updated successfully!",
                    update.name
                ))
            }
            Err(e) => {
                error!("Error updating candidate {}: {}", id, e);
                Notice::error(e.user_message(
                    "Failed to update candidate information. Please try again.",
                ))
            }
        }
    }

    /// First delete step. Only ids present in the list can be targeted.
    pub fn request_delete(&mut self, id: u64) -> Option<&PendingDelete> {
        let name = self.find(id)?.name.clone();
        Some(self.delete.request(id, name))
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.delete.pending()
    }

    pub fn cancel_delete(&mut self) {
        self.delete.cancel();
    }

    /// Second delete step. Without a pending request nothing is sent.
    pub async fn confirm_delete(&mut self) -> Option<Notice> {
        let target = self.delete.take()?;

        let notice = match self.api.delete_candidate(target.id).await {
            Ok(()) => {
                self.reload_after_write().await;
                Notice::success(format!(
                    "Candidate {} has been deleted successfully!",
                    target.display_name
                ))
            }
            Err(e) => {
                error!("Error deleting candidate {}: {}", target.id, e);
                Notice::error(e.user_message("Failed to delete candidate. Please try again."))
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
    use crate::core::fake::{application, candidate, requirement, FakeApi};
    use crate::reconciler::{SortKey, SortOrder, SortSpec};
    use crate::types::{Availability, CandidateStatus};

    fn board_with(fake: &Arc<FakeApi>) -> CandidateBoard {
        CandidateBoard::new(fake.clone())
    }

    fn seeded() -> Arc<FakeApi> {
        Arc::new(
            FakeApi::new()
                .with_candidates(vec![candidate(1, "Bob", Some(2)), candidate(2, "Ann", Some(5))])
                .with_applications(vec![application(2, 10), application(2, 11), application(7, 12)]),
        )
    }

    fn fill_registration(form: &mut CandidateForm) {
        form.name = "Cy".into();
        form.email = "cy@example.com".into();
        form.contact = "555".into();
        form.city = "Hull".into();
        form.skills = "Go".into();
        form.username = "cy".into();
        form.password = "hunter22".into();
    }

    #[tokio::test]
    async fn test_refresh_builds_join_map() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");

        let map = board.application_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&2], vec![10, 11]);
        assert!(map[&1].is_empty());
        assert_eq!(board.applied_jobs(2), vec![10, 11]);
        assert!(board.applied_jobs(99).is_empty());
    }

    #[tokio::test]
    async fn test_visible_applies_query() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");

        board.query.sort = SortSpec::new(SortKey::Name, SortOrder::Asc);
        let names: Vec<_> = board.visible().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Ann", "Bob"]);

        board.query.search = "ann".into();
        assert_eq!(board.visible().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_list() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");

        fake.fail("list_candidates");
        assert!(board.refresh().await.is_err());
        assert_eq!(board.candidates().len(), 2);
    }

    #[tokio::test]
    async fn test_create_registers_then_refetches() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");

        board.start_create();
        fill_registration(board.form_mut());
        let notice = board.submit().await;

        assert_eq!(notice, Notice::success("Candidate Cy has been added successfully!"));
        assert_eq!(board.candidates().len(), 3);
        assert_eq!(fake.count("register_candidate"), 1);
        assert_eq!(fake.count("list_candidates"), 2);
        assert_eq!(board.form(), &CandidateForm::default());
    }

    #[tokio::test]
    async fn test_failed_create_leaves_state_unchanged() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");
        let before = board.candidates().to_vec();

        fake.fail("register_candidate");
        fill_registration(board.form_mut());
        let notice = board.submit().await;

        assert!(notice.is_error());
        assert_eq!(notice.message, "Failed to add new candidate. Please try again.");
        assert_eq!(board.candidates(), before.as_slice());
        assert_eq!(fake.count("list_candidates"), 1);
        assert_eq!(board.form().name, "Cy");
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let fake = seeded();
        let mut board = board_with(&fake);

        fill_registration(board.form_mut());
        board.form_mut().password = "123".into();
        let notice = board.submit().await;

        assert!(notice.is_error());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_uses_update_endpoint() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");

        assert!(board.start_edit(1));
        assert_eq!(board.form().experience, "2");
        board.form_mut().availability = Availability::NoticePeriod;
        board.form_mut().status = CandidateStatus::Shortlisted;
        let notice = board.submit().await;

        assert_eq!(notice, Notice::success("Bob's information has been updated successfully!"));
        assert_eq!(fake.count("update_candidate"), 1);
        assert_eq!(fake.count("register_candidate"), 0);
        assert_eq!(board.editing(), None);
        let bob = board.find(1).expect("bob");
        assert_eq!(bob.status, Some(CandidateStatus::Shortlisted));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");

        assert!(board.confirm_delete().await.is_none());
        assert_eq!(fake.count("delete_candidate"), 0);

        let pending = board.request_delete(2).expect("known id").clone();
        assert_eq!(pending.display_name, "Ann");
        assert_eq!(fake.count("delete_candidate"), 0);

        let notice = board.confirm_delete().await.expect("confirmed");
        assert_eq!(notice, Notice::success("Candidate Ann has been deleted successfully!"));
        assert_eq!(fake.count("delete_candidate"), 1);
        assert_eq!(fake.count("list_candidates"), 2);
        assert!(board.find(2).is_none());
        assert!(board.pending_delete().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_delete_sends_nothing() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");

        board.request_delete(1);
        board.cancel_delete();
        assert!(board.confirm_delete().await.is_none());
        assert_eq!(fake.count("delete_candidate"), 0);
    }

    #[tokio::test]
    async fn test_unknown_id_cannot_be_targeted() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");
        assert!(board.request_delete(42).is_none());
        assert!(!board.start_edit(42));
    }

    #[tokio::test]
    async fn test_failed_delete_clears_pending_and_keeps_list() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");

        fake.fail("delete_candidate");
        board.request_delete(1);
        let notice = board.confirm_delete().await.expect("attempted");
        assert!(notice.is_error());
        assert_eq!(board.candidates().len(), 2);
        assert!(board.pending_delete().is_none());
    }

    #[tokio::test]
    async fn test_open_requirements_for_candidate() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");

        let jobs = vec![requirement(10, "A"), requirement(11, "B"), requirement(12, "C")];
        let open = board.open_requirements_for(2, &jobs);
        assert_eq!(open.iter().map(|j| j.id).collect::<Vec<_>>(), vec![12]);
    }

    #[tokio::test]
    async fn test_last_applied_picks_latest_date() {
        let mut later = application(2, 11);
        later.applied_date = "2024-03-09T10:15:00Z".into();
        let mut garbled = application(2, 12);
        garbled.applied_date = "soon".into();
        let fake = Arc::new(
            FakeApi::new()
                .with_candidates(vec![candidate(1, "Bob", Some(2)), candidate(2, "Ann", Some(5))])
                .with_applications(vec![application(2, 10), later, garbled]),
        );
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");

        assert_eq!(board.last_applied(2), NaiveDate::from_ymd_opt(2024, 3, 9));
        assert_eq!(board.last_applied(1), None);
    }

    #[tokio::test]
    async fn test_rejected_token_asks_for_login() {
        let fake = seeded();
        let mut board = board_with(&fake);
        board.refresh().await.expect("refresh");

        fake.fail_with("update_candidate", reqwest::StatusCode::UNAUTHORIZED);
        assert!(board.start_edit(1));
        board.form_mut().city = "York".into();
        let notice = board.submit().await;

        assert_eq!(notice, Notice::error(crate::error::SESSION_EXPIRED));
        assert_eq!(board.find(1).map(|c| c.city.as_str()), Some("Leeds"));
    }
}
