// src/views/jobs.rs
//! Candidate's job tabs: open jobs not yet applied to, and applied jobs.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::PortalApi;
use crate::error::PortalResult;
use crate::reconciler::{exclude_present, RequirementQuery};
use crate::types::Requirement;
use crate::views::notice::Notice;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobTab {
    #[default]
    New,
    Applied,
}

pub struct JobBoard {
    api: Arc<dyn PortalApi>,
    jobs: Vec<Requirement>,
    applied: Vec<Requirement>,
    pub tab: JobTab,
    pub query: RequirementQuery,
}

impl JobBoard {
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self {
            api,
            jobs: Vec::new(),
            applied: Vec::new(),
            tab: JobTab::default(),
            query: RequirementQuery::default(),
        }
    }

    /// Fetch both collections independently. Each one is replaced only when
    /// its own fetch succeeds; the first error is returned.
    pub async fn refresh(&mut self) -> PortalResult<()> {
        let (jobs, applied) = tokio::join!(self.api.list_requirements(), self.api.my_applications());

        let jobs_result = match jobs {
            Ok(jobs) => {
                self.jobs = jobs;
                Ok(())
            }
            Err(e) => {
                error!("Error fetching new jobs: {}", e);
                Err(e)
            }
        };
        let applied_result = match applied {
            Ok(applied) => {
                self.applied = applied;
                Ok(())
            }
            Err(e) => {
                error!("Error fetching applied jobs: {}", e);
                Err(e)
            }
        };

        info!(
            "Loaded {} jobs, {} already applied",
            self.jobs.len(),
            self.applied.len()
        );
        jobs_result.and(applied_result)
    }

    pub fn jobs(&self) -> &[Requirement] {
        &self.jobs
    }

    pub fn applied(&self) -> &[Requirement] {
        &self.applied
    }

    /// Jobs the candidate has not applied to, never containing an applied one.
    pub fn available(&self) -> Vec<Requirement> {
        exclude_present(&self.jobs, &self.applied)
    }

    /// Rows for the active tab, after search/filter/sort.
    pub fn visible(&self) -> Vec<Requirement> {
        match self.tab {
            JobTab::New => self.query.apply(&self.available()),
            JobTab::Applied => self.query.apply(&self.applied),
        }
    }

    /// Tab counters as shown in the tab headers.
    pub fn counts(&self) -> (usize, usize) {
        (self.available().len(), self.applied.len())
    }

    pub fn has_applied(&self, job_id: u64) -> bool {
        self.applied.iter().any(|job| job.id == job_id)
    }

    /// Apply, then reload both tabs.
    pub async fn apply(&mut self, job_id: u64) -> Notice {
        if self.has_applied(job_id) {
            warn!("Job {} already applied to, not sending", job_id);
            return Notice::warning("You have already applied for this job.");
        }

        let label = self
            .jobs
            .iter()
            .find(|job| job.id == job_id)
            .map(|job| format!("{} at {}", job.position, job.company));

        match self.api.apply(job_id).await {
            Ok(()) => {
                if let Err(e) = self.refresh().await {
                    warn!("Reload after apply failed: {}", e);
                }
                match label {
                    Some(label) => Notice::success(format!("Successfully applied for {}!", label)),
                    None => Notice::success(format!("Successfully applied for job #{}!", job_id)),
                }
            }
            Err(e) => {
                error!("Error applying to job {}: {}", job_id, e);
                Notice::error(e.user_message("Failed to apply for the job. Please try again."))
            }
        }
    }
}
