// src/views/mod.rs
//! Per-view state objects. Each owns its collections exclusively; writes
//! are followed by a full reload instead of local patching.

pub mod candidates;
pub mod confirm;
pub mod jobs;
pub mod notice;
pub mod profile;
pub mod requirements;

pub use candidates::CandidateBoard;
pub use confirm::{DeleteConfirmation, PendingDelete};
pub use jobs::{JobBoard, JobTab};
pub use notice::{Notice, NoticeLevel};
pub use profile::ProfileView;
pub use requirements::RequirementBoard;
