// src/views/confirm.rs
//! Two-step delete: a request captures the target, only an explicit
//! confirmation releases it for execution.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDelete {
    pub id: u64,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pending: Option<PendingDelete>,
}

impl DeleteConfirmation {
    /// Capture a target, replacing any earlier unconfirmed one.
    pub fn request(&mut self, id: u64, display_name: impl Into<String>) -> &PendingDelete {
        self.pending.insert(PendingDelete {
            id,
            display_name: display_name.into(),
        })
    }

    pub fn pending(&self) -> Option<&PendingDelete> {
        self.pending.as_ref()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Hand the target over for execution. Always leaves nothing pending.
    pub fn take(&mut self) -> Option<PendingDelete> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_then_take() {
        let mut confirm = DeleteConfirmation::default();
        assert!(confirm.take().is_none());

        confirm.request(4, "Ann");
        assert_eq!(confirm.pending().map(|p| p.id), Some(4));

        let target = confirm.take().expect("pending target");
        assert_eq!(target.display_name, "Ann");
        assert!(confirm.pending().is_none());
    }

    #[test]
    fn test_cancel_drops_target() {
        let mut confirm = DeleteConfirmation::default();
        confirm.request(4, "Ann");
        confirm.cancel();
        assert!(confirm.take().is_none());
    }

    #[test]
    fn test_new_request_replaces_old() {
        let mut confirm = DeleteConfirmation::default();
        confirm.request(4, "Ann");
        confirm.request(5, "Bob");
        assert_eq!(confirm.take().map(|p| p.id), Some(5));
    }
}
