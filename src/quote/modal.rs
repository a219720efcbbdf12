//! Hooks tying the wizard to the dialog that hosts it.
//!
//! The host owns showing and hiding the dialog; the wizard only reacts to
//! its lifecycle events.

use super::controller::WizardController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    Opened,
    Closed,
}

/// The page that hosts the quote dialog
pub trait DialogHost {
    /// Remove any backdrop or overlay left by the dialog
    fn clear_overlay(&mut self);
    /// Put the page's scroll position back where it was before the dialog opened
    fn restore_scroll(&mut self);
}

impl WizardController {
    pub fn on_dialog_event(&mut self, event: DialogEvent, host: &mut dyn DialogHost) {
        match event {
            DialogEvent::Opened => {
                tracing::debug!("Quote dialog opened");
                self.reset_wizard();
            }
            DialogEvent::Closed => {
                tracing::debug!("Quote dialog closed");
                self.reset_wizard();
                host.clear_overlay();
                host.restore_scroll();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::controller::HandoffTarget;
    use crate::quote::state::Step;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingHost {
        calls: Vec<&'static str>,
    }

    impl DialogHost for RecordingHost {
        fn clear_overlay(&mut self) {
            self.calls.push("clear_overlay");
        }

        fn restore_scroll(&mut self) {
            self.calls.push("restore_scroll");
        }
    }

    fn controller() -> WizardController {
        WizardController::new(
            HandoffTarget {
                chat_base_url: "https://wa.me".to_string(),
                phone_number: "1".to_string(),
            },
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_open_resets_without_touching_host() {
        let mut c = controller();
        let mut host = RecordingHost::default();
        c.select_category("salas");
        c.go_to_next_step();

        c.on_dialog_event(DialogEvent::Opened, &mut host);
        assert_eq!(c.step(), Step::Category);
        assert!(c.form().category.is_empty());
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_close_discards_session_and_cleans_up() {
        let mut c = controller();
        let mut host = RecordingHost::default();
        c.select_category("salas");
        c.go_to_next_step();

        c.on_dialog_event(DialogEvent::Closed, &mut host);
        assert_eq!(c.step(), Step::Category);
        assert!(c.answers().category.is_empty());
        assert_eq!(host.calls, vec!["clear_overlay", "restore_scroll"]);
    }
}
