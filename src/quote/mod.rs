//! Quotation wizard core, independent of any UI toolkit.
//!
//! Three linear steps (category, characteristics, contact). The controller
//! validates each step before moving on, and on submit composes a plain-text
//! summary that is handed off to a chat link.

pub mod composer;
pub mod controller;
pub mod modal;
pub mod state;
pub mod validator;

pub use composer::{compose_message, handoff_link};
pub use controller::{
    HandoffTarget, NavButtons, Notice, NoticeLevel, StepOutcome, Submission, SubmitOutcome,
    WizardController,
};
pub use modal::{DialogEvent, DialogHost};
pub use state::{
    category_label, Answers, ContactMethod, Field, FormValues, Step, WizardState,
    CATEGORY_OPTIONS, TOTAL_STEPS,
};
pub use validator::{validate_step, ValidationIssue};
