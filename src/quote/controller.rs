//! Wizard controller: owns the session state and drives step transitions.

use std::collections::{BTreeSet, VecDeque};
use std::time::{Duration, Instant};

use super::composer::{compose_message, handoff_link};
use super::state::{Answers, ContactMethod, Field, FormValues, Step, WizardState};
use super::validator::{validate_step, ValidationIssue};

/// Notices kept before the oldest is dropped
const MAX_NOTICES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Success,
}

/// Transient message shown above the dialog buttons
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub created_at: Instant,
}

/// Which navigation buttons the dialog shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavButtons {
    pub previous_visible: bool,
    pub next_visible: bool,
    pub next_enabled: bool,
    pub submit_visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Advanced(Step),
    Blocked(ValidationIssue),
    /// Already on the last step; use submit instead
    AtLastStep,
}

/// A completed quote, ready for handoff
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub answers: Answers,
    pub message: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(Submission),
    Blocked(ValidationIssue),
    /// Submit was requested before reaching the last step
    NotReady,
}

/// Where composed quotes are sent
#[derive(Debug, Clone)]
pub struct HandoffTarget {
    pub chat_base_url: String,
    pub phone_number: String,
}

impl HandoffTarget {
    pub fn from_config(config: &crate::config::QuoteConfig) -> Self {
        Self {
            chat_base_url: config.chat_base_url.clone(),
            phone_number: config.phone_number.clone(),
        }
    }
}

pub struct WizardController {
    state: WizardState,
    form: FormValues,
    /// Fields carrying the invalid marker until their next input
    invalid: BTreeSet<Field>,
    visible_step: Step,
    notices: VecDeque<Notice>,
    notice_ttl: Duration,
    target: HandoffTarget,
}

impl WizardController {
    pub fn new(target: HandoffTarget, notice_ttl: Duration) -> Self {
        Self {
            state: WizardState::default(),
            form: FormValues::default(),
            invalid: BTreeSet::new(),
            visible_step: Step::Category,
            notices: VecDeque::new(),
            notice_ttl,
            target,
        }
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn answers(&self) -> &Answers {
        &self.state.answers
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn visible_step(&self) -> Step {
        self.visible_step
    }

    pub fn is_invalid(&self, field: Field) -> bool {
        self.invalid.contains(&field)
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = &Field> {
        self.invalid.iter()
    }

    /// Make step `n` the only visible step. Unknown steps are logged and ignored.
    pub fn show_step(&mut self, n: u8) -> bool {
        match Step::from_number(n) {
            Some(step) => {
                self.visible_step = step;
                tracing::debug!(step = n, "Showing quote step");
                true
            }
            None => {
                tracing::warn!(step = n, "Quote step view not found");
                false
            }
        }
    }

    /// Validate the current step and move forward on success
    pub fn go_to_next_step(&mut self) -> StepOutcome {
        let step = self.state.step;
        let Some(next) = step.next() else {
            return StepOutcome::AtLastStep;
        };

        if let Err(issue) = self.check(step) {
            return StepOutcome::Blocked(issue);
        }

        self.state.answers.collect(step, &self.form);
        self.state.step = next;
        self.show_step(next.number());
        StepOutcome::Advanced(next)
    }

    /// Move back one step without validation
    pub fn go_to_prev_step(&mut self) -> bool {
        match self.state.step.prev() {
            Some(prev) => {
                self.state.step = prev;
                self.show_step(prev.number());
                true
            }
            None => false,
        }
    }

    /// Back to step 1 with empty answers, draft and markers
    pub fn reset_wizard(&mut self) {
        self.state = WizardState::default();
        self.form = FormValues::default();
        self.invalid.clear();
        self.notices.clear();
        self.show_step(Step::Category.number());
    }

    /// Validate the contact step, compose the message and reset the session
    pub fn submit(&mut self) -> SubmitOutcome {
        let step = self.state.step;
        if !step.is_last() {
            return SubmitOutcome::NotReady;
        }
        if let Err(issue) = self.check(step) {
            return SubmitOutcome::Blocked(issue);
        }

        self.state.answers.collect(step, &self.form);
        let answers = self.state.answers.clone();
        let message = compose_message(&answers);
        let link = handoff_link(&self.target.chat_base_url, &self.target.phone_number, &message);

        tracing::info!(
            category = %answers.category,
            urgent = answers.urgent,
            "Quote request submitted"
        );

        self.reset_wizard();
        self.notify(NoticeLevel::Success, "Quote request ready to send");

        SubmitOutcome::Submitted(Submission {
            answers,
            message,
            link,
        })
    }

    pub fn buttons(&self) -> NavButtons {
        let step = self.state.step;
        NavButtons {
            previous_visible: step != Step::Category,
            next_visible: !step.is_last(),
            next_enabled: match step {
                Step::Category => !self.form.category.trim().is_empty(),
                _ => !step.is_last(),
            },
            submit_visible: step.is_last(),
        }
    }

    // ─── View events ────────────────────────────────────────────────────────

    /// Text typed into a field. Clears that field's invalid marker.
    pub fn input(&mut self, field: Field, value: &str) {
        if self.form.set_text(field, value) {
            self.invalid.remove(&field);
        }
    }

    pub fn select_category(&mut self, key: &str) {
        self.form.category = key.to_string();
        self.invalid.remove(&Field::Category);
    }

    pub fn set_contact_method(&mut self, method: ContactMethod) {
        self.form.preferred_contact = method;
        self.invalid.remove(&Field::PreferredContact);
    }

    pub fn set_urgent(&mut self, urgent: bool) {
        self.form.urgent = urgent;
        self.invalid.remove(&Field::Urgent);
    }

    // ─── Notices ────────────────────────────────────────────────────────────

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            level,
            text: text.into(),
            created_at: Instant::now(),
        });
    }

    /// Newest notice that has not expired at `now`
    pub fn current_notice(&self, now: Instant) -> Option<&Notice> {
        self.notices
            .back()
            .filter(|n| now.saturating_duration_since(n.created_at) < self.notice_ttl)
    }

    /// Run the validator for `step`, marking offending fields on failure
    fn check(&mut self, step: Step) -> Result<(), ValidationIssue> {
        match validate_step(step, &self.form) {
            Ok(()) => Ok(()),
            Err(issue) => {
                self.invalid.extend(issue.fields());
                self.notify(NoticeLevel::Warning, issue.to_string());
                tracing::debug!(step = step.number(), %issue, "Quote step rejected");
                Err(issue)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> WizardController {
        WizardController::new(
            HandoffTarget {
                chat_base_url: "https://wa.me".to_string(),
                phone_number: "5215555555555".to_string(),
            },
            Duration::from_secs(3),
        )
    }

    fn fill_characteristics(c: &mut WizardController) {
        c.input(Field::Style, "moderno");
        c.input(Field::Material, "roble");
        c.input(Field::Color, "nogal");
        c.input(Field::Budget, "20000");
    }

    fn notice_text(c: &WizardController) -> String {
        c.current_notice(Instant::now())
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_starts_on_step_one() {
        let c = controller();
        assert_eq!(c.step(), Step::Category);
        assert_eq!(c.visible_step(), Step::Category);
    }

    #[test]
    fn test_next_blocked_without_category() {
        let mut c = controller();
        let outcome = c.go_to_next_step();
        assert_eq!(outcome, StepOutcome::Blocked(ValidationIssue::MissingCategory));
        assert_eq!(c.step(), Step::Category);
        assert!(c.is_invalid(Field::Category));
        assert_eq!(notice_text(&c), "Please select a furniture type");
    }

    #[test]
    fn test_answers_populated_only_after_validation() {
        let mut c = controller();
        c.select_category("salas");
        c.go_to_next_step();
        c.input(Field::Style, "moderno");

        assert_eq!(c.go_to_next_step(), StepOutcome::Blocked(
            ValidationIssue::MissingCharacteristics(vec![Field::Material, Field::Color, Field::Budget])
        ));
        assert!(c.answers().style.is_empty());
        assert_eq!(c.answers().category, "salas");
    }

    #[test]
    fn test_invalid_marker_clears_on_next_input() {
        let mut c = controller();
        c.select_category("salas");
        c.go_to_next_step();
        c.go_to_next_step();
        assert!(c.is_invalid(Field::Style));
        assert!(c.is_invalid(Field::Budget));

        c.input(Field::Style, "m");
        assert!(!c.is_invalid(Field::Style));
        assert!(c.is_invalid(Field::Budget));
    }

    #[test]
    fn test_prev_step_needs_no_validation() {
        let mut c = controller();
        assert!(!c.go_to_prev_step());

        c.select_category("comedores");
        c.go_to_next_step();
        assert!(c.go_to_prev_step());
        assert_eq!(c.step(), Step::Category);
        assert_eq!(c.visible_step(), Step::Category);
    }

    #[test]
    fn test_step_stays_in_range() {
        let mut c = controller();
        c.select_category("salas");
        c.go_to_next_step();
        fill_characteristics(&mut c);
        c.go_to_next_step();
        assert_eq!(c.step(), Step::Contact);
        assert_eq!(c.go_to_next_step(), StepOutcome::AtLastStep);
        assert_eq!(c.step().number(), 3);
    }

    #[test]
    fn test_show_step_unknown_is_ignored() {
        let mut c = controller();
        assert!(!c.show_step(7));
        assert!(!c.show_step(0));
        assert_eq!(c.visible_step(), Step::Category);
        assert!(c.show_step(2));
        assert_eq!(c.visible_step(), Step::Characteristics);
        assert_eq!(c.step(), Step::Category);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut c = controller();
        c.select_category("salas");
        c.go_to_next_step();
        c.go_to_next_step();

        c.reset_wizard();
        let once = (c.state().clone(), c.form().clone(), c.invalid_fields().count());
        c.reset_wizard();
        let twice = (c.state().clone(), c.form().clone(), c.invalid_fields().count());

        assert_eq!(once, twice);
        assert_eq!(c.step(), Step::Category);
        assert_eq!(c.answers(), &Answers::default());
        assert_eq!(once.2, 0);
    }

    #[test]
    fn test_button_state_machine() {
        let mut c = controller();
        let b = c.buttons();
        assert!(!b.previous_visible);
        assert!(b.next_visible);
        assert!(!b.next_enabled);
        assert!(!b.submit_visible);

        c.select_category("comedores");
        assert!(c.buttons().next_enabled);

        c.go_to_next_step();
        let b = c.buttons();
        assert!(b.previous_visible);
        assert!(b.next_visible && b.next_enabled);

        fill_characteristics(&mut c);
        c.go_to_next_step();
        let b = c.buttons();
        assert!(b.previous_visible);
        assert!(!b.next_visible);
        assert!(b.submit_visible);
    }

    #[test]
    fn test_submit_not_ready_before_last_step() {
        let mut c = controller();
        assert_eq!(c.submit(), SubmitOutcome::NotReady);
    }

    #[test]
    fn test_full_scenario() {
        let mut c = controller();
        c.reset_wizard();

        c.select_category("comedores");
        assert!(c.buttons().next_enabled);
        assert!(matches!(c.go_to_next_step(), StepOutcome::Advanced(Step::Characteristics)));

        c.input(Field::Material, "roble");
        c.input(Field::Color, "blanco");
        c.input(Field::Budget, "12000");
        assert!(matches!(c.go_to_next_step(), StepOutcome::Blocked(_)));
        assert_eq!(c.step(), Step::Characteristics);
        assert!(!notice_text(&c).is_empty());

        c.input(Field::Style, "industrial");
        assert!(matches!(c.go_to_next_step(), StepOutcome::Advanced(Step::Contact)));

        c.input(Field::ContactName, "Ana");
        c.input(Field::ContactPhone, "555-123-4567");
        assert_eq!(c.submit(), SubmitOutcome::Blocked(ValidationIssue::NameFormat));
        assert_eq!(notice_text(&c), "Please enter your first and last name");
        assert!(c.is_invalid(Field::ContactName));
        assert!(!c.is_invalid(Field::ContactPhone));

        c.input(Field::ContactName, "Ana Lopez");
        c.set_urgent(true);
        let SubmitOutcome::Submitted(submission) = c.submit() else {
            panic!("expected submission");
        };
        assert!(submission.message.contains("Quote request: Comedores"));
        assert!(submission.message.contains("- Style: industrial"));
        assert!(submission.message.contains("URGENT"));
        assert!(submission.link.starts_with("https://wa.me/5215555555555?text="));

        // Session discarded after submission
        assert_eq!(c.step(), Step::Category);
        assert_eq!(c.answers(), &Answers::default());
    }

    #[test]
    fn test_notice_expires() {
        let mut c = controller();
        c.notify(NoticeLevel::Info, "hello");
        let created = c.notices.back().unwrap().created_at;
        assert!(c.current_notice(created).is_some());
        assert!(c.current_notice(created + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_notice_queue_bounded() {
        let mut c = controller();
        for i in 0..20 {
            c.notify(NoticeLevel::Info, format!("n{i}"));
        }
        assert_eq!(c.notices.len(), MAX_NOTICES);
        assert_eq!(notice_text(&c), "n19");
    }
}
