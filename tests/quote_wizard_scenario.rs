//! The quote wizard driven end to end through its controller, the way a
//! dialog would: open, fill each step, hit validation, submit.

use std::time::{Duration, Instant};

use showroom::quote::{
    ContactMethod, DialogEvent, DialogHost, Field, HandoffTarget, NoticeLevel, Step, StepOutcome,
    SubmitOutcome, ValidationIssue, WizardController,
};

#[derive(Default)]
struct PageStub {
    overlay_cleared: bool,
    scroll_restored: bool,
}

impl DialogHost for PageStub {
    fn clear_overlay(&mut self) {
        self.overlay_cleared = true;
    }

    fn restore_scroll(&mut self) {
        self.scroll_restored = true;
    }
}

fn controller() -> WizardController {
    WizardController::new(
        HandoffTarget {
            chat_base_url: "https://wa.me".to_string(),
            phone_number: "+52 1 55 5555 5555".to_string(),
        },
        Duration::from_secs(3),
    )
}

#[test]
fn test_dining_room_request() {
    let mut page = PageStub::default();
    let mut wizard = controller();
    wizard.on_dialog_event(DialogEvent::Opened, &mut page);

    // Step 1: Next disabled until a category is chosen
    assert!(!wizard.buttons().next_enabled);
    assert!(!wizard.buttons().previous_visible);
    wizard.select_category("comedores");
    assert!(wizard.buttons().next_enabled);
    assert_eq!(wizard.go_to_next_step(), StepOutcome::Advanced(Step::Characteristics));

    // Step 2: empty style blocks with a notice and a marker
    wizard.input(Field::Material, "roble");
    wizard.input(Field::Color, "nogal");
    wizard.input(Field::Budget, "25000");
    let outcome = wizard.go_to_next_step();
    assert_eq!(
        outcome,
        StepOutcome::Blocked(ValidationIssue::MissingCharacteristics(vec![Field::Style]))
    );
    assert_eq!(wizard.step(), Step::Characteristics);
    assert!(wizard.is_invalid(Field::Style));
    let notice = wizard.current_notice(Instant::now()).unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);

    wizard.input(Field::Style, "rustico");
    assert!(!wizard.is_invalid(Field::Style));
    assert_eq!(wizard.go_to_next_step(), StepOutcome::Advanced(Step::Contact));
    assert!(wizard.buttons().submit_visible);
    assert!(!wizard.buttons().next_visible);

    // Step 3: single-token name is rejected with the name message
    wizard.input(Field::ContactName, "Ana");
    wizard.input(Field::ContactPhone, "555-123-4567");
    assert_eq!(
        wizard.submit(),
        SubmitOutcome::Blocked(ValidationIssue::NameFormat)
    );
    assert!(wizard.is_invalid(Field::ContactName));
    assert!(!wizard.is_invalid(Field::ContactPhone));

    wizard.input(Field::ContactName, "Ana Torres");
    wizard.set_contact_method(ContactMethod::Phone);
    wizard.set_urgent(true);

    let SubmitOutcome::Submitted(submission) = wizard.submit() else {
        panic!("expected the request to be submitted");
    };
    assert!(submission.message.starts_with("Quote request: Comedores"));
    assert!(submission.message.contains("- Style: rustico"));
    assert!(submission.message.contains("- Preferred contact: Phone call"));
    assert!(submission.message.contains("URGENT"));
    assert!(submission
        .link
        .starts_with("https://wa.me/5215555555555?text=Quote%20request"));

    // Submitting resets the session
    assert_eq!(wizard.step(), Step::Category);
    assert_eq!(wizard.answers(), &Default::default());

    wizard.on_dialog_event(DialogEvent::Closed, &mut page);
    assert!(page.overlay_cleared);
    assert!(page.scroll_restored);
}

#[test]
fn test_going_back_keeps_draft() {
    let mut page = PageStub::default();
    let mut wizard = controller();
    wizard.on_dialog_event(DialogEvent::Opened, &mut page);

    wizard.select_category("salas");
    wizard.go_to_next_step();
    wizard.input(Field::Style, "moderno");
    assert!(wizard.go_to_prev_step());
    assert_eq!(wizard.step(), Step::Category);
    assert!(!wizard.go_to_prev_step());

    wizard.go_to_next_step();
    assert_eq!(wizard.form().text(Field::Style), "moderno");
}
