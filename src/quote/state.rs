//! Plain data for the quotation wizard: steps, fields, draft values, answers.

use serde::{Deserialize, Serialize};

/// Number of steps in the wizard
pub const TOTAL_STEPS: u8 = 3;

/// Furniture categories offered on the first step, with their display labels.
/// Keys outside this table are accepted as free-form and shown raw.
pub const CATEGORY_OPTIONS: &[(&str, &str)] = &[
    ("salas", "Salas"),
    ("comedores", "Comedores"),
    ("recamaras", "Recámaras"),
    ("cocinas", "Cocinas"),
    ("oficina", "Oficina"),
    ("exterior", "Exterior"),
    ("otro", "Otro"),
];

/// Display label for a category key, falling back to the raw key
pub fn category_label(key: &str) -> &str {
    CATEGORY_OPTIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

/// The three linear stages of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    #[default]
    Category,
    Characteristics,
    Contact,
}

impl Step {
    pub fn all() -> &'static [Step] {
        &[Step::Category, Step::Characteristics, Step::Contact]
    }

    /// 1-indexed step number
    pub fn number(self) -> u8 {
        match self {
            Step::Category => 1,
            Step::Characteristics => 2,
            Step::Contact => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Step> {
        match n {
            1 => Some(Step::Category),
            2 => Some(Step::Characteristics),
            3 => Some(Step::Contact),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Option<Step> {
        Step::from_number(self.number().saturating_sub(1))
    }

    pub fn is_last(self) -> bool {
        self.number() == TOTAL_STEPS
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Category => "Furniture type",
            Step::Characteristics => "Characteristics",
            Step::Contact => "Contact details",
        }
    }

    /// Fields edited on this step, in display order
    pub fn fields(self) -> &'static [Field] {
        match self {
            Step::Category => &[Field::Category],
            Step::Characteristics => &[
                Field::Style,
                Field::Material,
                Field::Color,
                Field::Budget,
                Field::ExtraNotes,
            ],
            Step::Contact => &[
                Field::ContactName,
                Field::ContactPhone,
                Field::ContactEmail,
                Field::PreferredContact,
                Field::Urgent,
            ],
        }
    }
}

/// Every input of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Category,
    Style,
    Material,
    Color,
    Budget,
    ExtraNotes,
    ContactName,
    ContactPhone,
    ContactEmail,
    PreferredContact,
    Urgent,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Category => "Furniture type",
            Field::Style => "Style",
            Field::Material => "Material",
            Field::Color => "Color",
            Field::Budget => "Budget",
            Field::ExtraNotes => "Extra notes",
            Field::ContactName => "Full name",
            Field::ContactPhone => "Phone",
            Field::ContactEmail => "Email",
            Field::PreferredContact => "Preferred contact",
            Field::Urgent => "Urgent",
        }
    }

    pub fn step(self) -> Step {
        match self {
            Field::Category => Step::Category,
            Field::Style | Field::Material | Field::Color | Field::Budget | Field::ExtraNotes => {
                Step::Characteristics
            }
            _ => Step::Contact,
        }
    }

    /// Whether the field holds free text (as opposed to a choice or toggle)
    pub fn is_text(self) -> bool {
        !matches!(
            self,
            Field::Category | Field::PreferredContact | Field::Urgent
        )
    }
}

/// How the customer prefers to be contacted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Phone,
    #[default]
    MessageApp,
    Email,
}

impl ContactMethod {
    pub fn all() -> &'static [ContactMethod] {
        &[
            ContactMethod::Phone,
            ContactMethod::MessageApp,
            ContactMethod::Email,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            ContactMethod::Phone => "Phone call",
            ContactMethod::MessageApp => "WhatsApp",
            ContactMethod::Email => "Email",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ContactMethod::Phone => ContactMethod::MessageApp,
            ContactMethod::MessageApp => ContactMethod::Email,
            ContactMethod::Email => ContactMethod::Phone,
        }
    }
}

/// Answers collected from validated steps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Answers {
    pub category: String,
    pub style: String,
    pub material: String,
    pub color: String,
    pub budget: String,
    pub extra_notes: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub preferred_contact: ContactMethod,
    pub urgent: bool,
}

impl Answers {
    /// Copy one step's draft values, trimmed
    pub fn collect(&mut self, step: Step, form: &FormValues) {
        match step {
            Step::Category => {
                self.category = form.category.trim().to_string();
            }
            Step::Characteristics => {
                self.style = form.style.trim().to_string();
                self.material = form.material.trim().to_string();
                self.color = form.color.trim().to_string();
                self.budget = form.budget.trim().to_string();
                self.extra_notes = form.extra_notes.trim().to_string();
            }
            Step::Contact => {
                self.contact_name = form.contact_name.trim().to_string();
                self.contact_phone = form.contact_phone.trim().to_string();
                self.contact_email = form.contact_email.trim().to_string();
                self.preferred_contact = form.preferred_contact;
                self.urgent = form.urgent;
            }
        }
    }
}

/// Draft input as currently shown in the dialog
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormValues {
    pub category: String,
    pub style: String,
    pub material: String,
    pub color: String,
    pub budget: String,
    pub extra_notes: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub preferred_contact: ContactMethod,
    pub urgent: bool,
}

impl FormValues {
    /// Current text of a field; choices render as their stored key
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Category => &self.category,
            Field::Style => &self.style,
            Field::Material => &self.material,
            Field::Color => &self.color,
            Field::Budget => &self.budget,
            Field::ExtraNotes => &self.extra_notes,
            Field::ContactName => &self.contact_name,
            Field::ContactPhone => &self.contact_phone,
            Field::ContactEmail => &self.contact_email,
            Field::PreferredContact => self.preferred_contact.label(),
            Field::Urgent => {
                if self.urgent {
                    "yes"
                } else {
                    "no"
                }
            }
        }
    }

    /// Set a text field. Returns false for fields that are not free text.
    pub fn set_text(&mut self, field: Field, value: &str) -> bool {
        let slot = match field {
            Field::Category => &mut self.category,
            Field::Style => &mut self.style,
            Field::Material => &mut self.material,
            Field::Color => &mut self.color,
            Field::Budget => &mut self.budget,
            Field::ExtraNotes => &mut self.extra_notes,
            Field::ContactName => &mut self.contact_name,
            Field::ContactPhone => &mut self.contact_phone,
            Field::ContactEmail => &mut self.contact_email,
            Field::PreferredContact | Field::Urgent => return false,
        };
        *slot = value.to_string();
        true
    }
}

/// State of one quotation dialog session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardState {
    pub step: Step,
    pub answers: Answers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbers_round_trip() {
        for step in Step::all() {
            assert_eq!(Step::from_number(step.number()), Some(*step));
        }
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(4), None);
    }

    #[test]
    fn test_step_neighbours() {
        assert_eq!(Step::Category.prev(), None);
        assert_eq!(Step::Category.next(), Some(Step::Characteristics));
        assert_eq!(Step::Contact.next(), None);
        assert!(Step::Contact.is_last());
    }

    #[test]
    fn test_every_field_belongs_to_its_step() {
        for step in Step::all() {
            for field in step.fields() {
                assert_eq!(field.step(), *step);
            }
        }
    }

    #[test]
    fn test_category_label_fallback() {
        assert_eq!(category_label("salas"), "Salas");
        assert_eq!(category_label("recamaras"), "Recámaras");
        assert_eq!(category_label("hamacas"), "hamacas");
    }

    #[test]
    fn test_default_contact_method_is_message_app() {
        assert_eq!(Answers::default().preferred_contact, ContactMethod::MessageApp);
        assert!(!Answers::default().urgent);
    }

    #[test]
    fn test_collect_only_touches_one_step() {
        let form = FormValues {
            category: " salas ".to_string(),
            style: "moderno".to_string(),
            ..FormValues::default()
        };
        let mut answers = Answers::default();
        answers.collect(Step::Category, &form);
        assert_eq!(answers.category, "salas");
        assert!(answers.style.is_empty());
    }

    #[test]
    fn test_set_text_rejects_choice_fields() {
        let mut form = FormValues::default();
        assert!(form.set_text(Field::Color, "nogal"));
        assert_eq!(form.text(Field::Color), "nogal");
        assert!(!form.set_text(Field::Urgent, "yes"));
        assert!(!form.urgent);
    }
}
