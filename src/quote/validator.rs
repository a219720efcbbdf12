//! Per-step validation of the wizard's draft values.

use thiserror::Error;

use super::state::{Field, FormValues, Step};

/// Minimum number of digits in a contact phone number
pub const MIN_PHONE_DIGITS: usize = 10;

/// Why a step cannot be left. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("Please select a furniture type")]
    MissingCategory,

    #[error("Please complete: {}", field_list(.0))]
    MissingCharacteristics(Vec<Field>),

    #[error("Please enter your name")]
    NameEmpty,

    #[error("Please enter your first and last name")]
    NameFormat,

    #[error("Please enter a phone number")]
    PhoneEmpty,

    #[error("The phone number must have at least 10 digits")]
    PhoneFormat,

    #[error("Please enter a valid email address")]
    EmailFormat,
}

fn field_list(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.label().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationIssue {
    /// Fields that get the invalid marker
    pub fn fields(&self) -> Vec<Field> {
        match self {
            ValidationIssue::MissingCategory => vec![Field::Category],
            ValidationIssue::MissingCharacteristics(fields) => fields.clone(),
            ValidationIssue::NameEmpty | ValidationIssue::NameFormat => vec![Field::ContactName],
            ValidationIssue::PhoneEmpty | ValidationIssue::PhoneFormat => {
                vec![Field::ContactPhone]
            }
            ValidationIssue::EmailFormat => vec![Field::ContactEmail],
        }
    }
}

/// Validate the draft values for `step`. Pure: reads the snapshot only.
pub fn validate_step(step: Step, form: &FormValues) -> Result<(), ValidationIssue> {
    match step {
        Step::Category => validate_category(form),
        Step::Characteristics => validate_characteristics(form),
        Step::Contact => validate_contact(form),
    }
}

fn validate_category(form: &FormValues) -> Result<(), ValidationIssue> {
    if form.category.trim().is_empty() {
        return Err(ValidationIssue::MissingCategory);
    }
    Ok(())
}

fn validate_characteristics(form: &FormValues) -> Result<(), ValidationIssue> {
    let missing: Vec<Field> = [Field::Style, Field::Material, Field::Color, Field::Budget]
        .into_iter()
        .filter(|f| form.text(*f).trim().is_empty())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationIssue::MissingCharacteristics(missing))
    }
}

/// Checks run in order: name-empty, name-format, phone-empty, phone-format, email
fn validate_contact(form: &FormValues) -> Result<(), ValidationIssue> {
    let name = form.contact_name.trim();
    if name.is_empty() {
        return Err(ValidationIssue::NameEmpty);
    }
    if !has_full_name(name) {
        return Err(ValidationIssue::NameFormat);
    }

    let phone = form.contact_phone.trim();
    if phone.is_empty() {
        return Err(ValidationIssue::PhoneEmpty);
    }
    if phone_digits(phone).len() < MIN_PHONE_DIGITS {
        return Err(ValidationIssue::PhoneFormat);
    }

    let email = form.contact_email.trim();
    if !email.is_empty() && !looks_like_email(email) {
        return Err(ValidationIssue::EmailFormat);
    }

    Ok(())
}

/// First + last name heuristic: at least two whitespace-separated tokens
pub fn has_full_name(name: &str) -> bool {
    name.split_whitespace().count() >= 2
}

/// Digit-only form of a phone number
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

fn looks_like_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !email.contains(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}
