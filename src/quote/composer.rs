//! Builds the quote summary handed off to the chat service.

use super::state::{category_label, Answers};

/// Plain-text summary of the answers. Empty fields produce no line.
pub fn compose_message(answers: &Answers) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "Quote request: {}",
        category_label(answers.category.trim())
    ));

    let characteristics: Vec<String> = [
        ("Style", &answers.style),
        ("Material", &answers.material),
        ("Color", &answers.color),
        ("Budget", &answers.budget),
        ("Notes", &answers.extra_notes),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(label, value)| format!("- {label}: {}", value.trim()))
    .collect();

    if !characteristics.is_empty() {
        lines.push(String::new());
        lines.push("Characteristics:".to_string());
        lines.extend(characteristics);
    }

    lines.push(String::new());
    lines.push("Contact:".to_string());
    lines.push(format!("- Name: {}", answers.contact_name.trim()));
    if !answers.contact_phone.trim().is_empty() {
        lines.push(format!("- Phone: {}", answers.contact_phone.trim()));
    }
    if !answers.contact_email.trim().is_empty() {
        lines.push(format!("- Email: {}", answers.contact_email.trim()));
    }
    lines.push(format!(
        "- Preferred contact: {}",
        answers.preferred_contact.label()
    ));

    if answers.urgent {
        lines.push(String::new());
        lines.push("URGENT: please contact me as soon as possible".to_string());
    }

    lines.join("\n")
}

/// `<base>/<digits>?text=<encoded message>`
pub fn handoff_link(chat_base_url: &str, phone_number: &str, message: &str) -> String {
    let digits: String = phone_number.chars().filter(char::is_ascii_digit).collect();
    format!(
        "{}/{}?text={}",
        chat_base_url.trim_end_matches('/'),
        digits,
        urlencoding::encode(message)
    )
}
