//! Form field widgets for the quote dialog

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use crate::quote::{ContactMethod, Field, FormValues, CATEGORY_OPTIONS};

/// Longest value accepted by single-line inputs
const MAX_INPUT_LEN: usize = 120;

/// A form field widget that can handle different input types
pub enum FormField {
    /// Single-line text input
    TextInput {
        value: String,
        cursor_pos: usize,
        placeholder: String,
    },
    /// Multi-line text input using tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
    },
    /// One of a fixed set of options; nothing is chosen until the user moves
    Choice {
        keys: Vec<String>,
        labels: Vec<String>,
        list_state: ListState,
    },
    /// Boolean toggle
    Toggle {
        value: bool,
        true_label: String,
        false_label: String,
    },
}

impl FormField {
    /// Build the widget for a wizard field, seeded from the draft values
    pub fn for_field(field: Field, form: &FormValues) -> Self {
        match field {
            Field::Category => {
                let keys: Vec<String> = CATEGORY_OPTIONS.iter().map(|(k, _)| k.to_string()).collect();
                let labels = CATEGORY_OPTIONS.iter().map(|(_, l)| l.to_string()).collect();
                let mut list_state = ListState::default();
                list_state.select(keys.iter().position(|k| *k == form.category));
                FormField::Choice {
                    keys,
                    labels,
                    list_state,
                }
            }
            Field::PreferredContact => {
                let methods = ContactMethod::all();
                let mut list_state = ListState::default();
                list_state.select(methods.iter().position(|m| *m == form.preferred_contact));
                FormField::Choice {
                    keys: methods.iter().map(|m| m.label().to_string()).collect(),
                    labels: methods.iter().map(|m| m.label().to_string()).collect(),
                    list_state,
                }
            }
            Field::Urgent => FormField::Toggle {
                value: form.urgent,
                true_label: "Yes".to_string(),
                false_label: "No".to_string(),
            },
            Field::ExtraNotes => {
                let mut textarea = TextArea::default();
                textarea.insert_str(&form.extra_notes);
                FormField::TextArea {
                    textarea: Box::new(textarea),
                    placeholder: placeholder(field).to_string(),
                }
            }
            _ => {
                let value = form.text(field).to_string();
                FormField::TextInput {
                    cursor_pos: value.chars().count(),
                    value,
                    placeholder: placeholder(field).to_string(),
                }
            }
        }
    }

    /// Get the current value as a string; choices yield their key
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
            FormField::Choice {
                keys, list_state, ..
            } => list_state
                .selected()
                .and_then(|i| keys.get(i))
                .cloned()
                .unwrap_or_default(),
            FormField::Toggle { value, .. } => value.to_string(),
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match self {
            FormField::Choice { list_state, .. } => list_state.selected(),
            _ => None,
        }
    }

    pub fn toggle_value(&self) -> Option<bool> {
        match self {
            FormField::Toggle { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Whether Enter belongs to the field rather than the dialog
    pub fn captures_enter(&self) -> bool {
        matches!(self, FormField::TextArea { .. })
    }

    /// Handle a key event, returns true if the value may have changed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if value.chars().count() < MAX_INPUT_LEN {
                        let idx = byte_index(value, *cursor_pos);
                        value.insert(idx, c);
                        *cursor_pos += 1;
                    }
                    true
                }
                KeyCode::Backspace => {
                    if *cursor_pos > 0 {
                        *cursor_pos -= 1;
                        let idx = byte_index(value, *cursor_pos);
                        value.remove(idx);
                    }
                    true
                }
                KeyCode::Delete => {
                    if *cursor_pos < value.chars().count() {
                        let idx = byte_index(value, *cursor_pos);
                        value.remove(idx);
                    }
                    true
                }
                KeyCode::Left => {
                    *cursor_pos = cursor_pos.saturating_sub(1);
                    false
                }
                KeyCode::Right => {
                    if *cursor_pos < value.chars().count() {
                        *cursor_pos += 1;
                    }
                    false
                }
                KeyCode::Home => {
                    *cursor_pos = 0;
                    false
                }
                KeyCode::End => {
                    *cursor_pos = value.chars().count();
                    false
                }
                _ => false,
            },
            FormField::TextArea { textarea, .. } => textarea.input(key),
            FormField::Choice {
                keys, list_state, ..
            } => {
                let len = keys.len();
                if len == 0 {
                    return false;
                }
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        let next = match list_state.selected() {
                            Some(0) | None => len - 1,
                            Some(i) => i - 1,
                        };
                        list_state.select(Some(next));
                        true
                    }
                    KeyCode::Down | KeyCode::Char('j') | KeyCode::Char(' ') => {
                        let next = match list_state.selected() {
                            Some(i) if i + 1 < len => i + 1,
                            Some(_) => 0,
                            None => 0,
                        };
                        list_state.select(Some(next));
                        true
                    }
                    _ => false,
                }
            }
            FormField::Toggle { value, .. } => match key.code {
                KeyCode::Char(' ') => {
                    *value = !*value;
                    true
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    *value = false;
                    true
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    *value = true;
                    true
                }
                _ => false,
            },
        }
    }

    /// Get the height needed to render this field
    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextInput { .. } => 1,
            FormField::TextArea { .. } => 4,
            FormField::Choice { keys, .. } => (keys.len() as u16).min(7),
            FormField::Toggle { .. } => 1,
        }
    }

    /// Render the field
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, invalid: bool) {
        let border_color = if invalid {
            Color::Red
        } else if focused {
            Color::Cyan
        } else {
            Color::Gray
        };

        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
            } => {
                let content = if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    let mut text = value.clone();
                    if focused {
                        text.insert(byte_index(value, *cursor_pos), '|');
                    }
                    Line::from(Span::raw(text))
                };

                let para = Paragraph::new(content).style(Style::default().fg(if invalid {
                    Color::Red
                } else if focused {
                    Color::White
                } else {
                    Color::Gray
                }));
                frame.render_widget(para, area);
            }
            FormField::TextArea {
                textarea,
                placeholder,
            } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border_color)),
                );
                textarea.set_placeholder_text(placeholder.clone());
                textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));

                frame.render_widget(&**textarea, area);
            }
            FormField::Choice {
                labels, list_state, ..
            } => {
                let items: Vec<ListItem> = labels
                    .iter()
                    .map(|label| ListItem::new(Span::raw(label.as_str())))
                    .collect();

                let list = List::new(items)
                    .style(Style::default().fg(if invalid { Color::Red } else { Color::Gray }))
                    .highlight_style(
                        Style::default()
                            .add_modifier(Modifier::BOLD)
                            .fg(border_color),
                    )
                    .highlight_symbol("> ");

                frame.render_stateful_widget(list, area, list_state);
            }
            FormField::Toggle {
                value,
                true_label,
                false_label,
            } => {
                let on = Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD);
                let off = Style::default().fg(Color::DarkGray);
                let line = Line::from(vec![
                    Span::styled(format!("[{}]", true_label), if *value { on } else { off }),
                    Span::raw(" "),
                    Span::styled(format!("[{}]", false_label), if *value { off } else { on }),
                ]);
                frame.render_widget(Paragraph::new(line), area);
            }
        }
    }
}

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::Style => "e.g. modern, rustic",
        Field::Material => "e.g. oak, leather",
        Field::Color => "e.g. walnut",
        Field::Budget => "e.g. 15,000 MXN",
        Field::ExtraNotes => "Measurements, delivery details...",
        Field::ContactName => "First and last name",
        Field::ContactPhone => "10 digits",
        Field::ContactEmail => "optional",
        _ => "",
    }
}

/// Byte offset of the `chars`-th character
fn byte_index(value: &str, chars: usize) -> usize {
    value
        .char_indices()
        .nth(chars)
        .map_or(value.len(), |(i, _)| i)
}
