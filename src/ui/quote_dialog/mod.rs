//! Quote request dialog: renders the wizard and routes keys to it

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::config::QuoteConfig;
use crate::quote::{
    ContactMethod, DialogEvent, DialogHost, Field, HandoffTarget, NoticeLevel, Step, StepOutcome,
    Submission, SubmitOutcome, WizardController, TOTAL_STEPS,
};
use crate::ui::dialogs::centered_rect;
use crate::ui::form_field::FormField;

mod steps;

/// Result of a key handled by the dialog
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteDialogResult {
    Closed,
    Submitted(Submission),
}

pub struct QuoteDialog {
    pub visible: bool,
    controller: WizardController,
    /// Widgets for the fields of the visible step
    fields: Vec<(Field, FormField)>,
    focus: usize,
}

impl QuoteDialog {
    pub fn new(controller: WizardController) -> Self {
        let mut dialog = Self {
            visible: false,
            controller,
            fields: Vec::new(),
            focus: 0,
        };
        dialog.rebuild_fields();
        dialog
    }

    pub fn from_config(config: &QuoteConfig) -> Self {
        Self::new(WizardController::new(
            HandoffTarget::from_config(config),
            Duration::from_millis(config.notice_ttl_ms),
        ))
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn focused_field(&self) -> Option<Field> {
        self.fields.get(self.focus).map(|(f, _)| *f)
    }

    pub fn open(&mut self, host: &mut dyn DialogHost) {
        self.controller.on_dialog_event(DialogEvent::Opened, host);
        self.visible = true;
        self.rebuild_fields();
    }

    pub fn close(&mut self, host: &mut dyn DialogHost) {
        self.controller.on_dialog_event(DialogEvent::Closed, host);
        self.visible = false;
        self.rebuild_fields();
    }

    fn rebuild_fields(&mut self) {
        let form = self.controller.form();
        self.fields = self
            .controller
            .visible_step()
            .fields()
            .iter()
            .map(|f| (*f, FormField::for_field(*f, form)))
            .collect();
        self.focus = 0;
    }

    /// Push the focused widget's value into the controller
    fn sync_focused(&mut self) {
        let Some((field, widget)) = self.fields.get(self.focus) else {
            return;
        };
        match field {
            Field::Category => self.controller.select_category(&widget.value()),
            Field::PreferredContact => {
                if let Some(method) = widget
                    .selected_index()
                    .and_then(|i| ContactMethod::all().get(i))
                {
                    self.controller.set_contact_method(*method);
                }
            }
            Field::Urgent => {
                if let Some(urgent) = widget.toggle_value() {
                    self.controller.set_urgent(urgent);
                }
            }
            field => self.controller.input(*field, &widget.value()),
        }
    }

    /// Handle a key while visible
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        host: &mut dyn DialogHost,
    ) -> Option<QuoteDialogResult> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.close(host);
                return Some(QuoteDialogResult::Closed);
            }
            KeyCode::Tab => {
                if !self.fields.is_empty() {
                    self.focus = (self.focus + 1) % self.fields.len();
                }
            }
            KeyCode::BackTab => {
                if !self.fields.is_empty() {
                    self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
                }
            }
            KeyCode::PageUp => self.previous(),
            KeyCode::Char('p') if ctrl => self.previous(),
            KeyCode::PageDown => return self.advance(host),
            KeyCode::Char('n') if ctrl => return self.advance(host),
            KeyCode::Enter
                if !self
                    .fields
                    .get(self.focus)
                    .is_some_and(|(_, w)| w.captures_enter()) =>
            {
                return self.advance(host);
            }
            _ => {
                let changed = self
                    .fields
                    .get_mut(self.focus)
                    .is_some_and(|(_, widget)| widget.handle_key(key));
                if changed {
                    self.sync_focused();
                }
            }
        }
        None
    }

    fn previous(&mut self) {
        if self.controller.go_to_prev_step() {
            self.rebuild_fields();
        }
    }

    /// Next on steps 1-2, submit on the last step
    fn advance(&mut self, host: &mut dyn DialogHost) -> Option<QuoteDialogResult> {
        if self.controller.step().is_last() {
            return match self.controller.submit() {
                SubmitOutcome::Submitted(submission) => {
                    self.visible = false;
                    host.clear_overlay();
                    host.restore_scroll();
                    self.rebuild_fields();
                    Some(QuoteDialogResult::Submitted(submission))
                }
                SubmitOutcome::Blocked(_) | SubmitOutcome::NotReady => None,
            };
        }

        if !self.controller.buttons().next_enabled {
            return None;
        }
        if let StepOutcome::Advanced(_) = self.controller.go_to_next_step() {
            self.rebuild_fields();
        }
        None
    }

    pub fn render(&mut self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(70, 80, frame.area());
        frame.render_widget(Clear, area);

        let step = self.controller.visible_step();
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    "Request a quote",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    " · step {}/{}: {} ",
                    step.number(),
                    TOTAL_STEPS,
                    step.title()
                )),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(6),    // Step body
                Constraint::Length(1), // Notice
                Constraint::Length(1), // Buttons
                Constraint::Length(1), // Key help
            ])
            .split(inner);

        match step {
            Step::Category => self.render_category_step(frame, chunks[0]),
            Step::Characteristics => self.render_characteristics_step(frame, chunks[0]),
            Step::Contact => self.render_contact_step(frame, chunks[0]),
        }

        self.render_notice(frame, chunks[1]);
        self.render_buttons(frame, chunks[2]);

        let help = Paragraph::new(Line::from(Span::styled(
            "[Tab] next field  [Enter/PgDn] continue  [PgUp] back  [Esc] close",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(help, chunks[3]);
    }

    /// Label + widget rows for the step's fields
    pub(crate) fn render_fields(&mut self, frame: &mut Frame, area: Rect) {
        let mut constraints: Vec<Constraint> = Vec::new();
        for (_, widget) in &self.fields {
            constraints.push(Constraint::Length(1));
            constraints.push(Constraint::Length(widget.render_height()));
        }
        constraints.push(Constraint::Min(0));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let focus = self.focus;
        for (i, (field, widget)) in self.fields.iter_mut().enumerate() {
            let focused = i == focus;
            let invalid = self.controller.is_invalid(*field);
            let label_style = if invalid {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            frame.render_widget(
                Paragraph::new(Span::styled(format!("{}:", field.label()), label_style)),
                rows[i * 2],
            );
            widget.render(frame, rows[i * 2 + 1], focused, invalid);
        }
    }

    fn render_notice(&self, frame: &mut Frame, area: Rect) {
        let Some(notice) = self.controller.current_notice(Instant::now()) else {
            return;
        };
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Success => Color::Green,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(notice.text.as_str(), Style::default().fg(color))),
            area,
        );
    }

    fn render_buttons(&self, frame: &mut Frame, area: Rect) {
        let buttons = self.controller.buttons();
        let mut spans = Vec::new();
        if buttons.previous_visible {
            spans.push(Span::styled("[ Previous ]", Style::default().fg(Color::Gray)));
            spans.push(Span::raw("  "));
        }
        if buttons.next_visible {
            let style = if buttons.next_enabled {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled("[ Next ]", style));
        }
        if buttons.submit_visible {
            spans.push(Span::styled(
                "[ Send request ]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
