//! Characteristics step rendering

use crate::quote::category_label;
use crate::ui::quote_dialog::QuoteDialog;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

impl QuoteDialog {
    pub(crate) fn render_characteristics_step(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Selected category
                Constraint::Min(8),    // Fields
            ])
            .split(area);

        let category = category_label(&self.controller().answers().category).to_string();
        let header = Paragraph::new(Line::from(vec![
            Span::raw("Tell us about your "),
            Span::styled(
                category,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(". Notes are optional."),
        ]));
        frame.render_widget(header, chunks[0]);

        self.render_fields(frame, chunks[1]);
    }
}
