//! Contact details step rendering

use crate::ui::quote_dialog::QuoteDialog;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

impl QuoteDialog {
    pub(crate) fn render_contact_step(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Description
                Constraint::Min(8),    // Fields
            ])
            .split(area);

        let desc = Paragraph::new(vec![Line::from(vec![
            Span::raw("How can we reach you? "),
            Span::styled(
                "Name and phone are required.",
                Style::default().fg(Color::DarkGray),
            ),
        ])]);
        frame.render_widget(desc, chunks[0]);

        self.render_fields(frame, chunks[1]);
    }
}
