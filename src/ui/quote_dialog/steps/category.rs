//! Furniture type step rendering

use crate::ui::quote_dialog::QuoteDialog;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

impl QuoteDialog {
    pub(crate) fn render_category_step(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Description
                Constraint::Min(4),    // Options
            ])
            .split(area);

        let desc = Paragraph::new(vec![Line::from(
            "What kind of furniture are you looking for? Use the arrow keys to choose.",
        )])
        .style(Style::default().fg(Color::White));
        frame.render_widget(desc, chunks[0]);

        self.render_fields(frame, chunks[1]);
    }
}
