//! Browser rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::{Browser, Screen, STYLE_FILTERS};
use crate::browse::{CategoryPage, LoadState, ProductView, RecommendationsPanel};
use crate::catalog::Product;
use crate::preferences::ViewMode;

/// Products per row in grid mode
const GRID_COLUMNS: usize = 3;

impl Browser {
    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(5),    // Body
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        match self.screen {
            Screen::Categories => self.render_categories(frame, chunks[1]),
            Screen::Category => {
                if let Some(page) = &self.page {
                    render_category_page(frame, chunks[1], page, self.style_filter);
                }
            }
            Screen::Product => self.render_product(frame, chunks[1]),
        }
        self.render_footer(frame, chunks[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let crumb = match (self.screen, &self.page) {
            (Screen::Categories, _) | (_, None) => String::new(),
            (_, Some(page)) => format!(" › {}", page.category.name),
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "Showroom",
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(crumb),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let keys = match self.screen {
            Screen::Categories => "[↑↓] choose  [Enter] open  [c] quote  [q] quit",
            Screen::Category => {
                "[←→] page  [s] sort  [f] style  [v] view  [Enter] details  [Esc] back  [c] quote"
            }
            Screen::Product => "[Esc] back  [c] quote  [q] quit",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(keys, Style::default().fg(Color::DarkGray))),
            area,
        );
    }

    fn render_categories(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title(" Categories ").borders(Borders::ALL);
        match &self.categories_load {
            LoadState::Failed(message) => {
                render_error_panel(frame, area, block, message);
                return;
            }
            LoadState::Loading | LoadState::Idle => {
                frame.render_widget(Paragraph::new("Loading...").block(block), area);
                return;
            }
            LoadState::Loaded => {}
        }

        let items: Vec<ListItem> = self
            .categories
            .iter()
            .map(|c| ListItem::new(c.name.as_str()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.categories_state);
    }

    fn render_product(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let Some(view) = &self.product else {
            return;
        };
        let detail = match view {
            ProductView::Loading(_) => {
                frame.render_widget(Paragraph::new("Loading...").block(block), area);
                return;
            }
            ProductView::NotFound(id) => {
                let text = vec![
                    Line::from(Span::styled(
                        "Product not found",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!("No product with id {id} exists.")),
                    Line::from(""),
                    Line::from(Span::styled(
                        "[Esc] back to the catalog",
                        Style::default().fg(Color::Cyan),
                    )),
                ];
                frame.render_widget(
                    Paragraph::new(text).alignment(Alignment::Center).block(block),
                    area,
                );
                return;
            }
            ProductView::Failed { message, .. } => {
                render_error_panel(frame, area, block, message);
                return;
            }
            ProductView::Loaded(detail) => detail,
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(4)])
            .split(area);

        let product = &detail.product;
        let mut lines = vec![
            Line::from(Span::styled(
                product.name.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                product.category.as_str(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(product.description.as_str()),
            Line::from(""),
        ];
        if let Some(style) = &detail.style {
            lines.push(Line::from(format!("Style: {style}")));
        }
        if let Some(discount) = product.discount.filter(|d| *d > 0.0) {
            lines.push(Line::from(Span::styled(
                format!("{discount:.0}% off"),
                Style::default().fg(Color::Green),
            )));
        }
        if !product.available {
            lines.push(Line::from(Span::styled(
                "Out of stock",
                Style::default().fg(Color::Red),
            )));
        }
        for feature in &product.features {
            lines.push(Line::from(format!("• {feature}")));
        }
        if !detail.images.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("{} images", detail.images.len()),
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(block),
            chunks[0],
        );

        let related = match &self.recommendations {
            RecommendationsPanel::Hidden => return,
            RecommendationsPanel::Loading => vec![Line::from(Span::styled(
                "Loading related products...",
                Style::default().fg(Color::DarkGray),
            ))],
            RecommendationsPanel::Loaded(products) => vec![Line::from(
                products
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join("  ·  "),
            )],
        };
        frame.render_widget(
            Paragraph::new(related).block(
                Block::default()
                    .title(" You may also like ")
                    .borders(Borders::ALL),
            ),
            chunks[1],
        );
    }
}

fn render_category_page(frame: &mut Frame, area: Rect, page: &CategoryPage, style_filter: usize) {
    let query = page.query();
    let total = page.page().map_or(0, |p| p.total_pages);
    let style = STYLE_FILTERS[style_filter].unwrap_or("all");
    let title = format!(
        " {} · page {}/{} · sort: {} · style: {} · {} ",
        page.category.name,
        query.page,
        total.max(1),
        query.sort.label(),
        style,
        page.view_mode().label()
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    match page.load_state() {
        LoadState::Failed(message) => {
            render_error_panel(frame, area, block, message);
            return;
        }
        LoadState::Loading if page.page().is_none() => {
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
            return;
        }
        _ => {}
    }

    if page.products().is_empty() {
        frame.render_widget(
            Paragraph::new("No products in this category yet.").block(block),
            area,
        );
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match page.view_mode() {
        ViewMode::List => render_list(frame, inner, page),
        ViewMode::Grid => render_grid(frame, inner, page),
    }
}

fn product_summary(product: &Product) -> String {
    match product.discount.filter(|d| *d > 0.0) {
        Some(d) => format!("{} (-{d:.0}%)", product.name),
        None => product.name.clone(),
    }
}

fn render_list(frame: &mut Frame, area: Rect, page: &CategoryPage) {
    let items: Vec<ListItem> = page
        .products()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let style = if i == page.selected_index() {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(product_summary(p), style),
                Span::styled(
                    format!("  {}", p.description),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items), area);
}

fn render_grid(frame: &mut Frame, area: Rect, page: &CategoryPage) {
    let products = page.products();
    let rows = products.len().div_ceil(GRID_COLUMNS);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row, chunk) in products.chunks(GRID_COLUMNS).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(row_areas[row]);

        for (col, product) in chunk.iter().enumerate() {
            let index = row * GRID_COLUMNS + col;
            let border = if index == page.selected_index() {
                Color::Cyan
            } else {
                Color::DarkGray
            };
            let card = Paragraph::new(vec![
                Line::from(Span::styled(
                    product_summary(product),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    product.tags.join(", "),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            );
            frame.render_widget(card, cells[col]);
        }
    }
}

fn render_error_panel(frame: &mut Frame, area: Rect, block: Block, message: &str) {
    let text = vec![
        Line::from(Span::styled(
            "Could not load the catalog",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(message, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled("[r] retry", Style::default().fg(Color::Cyan))),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}
