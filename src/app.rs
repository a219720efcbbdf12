use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use crate::browse::{load_recommendations, RetryPolicy};
use crate::catalog::{Category, Product, ProductDetail, ProductPage};
use crate::client::{CatalogClient, ClientError};
use crate::config::Config;
use crate::preferences::Preferences;
use crate::quote::{DialogHost, Submission};
use crate::ui::{Browser, BrowserAction, QuoteDialog, QuoteDialogResult, TerminalGuard};

/// Which screens the app starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Browse { category: Option<i64> },
    /// Only the quote dialog; exits after submit or close
    QuoteOnly,
}

/// Network results delivered back to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    Categories(Result<Vec<Category>, ClientError>),
    Page {
        category_id: i64,
        seq: u64,
        result: Result<ProductPage, ClientError>,
    },
    Product {
        id: i64,
        result: Result<ProductDetail, ClientError>,
    },
    Recommendations {
        product_id: i64,
        result: Result<Vec<Product>, ClientError>,
    },
}

/// No page behind the dialog in quote-only mode
struct NoHost;

impl DialogHost for NoHost {
    fn clear_overlay(&mut self) {}
    fn restore_scroll(&mut self) {}
}

pub struct App {
    config: Config,
    mode: AppMode,
    client: CatalogClient,
    browser: Browser,
    quote_dialog: QuoteDialog,
    retry_policy: RetryPolicy,
    preferences: Preferences,
    tx: mpsc::UnboundedSender<AppEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
    /// Submissions made during the session, printed on exit
    submissions: Vec<Submission>,
}

impl App {
    pub fn new(config: Config, mode: AppMode) -> Result<Self> {
        let client = CatalogClient::from_config(&config.client)?;
        let preferences = Preferences::load(&config.preferences_path());
        let browser = Browser::new(config.catalog.page_size, preferences.view_mode);
        let quote_dialog = QuoteDialog::from_config(&config.quote);
        let retry_policy = RetryPolicy::from_config(&config.recommendations);
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            mode,
            client,
            browser,
            quote_dialog,
            retry_policy,
            preferences,
            tx,
            rx,
            should_quit: false,
            submissions: Vec::new(),
        })
    }

    /// Run the event loop; returns the quotes submitted during the session
    pub async fn run(mut self) -> Result<Vec<Submission>> {
        let mut guard = TerminalGuard::new()?;

        match self.mode {
            AppMode::Browse { .. } => {
                let action = self.browser.start_categories_load();
                self.dispatch(action);
            }
            AppMode::QuoteOnly => self.quote_dialog.open(&mut NoHost),
        }

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        while !self.should_quit {
            guard.terminal().draw(|f| {
                if self.mode != AppMode::QuoteOnly {
                    self.browser.render(f);
                }
                self.quote_dialog.render(f);
            })?;

            // Apply finished network work before reading keys
            while let Ok(event) = self.rx.try_recv() {
                self.handle_event(event);
            }

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        Ok(self.submissions)
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Categories(result) => {
                let open = match self.mode {
                    AppMode::Browse { category } => category,
                    AppMode::QuoteOnly => None,
                };
                if let Some(action) = self.browser.apply_categories(result, open) {
                    self.dispatch(action);
                }
            }
            AppEvent::Page {
                category_id,
                seq,
                result,
            } => self.browser.apply_page(category_id, seq, result),
            AppEvent::Product { id, result } => {
                if let Some(action) = self.browser.apply_product(id, result) {
                    self.dispatch(action);
                }
            }
            AppEvent::Recommendations { product_id, result } => {
                self.browser.apply_recommendations(product_id, result)
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.quote_dialog.visible {
            let outcome = match self.mode {
                AppMode::QuoteOnly => self.quote_dialog.handle_key(key, &mut NoHost),
                AppMode::Browse { .. } => self.quote_dialog.handle_key(key, &mut self.browser),
            };
            match outcome {
                Some(QuoteDialogResult::Submitted(submission)) => self.on_submitted(submission),
                Some(QuoteDialogResult::Closed) if self.mode == AppMode::QuoteOnly => {
                    self.should_quit = true;
                }
                _ => {}
            }
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(event::KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if let Some(action) = self.browser.handle_key(key.code) {
            self.dispatch(action);
        }
    }

    fn on_submitted(&mut self, submission: Submission) {
        tracing::info!(link = %submission.link, "Quote handed off");
        if self.config.quote.open_browser {
            open_link(&submission.link);
        }
        self.submissions.push(submission);
        if self.mode == AppMode::QuoteOnly {
            self.should_quit = true;
        }
    }

    /// Start the work a browser action asks for
    fn dispatch(&mut self, action: BrowserAction) {
        match action {
            BrowserAction::Quit => self.should_quit = true,
            BrowserAction::OpenQuote => {
                self.browser.open_overlay();
                self.quote_dialog.open(&mut self.browser);
            }
            BrowserAction::SaveViewMode(view_mode) => {
                self.preferences.view_mode = view_mode;
                if let Err(e) = self.preferences.save(&self.config.preferences_path()) {
                    tracing::warn!(error = %e, "Failed to save view mode");
                }
            }
            BrowserAction::LoadCategories => {
                let client = self.client.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(AppEvent::Categories(client.categories().await));
                });
            }
            BrowserAction::LoadPage(request) => {
                let client = self.client.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = client.products(request.category_id, &request.query).await;
                    let _ = tx.send(AppEvent::Page {
                        category_id: request.category_id,
                        seq: request.seq,
                        result,
                    });
                });
            }
            BrowserAction::LoadProduct(id) => {
                let client = self.client.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = client.product(id).await;
                    let _ = tx.send(AppEvent::Product { id, result });
                });
            }
            BrowserAction::LoadRecommendations(product) => {
                let client = self.client.clone();
                let tx = self.tx.clone();
                let policy = self.retry_policy.clone();
                tokio::spawn(async move {
                    let result = load_recommendations(&client, &product, &policy).await;
                    let _ = tx.send(AppEvent::Recommendations {
                        product_id: product.id,
                        result,
                    });
                });
            }
        }
    }
}

/// Hand a link to the platform opener; the result is ignored
pub fn open_link(link: &str) {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    if let Err(e) = std::process::Command::new(opener)
        .arg(link)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
    {
        tracing::debug!(error = %e, "Could not launch {}", opener);
    }
}
