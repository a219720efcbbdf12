//! Catalog browser: categories, paginated category pages, product details

use crossterm::event::KeyCode;
use ratatui::widgets::ListState;

use crate::browse::{CategoryPage, LoadState, PageRequest, ProductView, RecommendationsPanel};
use crate::catalog::{Category, Product, ProductDetail, ProductPage};
use crate::client::ClientError;
use crate::preferences::ViewMode;
use crate::quote::DialogHost;

mod views;

/// Style filters offered on category pages, `None` meaning all styles
pub const STYLE_FILTERS: &[Option<&str>] = &[
    None,
    Some("moderno"),
    Some("rustico"),
    Some("clasico"),
    Some("minimalista"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Categories,
    Category,
    Product,
}

/// Work the app must start after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserAction {
    LoadCategories,
    LoadPage(PageRequest),
    LoadProduct(i64),
    LoadRecommendations(Product),
    OpenQuote,
    SaveViewMode(ViewMode),
    Quit,
}

pub struct Browser {
    screen: Screen,
    categories: Vec<Category>,
    categories_load: LoadState,
    categories_state: ListState,
    page: Option<CategoryPage>,
    product: Option<ProductView>,
    recommendations: RecommendationsPanel,
    page_size: u32,
    view_mode: ViewMode,
    style_filter: usize,
    /// Highest request number issued by any category page so far
    last_seq: u64,
}

impl Browser {
    pub fn new(page_size: u32, view_mode: ViewMode) -> Self {
        Self {
            screen: Screen::Categories,
            categories: Vec::new(),
            categories_load: LoadState::Idle,
            categories_state: ListState::default(),
            page: None,
            product: None,
            recommendations: RecommendationsPanel::Hidden,
            page_size,
            view_mode,
            style_filter: 0,
            last_seq: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn page(&self) -> Option<&CategoryPage> {
        self.page.as_ref()
    }

    pub fn product(&self) -> Option<&ProductView> {
        self.product.as_ref()
    }

    pub fn recommendations(&self) -> &RecommendationsPanel {
        &self.recommendations
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn start_categories_load(&mut self) -> BrowserAction {
        self.categories_load = LoadState::Loading;
        BrowserAction::LoadCategories
    }

    /// Apply the category list. With `open` set, jump straight to that category.
    pub fn apply_categories(
        &mut self,
        result: Result<Vec<Category>, ClientError>,
        open: Option<i64>,
    ) -> Option<BrowserAction> {
        match result {
            Ok(categories) => {
                self.categories = categories;
                self.categories_load = LoadState::Loaded;
                let requested =
                    open.and_then(|id| self.categories.iter().position(|c| c.id == id));
                if let Some(idx) = requested {
                    self.categories_state.select(Some(idx));
                    return self.open_selected_category();
                }
                if let Some(id) = open {
                    tracing::warn!(category = id, "Requested category does not exist");
                }
                let first = if self.categories.is_empty() { None } else { Some(0) };
                self.categories_state.select(first);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load categories");
                self.categories_load = LoadState::Failed(e.to_string());
                None
            }
        }
    }

    pub fn apply_page(
        &mut self,
        category_id: i64,
        seq: u64,
        result: Result<ProductPage, ClientError>,
    ) {
        match self.page.as_mut() {
            Some(page) if page.category.id == category_id => {
                page.apply(seq, result);
            }
            _ => {
                tracing::debug!(
                    category = category_id,
                    seq,
                    "Dropping page response for a category no longer shown"
                );
            }
        }
    }

    /// Apply a detail response; returns the recommendations load to start
    pub fn apply_product(
        &mut self,
        id: i64,
        result: Result<ProductDetail, ClientError>,
    ) -> Option<BrowserAction> {
        if self.product.as_ref().map(ProductView::id) != Some(id) {
            tracing::debug!(product = id, "Dropping detail for a product no longer shown");
            return None;
        }
        let view = ProductView::from_result(id, result);
        let action = match &view {
            ProductView::Loaded(detail) => {
                self.recommendations = RecommendationsPanel::Loading;
                Some(BrowserAction::LoadRecommendations(detail.product.clone()))
            }
            _ => None,
        };
        self.product = Some(view);
        action
    }

    pub fn apply_recommendations(
        &mut self,
        product_id: i64,
        result: Result<Vec<Product>, ClientError>,
    ) {
        if self.product.as_ref().map(ProductView::id) != Some(product_id) {
            return;
        }
        self.recommendations = match result {
            Ok(products) if !products.is_empty() => RecommendationsPanel::Loaded(products),
            Ok(_) => RecommendationsPanel::Hidden,
            Err(e) => {
                tracing::warn!(product = product_id, error = %e, "Recommendations unavailable");
                RecommendationsPanel::Hidden
            }
        };
    }

    fn open_selected_category(&mut self) -> Option<BrowserAction> {
        let category = self
            .categories_state
            .selected()
            .and_then(|i| self.categories.get(i))?
            .clone();
        if let Some(previous) = &self.page {
            self.last_seq = self.last_seq.max(previous.latest_seq());
        }
        let mut page = CategoryPage::new(category, self.page_size, self.view_mode)
            .numbered_after(self.last_seq);
        let request = match STYLE_FILTERS[self.style_filter] {
            Some(style) => page.set_style(Some(style.to_string())),
            None => page.request_load(),
        };
        self.page = Some(page);
        self.screen = Screen::Category;
        Some(BrowserAction::LoadPage(request))
    }

    fn open_product(&mut self, id: i64) -> BrowserAction {
        self.product = Some(ProductView::Loading(id));
        self.recommendations = RecommendationsPanel::Hidden;
        self.screen = Screen::Product;
        BrowserAction::LoadProduct(id)
    }

    /// Mark the page as covered by the quote dialog
    pub fn open_overlay(&mut self) {
        if let Some(page) = self.page.as_mut() {
            page.open_overlay();
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<BrowserAction> {
        match (self.screen, key) {
            (_, KeyCode::Char('q')) => Some(BrowserAction::Quit),
            (_, KeyCode::Char('c')) => Some(BrowserAction::OpenQuote),
            (Screen::Categories, key) => self.handle_categories_key(key),
            (Screen::Category, key) => self.handle_category_key(key),
            (Screen::Product, key) => self.handle_product_key(key),
        }
    }

    fn handle_categories_key(&mut self, key: KeyCode) -> Option<BrowserAction> {
        let len = self.categories.len();
        match key {
            KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                let i = self.categories_state.selected().unwrap_or(0);
                self.categories_state.select(Some(if i == 0 { len - 1 } else { i - 1 }));
                None
            }
            KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                let i = self.categories_state.selected().map_or(0, |i| (i + 1) % len);
                self.categories_state.select(Some(i));
                None
            }
            KeyCode::Enter => self.open_selected_category(),
            KeyCode::Char('r') if matches!(self.categories_load, LoadState::Failed(_)) => {
                Some(self.start_categories_load())
            }
            _ => None,
        }
    }

    fn handle_category_key(&mut self, key: KeyCode) -> Option<BrowserAction> {
        let page = self.page.as_mut()?;
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                page.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                page.select_next();
                None
            }
            KeyCode::Right | KeyCode::Char(']') => page.next_page().map(BrowserAction::LoadPage),
            KeyCode::Left | KeyCode::Char('[') => page.prev_page().map(BrowserAction::LoadPage),
            KeyCode::Char('s') => Some(BrowserAction::LoadPage(page.cycle_sort())),
            KeyCode::Char('f') => {
                self.style_filter = (self.style_filter + 1) % STYLE_FILTERS.len();
                let style = STYLE_FILTERS[self.style_filter].map(str::to_string);
                Some(BrowserAction::LoadPage(page.set_style(style)))
            }
            KeyCode::Char('r') => page.retry().map(BrowserAction::LoadPage),
            KeyCode::Char('v') => {
                self.view_mode = page.toggle_view_mode();
                Some(BrowserAction::SaveViewMode(self.view_mode))
            }
            KeyCode::Enter => {
                let id = page.selected_product()?.id;
                Some(self.open_product(id))
            }
            KeyCode::Esc | KeyCode::Backspace => {
                self.screen = Screen::Categories;
                None
            }
            _ => None,
        }
    }

    fn handle_product_key(&mut self, key: KeyCode) -> Option<BrowserAction> {
        match key {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                self.product = None;
                self.recommendations = RecommendationsPanel::Hidden;
                self.screen = if self.page.is_some() {
                    Screen::Category
                } else {
                    Screen::Categories
                };
                None
            }
            KeyCode::Char('r') => match &self.product {
                Some(ProductView::Failed { id, .. }) => {
                    let id = *id;
                    Some(self.open_product(id))
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl DialogHost for Browser {
    fn clear_overlay(&mut self) {
        if let Some(page) = self.page.as_mut() {
            page.clear_overlay();
        }
    }

    fn restore_scroll(&mut self) {
        if let Some(page) = self.page.as_mut() {
            page.restore_scroll();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 2,
                name: "Comedores".to_string(),
            },
            Category {
                id: 1,
                name: "Salas".to_string(),
            },
        ]
    }

    fn detail(id: i64) -> ProductDetail {
        ProductDetail {
            product: Product {
                id,
                name: format!("P{id}"),
                description: String::new(),
                discount: None,
                main_image: None,
                available: true,
                category: "Salas".to_string(),
                category_id: 1,
                features: vec![],
                tags: vec![],
            },
            style: Some("moderno".to_string()),
            images: vec![],
        }
    }

    #[test]
    fn test_open_category_from_flag() {
        let mut browser = Browser::new(9, ViewMode::List);
        browser.start_categories_load();
        let action = browser.apply_categories(Ok(categories()), Some(1));

        let Some(BrowserAction::LoadPage(request)) = action else {
            panic!("expected page load, got {action:?}");
        };
        assert_eq!(request.category_id, 1);
        assert_eq!(request.query.limit, 9);
        assert_eq!(browser.screen(), Screen::Category);
        assert_eq!(browser.page().unwrap().view_mode(), ViewMode::List);
    }

    #[test]
    fn test_unknown_category_stays_on_list() {
        let mut browser = Browser::new(9, ViewMode::Grid);
        assert!(browser.apply_categories(Ok(categories()), Some(42)).is_none());
        assert_eq!(browser.screen(), Screen::Categories);
    }

    #[test]
    fn test_unknown_category_selects_first_entry() {
        let mut browser = Browser::new(9, ViewMode::Grid);
        browser.apply_categories(Ok(categories()), Some(42));
        assert!(browser.page().is_none());
        assert_eq!(browser.categories_state.selected(), Some(0));
    }

    fn page_with(category_id: i64, product_id: i64) -> ProductPage {
        let mut product = detail(product_id).product;
        product.category_id = category_id;
        ProductPage {
            products: vec![product],
            total_pages: 1,
            current_page: 1,
            total_products: 1,
        }
    }

    #[test]
    fn test_late_page_from_previous_category_is_dropped() {
        let mut browser = Browser::new(9, ViewMode::Grid);
        let Some(BrowserAction::LoadPage(first)) =
            browser.apply_categories(Ok(categories()), Some(1))
        else {
            panic!("expected page load");
        };

        browser.handle_key(KeyCode::Esc);
        browser.handle_key(KeyCode::Up);
        let Some(BrowserAction::LoadPage(second)) = browser.handle_key(KeyCode::Enter) else {
            panic!("expected page load");
        };
        assert_eq!(second.category_id, 2);
        assert_ne!(first.seq, second.seq);

        browser.apply_page(first.category_id, first.seq, Ok(page_with(1, 100)));
        let page = browser.page().unwrap();
        assert_eq!(page.category.id, 2);
        assert!(page.products().is_empty());
        assert_eq!(page.load_state(), &LoadState::Loading);

        browser.apply_page(second.category_id, second.seq, Ok(page_with(2, 200)));
        let page = browser.page().unwrap();
        assert_eq!(page.products()[0].id, 200);
        assert_eq!(page.load_state(), &LoadState::Loaded);
    }

    #[test]
    fn test_reopening_category_does_not_reuse_request_numbers() {
        let mut browser = Browser::new(9, ViewMode::Grid);
        let Some(BrowserAction::LoadPage(first)) =
            browser.apply_categories(Ok(categories()), Some(1))
        else {
            panic!("expected page load");
        };
        browser.handle_key(KeyCode::Esc);
        let Some(BrowserAction::LoadPage(again)) = browser.handle_key(KeyCode::Enter) else {
            panic!("expected page load");
        };
        assert_eq!(again.category_id, first.category_id);
        assert!(again.seq > first.seq);

        browser.apply_page(first.category_id, first.seq, Ok(page_with(1, 100)));
        assert!(browser.page().unwrap().products().is_empty());
    }

    #[test]
    fn test_categories_failure_offers_retry() {
        let mut browser = Browser::new(9, ViewMode::Grid);
        assert!(browser.handle_key(KeyCode::Char('r')).is_none());

        browser.apply_categories(Err(ClientError::Network("refused".to_string())), None);
        assert_eq!(
            browser.handle_key(KeyCode::Char('r')),
            Some(BrowserAction::LoadCategories)
        );
    }

    #[test]
    fn test_detail_not_found_and_back() {
        let mut browser = Browser::new(9, ViewMode::Grid);
        browser.apply_categories(Ok(categories()), Some(1));
        browser.open_product(77);

        let action = browser.apply_product(77, Err(ClientError::NotFound("no".to_string())));
        assert!(action.is_none());
        assert_eq!(browser.product(), Some(&ProductView::NotFound(77)));

        browser.handle_key(KeyCode::Esc);
        assert_eq!(browser.screen(), Screen::Category);
        assert!(browser.product().is_none());
    }

    #[test]
    fn test_loaded_detail_starts_recommendations() {
        let mut browser = Browser::new(9, ViewMode::Grid);
        browser.open_product(5);
        let action = browser.apply_product(5, Ok(detail(5)));
        assert!(matches!(action, Some(BrowserAction::LoadRecommendations(p)) if p.id == 5));
        assert_eq!(browser.recommendations(), &RecommendationsPanel::Loading);

        browser.apply_recommendations(5, Err(ClientError::Network("down".to_string())));
        assert_eq!(browser.recommendations(), &RecommendationsPanel::Hidden);
    }

    #[test]
    fn test_late_detail_for_other_product_is_ignored() {
        let mut browser = Browser::new(9, ViewMode::Grid);
        browser.open_product(5);
        browser.open_product(6);
        assert!(browser.apply_product(5, Ok(detail(5))).is_none());
        assert_eq!(browser.product(), Some(&ProductView::Loading(6)));
    }

    #[test]
    fn test_view_mode_toggle_is_saved() {
        let mut browser = Browser::new(9, ViewMode::Grid);
        browser.apply_categories(Ok(categories()), Some(2));
        assert_eq!(
            browser.handle_key(KeyCode::Char('v')),
            Some(BrowserAction::SaveViewMode(ViewMode::List))
        );
    }

    #[test]
    fn test_style_filter_cycles() {
        let mut browser = Browser::new(9, ViewMode::Grid);
        browser.apply_categories(Ok(categories()), Some(2));
        let Some(BrowserAction::LoadPage(request)) = browser.handle_key(KeyCode::Char('f')) else {
            panic!("expected page load");
        };
        assert_eq!(request.query.style.as_deref(), Some("moderno"));
    }
}
