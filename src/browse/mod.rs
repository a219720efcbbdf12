//! Frontend state for catalog pages, independent of rendering.
//!
//! Every listing request carries a sequence number; a response is applied
//! only when it answers the most recent request, so a slow earlier page can
//! never overwrite a later one.

use crate::catalog::{Category, Product, ProductDetail, ProductPage, ProductQuery, SortOrder};
use crate::client::ClientError;
use crate::preferences::ViewMode;
use crate::quote::DialogHost;

pub mod recommendations;

pub use recommendations::{load_recommendations, RetryPolicy};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    /// Inline error panel; the user can retry
    Failed(String),
}

/// A listing request to hand to the client
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub seq: u64,
    pub category_id: i64,
    pub query: ProductQuery,
}

pub struct CategoryPage {
    pub category: Category,
    query: ProductQuery,
    page: Option<ProductPage>,
    load: LoadState,
    view_mode: ViewMode,
    latest_seq: u64,
    selected: usize,
    /// Selection saved while the quote dialog is open
    saved_selection: Option<usize>,
    overlay_visible: bool,
}

impl CategoryPage {
    pub fn new(category: Category, page_size: u32, view_mode: ViewMode) -> Self {
        Self {
            category,
            query: ProductQuery {
                limit: page_size,
                ..ProductQuery::default()
            },
            page: None,
            load: LoadState::Idle,
            view_mode,
            latest_seq: 0,
            selected: 0,
            saved_selection: None,
            overlay_visible: false,
        }
    }

    /// Continue numbering after `seq`, so responses for a page that was
    /// replaced can never match a request from this one
    pub fn numbered_after(mut self, seq: u64) -> Self {
        self.latest_seq = seq;
        self
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn query(&self) -> &ProductQuery {
        &self.query
    }

    pub fn page(&self) -> Option<&ProductPage> {
        self.page.as_ref()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn products(&self) -> &[Product] {
        self.page.as_ref().map_or(&[], |p| p.products.as_slice())
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.products().get(self.selected)
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Issue a request for the current query
    pub fn request_load(&mut self) -> PageRequest {
        self.latest_seq += 1;
        self.load = LoadState::Loading;
        PageRequest {
            seq: self.latest_seq,
            category_id: self.category.id,
            query: self.query.clone(),
        }
    }

    /// Apply a response. Returns false when a newer request superseded it.
    pub fn apply(&mut self, seq: u64, result: Result<ProductPage, ClientError>) -> bool {
        if seq != self.latest_seq {
            tracing::debug!(
                seq,
                latest = self.latest_seq,
                "Dropping stale category page response"
            );
            return false;
        }
        match result {
            Ok(page) => {
                self.query.page = page.current_page.max(1);
                self.page = Some(page);
                self.selected = 0;
                self.load = LoadState::Loaded;
            }
            Err(e) => {
                tracing::warn!(category = self.category.id, error = %e, "Category page failed to load");
                self.load = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    fn total_pages(&self) -> u32 {
        self.page.as_ref().map_or(0, |p| p.total_pages)
    }

    pub fn next_page(&mut self) -> Option<PageRequest> {
        if self.query.page >= self.total_pages() {
            return None;
        }
        self.query.page += 1;
        Some(self.request_load())
    }

    pub fn prev_page(&mut self) -> Option<PageRequest> {
        if self.query.page <= 1 {
            return None;
        }
        self.query.page -= 1;
        Some(self.request_load())
    }

    /// Change the style filter and go back to the first page
    pub fn set_style(&mut self, style: Option<String>) -> PageRequest {
        self.query.style = style.filter(|s| !s.trim().is_empty());
        self.query.page = 1;
        self.request_load()
    }

    pub fn set_sort(&mut self, sort: SortOrder) -> PageRequest {
        self.query.sort = sort;
        self.query.page = 1;
        self.request_load()
    }

    pub fn cycle_sort(&mut self) -> PageRequest {
        self.set_sort(self.query.sort.next())
    }

    /// Manual retry after a failed load
    pub fn retry(&mut self) -> Option<PageRequest> {
        if matches!(self.load, LoadState::Failed(_)) {
            Some(self.request_load())
        } else {
            None
        }
    }

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggled();
        self.view_mode
    }

    pub fn select_next(&mut self) {
        let len = self.products().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.products().len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    /// Called when the quote dialog opens over this page
    pub fn open_overlay(&mut self) {
        self.saved_selection = Some(self.selected);
        self.overlay_visible = true;
    }
}

impl DialogHost for CategoryPage {
    fn clear_overlay(&mut self) {
        self.overlay_visible = false;
    }

    fn restore_scroll(&mut self) {
        if let Some(saved) = self.saved_selection.take() {
            self.selected = saved.min(self.products().len().saturating_sub(1));
        }
    }
}

/// Product detail screen state
#[derive(Debug, Clone, PartialEq)]
pub enum ProductView {
    Loading(i64),
    Loaded(Box<ProductDetail>),
    /// Lookup returned 404; offers a way back
    NotFound(i64),
    Failed { id: i64, message: String },
}

impl ProductView {
    pub fn from_result(id: i64, result: Result<ProductDetail, ClientError>) -> Self {
        match result {
            Ok(detail) => ProductView::Loaded(Box::new(detail)),
            Err(ClientError::NotFound(_)) => ProductView::NotFound(id),
            Err(e) => ProductView::Failed {
                id,
                message: e.to_string(),
            },
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            ProductView::Loading(id) | ProductView::NotFound(id) => *id,
            ProductView::Loaded(detail) => detail.id(),
            ProductView::Failed { id, .. } => *id,
        }
    }
}

/// Related-products panel under a product detail
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationsPanel {
    Loading,
    Loaded(Vec<Product>),
    /// Nothing to show, or all attempts failed
    Hidden,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64) -> Product {
        Product {
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
        }
    }

    fn page_of(current: u32, total_pages: u32, ids: &[i64]) -> ProductPage {
        ProductPage {
            products: ids.iter().map(|id| product(*id)).collect(),
            total_pages,
            current_page: current,
            total_products: u64::from(total_pages) * 9,
        }
    }

    fn category_page() -> CategoryPage {
        CategoryPage::new(
            Category {
                id: 1,
                name: "Salas".to_string(),
            },
            9,
            ViewMode::Grid,
        )
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut page = category_page();
        let first = page.request_load();
        page.apply(first.seq, Ok(page_of(1, 3, &[1, 2])));

        let slow = page.next_page().unwrap();
        let fast = page.next_page().unwrap();
        assert!(fast.seq > slow.seq);
        assert_eq!(fast.query.page, 3);

        assert!(page.apply(fast.seq, Ok(page_of(3, 3, &[30]))));
        assert!(!page.apply(slow.seq, Ok(page_of(2, 3, &[20]))));

        assert_eq!(page.products()[0].id, 30);
        assert_eq!(page.query().page, 3);
    }

    #[test]
    fn test_pagination_bounds() {
        let mut page = category_page();
        assert!(page.prev_page().is_none());

        let req = page.request_load();
        page.apply(req.seq, Ok(page_of(1, 1, &[1])));
        assert!(page.next_page().is_none());
    }

    #[test]
    fn test_failure_then_manual_retry() {
        let mut page = category_page();
        assert!(page.retry().is_none());

        let req = page.request_load();
        page.apply(req.seq, Err(ClientError::Network("connection refused".to_string())));
        assert!(matches!(page.load_state(), LoadState::Failed(_)));

        let retry = page.retry().unwrap();
        assert_eq!(retry.query, req.query);
        assert_eq!(page.load_state(), &LoadState::Loading);
    }

    #[test]
    fn test_filters_reset_to_first_page() {
        let mut page = category_page();
        let req = page.request_load();
        page.apply(req.seq, Ok(page_of(1, 3, &[1])));
        page.next_page();

        let req = page.set_style(Some("moderno".to_string()));
        assert_eq!(req.query.page, 1);
        assert_eq!(req.query.style.as_deref(), Some("moderno"));

        let req = page.cycle_sort();
        assert_eq!(req.query.sort, SortOrder::NameAsc);
        assert_eq!(req.query.page, 1);

        let req = page.set_style(Some("  ".to_string()));
        assert!(req.query.style.is_none());
    }

    #[test]
    fn test_overlay_restores_selection() {
        let mut page = category_page();
        let req = page.request_load();
        page.apply(req.seq, Ok(page_of(1, 1, &[1, 2, 3])));
        page.select_next();
        page.select_next();

        page.open_overlay();
        assert!(page.overlay_visible());
        page.select_prev();

        page.clear_overlay();
        page.restore_scroll();
        assert!(!page.overlay_visible());
        assert_eq!(page.selected_index(), 2);
    }

    #[test]
    fn test_selection_wraps() {
        let mut page = category_page();
        page.select_next();
        assert_eq!(page.selected_index(), 0);

        let req = page.request_load();
        page.apply(req.seq, Ok(page_of(1, 1, &[1, 2])));
        page.select_prev();
        assert_eq!(page.selected_product().unwrap().id, 2);
    }

    #[test]
    fn test_product_view_not_found() {
        let view = ProductView::from_result(9, Err(ClientError::NotFound("gone".to_string())));
        assert_eq!(view, ProductView::NotFound(9));
        assert_eq!(view.id(), 9);
    }
}
