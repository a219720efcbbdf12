pub mod browser;
pub mod dialogs;
pub mod form_field;
pub mod quote_dialog;
pub mod terminal;

pub use browser::{Browser, BrowserAction};
pub use quote_dialog::{QuoteDialog, QuoteDialogResult};
pub use terminal::TerminalGuard;
