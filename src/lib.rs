//! Showroom - furniture catalog service with a terminal browser and quote wizard
//!
//! The library holds the catalog store and REST API, the HTTP client used by
//! the terminal frontend, and the UI-independent quotation wizard.

pub mod app;
pub mod browse;
pub mod catalog;
pub mod client;
pub mod config;
pub mod logging;
pub mod preferences;
pub mod quote;
pub mod rest;
pub mod ui;
