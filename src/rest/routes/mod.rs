//! Route handlers for the REST API.

pub mod categories;
pub mod featured;
pub mod health;
pub mod products;
