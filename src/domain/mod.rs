//! Core domain types and logic.

pub mod cache;
pub mod config;
pub mod error;
pub mod instrument;
pub mod loader;
pub mod presenter;
pub mod report;
pub mod soql;
pub mod style;
