//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod html_adapter;
pub mod socrata_adapter;
pub mod terminal_adapter;
#[cfg(feature = "web")]
pub mod web;
