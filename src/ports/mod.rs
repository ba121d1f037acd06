//! Port traits (hexagonal architecture boundaries).

pub mod config_port;
pub mod data_port;
pub mod display_port;
