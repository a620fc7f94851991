pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod mcp;
pub mod services;
