pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod h2h;
pub mod http_client;
pub mod persist;
pub mod provider;
pub mod schedule;
pub mod state;
pub mod view;
