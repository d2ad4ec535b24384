pub mod alerts;
pub mod api;
pub mod components;
pub mod config;
pub mod controllers;
pub mod dashboard;
pub mod dom;
pub mod error;
pub mod export;
pub mod feeds;
pub mod instance;
pub mod selection;
pub mod timers;

pub use dashboard::Dashboard;
pub use error::{DashboardError, Result};
