//! Resume ATS Service
//!
//! Accepts a PDF résumé, structures its text with an LLM, scores it against a
//! job description by keyword overlap and optionally answers a question about it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::create_router;
pub use state::AppState;
