pub mod backends;
pub mod config;
pub mod error;
pub mod extraction;
pub mod models;
pub mod service;
pub mod tasks;
pub mod workflow;

pub use config::ServiceConfig;
pub use error::AnalysisError;
pub use models::*;
pub use service::{AppState, build_router, create_app};
pub use workflow::{analyze_document, build_analysis_pipeline, run_analysis};
