//! `gastrohealth` - Symptom journal and AI diet assistant backend
//!
//! This library provides the storage, assistant and HTTP layers behind the
//! GastroHealth client: a per-user flat-file store of profiles and symptom
//! logs, a thin proxy to a generative model for meal plans, food checks,
//! trigger analysis and recipes, and the JSON API that ties them together.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod assistant;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod recipes;
pub mod report;
pub mod server;
pub mod storage;

pub use assistant::{Assistant, GeminiClient, GenerativeModel};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use report::HealthReport;
pub use storage::{Storage, UserRecord};
