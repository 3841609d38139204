//! candor - anonymous feedback collection with ranked storage fallback.
//!
//! A small HTTP service behind an anonymous feedback form. Submissions are
//! appended to the first backend in a configured priority order that will
//! take them; the viewer reads from the first backend that has data. A dead
//! remote store degrades the chain instead of failing the request, with a
//! local CSV file as the always-available last resort.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files with env overrides
//! - [`domain`] - Feedback entries, record identifiers, store tags
//! - [`store`] - The `FeedbackStore` trait, its backends, and the fallback chain
//! - [`db`] - Diesel pool and schema for the embedded SQLite backend
//! - [`service`] - Submit / fetch / delete operations over the chain
//! - [`http`] - axum router and request handlers
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use candor::service::FeedbackService;
//! use candor::store::{FallbackChain, MemoryStore};
//!
//! let chain = FallbackChain::new(vec![Box::new(MemoryStore::new())]);
//! let service = Arc::new(FeedbackService::new(chain));
//! let router = candor::http::router(service);
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod http;
pub mod service;
pub mod store;
