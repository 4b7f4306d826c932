//! tracereverse - catalog, search and progress tracking for TraceReverse
//! practice projects.
//!
//! The library exposes the project [`catalog`], the [`search`] engine
//! (fuzzy text search, attribute filters, sorting, suggestions), and the
//! per-user managers for [`progress`], learning [`paths`] and the
//! [`library`], all persisted through a [`storage::KeyValueStore`].

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod paths;
pub mod progress;
pub mod search;
pub mod storage;
pub mod test_utils;

pub use error::{Result, TrError};
