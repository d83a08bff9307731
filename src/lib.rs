//! Library crate for roster-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Remote store client and record types (`api`)
//! - Query/mutation cache over the store (`cache`)
//! - Application state and update loop (`app`)
//! - Error and result types (`error`)
//! - Form validation rules (`validate`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `roster-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod cache;
pub mod error;
pub mod ui;
pub mod validate;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{ApiError, DynError, Result};
