//! # finder-core
//!
//! The result pipeline and session state for the therapist finder.
//!
//! This crate provides:
//! - The filter engine (`filter_providers`, `sort_providers`)
//! - The `ViewStateController` that owns filters, sort, selection, overlays
//! - The capability traits (`LocationService`, `Clipboard`, `Notifier`)
//! - `DirectorySession`, which wires all of the above for a presentation layer
//!
//! ## Usage
//!
//! ```rust,ignore
//! use finder_core::{DirectorySession, engine::{filter_providers, sort_providers}};
//! ```

pub mod controller;
pub mod engine;
pub mod session;
pub mod traits;

pub use controller::{LocationUpdate, ViewStateController};
pub use session::DirectorySession;
