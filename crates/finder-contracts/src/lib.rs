//! # finder-contracts
//!
//! Shared types and contracts for the therapist finder.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate: it holds data definitions, derived display helpers and the
//! error type.

pub mod error;
pub mod filter;
pub mod hotline;
pub mod location;
pub mod notify;
pub mod provider;
pub mod view;
