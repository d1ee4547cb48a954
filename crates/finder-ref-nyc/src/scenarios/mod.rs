//! Reference walkthrough scenarios.
//!
//! Each scenario is a self-contained module that builds a session over the
//! bundled New York directory and exercises one aspect of the finder.

pub mod location;
pub mod overlays;
