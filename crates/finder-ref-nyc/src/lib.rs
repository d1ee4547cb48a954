//! # finder-ref-nyc
//!
//! New York reference runtime for the therapist finder.
//!
//! Bundles a fictional provider directory with the real US crisis lines, and
//! in-process stand-ins for the host capabilities a session needs:
//!
//! - **`SimulatedLocator`**: answers location requests on a background thread
//!   after a fixed delay, delivering each fix over a channel.
//! - **`MemoryClipboard`**: keeps the last copied text in memory.
//! - **`RecordingNotifier`**: records every toast in order.
//!
//! Two walkthrough scenarios exercise overlay arbitration and overlapping
//! location requests. No network or device APIs are touched.

pub mod capabilities;
pub mod mock_data;
pub mod scenarios;

// ── Tests ─────────────────────────────────────────────────────────────────────
