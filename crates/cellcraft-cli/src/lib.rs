//! Support code shared by the `decode-cellid` and `compare-maps` binaries.
//!
//! Everything printed on stdout is built by [render] so the binaries stay thin
//! and the text can be tested without spawning processes.

pub mod cellid;
pub mod detector;
pub mod logging;
pub mod render;
