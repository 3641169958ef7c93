//! Scan windows: owned byte buffers with anchor/cursor bookkeeping.
//!
//! - [`ScanWindow`] - One chunk of input plus the offsets the splitter scans with

mod scan;

pub use scan::ScanWindow;
