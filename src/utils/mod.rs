//! Utility Module
//!
//! - [`FixedTimestep`]: converts frame times into fixed simulation ticks

pub mod time;

pub use time::FixedTimestep;
