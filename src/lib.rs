// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod logging;

pub mod attendance;
pub mod capture;
pub mod config;
pub mod core;
pub mod csv;
pub mod file;
pub mod gui;
pub mod progress;
pub mod scan;
pub mod sink;

#[cfg(feature = "cli")]
pub mod cli;

pub use scan::{Report, ScanError, ScanOutcome, ScanPlan, Scanner};
