// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.

mod copy;    // src/gui/actions/copy.rs
mod export;  // src/gui/actions/export.rs
mod scan;    // src/gui/actions/scan.rs
mod traffic; // src/gui/actions/traffic.rs

pub use copy::copy;
pub use export::export;
pub use scan::{poll, scan};
pub use traffic::load_har;
