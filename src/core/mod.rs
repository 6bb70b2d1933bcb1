// src/core/mod.rs

pub mod net;
pub mod origin;
pub mod pattern;
pub mod wire;

pub use origin::{derive_origin_key, OriginError, OriginKey};
pub use pattern::MatchPattern;
pub use wire::{truthy, HttpHeader, WireId};
