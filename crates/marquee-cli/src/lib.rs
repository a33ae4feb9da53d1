//! Marquee CLI: configuration resolution and record export.

pub mod config;
pub mod export;
