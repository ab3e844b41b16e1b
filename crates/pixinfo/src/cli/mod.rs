//! Command handlers.

pub mod config;
pub mod interactive;
pub mod picker;
pub mod scan;
