// inkredact/src/lib.rs
//! # inkredact CLI Application
//!
//! Command-line front end for the inkredact redaction pipeline. It resolves
//! configuration, discovers input images, fans documents out to blocking
//! workers, persists every artifact, and prints a per-document summary.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;
