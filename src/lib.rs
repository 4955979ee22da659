//! `salesboard` library crate.
//!
//! The binary (`salesboard`) is a thin wrapper around this library so that:
//!
//! - import, aggregation and reporting are testable without spawning processes
//! - the dataset slot can sit on any key-value store (file-backed or in-memory)

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod store;
