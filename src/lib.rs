// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod browser;
pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod engine;
pub mod error;
pub mod file;
pub mod page;
pub mod progress;
pub mod report;
pub mod runner;
pub mod urls;
pub mod validators;
