// SIGA availability scheduler
// Exports all modules for the `siga` binary, tests and benches

pub mod cli;
pub mod error;
pub mod models;
pub mod schedule;
pub mod services;
pub mod utils;
