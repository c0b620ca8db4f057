// Service module exports
// Storage, identity and the typed collection services

pub mod availability;
pub mod career;
pub mod database;
pub mod identity;
pub mod session;
pub mod settings;
pub mod store;
pub mod subject;
pub mod user;
