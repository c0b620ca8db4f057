// Module exports for models

pub mod availability;
pub mod career;
pub mod day;
pub mod settings;
pub mod subject;
pub mod user;
