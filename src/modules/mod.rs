pub mod auth;
pub mod console;
pub mod dashboard;
pub mod metrics;
pub mod users;
