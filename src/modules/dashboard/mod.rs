pub mod analytics;
pub mod controller;
pub mod model;
pub mod routes;

pub use routes::dashboard_routes;
