pub mod controller;
pub mod routes;

pub use routes::console_routes;
