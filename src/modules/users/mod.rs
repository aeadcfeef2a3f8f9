pub mod controller;
pub mod crud;
pub mod expiry;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;

pub use crud::UserOperations;
pub use interface::UserError;
pub use routes::user_routes;
