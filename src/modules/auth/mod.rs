pub mod actions;
pub mod controller;
pub mod credentials;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;
pub mod state;

pub use actions::AuthActions;
pub use interface::{AuthError, LoginOutcome};
pub use state::{AuthState, SessionStateStore};

pub use routes::auth_routes;
