pub mod interface;
pub mod memory;
pub mod supabase;
pub mod types;

pub use interface::{AuthProvider, Backend, BackendError, OperationRepository, UserRepository};
pub use memory::{Fault, InMemoryBackend};
pub use supabase::{SupabaseClient, SupabaseConfig};
pub use types::{AuthChangeEvent, Session, SessionEvent, SessionUser};
