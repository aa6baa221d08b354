//! Authentication module

pub mod context;
pub mod guard;

pub use context::{
    use_auth, use_identity, AuthAction, AuthContext, AuthContextData, AuthProvider,
    StorageWrite,
};
pub use guard::{ProtectedRoute, RedirectTo};
