//! Identity-domain identifiers, redacted secrets, the secret binder, and session tokens.

pub mod id;
pub mod secret;
pub mod secret_hash;
pub mod session;

pub use id::*;
pub use secret::*;
pub use secret_hash::*;
pub use session::*;
