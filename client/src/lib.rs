//! Client core for the student management console.
//!
//! [`transport`] turns every HTTP exchange into an [`Envelope`] or an
//! [`ApiError`]; [`session`] owns authentication state on top of it and
//! keeps it in step with [`storage`].

pub mod api;
pub mod error;
pub mod roster;
pub mod routes;
pub mod session;
pub mod storage;
pub mod transport;

#[cfg(test)]
mod testing;

pub use error::ApiError;
pub use session::{Session, SessionEvent, SessionState, SessionStore};
pub use shared::types::Envelope;
pub use storage::{DurableStorage, FileStorage, MemoryStorage};
pub use transport::{ApiRequest, HttpTransport, Transport};
