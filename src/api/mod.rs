//! Backend API surface
//!
//! Everything the client knows about the wire: persistent token storage,
//! the shared HTTP gateway with auth injection and global 401 handling,
//! typed request/response shapes, and one thin client per backend domain
//! (auth, recordings, subscription). Nothing in this module caches or
//! retries; that is the query layer's job.

pub mod auth;
pub mod error;
pub mod gateway;
pub mod recordings;
pub mod storage;
pub mod subscription;
pub mod token;
pub mod types;

pub use auth::AuthApi;
pub use error::{ApiError, FieldError};
pub use gateway::Gateway;
pub use recordings::RecordingsApi;
pub use storage::StorageArea;
pub use subscription::SubscriptionApi;
pub use token::TokenStore;
