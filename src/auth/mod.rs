//! Session lifecycle for the Nokori Gohan client.
//!
//! This module provides:
//! - `SessionStore`: single source of truth for the authenticated user,
//!   persisted across runs through a pluggable storage provider
//! - `StorageProvider`: durable key-value storage, with file-backed and
//!   in-memory implementations
//! - `Navigator`: the forced transition back to login when the backend
//!   rejects a credential
//!
//! The user record and its token are always stored and cleared together.

pub mod navigate;
pub mod session;
pub mod storage;

pub use navigate::{Navigator, TerminalNavigator};
pub use session::{Session, SessionStore};
pub use storage::{FileStorage, MemoryStorage, StorageProvider};
