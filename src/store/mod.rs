//! Storage collaborators.
//!
//! The mapping engine never performs I/O itself. This module defines the
//! narrow contract it expects from a document store, an in-memory store for
//! tests, and a session that saves and loads objects through a store.

pub mod memory;
pub mod session;
pub mod traits;

pub use memory::MemoryStore;
pub use session::StoreSession;
pub use traits::DocumentStore;
