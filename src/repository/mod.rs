//! Repository Layer
//!
//! The remote list store and the local mirror, behind traits so the managers
//! can run against HTTP, in-memory fixtures or a test double.

mod http_store;
mod memory_store;
mod mirror;
mod traits;

pub use http_store::HttpListStore;
pub use memory_store::MemoryListStore;
pub use mirror::{FileMirror, MemoryMirror};
pub use traits::{LocalMirror, RemoteListStore};

/// Mirror slot holding the normalized list collection
pub const MIRROR_KEY: &str = "shoppingLists";
