//! examkit-store — Content and result store implementations.
//!
//! Implements the `ContentStore` trait for a remote HTTP content service,
//! a local file tree, and an in-memory mock for tests.

pub mod config;
pub mod file;
pub mod http;
pub mod mock;

pub use config::{create_store, load_config, ExamkitConfig, StoreConfig};
pub use file::FileStore;
pub use http::HttpStore;
pub use mock::MockStore;
