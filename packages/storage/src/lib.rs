// ABOUTME: Persistence layer for Usuario accounts
// ABOUTME: Store traits consumed by the settings workflow plus their SQLite implementation

pub mod error;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use schema::migrate;
pub use sqlite::SqliteStorage;
pub use traits::{TokenStore, UserStore};
