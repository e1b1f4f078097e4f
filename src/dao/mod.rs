//! Persistence layer: the key-value backend abstraction, the wire entities,
//! and the two record stores built on top of them.

pub mod archive;
pub mod game_state;
pub mod kv;
pub mod models;
pub mod storage;

pub use self::archive::{ARCHIVE_KEY, ArchiveStore, ImportError};
pub use self::game_state::{GAME_STATE_KEY, GameStateError, GameStateStore};
pub use self::kv::{FileStore, KeyValueStore, MemoryStore};
pub use self::models::{ArchivedGameEntity, GameStateEntity};
pub use self::storage::{StorageError, StorageResult};
