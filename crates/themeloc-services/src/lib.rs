//! High-level orchestration over the tree, guard and translate crates.
//! Intentionally thin: exposes stable functions used by the CLI.

pub use themeloc_core::Result;

mod locales;
mod storage;
mod sync;

pub use locales::{discover_tasks, SyncTarget, SyncTask, SCHEMA_KIND, STOREFRONT_KIND};
pub use storage::{read_tree, read_tree_or_empty, write_tree, StorageError};
pub use sync::{sync_language, sync_locales};
