//! SQLite backend for the Vitae resume store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;
mod table;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
pub use table::{Columns, ItemTable};

#[cfg(test)]
mod tests;
