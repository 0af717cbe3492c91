//! Data persistence and access.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers, auth gate)
//! └──────┬──────┘
//!        │  Arc<dyn UserStore>, Arc<dyn BookmarkStore>
//!        ↓
//! ┌─────────────┐
//! │   Stores    │  (db::store - PostgresStore | InMemoryStore)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - SQL per table)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`store`]: The [`store::UserStore`] and [`store::BookmarkStore`] contracts and their
//!   implementations
//! - [`handlers`]: Postgres repositories, one per table, borrowing a connection
//! - [`models`]: Records exchanged with the stores
//! - [`errors`]: Storage error classification
//!
//! Lookups return `Ok(None)` for absent rows. [`errors::DbError`] is reserved for constraint
//! violations and failures of the database itself.

pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;
