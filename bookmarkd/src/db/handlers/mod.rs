//! Postgres repositories.
//!
//! Each repository borrows a connection (or transaction) for its lifetime and owns the SQL for
//! one table:
//!
//! - [`Users`]: accounts and credential lookups
//! - [`Bookmarks`]: bookmarks, including the owner-scoped lookup
//!
//! ```ignore
//! let mut conn = pool.acquire().await?;
//! let mut repo = Bookmarks::new(&mut conn);
//! let mine = repo.list_by_owner(user_id).await?;
//! ```
//!
//! Application code reaches these through [`crate::db::store::PostgresStore`].

pub mod bookmarks;
pub mod users;

pub use bookmarks::Bookmarks;
pub use users::Users;
