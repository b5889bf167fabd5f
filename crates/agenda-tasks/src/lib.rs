//! # agenda-tasks
//!
//! Task and tag storage with `SQLite` persistence.
//!
//! The crate owns the three pieces that make up the task subsystem:
//!
//! - **Tag registry** ([`tags`]): resolves raw tag strings to canonical,
//!   case-insensitively unique tag rows, creating missing ones on the fly.
//! - **Task store** ([`repository`] + [`service`]): create, fetch, patch,
//!   and soft-delete operations. Soft-deleted tasks behave as if they do
//!   not exist.
//! - **Query engine** ([`repository::TaskRepository::list`]): one filtered,
//!   sorted, paginated view over active tasks plus the total match count.
//!
//! Repository methods are stateless and take `&Connection`; the service
//! layer owns the transaction boundary so that tag resolution and task
//! mutation always commit together.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod repository;
pub mod service;
pub mod tags;
pub mod types;

pub use connection::{new_file, new_in_memory, ConnectionConfig, ConnectionPool, PooledConnection};
pub use errors::{Result, TaskError};
pub use migrations::run_migrations;
pub use repository::TaskRepository;
pub use service::TaskService;
pub use tags::TagRegistry;
pub use types::{
    NewTask, SortKey, SortOrder, Tag, Task, TaskFilter, TaskPage, TaskPatch, TaskQuery,
};
