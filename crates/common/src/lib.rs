//! Common utilities and shared types for phinex.
//!
//! This crate provides foundational components used across all phinex crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: Prefixed ULID identifiers via [`IdGenerator`]
//! - **Pagination**: Page arithmetic and the list envelope via [`Pagination`] and [`Paginated`]
//!
//! # Example
//!
//! ```no_run
//! use phinex_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Listening on {}:{}, next id {id}", config.server.host, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod pagination;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use pagination::{PageQuery, Paginated, Pagination, PaginationMetadata};
