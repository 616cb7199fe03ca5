//! Database repositories for data access layer
//!
//! `UploadRepository` is the seam the API depends on. `PgUploadRepository` is the
//! production implementation; `InMemoryUploadRepository` backs tests and local runs
//! without PostgreSQL.

pub mod memory;
pub mod upload;

pub use memory::InMemoryUploadRepository;
pub use upload::{PgUploadRepository, UploadRepository};
