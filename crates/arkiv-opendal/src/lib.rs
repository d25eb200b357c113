#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
mod key;
mod store;

#[doc(hidden)]
pub mod prelude;

pub use config::{S3Config, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use key::{FileKey, KEY_SEPARATOR};
pub use store::{FileStore, ObjectMeta, PresignedDownload};

/// Tracing target for storage operations.
pub const TRACING_TARGET: &str = "arkiv_opendal";
