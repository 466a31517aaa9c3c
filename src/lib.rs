//! Bulk cleanup of 1C:Enterprise (BSL) modules.
//!
//! - [`parser`]: line classification, keyword tables and method boundaries.
//! - [`cleanup`]: dead code after an unconditional `Возврат;`, large
//!   commented-out blocks and runs of blank lines.
//! - [`container`]: round trip of the module text stored inside a `Form.bin`
//!   container through an external unpack/pack tool.
//! - [`batch`]: one transform over a file tree.

pub mod batch;
pub mod cleanup;
pub mod config;
pub mod container;
pub mod parser;

pub use cleanup::{
    process_document, remove_large_blank_blocks, remove_large_comment_blocks, Transform,
};
pub use container::{transact, ContainerCodec, ContainerError};
