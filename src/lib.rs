//! # CaskKV
//!
//! A log-structured key-value storage engine following the Bitcask design:
//! - Append-only data files, fsync'd on every write
//! - In-memory KeyDir mapping each key to its latest record on disk
//! - CRC32-checked records with tombstones for deletes
//! - Size-based file rotation
//! - Crash recovery by replaying every data file at startup
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        DiskStore                            │
//! │            (Single Writer / Multi Reader)                   │
//! └───────────┬───────────────────────────────┬─────────────────┘
//!             │ set / delete                  │ get
//!             ▼                               ▼
//!   ┌──────────────────┐   offset    ┌──────────────────┐
//!   │   Active File    │ ──────────► │      KeyDir      │
//!   │ (append + fsync) │             │     (RwLock)     │
//!   └────────┬─────────┘             └────────┬─────────┘
//!            │ rotate                         │ (file, offset, size)
//!            ▼                                ▼
//!   ┌──────────────────────────────────────────────────┐
//!   │   Data files: 1000000000.bitcask.data, ...       │
//!   │           (Record codec + CRC32)                 │
//!   └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use caskkv::DiskStore;
//!
//! # fn main() -> caskkv::Result<()> {
//! let store = DiskStore::open_path(std::path::Path::new("./books"))?;
//! store.set(b"othello", b"shakespeare")?;
//! assert_eq!(store.get(b"othello")?, b"shakespeare");
//! store.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod engine;
pub mod keydir;
pub mod record;
pub mod storage;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use engine::{DiskStore, ReplayStats};
pub use error::{CaskError, Result};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of CaskKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
