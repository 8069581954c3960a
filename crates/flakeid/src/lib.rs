//! # flakeid
//!
//! Unique, roughly time-sortable 64-bit IDs for distributed systems, in the
//! classic Snowflake shape: a millisecond timestamp, a 5-bit datacenter ID, a
//! 5-bit worker ID and a 12-bit per-millisecond sequence.
//!
//! Nodes need no coordination beyond a distinct `(worker_id, datacenter_id)`
//! pair, which may be assigned explicitly, drawn at random, or kept in an
//! [`IdentityStore`].
//!
//! ```
//! use flakeid::BasicSnowflakeGenerator;
//!
//! let generator = BasicSnowflakeGenerator::new(5, 10).unwrap();
//! let a = generator.next_id().unwrap();
//! let b = generator.next_id().unwrap();
//! assert!(a < b);
//! assert_eq!(b.worker_id(), 5);
//! assert_eq!(b.datacenter_id(), 10);
//! ```
//!
//! ## Feature flags
//!
//! - `parking-lot`: use `parking_lot::Mutex` (no lock poisoning).
//! - `serde`: (de)serialize [`SnowflakeId`] as a decimal string.
//! - `file-store`: a JSON-file backed [`IdentityStore`].
//! - `tracing`: spans on generation and warnings on clock rollback and
//!   identity store failures.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod global;
mod id;
mod identity;
mod mutex;
mod rand;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub mod serde;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::global::*;
pub use crate::id::*;
pub use crate::identity::*;
pub use crate::rand::*;
pub use crate::time::*;
