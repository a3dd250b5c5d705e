//! Core ipld types used by ipld schemas.
#![deny(missing_docs)]

#[cfg(any(test, feature = "arb"))]
mod arb;
pub mod convert;
pub mod error;
pub mod ipld;
pub mod kind;

pub use cid;
