//! Prelude
pub use crate::ipld::Ipld;
pub use crate::kind::Kind;
pub use crate::schema::{create, CustomTransform, Options, Schema, Transformer};
