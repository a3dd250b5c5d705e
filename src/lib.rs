//! The `ipld-typed` crate.
//!
//! Compiles IPLD schemas into converters between the representation and the
//! typed form of data.

#![deny(missing_docs)]

pub mod prelude;

pub use ipld_typed_core::{cid, error, ipld, kind};
pub use ipld_typed_macro::ipld;
pub use ipld_typed_schema as schema;
pub use ipld_typed_schema::{
    create, Builder, CustomTransform, Options, Schema, SchemaError, TransformError, Transformer,
    Transformers,
};

#[cfg(feature = "dag-json")]
pub use ipld_typed_json as json;
