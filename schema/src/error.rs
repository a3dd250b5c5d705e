//! Error types.
use crate::schema::TypeName;
use thiserror::Error;

/// A schema could not be compiled.
///
/// These are errors in the schema, not in the data being converted.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema text is not valid JSON.
    #[error("failed to parse schema: {0}")]
    Parse(String),
    /// The schema has no `types` map.
    #[error("schema has no `types` map")]
    MissingTypes,
    /// A definition has the wrong shape.
    #[error("malformed definition for type `{name}`: {reason}")]
    MalformedType {
        /// Offending type.
        name: TypeName,
        /// What is wrong with it.
        reason: String,
    },
    /// The root type name is empty.
    #[error("root type name is empty")]
    EmptyRootType,
    /// A referenced type is neither declared nor implicit.
    #[error("unknown type `{name}`")]
    UnknownType {
        /// The missing type.
        name: TypeName,
    },
    /// A chain of copies leads back to itself.
    #[error("type `{name}` copies itself via {}", chain.join(" -> "))]
    CopyCycle {
        /// Type where the cycle was detected.
        name: TypeName,
        /// The copy chain, ending in the repeated name.
        chain: Vec<TypeName>,
    },
    /// A map key type other than `String`.
    #[error("map `{name}` has key type `{key_type}`, only `String` is supported")]
    InvalidKeyType {
        /// Offending type.
        name: TypeName,
        /// Declared key type.
        key_type: TypeName,
    },
    /// The representation strategy is not supported for this kind.
    #[error("unsupported {kind} representation `{representation}` for type `{name}`")]
    UnsupportedRepresentation {
        /// Offending type.
        name: TypeName,
        /// Kind of the type.
        kind: &'static str,
        /// Strategy name.
        representation: String,
    },
    /// An `optional` field outside a map represented struct.
    #[error("field `{field}` of `{name}` is optional, which requires map representation")]
    OptionalField {
        /// Offending type.
        name: TypeName,
        /// Offending field.
        field: String,
    },
    /// An implicit value that is not a scalar of the field type.
    #[error("implicit value of field `{field}` of `{name}` must be a bool, int, float or string valid for the field type")]
    InvalidImplicit {
        /// Offending type.
        name: TypeName,
        /// Offending field.
        field: String,
    },
    /// Representation details refer to a field that does not exist.
    #[error("representation of `{name}` refers to unknown field `{field}`")]
    UnknownField {
        /// Offending type.
        name: TypeName,
        /// Unknown field.
        field: String,
    },
    /// Two fields share a representation key.
    #[error("fields of `{name}` share the representation key `{key}`")]
    DuplicateFieldKey {
        /// Offending type.
        name: TypeName,
        /// Shared key.
        key: String,
    },
    /// A tuple field order that is not a permutation of the fields.
    #[error("field order of `{name}` must list each of its {expected} fields exactly once")]
    FieldOrder {
        /// Offending type.
        name: TypeName,
        /// Number of declared fields.
        expected: usize,
    },
    /// A union representation that cannot select members unambiguously.
    #[error("invalid {representation} representation for union `{name}`: {reason}")]
    InvalidUnion {
        /// Offending type.
        name: TypeName,
        /// Strategy name.
        representation: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// An enum representation that cannot map members unambiguously.
    #[error("invalid representation for enum `{name}`: {reason}")]
    InvalidEnum {
        /// Offending type.
        name: TypeName,
        /// What is wrong with it.
        reason: String,
    },
    /// A custom transform that provides no conversion.
    #[error("custom transform for `{name}` provides neither direction")]
    InvalidCustomTransform {
        /// Offending type.
        name: TypeName,
    },
}

/// A custom transform failed while converting a value.
///
/// Plain non-conforming data never produces this error, it yields `None`.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Error returned by a custom transform.
    #[error("custom transform for `{type_name}` failed: {source}")]
    Custom {
        /// Type the transform is registered for.
        type_name: TypeName,
        /// The error returned by the transform.
        source: anyhow::Error,
    },
}
