//! Converters between the representation and typed forms of IPLD data.
//!
//! A schema type describes data twice: as it is serialized (the
//! representation) and as applications see it (the typed form). This crate
//! compiles each type of a [`Schema`] into a pair of functions converting
//! between the two.
//!
//! ```
//! use ipld_typed_schema::{create, Options, Schema};
//! use ipld_typed_core::ipld::Ipld;
//!
//! let schema = Schema::from_json(r#"{
//!     "types": {
//!         "Point": {
//!             "struct": {
//!                 "fields": { "x": { "type": "Int" }, "y": { "type": "Int" } },
//!                 "representation": { "tuple": {} }
//!             }
//!         }
//!     }
//! }"#)?;
//! let point = create(&schema, "Point", Options::default())?;
//! let repr = Ipld::List(vec![Ipld::Integer(1), Ipld::Integer(2)]);
//! let typed = point.to_typed(&repr)?.unwrap();
//! assert_eq!(typed.get("x")?, &Ipld::Integer(1));
//! assert_eq!(point.to_representation(&typed)?.as_deref(), Some(&repr));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
#![deny(missing_docs)]

mod builder;
mod custom;
mod error;
mod implicit;
pub mod schema;
mod transform;

pub use crate::builder::Builder;
pub use crate::custom::{CustomFn, CustomTransform};
pub use crate::error::{SchemaError, TransformError};
pub use crate::implicit::{implicit_type, IMPLICIT_TYPES};
pub use crate::schema::{Schema, TypeDefn, TypeName};
pub use crate::transform::{Conversion, Transformer, Transformers};

use log::debug;
use std::collections::HashMap;

/// Options for [`create`].
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Conversions replacing the default ones of the named types.
    pub custom_transforms: HashMap<TypeName, CustomTransform>,
}

impl Options {
    /// Adds a custom transform for the type `name`.
    pub fn with_custom_transform(
        mut self,
        name: impl Into<TypeName>,
        transform: CustomTransform,
    ) -> Self {
        self.custom_transforms.insert(name.into(), transform);
        self
    }
}

/// Compiles the type `root` of `schema` and returns its converters.
///
/// Every type reachable from `root` is compiled, so all schema errors on
/// that path are reported here rather than during conversion.
pub fn create(schema: &Schema, root: &str, options: Options) -> Result<Transformer, SchemaError> {
    if root.is_empty() {
        return Err(SchemaError::EmptyRootType);
    }
    let mut builder = Builder::new(schema).with_custom_transforms(options.custom_transforms);
    builder.add_type(root)?;
    let transformers = builder.finish();
    debug!("compiled `{}` with {} types", root, transformers.len());
    transformers
        .get(root)
        .ok_or_else(|| SchemaError::UnknownType { name: root.into() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipld_typed_core::ipld::Ipld;

    #[test]
    fn empty_root() {
        let err = create(&Schema::new(), "", Options::default()).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyRootType));
    }

    #[test]
    fn implicit_root() {
        let int = create(&Schema::new(), "Int", Options::default()).unwrap();
        assert_eq!(int.name(), "Int");
        assert!(int.to_typed(&Ipld::Integer(1)).unwrap().is_some());
        assert!(int.to_typed(&Ipld::Float(1.0)).unwrap().is_none());
    }

    #[test]
    fn custom_root_need_not_be_declared() {
        let options = Options::default().with_custom_transform(
            "Upper",
            CustomTransform::new(|value| Ok(value.as_str().map(|s| Ipld::String(s.to_uppercase())))),
        );
        let upper = create(&Schema::new(), "Upper", options).unwrap();
        let abc = Ipld::String("abc".into());
        let typed = upper.to_typed(&abc).unwrap();
        assert_eq!(typed.as_deref(), Some(&Ipld::String("ABC".into())));
    }
}
