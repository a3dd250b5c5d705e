//! User supplied conversions for named types.
use crate::error::TransformError;
use crate::transform::{Conversion, Convert, Registry};
use ipld_typed_core::ipld::Ipld;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A custom conversion function.
///
/// Returns `Ok(None)` when the value does not conform. Errors are propagated
/// to the caller of the conversion as [`TransformError::Custom`].
pub type CustomFn = dyn Fn(&Ipld) -> anyhow::Result<Option<Ipld>> + Send + Sync;

/// Replaces the default conversion of a named type.
///
/// The type then behaves like a primitive wherever it is referenced. A
/// direction that is not provided is the identity.
#[derive(Clone, Default)]
pub struct CustomTransform {
    to_typed: Option<Arc<CustomFn>>,
    to_representation: Option<Arc<CustomFn>>,
}

impl CustomTransform {
    /// Creates a custom transform with only the representation to typed
    /// direction.
    pub fn new<F>(to_typed: F) -> Self
    where
        F: Fn(&Ipld) -> anyhow::Result<Option<Ipld>> + Send + Sync + 'static,
    {
        Self::default().with_to_typed(to_typed)
    }

    /// Sets the representation to typed direction.
    pub fn with_to_typed<F>(mut self, f: F) -> Self
    where
        F: Fn(&Ipld) -> anyhow::Result<Option<Ipld>> + Send + Sync + 'static,
    {
        self.to_typed = Some(Arc::new(f));
        self
    }

    /// Sets the typed to representation direction.
    pub fn with_to_representation<F>(mut self, f: F) -> Self
    where
        F: Fn(&Ipld) -> anyhow::Result<Option<Ipld>> + Send + Sync + 'static,
    {
        self.to_representation = Some(Arc::new(f));
        self
    }

    /// Returns true if at least one direction is provided.
    pub fn is_valid(&self) -> bool {
        self.to_typed.is_some() || self.to_representation.is_some()
    }
}

impl fmt::Debug for CustomTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTransform")
            .field("to_typed", &self.to_typed.is_some())
            .field("to_representation", &self.to_representation.is_some())
            .finish()
    }
}

/// A custom transform bound to the type it replaces.
pub(crate) struct CustomNode {
    pub(crate) name: String,
    pub(crate) transform: CustomTransform,
}

impl CustomNode {
    fn apply<'a>(&self, f: Option<&Arc<CustomFn>>, value: &'a Ipld) -> Conversion<'a> {
        let Some(f) = f else {
            return Ok(Some(Cow::Borrowed(value)));
        };
        match f(value) {
            Ok(converted) => Ok(converted.map(Cow::Owned)),
            Err(source) => Err(TransformError::Custom {
                type_name: self.name.clone(),
                source,
            }),
        }
    }
}

impl Convert for CustomNode {
    fn to_typed<'a>(&self, _: &Registry, value: &'a Ipld) -> Conversion<'a> {
        self.apply(self.transform.to_typed.as_ref(), value)
    }

    fn to_representation<'a>(&self, _: &Registry, value: &'a Ipld) -> Conversion<'a> {
        self.apply(self.transform.to_representation.as_ref(), value)
    }
}
