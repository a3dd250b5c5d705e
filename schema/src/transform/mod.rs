//! Compiled converters.
//!
//! The builder compiles each type into a node implementing [`Convert`] and
//! stores it in a [`Registry`] slot. Nodes refer to the types they depend on
//! by slot and look them up at call time, which is what makes recursive type
//! graphs work: a slot is reserved before its dependents are compiled.
mod enumeration;
mod recursive;
mod union;

pub(crate) use enumeration::EnumNode;
pub(crate) use recursive::{
    FieldNode, ListNode, MapNode, StructMapNode, StructTupleNode, ValueType,
};
pub(crate) use union::{Member, UnionNode, UnionStrategy};

use crate::error::TransformError;
use crate::schema::TypeName;
use indexmap::IndexMap;
use ipld_typed_core::ipld::Ipld;
use ipld_typed_core::kind::Kind;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Result of converting a value.
///
/// `Ok(None)` means the value does not conform to the type. `Cow::Borrowed`
/// always borrows the input itself and means nothing needed to change.
pub type Conversion<'a> = Result<Option<Cow<'a, Ipld>>, TransformError>;

/// A compiled conversion between representation and typed form.
pub(crate) trait Convert: Send + Sync {
    fn to_typed<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a>;

    fn to_representation<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a>;
}

/// Conversion direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    ToTyped,
    ToRepresentation,
}

/// Index of a compiled type in the registry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Slot(usize);

/// Arena of compiled types.
#[derive(Default)]
pub(crate) struct Registry {
    nodes: Vec<Option<Box<dyn Convert>>>,
    names: IndexMap<TypeName, Slot>,
}

impl Registry {
    pub(crate) fn get(&self, name: &str) -> Option<Slot> {
        self.names.get(name).copied()
    }

    /// Reserves an empty slot for `name`. Converting through it before it is
    /// filled yields `None`.
    pub(crate) fn reserve(&mut self, name: &str) -> Slot {
        let slot = Slot(self.nodes.len());
        self.nodes.push(None);
        self.names.insert(name.into(), slot);
        slot
    }

    pub(crate) fn fill(&mut self, slot: Slot, node: Box<dyn Convert>) {
        self.nodes[slot.0] = Some(node);
    }

    /// Makes `name` resolve to an existing slot.
    pub(crate) fn alias(&mut self, name: &str, slot: Slot) {
        self.names.entry(name.into()).or_insert(slot);
    }

    pub(crate) fn convert<'a>(
        &self,
        slot: Slot,
        direction: Direction,
        value: &'a Ipld,
    ) -> Conversion<'a> {
        let Some(node) = self.nodes.get(slot.0).and_then(Option::as_deref) else {
            return Ok(None);
        };
        match direction {
            Direction::ToTyped => node.to_typed(self, value),
            Direction::ToRepresentation => node.to_representation(self, value),
        }
    }

    pub(crate) fn to_typed<'a>(&self, slot: Slot, value: &'a Ipld) -> Conversion<'a> {
        self.convert(slot, Direction::ToTyped, value)
    }

    pub(crate) fn to_representation<'a>(&self, slot: Slot, value: &'a Ipld) -> Conversion<'a> {
        self.convert(slot, Direction::ToRepresentation, value)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.names.iter().map(|(name, slot)| (name, slot.0)))
            .finish()
    }
}

/// Scalar kinds convert to themselves.
pub(crate) struct KindNode(pub(crate) Kind);

impl Convert for KindNode {
    fn to_typed<'a>(&self, _: &Registry, value: &'a Ipld) -> Conversion<'a> {
        Ok(self.0.matches(value).then_some(Cow::Borrowed(value)))
    }

    fn to_representation<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        self.to_typed(registry, value)
    }
}

/// Returns true if `converted` is the unchanged `original`.
pub(crate) fn is_unchanged(converted: &Cow<'_, Ipld>, original: &Ipld) -> bool {
    matches!(converted, Cow::Borrowed(value) if std::ptr::eq(*value, original))
}

/// The converters of every compiled type.
#[derive(Clone, Debug)]
pub struct Transformers {
    registry: Arc<Registry>,
}

impl Transformers {
    pub(crate) fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Returns the converter for `name`.
    pub fn get(&self, name: &str) -> Option<Transformer> {
        let slot = self.registry.get(name)?;
        Some(Transformer {
            name: name.into(),
            slot,
            registry: self.registry.clone(),
        })
    }

    /// Names of all compiled types, including implicit and anonymous ones.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registry.names.keys().map(String::as_str)
    }

    /// Iterates over all converters.
    pub fn iter(&self) -> impl Iterator<Item = Transformer> + '_ {
        self.registry
            .names
            .iter()
            .map(move |(name, slot)| Transformer {
                name: name.clone(),
                slot: *slot,
                registry: self.registry.clone(),
            })
    }

    /// Number of compiled type names.
    pub fn len(&self) -> usize {
        self.registry.names.len()
    }

    /// Returns true if nothing was compiled.
    pub fn is_empty(&self) -> bool {
        self.registry.names.is_empty()
    }
}

/// The converter pair of a single type.
///
/// Cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct Transformer {
    name: TypeName,
    slot: Slot,
    registry: Arc<Registry>,
}

impl Transformer {
    /// Name of the type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Converts representation form into typed form.
    pub fn to_typed<'a>(&self, value: &'a Ipld) -> Conversion<'a> {
        self.registry.to_typed(self.slot, value)
    }

    /// Converts typed form into representation form.
    pub fn to_representation<'a>(&self, value: &'a Ipld) -> Conversion<'a> {
        self.registry.to_representation(self.slot, value)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("name", &self.name)
            .finish()
    }
}
