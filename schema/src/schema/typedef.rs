//! Type definitions.
use super::representation::{
    EnumRepresentation, ListRepresentation, MapRepresentation, StructRepresentation,
    UnionRepresentation,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of a type within a schema.
pub type TypeName = String;

/// A type definition. Exactly one kind per definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeDefn {
    /// `null`
    Null(TypeNull),
    /// `bool`
    Bool(TypeBool),
    /// `string`
    String(TypeString),
    /// `bytes`
    Bytes(TypeBytes),
    /// `int`
    Int(TypeInt),
    /// `float`
    Float(TypeFloat),
    /// `map`
    Map(TypeMap),
    /// `list`
    List(TypeList),
    /// `link`
    Link(TypeLink),
    /// `union`
    Union(TypeUnion),
    /// `struct`
    Struct(TypeStruct),
    /// `enum`
    Enum(TypeEnum),
    /// `copy`
    Copy(TypeCopy),
}

impl TypeDefn {
    /// The schema keyword of this definition's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeDefn::Null(_) => "null",
            TypeDefn::Bool(_) => "bool",
            TypeDefn::String(_) => "string",
            TypeDefn::Bytes(_) => "bytes",
            TypeDefn::Int(_) => "int",
            TypeDefn::Float(_) => "float",
            TypeDefn::Map(_) => "map",
            TypeDefn::List(_) => "list",
            TypeDefn::Link(_) => "link",
            TypeDefn::Union(_) => "union",
            TypeDefn::Struct(_) => "struct",
            TypeDefn::Enum(_) => "enum",
            TypeDefn::Copy(_) => "copy",
        }
    }
}

macro_rules! scalar_typedef {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {}
    };
}

scalar_typedef!(TypeNull, "A `null` type.");
scalar_typedef!(TypeBool, "A `bool` type.");
scalar_typedef!(TypeString, "A `string` type.");
scalar_typedef!(TypeBytes, "A `bytes` type.");
scalar_typedef!(TypeInt, "An `int` type.");
scalar_typedef!(TypeFloat, "A `float` type.");

/// A `link` type. The expected type is informational.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeLink {
    /// Type of the linked node, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_type: Option<TypeName>,
}

/// A `map` type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMap {
    /// Key type; must be `String`.
    pub key_type: TypeName,
    /// Value type.
    pub value_type: TypeTerm,
    /// Whether values may be `null`.
    #[serde(default)]
    pub value_nullable: bool,
    /// Representation strategy.
    #[serde(default)]
    pub representation: MapRepresentation,
}

/// A `list` type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeList {
    /// Element type.
    pub value_type: TypeTerm,
    /// Whether elements may be `null`.
    #[serde(default)]
    pub value_nullable: bool,
    /// Representation strategy.
    #[serde(default)]
    pub representation: ListRepresentation,
}

/// A `struct` type. Field order is significant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeStruct {
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: IndexMap<String, StructField>,
    /// Representation strategy.
    #[serde(default)]
    pub representation: StructRepresentation,
}

/// A single struct field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    /// Field type.
    #[serde(rename = "type")]
    pub ty: TypeTerm,
    /// The field may be absent.
    #[serde(default)]
    pub optional: bool,
    /// The field may be `null`.
    #[serde(default)]
    pub nullable: bool,
}

/// A `union` type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeUnion {
    /// Member type names.
    pub members: Vec<TypeName>,
    /// Representation strategy.
    pub representation: UnionRepresentation,
}

/// An `enum` type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeEnum {
    /// Member names.
    pub members: Vec<String>,
    /// Representation strategy.
    #[serde(default)]
    pub representation: EnumRepresentation,
}

/// A `copy` type, an alias of another type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCopy {
    /// The aliased type.
    pub from_type: TypeName,
}

/// A reference to a type: either by name or an anonymous inline definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeTerm {
    /// A named type.
    Name(TypeName),
    /// An anonymous `map`, `list` or `link` definition.
    Inline(Box<InlineDefn>),
}

impl From<&str> for TypeTerm {
    fn from(name: &str) -> Self {
        Self::Name(name.into())
    }
}

/// Anonymous type definitions allowed inline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineDefn {
    /// `map`
    Map(TypeMap),
    /// `list`
    List(TypeList),
    /// `link`
    Link(TypeLink),
}

impl From<InlineDefn> for TypeDefn {
    fn from(defn: InlineDefn) -> Self {
        match defn {
            InlineDefn::Map(map) => TypeDefn::Map(map),
            InlineDefn::List(list) => TypeDefn::List(list),
            InlineDefn::Link(link) => TypeDefn::Link(link),
        }
    }
}
