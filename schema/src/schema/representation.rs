//! Representation strategies.
//!
//! Every strategy known to the schema language is modelled here, including
//! ones the transform compiler does not implement (`stringpairs`,
//! `stringjoin`, struct `listpairs` and `advanced`).
use super::typedef::TypeName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Representation of a `map`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapRepresentation {
    /// A plain map.
    Map {},
    /// A string of delimited key/value pairs.
    #[serde(rename_all = "camelCase")]
    Stringpairs {
        /// Delimiter between key and value.
        inner_delim: String,
        /// Delimiter between entries.
        entry_delim: String,
    },
    /// A list of `[key, value]` lists.
    Listpairs {},
    /// An advanced data layout.
    Advanced(String),
}

impl Default for MapRepresentation {
    fn default() -> Self {
        Self::Map {}
    }
}

/// Representation of a `list`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListRepresentation {
    /// A plain list.
    List {},
    /// An advanced data layout.
    Advanced(String),
}

impl Default for ListRepresentation {
    fn default() -> Self {
        Self::List {}
    }
}

/// Representation of a `struct`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructRepresentation {
    /// A map keyed by (possibly renamed) field names.
    Map {
        /// Per field details.
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        fields: IndexMap<String, StructMapFieldDetails>,
    },
    /// A list of field values.
    Tuple {
        /// Order of fields in the list; declaration order when absent.
        #[serde(
            default,
            rename = "fieldOrder",
            skip_serializing_if = "Option::is_none"
        )]
        field_order: Option<Vec<String>>,
    },
    /// A string of delimited field/value pairs.
    #[serde(rename_all = "camelCase")]
    Stringpairs {
        /// Delimiter between field and value.
        inner_delim: String,
        /// Delimiter between entries.
        entry_delim: String,
    },
    /// Field values joined into a single string.
    #[serde(rename_all = "camelCase")]
    Stringjoin {
        /// Delimiter between values.
        join: String,
        /// Order of fields in the string.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_order: Option<Vec<String>>,
    },
    /// A list of `[field, value]` lists.
    Listpairs {},
    /// An advanced data layout.
    Advanced(String),
}

impl Default for StructRepresentation {
    fn default() -> Self {
        Self::Map {
            fields: IndexMap::new(),
        }
    }
}

/// Details of a field in a `map` represented struct.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StructMapFieldDetails {
    /// Key used in the representation instead of the field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
    /// Value assumed when the field is absent from the representation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit: Option<serde_json::Value>,
}

/// Representation of a `union`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnionRepresentation {
    /// Selected by data model kind, e.g. `{"int": "Foo"}`.
    Kinded(IndexMap<String, TypeName>),
    /// A map with a single key naming the member.
    Keyed(IndexMap<String, TypeName>),
    /// A map with a discriminant entry and a content entry.
    #[serde(rename_all = "camelCase")]
    Envelope {
        /// Key holding the discriminant.
        discriminant_key: String,
        /// Key holding the member value.
        content_key: String,
        /// Discriminant value to member.
        discriminant_table: IndexMap<String, TypeName>,
    },
    /// A map with a discriminant entry merged into the member's map.
    #[serde(rename_all = "camelCase")]
    Inline {
        /// Key holding the discriminant.
        discriminant_key: String,
        /// Discriminant value to member.
        discriminant_table: IndexMap<String, TypeName>,
    },
    /// A string starting with a member specific prefix.
    Stringprefix {
        /// Prefix to member.
        prefixes: IndexMap<String, TypeName>,
    },
    /// Bytes starting with a member specific prefix, keys are hex encoded.
    Bytesprefix {
        /// Hex encoded prefix to member.
        prefixes: IndexMap<String, TypeName>,
    },
}

impl UnionRepresentation {
    /// Name of the strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kinded(_) => "kinded",
            Self::Keyed(_) => "keyed",
            Self::Envelope { .. } => "envelope",
            Self::Inline { .. } => "inline",
            Self::Stringprefix { .. } => "stringprefix",
            Self::Bytesprefix { .. } => "bytesprefix",
        }
    }
}

/// Representation of an `enum`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumRepresentation {
    /// Members are strings; members missing from the table use their name.
    String(IndexMap<String, String>),
    /// Members are integers; every member needs a value.
    Int(IndexMap<String, i64>),
}

impl Default for EnumRepresentation {
    fn default() -> Self {
        Self::String(IndexMap::new())
    }
}

/// An advanced data layout declaration. Opaque to the compiler.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedDataLayout {}
