//! Data model kinds.
use crate::ipld::Ipld;
use std::fmt;

/// One of the nine data model kinds every ipld value belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Kind {
    /// Null kind.
    Null,
    /// Boolean kind.
    Bool,
    /// Integer kind.
    Int,
    /// Float kind.
    Float,
    /// String kind.
    String,
    /// Bytes kind.
    Bytes,
    /// Link kind.
    Link,
    /// List kind.
    List,
    /// Map kind.
    Map,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 9] = [
        Kind::Null,
        Kind::Bool,
        Kind::Int,
        Kind::Float,
        Kind::String,
        Kind::Bytes,
        Kind::Link,
        Kind::List,
        Kind::Map,
    ];

    /// Classifies a value.
    pub fn of(ipld: &Ipld) -> Self {
        match ipld {
            Ipld::Null => Kind::Null,
            Ipld::Bool(_) => Kind::Bool,
            Ipld::Integer(_) => Kind::Int,
            Ipld::Float(_) => Kind::Float,
            Ipld::String(_) => Kind::String,
            Ipld::Bytes(_) => Kind::Bytes,
            Ipld::Link(_) => Kind::Link,
            Ipld::List(_) => Kind::List,
            Ipld::Map(_) => Kind::Map,
        }
    }

    /// Returns true if `ipld` is a member of this kind.
    ///
    /// Non-finite floats are not representable in the data model and are not
    /// members of any kind.
    pub fn matches(self, ipld: &Ipld) -> bool {
        match (self, ipld) {
            (Kind::Float, Ipld::Float(f)) => f.is_finite(),
            (kind, ipld) => kind == Kind::of(ipld),
        }
    }

    /// The lowercase name used by schema representations, e.g. `"int"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Link => "link",
            Kind::List => "list",
            Kind::Map => "map",
        }
    }

    /// Parses a lowercase kind name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
