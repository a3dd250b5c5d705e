//! `Ipld` error definitions.
use crate::ipld::{Ipld, IpldIndex};
use crate::kind::Kind;
use thiserror::Error;

/// Type error.
#[derive(Debug, Error)]
#[error("Expected {expected:?} but found {found:?}")]
pub struct TypeError {
    /// The expected type.
    pub expected: TypeErrorType,
    /// The actual type.
    pub found: TypeErrorType,
}

impl TypeError {
    /// Creates a new type error.
    pub fn new<A: Into<TypeErrorType>, B: Into<TypeErrorType>>(expected: A, found: B) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Type error type.
#[derive(Debug)]
pub enum TypeErrorType {
    /// A value of some kind.
    Kind(Kind),
    /// Key type.
    Key(String),
    /// Index type.
    Index(usize),
}

impl From<Kind> for TypeErrorType {
    fn from(kind: Kind) -> Self {
        Self::Kind(kind)
    }
}

impl From<&Ipld> for TypeErrorType {
    fn from(ipld: &Ipld) -> Self {
        Self::Kind(ipld.kind())
    }
}

impl From<IpldIndex<'_>> for TypeErrorType {
    fn from(index: IpldIndex<'_>) -> Self {
        match index {
            IpldIndex::List(i) => Self::Index(i),
            IpldIndex::Map(key) => Self::Key(key.into()),
        }
    }
}
