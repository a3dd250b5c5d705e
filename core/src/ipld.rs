//! Ipld representation.
use crate::cid::Cid;
use crate::error::TypeError;
use crate::kind::Kind;
use std::collections::BTreeMap;

/// Ipld
#[derive(Clone, Debug, PartialEq)]
pub enum Ipld {
    /// Represents the absence of a value or the value undefined.
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents an integer.
    Integer(i128),
    /// Represents a floating point value.
    Float(f64),
    /// Represents an UTF-8 string.
    String(String),
    /// Represents a sequence of bytes.
    Bytes(Vec<u8>),
    /// Represents a list.
    List(Vec<Ipld>),
    /// Represents a map.
    Map(BTreeMap<String, Ipld>),
    /// Represents a link to an Ipld node.
    Link(Cid),
}

/// A list position or map key to look up with [`Ipld::get`].
#[derive(Clone, Copy, Debug)]
pub enum IpldIndex<'a> {
    /// Position in a list.
    List(usize),
    /// Key in a map.
    Map(&'a str),
}

impl From<usize> for IpldIndex<'_> {
    fn from(index: usize) -> Self {
        Self::List(index)
    }
}

impl<'a> From<&'a str> for IpldIndex<'a> {
    fn from(key: &'a str) -> Self {
        Self::Map(key)
    }
}

impl Ipld {
    /// Returns the data model kind of this value.
    pub fn kind(&self) -> Kind {
        Kind::of(self)
    }

    /// Returns the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Ipld::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the map if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Ipld>> {
        match self {
            Ipld::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the list if this is a `List`.
    pub fn as_list(&self) -> Option<&[Ipld]> {
        match self {
            Ipld::List(l) => Some(l),
            _ => None,
        }
    }

    /// Looks up a list position or map key. Positions only index lists and
    /// keys only index maps.
    pub fn get<'a>(&self, index: impl Into<IpldIndex<'a>>) -> Result<&Self, TypeError> {
        let index = index.into();
        let found = match (self, index) {
            (Ipld::List(list), IpldIndex::List(i)) => list.get(i),
            (Ipld::Map(map), IpldIndex::Map(key)) => map.get(key),
            _ => None,
        };
        found.ok_or_else(|| TypeError::new(index, self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CID: &str = "bafyreibvjvcv745gig4mvqs4hctx4zfkono4rjejm2ta6gtyzkqxfjeily";

    #[test]
    fn ipld_bool_from() {
        assert_eq!(Ipld::Bool(true), Ipld::from(true));
        assert_eq!(Ipld::Bool(false), Ipld::from(false));
    }

    #[test]
    fn ipld_integer_from() {
        assert_eq!(Ipld::Integer(1), Ipld::from(1i8));
        assert_eq!(Ipld::Integer(1), Ipld::from(1i16));
        assert_eq!(Ipld::Integer(1), Ipld::from(1i32));
        assert_eq!(Ipld::Integer(1), Ipld::from(1i64));
        assert_eq!(Ipld::Integer(1), Ipld::from(1i128));
        assert_eq!(Ipld::Integer(1), Ipld::from(1u16));
        assert_eq!(Ipld::Integer(1), Ipld::from(1u32));
        assert_eq!(Ipld::Integer(1), Ipld::from(1u64));
    }

    #[test]
    fn ipld_string_from() {
        assert_eq!(Ipld::String("a string".into()), Ipld::from("a string"));
        assert_eq!(
            Ipld::String("a string".into()),
            Ipld::from("a string".to_string())
        );
    }

    #[test]
    fn ipld_link_from() {
        let cid = Cid::try_from(CID).unwrap();
        assert_eq!(Ipld::Link(cid), Ipld::from(cid));
    }

    #[test]
    fn index() {
        let ipld = Ipld::List(vec![Ipld::Integer(0), Ipld::Integer(1), Ipld::Integer(2)]);
        assert_eq!(ipld.get(0).unwrap(), &Ipld::Integer(0));
        assert_eq!(ipld.get(2).unwrap(), &Ipld::Integer(2));
        assert!(ipld.get(3).is_err());
        assert!(ipld.get("2").is_err());

        let mut map = BTreeMap::new();
        map.insert("a".to_string(), Ipld::Integer(0));
        map.insert("b".to_string(), Ipld::Integer(1));
        let ipld = Ipld::Map(map);
        assert_eq!(ipld.get("a").unwrap(), &Ipld::Integer(0));
        assert!(ipld.get("c").is_err());
        assert!(ipld.get(0).is_err());
    }
}
