//! Unions.
//!
//! The typed form of a union is a map with a single entry, from the name of
//! the selected member type to the member's typed value.
use super::{Conversion, Convert, Registry, Slot};
use crate::error::TransformError;
use ipld_typed_core::ipld::Ipld;
use ipld_typed_core::kind::Kind;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A union member.
#[derive(Debug)]
pub(crate) struct Member {
    pub(crate) name: String,
    pub(crate) slot: Slot,
}

/// How the member is selected in the representation. Every table maps a
/// discriminant to an index into the members.
#[derive(Debug)]
pub(crate) enum UnionStrategy {
    Kinded(Vec<(Kind, usize)>),
    Keyed(Vec<(String, usize)>),
    Envelope {
        discriminant_key: String,
        content_key: String,
        table: Vec<(String, usize)>,
    },
    Inline {
        discriminant_key: String,
        table: Vec<(String, usize)>,
    },
    StringPrefix(Vec<(String, usize)>),
    BytesPrefix(Vec<(Vec<u8>, usize)>),
}

fn lookup<D: PartialEq<Q>, Q: ?Sized>(table: &[(D, usize)], key: &Q) -> Option<usize> {
    table.iter().find(|(d, _)| d == key).map(|(_, i)| *i)
}

fn discriminant<D>(table: &[(D, usize)], member: usize) -> Option<&D> {
    table.iter().find(|(_, i)| *i == member).map(|(d, _)| d)
}

pub(crate) struct UnionNode {
    pub(crate) members: Vec<Member>,
    pub(crate) strategy: UnionStrategy,
}

impl UnionNode {
    /// Converts `value` with the member at `index` and tags the result.
    fn tag<'a>(&self, registry: &Registry, index: usize, value: &Ipld) -> Conversion<'a> {
        let member = &self.members[index];
        let Some(converted) = registry.to_typed(member.slot, value)? else {
            return Ok(None);
        };
        let mut map = BTreeMap::new();
        map.insert(member.name.clone(), converted.into_owned());
        Ok(Some(Cow::Owned(Ipld::Map(map))))
    }

    /// Splits a typed value into member index and the member's
    /// representation.
    fn untag(
        &self,
        registry: &Registry,
        value: &Ipld,
    ) -> Result<Option<(usize, Ipld)>, TransformError> {
        let Ipld::Map(map) = value else {
            return Ok(None);
        };
        let mut entries = map.iter();
        let (Some((name, inner)), None) = (entries.next(), entries.next()) else {
            return Ok(None);
        };
        let Some(index) = self.members.iter().position(|member| member.name == *name) else {
            return Ok(None);
        };
        let converted = registry.to_representation(self.members[index].slot, inner)?;
        Ok(converted.map(|repr| (index, repr.into_owned())))
    }
}

impl Convert for UnionNode {
    fn to_typed<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        match &self.strategy {
            UnionStrategy::Kinded(table) => {
                let kind = value.kind();
                if !kind.matches(value) {
                    return Ok(None);
                }
                match lookup(table, &kind) {
                    Some(index) => self.tag(registry, index, value),
                    None => Ok(None),
                }
            }
            UnionStrategy::Keyed(table) => {
                let Ipld::Map(map) = value else {
                    return Ok(None);
                };
                let mut entries = map.iter();
                let (Some((key, inner)), None) = (entries.next(), entries.next()) else {
                    return Ok(None);
                };
                match lookup(table, key) {
                    Some(index) => self.tag(registry, index, inner),
                    None => Ok(None),
                }
            }
            UnionStrategy::Envelope {
                discriminant_key,
                content_key,
                table,
            } => {
                let Ipld::Map(map) = value else {
                    return Ok(None);
                };
                if map.len() != 2 {
                    return Ok(None);
                }
                let (Some(Ipld::String(tag)), Some(content)) =
                    (map.get(discriminant_key), map.get(content_key))
                else {
                    return Ok(None);
                };
                match lookup(table, tag) {
                    Some(index) => self.tag(registry, index, content),
                    None => Ok(None),
                }
            }
            UnionStrategy::Inline {
                discriminant_key,
                table,
            } => {
                let Ipld::Map(map) = value else {
                    return Ok(None);
                };
                let Some(Ipld::String(tag)) = map.get(discriminant_key) else {
                    return Ok(None);
                };
                let Some(index) = lookup(table, tag) else {
                    return Ok(None);
                };
                let mut rest = map.clone();
                rest.remove(discriminant_key);
                self.tag(registry, index, &Ipld::Map(rest))
            }
            UnionStrategy::StringPrefix(table) => {
                let Ipld::String(s) = value else {
                    return Ok(None);
                };
                let found = table
                    .iter()
                    .find_map(|(prefix, index)| Some((s.strip_prefix(prefix.as_str())?, *index)));
                match found {
                    Some((rest, index)) => self.tag(registry, index, &Ipld::String(rest.into())),
                    None => Ok(None),
                }
            }
            UnionStrategy::BytesPrefix(table) => {
                let Ipld::Bytes(bytes) = value else {
                    return Ok(None);
                };
                let found = table
                    .iter()
                    .find_map(|(prefix, index)| Some((bytes.strip_prefix(prefix.as_slice())?, *index)));
                match found {
                    Some((rest, index)) => self.tag(registry, index, &Ipld::Bytes(rest.to_vec())),
                    None => Ok(None),
                }
            }
        }
    }

    fn to_representation<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        let Some((index, repr)) = self.untag(registry, value)? else {
            return Ok(None);
        };
        let repr = match &self.strategy {
            UnionStrategy::Kinded(table) => {
                // The member must produce the kind it is selected by.
                match discriminant(table, index) {
                    Some(kind) if kind.matches(&repr) => Some(repr),
                    _ => None,
                }
            }
            UnionStrategy::Keyed(table) => discriminant(table, index).map(|key| {
                let mut map = BTreeMap::new();
                map.insert(key.clone(), repr);
                Ipld::Map(map)
            }),
            UnionStrategy::Envelope {
                discriminant_key,
                content_key,
                table,
            } => discriminant(table, index).map(|tag| {
                let mut map = BTreeMap::new();
                map.insert(discriminant_key.clone(), Ipld::String(tag.clone()));
                map.insert(content_key.clone(), repr);
                Ipld::Map(map)
            }),
            UnionStrategy::Inline {
                discriminant_key,
                table,
            } => match (discriminant(table, index), repr) {
                (Some(tag), Ipld::Map(mut map)) if !map.contains_key(discriminant_key) => {
                    map.insert(discriminant_key.clone(), Ipld::String(tag.clone()));
                    Some(Ipld::Map(map))
                }
                _ => None,
            },
            UnionStrategy::StringPrefix(table) => match (discriminant(table, index), repr) {
                (Some(prefix), Ipld::String(rest)) => Some(Ipld::String(format!("{}{}", prefix, rest))),
                _ => None,
            },
            UnionStrategy::BytesPrefix(table) => match (discriminant(table, index), repr) {
                (Some(prefix), Ipld::Bytes(rest)) => {
                    let mut bytes = prefix.clone();
                    bytes.extend_from_slice(&rest);
                    Some(Ipld::Bytes(bytes))
                }
                _ => None,
            },
        };
        Ok(repr.map(Cow::Owned))
    }
}
