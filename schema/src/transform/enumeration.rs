//! Enums.
use super::{Conversion, Convert, Registry};
use ipld_typed_core::ipld::Ipld;
use std::borrow::Cow;

/// An enum; the typed form is the member name as a string.
pub(crate) struct EnumNode {
    /// Member name and its representation, in declaration order.
    pub(crate) members: Vec<(String, Ipld)>,
}

impl Convert for EnumNode {
    fn to_typed<'a>(&self, _: &Registry, value: &'a Ipld) -> Conversion<'a> {
        let Some((member, _)) = self.members.iter().find(|(_, repr)| repr == value) else {
            return Ok(None);
        };
        Ok(Some(match value {
            Ipld::String(s) if s == member => Cow::Borrowed(value),
            _ => Cow::Owned(Ipld::String(member.clone())),
        }))
    }

    fn to_representation<'a>(&self, _: &Registry, value: &'a Ipld) -> Conversion<'a> {
        let Ipld::String(name) = value else {
            return Ok(None);
        };
        let Some((_, repr)) = self.members.iter().find(|(member, _)| member == name) else {
            return Ok(None);
        };
        Ok(Some(if repr == value {
            Cow::Borrowed(value)
        } else {
            Cow::Owned(repr.clone())
        }))
    }
}
