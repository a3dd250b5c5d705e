//! Lists, maps and structs.
use super::{is_unchanged, Conversion, Convert, Direction, Registry, Slot};
use crate::error::TransformError;
use indexmap::IndexMap;
use ipld_typed_core::ipld::Ipld;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A value slot that may allow `null`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ValueType {
    pub(crate) slot: Slot,
    pub(crate) nullable: bool,
}

impl ValueType {
    fn convert<'a>(
        &self,
        registry: &Registry,
        direction: Direction,
        value: &'a Ipld,
    ) -> Conversion<'a> {
        if self.nullable && *value == Ipld::Null {
            return Ok(Some(Cow::Borrowed(value)));
        }
        registry.convert(self.slot, direction, value)
    }
}

/// Converts a list element-wise. Returns `Ok(Some(None))` if no element
/// changed.
fn convert_list(
    registry: &Registry,
    direction: Direction,
    value_type: ValueType,
    list: &[Ipld],
) -> Result<Option<Option<Vec<Ipld>>>, TransformError> {
    let mut changed: Option<Vec<Ipld>> = None;
    for (i, item) in list.iter().enumerate() {
        let Some(converted) = value_type.convert(registry, direction, item)? else {
            return Ok(None);
        };
        match changed.as_mut() {
            Some(out) => out.push(converted.into_owned()),
            None if is_unchanged(&converted, item) => {}
            None => {
                let mut out = Vec::with_capacity(list.len());
                out.extend_from_slice(&list[..i]);
                out.push(converted.into_owned());
                changed = Some(out);
            }
        }
    }
    Ok(Some(changed))
}

/// Converts map values. Returns `Ok(Some(None))` if no value changed.
fn convert_map_values(
    registry: &Registry,
    direction: Direction,
    value_type: ValueType,
    map: &BTreeMap<String, Ipld>,
) -> Result<Option<Option<BTreeMap<String, Ipld>>>, TransformError> {
    let mut changed: Option<BTreeMap<String, Ipld>> = None;
    for (i, (key, item)) in map.iter().enumerate() {
        let Some(converted) = value_type.convert(registry, direction, item)? else {
            return Ok(None);
        };
        match changed.as_mut() {
            Some(out) => {
                out.insert(key.clone(), converted.into_owned());
            }
            None if is_unchanged(&converted, item) => {}
            None => {
                let mut out: BTreeMap<_, _> = map
                    .iter()
                    .take(i)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                out.insert(key.clone(), converted.into_owned());
                changed = Some(out);
            }
        }
    }
    Ok(Some(changed))
}

/// A `list` type.
pub(crate) struct ListNode {
    pub(crate) value_type: ValueType,
}

impl ListNode {
    fn convert<'a>(
        &self,
        registry: &Registry,
        direction: Direction,
        value: &'a Ipld,
    ) -> Conversion<'a> {
        let Ipld::List(list) = value else {
            return Ok(None);
        };
        Ok(
            convert_list(registry, direction, self.value_type, list)?.map(|changed| match changed {
                Some(list) => Cow::Owned(Ipld::List(list)),
                None => Cow::Borrowed(value),
            }),
        )
    }
}

impl Convert for ListNode {
    fn to_typed<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        self.convert(registry, Direction::ToTyped, value)
    }

    fn to_representation<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        self.convert(registry, Direction::ToRepresentation, value)
    }
}

/// A `map` type.
pub(crate) struct MapNode {
    pub(crate) value_type: ValueType,
    /// Represented as a list of `[key, value]` pairs instead of a map.
    pub(crate) listpairs: bool,
}

impl MapNode {
    fn convert_map<'a>(
        &self,
        registry: &Registry,
        direction: Direction,
        value: &'a Ipld,
    ) -> Conversion<'a> {
        let Ipld::Map(map) = value else {
            return Ok(None);
        };
        Ok(
            convert_map_values(registry, direction, self.value_type, map)?.map(
                |changed| match changed {
                    Some(map) => Cow::Owned(Ipld::Map(map)),
                    None => Cow::Borrowed(value),
                },
            ),
        )
    }

    fn pairs_to_typed<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        let Ipld::List(pairs) = value else {
            return Ok(None);
        };
        let mut map = BTreeMap::new();
        for pair in pairs {
            let [Ipld::String(key), item] = pair.as_list().unwrap_or_default() else {
                return Ok(None);
            };
            if map.contains_key(key) {
                return Ok(None);
            }
            let Some(converted) = self.value_type.convert(registry, Direction::ToTyped, item)?
            else {
                return Ok(None);
            };
            map.insert(key.clone(), converted.into_owned());
        }
        Ok(Some(Cow::Owned(Ipld::Map(map))))
    }

    fn pairs_to_representation<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        let Ipld::Map(map) = value else {
            return Ok(None);
        };
        let mut pairs = Vec::with_capacity(map.len());
        for (key, item) in map {
            let Some(converted) =
                self.value_type
                    .convert(registry, Direction::ToRepresentation, item)?
            else {
                return Ok(None);
            };
            pairs.push(Ipld::List(vec![
                Ipld::String(key.clone()),
                converted.into_owned(),
            ]));
        }
        Ok(Some(Cow::Owned(Ipld::List(pairs))))
    }
}

impl Convert for MapNode {
    fn to_typed<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        if self.listpairs {
            self.pairs_to_typed(registry, value)
        } else {
            self.convert_map(registry, Direction::ToTyped, value)
        }
    }

    fn to_representation<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        if self.listpairs {
            self.pairs_to_representation(registry, value)
        } else {
            self.convert_map(registry, Direction::ToRepresentation, value)
        }
    }
}

/// A compiled struct field.
#[derive(Debug)]
pub(crate) struct FieldNode {
    pub(crate) name: String,
    /// Key in the representation, the field name unless renamed.
    pub(crate) key: String,
    pub(crate) value_type: ValueType,
    pub(crate) optional: bool,
    pub(crate) implicit: Option<Ipld>,
}

impl FieldNode {
    /// Required fields must be present in both forms.
    fn is_required(&self) -> bool {
        !self.optional && self.implicit.is_none()
    }
}

/// A struct represented as a map.
pub(crate) struct StructMapNode {
    /// Fields keyed by name, in declaration order.
    fields: IndexMap<String, FieldNode>,
    /// Representation key to field index.
    keys: IndexMap<String, usize>,
    required: usize,
}

impl StructMapNode {
    pub(crate) fn new(fields: Vec<FieldNode>) -> Self {
        let keys = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.key.clone(), i))
            .collect();
        let required = fields.iter().filter(|field| field.is_required()).count();
        let fields = fields
            .into_iter()
            .map(|field| (field.name.clone(), field))
            .collect();
        Self {
            fields,
            keys,
            required,
        }
    }
}

impl Convert for StructMapNode {
    fn to_typed<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        let Ipld::Map(map) = value else {
            return Ok(None);
        };
        let mut missing = self.required;
        let mut present = vec![false; self.fields.len()];
        let mut changed: Option<BTreeMap<String, Ipld>> = None;
        for (i, (key, item)) in map.iter().enumerate() {
            let Some(&index) = self.keys.get(key) else {
                return Ok(None);
            };
            let field = &self.fields[index];
            let Some(converted) = field
                .value_type
                .convert(registry, Direction::ToTyped, item)?
            else {
                return Ok(None);
            };
            present[index] = true;
            if field.is_required() {
                missing -= 1;
            }
            match changed.as_mut() {
                Some(out) => {
                    out.insert(field.name.clone(), converted.into_owned());
                }
                None if field.name == *key && is_unchanged(&converted, item) => {}
                None => {
                    let mut out: BTreeMap<_, _> = map
                        .iter()
                        .take(i)
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect();
                    out.insert(field.name.clone(), converted.into_owned());
                    changed = Some(out);
                }
            }
        }
        if missing != 0 {
            return Ok(None);
        }
        for (index, field) in self.fields.values().enumerate() {
            if let (false, Some(implicit)) = (present[index], &field.implicit) {
                changed
                    .get_or_insert_with(|| map.clone())
                    .insert(field.name.clone(), implicit.clone());
            }
        }
        Ok(Some(match changed {
            Some(map) => Cow::Owned(Ipld::Map(map)),
            None => Cow::Borrowed(value),
        }))
    }

    fn to_representation<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        let Ipld::Map(map) = value else {
            return Ok(None);
        };
        let mut missing = self.required;
        let mut changed: Option<BTreeMap<String, Ipld>> = None;
        for (i, (name, item)) in map.iter().enumerate() {
            let Some(field) = self.fields.get(name) else {
                return Ok(None);
            };
            if field.is_required() {
                missing -= 1;
            }
            let start_copy = |changed: &mut Option<BTreeMap<String, Ipld>>| {
                changed.get_or_insert_with(|| {
                    map.iter()
                        .take(i)
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                });
            };
            if field.implicit.as_ref() == Some(item) {
                start_copy(&mut changed);
                continue;
            }
            let Some(converted) =
                field
                    .value_type
                    .convert(registry, Direction::ToRepresentation, item)?
            else {
                return Ok(None);
            };
            if changed.is_none() && !(field.key == *name && is_unchanged(&converted, item)) {
                start_copy(&mut changed);
            }
            if let Some(out) = changed.as_mut() {
                out.insert(field.key.clone(), converted.into_owned());
            }
        }
        if missing != 0 {
            return Ok(None);
        }
        Ok(Some(match changed {
            Some(map) => Cow::Owned(Ipld::Map(map)),
            None => Cow::Borrowed(value),
        }))
    }
}

/// A struct represented as a list in field order.
pub(crate) struct StructTupleNode {
    /// Fields in representation order.
    pub(crate) fields: Vec<FieldNode>,
}

impl Convert for StructTupleNode {
    fn to_typed<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        let Ipld::List(list) = value else {
            return Ok(None);
        };
        if list.len() != self.fields.len() {
            return Ok(None);
        }
        let mut out = BTreeMap::new();
        for (field, item) in self.fields.iter().zip(list) {
            let Some(converted) = field
                .value_type
                .convert(registry, Direction::ToTyped, item)?
            else {
                return Ok(None);
            };
            out.insert(field.name.clone(), converted.into_owned());
        }
        Ok(Some(Cow::Owned(Ipld::Map(out))))
    }

    fn to_representation<'a>(&self, registry: &Registry, value: &'a Ipld) -> Conversion<'a> {
        let Ipld::Map(map) = value else {
            return Ok(None);
        };
        if map.len() != self.fields.len() {
            return Ok(None);
        }
        let mut out = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let Some(item) = map.get(&field.name) else {
                return Ok(None);
            };
            let Some(converted) =
                field
                    .value_type
                    .convert(registry, Direction::ToRepresentation, item)?
            else {
                return Ok(None);
            };
            out.push(converted.into_owned());
        }
        Ok(Some(Cow::Owned(Ipld::List(out))))
    }
}
