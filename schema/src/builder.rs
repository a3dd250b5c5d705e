//! The transform compiler.
use crate::custom::{CustomNode, CustomTransform};
use crate::error::SchemaError;
use crate::implicit::implicit_type;
use crate::schema::{
    EnumRepresentation, ListRepresentation, MapRepresentation, Schema, StructField,
    StructRepresentation, TypeCopy, TypeDefn, TypeEnum, TypeList, TypeMap, TypeName, TypeStruct,
    TypeTerm, TypeUnion, UnionRepresentation,
};
use crate::transform::{
    Convert, EnumNode, FieldNode, KindNode, ListNode, MapNode, Member, Registry, Slot,
    StructMapNode, StructTupleNode, Transformers, UnionNode, UnionStrategy, ValueType,
};
use indexmap::IndexMap;
use ipld_typed_core::ipld::Ipld;
use ipld_typed_core::kind::Kind;
use log::{debug, trace};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Compiles the types of a schema into converters.
///
/// Types are compiled on demand with [`Builder::add_type`], which also
/// compiles every type the requested one depends on. A builder is meant for
/// a single compilation; after an error it should be dropped.
pub struct Builder<'s> {
    schema: &'s Schema,
    custom: HashMap<TypeName, CustomTransform>,
    registry: Registry,
}

impl<'s> Builder<'s> {
    /// Creates a builder over `schema` and the implicit types.
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            custom: HashMap::new(),
            registry: Registry::default(),
        }
    }

    /// Replaces the conversion of the named types.
    pub fn with_custom_transforms(
        mut self,
        custom: impl IntoIterator<Item = (TypeName, CustomTransform)>,
    ) -> Self {
        self.custom.extend(custom);
        self
    }

    /// Compiles the named type and everything it depends on. Does nothing if
    /// the type is already compiled.
    pub fn add_type(&mut self, name: &str) -> Result<(), SchemaError> {
        if self.registry.get(name).is_some() {
            return Ok(());
        }
        if self.custom.contains_key(name) {
            return self.add_custom(name);
        }
        let defn = self.lookup(name)?;
        self.add_type_defn(name, &defn)
    }

    /// Compiles `defn` under `name`, unless `name` is already compiled.
    pub fn add_type_defn(&mut self, name: &str, defn: &TypeDefn) -> Result<(), SchemaError> {
        if self.registry.get(name).is_some() {
            return Ok(());
        }
        if self.custom.contains_key(name) {
            return self.add_custom(name);
        }
        if let TypeDefn::Copy(copy) = defn {
            return self.add_copy(name, copy);
        }
        let slot = self.registry.reserve(name);
        trace!("reserved slot for `{}`", name);
        let node = self.compile(name, defn)?;
        self.registry.fill(slot, node);
        debug!("compiled {} type `{}`", defn.kind_name(), name);
        Ok(())
    }

    /// Compiles every type declared in the schema.
    pub fn add_all(&mut self) -> Result<(), SchemaError> {
        let schema = self.schema;
        for name in schema.types.keys() {
            self.add_type(name)?;
        }
        Ok(())
    }

    /// Finishes compilation.
    pub fn finish(self) -> Transformers {
        Transformers::new(self.registry)
    }

    fn lookup(&self, name: &str) -> Result<Cow<'s, TypeDefn>, SchemaError> {
        let schema = self.schema;
        match schema.types.get(name) {
            Some(defn) => Ok(Cow::Borrowed(defn)),
            None => implicit_type(name)
                .map(Cow::Owned)
                .ok_or_else(|| SchemaError::UnknownType { name: name.into() }),
        }
    }

    fn slot(&mut self, name: &str) -> Result<Slot, SchemaError> {
        self.add_type(name)?;
        self.registry
            .get(name)
            .ok_or_else(|| SchemaError::UnknownType { name: name.into() })
    }

    /// Resolves a type reference, compiling inline definitions under a
    /// synthesized name.
    fn term_slot(&mut self, owner: &str, field: &str, term: &TypeTerm) -> Result<Slot, SchemaError> {
        match term {
            TypeTerm::Name(name) => self.slot(name),
            TypeTerm::Inline(defn) => {
                let anon = format!("{} > {} (anon)", owner, field);
                self.add_type_defn(&anon, &(**defn).clone().into())?;
                self.registry
                    .get(&anon)
                    .ok_or(SchemaError::UnknownType { name: anon })
            }
        }
    }

    fn add_custom(&mut self, name: &str) -> Result<(), SchemaError> {
        let transform = match self.custom.get(name) {
            Some(transform) if transform.is_valid() => transform.clone(),
            _ => return Err(SchemaError::InvalidCustomTransform { name: name.into() }),
        };
        let slot = self.registry.reserve(name);
        self.registry.fill(
            slot,
            Box::new(CustomNode {
                name: name.into(),
                transform,
            }),
        );
        debug!("registered custom transform for `{}`", name);
        Ok(())
    }

    /// A copy shares the converter of the first non-copy type in its chain.
    fn add_copy(&mut self, name: &str, copy: &TypeCopy) -> Result<(), SchemaError> {
        let mut chain = vec![name.to_string()];
        let mut target = copy.from_type.clone();
        loop {
            if chain.contains(&target) {
                chain.push(target);
                return Err(SchemaError::CopyCycle {
                    name: name.into(),
                    chain,
                });
            }
            if self.registry.get(&target).is_some() || self.custom.contains_key(&target) {
                break;
            }
            match &*self.lookup(&target)? {
                TypeDefn::Copy(next) => {
                    let next = next.from_type.clone();
                    chain.push(std::mem::replace(&mut target, next));
                }
                _ => break,
            }
        }
        let slot = self.slot(&target)?;
        for alias in &chain {
            trace!("aliased `{}` to `{}`", alias, target);
            self.registry.alias(alias, slot);
        }
        Ok(())
    }

    fn compile(&mut self, name: &str, defn: &TypeDefn) -> Result<Box<dyn Convert>, SchemaError> {
        let node: Box<dyn Convert> = match defn {
            TypeDefn::Null(_) => Box::new(KindNode(Kind::Null)),
            TypeDefn::Bool(_) => Box::new(KindNode(Kind::Bool)),
            TypeDefn::Int(_) => Box::new(KindNode(Kind::Int)),
            TypeDefn::Float(_) => Box::new(KindNode(Kind::Float)),
            TypeDefn::String(_) => Box::new(KindNode(Kind::String)),
            TypeDefn::Bytes(_) => Box::new(KindNode(Kind::Bytes)),
            TypeDefn::Link(_) => Box::new(KindNode(Kind::Link)),
            TypeDefn::Map(map) => Box::new(self.compile_map(name, map)?),
            TypeDefn::List(list) => Box::new(self.compile_list(name, list)?),
            TypeDefn::Struct(st) => self.compile_struct(name, st)?,
            TypeDefn::Union(union) => Box::new(self.compile_union(name, union)?),
            TypeDefn::Enum(e) => Box::new(compile_enum(name, e)?),
            TypeDefn::Copy(_) => {
                return Err(SchemaError::MalformedType {
                    name: name.into(),
                    reason: "copy types share the converter of their source".into(),
                })
            }
        };
        Ok(node)
    }

    fn compile_map(&mut self, name: &str, map: &TypeMap) -> Result<MapNode, SchemaError> {
        if map.key_type != "String" {
            return Err(SchemaError::InvalidKeyType {
                name: name.into(),
                key_type: map.key_type.clone(),
            });
        }
        let listpairs = match &map.representation {
            MapRepresentation::Map {} => false,
            MapRepresentation::Listpairs {} => true,
            MapRepresentation::Stringpairs { .. } => {
                return Err(unsupported(name, "map", "stringpairs"))
            }
            MapRepresentation::Advanced(_) => return Err(unsupported(name, "map", "advanced")),
        };
        let slot = self.term_slot(name, "valueType", &map.value_type)?;
        Ok(MapNode {
            value_type: ValueType {
                slot,
                nullable: map.value_nullable,
            },
            listpairs,
        })
    }

    fn compile_list(&mut self, name: &str, list: &TypeList) -> Result<ListNode, SchemaError> {
        if let ListRepresentation::Advanced(_) = list.representation {
            return Err(unsupported(name, "list", "advanced"));
        }
        let slot = self.term_slot(name, "valueType", &list.value_type)?;
        Ok(ListNode {
            value_type: ValueType {
                slot,
                nullable: list.value_nullable,
            },
        })
    }

    fn field_node(
        &mut self,
        owner: &str,
        name: &str,
        field: &StructField,
        key: String,
        implicit: Option<Ipld>,
    ) -> Result<FieldNode, SchemaError> {
        let slot = self.term_slot(owner, name, &field.ty)?;
        Ok(FieldNode {
            name: name.into(),
            key,
            value_type: ValueType {
                slot,
                nullable: field.nullable,
            },
            optional: field.optional,
            implicit,
        })
    }

    /// The implicit value must conform to the field type. The typed form is
    /// what gets back-filled and compared against.
    fn typed_implicit(
        &self,
        owner: &str,
        field: &FieldNode,
        implicit: &Ipld,
    ) -> Result<Ipld, SchemaError> {
        match self.registry.to_typed(field.value_type.slot, implicit) {
            Ok(Some(typed)) => Ok(typed.into_owned()),
            _ => Err(SchemaError::InvalidImplicit {
                name: owner.into(),
                field: field.name.clone(),
            }),
        }
    }

    fn compile_struct(
        &mut self,
        name: &str,
        st: &TypeStruct,
    ) -> Result<Box<dyn Convert>, SchemaError> {
        match &st.representation {
            StructRepresentation::Map { fields: details } => {
                if let Some(field) = details.keys().find(|field| !st.fields.contains_key(*field)) {
                    return Err(SchemaError::UnknownField {
                        name: name.into(),
                        field: field.clone(),
                    });
                }
                let mut keys = HashSet::new();
                let mut nodes = Vec::with_capacity(st.fields.len());
                for (field_name, field) in &st.fields {
                    let detail = details.get(field_name);
                    let key = detail
                        .and_then(|detail| detail.rename.clone())
                        .unwrap_or_else(|| field_name.clone());
                    if !keys.insert(key.clone()) {
                        return Err(SchemaError::DuplicateFieldKey {
                            name: name.into(),
                            key,
                        });
                    }
                    let implicit = match detail.and_then(|detail| detail.implicit.as_ref()) {
                        Some(value) => Some(implicit_value(value).ok_or_else(|| {
                            SchemaError::InvalidImplicit {
                                name: name.into(),
                                field: field_name.clone(),
                            }
                        })?),
                        None => None,
                    };
                    let mut node = self.field_node(name, field_name, field, key, implicit)?;
                    if let Some(implicit) = node.implicit.take() {
                        node.implicit = Some(self.typed_implicit(name, &node, &implicit)?);
                    }
                    nodes.push(node);
                }
                Ok(Box::new(StructMapNode::new(nodes)))
            }
            StructRepresentation::Tuple { field_order } => {
                if let Some((field, _)) = st.fields.iter().find(|(_, field)| field.optional) {
                    return Err(SchemaError::OptionalField {
                        name: name.into(),
                        field: field.clone(),
                    });
                }
                let order: Vec<&String> = match field_order {
                    Some(order) => {
                        let unique: HashSet<&String> = order.iter().collect();
                        if order.len() != st.fields.len()
                            || unique.len() != order.len()
                            || !order.iter().all(|field| st.fields.contains_key(field))
                        {
                            return Err(SchemaError::FieldOrder {
                                name: name.into(),
                                expected: st.fields.len(),
                            });
                        }
                        order.iter().collect()
                    }
                    None => st.fields.keys().collect(),
                };
                let mut nodes = Vec::with_capacity(order.len());
                for field_name in order {
                    let field = &st.fields[field_name];
                    nodes.push(self.field_node(name, field_name, field, field_name.clone(), None)?);
                }
                Ok(Box::new(StructTupleNode { fields: nodes }))
            }
            StructRepresentation::Stringpairs { .. } => {
                Err(unsupported(name, "struct", "stringpairs"))
            }
            StructRepresentation::Stringjoin { .. } => {
                Err(unsupported(name, "struct", "stringjoin"))
            }
            StructRepresentation::Listpairs {} => Err(unsupported(name, "struct", "listpairs")),
            StructRepresentation::Advanced(_) => Err(unsupported(name, "struct", "advanced")),
        }
    }

    fn compile_union(&mut self, name: &str, union: &TypeUnion) -> Result<UnionNode, SchemaError> {
        let invalid = |reason: String| SchemaError::InvalidUnion {
            name: name.into(),
            representation: union.representation.name(),
            reason,
        };
        let strategy = match &union.representation {
            UnionRepresentation::Kinded(table) => {
                let mut kinds = Vec::with_capacity(table.len());
                for (kind, member) in resolve_members(union, table).map_err(invalid)? {
                    let kind = Kind::from_name(&kind)
                        .ok_or_else(|| invalid(format!("`{}` is not a kind", kind)))?;
                    kinds.push((kind, member));
                }
                UnionStrategy::Kinded(kinds)
            }
            UnionRepresentation::Keyed(table) => {
                UnionStrategy::Keyed(resolve_members(union, table).map_err(invalid)?)
            }
            UnionRepresentation::Envelope {
                discriminant_key,
                content_key,
                discriminant_table,
            } => {
                if discriminant_key.is_empty() || content_key.is_empty() {
                    return Err(invalid("discriminant and content keys must not be empty".into()));
                }
                if discriminant_key == content_key {
                    return Err(invalid(format!(
                        "discriminant and content share the key `{}`",
                        content_key
                    )));
                }
                UnionStrategy::Envelope {
                    discriminant_key: discriminant_key.clone(),
                    content_key: content_key.clone(),
                    table: resolve_members(union, discriminant_table).map_err(invalid)?,
                }
            }
            UnionRepresentation::Inline {
                discriminant_key,
                discriminant_table,
            } => {
                if discriminant_key.is_empty() {
                    return Err(invalid("discriminant key must not be empty".into()));
                }
                UnionStrategy::Inline {
                    discriminant_key: discriminant_key.clone(),
                    table: resolve_members(union, discriminant_table).map_err(invalid)?,
                }
            }
            UnionRepresentation::Stringprefix { prefixes } => {
                let table = resolve_members(union, prefixes).map_err(invalid)?;
                check_prefixes(&table).map_err(invalid)?;
                UnionStrategy::StringPrefix(table)
            }
            UnionRepresentation::Bytesprefix { prefixes } => {
                let mut table = Vec::with_capacity(prefixes.len());
                for (prefix, member) in resolve_members(union, prefixes).map_err(invalid)? {
                    let bytes = hex::decode(&prefix)
                        .map_err(|err| invalid(format!("prefix `{}` is not hex: {}", prefix, err)))?;
                    table.push((bytes, member));
                }
                check_prefixes(&table).map_err(invalid)?;
                UnionStrategy::BytesPrefix(table)
            }
        };
        let mut members = Vec::with_capacity(union.members.len());
        for member in &union.members {
            if members.iter().any(|m: &Member| m.name == *member) {
                return Err(invalid(format!("member `{}` is listed twice", member)));
            }
            members.push(Member {
                name: member.clone(),
                slot: self.slot(member)?,
            });
        }
        Ok(UnionNode { members, strategy })
    }
}

fn unsupported(name: &str, kind: &'static str, representation: &str) -> SchemaError {
    SchemaError::UnsupportedRepresentation {
        name: name.into(),
        kind,
        representation: representation.into(),
    }
}

/// Maps every discriminant of a union table to the index of its member. Each
/// member may be selected by at most one discriminant.
fn resolve_members(
    union: &TypeUnion,
    table: &IndexMap<String, TypeName>,
) -> Result<Vec<(String, usize)>, String> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(table.len());
    for (discriminant, member) in table {
        let index = union
            .members
            .iter()
            .position(|m| m == member)
            .ok_or_else(|| format!("`{}` is not a member", member))?;
        if !seen.insert(index) {
            return Err(format!("member `{}` is selected more than once", member));
        }
        resolved.push((discriminant.clone(), index));
    }
    Ok(resolved)
}

/// No prefix may start another, or the member would be ambiguous.
fn check_prefixes<P: AsRef<[u8]>>(table: &[(P, usize)]) -> Result<(), String> {
    for (i, (a, _)) in table.iter().enumerate() {
        for (b, _) in &table[i + 1..] {
            let (a, b) = (a.as_ref(), b.as_ref());
            if a.starts_with(b) || b.starts_with(a) {
                return Err("prefixes overlap, members would be ambiguous".into());
            }
        }
    }
    Ok(())
}

fn compile_enum(name: &str, e: &TypeEnum) -> Result<EnumNode, SchemaError> {
    let invalid = |reason: String| SchemaError::InvalidEnum {
        name: name.into(),
        reason,
    };
    let declared: HashSet<&String> = e.members.iter().collect();
    if declared.len() != e.members.len() {
        return Err(invalid("members are listed more than once".into()));
    }
    let members: Vec<(String, Ipld)> = match &e.representation {
        EnumRepresentation::String(table) => {
            if let Some(member) = table.keys().find(|member| !declared.contains(member)) {
                return Err(invalid(format!("`{}` is not a member", member)));
            }
            e.members
                .iter()
                .map(|member| {
                    let repr = table.get(member).unwrap_or(member);
                    (member.clone(), Ipld::String(repr.clone()))
                })
                .collect()
        }
        EnumRepresentation::Int(table) => {
            if let Some(member) = table.keys().find(|member| !declared.contains(member)) {
                return Err(invalid(format!("`{}` is not a member", member)));
            }
            let mut members = Vec::with_capacity(e.members.len());
            for member in &e.members {
                let repr = table
                    .get(member)
                    .ok_or_else(|| invalid(format!("member `{}` has no int value", member)))?;
                members.push((member.clone(), Ipld::Integer((*repr).into())));
            }
            members
        }
    };
    for (i, (member, repr)) in members.iter().enumerate() {
        if members[..i].iter().any(|(_, other)| other == repr) {
            return Err(invalid(format!(
                "member `{}` shares its representation with another member",
                member
            )));
        }
    }
    Ok(EnumNode { members })
}

/// Implicit values must be scalars.
fn implicit_value(value: &serde_json::Value) -> Option<Ipld> {
    use serde_json::Value;
    match value {
        Value::Bool(b) => Some(Ipld::Bool(*b)),
        Value::String(s) => Some(Ipld::String(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .map(|i| Ipld::Integer(i.into()))
            .or_else(|| n.as_u64().map(|u| Ipld::Integer(u.into())))
            .or_else(|| n.as_f64().map(Ipld::Float)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
