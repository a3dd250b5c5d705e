//! Types available to every schema without being declared.
use crate::schema::{
    TypeBool, TypeBytes, TypeDefn, TypeFloat, TypeInt, TypeLink, TypeList, TypeMap, TypeNull,
    TypeString, TypeUnion, UnionRepresentation,
};
use indexmap::IndexMap;

/// Names of the implicit types.
pub const IMPLICIT_TYPES: [&str; 11] = [
    "Null",
    "Bool",
    "Int",
    "Float",
    "String",
    "Bytes",
    "Link",
    "AnyScalar",
    "AnyMap",
    "AnyList",
    "Any",
];

fn kinded(members: &[(&str, &str)]) -> TypeDefn {
    let table: IndexMap<String, String> = members
        .iter()
        .map(|(kind, member)| (kind.to_string(), member.to_string()))
        .collect();
    TypeDefn::Union(TypeUnion {
        members: members.iter().map(|(_, member)| member.to_string()).collect(),
        representation: UnionRepresentation::Kinded(table),
    })
}

/// Returns the definition of an implicit type.
///
/// `Any` is recursive through `AnyMap` and `AnyList`.
pub fn implicit_type(name: &str) -> Option<TypeDefn> {
    let defn = match name {
        "Null" => TypeDefn::Null(TypeNull {}),
        "Bool" => TypeDefn::Bool(TypeBool {}),
        "Int" => TypeDefn::Int(TypeInt {}),
        "Float" => TypeDefn::Float(TypeFloat {}),
        "String" => TypeDefn::String(TypeString {}),
        "Bytes" => TypeDefn::Bytes(TypeBytes {}),
        "Link" => TypeDefn::Link(TypeLink::default()),
        "AnyScalar" => kinded(&[
            ("bool", "Bool"),
            ("string", "String"),
            ("bytes", "Bytes"),
            ("int", "Int"),
            ("float", "Float"),
        ]),
        "AnyMap" => TypeDefn::Map(TypeMap {
            key_type: "String".into(),
            value_type: "Any".into(),
            value_nullable: true,
            representation: Default::default(),
        }),
        "AnyList" => TypeDefn::List(TypeList {
            value_type: "Any".into(),
            value_nullable: true,
            representation: Default::default(),
        }),
        "Any" => kinded(&[
            ("bool", "Bool"),
            ("string", "String"),
            ("bytes", "Bytes"),
            ("int", "Int"),
            ("float", "Float"),
            ("null", "Null"),
            ("link", "Link"),
            ("map", "AnyMap"),
            ("list", "AnyList"),
        ]),
        _ => return None,
    };
    Some(defn)
}
