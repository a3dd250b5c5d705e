//! The schema model.
//!
//! A [`Schema`] is the parsed form of an IPLD schema: a mapping of type names
//! to type definitions. It mirrors the JSON form of the schema-schema, so it
//! can be loaded with [`Schema::from_json`]:
//!
//! ```
//! # use ipld_typed_schema::Schema;
//! let schema = Schema::from_json(r#"{
//!     "types": {
//!         "Point": {
//!             "struct": {
//!                 "fields": { "x": { "type": "Int" }, "y": { "type": "Int" } },
//!                 "representation": { "tuple": {} }
//!             }
//!         }
//!     }
//! }"#).unwrap();
//! assert!(schema.types.contains_key("Point"));
//! ```
mod representation;
mod typedef;

pub use representation::*;
pub use typedef::*;

use crate::error::SchemaError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A parsed schema.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Type definitions by name, in declaration order.
    pub types: IndexMap<TypeName, TypeDefn>,
    /// Advanced data layout declarations.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub advanced: IndexMap<String, AdvancedDataLayout>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type definition.
    pub fn with_type(mut self, name: impl Into<TypeName>, defn: TypeDefn) -> Self {
        self.types.insert(name.into(), defn);
        self
    }

    /// Parses the JSON form of a schema.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let value: Value =
            serde_json::from_str(json).map_err(|err| SchemaError::Parse(err.to_string()))?;
        Self::from_json_value(value)
    }

    /// Builds a schema from an already parsed JSON value.
    ///
    /// Each definition is decoded on its own so errors name the offending
    /// type.
    pub fn from_json_value(value: Value) -> Result<Self, SchemaError> {
        let mut root = match value {
            Value::Object(root) => root,
            _ => return Err(SchemaError::MissingTypes),
        };
        let types = match root.remove("types") {
            Some(Value::Object(types)) => types,
            _ => return Err(SchemaError::MissingTypes),
        };

        let mut schema = Schema::new();
        for (name, defn) in types {
            let defn = decode_defn(&name, defn)?;
            schema.types.insert(name, defn);
        }
        if let Some(advanced) = root.remove("advanced") {
            schema.advanced = serde_json::from_value(advanced)
                .map_err(|err| SchemaError::Parse(format!("advanced: {}", err)))?;
        }
        Ok(schema)
    }
}

fn decode_defn(name: &str, defn: Value) -> Result<TypeDefn, SchemaError> {
    let malformed = |reason: String| SchemaError::MalformedType {
        name: name.into(),
        reason,
    };
    match &defn {
        Value::Object(kinds) if kinds.len() == 1 => {}
        Value::Object(kinds) if kinds.is_empty() => {
            return Err(malformed("no kind declared".into()));
        }
        Value::Object(kinds) => {
            let kinds: Vec<&str> = kinds.keys().map(String::as_str).collect();
            return Err(malformed(format!(
                "more than one kind declared: {}",
                kinds.join(", ")
            )));
        }
        _ => return Err(malformed("definition is not a map".into())),
    }
    serde_json::from_value(defn).map_err(|err| malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_kinds() {
        let schema = Schema::from_json(
            r#"{
                "types": {
                    "B": { "bool": {} },
                    "S": { "string": {} },
                    "M": { "map": { "keyType": "String", "valueType": "S" } },
                    "L": { "list": { "valueType": { "link": { "expectedType": "M" } } } },
                    "U": { "union": {
                        "members": ["B", "S"],
                        "representation": { "kinded": { "bool": "B", "string": "S" } }
                    } },
                    "E": { "enum": { "members": ["A", "Z"] } },
                    "C": { "copy": { "fromType": "S" } }
                }
            }"#,
        )
        .unwrap();
        let kinds: Vec<_> = schema.types.values().map(TypeDefn::kind_name).collect();
        assert_eq!(
            kinds,
            vec!["bool", "string", "map", "list", "union", "enum", "copy"]
        );
        match &schema.types["L"] {
            TypeDefn::List(list) => {
                assert!(matches!(&list.value_type, TypeTerm::Inline(d) if matches!(**d, InlineDefn::Link(_))))
            }
            other => panic!("unexpected {:?}", other),
        }
        match &schema.types["E"] {
            TypeDefn::Enum(e) => assert_eq!(e.representation, EnumRepresentation::default()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn struct_field_order_is_preserved() {
        let schema = Schema::from_json(
            r#"{ "types": { "T": { "struct": { "fields": {
                "zeta": { "type": "Int" },
                "alpha": { "type": "Int", "optional": true },
                "mid": { "type": "String", "nullable": true }
            } } } } }"#,
        )
        .unwrap();
        let TypeDefn::Struct(st) = &schema.types["T"] else {
            panic!("not a struct");
        };
        let names: Vec<_> = st.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert!(st.fields["alpha"].optional);
        assert!(st.fields["mid"].nullable);
        assert_eq!(st.representation, StructRepresentation::default());
    }

    #[test]
    fn unsupported_strategies_still_parse() {
        let schema = Schema::from_json(
            r#"{ "types": {
                "P": { "struct": {
                    "fields": { "a": { "type": "String" } },
                    "representation": { "stringjoin": { "join": ":" } }
                } },
                "Q": { "map": {
                    "keyType": "String", "valueType": "String",
                    "representation": { "stringpairs": { "innerDelim": "=", "entryDelim": "," } }
                } },
                "R": { "list": { "valueType": "String", "representation": { "advanced": "Rope" } } }
            }, "advanced": { "Rope": {} } }"#,
        )
        .unwrap();
        assert_eq!(schema.types.len(), 3);
        assert!(schema.advanced.contains_key("Rope"));
    }

    #[test]
    fn missing_types_is_an_error() {
        assert!(matches!(
            Schema::from_json(r#"{ "typez": {} }"#),
            Err(SchemaError::MissingTypes)
        ));
        assert!(matches!(
            Schema::from_json("[]"),
            Err(SchemaError::MissingTypes)
        ));
        assert!(matches!(
            Schema::from_json("{"),
            Err(SchemaError::Parse(_))
        ));
    }

    #[test]
    fn definitions_need_exactly_one_kind() {
        let err = Schema::from_json(r#"{ "types": { "Nothing": {} } }"#).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedType { ref name, .. } if name == "Nothing"));

        let err = Schema::from_json(r#"{ "types": { "Both": { "int": {}, "bool": {} } } }"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::MalformedType { ref name, .. } if name == "Both"));

        let err = Schema::from_json(r#"{ "types": { "Odd": { "integer": {} } } }"#).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedType { ref name, .. } if name == "Odd"));
    }

    #[test]
    fn union_tables_must_name_members_with_strings() {
        let err = Schema::from_json(
            r#"{ "types": { "U": { "union": {
                "members": ["Int"],
                "representation": { "kinded": { "int": 5 } }
            } } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::MalformedType { ref name, .. } if name == "U"));
    }

    #[test]
    fn envelope_requires_content_key() {
        let err = Schema::from_json(
            r#"{ "types": { "U": { "union": {
                "members": ["Int"],
                "representation": { "envelope": {
                    "discriminantKey": "tag",
                    "discriminantTable": { "i": "Int" }
                } }
            } } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::MalformedType { ref name, .. } if name == "U"));
    }

    #[test]
    fn builder_helpers() {
        let schema = Schema::new().with_type("Flag", TypeDefn::Bool(TypeBool {}));
        assert_eq!(schema.types["Flag"].kind_name(), "bool");
    }
}
