use ipld_typed_core::ipld::Ipld;
use ipld_typed_macro::ipld;
use ipld_typed_schema::{create, Options, Schema, Transformer};
use quickcheck::quickcheck;
use std::borrow::Cow;

fn transformer(types: &str, root: &str) -> Transformer {
    let schema = Schema::from_json(&format!(r#"{{ "types": {} }}"#, types)).unwrap();
    create(&schema, root, Options::default()).unwrap()
}

fn to_typed(t: &Transformer, value: Ipld) -> Option<Ipld> {
    t.to_typed(&value).unwrap().map(Cow::into_owned)
}

fn to_repr(t: &Transformer, value: Ipld) -> Option<Ipld> {
    t.to_representation(&value).unwrap().map(Cow::into_owned)
}

#[test]
fn list_elements() {
    let list = transformer(r#"{ "L": { "list": { "valueType": "Int" } } }"#, "L");
    assert_eq!(to_typed(&list, ipld!([1, 2])), Some(ipld!([1, 2])));
    assert_eq!(to_typed(&list, ipld!([1, "2"])), None);
    assert_eq!(to_typed(&list, ipld!([1, null])), None);
    assert_eq!(to_typed(&list, ipld!({})), None);
    assert_eq!(to_typed(&list, ipld!([])), Some(ipld!([])));
}

#[test]
fn nullable_list_elements() {
    let list = transformer(
        r#"{ "L": { "list": { "valueType": "Int", "valueNullable": true } } }"#,
        "L",
    );
    let value = ipld!([1, null]);
    let typed = list.to_typed(&value).unwrap().unwrap();
    assert!(matches!(typed, Cow::Borrowed(typed) if std::ptr::eq(typed, &value)));
}

#[test]
fn changed_list_elements() {
    let list = transformer(r#"{ "L": { "list": { "valueType": "Any" } } }"#, "L");
    let repr = ipld!([1, "a"]);
    let typed = ipld!([{ "Int": 1 }, { "String": "a" }]);
    assert_eq!(to_typed(&list, repr.clone()), Some(typed.clone()));
    assert_eq!(to_repr(&list, typed), Some(repr));
}

#[test]
fn map_values() {
    let map = transformer(
        r#"{ "M": { "map": { "keyType": "String", "valueType": "Int" } } }"#,
        "M",
    );
    let value = ipld!({ "a": 1, "b": 2 });
    let typed = map.to_typed(&value).unwrap().unwrap();
    assert!(matches!(typed, Cow::Borrowed(typed) if std::ptr::eq(typed, &value)));
    let repr = map.to_representation(&value).unwrap().unwrap();
    assert!(matches!(repr, Cow::Borrowed(repr) if std::ptr::eq(repr, &value)));
    assert_eq!(to_typed(&map, ipld!({ "a": 1, "b": 2.0 })), None);
    assert_eq!(to_typed(&map, ipld!({ "a": null })), None);
    assert_eq!(to_typed(&map, ipld!([])), None);
}

#[test]
fn inline_map_value_type() {
    let map = transformer(
        r#"{
            "M": {
                "map": {
                    "keyType": "String",
                    "valueType": { "list": { "valueType": "Bool" } },
                    "valueNullable": true
                }
            }
        }"#,
        "M",
    );
    assert!(to_typed(&map, ipld!({ "a": [true], "b": null })).is_some());
    assert_eq!(to_typed(&map, ipld!({ "a": [1] })), None);
}

#[test]
fn listpairs_map() {
    let map = transformer(
        r#"{
            "M": {
                "map": {
                    "keyType": "String",
                    "valueType": "Int",
                    "representation": { "listpairs": {} }
                }
            }
        }"#,
        "M",
    );
    assert_eq!(
        to_typed(&map, ipld!([["b", 2], ["a", 1]])),
        Some(ipld!({ "a": 1, "b": 2 }))
    );
    assert_eq!(
        to_repr(&map, ipld!({ "b": 2, "a": 1 })),
        Some(ipld!([["a", 1], ["b", 2]]))
    );
    assert_eq!(to_typed(&map, ipld!([["a", 1], ["a", 2]])), None);
    assert_eq!(to_typed(&map, ipld!([["a", 1, 2]])), None);
    assert_eq!(to_typed(&map, ipld!([[1, 1]])), None);
    assert_eq!(to_typed(&map, ipld!([["a", "1"]])), None);
    assert_eq!(to_typed(&map, ipld!({ "a": 1 })), None);
}

#[test]
fn recursive_user_type() {
    let tree = transformer(
        r#"{
            "Tree": {
                "struct": {
                    "fields": {
                        "value": { "type": "Int" },
                        "children": { "type": { "list": { "valueType": "Tree" } } }
                    },
                    "representation": { "tuple": {} }
                }
            }
        }"#,
        "Tree",
    );
    let repr = ipld!([1, [[2, []], [3, [[4, []]]]]]);
    let typed = to_typed(&tree, repr.clone()).unwrap();
    assert_eq!(
        typed.get("children").unwrap().get(1usize).unwrap().get("value").unwrap(),
        &Ipld::Integer(3)
    );
    assert_eq!(to_repr(&tree, typed), Some(repr));
    assert_eq!(to_typed(&tree, ipld!([1, [[2, [["x", []]]]]])), None);
}

#[test]
fn any_nests() {
    let any = transformer("{}", "Any");
    assert_eq!(
        to_typed(&any, ipld!({ "a": [1, null] })),
        Some(ipld!({ "AnyMap": { "a": { "AnyList": [{ "Int": 1 }, null] } } }))
    );
    assert_eq!(to_typed(&any, ipld!(null)), Some(ipld!({ "Null": null })));
}

#[test]
fn links() {
    let link = transformer(r#"{ "L": { "link": {} } }"#, "L");
    let cid = ipld_typed_core::cid::Cid::try_from(
        "bafyreibvjvcv745gig4mvqs4hctx4zfkono4rjejm2ta6gtyzkqxfjeily",
    )
    .unwrap();
    assert_eq!(to_typed(&link, ipld!(cid)), Some(Ipld::Link(cid)));
    assert_eq!(to_typed(&link, ipld!("x")), None);
}

quickcheck! {
    fn any_round_trips(value: Ipld) -> bool {
        let any = transformer("{}", "Any");
        let Some(typed) = any.to_typed(&value).unwrap() else {
            return false;
        };
        any.to_representation(&typed).unwrap().as_deref() == Some(&value)
    }

    fn scalars_are_unchanged(value: Ipld) -> bool {
        let any = transformer("{}", "AnyScalar");
        match &value {
            Ipld::Null | Ipld::Link(_) | Ipld::List(_) | Ipld::Map(_) => {
                any.to_typed(&value).unwrap().is_none()
            }
            _ => {
                let typed = any.to_typed(&value).unwrap().unwrap();
                let inner = typed.as_map().and_then(|map| map.values().next()).unwrap();
                inner == &value
            }
        }
    }
}
