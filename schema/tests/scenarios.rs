use ipld_typed_core::ipld::Ipld;
use ipld_typed_macro::ipld;
use ipld_typed_schema::{create, Options, Schema, SchemaError, Transformer};
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
fn tuple_struct() {
    let point = transformer(
        r#"{
            "Point": {
                "struct": {
                    "fields": { "x": { "type": "Int" }, "y": { "type": "Int" } },
                    "representation": { "tuple": {} }
                }
            }
        }"#,
        "Point",
    );
    assert_eq!(to_typed(&point, ipld!([3, 4])), Some(ipld!({ "x": 3, "y": 4 })));
    assert_eq!(to_repr(&point, ipld!({ "x": 3, "y": 4 })), Some(ipld!([3, 4])));
    assert_eq!(to_typed(&point, ipld!([3])), None);
    assert_eq!(to_typed(&point, ipld!({ "x": 3, "y": 4 })), None);
}

#[test]
fn kinded_union() {
    let v = transformer(
        r#"{
            "V": {
                "union": {
                    "members": ["Int", "String"],
                    "representation": { "kinded": { "int": "Int", "string": "String" } }
                }
            }
        }"#,
        "V",
    );
    assert_eq!(to_typed(&v, ipld!(5)), Some(ipld!({ "Int": 5 })));
    assert_eq!(to_typed(&v, ipld!("hi")), Some(ipld!({ "String": "hi" })));
    assert_eq!(to_typed(&v, ipld!(true)), None);
    assert_eq!(to_repr(&v, ipld!({ "Int": 5 })), Some(ipld!(5)));
}

#[test]
fn renamed_enum_member() {
    let e = transformer(
        r#"{
            "E": {
                "enum": {
                    "members": ["Foo", "Bar"],
                    "representation": { "string": { "Foo": "f" } }
                }
            }
        }"#,
        "E",
    );
    assert_eq!(to_typed(&e, ipld!("f")), Some(ipld!("Foo")));
    assert_eq!(to_typed(&e, ipld!("Bar")), Some(ipld!("Bar")));
    assert_eq!(to_repr(&e, ipld!("Foo")), Some(ipld!("f")));
    assert_eq!(to_typed(&e, ipld!("Foo")), None);
}

#[test]
fn implicit_field() {
    let s = transformer(
        r#"{
            "S": {
                "struct": {
                    "fields": { "bar": { "type": "Bool" } },
                    "representation": { "map": { "fields": { "bar": { "implicit": false } } } }
                }
            }
        }"#,
        "S",
    );
    assert_eq!(to_typed(&s, ipld!({})), Some(ipld!({ "bar": false })));
    assert_eq!(to_repr(&s, ipld!({ "bar": false })), Some(ipld!({})));
    assert_eq!(to_repr(&s, ipld!({ "bar": true })), Some(ipld!({ "bar": true })));
}

#[test]
fn unchanged_list_is_returned_as_is() {
    let list = transformer(
        r#"{ "Names": { "list": { "valueType": "String" } } }"#,
        "Names",
    );
    let value = ipld!(["a", "b"]);
    let typed = list.to_typed(&value).unwrap().unwrap();
    assert!(matches!(typed, Cow::Borrowed(typed) if std::ptr::eq(typed, &value)));
    let repr = list.to_representation(&value).unwrap().unwrap();
    assert!(matches!(repr, Cow::Borrowed(repr) if std::ptr::eq(repr, &value)));
}

#[test]
fn forward_copy_chain() {
    let b = transformer(
        r#"{
            "B": { "copy": { "fromType": "A" } },
            "A": { "string": {} }
        }"#,
        "B",
    );
    assert_eq!(to_typed(&b, ipld!("x")), Some(ipld!("x")));
    assert_eq!(to_typed(&b, ipld!(1)), None);
}

#[test]
fn self_copy_fails_to_build() {
    let schema =
        Schema::from_json(r#"{ "types": { "A": { "copy": { "fromType": "A" } } } }"#).unwrap();
    let err = create(&schema, "A", Options::default()).unwrap_err();
    match err {
        SchemaError::CopyCycle { name, chain } => {
            assert_eq!(name, "A");
            assert_eq!(chain, vec!["A", "A"]);
        }
        err => panic!("unexpected error: {}", err),
    }
}
