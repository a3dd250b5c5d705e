use ipld_typed_schema::{create, Options, Schema};
use std::borrow::Cow;

const SCHEMA: &str = r#"{
    "types": {
        "Block": {
            "struct": {
                "fields": {
                    "parent": { "type": { "link": {} }, "nullable": true },
                    "payload": { "type": "Payload" }
                },
                "representation": { "map": { "fields": { "parent": { "rename": "p" } } } }
            }
        },
        "Payload": {
            "union": {
                "members": ["Bytes", "String"],
                "representation": { "kinded": { "bytes": "Bytes", "string": "String" } }
            }
        }
    }
}"#;

#[test]
fn dag_json_round_trip() {
    let schema = Schema::from_json(SCHEMA).unwrap();
    let block = create(&schema, "Block", Options::default()).unwrap();

    let text = r#"{"p":{"/":"bafyreibvjvcv745gig4mvqs4hctx4zfkono4rjejm2ta6gtyzkqxfjeily"},"payload":{"/":{"bytes":"AAECAw"}}}"#;
    let repr = ipld_typed_json::from_str(text).unwrap();
    let typed = block.to_typed(&repr).unwrap().unwrap();
    assert_eq!(
        ipld_typed_json::to_string(&typed).unwrap(),
        r#"{"parent":{"/":"bafyreibvjvcv745gig4mvqs4hctx4zfkono4rjejm2ta6gtyzkqxfjeily"},"payload":{"Bytes":{"/":{"bytes":"AAECAw"}}}}"#
    );
    let back = block.to_representation(&typed).unwrap().unwrap();
    assert_eq!(ipld_typed_json::to_string(&back).unwrap(), text);
}

#[test]
fn null_parent() {
    let schema = Schema::from_json(SCHEMA).unwrap();
    let block = create(&schema, "Block", Options::default()).unwrap();
    let repr = ipld_typed_json::from_str(r#"{"p":null,"payload":"genesis"}"#).unwrap();
    let typed = block.to_typed(&repr).unwrap().unwrap();
    assert!(matches!(typed, Cow::Owned(_)));
    assert_eq!(
        ipld_typed_json::to_string(&typed).unwrap(),
        r#"{"parent":null,"payload":{"String":"genesis"}}"#
    );
}
