//! Json codec.
#![deny(missing_docs)]

use ipld_typed_core::ipld::Ipld;
use std::io::{Read, Write};
use thiserror::Error;

mod codec;

/// Json codec error.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying json encoder or decoder failed.
    #[error("dag-json: {0}")]
    Json(#[from] serde_json::Error),
    /// Encoded output was not valid UTF-8.
    #[error("dag-json output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Json codec.
#[derive(Clone, Copy, Debug)]
pub struct DagJsonCodec;

impl DagJsonCodec {
    /// Encodes into a `impl Write`.
    pub fn encode_to<W: Write>(ipld: &Ipld, w: &mut W) -> Result<(), Error> {
        Ok(codec::encode(ipld, w)?)
    }

    /// Decodes from a `impl Read`.
    pub fn decode_from<R: Read>(r: &mut R) -> Result<Ipld, Error> {
        Ok(codec::decode(r)?)
    }

    /// Encodes an ipld value.
    pub fn encode(ipld: &Ipld) -> Result<Box<[u8]>, Error> {
        let mut buf = Vec::new();
        Self::encode_to(ipld, &mut buf)?;
        Ok(buf.into_boxed_slice())
    }

    /// Decodes an ipld value.
    pub fn decode(mut bytes: &[u8]) -> Result<Ipld, Error> {
        Self::decode_from(&mut bytes)
    }
}

/// Encodes an ipld value as a dag-json string.
pub fn to_string(ipld: &Ipld) -> Result<String, Error> {
    let bytes = DagJsonCodec::encode(ipld)?;
    Ok(String::from_utf8(bytes.into_vec())?)
}

/// Decodes a dag-json string.
pub fn from_str(json: &str) -> Result<Ipld, Error> {
    DagJsonCodec::decode(json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipld_typed_core::cid::Cid;
    use ipld_typed_macro::ipld;

    const CID: &str = "bafyreibvjvcv745gig4mvqs4hctx4zfkono4rjejm2ta6gtyzkqxfjeily";

    #[test]
    fn encode_struct() {
        let cid = Cid::try_from(CID).unwrap();

        // Create a contact object that looks like:
        // Contact { name: "Hello World", details: CID }
        let contact = ipld!({
            "name": "Hello World!",
            "details": cid,
        });

        let contact_encoded = to_string(&contact).unwrap();
        assert_eq!(
            contact_encoded,
            format!(r#"{{"details":{{"/":"{}"}},"name":"Hello World!"}}"#, CID)
        );

        let contact_decoded = from_str(&contact_encoded).unwrap();
        assert_eq!(contact_decoded, contact);
    }

    #[test]
    fn bytes() {
        let ipld = ipld!({ "data": vec![0u8, 1, 2, 3] });
        let encoded = to_string(&ipld).unwrap();
        assert_eq!(encoded, r#"{"data":{"/":{"bytes":"AAECAw"}}}"#);
        assert_eq!(from_str(&encoded).unwrap(), ipld);
    }

    #[test]
    fn integers_and_floats_stay_apart() {
        let ipld = from_str("[1, 1.5, -3, null, true]").unwrap();
        assert_eq!(ipld, ipld!([1, 1.5, -3, null, true]));
    }

    #[test]
    fn slash_key_with_other_keys_is_a_map() {
        let ipld = from_str(r#"{"/": "x", "y": 1}"#).unwrap();
        assert_eq!(ipld, ipld!({ "/": "x", "y": 1 }));
    }

    #[test]
    fn malformed_link_fails() {
        assert!(from_str(r#"{"/": "not a cid"}"#).is_err());
    }
}
