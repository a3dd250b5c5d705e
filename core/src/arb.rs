//! Quickcheck `Arbitrary` for `Ipld`.
use crate::cid::Cid;
use crate::ipld::Ipld;
use quickcheck::{Arbitrary, Gen};
use std::collections::BTreeMap;

const CIDS: [&str; 2] = [
    "bafyreibvjvcv745gig4mvqs4hctx4zfkono4rjejm2ta6gtyzkqxfjeily",
    "QmdfTbBqBPQ7VNxZEYEj14VmRuZBkqFbiwReogJgS1zR1n",
];

impl Arbitrary for Ipld {
    fn arbitrary(g: &mut Gen) -> Self {
        arbitrary_ipld(g, 2)
    }
}

fn arbitrary_ipld(g: &mut Gen, depth: usize) -> Ipld {
    let choices: &[u8] = if depth == 0 {
        &[0, 1, 2, 3, 4, 5, 6]
    } else {
        &[0, 1, 2, 3, 4, 5, 6, 7, 8]
    };
    match g.choose(choices).copied().unwrap_or(0) {
        0 => Ipld::Null,
        1 => Ipld::Bool(bool::arbitrary(g)),
        2 => Ipld::Integer(i64::arbitrary(g).into()),
        3 => {
            let f = f64::arbitrary(g);
            Ipld::Float(if f.is_finite() { f } else { 0.0 })
        }
        4 => Ipld::String(String::arbitrary(g)),
        5 => Ipld::Bytes(Vec::arbitrary(g)),
        6 => {
            let cid = g.choose(&CIDS).copied().unwrap_or(CIDS[0]);
            Cid::try_from(cid).map(Ipld::Link).unwrap_or(Ipld::Null)
        }
        7 => {
            let len = usize::arbitrary(g) % 4;
            Ipld::List((0..len).map(|_| arbitrary_ipld(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let map: BTreeMap<_, _> = (0..len)
                .map(|_| (String::arbitrary(g), arbitrary_ipld(g, depth - 1)))
                .collect();
            Ipld::Map(map)
        }
    }
}
