use rand::{rngs::StdRng, Rng, SeedableRng};
use varstream::{encode_record, Span, DEFAULT_TAG};

/// Frames every payload with the default tag.
pub fn build_stream(payloads: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    for p in payloads {
        encode_record(DEFAULT_TAG, p, &mut out);
    }
    out
}

/// Expected payload spans for a stream built by `build_stream`.
#[allow(dead_code)]
pub fn expected_spans(payloads: &[Vec<u8>]) -> Vec<Span> {
    let mut spans = Vec::with_capacity(payloads.len());
    let mut pos = 0u64;
    for p in payloads {
        let len = p.len() as u64;
        let start = pos + 1 + varstream::encode_varint(len).len() as u64;
        spans.push(Span {
            start,
            end: start + len,
        });
        pos = start + len;
    }
    spans
}

/// Deterministic payloads of the given sizes.
#[allow(dead_code)]
pub fn gen_payloads(seed: u64, sizes: &[usize]) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    sizes
        .iter()
        .map(|&n| (0..n).map(|_| rng.gen::<u8>()).collect())
        .collect()
}
