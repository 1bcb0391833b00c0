#![no_main]

use libfuzzer_sys::fuzz_target;
use stencil_syntax::parser::{parse, reparse};

const MAX_SOURCE_BYTES: usize = 4096;

fn decode_source(bytes: &[u8]) -> String {
    let capped = &bytes[..bytes.len().min(MAX_SOURCE_BYTES)];
    String::from_utf8_lossy(capped).into_owned()
}

fn char_boundary(source: &str, seed: u8) -> usize {
    let mut offset = usize::from(seed) % (source.len() + 1);
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First two bytes pick the split; the rest is old text and inserted text.
    let split = usize::from(data[0]) % (data.len() - 1) + 2;
    let old_text = decode_source(&data[2..split.min(data.len())]);
    let inserted = decode_source(&data[split.min(data.len())..]);

    let start = char_boundary(&old_text, data[1]);
    let end = char_boundary(&old_text, data[1].wrapping_mul(31));
    let (start, end) = if start <= end { (start, end) } else { (end, start) };

    let mut new_text = String::with_capacity(old_text.len() + inserted.len());
    new_text.push_str(&old_text[..start]);
    new_text.push_str(&inserted);
    new_text.push_str(&old_text[end..]);

    let previous = parse(&old_text);
    let incremental = reparse(&previous, &new_text);
    let full = parse(&new_text);
    assert_eq!(incremental, full);
    assert_eq!(incremental.syntax().to_string(), new_text);
});
