#![no_main]

use libfuzzer_sys::fuzz_target;
use stencil_analysis::{Analyzer, CacheConfig, DocumentId, GrammarLoader, Position};

const MAX_SOURCE_BYTES: usize = 4096;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let capped = &data[2..data.len().min(MAX_SOURCE_BYTES + 2)];
    let text = String::from_utf8_lossy(capped).into_owned();

    let Ok(grammar) = GrammarLoader::default().initialize() else {
        return;
    };
    let mut analyzer = Analyzer::new(grammar, CacheConfig::default());
    let id = DocumentId::from("fuzz.edge");
    let _ = analyzer.analyze(&id, 1, &text);

    let position = Position::new(u32::from(data[0] % 8), u32::from(data[1]));
    let from_tree = analyzer.classify(&id, &text, position);
    let from_text = analyzer.classify_text(&text, position);
    let _ = (from_tree, from_text);
});
