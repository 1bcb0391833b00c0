mod common;
use common::*;

use stencil_syntax::parser::reparse_with_stats;

const DOCUMENTS: &[&str] = &[
    "<h1>{{ title }}</h1>\n@if(user)\n  <p>{{ user.name }}</p>\n@else\n  <p>guest</p>\n@end\n",
    "@each((v, k) in map)\n{{{ v }}} {{-- note --}}\n@end\n@include('partials/footer')",
    "{{ 'open\n<p>@component('card')</p>\n@!slot('x')\n{{ a }}}",
];

const INSERTIONS: &[&str] = &["{", "}", "{{", "}}", "@", "@if(", "(", ")", "'", "x", " ", "\n", "--"];

fn assert_same_as_fresh(before: &str, after: &str) {
    let previous = parse(before);
    let incremental = reparse(&previous, after);
    let fresh = parse(after);
    assert_eq!(
        dump(&incremental),
        dump(&fresh),
        "reparse diverged\nbefore: {before:?}\nafter: {after:?}"
    );
    assert_eq!(incremental, fresh);
}

#[test]
fn insertions_at_every_position_match_full_parse() {
    for document in DOCUMENTS {
        for position in 0..=document.len() {
            for insertion in INSERTIONS {
                let mut edited = String::from(&document[..position]);
                edited.push_str(insertion);
                edited.push_str(&document[position..]);
                assert_same_as_fresh(document, &edited);
            }
        }
    }
}

#[test]
fn deletions_at_every_position_match_full_parse() {
    for document in DOCUMENTS {
        for position in 0..document.len() {
            for width in [1, 2, 5] {
                let end = (position + width).min(document.len());
                let edited = format!("{}{}", &document[..position], &document[end..]);
                assert_same_as_fresh(document, &edited);
            }
        }
    }
}

#[test]
fn chained_reparses_stay_consistent() {
    let edits = [
        "<p>{{ a }}</p>",
        "<p>{{ ab }}</p>",
        "<p>{{ ab }}</p>\n@if(x)",
        "<p>{{ ab }}</p>\n@if(x)\n{{ y",
        "<p>{{ ab }}</p>\n@if(x)\n{{ y }}\n@end",
        "@if(x)\n{{ y }}\n@end",
    ];
    let mut current = parse(edits[0]);
    for text in &edits[1..] {
        current = reparse(&current, text);
        assert_eq!(current, parse(text), "after {text:?}");
    }
}

#[test]
fn local_edit_reuses_distant_items() {
    let before = "<header>{{ a }}</header>\n@if(x)\n{{ b }}\n@end\n<footer>{{ c }}</footer>";
    let after = before.replace("{{ b }}", "{{ b + 1 }}");
    let (_, stats) = reparse_with_stats(&parse(before), &after);
    assert!(stats.reused_prefix >= 3, "{stats:?}");
    assert!(stats.reused_suffix >= 3, "{stats:?}");
    assert!(stats.reparsed <= 3, "{stats:?}");
}
