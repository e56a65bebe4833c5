//! One generated test per stylesheet marker: a canonical snippet using the
//! marker must parse, pass the invariant check and serialize back unchanged.

use pretty_assertions::assert_eq;
use usfm_editor_engine::editing::invariants;
use usfm_editor_engine::{parse, serialize};
use usfm_editor_syntax::{MarkerDef, StyleType, Taxonomy};

include!(concat!(env!("OUT_DIR"), "/marker_tests.rs"));

/// A canonical document exercising `def` in the context it belongs to.
fn sample(def: &MarkerDef) -> String {
    let m = def.marker.as_str();
    if def.is_chapter() {
        return format!("\\{m} 1\n\\v 1 a\n\\{m} 2\n\\v 1 b");
    }
    if def.is_verse() {
        return format!("\\c 1\n\\p\n\\{m} 1 a\n\\{m} 2-3 b\n\\{m} 4 ");
    }

    match def.style_type {
        StyleType::Paragraph => {
            format!("\\c 1\n\\{m} sample text\n\\v 1 word\n\\{m} more text")
        }
        StyleType::Character if def.is_self_closing() => {
            format!("\\c 1\n\\p\n\\v 1 a \\{m} b")
        }
        StyleType::Character => {
            let outer = if m == "wj" { "nd" } else { "wj" };
            let mut text = format!(
                "\\c 1\n\\p\n\\v 1 before \\{m} inside\\{m}* after\n\\v 2 \\{outer} outer \\+{m} inner\\+{m}* tail\\{outer}*"
            );
            if let Some(key) = def.attributes.first() {
                text.push_str(&format!("\n\\v 3 \\{m} gracious|{key}=\"grace\"\\{m}*"));
            }
            text
        }
        StyleType::Note => {
            format!("\\c 1\n\\p\n\\v 1 text\\{m} + \\ft note text\\{m}* more")
        }
        StyleType::Milestone => format!("\\c 1\n\\p\n\\v 1 text \\{m}\\* more"),
    }
}

fn assert_marker_round_trip(marker: &str) {
    let taxonomy = Taxonomy::standard();
    let def = taxonomy
        .markers()
        .find(|def| def.marker == marker)
        .unwrap_or_else(|| panic!("{marker} missing from the standard taxonomy"));
    let source = sample(def);

    let book = parse(&source).unwrap_or_else(|err| panic!("{source:?}: {err}"));
    assert_eq!(invariants::check(&book, taxonomy), vec![], "{source:?}");

    let text = serialize(&book);
    assert_eq!(text, source);
    assert_eq!(parse(&text).unwrap(), book);
}
