//! Fixture tests for the parsing module.
//!
//! Fixtures (.usfm) and snapshots (.snap) are co-located in `fixtures/`.
//! Every fixture is in canonical layout, so it must also serialize back to
//! itself byte for byte.

use crate::editing::invariants;
use crate::parsing::{parse, snapshot::outline};
use crate::serializer::serialize;
use usfm_editor_syntax::Taxonomy;

#[test]
fn fixture_headers_and_sections() {
    assert_fixture("headers_and_sections");
}

#[test]
fn fixture_poetry_notes_and_words() {
    assert_fixture("poetry_notes_and_words");
}

fn assert_fixture(name: &str) {
    let fixtures_dir = format!("{}/src/parsing/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let usfm = std::fs::read_to_string(format!("{fixtures_dir}/{name}.usfm")).unwrap();

    let book = parse(&usfm).unwrap();
    assert_eq!(invariants::check(&book, Taxonomy::standard()), vec![]);
    pretty_assertions::assert_eq!(serialize(&book), usfm);

    let outline = outline(&book);
    insta::with_settings!({
        snapshot_path => fixtures_dir.as_str(),
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_snapshot!(name, outline);
    });
}

#[test]
fn crlf_structural_newlines_are_dropped() {
    let book = parse("\\c 1\r\n\\p\r\n\\v 1 a\r\n\\v 2 b").unwrap();
    assert_eq!(serialize(&book), "\\c 1\n\\p\n\\v 1 a\n\\v 2 b");
}

#[test]
fn reserializing_is_stable() {
    let messy = "\n\n\\id X\n\n\\c 1\n\\p\n\n\\v 1   spaced\n\\v 2\n\\c 2\n\\v 1 \\nd Lord\\nd* of \\+bk all\\+bk*";
    let once = serialize(&parse(messy).unwrap());
    let twice = serialize(&parse(&once).unwrap());
    assert_eq!(once, twice);
    assert_eq!(parse(&once).unwrap(), parse(messy).unwrap());
}
