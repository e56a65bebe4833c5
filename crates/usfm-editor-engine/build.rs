/// Generates one round-trip test function per marker of the bundled
/// stylesheet, so every taxonomy entry shows up by name in the test runner.
fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let dest = std::path::Path::new(&out_dir).join("marker_tests.rs");
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let stylesheet = std::path::Path::new(&manifest_dir).join("../usfm-editor-syntax/assets/usfm.sty");

    let source = std::fs::read_to_string(&stylesheet).unwrap();

    let mut code = String::from(
        r#"mod marker_round_trips {
    use super::assert_marker_round_trip;
"#,
    );

    for line in source.lines() {
        let mut fields = line.split_whitespace();
        let is_marker = fields
            .next()
            .is_some_and(|field| field.eq_ignore_ascii_case("\\marker"));
        let Some(marker) = fields.next().filter(|_| is_marker) else {
            continue;
        };
        let name = marker.replace('-', "_");
        code.push_str(&format!(
            r#"
    #[test]
    fn roundtrip_{name}() {{
        assert_marker_round_trip("{marker}");
    }}
"#
        ));
    }

    code.push_str("}\n");
    std::fs::write(&dest, code).unwrap();

    println!("cargo::rerun-if-changed={}", stylesheet.display());
}
