//! Word-level attributes: the `|lemma="grace" strong="H2580"` tail of a
//! character span.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One attribute of a character span.
///
/// `key` is `None` for the default attribute (`\w gracious|grace\w*`), whose
/// meaning comes from the marker definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub key: Option<String>,
    pub value: String,
}

impl Attribute {
    pub fn named(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
        }
    }

    pub fn default_value(value: impl Into<String>) -> Self {
        Self {
            key: None,
            value: value.into(),
        }
    }
}

fn list_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*(?:[A-Za-z][\w\-]*\s*=\s*"[^"]*"\s*)+$"#)
            .expect("Invalid attribute list regex")
    })
}

fn pair_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z][\w\-]*)\s*=\s*"([^"]*)""#).expect("Invalid attribute pair regex")
    })
}

/// Parse the text between `|` and the end marker.
///
/// A well formed `key="value"` list yields named attributes. Anything else is
/// kept verbatim as the default attribute.
pub fn parse_attributes(source: &str) -> Vec<Attribute> {
    if source.is_empty() {
        return Vec::new();
    }
    if !list_regex().is_match(source) {
        return vec![Attribute::default_value(source)];
    }

    pair_regex()
        .captures_iter(source)
        .map(|caps| Attribute::named(&caps[1], &caps[2]))
        .collect()
}

/// Render attributes back to marker text, including the leading `|`.
///
/// Returns an empty string when there are no attributes.
pub fn format_attributes(attributes: &[Attribute]) -> String {
    if attributes.is_empty() {
        return String::new();
    }

    let body: Vec<String> = attributes
        .iter()
        .map(|attr| match &attr.key {
            Some(key) => format!("{key}=\"{}\"", attr.value),
            None => attr.value.clone(),
        })
        .collect();
    format!("|{}", body.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_named_pairs() {
        assert_eq!(
            parse_attributes(r#"lemma="grace" strong="H2580""#),
            vec![
                Attribute::named("lemma", "grace"),
                Attribute::named("strong", "H2580"),
            ]
        );
    }

    #[test]
    fn bare_value_is_default_attribute() {
        assert_eq!(
            parse_attributes("grace"),
            vec![Attribute::default_value("grace")]
        );
    }

    #[test]
    fn malformed_list_kept_verbatim() {
        let source = r#"lemma="grace" stray"#;
        assert_eq!(
            parse_attributes(source),
            vec![Attribute::default_value(source)]
        );
    }

    #[test]
    fn hyphenated_keys() {
        assert_eq!(
            parse_attributes(r#"link-href="GEN 1:1""#),
            vec![Attribute::named("link-href", "GEN 1:1")]
        );
    }

    #[test]
    fn formats_back_to_source() {
        for source in [r#"lemma="grace" strong="H2580""#, "grace"] {
            assert_eq!(
                format_attributes(&parse_attributes(source)),
                format!("|{source}")
            );
        }
        assert_eq!(format_attributes(&[]), "");
    }

    #[test]
    fn spacing_and_empty_lists_are_canonicalized() {
        let spaced = parse_attributes(r#" lemma = "grace"   strong="H2580" "#);
        assert_eq!(format_attributes(&spaced), r#"|lemma="grace" strong="H2580""#);
        assert_eq!(parse_attributes(""), vec![]);
        assert_eq!(format_attributes(&parse_attributes("")), "");
    }
}
