//! Resource URL templates such as `http://localhost\:31415/mollusk/:id`.
//!
//! `:name` marks a path parameter. A backslash before the colon (`\:`) keeps it
//! literal, which is how a port separator is written. Purely numeric names are
//! never parameters either, so an unescaped port still works.

use crate::domain::model::Mollusk;
use crate::utils::error::{MolluskError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use url::Url;

pub const DEFAULT_TEMPLATE: &str = "http://localhost\\:31415/mollusk/:id";

fn token_regex() -> &'static Regex {
    static TOKENS: OnceLock<Regex> = OnceLock::new();
    TOKENS.get_or_init(|| Regex::new(r"\\:|:([A-Za-z0-9_]+)").expect("static regex"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone)]
pub struct UrlTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UrlTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in token_regex().captures_iter(template) {
            let whole = caps.get(0).expect("group 0 always matches");
            literal.push_str(&template[last..whole.start()]);
            last = whole.end();

            match caps.get(1) {
                Some(name) if !name.as_str().chars().all(|c| c.is_ascii_digit()) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Param(name.as_str().to_string()));
                }
                Some(port) => {
                    literal.push(':');
                    literal.push_str(port.as_str());
                }
                None => literal.push(':'),
            }
        }
        literal.push_str(&template[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let parsed = Self {
            raw: template.to_string(),
            segments,
        };

        // The bare collection URL must be a usable http(s) URL.
        let base = parsed.expand(&HashMap::new()).map_err(|e| MolluskError::InvalidTemplate {
            template: template.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(MolluskError::InvalidTemplate {
                template: template.to_string(),
                reason: format!("unsupported scheme {}", base.scheme()),
            });
        }

        Ok(parsed)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitutes parameters. Missing or empty ones vanish along with the slash before them.
    pub fn expand(&self, values: &HashMap<String, String>) -> Result<Url> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param(name) => match values.get(name).filter(|v| !v.is_empty()) {
                    // `.` and `..` would be resolved away by the URL parser, even when escaped.
                    Some(value) if value.chars().all(|c| c == '.') => {
                        return Err(MolluskError::InvalidTemplate {
                            template: self.raw.clone(),
                            reason: format!("'{}' is not a valid value for :{}", value, name),
                        });
                    }
                    Some(value) => out.push_str(&encode_segment(value)),
                    None => {
                        if out.ends_with('/') {
                            out.pop();
                        }
                    }
                },
            }
        }

        while out.ends_with('/') && !out.ends_with("://") {
            out.pop();
        }

        Ok(Url::parse(&out)?)
    }
}

fn encode_segment(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => encoded.push_str("%25"),
            '/' => encoded.push_str("%2F"),
            '?' => encoded.push_str("%3F"),
            '#' => encoded.push_str("%23"),
            _ => encoded.push(c),
        }
    }
    encoded
}

/// Where a parameter's value comes from when none is given explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSource {
    Literal(String),
    /// `@field`: read from the record body.
    Field(String),
}

impl ParamSource {
    pub fn parse(spec: &str) -> Self {
        match spec.strip_prefix('@') {
            Some(field) => ParamSource::Field(field.to_string()),
            None => ParamSource::Literal(spec.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParamDefaults {
    sources: HashMap<String, ParamSource>,
}

impl ParamDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, param: impl Into<String>, spec: &str) -> Self {
        self.sources.insert(param.into(), ParamSource::parse(spec));
        self
    }

    /// Resolves every default against `body`. Field sources without a value are skipped.
    pub fn resolve(&self, body: Option<&Mollusk>) -> HashMap<String, String> {
        self.sources
            .iter()
            .filter_map(|(param, source)| {
                let value = match source {
                    ParamSource::Literal(v) => Some(v.clone()),
                    ParamSource::Field(field) => body.and_then(|m| m.lookup(field)),
                };
                value.map(|v| (param.clone(), v))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_template_has_only_id_param() {
        let template = UrlTemplate::parse(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(template.params().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_expand_without_id_targets_collection() {
        let template = UrlTemplate::parse(DEFAULT_TEMPLATE).unwrap();
        let url = template.expand(&HashMap::new()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:31415/mollusk");
    }

    #[test]
    fn test_expand_with_id() {
        let template = UrlTemplate::parse(DEFAULT_TEMPLATE).unwrap();
        let url = template.expand(&params(&[("id", "42")])).unwrap();
        assert_eq!(url.as_str(), "http://localhost:31415/mollusk/42");
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let template = UrlTemplate::parse(DEFAULT_TEMPLATE).unwrap();
        let url = template.expand(&params(&[("id", "")])).unwrap();
        assert_eq!(url.as_str(), "http://localhost:31415/mollusk");
    }

    #[test]
    fn test_unescaped_numeric_port_is_literal() {
        let template = UrlTemplate::parse("http://localhost:31415/mollusk/:id").unwrap();
        assert_eq!(template.params().collect::<Vec<_>>(), vec!["id"]);
        let url = template.expand(&params(&[("id", "7")])).unwrap();
        assert_eq!(url.as_str(), "http://localhost:31415/mollusk/7");
    }

    #[test]
    fn test_values_are_path_safe() {
        let template = UrlTemplate::parse(DEFAULT_TEMPLATE).unwrap();
        let url = template.expand(&params(&[("id", "a/b")])).unwrap();
        assert_eq!(url.path(), "/mollusk/a%2Fb");
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        let template = UrlTemplate::parse(DEFAULT_TEMPLATE).unwrap();
        for dots in [".", "..", "..."] {
            let err = template.expand(&params(&[("id", dots)])).unwrap_err();
            assert!(matches!(err, MolluskError::InvalidTemplate { .. }), "id {}", dots);
        }

        let url = template.expand(&params(&[("id", "v1.2")])).unwrap();
        assert_eq!(url.path(), "/mollusk/v1.2");
    }

    #[test]
    fn test_param_names_are_ascii() {
        let template = UrlTemplate::parse("http://localhost\\:31415/mollusk/:idé").unwrap();
        assert_eq!(template.params().collect::<Vec<_>>(), vec!["id"]);

        let url = template.expand(&params(&[("id", "7")])).unwrap();
        assert_eq!(url.path(), "/mollusk/7%C3%A9");
    }

    #[test]
    fn test_rejects_non_http_template() {
        assert!(UrlTemplate::parse("ftp://localhost/mollusk/:id").is_err());
        assert!(UrlTemplate::parse("not a url").is_err());
    }

    #[test]
    fn test_field_defaults_read_from_body() {
        let defaults = ParamDefaults::new().with("id", "@id").with("format", "json");
        let body = Mollusk::new().with_field("id", 3);

        let resolved = defaults.resolve(Some(&body));
        assert_eq!(resolved.get("id").map(String::as_str), Some("3"));
        assert_eq!(resolved.get("format").map(String::as_str), Some("json"));

        let without_body = defaults.resolve(None);
        assert!(!without_body.contains_key("id"));
    }
}
