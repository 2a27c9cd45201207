//! Header-injection rules: a route source plus the headers to set on every
//! response whose path it matches.

use crate::core::config::CspConfig;
use crate::error::CspError;
use actix_web::http::header::{HeaderName, HeaderValue};
use regex::Regex;
use serde::ser::{Error as _, SerializeStruct};
use serde::{Serialize, Serializer};
use std::{borrow::Cow, fmt, iter::Peekable, str::Chars};

/// A compiled route source such as `/(.*)` or `/blog/:slug`.
///
/// Parenthesised groups are raw regular expressions, `:name` matches one
/// path segment unless a group follows it, everything else is literal. The
/// whole path must match.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: Cow<'static, str>,
    regex: Regex,
}

impl RoutePattern {
    pub fn new(source: impl Into<Cow<'static, str>>) -> Result<Self, CspError> {
        let source = source.into();
        if !source.starts_with('/') {
            return Err(CspError::InvalidRoutePattern(format!(
                "'{}' must start with '/'",
                source
            )));
        }

        let expression = translate(&source)?;
        let regex = Regex::new(&expression).map_err(|e| {
            CspError::InvalidRoutePattern(format!("'{}' does not compile: {}", source, e))
        })?;

        Ok(Self { source, regex })
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for RoutePattern {}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn translate(source: &str) -> Result<String, CspError> {
    let mut out = String::with_capacity(source.len() * 2 + 2);
    out.push('^');

    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '(' => {
                let group = read_group(source, &mut chars)?;
                out.push('(');
                out.push_str(&group);
                out.push(')');
            }
            ')' => {
                return Err(CspError::InvalidRoutePattern(format!(
                    "'{}' has an unmatched ')'",
                    source
                )));
            }
            ':' if chars.peek().is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') => {
                while chars
                    .peek()
                    .is_some_and(|n| n.is_ascii_alphanumeric() || *n == '_')
                {
                    chars.next();
                }
                if chars.peek() != Some(&'(') {
                    out.push_str("([^/]+)");
                }
            }
            other => {
                let mut buf = [0; 4];
                out.push_str(&regex::escape(other.encode_utf8(&mut buf)));
            }
        }
    }

    out.push('$');
    Ok(out)
}

/// Reads up to the `)` closing an already consumed `(`.
fn read_group(source: &str, chars: &mut Peekable<Chars<'_>>) -> Result<String, CspError> {
    let mut depth = 1usize;
    let mut group = String::new();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                group.push(c);
                if let Some(escaped) = chars.next() {
                    group.push(escaped);
                }
            }
            '(' => {
                depth += 1;
                group.push(c);
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(group);
                }
                group.push(c);
            }
            _ => group.push(c),
        }
    }

    Err(CspError::InvalidRoutePattern(format!(
        "'{}' has an unclosed '('",
        source
    )))
}

/// One header a rule sets. `key` keeps the casing used in the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHeader {
    key: Cow<'static, str>,
    name: HeaderName,
    value: HeaderValue,
}

impl RuleHeader {
    pub fn new(key: impl Into<Cow<'static, str>>, value: HeaderValue) -> Result<Self, CspError> {
        let key = key.into();
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| CspError::HeaderError(format!("Invalid header name '{}': {}", key, e)))?;
        Ok(Self { key, name, value })
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &HeaderValue {
        &self.value
    }
}

impl Serialize for RuleHeader {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.value.to_str().map_err(S::Error::custom)?;
        let mut state = serializer.serialize_struct("RuleHeader", 2)?;
        state.serialize_field("key", self.key.as_ref())?;
        state.serialize_field("value", value)?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRule {
    source: RoutePattern,
    headers: Vec<RuleHeader>,
}

impl HeaderRule {
    #[inline]
    pub fn new(source: RoutePattern) -> Self {
        Self {
            source,
            headers: Vec::new(),
        }
    }

    #[inline]
    pub fn with_header(mut self, header: RuleHeader) -> Self {
        self.headers.push(header);
        self
    }

    #[inline]
    pub fn source(&self) -> &RoutePattern {
        &self.source
    }

    #[inline]
    pub fn headers(&self) -> &[RuleHeader] {
        &self.headers
    }

    #[inline]
    pub fn matches(&self, path: &str) -> bool {
        self.source.matches(path)
    }
}

impl Serialize for HeaderRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HeaderRule", 2)?;
        state.serialize_field("source", self.source.source())?;
        state.serialize_field("headers", &self.headers)?;
        state.end()
    }
}

/// Builds the rule list for `config`: the configured route source mapped to
/// the CSP header for the config's environment.
pub fn header_rules(config: &CspConfig) -> Result<Vec<HeaderRule>, CspError> {
    let policy = config.policy();
    let header = RuleHeader::new(policy.export_header_name(), policy.header_value()?)?;
    let rule = HeaderRule::new(RoutePattern::new(config.route_source().to_owned())?)
        .with_header(header);

    log::info!(
        "Derived CSP header rule for {} environment: {} on {} (policy {:016x})",
        config.environment(),
        policy.export_header_name(),
        rule.source(),
        policy.fingerprint()
    );

    Ok(vec![rule])
}

/// Serializes rules in the headers-export JSON shape.
pub fn rules_to_json(rules: &[HeaderRule]) -> Result<String, CspError> {
    Ok(serde_json::to_string_pretty(rules)?)
}
