use crate::constants::{
    BLOCK_ALL_MIXED_CONTENT, DEFAULT_BUFFER_CAPACITY, EXPORT_HEADER_CSP,
    EXPORT_HEADER_CSP_REPORT_ONLY, HEADER_CSP, HEADER_CSP_REPORT_ONLY, REPORT_TO, REPORT_URI,
    SEMICOLON_SPACE, UPGRADE_INSECURE_REQUESTS,
};
use crate::core::directives::{Directive, DirectiveSpec};
use crate::core::source::Source;
use crate::error::CspError;
use crate::utils::{find_forbidden_char, BufferWriter};
use actix_web::http::header::{HeaderName, HeaderValue};
use bytes::BytesMut;
use indexmap::IndexMap;
use rustc_hash::FxHasher;
use std::{
    borrow::Cow,
    hash::{Hash, Hasher},
};

/// An ordered set of CSP directives plus reporting settings.
///
/// Directives serialize in insertion order. Re-adding a directive with an
/// existing name replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CspPolicy {
    directives: IndexMap<Cow<'static, str>, Directive>,
    report_only: bool,
    report_uri: Option<Cow<'static, str>>,
    report_to: Option<Cow<'static, str>>,
}

impl CspPolicy {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_directive(&mut self, directive: Directive) -> &mut Self {
        let name = Cow::Owned(directive.name().to_owned());
        self.directives.insert(name, directive);
        self
    }

    #[inline]
    pub fn set_report_only(&mut self, report_only: bool) -> &mut Self {
        self.report_only = report_only;
        self
    }

    #[inline]
    pub fn set_report_uri(&mut self, uri: impl Into<Cow<'static, str>>) -> &mut Self {
        self.report_uri = Some(uri.into());
        self
    }

    #[inline]
    pub fn set_report_to(&mut self, endpoint: impl Into<Cow<'static, str>>) -> &mut Self {
        self.report_to = Some(endpoint.into());
        self
    }

    #[inline]
    pub fn header_name(&self) -> HeaderName {
        if self.report_only {
            HeaderName::from_static(HEADER_CSP_REPORT_ONLY)
        } else {
            HeaderName::from_static(HEADER_CSP)
        }
    }

    /// Header name in the casing used by the headers export.
    #[inline]
    pub fn export_header_name(&self) -> &'static str {
        if self.report_only {
            EXPORT_HEADER_CSP_REPORT_ONLY
        } else {
            EXPORT_HEADER_CSP
        }
    }

    #[inline]
    pub fn estimated_size(&self) -> usize {
        let directives: usize = self.directives.values().map(Directive::estimated_size).sum();
        let reporting = self.report_uri.as_ref().map_or(0, |u| u.len() + REPORT_URI.len() + 1)
            + self.report_to.as_ref().map_or(0, |e| e.len() + REPORT_TO.len() + 1);
        let separators = (self.directives.len() + 2) * SEMICOLON_SPACE.len();
        directives + reporting + separators
    }

    fn write_to(&self, buffer: &mut BytesMut) {
        let mut first = true;
        for directive in self.directives.values() {
            if !first {
                buffer.extend_from_slice(SEMICOLON_SPACE);
            }
            directive.write_to_buffer(buffer);
            first = false;
        }

        let reporting = [(REPORT_URI, &self.report_uri), (REPORT_TO, &self.report_to)];
        for (name, value) in reporting {
            if let Some(value) = value {
                if !first {
                    buffer.extend_from_slice(SEMICOLON_SPACE);
                }
                buffer.extend_from_slice(name.as_bytes());
                buffer.extend_from_slice(b" ");
                buffer.extend_from_slice(value.as_bytes());
                first = false;
            }
        }
    }

    /// Serializes the policy into a single-line header value string.
    pub fn render(&self) -> String {
        let mut buffer = BytesMut::with_capacity(self.estimated_size().max(DEFAULT_BUFFER_CAPACITY));
        self.write_to(&mut buffer);
        // Every fragment written above is valid UTF-8.
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub fn header_value(&self) -> Result<HeaderValue, CspError> {
        let mut buffer = BytesMut::with_capacity(self.estimated_size().max(DEFAULT_BUFFER_CAPACITY));
        self.write_to(&mut buffer);

        HeaderValue::from_maybe_shared(buffer.freeze()).map_err(|_| {
            CspError::HeaderError("Policy does not form a valid header value".to_string())
        })
    }

    pub fn validate(&self) -> Result<(), CspError> {
        for directive in self.directives.values() {
            directive.validate()?;
        }

        let reporting = [(REPORT_URI, &self.report_uri), (REPORT_TO, &self.report_to)];
        for (name, value) in reporting {
            if let Some(value) = value {
                if value.is_empty() {
                    return Err(CspError::ValidationError(format!("'{}' is empty", name)));
                }
                if let Some(c) = find_forbidden_char(value) {
                    return Err(CspError::InvalidDirectiveValue(format!(
                        "'{}' value '{}' contains forbidden character {:?}",
                        name, value, c
                    )));
                }
            }
        }

        Ok(())
    }

    #[inline]
    pub fn get_directive(&self, name: &str) -> Option<&Directive> {
        self.directives.get(name)
    }

    #[inline]
    pub fn is_report_only(&self) -> bool {
        self.report_only
    }

    #[inline]
    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.directives.values()
    }

    #[inline]
    pub fn report_uri(&self) -> Option<&str> {
        self.report_uri.as_deref()
    }

    #[inline]
    pub fn report_to(&self) -> Option<&str> {
        self.report_to.as_deref()
    }

    /// Stable content hash, used to tell policies apart in logs.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl Hash for CspPolicy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.directives.len().hash(state);
        for (name, directive) in &self.directives {
            name.hash(state);
            directive.hash(state);
        }
        self.report_only.hash(state);
        self.report_uri.hash(state);
        self.report_to.hash(state);
    }
}

#[derive(Debug, Default)]
pub struct CspPolicyBuilder {
    policy: CspPolicy,
}

impl CspPolicyBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            policy: CspPolicy::new(),
        }
    }

    pub fn add_directive<D: DirectiveSpec>(mut self, directive_builder: D) -> Self {
        self.policy.add_directive(directive_builder.build());
        self
    }

    #[inline]
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.policy.add_directive(directive);
        self
    }

    pub fn default_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::DefaultSrc::new().add_sources(sources))
    }

    pub fn script_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::ScriptSrc::new().add_sources(sources))
    }

    pub fn style_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::StyleSrc::new().add_sources(sources))
    }

    pub fn img_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::ImgSrc::new().add_sources(sources))
    }

    pub fn connect_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::ConnectSrc::new().add_sources(sources))
    }

    pub fn font_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::FontSrc::new().add_sources(sources))
    }

    pub fn object_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::ObjectSrc::new().add_sources(sources))
    }

    pub fn media_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::MediaSrc::new().add_sources(sources))
    }

    pub fn frame_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::FrameSrc::new().add_sources(sources))
    }

    pub fn frame_ancestors(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::FrameAncestors::new().add_sources(sources))
    }

    pub fn base_uri(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::BaseUri::new().add_sources(sources))
    }

    pub fn form_action(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::FormAction::new().add_sources(sources))
    }

    pub fn upgrade_insecure_requests(self) -> Self {
        self.with_directive(Directive::new(UPGRADE_INSECURE_REQUESTS))
    }

    pub fn block_all_mixed_content(self) -> Self {
        self.with_directive(Directive::new(BLOCK_ALL_MIXED_CONTENT))
    }

    #[inline]
    pub fn report_uri(mut self, uri: impl Into<Cow<'static, str>>) -> Self {
        self.policy.set_report_uri(uri);
        self
    }

    #[inline]
    pub fn report_to(mut self, endpoint: impl Into<Cow<'static, str>>) -> Self {
        self.policy.set_report_to(endpoint);
        self
    }

    #[inline]
    pub fn report_only(mut self, enabled: bool) -> Self {
        self.policy.set_report_only(enabled);
        self
    }

    pub fn build(self) -> Result<CspPolicy, CspError> {
        self.policy.validate()?;
        Ok(self.policy)
    }

    #[inline]
    pub fn build_unchecked(self) -> CspPolicy {
        self.policy
    }
}
