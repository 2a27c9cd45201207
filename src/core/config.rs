use crate::constants::{DEFAULT_REPORT_ONLY, DEFAULT_ROUTE_SOURCE};
use crate::core::environment::Environment;
use crate::core::policy::CspPolicy;
use crate::core::profile::policy_for;
use crate::core::rules::{header_rules, HeaderRule};
use crate::error::CspError;
use crate::monitoring::stats::CspStats;
use std::{borrow::Cow, sync::Arc};
use url::Url;

/// Resolved settings plus the policy and header rules derived from them.
///
/// Derivation happens once in [`CspConfigBuilder::build`]; clones share the
/// result.
#[derive(Debug, Clone)]
pub struct CspConfig {
    environment: Environment,
    route_source: Cow<'static, str>,
    powered_by_header: bool,
    policy: Arc<CspPolicy>,
    rules: Arc<[HeaderRule]>,
    stats: Arc<CspStats>,
}

impl CspConfig {
    /// Config for the environment detected from `VERCEL_ENV` / `NODE_ENV`
    /// with every other setting at its default.
    pub fn from_env() -> Result<Self, CspError> {
        CspConfigBuilder::new().build()
    }

    pub fn for_environment(environment: Environment) -> Result<Self, CspError> {
        CspConfigBuilder::new().environment(environment).build()
    }

    #[inline]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[inline]
    pub fn is_report_only(&self) -> bool {
        self.policy.is_report_only()
    }

    #[inline]
    pub fn route_source(&self) -> &str {
        &self.route_source
    }

    #[inline]
    pub fn powered_by_header(&self) -> bool {
        self.powered_by_header
    }

    #[inline]
    pub fn policy(&self) -> &CspPolicy {
        &self.policy
    }

    #[inline]
    pub fn rules(&self) -> &[HeaderRule] {
        &self.rules
    }

    #[inline]
    pub fn stats(&self) -> &Arc<CspStats> {
        &self.stats
    }
}

#[derive(Debug, Default)]
pub struct CspConfigBuilder {
    environment: Option<Environment>,
    report_only: Option<bool>,
    route_source: Option<Cow<'static, str>>,
    report_uri: Option<Cow<'static, str>>,
    report_to: Option<Cow<'static, str>>,
    powered_by_header: bool,
    stats: Option<Arc<CspStats>>,
}

impl CspConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the environment instead of detecting it from the process.
    #[inline]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    #[inline]
    pub fn report_only(mut self, enabled: bool) -> Self {
        self.report_only = Some(enabled);
        self
    }

    #[inline]
    pub fn route_source(mut self, source: impl Into<Cow<'static, str>>) -> Self {
        self.route_source = Some(source.into());
        self
    }

    #[inline]
    pub fn report_uri(mut self, uri: impl Into<Cow<'static, str>>) -> Self {
        self.report_uri = Some(uri.into());
        self
    }

    #[inline]
    pub fn report_to(mut self, group: impl Into<Cow<'static, str>>) -> Self {
        self.report_to = Some(group.into());
        self
    }

    /// Keeps an `X-Powered-By` header set by handlers. Stripped by default.
    #[inline]
    pub fn powered_by_header(mut self, enabled: bool) -> Self {
        self.powered_by_header = enabled;
        self
    }

    #[inline]
    pub fn with_stats(mut self, stats: Arc<CspStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn build(self) -> Result<CspConfig, CspError> {
        let environment = self.environment.unwrap_or_else(Environment::detect);
        let report_only = self.report_only.unwrap_or(DEFAULT_REPORT_ONLY);

        let mut policy = policy_for(environment, report_only);
        if let Some(uri) = self.report_uri {
            validate_report_uri(&uri)?;
            policy.set_report_uri(uri);
        }
        if let Some(group) = self.report_to {
            policy.set_report_to(group);
        }
        policy.validate()?;

        let stats = self.stats.unwrap_or_default();
        stats.increment_policy_build_count();

        let mut config = CspConfig {
            environment,
            route_source: self
                .route_source
                .unwrap_or(Cow::Borrowed(DEFAULT_ROUTE_SOURCE)),
            powered_by_header: self.powered_by_header,
            policy: Arc::new(policy),
            rules: Arc::from(Vec::new()),
            stats,
        };
        config.rules = header_rules(&config)?.into();

        log::debug!(
            "Built CSP config: environment={} report_only={} route={}",
            config.environment,
            report_only,
            config.route_source
        );

        Ok(config)
    }
}

/// Accepts an absolute URL or a same-origin path.
fn validate_report_uri(uri: &str) -> Result<(), CspError> {
    if is_same_origin(uri) {
        return resolve_same_origin(uri)
            .map(|_| ())
            .map_err(|e| CspError::InvalidReportUri(format!("{}: {}", uri, e)));
    }

    let url = Url::parse(uri).map_err(|e| CspError::InvalidReportUri(format!("{}: {}", uri, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(CspError::InvalidReportUri(format!(
            "{}: unsupported scheme '{}'",
            uri, scheme
        ))),
    }
}

#[inline]
fn is_same_origin(uri: &str) -> bool {
    uri.starts_with('/') && !uri.starts_with("//")
}

fn resolve_same_origin(uri: &str) -> Result<Url, url::ParseError> {
    Url::parse("http://localhost").and_then(|base| base.join(uri))
}

/// Request path a browser posts to for a same-origin `report-uri`, without
/// query or fragment. `None` for absolute URLs.
pub(crate) fn same_origin_report_path(uri: &str) -> Option<String> {
    if !is_same_origin(uri) {
        return None;
    }
    resolve_same_origin(uri).ok().map(|url| url.path().to_owned())
}
