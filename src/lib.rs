pub mod constants;
pub mod core;
pub mod error;
pub mod middleware;
pub mod monitoring;
pub mod prelude;
mod utils;

// Re-export commonly used types for convenience
pub use core::{
    header_rules, header_string, policy_for, rules_to_json, CspConfig, CspConfigBuilder,
    CspPolicy, CspPolicyBuilder, Environment, HeaderRule, RoutePattern, RuleHeader, Source,
};
pub use error::CspError;
pub use middleware::{
    csp_middleware, csp_middleware_from_env, csp_reporting_middleware, CspMiddleware,
    CspReportingMiddleware,
};
pub use monitoring::{CspStats, CspViolationReport};
