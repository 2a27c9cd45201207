pub use crate::core::{
    policy_for, CspConfig, CspConfigBuilder, CspPolicy, CspPolicyBuilder, Environment,
    HeaderRule, Source,
};
pub use crate::middleware::{
    csp_middleware, csp_middleware_from_env, csp_reporting_middleware, CspMiddleware,
    CspReportingMiddleware,
};
pub use crate::monitoring::{CspStats, CspViolationReport};
