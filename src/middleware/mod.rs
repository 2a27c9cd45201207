pub mod csp;
pub mod reporting;

pub use csp::{csp_middleware, csp_middleware_from_env, CspMiddleware, CspMiddlewareService};
pub use reporting::{
    csp_reporting_middleware, CspReportingMiddleware, CspReportingMiddlewareService,
};
