pub mod config;
pub mod directives;
pub mod environment;
pub mod policy;
pub mod profile;
pub mod rules;
pub mod source;

pub use config::{CspConfig, CspConfigBuilder};
pub use directives::*;
pub use environment::Environment;
pub use policy::{CspPolicy, CspPolicyBuilder};
pub use profile::{header_string, policy_for};
pub use rules::{header_rules, rules_to_json, HeaderRule, RoutePattern, RuleHeader};
pub use source::Source;
