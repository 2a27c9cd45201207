//! Per-environment policy derivation.
//!
//! Every environment shares a locked-down baseline. Preview deployments allow
//! inline code and the Vercel collaboration toolbar (comments, fonts, realtime
//! sockets over Pusher) plus Speed Insights. Production only adds the Speed
//! Insights endpoint. Development keeps everything local and allows `data:`
//! images used by hot-reload tooling.

use crate::constants::{
    PUSHER_HTTPS, PUSHER_WSS, VERCEL_INSIGHTS, VERCEL_LIVE, VERCEL_LIVE_FONTS,
};
use crate::core::environment::Environment;
use crate::core::policy::{CspPolicy, CspPolicyBuilder};
use crate::core::source::Source;

fn baseline(report_only: bool) -> CspPolicyBuilder {
    let builder = CspPolicyBuilder::new()
        .report_only(report_only)
        .default_src([Source::None])
        .media_src([Source::Self_])
        .object_src([Source::None])
        .base_uri([Source::None])
        .form_action([Source::None])
        .frame_ancestors([Source::None])
        .block_all_mixed_content();

    // Only meaningful in an enforced policy.
    if report_only {
        builder
    } else {
        builder.upgrade_insecure_requests()
    }
}

fn preview(builder: CspPolicyBuilder) -> CspPolicyBuilder {
    builder
        .font_src([Source::Self_, Source::host(VERCEL_LIVE)])
        .style_src([
            Source::Self_,
            Source::UnsafeInline,
            Source::host(VERCEL_LIVE_FONTS),
        ])
        .script_src([Source::Self_, Source::UnsafeInline, Source::host(VERCEL_LIVE)])
        .connect_src([
            Source::Self_,
            Source::host(VERCEL_LIVE),
            Source::host(VERCEL_INSIGHTS),
            Source::host(PUSHER_HTTPS),
            Source::host(PUSHER_WSS),
        ])
        .img_src([Source::Self_, Source::host(VERCEL_LIVE)])
        .frame_src([Source::Self_, Source::host(VERCEL_LIVE)])
}

fn production(builder: CspPolicyBuilder) -> CspPolicyBuilder {
    builder
        .font_src([Source::Self_])
        .style_src([Source::Self_, Source::UnsafeInline])
        .script_src([Source::Self_])
        .connect_src([Source::Self_, Source::host(VERCEL_INSIGHTS)])
        .img_src([Source::Self_])
        .frame_src([Source::None])
}

fn development(builder: CspPolicyBuilder) -> CspPolicyBuilder {
    builder
        .font_src([Source::Self_])
        .style_src([Source::Self_, Source::UnsafeInline])
        .script_src([Source::Self_])
        .connect_src([Source::Self_])
        .img_src([Source::Self_, Source::scheme("data")])
        .frame_src([Source::None])
}

/// Derives the policy for `environment`. Total over every input.
pub fn policy_for(environment: Environment, report_only: bool) -> CspPolicy {
    let builder = baseline(report_only);
    let builder = match environment {
        Environment::Preview => preview(builder),
        Environment::Production => production(builder),
        Environment::Development => development(builder),
    };
    builder.build_unchecked()
}

/// Convenience wrapper returning the rendered header value string.
pub fn header_string(environment: Environment, report_only: bool) -> String {
    policy_for(environment, report_only).render()
}
