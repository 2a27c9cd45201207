pub(crate) const HEADER_CSP: &str = "content-security-policy";
pub(crate) const HEADER_CSP_REPORT_ONLY: &str = "content-security-policy-report-only";
pub(crate) const HEADER_POWERED_BY: &str = "x-powered-by";

// Canonical casing used in the headers export.
pub const EXPORT_HEADER_CSP: &str = "Content-Security-Policy";
pub const EXPORT_HEADER_CSP_REPORT_ONLY: &str = "Content-Security-Policy-Report-Only";

pub(crate) const DEFAULT_SRC: &str = "default-src";
pub(crate) const SCRIPT_SRC: &str = "script-src";
pub(crate) const STYLE_SRC: &str = "style-src";
pub(crate) const IMG_SRC: &str = "img-src";
pub(crate) const CONNECT_SRC: &str = "connect-src";
pub(crate) const FONT_SRC: &str = "font-src";
pub(crate) const OBJECT_SRC: &str = "object-src";
pub(crate) const MEDIA_SRC: &str = "media-src";
pub(crate) const FRAME_SRC: &str = "frame-src";
pub(crate) const FRAME_ANCESTORS: &str = "frame-ancestors";
pub(crate) const BASE_URI: &str = "base-uri";
pub(crate) const FORM_ACTION: &str = "form-action";
pub(crate) const BLOCK_ALL_MIXED_CONTENT: &str = "block-all-mixed-content";
pub(crate) const UPGRADE_INSECURE_REQUESTS: &str = "upgrade-insecure-requests";

pub(crate) const REPORT_URI: &str = "report-uri";
pub(crate) const REPORT_TO: &str = "report-to";

pub(crate) const NONE_SOURCE: &str = "'none'";
pub(crate) const SELF_SOURCE: &str = "'self'";
pub(crate) const UNSAFE_INLINE_SOURCE: &str = "'unsafe-inline'";
pub(crate) const UNSAFE_EVAL_SOURCE: &str = "'unsafe-eval'";

pub(crate) const VERCEL_LIVE: &str = "https://vercel.live/";
pub(crate) const VERCEL_LIVE_FONTS: &str = "https://vercel.live/fonts";
pub(crate) const VERCEL_INSIGHTS: &str = "https://vitals.vercel-insights.com";
pub(crate) const PUSHER_HTTPS: &str = "https://*.pusher.com/";
pub(crate) const PUSHER_WSS: &str = "wss://*.pusher.com/";

pub const ENV_VERCEL: &str = "VERCEL_ENV";
pub const ENV_NODE: &str = "NODE_ENV";

pub const DEFAULT_ROUTE_SOURCE: &str = "/(.*)";
pub(crate) const DEFAULT_REPORT_ONLY: bool = true;
pub(crate) const DEFAULT_MAX_REPORT_SIZE: usize = 16 * 1024;
pub(crate) const DEFAULT_REPORT_PATH: &str = "/csp-report";
pub(crate) const SEMICOLON_SPACE: &[u8] = b"; ";

pub(crate) const DEFAULT_BUFFER_CAPACITY: usize = 512;
