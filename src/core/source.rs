use crate::constants::{NONE_SOURCE, SELF_SOURCE, UNSAFE_EVAL_SOURCE, UNSAFE_INLINE_SOURCE};
use crate::utils::BufferWriter;
use bytes::BytesMut;
use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
};

/// A single CSP source expression.
///
/// `Host` carries the expression verbatim, scheme and path included
/// (`https://vercel.live/`, `wss://*.pusher.com/`). `Scheme` carries the bare
/// scheme name and renders with a trailing colon (`data:`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    None,
    Self_,
    UnsafeInline,
    UnsafeEval,
    Host(Cow<'static, str>),
    Scheme(Cow<'static, str>),
}

impl Source {
    #[inline]
    pub fn host(value: impl Into<Cow<'static, str>>) -> Self {
        Source::Host(value.into())
    }

    #[inline]
    pub fn scheme(value: impl Into<Cow<'static, str>>) -> Self {
        Source::Scheme(value.into())
    }

    #[inline(always)]
    pub const fn is_none(&self) -> bool {
        matches!(self, Source::None)
    }

    #[inline(always)]
    pub const fn is_self(&self) -> bool {
        matches!(self, Source::Self_)
    }

    #[inline(always)]
    pub const fn is_unsafe_inline(&self) -> bool {
        matches!(self, Source::UnsafeInline)
    }

    #[inline(always)]
    pub const fn is_unsafe_eval(&self) -> bool {
        matches!(self, Source::UnsafeEval)
    }

    #[inline]
    pub const fn as_static_str(&self) -> Option<&'static str> {
        match self {
            Source::None => Some(NONE_SOURCE),
            Source::Self_ => Some(SELF_SOURCE),
            Source::UnsafeInline => Some(UNSAFE_INLINE_SOURCE),
            Source::UnsafeEval => Some(UNSAFE_EVAL_SOURCE),
            _ => None,
        }
    }

    #[inline]
    pub fn estimated_size(&self) -> usize {
        match self {
            Source::Host(host) => host.len(),
            Source::Scheme(scheme) => scheme.len() + 1,
            keyword => keyword.as_static_str().map_or(0, str::len),
        }
    }

    /// The raw value of a host or scheme source, the part a caller supplied.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        match self {
            Source::Host(value) | Source::Scheme(value) => Some(value),
            _ => None,
        }
    }
}

impl Hash for Source {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        if let Some(value) = self.value() {
            value.hash(state);
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Host(host) => f.write_str(host),
            Source::Scheme(scheme) => write!(f, "{}:", scheme),
            keyword => f.write_str(keyword.as_static_str().unwrap_or_default()),
        }
    }
}

impl BufferWriter for Source {
    fn write_to_buffer(&self, buffer: &mut BytesMut) {
        match self {
            Source::Host(host) => buffer.extend_from_slice(host.as_bytes()),
            Source::Scheme(scheme) => {
                buffer.extend_from_slice(scheme.as_bytes());
                buffer.extend_from_slice(b":");
            }
            keyword => {
                if let Some(text) = keyword.as_static_str() {
                    buffer.extend_from_slice(text.as_bytes());
                }
            }
        }
    }
}
