use crate::constants;
use crate::core::source::Source;
use crate::error::CspError;
use crate::utils::{find_forbidden_char, BufferWriter};
use bytes::BytesMut;
use smallvec::SmallVec;
use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    name: Cow<'static, str>,
    sources: SmallVec<[Source; 4]>,
}

impl Directive {
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            sources: SmallVec::new(),
        }
    }

    /// Adds a source, keeping `'none'` exclusive and dropping duplicates.
    pub fn add_source(&mut self, source: Source) -> &mut Self {
        if source.is_none() || self.sources.first().is_some_and(Source::is_none) {
            self.sources.clear();
            self.sources.push(source);
        } else if !self.sources.contains(&source) {
            self.sources.push(source);
        }
        self
    }

    pub fn add_sources<I>(&mut self, sources: I) -> &mut Self
    where
        I: IntoIterator<Item = Source>,
    {
        for source in sources {
            self.add_source(source);
        }
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    #[inline]
    pub fn allows(&self, source: &Source) -> bool {
        self.sources.contains(source)
    }

    pub fn validate(&self) -> Result<(), CspError> {
        if let Some(c) = find_forbidden_char(&self.name) {
            return Err(CspError::InvalidDirectiveValue(format!(
                "Directive name '{}' contains forbidden character {:?}",
                self.name, c
            )));
        }

        if self.sources.len() > 1 && self.sources.iter().any(Source::is_none) {
            return Err(CspError::ValidationError(format!(
                "Directive '{}' contains 'none' with other sources",
                self.name
            )));
        }

        for source in &self.sources {
            match source {
                Source::Host(host) if host.is_empty() => {
                    return Err(CspError::ValidationError(format!(
                        "Directive '{}' contains empty host",
                        self.name
                    )));
                }
                Source::Scheme(scheme) if scheme.is_empty() => {
                    return Err(CspError::ValidationError(format!(
                        "Directive '{}' contains empty scheme",
                        self.name
                    )));
                }
                _ => {}
            }

            if let Some(c) = source.value().and_then(find_forbidden_char) {
                return Err(CspError::InvalidDirectiveValue(format!(
                    "Directive '{}' source '{}' contains forbidden character {:?}",
                    self.name, source, c
                )));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn estimated_size(&self) -> usize {
        let mut size = self.name.len();

        if !self.sources.is_empty() {
            size += self
                .sources
                .iter()
                .map(Source::estimated_size)
                .sum::<usize>();
            size += self.sources.len();
        }

        size
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for source in &self.sources {
            write!(f, " {}", source)?;
        }
        Ok(())
    }
}

impl BufferWriter for Directive {
    fn write_to_buffer(&self, buffer: &mut BytesMut) {
        buffer.extend_from_slice(self.name.as_bytes());
        for source in &self.sources {
            buffer.extend_from_slice(b" ");
            source.write_to_buffer(buffer);
        }
    }
}

impl Hash for Directive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.sources.hash(state);
    }
}

pub trait DirectiveSpec: Sized {
    const NAME: &'static str;

    fn add_source(mut self, source: Source) -> Self {
        self.inner_mut().add_source(source);
        self
    }

    fn add_sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = Source>,
    {
        self.inner_mut().add_sources(sources);
        self
    }

    fn inner_mut(&mut self) -> &mut Directive;

    fn build(self) -> Directive;
}

macro_rules! define_directive {
    ($name:ident, $directive_name:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            directive: Directive,
        }

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self {
                    directive: Directive::new($directive_name),
                }
            }
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::new()
            }
        }

        impl DirectiveSpec for $name {
            const NAME: &'static str = $directive_name;

            #[inline]
            fn inner_mut(&mut self) -> &mut Directive {
                &mut self.directive
            }

            #[inline]
            fn build(self) -> Directive {
                self.directive
            }
        }
    };
}

define_directive!(DefaultSrc, constants::DEFAULT_SRC);
define_directive!(ScriptSrc, constants::SCRIPT_SRC);
define_directive!(StyleSrc, constants::STYLE_SRC);
define_directive!(ImgSrc, constants::IMG_SRC);
define_directive!(ConnectSrc, constants::CONNECT_SRC);
define_directive!(FontSrc, constants::FONT_SRC);
define_directive!(ObjectSrc, constants::OBJECT_SRC);
define_directive!(MediaSrc, constants::MEDIA_SRC);
define_directive!(FrameSrc, constants::FRAME_SRC);
define_directive!(FrameAncestors, constants::FRAME_ANCESTORS);
define_directive!(BaseUri, constants::BASE_URI);
define_directive!(FormAction, constants::FORM_ACTION);
