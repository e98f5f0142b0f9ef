//! Text conversion between Chinese script variants.
//!
//! The [`Converter`] trait is the seam between the rewrite pipeline and the
//! conversion engine. [`ZhConverter`] is the bundled implementation backed by
//! the `zhconv` dictionaries. A [`ConversionContext`] pairs one converter with
//! the package-document metadata rule and is built once per process, then
//! shared read-only by every rewrite.
//!
//! # Example
//!
//! ```rust
//! use zhepub::convert::{ConversionContext, ScriptVariant};
//!
//! let context = ConversionContext::new(ScriptVariant::Taiwan);
//! let converted = context.convert("汉字").unwrap();
//! assert_eq!(converted, "漢字");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::Result;

/// Converts text from one script variant to another.
///
/// Implementations must be deterministic and safe to call concurrently from
/// several threads. A converter is constructed once and reused for every
/// member of every archive.
pub trait Converter: Send + Sync {
    /// Converts a unit of text.
    fn convert(&self, text: &str) -> Result<String>;
}

impl<F> Converter for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn convert(&self, text: &str) -> Result<String> {
        self(text)
    }
}

/// Target script variant of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScriptVariant {
    /// Character-level simplified to traditional mapping.
    Traditional,
    /// Phrase-aware mapping to traditional script with Taiwan vocabulary.
    #[default]
    Taiwan,
}

impl ScriptVariant {
    /// Returns the canonical name of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Traditional => "traditional",
            Self::Taiwan => "taiwan",
        }
    }

    fn zhconv_variant(self) -> zhconv::Variant {
        match self {
            Self::Traditional => zhconv::Variant::ZhHant,
            Self::Taiwan => zhconv::Variant::ZhTW,
        }
    }
}

impl fmt::Display for ScriptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`ScriptVariant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown script variant '{}' (expected 'traditional' or 'taiwan')",
            self.0
        )
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for ScriptVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "traditional" | "hant" | "zh-hant" | "s2t" => Ok(Self::Traditional),
            "taiwan" | "tw" | "zh-tw" | "s2tw" => Ok(Self::Taiwan),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// [`Converter`] backed by the built-in `zhconv` dictionaries.
///
/// The dictionaries are compiled into an automaton on first use; the
/// resulting converter lives for the rest of the process and has nothing to
/// release.
#[derive(Clone, Copy)]
pub struct ZhConverter {
    variant: ScriptVariant,
    inner: &'static zhconv::ZhConverter,
}

impl ZhConverter {
    /// Loads the converter for `variant`.
    pub fn new(variant: ScriptVariant) -> Self {
        log::debug!("Loading {} conversion tables", variant);
        Self {
            variant,
            inner: zhconv::get_builtin_converter(variant.zhconv_variant()),
        }
    }

    /// Returns the variant this converter targets.
    pub fn variant(&self) -> ScriptVariant {
        self.variant
    }
}

impl fmt::Debug for ZhConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZhConverter")
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

impl Converter for ZhConverter {
    fn convert(&self, text: &str) -> Result<String> {
        Ok(self.inner.convert(text))
    }
}

/// Literal substitution applied to the package document after conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRule {
    /// Exact text to replace.
    pub from: String,
    /// Replacement text.
    pub to: String,
}

impl MetadataRule {
    /// Creates a rule replacing `from` with `to`.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Applies the rule to every occurrence in `text`.
    ///
    /// Returns `None` when `from` does not occur.
    pub fn apply(&self, text: &str) -> Option<String> {
        if self.from.is_empty() || !text.contains(&self.from) {
            return None;
        }
        Some(text.replace(&self.from, &self.to))
    }
}

impl Default for MetadataRule {
    fn default() -> Self {
        Self::new(
            "<dc:language>zh-CN</dc:language>",
            "<dc:language>zh-TW</dc:language>",
        )
    }
}

/// Converter plus metadata rule shared by all rewrites of a process.
///
/// Cloning is cheap; clones share the same converter.
#[derive(Clone)]
pub struct ConversionContext {
    converter: Arc<dyn Converter>,
    metadata_rule: MetadataRule,
}

impl ConversionContext {
    /// Creates a context with the built-in converter for `variant`.
    pub fn new(variant: ScriptVariant) -> Self {
        Self::with_converter(ZhConverter::new(variant))
    }

    /// Creates a context around a custom converter.
    pub fn with_converter(converter: impl Converter + 'static) -> Self {
        Self {
            converter: Arc::new(converter),
            metadata_rule: MetadataRule::default(),
        }
    }

    /// Replaces the metadata rule.
    pub fn metadata_rule(mut self, rule: MetadataRule) -> Self {
        self.metadata_rule = rule;
        self
    }

    /// Returns the metadata rule.
    pub fn rule(&self) -> &MetadataRule {
        &self.metadata_rule
    }

    /// Converts a unit of text.
    pub fn convert(&self, text: &str) -> Result<String> {
        self.converter.convert(text)
    }
}

impl Default for ConversionContext {
    fn default() -> Self {
        Self::new(ScriptVariant::default())
    }
}

impl fmt::Debug for ConversionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionContext")
            .field("metadata_rule", &self.metadata_rule)
            .finish_non_exhaustive()
    }
}
