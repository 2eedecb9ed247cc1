//! Command signatures and argument extraction.
//!
//! Each [`CommandDefinition`] compiles to one anchored regex with a capture
//! group per argument slot, so a line either matches the whole signature or
//! is rejected before any handler runs.
//!
//! # Line Shape
//!
//! ```text
//! name "required" "required" -tag value -tag value
//! ```
//!
//! - Required arguments are double-quoted and appear in declaration order
//! - Optional arguments follow in declaration order and may be omitted
//! - Single spaces only, nothing after the last argument

use regex::Regex;

use crate::core::path::PathStyle;

/// Characters never allowed inside a quoted argument (besides the separator
/// of the foreign path style).
const FORBIDDEN: &[char] = &['*', '?', '"', '<', '>', '|'];

// =============================================================================
// Signature Parts
// =============================================================================

/// One quoted argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequiredArg {
    /// Whether `""` is accepted
    pub allow_empty: bool,
}

impl RequiredArg {
    pub const ANY: Self = Self { allow_empty: true };
    pub const NON_EMPTY: Self = Self { allow_empty: false };
}

/// Values an optional argument accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValuePattern {
    /// Decimal digits
    Int,
    /// `true` or `false`
    Bool,
    /// Only `true`; the flag is a switch spelled out in full
    LiteralTrue,
}

impl ValuePattern {
    fn regex(self) -> &'static str {
        match self {
            Self::Int => "[0-9]+",
            Self::Bool => "true|false",
            Self::LiteralTrue => "true",
        }
    }
}

/// One `-tag value` argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionSpec {
    pub tag: &'static str,
    pub value: ValuePattern,
}

impl OptionSpec {
    pub const fn new(tag: &'static str, value: ValuePattern) -> Self {
        Self { tag, value }
    }
}

// =============================================================================
// Parsed Arguments
// =============================================================================

/// Argument slots of a matched line: required first, then optional.
///
/// Always holds one slot per declared argument; omitted optional arguments
/// are `None`, never an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    slots: Vec<Option<String>>,
    required: usize,
}

impl ParsedArguments {
    pub fn new(slots: Vec<Option<String>>, required: usize) -> Self {
        Self { slots, required }
    }

    /// The `index`-th quoted argument.
    pub fn required(&self, index: usize) -> &str {
        self.slots
            .get(index)
            .filter(|_| index < self.required)
            .and_then(|slot| slot.as_deref())
            .unwrap_or_default()
    }

    /// The `index`-th optional argument, if it was given.
    pub fn optional(&self, index: usize) -> Option<&str> {
        self.slots.get(self.required + index)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }
}

// =============================================================================
// Command Definition
// =============================================================================

/// A command signature and the matcher compiled from it.
#[derive(Clone, Debug)]
pub struct CommandDefinition {
    name: &'static str,
    required: Vec<RequiredArg>,
    optional: Vec<OptionSpec>,
    matcher: Regex,
}

impl CommandDefinition {
    /// Compile a signature for paths of `style`.
    pub fn new(
        name: &'static str,
        required: &[RequiredArg],
        optional: &[OptionSpec],
        style: PathStyle,
    ) -> Result<Self, regex::Error> {
        let matcher = Regex::new(&signature_pattern(name, required, optional, style))?;
        Ok(Self {
            name,
            required: required.to_vec(),
            optional: optional.to_vec(),
            matcher,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> usize {
        self.required.len() + self.optional.len()
    }

    pub fn matches(&self, line: &str) -> bool {
        self.matcher.is_match(line)
    }

    /// Extract argument slots, or `None` if the line does not match.
    pub fn parse(&self, line: &str) -> Option<ParsedArguments> {
        let captures = self.matcher.captures(line)?;
        let slots = (1..=self.arity())
            .map(|group| captures.get(group).map(|m| m.as_str().to_string()))
            .collect();
        Some(ParsedArguments::new(slots, self.required.len()))
    }
}

/// `^name "(..)" "(..)"(?: -tag (..))?$`
fn signature_pattern(
    name: &str,
    required: &[RequiredArg],
    optional: &[OptionSpec],
    style: PathStyle,
) -> String {
    let class = argument_class(style);
    let mut pattern = format!("^{}", regex::escape(name));

    for arg in required {
        let repeat = if arg.allow_empty { '*' } else { '+' };
        pattern.push_str(&format!(" \"({class}{repeat})\""));
    }
    for option in optional {
        pattern.push_str(&format!(
            "(?: -{} ({}))?",
            regex::escape(option.tag),
            option.value.regex()
        ));
    }

    pattern.push('$');
    pattern
}

/// `[^...]` excluding forbidden characters and the foreign separator.
fn argument_class(style: PathStyle) -> String {
    let excluded: String = FORBIDDEN
        .iter()
        .copied()
        .chain(std::iter::once(style.foreign_separator()))
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    format!("[^{excluded}]")
}
