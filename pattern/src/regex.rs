//! Compiled regular expressions for text predicates.

use crate::{PatternError, PatternResult};
use regex_lite::Regex;
use std::fmt;

/// Hard cap on the number of capture groups tracked per match, mirroring
/// common regex-engine limits.
pub const MAX_CAPTURE_GROUPS: usize = 30;

/// A half-open byte span within the tested string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSpan {
    pub start: usize,
    pub end: usize,
}

/// A compiled regular expression attached to a text predicate, together
/// with its inversion flag.
#[derive(Debug, Clone)]
pub struct RegexInfo {
    expr: String,
    regex: Regex,
    invert: bool,
}

impl RegexInfo {
    /// Compile a plain (non-inverted) regex.
    pub fn new(expr: &str) -> PatternResult<Self> {
        Self::compile(expr, false)
    }

    /// Compile an inverted regex: the test succeeds iff the expression does
    /// not match.
    pub fn new_inverted(expr: &str) -> PatternResult<Self> {
        Self::compile(expr, true)
    }

    fn compile(expr: &str, invert: bool) -> PatternResult<Self> {
        let regex = Regex::new(expr)
            .map_err(|e| PatternError::invalid_regex(expr, e.to_string()))?;
        Ok(Self {
            expr: expr.to_string(),
            regex,
            invert,
        })
    }

    /// The source expression, for diagnostics.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Test `input`, honoring inversion.
    ///
    /// A plain test returns the participating capture-group spans of the
    /// first match (group 0 first), stopping at the first group that did
    /// not participate and capped at [`MAX_CAPTURE_GROUPS`]. An inverted
    /// test succeeds when the regex does not match; its single span covers
    /// the whole input.
    pub fn find(&self, input: &str) -> Option<Vec<CaptureSpan>> {
        if self.invert {
            if self.regex.is_match(input) {
                None
            } else {
                Some(vec![CaptureSpan {
                    start: 0,
                    end: input.len(),
                }])
            }
        } else {
            let caps = self.regex.captures(input)?;
            let mut spans = Vec::new();
            for i in 0..caps.len().min(MAX_CAPTURE_GROUPS) {
                match caps.get(i) {
                    Some(group) => spans.push(CaptureSpan {
                        start: group.start(),
                        end: group.end(),
                    }),
                    None => break,
                }
            }
            Some(spans)
        }
    }
}

impl fmt::Display for RegexInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invert {
            write!(f, "!{}", self.expr)
        } else {
            write!(f, "{}", self.expr)
        }
    }
}
