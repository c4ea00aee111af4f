//! Error-tolerant POSIX regular expressions with submatch tracking.
//!
//! Patterns compile to a tagged automaton with POSIX leftmost-longest match
//! selection. Beyond exact search, a pattern can match approximately: each
//! insertion, deletion, and substitution carries a configurable cost, and
//! the engine returns the best match within the given budget.
//!
//! ```
//! use fuzzre::{ApproxParams, Pattern};
//!
//! let pat = Pattern::new("abc([0-9])abc").unwrap();
//!
//! // exact search
//! assert!(pat.search("xyzabc5abcxyz").is_some());
//!
//! // approximate search tolerates two substitutions
//! let params = ApproxParams {
//!     cost_subst: 1,
//!     max_cost: 10,
//!     max_subst: 10,
//!     max_err: 10,
//!     ..ApproxParams::default()
//! };
//! let m = pat.approx("asdfabc5acbasdfsd", &params).unwrap();
//! assert_eq!(m.as_str(), "abc5acb");
//! assert_eq!(m.group(1).unwrap(), Some("5"));
//! assert_eq!(m.cost().unwrap().cost, 2);
//! ```
//!
//! The default syntax is POSIX extended; see [`Flags`] for the rest.

mod error;
mod flags;
mod parser;
mod search;
mod tnfa;

use std::sync::Arc;

pub use crate::error::{Error, SyntaxError, SyntaxKind};
pub use crate::flags::Flags;
pub use crate::search::{ApproxCost, ApproxParams, Match, Matches};

use crate::parser::Ast;
use crate::tnfa::Tnfa;

/// A compiled pattern. Cheap to clone; clones share the compiled automaton.
#[derive(Debug, Clone)]
pub struct Pattern {
    tnfa: Arc<Tnfa>,
}

impl Pattern {
    /// Compiles `pattern` with the default flags (POSIX extended syntax).
    pub fn new(pattern: &str) -> Result<Self, Error> {
        Self::with_flags(pattern, Flags::EXTENDED)
    }

    pub fn with_flags(pattern: &str, flags: Flags) -> Result<Self, Error> {
        let ast = Ast::parse(pattern, flags)?;
        Ok(Self {
            tnfa: Arc::new(Tnfa::compile(&ast, flags)?),
        })
    }

    pub fn group_count(&self) -> usize {
        self.tnfa.groups
    }

    pub fn flags(&self) -> Flags {
        self.tnfa.flags
    }

    /// Finds the leftmost-longest match anywhere in `haystack`.
    pub fn search<'h>(&self, haystack: &'h str) -> Option<Match<'h>> {
        search::find(&self.tnfa, haystack, false).map(|slots| self.hit(haystack, 0, &slots, None))
    }

    /// Like [`search`](Self::search), restricted to `haystack[pos..endpos]`.
    /// Anchors bind to the region's edges, but reported offsets stay
    /// absolute. Offsets out of range or off a character boundary error.
    pub fn search_at<'h>(
        &self,
        haystack: &'h str,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Option<Match<'h>>, Error> {
        let region = region(haystack, pos, endpos)?;
        Ok(search::find(&self.tnfa, region, false).map(|slots| self.hit(haystack, pos, &slots, None)))
    }

    /// Matches only at the start of `haystack`; the match may end anywhere.
    pub fn match_start<'h>(&self, haystack: &'h str) -> Option<Match<'h>> {
        search::find(&self.tnfa, haystack, true).map(|slots| self.hit(haystack, 0, &slots, None))
    }

    /// Finds the best approximate match under `params`: lowest total cost,
    /// with ties going to the leftmost start, then the longest match.
    pub fn approx<'h>(&self, haystack: &'h str, params: &ApproxParams) -> Option<Match<'h>> {
        search::approx::find(&self.tnfa, haystack, params)
            .map(|hit| self.hit(haystack, 0, &hit.slots, Some(hit.cost)))
    }

    /// Like [`approx`](Self::approx), with the region rules of
    /// [`search_at`](Self::search_at).
    pub fn approx_at<'h>(
        &self,
        haystack: &'h str,
        pos: usize,
        endpos: Option<usize>,
        params: &ApproxParams,
    ) -> Result<Option<Match<'h>>, Error> {
        let region = region(haystack, pos, endpos)?;
        Ok(search::approx::find(&self.tnfa, region, params)
            .map(|hit| self.hit(haystack, pos, &hit.slots, Some(hit.cost))))
    }

    /// Iterates over all non-overlapping matches, left to right.
    pub fn finditer<'p, 'h>(&'p self, haystack: &'h str) -> Matches<'p, 'h> {
        Matches::new(self, haystack)
    }

    pub fn findall<'h>(&self, haystack: &'h str) -> Vec<&'h str> {
        self.finditer(haystack).map(|m| m.as_str()).collect()
    }

    pub(crate) fn find_from<'h>(&self, haystack: &'h str, at: usize) -> Option<Match<'h>> {
        search::find(&self.tnfa, &haystack[at..], false)
            .map(|slots| self.hit(haystack, at, &slots, None))
    }

    fn hit<'h>(
        &self,
        haystack: &'h str,
        base: usize,
        slots: &[Option<usize>],
        cost: Option<ApproxCost>,
    ) -> Match<'h> {
        let spans = search::spans_from(slots, self.tnfa.groups);
        Match::new(haystack, base, spans, cost)
    }
}

fn region(haystack: &str, pos: usize, endpos: Option<usize>) -> Result<&str, Error> {
    let end = endpos.unwrap_or(haystack.len());
    if pos > haystack.len() || !haystack.is_char_boundary(pos) {
        return Err(Error::Position(pos));
    }
    if end > haystack.len() || end < pos || !haystack.is_char_boundary(end) {
        return Err(Error::Position(end));
    }
    Ok(&haystack[pos..end])
}

/// Anything that compiles to a [`Pattern`]; an existing pattern passes
/// through untouched.
pub trait IntoPattern {
    fn into_pattern(self) -> Result<Pattern, Error>;
}

impl IntoPattern for &str {
    fn into_pattern(self) -> Result<Pattern, Error> {
        Pattern::new(self)
    }
}

impl IntoPattern for &String {
    fn into_pattern(self) -> Result<Pattern, Error> {
        Pattern::new(self)
    }
}

impl IntoPattern for Pattern {
    fn into_pattern(self) -> Result<Pattern, Error> {
        Ok(self)
    }
}

impl IntoPattern for &Pattern {
    fn into_pattern(self) -> Result<Pattern, Error> {
        Ok(self.clone())
    }
}

pub fn compile(pattern: impl IntoPattern) -> Result<Pattern, Error> {
    pattern.into_pattern()
}

/// Compiles `pattern` if needed and searches `haystack`.
pub fn search<'h>(pattern: impl IntoPattern, haystack: &'h str) -> Result<Option<Match<'h>>, Error> {
    Ok(pattern.into_pattern()?.search(haystack))
}

/// Compiles `pattern` if needed and matches at the start of `haystack`.
pub fn match_start<'h>(
    pattern: impl IntoPattern,
    haystack: &'h str,
) -> Result<Option<Match<'h>>, Error> {
    Ok(pattern.into_pattern()?.match_start(haystack))
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
