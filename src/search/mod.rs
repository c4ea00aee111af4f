//! Breadth-first simulation of the tagged automaton. Threads advance in
//! lockstep one character at a time; selection is POSIX leftmost-longest,
//! with thread priority (pattern order) breaking ties.

pub(crate) mod approx;

pub use approx::{ApproxCost, ApproxParams};

use crate::error::Error;
use crate::flags::Flags;
use crate::parser::Anchor;
use crate::tnfa::{State, StateId, Tnfa};
use crate::Pattern;

pub(crate) type Slots = Box<[Option<usize>]>;

// Subject buffer, classified once per call: pure-ASCII subjects step
// byte-wise, anything else decodes characters. Offsets are byte offsets
// either way.
pub(crate) struct Input<'h> {
    hay: &'h str,
    ascii: bool,
}

impl<'h> Input<'h> {
    pub fn new(hay: &'h str) -> Self {
        Self {
            hay,
            ascii: hay.is_ascii(),
        }
    }

    pub fn len(&self) -> usize {
        self.hay.len()
    }

    pub fn get(&self, at: usize) -> Option<(char, usize)> {
        if at >= self.hay.len() {
            None
        } else if self.ascii {
            Some((self.hay.as_bytes()[at] as char, 1))
        } else {
            let c = self.hay[at..].chars().next()?;
            Some((c, c.len_utf8()))
        }
    }

    pub fn prev(&self, at: usize) -> Option<char> {
        if at == 0 {
            None
        } else if self.ascii {
            Some(self.hay.as_bytes()[at - 1] as char)
        } else {
            self.hay[..at].chars().next_back()
        }
    }
}

pub(crate) fn holds(kind: Anchor, input: &Input, at: usize, flags: Flags) -> bool {
    let newline = flags.contains(Flags::NEWLINE);
    match kind {
        Anchor::Start => at == 0 || (newline && input.prev(at) == Some('\n')),
        Anchor::End => at == input.len() || (newline && matches!(input.get(at), Some(('\n', _)))),
    }
}

struct Thread {
    state: StateId,
    slots: Slots,
}

struct ThreadList {
    threads: Vec<Thread>,
    seen: Vec<bool>,
}

impl ThreadList {
    fn new(states: usize) -> Self {
        Self {
            threads: Vec::new(),
            seen: vec![false; states],
        }
    }

    fn clear(&mut self) {
        self.threads.clear();
        self.seen.iter_mut().for_each(|s| *s = false);
    }
}

// epsilon closure in priority order; first arrival at a state wins
fn add_thread(tnfa: &Tnfa, input: &Input, list: &mut ThreadList, state: StateId, at: usize, slots: Slots) {
    if list.seen[state] {
        return;
    }
    list.seen[state] = true;

    match &tnfa.states[state] {
        State::Jmp { next } => add_thread(tnfa, input, list, *next, at, slots),
        State::Split { pref, alt } => {
            add_thread(tnfa, input, list, *pref, at, slots.clone());
            add_thread(tnfa, input, list, *alt, at, slots);
        }
        State::Save { slot, next } => {
            let mut slots = slots;
            slots[*slot] = Some(at);
            add_thread(tnfa, input, list, *next, at, slots);
        }
        State::Assert { kind, next } => {
            if holds(*kind, input, at, tnfa.flags) {
                add_thread(tnfa, input, list, *next, at, slots);
            }
        }
        State::Char { .. } | State::Match => list.threads.push(Thread { state, slots }),
    }
}

fn run_at(tnfa: &Tnfa, input: &Input, start: usize) -> Option<Slots> {
    let newline = tnfa.flags.contains(Flags::NEWLINE);
    let mut clist = ThreadList::new(tnfa.states.len());
    let mut nlist = ThreadList::new(tnfa.states.len());
    let mut best = None;

    let mut slots: Slots = vec![None; tnfa.slots()].into_boxed_slice();
    slots[0] = Some(start);
    add_thread(tnfa, input, &mut clist, tnfa.start, start, slots);

    let mut at = start;
    while !clist.threads.is_empty() {
        // the highest-priority accepting thread wins this end offset; a
        // longer match later overwrites it
        for th in &clist.threads {
            if matches!(tnfa.states[th.state], State::Match) {
                let mut slots = th.slots.clone();
                slots[1] = Some(at);
                best = Some(slots);
                break;
            }
        }

        let Some((c, len)) = input.get(at) else { break };
        nlist.clear();
        for th in clist.threads.drain(..) {
            if let State::Char { set, next } = &tnfa.states[th.state] {
                if set.matches(c, newline) {
                    add_thread(tnfa, input, &mut nlist, *next, at + len, th.slots);
                }
            }
        }
        std::mem::swap(&mut clist, &mut nlist);
        at += len;
    }
    best
}

// unanchored search tries successive start offsets, leftmost first
pub(crate) fn find(tnfa: &Tnfa, region: &str, anchored: bool) -> Option<Slots> {
    let input = Input::new(region);
    let mut at = 0;
    loop {
        if let Some(slots) = run_at(tnfa, &input, at) {
            return Some(slots);
        }
        if anchored {
            return None;
        }
        match input.get(at) {
            Some((_, len)) => at += len,
            None => return None,
        }
    }
}

pub(crate) fn spans_from(slots: &[Option<usize>], groups: usize) -> Vec<Option<(usize, usize)>> {
    (0..=groups)
        .map(|i| match (slots[2 * i], slots[2 * i + 1]) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        })
        .collect()
}

/// A single match, borrowing the subject. Index 0 is the whole match;
/// indices 1..=group_count are the capture groups in opening order.
#[derive(Debug, Clone)]
pub struct Match<'h> {
    haystack: &'h str,
    spans: Vec<Option<(usize, usize)>>,
    cost: Option<ApproxCost>,
}

impl<'h> Match<'h> {
    pub(crate) fn new(
        haystack: &'h str,
        base: usize,
        mut spans: Vec<Option<(usize, usize)>>,
        cost: Option<ApproxCost>,
    ) -> Self {
        if base > 0 {
            for span in spans.iter_mut().flatten() {
                span.0 += base;
                span.1 += base;
            }
        }
        Self {
            haystack,
            spans,
            cost,
        }
    }

    pub fn start(&self) -> usize {
        self.spans[0].map_or(0, |s| s.0)
    }

    pub fn end(&self) -> usize {
        self.spans[0].map_or(0, |s| s.1)
    }

    pub fn as_str(&self) -> &'h str {
        &self.haystack[self.start()..self.end()]
    }

    pub fn group_count(&self) -> usize {
        self.spans.len() - 1
    }

    /// The span of group `n`, or `None` if it did not participate.
    pub fn span(&self, n: usize) -> Result<Option<(usize, usize)>, Error> {
        self.spans.get(n).copied().ok_or(Error::Group(n))
    }

    /// The text of group `n`, or `None` if it did not participate.
    pub fn group(&self, n: usize) -> Result<Option<&'h str>, Error> {
        Ok(self.span(n)?.map(|(s, e)| &self.haystack[s..e]))
    }

    pub fn groups(&self) -> Vec<Option<&'h str>> {
        self.spans[1..]
            .iter()
            .map(|span| span.map(|(s, e)| &self.haystack[s..e]))
            .collect()
    }

    /// Present only for approximate matches.
    pub fn cost(&self) -> Option<ApproxCost> {
        self.cost
    }
}

/// Iterator over non-overlapping matches, see [`Pattern::finditer`].
pub struct Matches<'p, 'h> {
    pattern: &'p Pattern,
    haystack: &'h str,
    at: usize,
    done: bool,
}

impl<'p, 'h> Matches<'p, 'h> {
    pub(crate) fn new(pattern: &'p Pattern, haystack: &'h str) -> Self {
        Self {
            pattern,
            haystack,
            at: 0,
            done: false,
        }
    }
}

impl<'h> Iterator for Matches<'_, 'h> {
    type Item = Match<'h>;

    fn next(&mut self) -> Option<Match<'h>> {
        if self.done || self.at > self.haystack.len() {
            self.done = true;
            return None;
        }

        let Some(m) = self.pattern.find_from(self.haystack, self.at) else {
            self.done = true;
            return None;
        };

        if m.end() > m.start() {
            self.at = m.end();
        } else {
            // an empty match must not stall the cursor
            self.at = m.end()
                + self.haystack[m.end()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
        }
        Some(m)
    }
}
