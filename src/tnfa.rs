//! The tagged automaton: Thompson fragments over an arena of integer-indexed
//! states. Submatch boundaries are `Save` transitions; group `i` owns slots
//! `2i` and `2i + 1`, with slots 0 and 1 reserved for the overall match.

use crate::error::Error;
use crate::flags::Flags;
use crate::parser::{Anchor, Ast, ClassItem, ClassKind, ClassSet, Repeat};

pub(crate) type StateId = usize;

// bounded-repetition expansion multiplies fragments, so a small pattern can
// still demand an absurd state count
const MAX_STATES: usize = 1 << 14;

#[derive(Debug, Clone)]
pub(crate) enum State {
    Char { set: CharSet, next: StateId },
    Jmp { next: StateId },
    // prioritized epsilon fork; `pref` is explored first
    Split { pref: StateId, alt: StateId },
    // record the current offset into a tag slot
    Save { slot: usize, next: StateId },
    Assert { kind: Anchor, next: StateId },
    Match,
}

#[derive(Debug, Clone)]
pub(crate) struct CharSet {
    negated: bool,
    fold: bool,
    ranges: Vec<(char, char)>,
    named: Vec<ClassKind>,
}

impl CharSet {
    fn literal(c: char, fold: bool) -> Self {
        Self {
            negated: false,
            fold,
            ranges: vec![(c, c)],
            named: Vec::new(),
        }
    }

    fn dot() -> Self {
        // a negated empty set matches anything; the NEWLINE carve-out for
        // negated sets then handles `.` as well
        Self {
            negated: true,
            fold: false,
            ranges: Vec::new(),
            named: Vec::new(),
        }
    }

    fn from_class(set: &ClassSet, fold: bool) -> Self {
        let mut ranges = Vec::new();
        let mut named = Vec::new();
        for item in &set.items {
            match *item {
                ClassItem::Range(lo, hi) => ranges.push((lo, hi)),
                ClassItem::Named(kind) => named.push(kind),
            }
        }
        Self {
            negated: set.negated,
            fold,
            ranges,
            named,
        }
    }

    fn raw_contains(&self, c: char) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
            || self.named.iter().any(|k| k.contains(c))
    }

    pub(crate) fn matches(&self, c: char, newline: bool) -> bool {
        if newline && self.negated && c == '\n' {
            return false;
        }
        let mut member = self.raw_contains(c);
        if !member && self.fold {
            let mut lower = c.to_lowercase();
            let mut upper = c.to_uppercase();
            if let (Some(l), None) = (lower.next(), lower.next()) {
                member |= l != c && self.raw_contains(l);
            }
            if let (Some(u), None) = (upper.next(), upper.next()) {
                member |= u != c && self.raw_contains(u);
            }
        }
        member != self.negated
    }
}

#[derive(Debug)]
pub(crate) struct Tnfa {
    pub states: Vec<State>,
    pub start: StateId,
    pub accept: StateId,
    pub groups: usize,
    pub flags: Flags,
}

impl Tnfa {
    pub fn compile(ast: &Ast, flags: Flags) -> Result<Self, Error> {
        let mut b = Builder {
            states: Vec::new(),
            flags,
        };
        let frag = b.frag(ast)?;
        let accept = b.push(State::Match)?;
        b.patch(&frag.outs, accept);
        Ok(Self {
            states: b.states,
            start: frag.start,
            accept,
            groups: ast.group_count() as usize,
            flags,
        })
    }

    pub fn slots(&self) -> usize {
        2 * (self.groups + 1)
    }
}

// a dangling exit: which port of which state still needs a target
#[derive(Debug, Clone, Copy)]
enum Out {
    Next(StateId),
    Pref(StateId),
    Alt(StateId),
}

struct Frag {
    start: StateId,
    outs: Vec<Out>,
}

struct Builder {
    states: Vec<State>,
    flags: Flags,
}

// placeholder target for unpatched ports
const HOLE: StateId = usize::MAX;

impl Builder {
    fn push(&mut self, state: State) -> Result<StateId, Error> {
        if self.states.len() >= MAX_STATES {
            return Err(Error::TooLarge);
        }
        self.states.push(state);
        Ok(self.states.len() - 1)
    }

    fn patch(&mut self, outs: &[Out], target: StateId) {
        for out in outs {
            match *out {
                Out::Next(id) => match &mut self.states[id] {
                    State::Char { next, .. }
                    | State::Jmp { next }
                    | State::Save { next, .. }
                    | State::Assert { next, .. } => *next = target,
                    State::Split { .. } | State::Match => unreachable!("not a next port"),
                },
                Out::Pref(id) => match &mut self.states[id] {
                    State::Split { pref, .. } => *pref = target,
                    _ => unreachable!("not a split"),
                },
                Out::Alt(id) => match &mut self.states[id] {
                    State::Split { alt, .. } => *alt = target,
                    _ => unreachable!("not a split"),
                },
            }
        }
    }

    fn fold(&self) -> bool {
        self.flags.contains(Flags::ICASE)
    }

    fn greedy(&self) -> bool {
        !self.flags.contains(Flags::UNGREEDY)
    }

    fn frag(&mut self, ast: &Ast) -> Result<Frag, Error> {
        match ast {
            Ast::Empty => {
                let id = self.push(State::Jmp { next: HOLE })?;
                Ok(Frag {
                    start: id,
                    outs: vec![Out::Next(id)],
                })
            }
            Ast::Literal(c) => {
                let set = CharSet::literal(*c, self.fold());
                let id = self.push(State::Char { set, next: HOLE })?;
                Ok(Frag {
                    start: id,
                    outs: vec![Out::Next(id)],
                })
            }
            Ast::Class(set) => {
                let set = CharSet::from_class(set, self.fold());
                let id = self.push(State::Char { set, next: HOLE })?;
                Ok(Frag {
                    start: id,
                    outs: vec![Out::Next(id)],
                })
            }
            Ast::Dot => {
                let id = self.push(State::Char {
                    set: CharSet::dot(),
                    next: HOLE,
                })?;
                Ok(Frag {
                    start: id,
                    outs: vec![Out::Next(id)],
                })
            }
            Ast::Anchor(kind) => {
                let id = self.push(State::Assert {
                    kind: *kind,
                    next: HOLE,
                })?;
                Ok(Frag {
                    start: id,
                    outs: vec![Out::Next(id)],
                })
            }
            Ast::Seq(items) => {
                let mut frags = Vec::with_capacity(items.len());
                for item in items {
                    frags.push(self.frag(item)?);
                }
                let mut iter = frags.into_iter();
                let Some(mut acc) = iter.next() else {
                    return self.frag(&Ast::Empty);
                };
                for next in iter {
                    self.patch(&acc.outs, next.start);
                    acc = Frag {
                        start: acc.start,
                        outs: next.outs,
                    };
                }
                Ok(acc)
            }
            Ast::Alt(items) => {
                let mut frags = Vec::with_capacity(items.len());
                for item in items {
                    frags.push(self.frag(item)?);
                }
                let mut iter = frags.into_iter().rev();
                let Some(mut acc) = iter.next() else {
                    return self.frag(&Ast::Empty);
                };
                for frag in iter {
                    let id = self.push(State::Split {
                        pref: frag.start,
                        alt: acc.start,
                    })?;
                    let mut outs = frag.outs;
                    outs.extend(acc.outs);
                    acc = Frag { start: id, outs };
                }
                Ok(acc)
            }
            Ast::Group { index, inner } => {
                match index {
                    Some(i) if !self.flags.contains(Flags::NOSUB) => {
                        let slot = 2 * (*i as usize);
                        let open = self.push(State::Save { slot, next: HOLE })?;
                        let body = self.frag(inner)?;
                        self.patch(&[Out::Next(open)], body.start);
                        let close = self.push(State::Save {
                            slot: slot + 1,
                            next: HOLE,
                        })?;
                        self.patch(&body.outs, close);
                        Ok(Frag {
                            start: open,
                            outs: vec![Out::Next(close)],
                        })
                    }
                    // shell groups and NOSUB groups leave no trace
                    _ => self.frag(inner),
                }
            }
            Ast::Repeat { rep, inner } => self.repeat(inner, *rep),
        }
    }

    fn repeat(&mut self, inner: &Ast, rep: Repeat) -> Result<Frag, Error> {
        match (rep.min, rep.max) {
            (0, Some(0)) => self.frag(&Ast::Empty),
            (0, None) => self.star(inner),
            (min, None) => {
                let mut head = None;
                for _ in 1..min {
                    let copy = self.frag(inner)?;
                    head = Some(self.join(head, copy));
                }
                let tail = self.plus(inner)?;
                Ok(self.join(head, tail))
            }
            (min, Some(max)) => {
                let mut head = None;
                for _ in 0..min {
                    let copy = self.frag(inner)?;
                    head = Some(self.join(head, copy));
                }
                // a{2,4} adds (a(a)?)? after the required copies
                let mut tail: Option<Frag> = None;
                for _ in min..max {
                    let body = self.frag(inner)?;
                    let split = self.push(State::Split {
                        pref: HOLE,
                        alt: HOLE,
                    })?;
                    let (enter, skip) = if self.greedy() {
                        (Out::Pref(split), Out::Alt(split))
                    } else {
                        (Out::Alt(split), Out::Pref(split))
                    };
                    self.patch(&[enter], body.start);
                    let mut outs = vec![skip];
                    match tail {
                        Some(t) => {
                            self.patch(&body.outs, t.start);
                            outs.extend(t.outs);
                        }
                        None => outs.extend(body.outs),
                    }
                    tail = Some(Frag { start: split, outs });
                }
                match tail {
                    Some(t) => Ok(self.join(head, t)),
                    None => match head {
                        Some(h) => Ok(h),
                        None => self.frag(&Ast::Empty),
                    },
                }
            }
        }
    }

    fn join(&mut self, head: Option<Frag>, tail: Frag) -> Frag {
        match head {
            None => tail,
            Some(head) => {
                self.patch(&head.outs, tail.start);
                Frag {
                    start: head.start,
                    outs: tail.outs,
                }
            }
        }
    }

    fn star(&mut self, inner: &Ast) -> Result<Frag, Error> {
        let body = self.frag(inner)?;
        let split = self.push(State::Split {
            pref: HOLE,
            alt: HOLE,
        })?;
        let (enter, exit) = if self.greedy() {
            (Out::Pref(split), Out::Alt(split))
        } else {
            (Out::Alt(split), Out::Pref(split))
        };
        self.patch(&[enter], body.start);
        self.patch(&body.outs, split);
        Ok(Frag {
            start: split,
            outs: vec![exit],
        })
    }

    fn plus(&mut self, inner: &Ast) -> Result<Frag, Error> {
        let body = self.frag(inner)?;
        let split = self.push(State::Split {
            pref: HOLE,
            alt: HOLE,
        })?;
        let (again, exit) = if self.greedy() {
            (Out::Pref(split), Out::Alt(split))
        } else {
            (Out::Alt(split), Out::Pref(split))
        };
        self.patch(&[again], body.start);
        self.patch(&body.outs, split);
        Ok(Frag {
            start: body.start,
            outs: vec![exit],
        })
    }
}
