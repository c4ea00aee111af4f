//! Approximate matching under a cost budget. One pass simulates every start
//! offset at once; substitution consumes a non-matching character, deletion
//! consumes a subject character with the thread staying put, insertion
//! crosses a character state without consuming. Each automaton state holds
//! one resident thread, the best by (cost, start, arrival); the reported
//! match is lowest cost, then leftmost, then longest.

use super::{holds, Input, Slots};
use crate::tnfa::{State, StateId, Tnfa};

/// Costs and limits for approximate matching. The all-zero default
/// degenerates to exact search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApproxParams {
    /// Cost of inserting a pattern character the subject lacks.
    pub cost_ins: u32,
    /// Cost of deleting a subject character the pattern lacks.
    pub cost_del: u32,
    pub cost_subst: u32,
    /// Total cost budget.
    pub max_cost: u32,
    pub max_ins: u32,
    pub max_del: u32,
    pub max_subst: u32,
    /// Cap on edits of any kind combined.
    pub max_err: u32,
}

/// What an approximate match spent, by edit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApproxCost {
    pub cost: u32,
    pub num_ins: u32,
    pub num_del: u32,
    pub num_subst: u32,
}

#[derive(Clone)]
struct Thread {
    slots: Slots,
    cost: u32,
    ins: u32,
    del: u32,
    subst: u32,
}

impl Thread {
    fn within(&self, params: &ApproxParams) -> bool {
        self.cost <= params.max_cost
            && self.ins <= params.max_ins
            && self.del <= params.max_del
            && self.subst <= params.max_subst
            && self.ins + self.del + self.subst <= params.max_err
    }
}

pub(crate) struct Hit {
    pub slots: Slots,
    pub cost: ApproxCost,
}

// a resident is replaced only by a strictly better thread; equal threads
// keep the incumbent, so arrival order is the final tie-break
fn better(a: &Thread, b: &Thread) -> bool {
    a.cost < b.cost || (a.cost == b.cost && a.slots[0] < b.slots[0])
}

fn offer(list: &mut [Option<Thread>], work: &mut Vec<StateId>, state: StateId, th: Thread) {
    match &list[state] {
        Some(old) if !better(&th, old) => {}
        _ => {
            list[state] = Some(th);
            work.push(state);
        }
    }
}

// epsilon closure plus the insertion edge over character states; terminates
// because an offer only sticks when it strictly improves the resident
fn closure(
    tnfa: &Tnfa,
    input: &Input,
    params: &ApproxParams,
    list: &mut [Option<Thread>],
    work: &mut Vec<StateId>,
    at: usize,
) {
    while let Some(sid) = work.pop() {
        let Some(th) = list[sid].clone() else { continue };
        match &tnfa.states[sid] {
            State::Jmp { next } => offer(list, work, *next, th),
            State::Split { pref, alt } => {
                offer(list, work, *pref, th.clone());
                offer(list, work, *alt, th);
            }
            State::Save { slot, next } => {
                let mut th = th;
                th.slots[*slot] = Some(at);
                offer(list, work, *next, th);
            }
            State::Assert { kind, next } => {
                if holds(*kind, input, at, tnfa.flags) {
                    offer(list, work, *next, th);
                }
            }
            State::Char { next, .. } => {
                let mut th = th;
                th.cost = th.cost.saturating_add(params.cost_ins);
                th.ins += 1;
                if th.within(params) {
                    offer(list, work, *next, th);
                }
            }
            State::Match => {}
        }
    }
}

pub(crate) fn find(tnfa: &Tnfa, region: &str, params: &ApproxParams) -> Option<Hit> {
    let input = Input::new(region);
    let newline = tnfa.flags.contains(crate::flags::Flags::NEWLINE);
    let states = tnfa.states.len();

    let mut cur: Vec<Option<Thread>> = vec![None; states];
    let mut next: Vec<Option<Thread>> = vec![None; states];
    let mut work: Vec<StateId> = Vec::new();
    let mut best: Option<Hit> = None;

    let mut at = 0;
    loop {
        let mut slots: Slots = vec![None; tnfa.slots()].into_boxed_slice();
        slots[0] = Some(at);
        offer(
            &mut cur,
            &mut work,
            tnfa.start,
            Thread {
                slots,
                cost: 0,
                ins: 0,
                del: 0,
                subst: 0,
            },
        );
        closure(tnfa, &input, params, &mut cur, &mut work, at);

        if let Some(th) = &cur[tnfa.accept] {
            let replace = match &best {
                None => true,
                Some(b) => {
                    th.cost < b.cost.cost
                        || (th.cost == b.cost.cost && th.slots[0] < b.slots[0])
                        || (th.cost == b.cost.cost
                            && th.slots[0] == b.slots[0]
                            && Some(at) > b.slots[1])
                }
            };
            if replace {
                let mut slots = th.slots.clone();
                slots[1] = Some(at);
                best = Some(Hit {
                    slots,
                    cost: ApproxCost {
                        cost: th.cost,
                        num_ins: th.ins,
                        num_del: th.del,
                        num_subst: th.subst,
                    },
                });
            }
        }

        let Some((c, len)) = input.get(at) else { break };

        for slot in next.iter_mut() {
            *slot = None;
        }
        for sid in 0..states {
            let Some(th) = cur[sid].take() else { continue };
            if let State::Char { set, next: succ } = &tnfa.states[sid] {
                if set.matches(c, newline) {
                    offer(&mut next, &mut work, *succ, th.clone());
                } else {
                    let mut sub = th.clone();
                    sub.cost = sub.cost.saturating_add(params.cost_subst);
                    sub.subst += 1;
                    if sub.within(params) {
                        offer(&mut next, &mut work, *succ, sub);
                    }
                }
            }
            // delete the subject character, stay put; this also carries
            // threads waiting on an anchor past characters the pattern
            // has no use for
            let mut del = th;
            del.cost = del.cost.saturating_add(params.cost_del);
            del.del += 1;
            if del.within(params) {
                offer(&mut next, &mut work, sid, del);
            }
        }
        std::mem::swap(&mut cur, &mut next);
        at += len;
    }
    best
}
