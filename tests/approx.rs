use fuzzre::{ApproxParams, Flags, Pattern};

fn lenient(params: ApproxParams) -> ApproxParams {
    ApproxParams {
        max_cost: 10,
        max_ins: 10,
        max_del: 10,
        max_subst: 10,
        max_err: 10,
        ..params
    }
}

#[test]
fn readme_approx() {
    let p = Pattern::new("abc([0-9])abc").unwrap();
    // insertions and deletions stay capped at zero; only substitutions
    // may repair the subject
    let params = ApproxParams {
        cost_subst: 1,
        max_cost: 10,
        max_subst: 10,
        max_err: 10,
        ..ApproxParams::default()
    };

    let m = p.approx("asdfabc5acbasdfsd", &params).unwrap();
    assert_eq!((m.start(), m.end()), (4, 11));
    assert_eq!(m.as_str(), "abc5acb");
    assert_eq!(m.group(1).unwrap(), Some("5"));

    let cost = m.cost().unwrap();
    assert_eq!(cost.cost, 2);
    assert_eq!((cost.num_ins, cost.num_del, cost.num_subst), (0, 0, 2));
}

#[test]
fn insertion_repairs_a_missing_character() {
    let p = Pattern::new("frood").unwrap();
    let params = lenient(ApproxParams {
        cost_ins: 1,
        cost_del: 1,
        cost_subst: 1,
        ..ApproxParams::default()
    });

    let m = p.approx("my frod", &params).unwrap();
    assert_eq!(m.as_str(), "frod");
    let cost = m.cost().unwrap();
    assert_eq!(cost.cost, 1);
    assert_eq!((cost.num_ins, cost.num_del, cost.num_subst), (1, 0, 0));
}

#[test]
fn deletion_repairs_an_extra_character() {
    let p = Pattern::new("fod").unwrap();
    let params = lenient(ApproxParams {
        cost_ins: 1,
        cost_del: 1,
        cost_subst: 1,
        ..ApproxParams::default()
    });

    let m = p.approx("my food", &params).unwrap();
    assert_eq!(m.as_str(), "food");
    let cost = m.cost().unwrap();
    assert_eq!(cost.cost, 1);
    assert_eq!((cost.num_ins, cost.num_del, cost.num_subst), (0, 1, 0));
}

#[test]
fn an_exact_match_beats_a_cheaper_start() {
    let p = Pattern::new("abcd").unwrap();
    let params = lenient(ApproxParams {
        cost_ins: 1,
        cost_del: 1,
        cost_subst: 1,
        ..ApproxParams::default()
    });

    // the exact occurrence later in the subject wins over the earlier
    // one-substitution candidate
    let m = p.approx("abcxzzabcd", &params).unwrap();
    assert_eq!((m.start(), m.end()), (6, 10));
    assert_eq!(m.cost().unwrap().cost, 0);
}

#[test]
fn budgets_prune_matches() {
    let p = Pattern::new("abc([0-9])abc").unwrap();

    // two substitutions needed, only one allowed
    let params = ApproxParams {
        cost_subst: 1,
        max_cost: 1,
        max_subst: 1,
        max_err: 1,
        ..ApproxParams::default()
    };
    assert!(p.approx("asdfabc5acbasdfsd", &params).is_none());

    // count caps bind even when the cost stays within budget
    let params = ApproxParams {
        cost_subst: 0,
        max_cost: 10,
        max_subst: 1,
        max_err: 1,
        ..ApproxParams::default()
    };
    assert!(p.approx("asdfabc5acbasdfsd", &params).is_none());
}

#[test]
fn total_edit_cap_binds_across_kinds() {
    let p = Pattern::new("abcd").unwrap();
    // one insertion plus one substitution, but only one edit allowed overall
    let params = ApproxParams {
        cost_ins: 1,
        cost_subst: 1,
        max_cost: 10,
        max_ins: 10,
        max_del: 10,
        max_subst: 10,
        max_err: 1,
        ..ApproxParams::default()
    };
    assert!(p.approx("axd", &params).is_none());
}

#[test]
fn default_params_mean_exact_matching() {
    let p = Pattern::new("a([0-9])a").unwrap();
    let hay = "bcda7aefga8ah";

    let m = p.approx(hay, &ApproxParams::default()).unwrap();
    let e = p.search(hay).unwrap();
    assert_eq!((m.start(), m.end()), (e.start(), e.end()));
    assert_eq!(m.group(1).unwrap(), e.group(1).unwrap());

    let cost = m.cost().unwrap();
    assert_eq!(cost.cost, 0);
    assert_eq!((cost.num_ins, cost.num_del, cost.num_subst), (0, 0, 0));

    assert!(p.approx("no digits here", &ApproxParams::default()).is_none());
}

#[test]
fn exact_match_carries_no_cost() {
    let p = Pattern::new("a").unwrap();
    assert_eq!(p.search("a").unwrap().cost(), None);
}

#[test]
fn approx_at_reports_absolute_offsets() {
    let p = Pattern::new("frood").unwrap();
    let params = lenient(ApproxParams {
        cost_ins: 1,
        ..ApproxParams::default()
    });

    let m = p.approx_at("frod frod", "frod frod".len() - 4, None, &params)
        .unwrap()
        .unwrap();
    assert_eq!((m.start(), m.end()), (5, 9));

    assert!(p.approx_at("frod", 9, None, &params).is_err());
}

#[test]
fn deletion_carries_past_an_end_anchor() {
    let p = Pattern::new("abc$").unwrap();
    let params = lenient(ApproxParams {
        cost_ins: 1,
        cost_del: 1,
        cost_subst: 1,
        ..ApproxParams::default()
    });

    // the trailing character blocks the anchor until a deletion consumes it
    let m = p.approx("abcx", &params).unwrap();
    assert_eq!((m.start(), m.end()), (0, 4));
    let cost = m.cost().unwrap();
    assert_eq!(cost.cost, 1);
    assert_eq!((cost.num_ins, cost.num_del, cost.num_subst), (0, 1, 0));

    // no budget, no match
    assert!(p.approx("abcx", &ApproxParams::default()).is_none());
}

#[test]
fn substitution_behind_a_start_anchor() {
    let p = Pattern::new("^abc").unwrap();
    let params = lenient(ApproxParams {
        cost_ins: 1,
        cost_del: 1,
        cost_subst: 1,
        ..ApproxParams::default()
    });

    let m = p.approx("xbc", &params).unwrap();
    assert_eq!((m.start(), m.end()), (0, 3));
    let cost = m.cost().unwrap();
    assert_eq!(cost.cost, 1);
    assert_eq!((cost.num_ins, cost.num_del, cost.num_subst), (0, 0, 1));

    // the anchor itself is never negotiable: a later exact occurrence
    // does not become a match
    assert!(p.approx("zzabc", &ApproxParams::default()).is_none());
}

#[test]
fn newline_anchors_under_a_budget() {
    let p = Pattern::with_flags("^bc$", Flags::EXTENDED | Flags::NEWLINE).unwrap();
    let params = lenient(ApproxParams {
        cost_ins: 1,
        cost_del: 1,
        cost_subst: 1,
        ..ApproxParams::default()
    });

    // "bcx" line: delete the 'x' so '$' sees the newline
    let m = p.approx("a\nbcx\nd", &params).unwrap();
    assert_eq!((m.start(), m.end()), (2, 5));
    let cost = m.cost().unwrap();
    assert_eq!(cost.cost, 1);
    assert_eq!((cost.num_ins, cost.num_del, cost.num_subst), (0, 1, 0));
}

#[test]
fn costs_weigh_the_choice_of_repair() {
    let p = Pattern::new("ab").unwrap();
    // substituting is cheaper than deleting here, so "xb" is repaired by
    // substitution rather than matched around
    let params = lenient(ApproxParams {
        cost_ins: 5,
        cost_del: 5,
        cost_subst: 1,
        ..ApproxParams::default()
    });
    let m = p.approx("xb", &params).unwrap();
    let cost = m.cost().unwrap();
    assert_eq!(cost.cost, 1);
    assert_eq!((cost.num_ins, cost.num_del, cost.num_subst), (0, 0, 1));
}
