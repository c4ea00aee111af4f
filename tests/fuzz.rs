use fuzzre::{ApproxParams, Pattern};

#[test]
fn search_invariant_fuzz() {
    use rand::prelude::*;

    let mut rng = SmallRng::seed_from_u64(7);

    const HAYSTACK_LEN: usize = 60;
    const PATTERN_LEN: usize = 4;
    const N_ROUNDS: usize = 50;

    fn random_pattern(rng: &mut SmallRng) -> String {
        let mut res = String::with_capacity(PATTERN_LEN * 2);
        for _ in 0..PATTERN_LEN {
            res.push(((rng.gen::<u8>() % 3) + 97) as u8 as char);
            match rng.gen::<u8>() % 4 {
                0 => res.push('?'),
                1 => res.push('*'),
                _ => {}
            }
        }
        res
    }

    fn random_haystack(rng: &mut SmallRng) -> String {
        let mut res = String::with_capacity(HAYSTACK_LEN);
        for _ in 0..HAYSTACK_LEN {
            res.push(((rng.gen::<u8>() % 4) + 97) as u8 as char);
        }
        res
    }

    for round in 0..N_ROUNDS {
        let pattern = random_pattern(&mut rng);
        let haystack = random_haystack(&mut rng);
        println!("Round {round}: pattern {pattern:?} haystack {haystack:?}");

        let p = Pattern::new(&pattern).unwrap();

        // every reported span is in bounds, in order, and non-overlapping
        let mut prev_end = 0;
        let mut spans = vec![];
        for m in p.finditer(&haystack) {
            assert!(m.start() <= m.end());
            assert!(m.end() <= haystack.len());
            assert!(m.start() >= prev_end || (m.start() == m.end() && m.start() == prev_end));
            assert_eq!(m.as_str(), &haystack[m.start()..m.end()]);
            prev_end = m.end().max(prev_end);
            spans.push((m.start(), m.end()));
        }

        // findall agrees with finditer
        let texts: Vec<_> = spans.iter().map(|&(s, e)| &haystack[s..e]).collect();
        assert_eq!(p.findall(&haystack), texts);

        // search agrees with the first iterator item
        let first = p.search(&haystack).map(|m| (m.start(), m.end()));
        assert_eq!(first, spans.first().copied());

        // a full-subject region changes nothing
        let at = p
            .search_at(&haystack, 0, Some(haystack.len()))
            .unwrap()
            .map(|m| (m.start(), m.end()));
        assert_eq!(at, first);

        // zero-budget approximate search is exact search
        let approx = p
            .approx(&haystack, &ApproxParams::default())
            .map(|m| (m.start(), m.end()));
        assert_eq!(approx, first);
    }
}

#[test]
fn approx_budget_fuzz() {
    use rand::prelude::*;

    let mut rng = SmallRng::seed_from_u64(11);

    // corrupt a known word, then check the engine repairs it within the
    // number of edits applied
    const N_ROUNDS: usize = 60;
    let word = "grampus";

    for round in 0..N_ROUNDS {
        let mut subject: Vec<char> = word.chars().collect();
        let edits = 1 + (rng.gen::<u8>() % 2) as u32;
        for _ in 0..edits {
            let i = rng.gen_range(0..subject.len());
            match rng.gen::<u8>() % 3 {
                0 => subject[i] = 'z',
                1 => subject.insert(i, 'z'),
                _ => {
                    subject.remove(i);
                }
            }
        }
        let subject: String = subject.into_iter().collect();
        println!("Round {round}: subject {subject:?} after {edits} edits");

        let p = Pattern::new(word).unwrap();
        let params = ApproxParams {
            cost_ins: 1,
            cost_del: 1,
            cost_subst: 1,
            max_cost: edits,
            max_ins: edits,
            max_del: edits,
            max_subst: edits,
            max_err: edits,
        };

        let m = p
            .approx(&subject, &params)
            .unwrap_or_else(|| panic!("no match for {subject:?} within {edits} edits"));
        let cost = m.cost().unwrap();
        assert!(cost.cost <= edits);
        assert_eq!(cost.cost, cost.num_ins + cost.num_del + cost.num_subst);
        assert!(m.end() <= subject.len());
    }
}
