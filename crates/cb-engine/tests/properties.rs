//! Invariants that must hold for any sequence of player moves.

use cb_core::{Casebook, Consequences};
use cb_engine::{EngineConfig, EngineError, Rejection, Session};
use proptest::prelude::*;

const LOCATIONS: &str = include_str!("../../../demos/ember/locations.json");
const CASE: &str = include_str!("../../../demos/ember/caseIntro.json");

const ADDRESSES: [&str; 8] = [
    "22 NW", "35 NW", "44 NW", "46 NW", "68 WC", "73 NW", "12 E", "1 ZZ",
];

#[derive(Debug, Clone)]
enum Move {
    Visit(usize),
    Act(usize),
    Hint(char),
    Leave,
}

fn moves() -> impl Strategy<Value = Vec<Move>> {
    let one = prop_oneof![
        (0..ADDRESSES.len()).prop_map(Move::Visit),
        (0_usize..8).prop_map(Move::Act),
        prop::sample::select(vec!['C', 'F', 'G', 'T']).prop_map(Move::Hint),
        Just(Move::Leave),
    ];
    prop::collection::vec(one, 1..40)
}

fn session() -> Session {
    let book = Casebook::from_json(LOCATIONS, CASE).expect("demo case loads");
    Session::new(book, EngineConfig::default())
}

/// Every dispatchable id currently on offer, choices included.
fn offered_ids(session: &Session) -> Vec<String> {
    session
        .actions()
        .iter()
        .flat_map(|view| {
            if view.is_group() {
                view.choices.iter().map(|c| c.id.clone()).collect()
            } else {
                vec![view.id.clone()]
            }
        })
        .collect()
}

fn play(session: &mut Session, step: &Move) -> Option<Result<(), EngineError>> {
    let outcome = match step {
        Move::Visit(i) => session.visit(ADDRESSES[*i]).map(|_| ()),
        Move::Act(i) => {
            let ids = offered_ids(session);
            if ids.is_empty() {
                return None;
            }
            let id = ids[*i % ids.len()].clone();
            session.act(&id).map(|_| ())
        }
        Move::Hint(letter) => session
            .act_with(&format!("hint_{letter}"), &Consequences::new())
            .map(|_| ()),
        Move::Leave => {
            session.introduction();
            Ok(())
        }
    };
    Some(outcome)
}

proptest! {
    #[test]
    fn leads_never_decrease(steps in moves()) {
        let mut s = session();
        let mut last = 0;
        for step in &steps {
            play(&mut s, step);
            prop_assert!(s.state().leads() >= last);
            last = s.state().leads();
        }
    }

    #[test]
    fn visits_count_one_lead_for_new_paid_addresses(steps in moves()) {
        let mut s = session();
        for step in &steps {
            let before = s.state().leads();
            let expected = match step {
                Move::Visit(i) => {
                    let address = ADDRESSES[*i];
                    let counts =
                        !s.state().has_visited(address) && !s.config().is_free_lead(address);
                    Some(u32::from(counts))
                }
                _ => None,
            };
            let outcome = play(&mut s, step);
            let Some(expected) = expected else {
                continue;
            };
            let delta = s.state().leads() - before;
            match outcome {
                Some(Ok(())) => prop_assert_eq!(delta, expected),
                _ => prop_assert_eq!(delta, 0),
            }
        }
    }

    #[test]
    fn letters_and_locks_are_permanent(steps in moves()) {
        let mut s = session();
        for step in &steps {
            let letters: Vec<_> = s.state().letters().collect();
            let locked: Vec<_> = s.state().locked().cloned().collect();
            play(&mut s, step);
            for letter in letters {
                prop_assert!(s.state().has_letter(letter));
            }
            for address in locked {
                prop_assert!(s.state().is_locked(address.as_str()));
            }
        }
    }

    #[test]
    fn locked_addresses_are_never_entered(steps in moves()) {
        let mut s = session();
        for step in &steps {
            let was_locked = match step {
                Move::Visit(i) => s.state().is_locked(ADDRESSES[*i]),
                _ => false,
            };
            let visits_before = s.state().visit_count();
            let outcome = play(&mut s, step);
            if was_locked {
                let rejected = matches!(
                    outcome,
                    Some(Err(EngineError::Rejected(Rejection::LocationLocked(_))))
                );
                prop_assert!(rejected);
                prop_assert_eq!(s.state().visit_count(), visits_before);
            }
        }
    }

    #[test]
    fn failed_moves_leave_state_untouched(steps in moves()) {
        let mut s = session();
        for step in &steps {
            let before = s.state().clone();
            if let Some(Err(_)) = play(&mut s, step) {
                prop_assert_eq!(s.state(), &before);
            }
        }
    }
}
