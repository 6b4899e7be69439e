use crate::modules::crm::core::state::Subscriber;
use crate::shared::infrastructure::state_store::Collections;

/// Case-insensitive match on name, unit or building; phone matches on a plain
/// substring. A blank term returns everyone.
pub fn search_subscribers(state: &Collections, term: &str) -> Vec<Subscriber> {
    let term = term.trim();
    let needle = term.to_lowercase();
    state
        .subscribers
        .iter()
        .filter(|s| {
            term.is_empty()
                || s.name.to_lowercase().contains(&needle)
                || s.unit_number.to_lowercase().contains(&needle)
                || s.building_name.to_lowercase().contains(&needle)
                || s.phone.contains(term)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod subscriber_queries_tests {
    use super::*;
    use crate::tests::fixtures::subscriber;
    use rstest::{fixture, rstest};

    #[fixture]
    fn state() -> Collections {
        let mut alice = subscriber("sub-1", "+60123456789");
        alice.name = "Alice Johnson".into();
        alice.building_name = "Horizon Residences".into();
        alice.unit_number = "A-12-05".into();
        let mut bob = subscriber("sub-2", "+60119876543");
        bob.name = "Bob Smith".into();
        bob.building_name = "Skyline Towers".into();
        bob.unit_number = "B-05-11".into();
        Collections {
            subscribers: vec![alice, bob],
            ..Collections::default()
        }
    }

    #[rstest]
    #[case("alice", vec!["sub-1"])]
    #[case("SKYLINE", vec!["sub-2"])]
    #[case("b-05", vec!["sub-2"])]
    #[case("98765", vec!["sub-2"])]
    #[case("", vec!["sub-1", "sub-2"])]
    #[case("nobody", vec![])]
    fn it_should_match_on_any_searchable_field(
        state: Collections,
        #[case] term: &str,
        #[case] expected: Vec<&str>,
    ) {
        let ids: Vec<String> = search_subscribers(&state, term)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, expected);
    }
}
