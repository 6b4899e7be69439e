/// Outcome of a pure decide function: the events to record, or why nothing happens.
///
/// Each context aliases this with its own event and rejection types.
#[derive(Debug)]
pub enum Decision<E, R> {
    Accepted { events: Vec<E> },
    Rejected { reason: R },
}

impl<E, R> From<Result<Vec<E>, R>> for Decision<E, R> {
    fn from(result: Result<Vec<E>, R>) -> Self {
        match result {
            Ok(events) => Decision::Accepted { events },
            Err(reason) => Decision::Rejected { reason },
        }
    }
}

impl<E, R> Decision<E, R> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted { .. })
    }
}

#[cfg(test)]
mod decision_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_lift_results_into_decisions() {
        let accepted: Decision<u8, &str> = Ok(vec![1, 2]).into();
        let rejected: Decision<u8, &str> = Err("nope").into();
        assert!(matches!(accepted, Decision::Accepted { ref events } if events.len() == 2));
        assert!(matches!(rejected, Decision::Rejected { reason: "nope" }));
    }
}
