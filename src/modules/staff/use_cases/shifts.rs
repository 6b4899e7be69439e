// Sign in, sign out and the on-shift flag.
//
// Sign in opens an attendance session dated by the local calendar day unless
// one is already open. Sign out closes it with total and overtime minutes.

use crate::modules::staff::core::decision::{DecideError, Decision};
use crate::modules::staff::core::events::StaffEvent;
use crate::modules::staff::core::shift_policy::BusinessHours;
use crate::modules::staff::core::state::{AttendanceRecord, Engineer};
use crate::shared::core::primitives::{Stamp, local_date};
use crate::shared::infrastructure::state_store::Collections;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub engineer_id: String,
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOut {
    pub engineer_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleShift {
    pub engineer_id: String,
}

fn roster_entry(state: &Collections, engineer_id: &str) -> Result<Engineer, DecideError> {
    state
        .engineer(engineer_id)
        .cloned()
        .ok_or_else(|| DecideError::UnknownEngineer(engineer_id.to_string()))
}

pub fn decide_sign_in(
    state: &Collections,
    command: SignIn,
    shared_secret: &str,
    hours: &BusinessHours,
    stamp: &Stamp<'_>,
) -> Decision {
    try_sign_in(state, command, shared_secret, hours, stamp).into()
}

fn try_sign_in(
    state: &Collections,
    command: SignIn,
    shared_secret: &str,
    hours: &BusinessHours,
    stamp: &Stamp<'_>,
) -> Result<Vec<StaffEvent>, DecideError> {
    let mut engineer = roster_entry(state, &command.engineer_id)?;
    if command.secret != shared_secret {
        return Err(DecideError::InvalidCredentials);
    }
    engineer.last_login = Some(stamp.now);
    engineer.is_on_shift = true;

    let attendance = match state.open_attendance_for(&engineer.id) {
        Some(_) => None,
        None => Some(AttendanceRecord {
            id: stamp.id("att"),
            engineer_id: engineer.id.clone(),
            engineer_name: engineer.name.clone(),
            date: local_date(stamp.now, hours.offset)
                .map(|date| date.to_string())
                .unwrap_or_default(),
            login_time: stamp.now,
            logout_time: None,
            total_minutes: None,
            overtime_minutes: None,
        }),
    };
    Ok(vec![StaffEvent::SignedIn {
        engineer,
        attendance,
    }])
}

pub fn decide_sign_out(
    state: &Collections,
    command: SignOut,
    hours: &BusinessHours,
    stamp: &Stamp<'_>,
) -> Decision {
    try_sign_out(state, command, hours, stamp).into()
}

fn try_sign_out(
    state: &Collections,
    command: SignOut,
    hours: &BusinessHours,
    stamp: &Stamp<'_>,
) -> Result<Vec<StaffEvent>, DecideError> {
    let mut engineer = roster_entry(state, &command.engineer_id)?;
    engineer.last_logout = Some(stamp.now);
    engineer.is_on_shift = false;

    let attendance = state.open_attendance_for(&engineer.id).map(|open| {
        let mut closed = open.clone();
        let logout = stamp.now.max(open.login_time);
        closed.logout_time = Some(logout);
        closed.total_minutes = Some(BusinessHours::total_minutes(open.login_time, logout));
        closed.overtime_minutes = Some(hours.overtime_minutes(open.login_time, logout));
        closed
    });
    Ok(vec![StaffEvent::SignedOut {
        engineer,
        attendance,
    }])
}

pub fn decide_toggle_shift(state: &Collections, command: ToggleShift) -> Decision {
    try_toggle_shift(state, command).into()
}

fn try_toggle_shift(
    state: &Collections,
    command: ToggleShift,
) -> Result<Vec<StaffEvent>, DecideError> {
    let mut engineer = roster_entry(state, &command.engineer_id)?;
    engineer.is_on_shift = !engineer.is_on_shift;
    Ok(vec![StaffEvent::ShiftToggled { engineer }])
}

#[cfg(test)]
mod shifts_decide_tests {
    use super::*;
    use crate::modules::staff::core::projections::apply;
    use crate::shared::core::primitives::{MILLIS_PER_MINUTE, SequentialIds};
    use crate::shared::infrastructure::state_store::apply_mutations;
    use crate::tests::fixtures::{NOW, roster_state};
    use rstest::{fixture, rstest};

    const SECRET: &str = "password123";

    #[fixture]
    fn hours() -> BusinessHours {
        BusinessHours::default()
    }

    fn accept(state: &mut Collections, decision: Decision) -> StaffEvent {
        match decision {
            Decision::Accepted { mut events } => {
                apply_mutations(state, events.iter().flat_map(apply).collect());
                events.remove(0)
            }
            Decision::Rejected { reason } => panic!("expected Accepted, got {reason}"),
        }
    }

    fn sign_in() -> SignIn {
        SignIn {
            engineer_id: "eng-1".into(),
            secret: SECRET.into(),
        }
    }

    #[rstest]
    fn it_should_open_one_session_per_sign_in(hours: BusinessHours) {
        let ids = SequentialIds::new();
        let mut state = roster_state();
        let decision = decide_sign_in(&state, sign_in(), SECRET, &hours, &Stamp::new(NOW, &ids));
        let first = accept(&mut state, decision);
        assert!(first.engineer().is_on_shift);
        assert_eq!(first.engineer().last_login, Some(NOW));
        assert_eq!(first.attendance().unwrap().date, "2024-03-04");

        let decision = decide_sign_in(&state, sign_in(), SECRET, &hours, &Stamp::new(NOW + 1, &ids));
        let second = accept(&mut state, decision);
        assert!(second.attendance().is_none());
        assert_eq!(state.attendance.len(), 1);
    }

    #[rstest]
    fn it_should_reject_a_wrong_secret(hours: BusinessHours) {
        let ids = SequentialIds::new();
        let mut command = sign_in();
        command.secret = "guess".into();
        assert!(matches!(
            decide_sign_in(&roster_state(), command, SECRET, &hours, &Stamp::new(NOW, &ids)),
            Decision::Rejected {
                reason: DecideError::InvalidCredentials
            }
        ));
    }

    #[rstest]
    fn it_should_close_the_session_with_overtime(hours: BusinessHours) {
        let ids = SequentialIds::new();
        let mut state = roster_state();
        // NOW is 10:00 UTC; sign out at 21:30 gives 90 minutes past 20:00.
        let decision = decide_sign_in(&state, sign_in(), SECRET, &hours, &Stamp::new(NOW, &ids));
        accept(&mut state, decision);
        let logout = NOW + (11 * 60 + 30) * MILLIS_PER_MINUTE;
        let decision = decide_sign_out(
            &state,
            SignOut {
                engineer_id: "eng-1".into(),
            },
            &hours,
            &Stamp::new(logout, &ids),
        );
        let event = accept(&mut state, decision);
        assert!(!event.engineer().is_on_shift);
        assert_eq!(event.engineer().last_logout, Some(logout));
        let record = event.attendance().unwrap();
        assert_eq!(record.total_minutes, Some(690));
        assert_eq!(record.overtime_minutes, Some(90));
        assert!(state.open_attendance_for("eng-1").is_none());
    }

    #[rstest]
    fn it_should_sign_out_without_an_open_session(hours: BusinessHours) {
        let ids = SequentialIds::new();
        let mut state = roster_state();
        let decision = decide_sign_out(
            &state,
            SignOut {
                engineer_id: "eng-1".into(),
            },
            &hours,
            &Stamp::new(NOW, &ids),
        );
        let event = accept(&mut state, decision);
        assert!(event.attendance().is_none());
    }

    #[rstest]
    fn it_should_flip_the_shift_flag() {
        let state = roster_state();
        let before = state.engineer("eng-1").unwrap().is_on_shift;
        match decide_toggle_shift(
            &state,
            ToggleShift {
                engineer_id: "eng-1".into(),
            },
        ) {
            Decision::Accepted { events } => assert_eq!(events[0].engineer().is_on_shift, !before),
            Decision::Rejected { reason } => panic!("expected Accepted, got {reason}"),
        }
    }
}
