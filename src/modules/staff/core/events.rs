use crate::modules::staff::core::state::{AttendanceRecord, Engineer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffEvent {
    /// `attendance` is None when a session was already open.
    SignedIn {
        engineer: Engineer,
        attendance: Option<AttendanceRecord>,
    },
    /// `attendance` is the closed session, if one was open.
    SignedOut {
        engineer: Engineer,
        attendance: Option<AttendanceRecord>,
    },
    ShiftToggled {
        engineer: Engineer,
    },
}

impl StaffEvent {
    pub fn engineer(&self) -> &Engineer {
        match self {
            StaffEvent::SignedIn { engineer, .. }
            | StaffEvent::SignedOut { engineer, .. }
            | StaffEvent::ShiftToggled { engineer } => engineer,
        }
    }

    pub fn attendance(&self) -> Option<&AttendanceRecord> {
        match self {
            StaffEvent::SignedIn { attendance, .. } | StaffEvent::SignedOut { attendance, .. } => {
                attendance.as_ref()
            }
            StaffEvent::ShiftToggled { .. } => None,
        }
    }
}
