use crate::domain::entities::TimeOffStatus;
use crate::domain::errors::{CalendarError, CalendarResult};

/// Validates a time off status transition. Pending is the only state with
/// outgoing edges; approved and rejected are terminal.
pub fn validate_transition(
    time_off_id: &str,
    from: TimeOffStatus,
    to: TimeOffStatus,
) -> CalendarResult<()> {
    use TimeOffStatus::*;

    match (from, to) {
        (Pending, Approved) => Ok(()),
        (Pending, Rejected) => Ok(()),

        _ => Err(CalendarError::InvalidState {
            id: time_off_id.to_string(),
            status: from,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_to_approved_valid() {
        assert!(validate_transition("t1", TimeOffStatus::Pending, TimeOffStatus::Approved).is_ok());
    }

    #[test]
    fn test_pending_to_rejected_valid() {
        assert!(validate_transition("t1", TimeOffStatus::Pending, TimeOffStatus::Rejected).is_ok());
    }

    #[test]
    fn test_terminal_states_have_no_transitions() {
        for from in [TimeOffStatus::Approved, TimeOffStatus::Rejected] {
            for to in [
                TimeOffStatus::Pending,
                TimeOffStatus::Approved,
                TimeOffStatus::Rejected,
            ] {
                let result = validate_transition("t1", from, to);
                assert!(matches!(
                    result,
                    Err(CalendarError::InvalidState { status, .. }) if status == from
                ));
            }
        }
    }

    #[test]
    fn test_pending_to_pending_invalid() {
        assert!(validate_transition("t1", TimeOffStatus::Pending, TimeOffStatus::Pending).is_err());
    }
}
