//! Authorization and sequencing rules for collaboration request mutations.
//!
//! Rules are evaluated in a fixed order: party membership first, then
//! reachability in the transition table, then role restrictions. The caller
//! maps [`PolicyViolation`] onto the domain error taxonomy: role and
//! membership failures are forbidden, sequencing failures are conflicts.

use thiserror::Error;

use crate::domain::UserId;

use super::{CollabRequest, RequestStatus};

/// A rejected mutation attempt, with enough context to report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// The acting user is neither requester nor receiver.
    #[error("only participants may act on a collaboration request")]
    NotParticipant,

    /// The transition does not exist in the table.
    #[error("illegal transition {from} -> {to}")]
    IllegalTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    /// Accept and decline are reserved for the receiving party.
    #[error("only the receiver can {} the request", .attempted.as_str().to_lowercase())]
    ReceiverOnly { attempted: RequestStatus },

    /// The schedule can no longer change once the request is terminal.
    #[error("cannot reschedule a request in status {status}")]
    NotReschedulable { status: RequestStatus },
}

impl PolicyViolation {
    /// Whether the violation is a state-sequencing conflict rather than an
    /// authorization failure.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::IllegalTransition { .. } | Self::NotReschedulable { .. }
        )
    }
}

/// Check whether `actor` may move `request` to `next`.
pub fn authorize_transition(
    request: &CollabRequest,
    actor: UserId,
    next: RequestStatus,
) -> Result<(), PolicyViolation> {
    if !request.is_party(actor) {
        return Err(PolicyViolation::NotParticipant);
    }

    let from = request.status();
    if !from.can_transition_to(next) {
        return Err(PolicyViolation::IllegalTransition { from, to: next });
    }

    if matches!(next, RequestStatus::Accepted | RequestStatus::Declined)
        && actor != request.receiver_id()
    {
        return Err(PolicyViolation::ReceiverOnly { attempted: next });
    }

    // Completion is reachable only from ACCEPTED; the table guarantees this
    // today, the guard keeps the rule explicit if the table ever widens.
    if next == RequestStatus::Completed && from != RequestStatus::Accepted {
        return Err(PolicyViolation::IllegalTransition { from, to: next });
    }

    Ok(())
}

/// Check whether `actor` may change the schedule of `request`.
pub fn authorize_reschedule(
    request: &CollabRequest,
    actor: UserId,
) -> Result<(), PolicyViolation> {
    if !request.is_party(actor) {
        return Err(PolicyViolation::NotParticipant);
    }
    let status = request.status();
    if !status.allows_reschedule() {
        return Err(PolicyViolation::NotReschedulable { status });
    }
    Ok(())
}

/// Check whether `actor` may delete `request`. Deletion has no status gate.
pub fn authorize_delete(request: &CollabRequest, actor: UserId) -> Result<(), PolicyViolation> {
    if !request.is_party(actor) {
        return Err(PolicyViolation::NotParticipant);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use crate::domain::collab::{CollabRequestParts, RequestId};

    use super::RequestStatus::{Accepted, Cancelled, Completed, Declined, Pending};
    use super::*;

    const REQUESTER: UserId = UserId::new(1);
    const RECEIVER: UserId = UserId::new(2);
    const OUTSIDER: UserId = UserId::new(9);

    fn request_in(status: RequestStatus) -> CollabRequest {
        CollabRequest::new(CollabRequestParts {
            id: RequestId::new(42),
            requester_id: REQUESTER,
            receiver_id: RECEIVER,
            offered_skill_id: None,
            wanted_skill_id: None,
            status,
            message: None,
            scheduled_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .expect("valid request")
    }

    #[rstest]
    #[case::accept(Accepted)]
    #[case::decline(Declined)]
    fn receiver_can_answer_a_pending_request(#[case] next: RequestStatus) {
        let request = request_in(Pending);
        assert_eq!(authorize_transition(&request, RECEIVER, next), Ok(()));
    }

    #[rstest]
    #[case::accept(Accepted)]
    #[case::decline(Declined)]
    fn requester_cannot_answer_their_own_ask(#[case] next: RequestStatus) {
        let request = request_in(Pending);
        assert_eq!(
            authorize_transition(&request, REQUESTER, next),
            Err(PolicyViolation::ReceiverOnly { attempted: next })
        );
    }

    #[rstest]
    #[case::requester(REQUESTER)]
    #[case::receiver(RECEIVER)]
    fn either_party_can_cancel_while_live(#[case] actor: UserId) {
        for status in [Pending, Accepted] {
            let request = request_in(status);
            assert_eq!(authorize_transition(&request, actor, Cancelled), Ok(()));
        }
    }

    #[rstest]
    #[case::requester(REQUESTER)]
    #[case::receiver(RECEIVER)]
    fn either_party_can_complete_an_accepted_request(#[case] actor: UserId) {
        let request = request_in(Accepted);
        assert_eq!(authorize_transition(&request, actor, Completed), Ok(()));
    }

    #[rstest]
    fn completion_is_unreachable_from_pending() {
        let request = request_in(Pending);
        assert_eq!(
            authorize_transition(&request, RECEIVER, Completed),
            Err(PolicyViolation::IllegalTransition {
                from: Pending,
                to: Completed,
            })
        );
    }

    #[rstest]
    #[case::declined(Declined)]
    #[case::cancelled(Cancelled)]
    #[case::completed(Completed)]
    fn terminal_states_reject_every_transition(#[case] from: RequestStatus) {
        let request = request_in(from);
        for next in [Pending, Accepted, Declined, Cancelled, Completed] {
            let error = authorize_transition(&request, RECEIVER, next).expect_err("terminal");
            assert!(error.is_conflict(), "{from} -> {next} must be a conflict");
        }
    }

    #[rstest]
    fn repeating_an_illegal_transition_fails_identically() {
        let request = request_in(Accepted);
        let first = authorize_transition(&request, RECEIVER, Accepted);
        let second = authorize_transition(&request, RECEIVER, Accepted);
        assert_eq!(first, second);
        assert_eq!(
            first,
            Err(PolicyViolation::IllegalTransition {
                from: Accepted,
                to: Accepted,
            })
        );
    }

    #[rstest]
    fn outsiders_are_rejected_before_sequencing_is_considered() {
        let request = request_in(Declined);
        // An outsider attempting an illegal transition still reads as a
        // membership failure, not a conflict.
        assert_eq!(
            authorize_transition(&request, OUTSIDER, Accepted),
            Err(PolicyViolation::NotParticipant)
        );
        assert_eq!(
            authorize_reschedule(&request, OUTSIDER),
            Err(PolicyViolation::NotParticipant)
        );
        assert_eq!(
            authorize_delete(&request, OUTSIDER),
            Err(PolicyViolation::NotParticipant)
        );
    }

    #[rstest]
    #[case::pending(Pending)]
    #[case::accepted(Accepted)]
    fn reschedule_is_allowed_while_live(#[case] status: RequestStatus) {
        let request = request_in(status);
        assert_eq!(authorize_reschedule(&request, REQUESTER), Ok(()));
        assert_eq!(authorize_reschedule(&request, RECEIVER), Ok(()));
    }

    #[rstest]
    #[case::declined(Declined)]
    #[case::cancelled(Cancelled)]
    #[case::completed(Completed)]
    fn reschedule_conflicts_once_terminal(#[case] status: RequestStatus) {
        let request = request_in(status);
        assert_eq!(
            authorize_reschedule(&request, REQUESTER),
            Err(PolicyViolation::NotReschedulable { status })
        );
    }

    #[rstest]
    fn delete_is_party_gated_but_status_free() {
        for status in [Pending, Accepted, Declined, Cancelled, Completed] {
            let request = request_in(status);
            assert_eq!(authorize_delete(&request, REQUESTER), Ok(()));
            assert_eq!(authorize_delete(&request, RECEIVER), Ok(()));
        }
    }
}
