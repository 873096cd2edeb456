//! Submit gate: hands out request tickets and decides whether a settling
//! response may still be applied to page state.

use edupanel_config::OverlapPolicy;

/// Identifies one in-flight request. Consumed when the request settles.
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct SubmitGate {
    policy: OverlapPolicy,
    issued: u64,
    in_flight: usize,
}

impl SubmitGate {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self { policy, issued: 0, in_flight: 0 }
    }

    /// True between a submit and the settling of every request it started.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Issue a ticket, or `None` when the policy forbids overlapping requests.
    pub fn try_begin(&mut self) -> Option<Ticket> {
        if self.policy == OverlapPolicy::RejectWhilePending && self.in_flight > 0 {
            return None;
        }
        self.issued += 1;
        self.in_flight += 1;
        Some(Ticket(self.issued))
    }

    /// Release a ticket. Returns whether its response should be applied.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        match self.policy {
            OverlapPolicy::RejectWhilePending => true,
            OverlapPolicy::LatestWins => ticket.0 == self.issued,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_policy_blocks_second_submit() {
        let mut gate = SubmitGate::new(OverlapPolicy::RejectWhilePending);
        let first = gate.try_begin().unwrap();
        assert!(gate.is_loading());
        assert!(gate.try_begin().is_none());

        assert!(gate.finish(first));
        assert!(!gate.is_loading());
        assert!(gate.try_begin().is_some());
    }

    #[test]
    fn test_latest_wins_discards_stale_ticket() {
        let mut gate = SubmitGate::new(OverlapPolicy::LatestWins);
        let first = gate.try_begin().unwrap();
        let second = gate.try_begin().unwrap();
        assert_eq!(second.id(), first.id() + 1);

        // second settles first: applied, but the first is still in flight
        assert!(gate.finish(second));
        assert!(gate.is_loading());

        assert!(!gate.finish(first));
        assert!(!gate.is_loading());
    }

    #[test]
    fn test_latest_wins_applies_in_order_completion() {
        let mut gate = SubmitGate::new(OverlapPolicy::LatestWins);
        let only = gate.try_begin().unwrap();
        assert!(gate.finish(only));
        let next = gate.try_begin().unwrap();
        assert!(gate.finish(next));
    }
}
