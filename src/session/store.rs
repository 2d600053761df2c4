use std::collections::{HashMap, VecDeque};
use tracing::debug;

use crate::error::InvalidStateError;
use crate::session::models::{SessionState, UserId};

/// Per-user session states plus the FIFO waiting queue.
///
/// Invariants:
/// - a user is in `queue` iff their state is `Waiting`;
/// - pairing is symmetric and disjoint.
///
/// The store does no locking of its own. Callers wrap it in a single mutex
/// so compound read-then-write sequences stay atomic.
#[derive(Debug, Default)]
pub struct SessionStore {
    states: HashMap<UserId, SessionState>,
    queue: VecDeque<UserId>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user on first interaction. Existing entries are untouched.
    pub fn touch(&mut self, user: UserId) {
        self.states.entry(user).or_default();
    }

    pub fn state_of(&self, user: UserId) -> SessionState {
        self.states.get(&user).copied().unwrap_or_default()
    }

    pub fn is_paired(&self, user: UserId) -> bool {
        self.partner_of(user).is_some()
    }

    pub fn partner_of(&self, user: UserId) -> Option<UserId> {
        self.state_of(user).partner()
    }

    /// Puts the user at the tail of the queue. Re-enqueuing a waiting user
    /// is a no-op.
    pub fn enqueue(&mut self, user: UserId) -> Result<(), InvalidStateError> {
        match self.state_of(user) {
            SessionState::Paired { .. } => Err(InvalidStateError::AlreadyPaired(user)),
            SessionState::Waiting if self.queue.contains(&user) => Ok(()),
            _ => {
                self.queue.push_back(user);
                self.states.insert(user, SessionState::Waiting);
                debug!("User {} enqueued ({} waiting)", user, self.queue.len());
                Ok(())
            }
        }
    }

    /// Pops the head of the queue. The popped user's state is left as is.
    pub fn dequeue_front(&mut self) -> Option<UserId> {
        self.queue.pop_front()
    }

    pub fn remove_from_queue(&mut self, user: UserId) {
        if let Some(pos) = self.queue.iter().position(|queued| *queued == user) {
            self.queue.remove(pos);
            debug!("User {} removed from queue", user);
        }
        if self.state_of(user) == SessionState::Waiting {
            self.states.insert(user, SessionState::Idle);
        }
    }

    pub fn pair(&mut self, a: UserId, b: UserId) -> Result<(), InvalidStateError> {
        if a == b {
            return Err(InvalidStateError::SelfPairing(a));
        }
        for user in [a, b] {
            if self.is_paired(user) {
                return Err(InvalidStateError::AlreadyPaired(user));
            }
        }

        self.queue.retain(|queued| *queued != a && *queued != b);
        self.states.insert(a, SessionState::Paired { partner: b });
        self.states.insert(b, SessionState::Paired { partner: a });
        debug!("Paired users {} and {}", a, b);
        Ok(())
    }

    /// Dissolves the user's pair, returning the former partner.
    pub fn unpair(&mut self, user: UserId) -> Option<UserId> {
        let partner = self.partner_of(user)?;
        self.states.insert(user, SessionState::Idle);
        if self.partner_of(partner) == Some(user) {
            self.states.insert(partner, SessionState::Idle);
        }
        debug!("Unpaired users {} and {}", user, partner);
        Some(partner)
    }

    /// Pairs `user` with the longest-waiting user, or queues them when
    /// nobody else is waiting. Returns the new partner, if any.
    ///
    /// Entries whose user is no longer `Waiting` are dropped on the way.
    pub fn pair_with_next(&mut self, user: UserId) -> Result<Option<UserId>, InvalidStateError> {
        if self.is_paired(user) {
            return Err(InvalidStateError::AlreadyPaired(user));
        }

        while let Some(candidate) = self.dequeue_front() {
            if candidate == user {
                continue;
            }
            if self.state_of(candidate) != SessionState::Waiting {
                debug!("Dropping stale queue entry {}", candidate);
                continue;
            }
            self.pair(user, candidate)?;
            return Ok(Some(candidate));
        }

        self.enqueue(user)?;
        Ok(None)
    }

    pub fn waiting_count(&self) -> usize {
        self.queue.len()
    }

    /// Number of active pairs (not paired users).
    pub fn pair_count(&self) -> usize {
        self.states
            .values()
            .filter(|state| matches!(state, SessionState::Paired { .. }))
            .count()
            / 2
    }

    pub fn known_users(&self) -> usize {
        self.states.len()
    }

    pub fn queued_users(&self) -> Vec<UserId> {
        self.queue.iter().copied().collect()
    }

    /// Checks every structural invariant, describing the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for user in &self.queue {
            if !seen.insert(*user) {
                return Err(format!("user {} queued twice", user));
            }
            if self.state_of(*user) != SessionState::Waiting {
                return Err(format!("queued user {} is {:?}", user, self.state_of(*user)));
            }
        }

        for (user, state) in &self.states {
            match state {
                SessionState::Waiting if !seen.contains(user) => {
                    return Err(format!("waiting user {} is not queued", user));
                }
                SessionState::Paired { partner } => {
                    if partner == user {
                        return Err(format!("user {} paired with themselves", user));
                    }
                    if self.partner_of(*partner) != Some(*user) {
                        return Err(format!("pairing {} -> {} is not symmetric", user, partner));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: UserId = UserId(1);
    const B: UserId = UserId(2);
    const C: UserId = UserId(3);

    #[test]
    fn test_unknown_user_is_idle() {
        let store = SessionStore::new();
        assert_eq!(store.state_of(UserId(404)), SessionState::Idle);
        assert!(!store.is_paired(UserId(404)));
        assert_eq!(store.partner_of(UserId(404)), None);
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let mut store = SessionStore::new();
        store.enqueue(A).unwrap();
        store.enqueue(A).unwrap();
        store.enqueue(B).unwrap();

        assert_eq!(store.queued_users(), vec![A, B]);
        assert_eq!(store.state_of(A), SessionState::Waiting);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_enqueue_paired_user_fails() {
        let mut store = SessionStore::new();
        store.pair(A, B).unwrap();
        assert_eq!(store.enqueue(A), Err(InvalidStateError::AlreadyPaired(A)));
        assert_eq!(store.waiting_count(), 0);
    }

    #[test]
    fn test_dequeue_is_fifo() {
        let mut store = SessionStore::new();
        store.enqueue(C).unwrap();
        store.enqueue(A).unwrap();
        store.enqueue(B).unwrap();

        assert_eq!(store.dequeue_front(), Some(C));
        assert_eq!(store.dequeue_front(), Some(A));
        assert_eq!(store.dequeue_front(), Some(B));
        assert_eq!(store.dequeue_front(), None);
    }

    #[test]
    fn test_remove_from_queue() {
        let mut store = SessionStore::new();
        store.enqueue(A).unwrap();
        store.enqueue(B).unwrap();

        store.remove_from_queue(A);
        assert_eq!(store.queued_users(), vec![B]);
        assert_eq!(store.state_of(A), SessionState::Idle);

        // absent user is a no-op
        store.remove_from_queue(C);
        assert_eq!(store.queued_users(), vec![B]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_pair_then_unpair_round_trip() {
        let mut store = SessionStore::new();
        store.pair(A, B).unwrap();

        assert_eq!(store.partner_of(A), Some(B));
        assert_eq!(store.partner_of(B), Some(A));
        assert_eq!(store.pair_count(), 1);
        store.check_invariants().unwrap();

        assert_eq!(store.unpair(A), Some(B));
        assert_eq!(store.state_of(A), SessionState::Idle);
        assert_eq!(store.state_of(B), SessionState::Idle);
        assert_eq!(store.pair_count(), 0);
    }

    #[test]
    fn test_pair_removes_waiting_users_from_queue() {
        let mut store = SessionStore::new();
        store.enqueue(A).unwrap();
        store.enqueue(B).unwrap();
        store.enqueue(C).unwrap();

        store.pair(C, A).unwrap();
        assert_eq!(store.queued_users(), vec![B]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_pair_rejects_invalid_requests() {
        let mut store = SessionStore::new();
        assert_eq!(store.pair(A, A), Err(InvalidStateError::SelfPairing(A)));

        store.pair(A, B).unwrap();
        assert_eq!(store.pair(C, A), Err(InvalidStateError::AlreadyPaired(A)));
        assert_eq!(store.pair(B, C), Err(InvalidStateError::AlreadyPaired(B)));
        assert_eq!(store.partner_of(A), Some(B));
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_unpair_idle_user_is_noop() {
        let mut store = SessionStore::new();
        store.touch(A);
        assert_eq!(store.unpair(A), None);
        assert_eq!(store.state_of(A), SessionState::Idle);
        assert_eq!(store.known_users(), 1);
    }

    #[test]
    fn test_pair_with_next_takes_longest_waiting() {
        let mut store = SessionStore::new();
        assert_eq!(store.pair_with_next(A), Ok(None));
        assert_eq!(store.pair_with_next(B), Ok(Some(A)));
        assert_eq!(store.pair_with_next(C), Ok(None));
        assert_eq!(store.pair_with_next(A), Err(InvalidStateError::AlreadyPaired(A)));

        assert_eq!(store.partner_of(B), Some(A));
        assert_eq!(store.queued_users(), vec![C]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_pair_with_next_skips_stale_entries() {
        let mut store = SessionStore::new();
        let d = UserId(4);
        store.pair(A, B).unwrap();
        store.touch(C);
        // entries left behind for a paired and an idle user
        store.queue.push_back(A);
        store.queue.push_back(C);
        store.enqueue(d).unwrap();

        assert_eq!(store.pair_with_next(UserId(5)), Ok(Some(d)));
        assert_eq!(store.partner_of(A), Some(B));
        assert_eq!(store.state_of(C), SessionState::Idle);
        assert!(store.queued_users().is_empty());
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_pair_with_next_skips_own_entry() {
        let mut store = SessionStore::new();
        store.enqueue(A).unwrap();

        assert_eq!(store.pair_with_next(A), Ok(None));
        assert_eq!(store.queued_users(), vec![A]);
        store.check_invariants().unwrap();
    }
}
