//! Fixed-delay timers tied to a widget mount.
//!
//! Widgets use the "animate, wait, then signal" pattern. Each delayed action
//! is scheduled under the mount id of the widget that requested it, and all
//! of a mount's timers are cancelled when that widget unmounts, so a late
//! timer can never reach a destroyed or replaced widget.

use std::time::{Duration, Instant};

/// Identifies one mounted widget instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    owner: MountId,
    due: Instant,
    action: T,
}

/// Pending timers, fired in due order by `drain_due`
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    timers: Vec<Timer<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer that fires `delay` after `now`
    pub fn schedule(&mut self, owner: MountId, delay: Duration, action: T, now: Instant) {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            owner,
            due: now + delay,
            action,
        });
    }

    /// Disarm every timer belonging to a mount; returns how many were dropped
    pub fn cancel_owner(&mut self, owner: MountId) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.owner != owner);
        before - self.timers.len()
    }

    /// Remove and return every timer due at `now`, earliest first
    pub fn drain_due(&mut self, now: Instant) -> Vec<(MountId, T)> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|t| t.due <= now);
        self.timers = pending;
        due.sort_by_key(|t| (t.due, t.id.0));
        due.into_iter().map(|t| (t.owner, t.action)).collect()
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    #[cfg(test)]
    pub fn pending_for(&self, owner: MountId) -> usize {
        self.timers.iter().filter(|t| t.owner == owner).count()
    }

    /// Time until the next timer is due (for sizing the poll timeout)
    pub fn next_due_in(&self, now: Instant) -> Option<Duration> {
        self.timers
            .iter()
            .map(|t| t.due.saturating_duration_since(now))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        let t0 = Instant::now();
        s.schedule(MountId(1), Duration::from_millis(500), "late", t0);
        s.schedule(MountId(1), Duration::from_millis(100), "early", t0);

        assert!(s.drain_due(t0).is_empty());
        let fired = s.drain_due(t0 + Duration::from_secs(1));
        assert_eq!(fired, vec![(MountId(1), "early"), (MountId(1), "late")]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_cancel_owner_disarms_only_that_mount() {
        let mut s = Scheduler::new();
        let t0 = Instant::now();
        s.schedule(MountId(1), Duration::from_millis(100), 'a', t0);
        s.schedule(MountId(1), Duration::from_millis(200), 'b', t0);
        s.schedule(MountId(2), Duration::from_millis(100), 'c', t0);

        assert_eq!(s.cancel_owner(MountId(1)), 2);
        assert_eq!(s.pending_for(MountId(1)), 0);
        let fired = s.drain_due(t0 + Duration::from_secs(1));
        assert_eq!(fired, vec![(MountId(2), 'c')]);
    }

    #[test]
    fn test_drained_timers_are_gone() {
        let mut s = Scheduler::new();
        let t0 = Instant::now();
        s.schedule(MountId(1), Duration::from_millis(100), (), t0);
        assert_eq!(s.drain_due(t0 + Duration::from_millis(100)).len(), 1);
        assert_eq!(s.next_due_in(t0), None);
    }

    #[test]
    fn test_next_due_in() {
        let mut s = Scheduler::new();
        let t0 = Instant::now();
        s.schedule(MountId(1), Duration::from_millis(300), (), t0);
        s.schedule(MountId(1), Duration::from_millis(100), (), t0);
        assert_eq!(s.next_due_in(t0), Some(Duration::from_millis(100)));
    }
}
