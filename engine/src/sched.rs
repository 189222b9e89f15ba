//! Deterministic event-ordering turn scheduler.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use serde::{Deserialize, Serialize};

/// An opaque representation of a time instant on the turn clock.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Serialize,
    Deserialize,
)]
pub struct Instant(pub(crate) i64);

impl std::ops::Add<i64> for Instant {
    type Output = Self;

    fn add(self, rhs: i64) -> Self::Output {
        Instant(self.0 + rhs)
    }
}

impl std::ops::AddAssign<i64> for Instant {
    fn add_assign(&mut self, rhs: i64) {
        self.0 += rhs;
    }
}

impl std::ops::Sub<Instant> for Instant {
    type Output = i64;

    fn sub(self, rhs: Instant) -> Self::Output {
        self.0 - rhs.0
    }
}

/// A scheduled turn record.
///
/// Tickets are immutable values. An entity that currently wants to act
/// holds exactly one live ticket; any other ticket for it still sitting
/// in the queue is stale and gets dropped by the consuming loop.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Ticket<T> {
    pub time: Instant,
    pub uid: u64,
    pub value: T,
    /// Queue time when the ticket was issued.
    pub issued: Instant,
}

// Ordering is by (time, uid) only. Uids are unique per queue, so the
// tie-break makes equal-time tickets dequeue in issuance order.
impl<T: Eq> Ord for Ticket<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.time, self.uid).cmp(&(other.time, other.uid))
    }
}

impl<T: Eq> PartialOrd for Ticket<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of pending turns, the authority on who acts next.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurnQueue<T: Eq> {
    time: Instant,
    next_uid: u64,
    heap: BinaryHeap<Reverse<Ticket<T>>>,
}

impl<T: Eq> Default for TurnQueue<T> {
    fn default() -> Self {
        TurnQueue {
            time: Instant::default(),
            next_uid: 0,
            heap: BinaryHeap::new(),
        }
    }
}

impl<T: Clone + Eq> TurnQueue<T> {
    /// Issue a ticket `delay` time units from now.
    ///
    /// A negative delay is a programming error.
    pub fn schedule(&mut self, delay: i64, value: T) -> Ticket<T> {
        assert!(delay >= 0, "TurnQueue::schedule: negative delay {delay}");

        let ticket = Ticket {
            time: self.time + delay,
            uid: self.next_uid,
            value,
            issued: self.time,
        };
        self.next_uid += 1;
        self.heap.push(Reverse(ticket.clone()));
        ticket
    }

    /// Return the next ticket without removing it, advancing the clock to
    /// its scheduled time. Time only moves when something is about to
    /// happen, and never backwards.
    pub fn peek(&mut self) -> Option<&Ticket<T>> {
        match self.heap.peek() {
            Some(Reverse(t)) => {
                self.time = t.time;
                Some(t)
            }
            None => None,
        }
    }

    /// Remove and return the next ticket, advancing the clock.
    pub fn pop(&mut self) -> Option<Ticket<T>> {
        let Reverse(ticket) = self.heap.pop()?;
        self.time = ticket.time;
        Some(ticket)
    }

    pub fn now(&self) -> Instant {
        self.time
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn equal_times_dequeue_in_issuance_order() {
        let mut q: TurnQueue<u32> = Default::default();
        for v in 0..5 {
            q.schedule(10, v);
        }
        let order: Vec<u32> =
            std::iter::from_fn(|| q.pop()).map(|t| t.value).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn earlier_time_wins_over_earlier_uid() {
        let mut q: TurnQueue<&str> = Default::default();
        q.schedule(20, "slow");
        q.schedule(5, "fast");
        assert_eq!(q.pop().unwrap().value, "fast");
        assert_eq!(q.pop().unwrap().value, "slow");
    }

    #[test]
    fn peek_advances_the_clock() {
        let mut q: TurnQueue<u32> = Default::default();
        q.schedule(30, 1);
        assert_eq!(q.now(), Instant(0));
        q.peek();
        assert_eq!(q.now(), Instant(30));
        // Scheduling now happens relative to the advanced clock.
        let t = q.schedule(0, 2);
        assert_eq!(t.time, Instant(30));
        assert_eq!(t.issued, Instant(30));
    }

    #[test]
    #[should_panic]
    fn negative_delay_is_rejected() {
        let mut q: TurnQueue<u32> = Default::default();
        q.schedule(-1, 1);
    }

    #[quickcheck]
    fn dequeue_order_is_time_then_fifo(delays: Vec<u8>) -> bool {
        let mut q: TurnQueue<usize> = Default::default();
        for (i, &d) in delays.iter().enumerate() {
            q.schedule(d as i64, i);
        }
        let popped: Vec<Ticket<usize>> =
            std::iter::from_fn(|| q.pop()).collect();
        popped
            .windows(2)
            .all(|w| (w[0].time, w[0].uid) < (w[1].time, w[1].uid))
    }

    #[quickcheck]
    fn clock_is_monotonic(ops: Vec<u8>) -> bool {
        let mut q: TurnQueue<u32> = Default::default();
        let mut last = q.now();
        for op in ops {
            match op % 3 {
                0 => {
                    q.schedule((op / 3) as i64, op as u32);
                }
                1 => {
                    q.peek();
                }
                _ => {
                    q.pop();
                }
            }
            if q.now() < last {
                return false;
            }
            last = q.now();
        }
        true
    }
}
