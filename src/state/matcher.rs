//! FIFO duel queue pairing the two oldest waiting players.

use std::collections::VecDeque;

use time::OffsetDateTime;

/// Two players taken off the queue together, plus the room token scoping their duel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelPairing {
    /// Token scoping the duel's follow-up messages.
    pub room: String,
    /// Oldest entry; plays first.
    pub first: String,
    /// Player whose arrival completed the pair.
    pub second: String,
}

/// Result of offering a player to the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The player was already waiting; nothing changed.
    AlreadyQueued,
    /// The player is now waiting for an opponent.
    Waiting,
    /// The two oldest players left the queue together.
    Matched(DuelPairing),
}

/// Queue of player ids waiting for a duel. A given id appears at most once, and
/// the queue never holds more than one id once an enqueue returns.
#[derive(Debug, Default)]
pub struct DuelMatcher {
    queue: VecDeque<String>,
    last_room_stamp: Option<i64>,
}

impl DuelMatcher {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `player_id` to the tail of the queue and pair the two oldest entries once
    /// two players are waiting.
    pub fn enqueue(&mut self, player_id: &str) -> EnqueueOutcome {
        self.enqueue_at(player_id, unix_millis())
    }

    /// Same as [`DuelMatcher::enqueue`] with an explicit clock reading, in milliseconds.
    pub fn enqueue_at(&mut self, player_id: &str, now_ms: i64) -> EnqueueOutcome {
        if self.contains(player_id) {
            return EnqueueOutcome::AlreadyQueued;
        }

        // A second arrival pairs with the single waiting player straight away.
        match self.queue.pop_front() {
            Some(first) => EnqueueOutcome::Matched(DuelPairing {
                room: self.next_room_token(now_ms),
                first,
                second: player_id.to_string(),
            }),
            None => {
                self.queue.push_back(player_id.to_string());
                EnqueueOutcome::Waiting
            }
        }
    }

    /// Drop `player_id` from the queue. Returns whether it was waiting.
    pub fn remove(&mut self, player_id: &str) -> bool {
        match self.queue.iter().position(|queued| queued == player_id) {
            Some(index) => self.queue.remove(index).is_some(),
            None => false,
        }
    }

    /// Whether `player_id` is waiting.
    pub fn contains(&self, player_id: &str) -> bool {
        self.queue.iter().any(|queued| queued == player_id)
    }

    /// Number of waiting players.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Waiting player ids, oldest first.
    pub fn waiting(&self) -> Vec<String> {
        self.queue.iter().cloned().collect()
    }

    /// Timestamp-derived token, bumped past the previous one so two pairings in the
    /// same millisecond still get distinct rooms.
    fn next_room_token(&mut self, now_ms: i64) -> String {
        let stamp = match self.last_room_stamp {
            Some(last) if now_ms <= last => last + 1,
            _ => now_ms,
        };
        self.last_room_stamp = Some(stamp);
        format!("duel_{stamp}")
    }
}

fn unix_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
