//! Session identity and display counter context.
//!
//! One `Session` exists per process. The identifier is generated before
//! scheduling starts and never changes; the display counter is set once at
//! bootstrap completion and advanced only when a locally numbered row is
//! rendered.

use uuid::Uuid;

/// Context for one running agent instance.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    next_sequence: u64,
}

impl Session {
    /// Create a session with a freshly generated identifier.
    ///
    /// The identifier is a random RFC 4122 version-4 UUID. Generation cannot
    /// fail and happens exactly once per session.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            next_sequence: 1,
        }
    }

    /// The session identifier, stable for the process lifetime.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The sequence number the next locally numbered row will receive.
    pub fn current_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Claim the next local sequence number.
    ///
    /// The counter is advisory: it numbers rows that have no store-assigned
    /// identifier yet and is not unique across sessions.
    pub fn take_sequence(&mut self) -> u64 {
        let seq = self.next_sequence;
        self.next_sequence += 1;
        seq
    }

    /// Reset the counter, used once after bootstrap to continue numbering
    /// after the loaded rows.
    pub fn reset_sequence(&mut self, next: u64) {
        self.next_sequence = next;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use uuid::{Variant, Version};

    #[test]
    fn session_id_is_rfc4122_v4() {
        for _ in 0..64 {
            let session = Session::new();
            assert_eq!(session.id().get_version(), Some(Version::Random));
            assert_eq!(session.id().get_variant(), Variant::RFC4122);
        }
    }

    #[test]
    fn session_ids_are_distinct() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn sequence_starts_at_one_and_advances() {
        let mut session = Session::new();
        assert_eq!(session.take_sequence(), 1);
        assert_eq!(session.take_sequence(), 2);
        assert_eq!(session.current_sequence(), 3);
    }

    #[test]
    fn reset_continues_after_loaded_rows() {
        let mut session = Session::new();
        session.reset_sequence(4);
        assert_eq!(session.take_sequence(), 4);
    }
}
