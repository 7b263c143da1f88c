use tracing::{debug, warn};

use crate::ids::IdGenerator;

/// The session token correlating this widget's requests with one backend
/// conversation. Exactly one value is active; replaced values are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIdentity {
    token: String,
}

impl SessionIdentity {
    /// An identity that has not been initialised yet; [`current`](Self::current) is empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the token. Only the first call has an effect.
    pub fn initialize(&mut self, ids: &impl IdGenerator) {
        if self.is_initialized() {
            warn!("Session identity already initialised; keeping {}", self.token);
            return;
        }
        self.token = ids.next_id();
        debug!("Session identity initialised: {}", self.token);
    }

    pub fn current(&self) -> &str {
        &self.token
    }

    pub fn is_initialized(&self) -> bool {
        !self.token.is_empty()
    }

    /// Takes over a token handed back by the backend. Returns whether the
    /// active token changed.
    pub fn adopt(&mut self, new_token: &str) -> bool {
        if new_token.is_empty() || new_token == self.token {
            return false;
        }
        debug!("Session token rotated: {} -> {new_token}", self.token);
        self.token = new_token.to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counter(Cell<u32>);

    impl IdGenerator for Counter {
        fn next_id(&self) -> String {
            self.0.set(self.0.get() + 1);
            format!("session-{}", self.0.get())
        }
    }

    #[test]
    fn empty_until_initialised() {
        let mut identity = SessionIdentity::new();
        assert_eq!(identity.current(), "");
        assert!(!identity.is_initialized());

        identity.initialize(&Counter(Cell::new(0)));
        assert_eq!(identity.current(), "session-1");
    }

    #[test]
    fn second_initialise_keeps_the_first_token() {
        let ids = Counter(Cell::new(0));
        let mut identity = SessionIdentity::new();
        identity.initialize(&ids);
        identity.initialize(&ids);
        assert_eq!(identity.current(), "session-1");
    }

    #[test]
    fn adopt_replaces_only_with_a_new_non_empty_token() {
        let mut identity = SessionIdentity::new();
        identity.initialize(&Counter(Cell::new(0)));

        assert!(!identity.adopt(""));
        assert_eq!(identity.current(), "session-1");

        assert!(identity.adopt("abc"));
        assert_eq!(identity.current(), "abc");

        assert!(!identity.adopt("abc"));
        assert_eq!(identity.current(), "abc");
    }
}
