// 🗂️ Session Manager - one engine per conversation
// Engines are created on first use and accessed through a single lock, so
// apply calls against any one ledger are never interleaved.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::config::LedgerConfig;
use crate::engine::{ChatEngine, ChatResponse};

/// Holds the live conversations. Each session id owns its own ledger;
/// nothing is shared between conversations except this registry itself.
pub struct SessionManager {
    config: LedgerConfig,
    sessions: Mutex<HashMap<String, ChatEngine>>,
}

impl SessionManager {
    pub fn new(config: LedgerConfig) -> Self {
        SessionManager {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Route a message to its session's engine, creating the session on
    /// first contact.
    pub fn respond(&self, session_id: &str, message: &str) -> ChatResponse {
        let mut sessions = self.sessions.lock().unwrap();
        let engine = sessions.entry(session_id.to_string()).or_insert_with(|| {
            debug!(session_id, "creating session ledger");
            ChatEngine::with_config(&self.config)
        });
        engine.respond(message)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Drop a session and its ledger. Returns whether it existed.
    pub fn end_session(&self, session_id: &str) -> bool {
        self.sessions.lock().unwrap().remove(session_id).is_some()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use std::thread;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_sessions_are_isolated() {
        let manager = SessionManager::new(LedgerConfig::default());

        manager.respond("alice", "paid 25 for lunch");
        manager.respond("bob", "received 100 from client");

        let alice = manager.respond("alice", "what's my balance?");
        let bob = manager.respond("bob", "what's my balance?");

        assert!(alice.response_text.contains("$975.00"));
        assert!(bob.response_text.contains("$1100.00"));
        assert_eq!(manager.session_count(), 2);
    }

    #[test]
    fn test_end_session_discards_the_ledger() {
        let manager = SessionManager::new(LedgerConfig::default());

        manager.respond("alice", "paid 25 for lunch");
        assert!(manager.end_session("alice"));
        assert!(!manager.end_session("alice"));

        // a fresh session starts from the opening capital again
        let response = manager.respond("alice", "what's my balance?");
        assert!(response.response_text.contains("$1000.00"));
    }

    #[test]
    fn test_concurrent_messages_keep_identity() {
        let manager = Arc::new(SessionManager::new(LedgerConfig::default()));

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    for _ in 0..25 {
                        manager.respond("shared", "paid 1 for coffee");
                        manager.respond(&format!("own-{worker}"), "received 10 from client");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // 4 workers * 25 coffees against the shared session
        let shared = manager.respond("shared", "cash?");
        assert!(shared.response_text.contains("$900.00"));

        let own = manager.respond("own-0", "cash?");
        assert!(own.response_text.contains("$1250.00"));
    }

    #[test]
    fn test_balance_check_in_shared_session_after_serialized_applies() {
        let manager = SessionManager::new(LedgerConfig::default());

        manager.respond("s", "borrowed 500 from bank");
        manager.respond("s", "repaid 200 to bank");

        let report = manager.respond("s", "trial balance");
        assert!(report.response_text.contains("Debits match credits ✓"));
    }

    #[test]
    fn test_cash_balance_after_sequence() {
        let manager = SessionManager::new(LedgerConfig::default());

        manager.respond("s", "paid 25 for lunch");
        manager.respond("s", "received 100 from client");

        let response = manager.respond("s", "cash?");
        assert!(response.response_text.contains(&format!(
            "Current Cash: ${:.2}",
            dec(107_500)
        )));
    }
}
