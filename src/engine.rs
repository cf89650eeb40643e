// 💬 Chat Engine - the per-conversation message pipeline
// parse → apply → render, one sequential pass per incoming message.
// This is the entire boundary the chat front-end relies on.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::accounts::CASH;
use crate::config::LedgerConfig;
use crate::ledger::{JournalEntry, Ledger, Transaction};
use crate::parser::{MessageParser, Parsed};
use crate::report::{self, GuidanceResponder, GuidanceSelector};

// ============================================================================
// BOUNDARY RECORD
// ============================================================================

/// What the caller gets back for one message. When `transaction` is present
/// the front-end renders a transaction card; a rejected or unrecognized
/// message carries text only.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response_text: String,
    pub transaction: Option<Transaction>,
    pub journal_entry: Option<JournalEntry>,
}

impl ChatResponse {
    fn text_only(response_text: String) -> Self {
        ChatResponse {
            response_text,
            transaction: None,
            journal_entry: None,
        }
    }
}

// ============================================================================
// CHAT ENGINE
// ============================================================================

/// One conversation's engine: its own parser, ledger, and guidance
/// responder. Owning the ledger per conversation keeps postings from
/// different conversations from ever interleaving.
pub struct ChatEngine {
    parser: MessageParser,
    ledger: Ledger,
    guidance: GuidanceResponder,
    currency: String,
}

impl ChatEngine {
    pub fn new() -> Self {
        Self::with_config(&LedgerConfig::default())
    }

    pub fn with_config(config: &LedgerConfig) -> Self {
        ChatEngine {
            parser: MessageParser::new(),
            ledger: Ledger::new(config.opening_capital, Utc::now().date_naive()),
            guidance: GuidanceResponder::new(),
            currency: config.currency.clone(),
        }
    }

    /// Replace the guidance selector, e.g. with a fixed or seeded one.
    pub fn with_selector(mut self, selector: Box<dyn GuidanceSelector>) -> Self {
        self.guidance = GuidanceResponder::with_selector(selector);
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Handle one message end to end.
    pub fn respond(&mut self, message: &str) -> ChatResponse {
        match self.parser.parse(message) {
            Parsed::Transaction(tx) => self.record(tx),
            Parsed::Report(kind) => {
                info!(?kind, "rendering report");
                ChatResponse::text_only(report::render(kind, &self.ledger, &self.currency))
            }
            Parsed::NoMatch => ChatResponse::text_only(self.guidance.respond()),
        }
    }

    fn record(&mut self, tx: Transaction) -> ChatResponse {
        match self.ledger.apply(&tx) {
            Ok(entry) => {
                info!(
                    kind = %tx.kind.label(),
                    amount = %tx.amount,
                    "transaction recorded"
                );
                let response_text = self.confirmation(&tx, &entry);
                ChatResponse {
                    response_text,
                    transaction: Some(tx),
                    journal_entry: Some(entry),
                }
            }
            Err(err) => {
                warn!(kind = %tx.kind.label(), error = %err, "transaction rejected");
                ChatResponse::text_only(format!(
                    "⚠️ I couldn't record that transaction: {}. No balances were changed.",
                    err
                ))
            }
        }
    }

    fn confirmation(&self, tx: &Transaction, entry: &JournalEntry) -> String {
        let mut out = String::from("✅ Transaction recorded!\n\n");
        out.push_str(&format!(
            "💰 Amount: {}{:.2}\n",
            self.currency, tx.amount
        ));
        out.push_str(&format!("📝 {}: {}\n", tx.kind.label(), tx.description));
        if let Some(counterparty) = &tx.counterparty {
            out.push_str(&format!("👤 Counterparty: {}\n", counterparty));
        }
        out.push_str(&format!("📅 Date: {}\n", entry.date));
        out.push_str(&format!(
            "💳 Cash balance: {}{:.2}\n",
            self.currency,
            self.ledger.registry().balance(CASH)
        ));
        out
    }
}

impl Default for ChatEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
