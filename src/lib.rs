// FinanceAI Core - conversational bookkeeping engine
// Turns free-form messages into balanced double-entry journal postings and
// report snapshots. The chat front-end only ever sees ChatResponse.

pub mod accounts;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod ledger;
pub mod parser;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use accounts::{Account, AccountCategory, AccountRegistry, NormalSide};
pub use classifier::{CategoryMatcher, ExpenseCategory};
pub use config::LedgerConfig;
pub use engine::{ChatEngine, ChatResponse};
pub use ledger::{
    JournalEntry, Ledger, LedgerError, Posting, Transaction, TransactionKind,
};
pub use parser::{MessageParser, Parsed, ReportKind};
pub use report::{FixedSelector, GuidanceResponder, GuidanceSelector, SeededSelector};
pub use session::SessionManager;

use std::sync::Once;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("financeai_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}
