// ⚖️ Ledger Engine - double-entry postings over the account registry
// Every applied transaction becomes one journal entry of exactly two
// postings, debits equal to credits, committed atomically or not at all.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::accounts::{
    AccountCategory, AccountRegistry, CASH, EQUIPMENT, GENERAL_INCOME, LOANS, OWNER_CAPITAL,
};
use crate::classifier::ExpenseCategory;

/// Absolute tolerance for balance comparisons (one cent).
pub fn balance_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

// ============================================================================
// TRANSACTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Expense(ExpenseCategory),
    Income,
    LoanReceived,
    LoanRepayment,
    AssetPurchase,
}

impl TransactionKind {
    /// Human-readable label, e.g. "Expense (Food)".
    pub fn label(&self) -> String {
        match self {
            TransactionKind::Expense(category) => format!("Expense ({})", category.as_str()),
            TransactionKind::Income => "Income".to_string(),
            TransactionKind::LoanReceived => "Loan received".to_string(),
            TransactionKind::LoanRepayment => "Loan repayment".to_string(),
            TransactionKind::AssetPurchase => "Asset purchase".to_string(),
        }
    }
}

/// A classified transaction produced by the parser. Immutable once built;
/// applied to the ledger exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub counterparty: Option<String>,
    pub description: String,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        counterparty: Option<String>,
        description: String,
        date: NaiveDate,
    ) -> Self {
        Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            amount,
            counterparty,
            description,
            date,
        }
    }
}

// ============================================================================
// POSTINGS AND JOURNAL ENTRIES
// ============================================================================

/// One debit or credit line against a single account.
/// Exactly one of `debit`/`credit` is non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub account_name: String,
    pub account_category: AccountCategory,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl Posting {
    fn debit(account_name: &str, account_category: AccountCategory, amount: Decimal) -> Self {
        Posting {
            account_name: account_name.to_string(),
            account_category,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    fn credit(account_name: &str, account_category: AccountCategory, amount: Decimal) -> Self {
        Posting {
            account_name: account_name.to_string(),
            account_category,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }

    pub fn is_debit(&self) -> bool {
        !self.debit.is_zero()
    }
}

/// The paired postings recorded for one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub description: String,
    pub postings: [Posting; 2],
}

impl JournalEntry {
    pub fn total_debits(&self) -> Decimal {
        self.postings.iter().map(|p| p.debit).sum()
    }

    pub fn total_credits(&self) -> Decimal {
        self.postings.iter().map(|p| p.credit).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount must be positive, got {0}")]
    AmountNotPositive(Decimal),

    #[error("repayment of {repayment} exceeds outstanding loans of {outstanding}")]
    OverRepayment {
        repayment: Decimal,
        outstanding: Decimal,
    },

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error(
        "accounting identity violated after posting: assets {assets}, \
         liabilities {liabilities}, equity {equity}"
    )]
    InvariantViolation {
        assets: Decimal,
        liabilities: Decimal,
        equity: Decimal,
    },
}

// ============================================================================
// LEDGER
// ============================================================================

/// The bookkeeping state for one conversation: the account registry plus an
/// append-only journal of every entry posted into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    registry: AccountRegistry,
    journal: Vec<JournalEntry>,
}

impl Ledger {
    /// Create a ledger with the fixed chart of accounts and post the opening
    /// capital (Cash debit, Owner's Capital credit) so the accounting
    /// identity holds before the first message arrives.
    pub fn new(opening_capital: Decimal, opening_date: NaiveDate) -> Self {
        let mut ledger = Ledger {
            registry: AccountRegistry::new(),
            journal: Vec::new(),
        };

        if opening_capital > Decimal::ZERO {
            let amount = opening_capital.round_dp(2);
            let entry = JournalEntry {
                date: opening_date,
                description: "Opening balance".to_string(),
                postings: [
                    Posting::debit(CASH, AccountCategory::Asset, amount),
                    Posting::credit(OWNER_CAPITAL, AccountCategory::Equity, amount),
                ],
            };
            ledger.commit(&entry);
        }

        ledger
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    /// Append-only audit trail of every committed entry.
    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    pub fn last_entry(&self) -> Option<&JournalEntry> {
        self.journal.last()
    }

    // ------------------------------------------------------------------------
    // Aggregates (always derived from account balances, never cached)
    // ------------------------------------------------------------------------

    pub fn total_assets(&self) -> Decimal {
        self.registry.category_total(AccountCategory::Asset)
    }

    pub fn total_liabilities(&self) -> Decimal {
        self.registry.category_total(AccountCategory::Liability)
    }

    pub fn total_equity(&self) -> Decimal {
        self.registry.category_total(AccountCategory::Equity)
    }

    pub fn total_income(&self) -> Decimal {
        self.registry.category_total(AccountCategory::Income)
    }

    pub fn total_expenses(&self) -> Decimal {
        self.registry.category_total(AccountCategory::Expense)
    }

    pub fn net_income(&self) -> Decimal {
        self.total_income() - self.total_expenses()
    }

    /// Equity including current-period earnings. This is the equity figure
    /// the accounting identity is checked against while income and expense
    /// accounts are still open.
    pub fn equity_with_earnings(&self) -> Decimal {
        self.total_equity() + self.net_income()
    }

    /// Assets minus (liabilities + equity + earnings). Zero when the books
    /// balance exactly.
    pub fn identity_gap(&self) -> Decimal {
        self.total_assets() - self.total_liabilities() - self.equity_with_earnings()
    }

    /// Fundamental accounting identity, within one cent.
    pub fn identity_holds(&self) -> bool {
        self.identity_gap().abs() <= balance_tolerance()
    }

    // ------------------------------------------------------------------------
    // Apply
    // ------------------------------------------------------------------------

    /// Post a classified transaction as a balanced journal entry.
    ///
    /// Both postings are applied atomically: if the identity check fails
    /// afterwards, the balances are restored and the entry is not recorded.
    pub fn apply(&mut self, tx: &Transaction) -> Result<JournalEntry, LedgerError> {
        if tx.amount <= Decimal::ZERO {
            return Err(LedgerError::AmountNotPositive(tx.amount));
        }

        let amount = tx.amount.round_dp(2);

        if let TransactionKind::LoanRepayment = tx.kind {
            let outstanding = self.registry.balance(LOANS);
            if amount > outstanding {
                return Err(LedgerError::OverRepayment {
                    repayment: amount,
                    outstanding,
                });
            }
        }

        let (debit_name, credit_name) = self.posting_template(&tx.kind);
        let entry = JournalEntry {
            date: tx.date,
            description: self.entry_description(tx),
            postings: [
                self.build_posting(debit_name, amount, true)?,
                self.build_posting(credit_name, amount, false)?,
            ],
        };

        // Snapshot the two touched balances so a failed identity check can
        // roll the postings back exactly.
        let before = [
            self.registry.balance(debit_name),
            self.registry.balance(credit_name),
        ];

        self.commit(&entry);

        if !self.identity_holds() {
            let violation = LedgerError::InvariantViolation {
                assets: self.total_assets(),
                liabilities: self.total_liabilities(),
                equity: self.equity_with_earnings(),
            };
            warn!(
                description = %entry.description,
                gap = %self.identity_gap(),
                "rejected entry that would break the accounting identity"
            );

            self.restore(debit_name, before[0]);
            self.restore(credit_name, before[1]);
            self.journal.pop();
            return Err(violation);
        }

        debug!(
            kind = %tx.kind.label(),
            amount = %amount,
            debit = debit_name,
            credit = credit_name,
            "posted journal entry"
        );

        Ok(entry)
    }

    /// Fixed two-posting template for each transaction kind.
    fn posting_template(&self, kind: &TransactionKind) -> (&'static str, &'static str) {
        match kind {
            TransactionKind::Expense(category) => (category.account_name(), CASH),
            TransactionKind::Income => (CASH, GENERAL_INCOME),
            TransactionKind::LoanReceived => (CASH, LOANS),
            TransactionKind::LoanRepayment => (LOANS, CASH),
            TransactionKind::AssetPurchase => (EQUIPMENT, CASH),
        }
    }

    fn entry_description(&self, tx: &Transaction) -> String {
        match &tx.counterparty {
            Some(counterparty) => {
                format!("{} - {} ({})", tx.kind.label(), tx.description, counterparty)
            }
            None => format!("{} - {}", tx.kind.label(), tx.description),
        }
    }

    fn build_posting(
        &self,
        account_name: &str,
        amount: Decimal,
        is_debit: bool,
    ) -> Result<Posting, LedgerError> {
        let account = self
            .registry
            .get(account_name)
            .ok_or_else(|| LedgerError::UnknownAccount(account_name.to_string()))?;

        Ok(if is_debit {
            Posting::debit(account_name, account.category, amount)
        } else {
            Posting::credit(account_name, account.category, amount)
        })
    }

    /// Apply an already-built entry to the registry and record it.
    /// Callers have validated the entry; unknown accounts cannot occur here
    /// because postings are built from the registry itself.
    fn commit(&mut self, entry: &JournalEntry) {
        for posting in &entry.postings {
            if let Some(account) = self.registry.get_mut(&posting.account_name) {
                if posting.is_debit() {
                    account.post_debit(posting.debit);
                } else {
                    account.post_credit(posting.credit);
                }
            }
        }
        self.journal.push(entry.clone());
    }

    fn restore(&mut self, account_name: &str, balance_before: Decimal) {
        if let Some(account) = self.registry.get_mut(account_name) {
            let current = account.balance();
            match account.category.normal_side() {
                crate::accounts::NormalSide::Debit => account.post_debit(balance_before - current),
                crate::accounts::NormalSide::Credit => {
                    account.post_credit(balance_before - current)
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
