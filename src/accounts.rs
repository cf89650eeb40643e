// 💳 Account Registry - fixed chart of accounts with running balances
// Structure never changes at runtime; only balances move, and only the
// ledger engine is allowed to move them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classifier::ExpenseCategory;

// ============================================================================
// ACCOUNT CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountCategory {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

/// Which side of a journal entry increases an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalSide {
    Debit,
    Credit,
}

impl AccountCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountCategory::Asset => "Asset",
            AccountCategory::Liability => "Liability",
            AccountCategory::Equity => "Equity",
            AccountCategory::Income => "Income",
            AccountCategory::Expense => "Expense",
        }
    }

    /// Assets and expenses increase on debit; the rest increase on credit.
    pub fn normal_side(&self) -> NormalSide {
        match self {
            AccountCategory::Asset | AccountCategory::Expense => NormalSide::Debit,
            _ => NormalSide::Credit,
        }
    }
}

// ============================================================================
// FIXED ACCOUNT NAMES
// ============================================================================

pub const CASH: &str = "Cash";
pub const EQUIPMENT: &str = "Equipment";
pub const LOANS: &str = "Loans";
pub const OWNER_CAPITAL: &str = "Owner's Capital";
pub const GENERAL_INCOME: &str = "General Income";

// ============================================================================
// ACCOUNT
// ============================================================================

/// A single named account. The balance is signed relative to the account's
/// normal side: a debit-normal account with more debits than credits has a
/// positive balance, and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub category: AccountCategory,
    balance: Decimal,
}

impl Account {
    fn new(name: &str, category: AccountCategory) -> Self {
        Account {
            name: name.to_string(),
            category,
            balance: Decimal::ZERO,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Apply a debit of `amount` to this account.
    pub(crate) fn post_debit(&mut self, amount: Decimal) {
        match self.category.normal_side() {
            NormalSide::Debit => self.balance += amount,
            NormalSide::Credit => self.balance -= amount,
        }
    }

    /// Apply a credit of `amount` to this account.
    pub(crate) fn post_credit(&mut self, amount: Decimal) {
        match self.category.normal_side() {
            NormalSide::Debit => self.balance -= amount,
            NormalSide::Credit => self.balance += amount,
        }
    }
}

// ============================================================================
// ACCOUNT REGISTRY
// ============================================================================

/// The chart of accounts. Created once with every account at zero, then
/// only mutated through the ledger engine's postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    /// Build the fixed chart of accounts:
    /// - assets: Cash, Equipment
    /// - liabilities: Loans
    /// - equity: Owner's Capital
    /// - income: General Income
    /// - expenses: one account per expense category
    pub fn new() -> Self {
        let mut accounts = vec![
            Account::new(CASH, AccountCategory::Asset),
            Account::new(EQUIPMENT, AccountCategory::Asset),
            Account::new(LOANS, AccountCategory::Liability),
            Account::new(OWNER_CAPITAL, AccountCategory::Equity),
            Account::new(GENERAL_INCOME, AccountCategory::Income),
        ];

        for category in [
            ExpenseCategory::Food,
            ExpenseCategory::Rent,
            ExpenseCategory::Utilities,
            ExpenseCategory::Transportation,
            ExpenseCategory::Supplies,
            ExpenseCategory::Other,
        ] {
            accounts.push(Account::new(category.account_name(), AccountCategory::Expense));
        }

        AccountRegistry { accounts }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn get(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.name == name)
    }

    /// Balance of a named account; zero if the name is unknown.
    pub fn balance(&self, name: &str) -> Decimal {
        self.get(name).map(|a| a.balance).unwrap_or(Decimal::ZERO)
    }

    /// Sum of balances across one account category.
    pub fn category_total(&self, category: AccountCategory) -> Decimal {
        self.accounts
            .iter()
            .filter(|a| a.category == category)
            .map(|a| a.balance)
            .sum()
    }

    /// Sum of balances across all debit-normal accounts.
    pub fn debit_normal_total(&self) -> Decimal {
        self.accounts
            .iter()
            .filter(|a| a.category.normal_side() == NormalSide::Debit)
            .map(|a| a.balance)
            .sum()
    }

    /// Sum of balances across all credit-normal accounts.
    pub fn credit_normal_total(&self) -> Decimal {
        self.accounts
            .iter()
            .filter(|a| a.category.normal_side() == NormalSide::Credit)
            .map(|a| a.balance)
            .sum()
    }
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
