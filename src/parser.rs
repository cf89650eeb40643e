// 🧠 Transaction Parser - ordered pattern rules over free-form messages
// Rules as data, tried in a fixed priority order; the first rule whose
// pattern matches wins. A rule whose amount capture fails to parse falls
// through to the next rule, not straight to NoMatch.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::classifier::CategoryMatcher;
use crate::ledger::{Transaction, TransactionKind};

// ============================================================================
// PARSE RESULT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    BalanceSheet,
    IncomeStatement,
    TrialBalance,
    CashPosition,
}

/// Outcome of parsing one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// The message classified as a transaction.
    Transaction(Transaction),
    /// The message asked for a report.
    Report(ReportKind),
    /// Neither a transaction pattern nor a report keyword matched.
    NoMatch,
}

// ============================================================================
// TOKENS
// ============================================================================

/// A message split into whitespace tokens, with a lowercased, punctuation-
/// trimmed view for keyword matching alongside the raw tokens for captures.
struct Tokens<'a> {
    raw: Vec<&'a str>,
    lower: Vec<String>,
}

const EDGE_PUNCTUATION: &[char] = &[',', '.', '!', '?', ';', ':'];

impl<'a> Tokens<'a> {
    fn new(message: &'a str) -> Self {
        let raw: Vec<&str> = message.split_whitespace().collect();
        let lower = raw
            .iter()
            .map(|w| w.trim_matches(EDGE_PUNCTUATION).to_lowercase())
            .collect();
        Tokens { raw, lower }
    }

    fn len(&self) -> usize {
        self.raw.len()
    }

    /// Index of the first token equal to any of `options`.
    fn find(&self, options: &[&str]) -> Option<usize> {
        self.find_from(0, options)
    }

    fn find_from(&self, start: usize, options: &[&str]) -> Option<usize> {
        (start..self.len()).find(|&i| options.contains(&self.lower[i].as_str()))
    }

    fn is(&self, index: usize, word: &str) -> bool {
        self.lower.get(index).map(|w| w == word).unwrap_or(false)
    }

    /// Amount at exactly `index`, or None.
    fn amount_at(&self, index: usize) -> Option<Decimal> {
        self.raw.get(index).and_then(|t| parse_amount(t))
    }

    /// First parseable amount at or after `start`, with its index.
    fn amount_from(&self, start: usize) -> Option<(Decimal, usize)> {
        (start..self.len()).find_map(|i| parse_amount(self.raw[i]).map(|d| (d, i)))
    }

    /// Raw tokens in `[start, end)` joined by spaces, edge punctuation
    /// trimmed. Empty captures become None.
    fn capture(&self, start: usize, end: usize) -> Option<String> {
        if start >= end || end > self.len() {
            return None;
        }
        let joined = self.raw[start..end].join(" ");
        let trimmed = joined.trim_matches(EDGE_PUNCTUATION).trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn capture_to_end(&self, start: usize) -> Option<String> {
        self.capture(start, self.len())
    }
}

/// Parse one token as a monetary amount: currency symbol and thousands
/// separators stripped, trailing punctuation dropped, two-place rounding.
/// Sign is kept; the ledger decides what to do with non-positive amounts.
fn parse_amount(token: &str) -> Option<Decimal> {
    let cleaned = token.trim_start_matches('$').replace(',', "");
    let cleaned = cleaned.trim_end_matches(|c: char| !c.is_ascii_digit());
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok().map(|d| d.round_dp(2))
}

// ============================================================================
// PATTERN RULES
// ============================================================================

struct ParseContext<'a> {
    categories: &'a CategoryMatcher,
    message: &'a str,
    date: NaiveDate,
}

type MatchFn = fn(&Tokens, &ParseContext) -> Option<Transaction>;

struct PatternRule {
    name: &'static str,
    matcher: MatchFn,
}

/// Priority-ordered rule table. Reordering changes classification outcomes
/// on ambiguous input, so the order is part of the contract.
const RULES: &[PatternRule] = &[
    PatternRule { name: "expense-for-on", matcher: rule_expense_for_on },
    PatternRule { name: "expense-to", matcher: rule_expense_to },
    PatternRule { name: "income-from", matcher: rule_income_from },
    PatternRule { name: "income-gave-me", matcher: rule_income_gave_me },
    PatternRule { name: "loan-received", matcher: rule_loan_received },
    PatternRule { name: "loan-repayment", matcher: rule_loan_repayment },
    PatternRule { name: "asset-purchase", matcher: rule_asset_purchase },
];

/// Rule 1: "paid/spent/bought/purchased <amount> for/on <description>".
/// The amount must directly follow the verb; "bought laptop for 500" fails
/// here (malformed amount) and falls through to the asset-purchase rule.
fn rule_expense_for_on(tokens: &Tokens, cx: &ParseContext) -> Option<Transaction> {
    let verb = tokens.find(&["paid", "spent", "bought", "purchased"])?;
    let amount = tokens.amount_at(verb + 1)?;
    let marker = tokens.find_from(verb + 2, &["for", "on"])?;
    let description = tokens.capture_to_end(marker + 1)?;
    let category = cx.categories.classify(&description);

    Some(Transaction::new(
        TransactionKind::Expense(category),
        amount,
        None,
        description,
        cx.date,
    ))
}

/// Rule 2: "paid/gave/sent <amount> to/for <counterparty>".
fn rule_expense_to(tokens: &Tokens, cx: &ParseContext) -> Option<Transaction> {
    let verb = tokens.find(&["paid", "gave", "sent"])?;
    let amount = tokens.amount_at(verb + 1)?;
    let marker = tokens.find_from(verb + 2, &["to", "for"])?;
    let counterparty = tokens.capture_to_end(marker + 1)?;
    let category = cx.categories.classify(&counterparty);

    Some(Transaction::new(
        TransactionKind::Expense(category),
        amount,
        Some(counterparty.clone()),
        counterparty,
        cx.date,
    ))
}

/// Rule 3: "received/got/earned/collected <amount> [from <counterparty>]".
fn rule_income_from(tokens: &Tokens, cx: &ParseContext) -> Option<Transaction> {
    let verb = tokens.find(&["received", "got", "earned", "collected"])?;
    let amount = tokens.amount_at(verb + 1)?;
    let counterparty = tokens
        .find_from(verb + 2, &["from"])
        .and_then(|f| tokens.capture_to_end(f + 1));

    Some(Transaction::new(
        TransactionKind::Income,
        amount,
        counterparty,
        cx.message.trim().to_string(),
        cx.date,
    ))
}

/// Rule 4: "<first> gave/paid/sent me <second>", a deliberate two-shape
/// pattern. A non-numeric first capture is the counterparty and the amount
/// is taken from the second; a numeric first capture is the amount and the
/// second capture names the counterparty.
fn rule_income_gave_me(tokens: &Tokens, cx: &ParseContext) -> Option<Transaction> {
    let verb = tokens.find(&["gave", "paid", "sent"])?;
    if !tokens.is(verb + 1, "me") {
        return None;
    }

    let first = tokens.capture(0, verb);
    let numeric_first = first.as_deref().and_then(parse_amount);

    let (amount, counterparty) = match numeric_first {
        Some(amount) => (amount, tokens.capture_to_end(verb + 2)),
        None => (tokens.amount_at(verb + 2)?, first),
    };

    Some(Transaction::new(
        TransactionKind::Income,
        amount,
        counterparty,
        cx.message.trim().to_string(),
        cx.date,
    ))
}

/// Rule 5: "borrowed <amount> [from <counterparty>]" or
/// "took … loan … <amount> [from <counterparty>]".
fn rule_loan_received(tokens: &Tokens, cx: &ParseContext) -> Option<Transaction> {
    let start = match tokens.find(&["borrowed"]) {
        Some(b) => b,
        None => {
            let took = tokens.find(&["took"])?;
            tokens.find_from(took + 1, &["loan"])?
        }
    };
    let (amount, amount_idx) = tokens.amount_from(start + 1)?;
    let counterparty = tokens
        .find_from(amount_idx + 1, &["from"])
        .and_then(|f| tokens.capture_to_end(f + 1))
        .unwrap_or_else(|| "Bank".to_string());

    Some(Transaction::new(
        TransactionKind::LoanReceived,
        amount,
        Some(counterparty),
        cx.message.trim().to_string(),
        cx.date,
    ))
}

/// Rule 6: "repaid <amount> [to <counterparty>]" or
/// "paid back <amount> [to <counterparty>]".
fn rule_loan_repayment(tokens: &Tokens, cx: &ParseContext) -> Option<Transaction> {
    let start = match tokens.find(&["repaid"]) {
        Some(r) => r,
        None => {
            let paid = tokens.find(&["paid"])?;
            if !tokens.is(paid + 1, "back") {
                return None;
            }
            paid + 1
        }
    };
    let (amount, amount_idx) = tokens.amount_from(start + 1)?;
    let counterparty = tokens
        .find_from(amount_idx + 1, &["to"])
        .and_then(|f| tokens.capture_to_end(f + 1))
        .unwrap_or_else(|| "Bank".to_string());

    Some(Transaction::new(
        TransactionKind::LoanRepayment,
        amount,
        Some(counterparty),
        cx.message.trim().to_string(),
        cx.date,
    ))
}

/// Rule 7: "bought/purchased <asset words> for <amount>".
fn rule_asset_purchase(tokens: &Tokens, cx: &ParseContext) -> Option<Transaction> {
    let verb = tokens.find(&["bought", "purchased"])?;
    let marker = tokens.find_from(verb + 1, &["for"])?;
    let asset = tokens.capture(verb + 1, marker)?;
    let amount = tokens.amount_at(marker + 1)?;

    Some(Transaction::new(
        TransactionKind::AssetPurchase,
        amount,
        None,
        asset,
        cx.date,
    ))
}

// ============================================================================
// REPORT QUERY DETECTION
// ============================================================================

/// Checked only after every transaction rule has failed. Multi-word phrases
/// come before the bare "balance"/"cash" fallback so "trial balance" is not
/// swallowed by it.
fn detect_report_query(message_lower: &str) -> Option<ReportKind> {
    if message_lower.contains("balance sheet") {
        return Some(ReportKind::BalanceSheet);
    }
    if message_lower.contains("income statement")
        || message_lower.contains("profit")
        || message_lower.contains("loss")
    {
        return Some(ReportKind::IncomeStatement);
    }
    if message_lower.contains("trial balance") {
        return Some(ReportKind::TrialBalance);
    }
    if message_lower.contains("balance") || message_lower.contains("cash") {
        return Some(ReportKind::CashPosition);
    }
    None
}

// ============================================================================
// PARSER
// ============================================================================

/// Classifies a free-form message into a transaction, a report query, or
/// NoMatch, using the ordered rule table above. Stateless between calls.
pub struct MessageParser {
    categories: CategoryMatcher,
}

impl MessageParser {
    pub fn new() -> Self {
        MessageParser {
            categories: CategoryMatcher::new(),
        }
    }

    /// Parse a message, dating any resulting transaction today.
    pub fn parse(&self, message: &str) -> Parsed {
        self.parse_with_date(message, Utc::now().date_naive())
    }

    /// Parse with an explicit transaction date.
    pub fn parse_with_date(&self, message: &str, date: NaiveDate) -> Parsed {
        let tokens = Tokens::new(message);
        let cx = ParseContext {
            categories: &self.categories,
            message,
            date,
        };

        for rule in RULES {
            if let Some(tx) = (rule.matcher)(&tokens, &cx) {
                debug!(rule = rule.name, kind = %tx.kind.label(), "message matched rule");
                return Parsed::Transaction(tx);
            }
        }

        if let Some(kind) = detect_report_query(&message.to_lowercase()) {
            debug!(?kind, "message matched report query");
            return Parsed::Report(kind);
        }

        Parsed::NoMatch
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ExpenseCategory;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn parse(message: &str) -> Parsed {
        MessageParser::new().parse_with_date(message, date())
    }

    fn transaction(message: &str) -> Transaction {
        match parse(message) {
            Parsed::Transaction(tx) => tx,
            other => panic!("expected transaction for {:?}, got {:?}", message, other),
        }
    }

    #[test]
    fn test_expense_paid_for() {
        let tx = transaction("paid 25 for lunch");

        assert_eq!(tx.kind, TransactionKind::Expense(ExpenseCategory::Food));
        assert_eq!(tx.amount, dec(2_500));
        assert_eq!(tx.description, "lunch");
        assert_eq!(tx.counterparty, None);
    }

    #[test]
    fn test_expense_spent_on() {
        let tx = transaction("I spent 40 on taxi rides");

        assert_eq!(
            tx.kind,
            TransactionKind::Expense(ExpenseCategory::Transportation)
        );
        assert_eq!(tx.amount, dec(4_000));
        assert_eq!(tx.description, "taxi rides");
    }

    #[test]
    fn test_expense_with_currency_symbol_and_separators() {
        let tx = transaction("paid $1,200.50 for office rent");

        assert_eq!(tx.kind, TransactionKind::Expense(ExpenseCategory::Rent));
        assert_eq!(tx.amount, dec(120_050));
    }

    #[test]
    fn test_expense_sent_to() {
        let tx = transaction("sent 50 to john");

        assert_eq!(tx.kind, TransactionKind::Expense(ExpenseCategory::Other));
        assert_eq!(tx.amount, dec(5_000));
        assert_eq!(tx.counterparty.as_deref(), Some("john"));
    }

    #[test]
    fn test_income_received_from() {
        let tx = transaction("received 100 from client");

        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.amount, dec(10_000));
        assert_eq!(tx.counterparty.as_deref(), Some("client"));
    }

    #[test]
    fn test_income_without_counterparty() {
        let tx = transaction("earned 75");

        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.amount, dec(7_500));
        assert_eq!(tx.counterparty, None);
    }

    #[test]
    fn test_income_gave_me_name_first_shape() {
        let tx = transaction("john paid me 50");

        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.amount, dec(5_000));
        assert_eq!(tx.counterparty.as_deref(), Some("john"));
    }

    #[test]
    fn test_income_gave_me_amount_first_shape() {
        // the deliberate second shape: a numeric first capture is the amount
        let tx = transaction("50 sent me john");

        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.amount, dec(5_000));
        assert_eq!(tx.counterparty.as_deref(), Some("john"));
    }

    #[test]
    fn test_income_gave_me_without_leading_name() {
        let tx = transaction("gave me 30");

        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.amount, dec(3_000));
        assert_eq!(tx.counterparty, None);
    }

    #[test]
    fn test_loan_received_defaults_to_bank() {
        let tx = transaction("borrowed 500");

        assert_eq!(tx.kind, TransactionKind::LoanReceived);
        assert_eq!(tx.amount, dec(50_000));
        assert_eq!(tx.counterparty.as_deref(), Some("Bank"));
    }

    #[test]
    fn test_loan_received_with_counterparty() {
        let tx = transaction("borrowed 500 from bank");

        assert_eq!(tx.kind, TransactionKind::LoanReceived);
        assert_eq!(tx.counterparty.as_deref(), Some("bank"));
    }

    #[test]
    fn test_loan_received_took_loan_phrase() {
        let tx = transaction("took a loan of 500 from the credit union");

        assert_eq!(tx.kind, TransactionKind::LoanReceived);
        assert_eq!(tx.amount, dec(50_000));
        assert_eq!(tx.counterparty.as_deref(), Some("the credit union"));
    }

    #[test]
    fn test_loan_repayment_repaid() {
        let tx = transaction("repaid 200 to bank");

        assert_eq!(tx.kind, TransactionKind::LoanRepayment);
        assert_eq!(tx.amount, dec(20_000));
        assert_eq!(tx.counterparty.as_deref(), Some("bank"));
    }

    #[test]
    fn test_loan_repayment_paid_back_not_taken_by_expense_rules() {
        // "paid" alone is an expense verb; "paid back" must reach the
        // repayment rule via the malformed-amount fallthrough
        let tx = transaction("paid back 200 to bank");

        assert_eq!(tx.kind, TransactionKind::LoanRepayment);
        assert_eq!(tx.amount, dec(20_000));
    }

    #[test]
    fn test_asset_purchase_via_fallthrough() {
        // rule 1 sees "bought" but "laptop" is not an amount, so the message
        // falls through to the asset-purchase rule
        let tx = transaction("bought laptop for 500");

        assert_eq!(tx.kind, TransactionKind::AssetPurchase);
        assert_eq!(tx.amount, dec(50_000));
        assert_eq!(tx.description, "laptop");
    }

    #[test]
    fn test_numeric_purchase_stays_on_first_rule() {
        // first-match-wins: an amount right after the verb is rule 1,
        // even though the asset rule would also match
        let tx = transaction("bought 30 for supplies");

        assert_eq!(tx.kind, TransactionKind::Expense(ExpenseCategory::Supplies));
        assert_eq!(tx.amount, dec(3_000));
    }

    #[test]
    fn test_report_queries() {
        assert_eq!(
            parse("show me the balance sheet"),
            Parsed::Report(ReportKind::BalanceSheet)
        );
        assert_eq!(
            parse("income statement please"),
            Parsed::Report(ReportKind::IncomeStatement)
        );
        assert_eq!(
            parse("did I make a profit?"),
            Parsed::Report(ReportKind::IncomeStatement)
        );
        assert_eq!(
            parse("run a trial balance"),
            Parsed::Report(ReportKind::TrialBalance)
        );
        assert_eq!(
            parse("what's my balance?"),
            Parsed::Report(ReportKind::CashPosition)
        );
        assert_eq!(
            parse("how much cash do I have"),
            Parsed::Report(ReportKind::CashPosition)
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(parse("hello there"), Parsed::NoMatch);
        assert_eq!(parse(""), Parsed::NoMatch);
        assert_eq!(parse("what can you do?"), Parsed::NoMatch);
    }

    #[test]
    fn test_parse_amount_cleanup() {
        assert_eq!(parse_amount("$25"), Some(dec(2_500)));
        assert_eq!(parse_amount("1,200.50"), Some(dec(120_050)));
        assert_eq!(parse_amount("25."), Some(dec(2_500)));
        assert_eq!(parse_amount("lunch"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = MessageParser::new();
        let a = parser.parse_with_date("paid 25 for lunch", date());
        let b = parser.parse_with_date("paid 25 for lunch", date());

        match (a, b) {
            (Parsed::Transaction(x), Parsed::Transaction(y)) => {
                assert_eq!(x.kind, y.kind);
                assert_eq!(x.amount, y.amount);
                assert_eq!(x.description, y.description);
            }
            other => panic!("expected two transactions, got {:?}", other),
        }
    }
}
