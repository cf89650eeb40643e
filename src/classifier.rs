// 🏷️ Category Classifier - keyword to expense category lookup
// Rules as data: ordered keyword sets, first category with a hit wins

use serde::{Deserialize, Serialize};

// ============================================================================
// EXPENSE CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Food,
    Rent,
    Utilities,
    Transportation,
    Supplies,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::Supplies => "Supplies",
            ExpenseCategory::Other => "Other",
        }
    }

    /// Name of the expense account this category posts against.
    pub fn account_name(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::Supplies => "Supplies",
            ExpenseCategory::Other => "Other Expenses",
        }
    }
}

// ============================================================================
// KEYWORD RULES
// ============================================================================

/// One classification rule: a category and the keywords that select it.
struct KeywordRule {
    category: ExpenseCategory,
    keywords: &'static [&'static str],
}

/// Ordered keyword table. Evaluated top to bottom; the first category with a
/// case-insensitive substring match wins, so earlier rows shadow later ones.
const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        category: ExpenseCategory::Food,
        keywords: &[
            "food", "lunch", "dinner", "breakfast", "restaurant", "meal", "grocer", "coffee",
            "snack",
        ],
    },
    KeywordRule {
        category: ExpenseCategory::Rent,
        keywords: &["rent", "lease", "landlord"],
    },
    KeywordRule {
        category: ExpenseCategory::Utilities,
        keywords: &["electricity", "water", "internet", "phone", "utility", "utilities", "bill"],
    },
    KeywordRule {
        category: ExpenseCategory::Transportation,
        keywords: &["bus", "taxi", "uber", "train", "fuel", "petrol", "transport", "parking"],
    },
    KeywordRule {
        category: ExpenseCategory::Supplies,
        keywords: &["supplies", "stationery", "paper", "ink", "printer"],
    },
];

// ============================================================================
// MATCHER
// ============================================================================

/// Buckets free-text expense descriptions into a fixed category set.
///
/// Pure lookup, no state: the same description always classifies the same
/// way. Descriptions with no keyword hit fall back to `Other`.
pub struct CategoryMatcher;

impl CategoryMatcher {
    pub fn new() -> Self {
        CategoryMatcher
    }

    /// Classify a description by the first keyword set it matches.
    pub fn classify(&self, description: &str) -> ExpenseCategory {
        let text = description.to_lowercase();

        for rule in KEYWORD_RULES {
            if rule.keywords.iter().any(|kw| text.contains(kw)) {
                return rule.category;
            }
        }

        ExpenseCategory::Other
    }
}

impl Default for CategoryMatcher {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
