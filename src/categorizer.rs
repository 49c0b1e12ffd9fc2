use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxprepError};
use crate::models::{Transaction, UNCATEGORIZED};

pub const BUSINESS: &str = "Business";
pub const LAW_SCHOOL: &str = "Law School";

/// Descriptions containing any of these are forced into [`LAW_SCHOOL`] after
/// every keyword rule has run.
const OVERRIDE_KEYWORDS: [&str; 2] = ["NH", "NEW HAMPSHIRE"];

const BUILTIN_RULES: &[(&str, &str)] = &[
    // Plane Connection LLC
    ("PLANE CONNECTION", BUSINESS),
    ("PLANE CONNECTION LLC", BUSINESS),
    ("PLANE CONNECT", BUSINESS),
    ("TITAN AVIATION", BUSINESS),
    ("ADP FEES", BUSINESS),
    ("PAYROLL", BUSINESS),
    // Lumis
    ("LUMIS", BUSINESS),
    ("LUMIS INC", BUSINESS),
    ("LAW SCHOOL", LAW_SCHOOL),
    ("BARBRI", LAW_SCHOOL),
    ("BAR EXAM", LAW_SCHOOL),
    ("LEGAL EDUCATION", LAW_SCHOOL),
    ("WESTLAW", LAW_SCHOOL),
    ("LEXIS", LAW_SCHOOL),
    ("HOMESCHOOL", "Homeschool"),
    ("CURRICULUM", "Homeschool"),
    ("EDUCATIONAL", "Homeschool"),
    ("BOOKS & SUPPLIES", "Homeschool"),
    ("ADOBE", "Subscription"),
    ("AMAZON PRIME", "Subscription"),
    ("NETFLIX", "Subscription"),
    ("HULU", "Subscription"),
    ("SPOTIFY", "Subscription"),
    ("GROCERIES", "Personal"),
    ("RESTAURANTS", "Personal"),
    ("ENTERTAINMENT", "Personal"),
    ("SHOPPING", "Personal"),
    ("UTILITIES", "Personal"),
    ("CREDIT CARD PAYMENT", "Financial"),
    ("TRANSFER", "Financial"),
    ("PAYCHECK", "Income"),
    ("INTEREST INCOME", "Income"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    #[default]
    Contains,
    Regex,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Regex => "regex",
        }
    }
}

/// One entry of a rules file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub keyword: String,
    pub category: String,
    #[serde(default)]
    pub match_type: MatchType,
}

impl CategoryRule {
    pub fn contains(keyword: &str, category: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            category: category.to_string(),
            match_type: MatchType::Contains,
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    /// Uppercased keyword, compared against the uppercased description.
    Contains(String),
    Regex(Regex),
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: CategoryRule,
    matcher: Matcher,
}

impl CompiledRule {
    fn matches(&self, desc_upper: &str, description: &str) -> bool {
        match &self.matcher {
            Matcher::Contains(kw) => desc_upper.contains(kw.as_str()),
            Matcher::Regex(re) => re.is_match(description),
        }
    }
}

/// Ordered keyword rules plus the fixed Law School override. Rules are kept
/// in the order given; a later match replaces an earlier one.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self> {
        let rules = rules
            .into_iter()
            .map(|rule| -> Result<CompiledRule> {
                let matcher = match rule.match_type {
                    MatchType::Contains => Matcher::Contains(rule.keyword.to_uppercase()),
                    MatchType::Regex => Matcher::Regex(
                        RegexBuilder::new(&rule.keyword)
                            .case_insensitive(true)
                            .build()
                            .map_err(|e| {
                                TaxprepError::RulesFile(format!("bad pattern '{}': {e}", rule.keyword))
                            })?,
                    ),
                };
                Ok(CompiledRule { rule, matcher })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(kw, cat)| {
                let rule = CategoryRule::contains(kw, cat);
                CompiledRule {
                    matcher: Matcher::Contains(rule.keyword.clone()),
                    rule,
                }
            })
            .collect();
        Self { rules }
    }

    /// Load rules from a JSON array of `{"keyword", "category", "match_type"?}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TaxprepError::RulesFile(format!("{}: {e}", path.display())))?;
        let rules: Vec<CategoryRule> = serde_json::from_str(&content)
            .map_err(|e| TaxprepError::RulesFile(format!("{}: {e}", path.display())))?;
        Self::new(rules)
    }

    pub fn rules(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter().map(|r| &r.rule)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Category for a single description. Total: always returns a label.
    pub fn category_for(&self, description: Option<&str>) -> &str {
        let Some(description) = description else {
            return UNCATEGORIZED;
        };
        let desc_upper = description.to_uppercase();

        if is_override(&desc_upper) {
            return LAW_SCHOOL;
        }

        self.rules
            .iter()
            .rev()
            .find(|r| r.matches(&desc_upper, description))
            .map(|r| r.rule.category.as_str())
            .unwrap_or(UNCATEGORIZED)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn is_override(desc_upper: &str) -> bool {
    OVERRIDE_KEYWORDS.iter().any(|kw| desc_upper.contains(kw))
}

pub fn override_keywords() -> &'static [&'static str] {
    &OVERRIDE_KEYWORDS
}

pub struct CategorizeResult {
    pub categorized: usize,
    pub uncategorized: usize,
}

/// Assign a category to every transaction, replacing whatever was there.
pub fn categorize_transactions(txns: &mut [Transaction], rules: &RuleSet) -> CategorizeResult {
    let mut categorized = 0usize;
    let mut uncategorized = 0usize;

    for txn in txns.iter_mut() {
        let category = rules.category_for(txn.description.as_deref());
        if category == UNCATEGORIZED {
            uncategorized += 1;
        } else {
            categorized += 1;
        }
        txn.category = category.to_string();
    }

    CategorizeResult {
        categorized,
        uncategorized,
    }
}
