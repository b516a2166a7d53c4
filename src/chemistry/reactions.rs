use crate::chemistry::elements::normalize_symbol;
use serde::{Deserialize, Serialize};
use std::fmt;

/// id carried by reactions produced by the AI model instead of the curated library
pub const AI_REACTION_ID: i64 = -1;

/// Canonical form of a reactant set: normalized symbols, sorted and de-duplicated.
/// Two sets compare equal whatever order (or capitalization) the symbols were given in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct ReactantSet(Vec<String>);

impl ReactantSet {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut symbols: Vec<String> = symbols
            .into_iter()
            .map(|s| normalize_symbol(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        symbols.sort();
        symbols.dedup();
        ReactantSet(symbols)
    }

    pub fn symbols(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.binary_search_by(|s| s.as_str().cmp(symbol)).is_ok()
    }
}

impl From<Vec<String>> for ReactantSet {
    fn from(symbols: Vec<String>) -> Self {
        ReactantSet::new(symbols)
    }
}

impl fmt::Display for ReactantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" + "))
    }
}

/// A reaction record, curated (positive id) or AI-generated (`AI_REACTION_ID`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    #[serde(default)]
    pub id: i64,
    pub reactants: ReactantSet,
    pub product: String,
    pub product_name: String,
    pub description: String,
    pub uses: String,
    pub facts: String,
}

impl Reaction {
    pub fn is_ai_generated(&self) -> bool {
        self.id == AI_REACTION_ID
    }

    /// Placeholder shown when the AI analysis could not be obtained at all.
    pub fn analysis_unavailable(reactants: ReactantSet) -> Self {
        Reaction {
            id: AI_REACTION_ID,
            reactants,
            product: "Analysis Unavailable".to_string(),
            product_name: "Service Temporarily Unavailable".to_string(),
            description: "The AI analysis service is currently unavailable or under high demand, \
                          so this combination could not be analyzed."
                .to_string(),
            uses: "Please try again in a few minutes.".to_string(),
            facts: "AI models have usage limits and may be temporarily unavailable during \
                    periods of high demand."
                .to_string(),
        }
    }
}
