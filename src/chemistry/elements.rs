use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Category of an element as shown on the periodic table grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementCategory {
    Nonmetal,
    NobleGas,
    AlkaliMetal,
    AlkalineEarth,
    Metalloid,
    Halogen,
    PostTransition,
    TransitionMetal,
    Lanthanide,
    Actinide,
    Unknown,
}

impl ElementCategory {
    pub const ALL: [ElementCategory; 11] = [
        ElementCategory::Nonmetal,
        ElementCategory::NobleGas,
        ElementCategory::AlkaliMetal,
        ElementCategory::AlkalineEarth,
        ElementCategory::Metalloid,
        ElementCategory::Halogen,
        ElementCategory::PostTransition,
        ElementCategory::TransitionMetal,
        ElementCategory::Lanthanide,
        ElementCategory::Actinide,
        ElementCategory::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementCategory::Nonmetal => "nonmetal",
            ElementCategory::NobleGas => "noble-gas",
            ElementCategory::AlkaliMetal => "alkali-metal",
            ElementCategory::AlkalineEarth => "alkaline-earth",
            ElementCategory::Metalloid => "metalloid",
            ElementCategory::Halogen => "halogen",
            ElementCategory::PostTransition => "post-transition",
            ElementCategory::TransitionMetal => "transition-metal",
            ElementCategory::Lanthanide => "lanthanide",
            ElementCategory::Actinide => "actinide",
            ElementCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown element category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for ElementCategory {
    type Err = UnknownCategory;
    /// accepts "noble-gas", "noble gas", "Noble_Gas" and so on
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '_'], "-");
        ElementCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A chemical element. Immutable once the element library is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub symbol: String,
    pub name: String,
    pub atomic_number: u32,
    pub atomic_mass: f64,
    pub category: ElementCategory,
    pub period: u32,
    #[serde(default)]
    pub group: Option<u32>,
    pub electron_configuration: String,
    #[serde(default)]
    pub melting_point: Option<String>,
    #[serde(default)]
    pub boiling_point: Option<String>,
    #[serde(default)]
    pub uses: Option<String>,
    #[serde(default)]
    pub fact: Option<String>,
}

impl Element {
    /// "Fe (Iron)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.symbol, self.name)
    }
}

/// Canonical spelling of an element symbol: first letter upper case, the rest lower case.
/// Surrounding whitespace is dropped.
pub fn normalize_symbol(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
