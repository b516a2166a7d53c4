//! # Reaction Resolver Module
//!
//! ## Purpose
//! Answers "what happens when these elements are mixed?". Curated reactions win; any
//! other combination is handed to the AI gateway and its free-form answer is turned into
//! a normalized reaction record.
//!
//! ## Outcomes
//! - curated reaction from the `ReactionStore` (`ReactionSource::Curated`)
//! - AI-generated reaction carrying `AI_REACTION_ID` (`ReactionSource::Ai`)
//! - `NotFeasible` with a non-empty explanation when the model says no stable compound forms
//! - the "Analysis Unavailable" placeholder (`ReactionSource::Unavailable`) when no model
//!   gave a readable answer within the gateway's retry policy
//!
//! Gateway failures are logged here and never reach the caller.

use crate::ai::gateway::AiGateway;
use crate::chemistry::reactions::{AI_REACTION_ID, ReactantSet, Reaction};
use crate::chemistry::storage::ChemStore;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

const GENERIC_INFEASIBLE: &str =
    "These elements do not combine into a stable compound under ordinary conditions.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionSource {
    Curated,
    Ai,
    Unavailable,
}

/// A reaction together with where it came from. Serializes as the reaction's own fields
/// plus `source`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    #[serde(flatten)]
    pub reaction: Reaction,
    pub source: ReactionSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no stable compound can be formed from {reactants}: {explanation}")]
pub struct NotFeasible {
    pub reactants: ReactantSet,
    pub explanation: String,
}

/// JSON object the reaction-analysis prompt asks the model for. Only `feasible` is
/// mandatory; an object without it is treated as an unreadable reply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionAnalysis {
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub uses: String,
    #[serde(default)]
    pub facts: String,
    pub feasible: bool,
}

impl ReactionAnalysis {
    /// description, then facts, then a generic sentence
    fn explanation(&self) -> String {
        [&self.description, &self.facts]
            .into_iter()
            .map(|text| text.trim())
            .find(|text| !text.is_empty())
            .unwrap_or(GENERIC_INFEASIBLE)
            .to_string()
    }
}

pub struct ReactionResolver {
    store: Arc<ChemStore>,
    gateway: Arc<AiGateway>,
}

impl ReactionResolver {
    pub fn new(store: Arc<ChemStore>, gateway: Arc<AiGateway>) -> Self {
        Self { store, gateway }
    }

    pub async fn resolve<S: AsRef<str>>(&self, symbols: &[S]) -> Result<Resolution, NotFeasible> {
        let reactants = ReactantSet::new(symbols);
        if let Some(reaction) = self.store.reactions.find_by_reactant_set(&reactants) {
            info!("Curated reaction found for {}", reactants);
            return Ok(Resolution {
                reaction: reaction.clone(),
                source: ReactionSource::Curated,
            });
        }

        info!("No curated reaction for {}, asking the AI model", reactants);
        let labels: Vec<String> = reactants
            .symbols()
            .iter()
            .map(|symbol| self.store.elements.label(symbol))
            .collect();

        let analysis: ReactionAnalysis = match self.gateway.analyze_reaction(&labels).await {
            Ok(analysis) => analysis,
            Err(e) => {
                error!("Reaction analysis for {} failed: {}", reactants, e);
                return Ok(unavailable(reactants));
            }
        };

        if !analysis.feasible {
            info!("AI reports no stable compound for {}", reactants);
            return Err(NotFeasible {
                explanation: analysis.explanation(),
                reactants,
            });
        }
        if analysis.product.trim().is_empty() {
            warn!("AI reported {} as feasible without a product", reactants);
            return Ok(unavailable(reactants));
        }

        Ok(Resolution {
            reaction: Reaction {
                id: AI_REACTION_ID,
                reactants,
                product: analysis.product.trim().to_string(),
                product_name: analysis.product_name,
                description: analysis.description,
                uses: analysis.uses,
                facts: analysis.facts,
            },
            source: ReactionSource::Ai,
        })
    }
}

fn unavailable(reactants: ReactantSet) -> Resolution {
    Resolution {
        reaction: Reaction::analysis_unavailable(reactants),
        source: ReactionSource::Unavailable,
    }
}
