//! # Storage Module
//!
//! ## Purpose
//! In-memory lookup tables for elements, curated reactions and lessons.
//!
//! ## Lifecycle
//! A `ChemStore` is built exactly once when the process starts, either from the libraries
//! embedded in the binary (`ChemStore::seeded`) or from library files named in the
//! configuration (see `library_manager`). Construction validates the records; afterwards
//! the store exposes read-only lookups only and is shared between request handlers behind
//! an `Arc`.
//!
//! ## Lookups
//! - `ElementStore::get_by_symbol`: symbol spelling is normalized ("fe" finds Fe)
//! - `ElementStore::get_all`: sorted by atomic number
//! - `ReactionStore::find_by_reactant_set`: exact match of the canonical reactant set,
//!   so the order in which symbols are given never matters

use crate::chemistry::elements::{Element, ElementCategory, normalize_symbol};
use crate::chemistry::lessons::{Lesson, LessonStore};
use crate::chemistry::reactions::{ReactantSet, Reaction};
use crate::library_manager::{LibraryError, LibraryManager};
use std::collections::HashMap;
use thiserror::Error;

/// errors detected while building the stores from library records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("element '{0}' is defined more than once")]
    DuplicateSymbol(String),
    #[error("atomic number {0} is used by more than one element")]
    DuplicateAtomicNumber(u32),
    #[error("reaction {reaction} has no reactants")]
    EmptyReactantSet { reaction: String },
    #[error("reactant set {0} is defined more than once")]
    DuplicateReactantSet(String),
    #[error("reaction producing {product} uses unknown element '{symbol}'")]
    UnknownReactant { product: String, symbol: String },
    #[error("lesson id {0} is defined more than once")]
    DuplicateLesson(u32),
}

#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<Element>,
    by_symbol: HashMap<String, usize>,
}

impl ElementStore {
    pub fn new(mut elements: Vec<Element>) -> Result<Self, StoreError> {
        elements.sort_by_key(|element| element.atomic_number);
        if let Some(pair) = elements
            .windows(2)
            .find(|pair| pair[0].atomic_number == pair[1].atomic_number)
        {
            return Err(StoreError::DuplicateAtomicNumber(pair[0].atomic_number));
        }

        let mut by_symbol = HashMap::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            if by_symbol.insert(element.symbol.clone(), index).is_some() {
                return Err(StoreError::DuplicateSymbol(element.symbol.clone()));
            }
        }
        Ok(Self {
            elements,
            by_symbol,
        })
    }

    pub fn get_by_symbol(&self, symbol: &str) -> Option<&Element> {
        self.by_symbol
            .get(&normalize_symbol(symbol))
            .map(|&index| &self.elements[index])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get_by_symbol(symbol).is_some()
    }

    /// all elements, ascending atomic number
    pub fn get_all(&self) -> &[Element] {
        &self.elements
    }

    pub fn by_category(&self, category: ElementCategory) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|element| element.category == category)
            .collect()
    }

    /// "Fe (Iron)" for known symbols, the normalized symbol otherwise
    pub fn label(&self, symbol: &str) -> String {
        self.get_by_symbol(symbol)
            .map(Element::label)
            .unwrap_or_else(|| normalize_symbol(symbol))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReactionStore {
    reactions: Vec<Reaction>,
    by_reactants: HashMap<ReactantSet, usize>,
}

impl ReactionStore {
    /// Curated reactions get ids 1, 2, 3... in library order. Every reactant must be a
    /// known element and no reactant set may appear twice.
    pub fn new(mut reactions: Vec<Reaction>, elements: &ElementStore) -> Result<Self, StoreError> {
        let mut by_reactants = HashMap::with_capacity(reactions.len());
        for (index, reaction) in reactions.iter_mut().enumerate() {
            reaction.id = index as i64 + 1;
            if reaction.reactants.is_empty() {
                return Err(StoreError::EmptyReactantSet {
                    reaction: reaction.product.clone(),
                });
            }
            if let Some(symbol) = reaction
                .reactants
                .symbols()
                .iter()
                .find(|symbol| !elements.contains(symbol))
            {
                return Err(StoreError::UnknownReactant {
                    product: reaction.product.clone(),
                    symbol: symbol.clone(),
                });
            }
            if by_reactants
                .insert(reaction.reactants.clone(), index)
                .is_some()
            {
                return Err(StoreError::DuplicateReactantSet(
                    reaction.reactants.to_string(),
                ));
            }
        }
        Ok(Self {
            reactions,
            by_reactants,
        })
    }

    pub fn find_by_reactant_set(&self, reactants: &ReactantSet) -> Option<&Reaction> {
        self.by_reactants
            .get(reactants)
            .map(|&index| &self.reactions[index])
    }

    pub fn find_by_symbols<S: AsRef<str>>(&self, symbols: &[S]) -> Option<&Reaction> {
        self.find_by_reactant_set(&ReactantSet::new(symbols))
    }

    pub fn all(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }
}

/// All read-only stores of the application.
#[derive(Debug, Clone, Default)]
pub struct ChemStore {
    pub elements: ElementStore,
    pub reactions: ReactionStore,
    pub lessons: LessonStore,
}

impl ChemStore {
    pub fn from_records(
        elements: Vec<Element>,
        reactions: Vec<Reaction>,
        lessons: Vec<Lesson>,
    ) -> Result<Self, StoreError> {
        let elements = ElementStore::new(elements)?;
        let reactions = ReactionStore::new(reactions, &elements)?;
        let lessons = LessonStore::new(lessons)?;
        Ok(Self {
            elements,
            reactions,
            lessons,
        })
    }

    /// store built from the libraries shipped inside the binary
    pub fn seeded() -> Result<Self, LibraryError> {
        LibraryManager::embedded().build_store()
    }
}
