//! Card Catalog
//!
//! The immutable set of cards a library supplies at session start.
//! The engine reads it, never writes it: mastery lives in the state store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ============================================================================
// CARD
// ============================================================================

/// A single flashcard as supplied by the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Stable identifier, unique within a catalog
    pub id: String,
    /// Prompt side
    pub front: String,
    /// Answer side
    pub back: String,
    /// Optional subject/domain tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Optional difficulty tag assigned by the library author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl Card {
    /// Create a card without domain or difficulty tags
    pub fn new(id: impl Into<String>, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            front: front.into(),
            back: back.into(),
            domain: None,
            difficulty: None,
        }
    }

    /// Attach a domain tag
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Attach a difficulty tag
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Ordered, validated collection of cards.
///
/// Catalog order is significant: it is the final tie-breaker when two
/// cards are equally due.
#[derive(Debug, Clone)]
pub struct CardCatalog {
    cards: Vec<Card>,
    positions: HashMap<String, usize>,
}

impl CardCatalog {
    /// Build a catalog, rejecting empty input, blank ids and duplicate ids.
    pub fn new(cards: Vec<Card>) -> Result<Self, ConfigError> {
        if cards.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        let mut positions = HashMap::with_capacity(cards.len());
        for (position, card) in cards.iter().enumerate() {
            if card.id.trim().is_empty() {
                return Err(ConfigError::BlankCardId(position));
            }
            if positions.insert(card.id.clone(), position).is_some() {
                return Err(ConfigError::DuplicateCard(card.id.clone()));
            }
        }

        Ok(Self { cards, positions })
    }

    /// Look up a card by id
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.positions.get(id).map(|&i| &self.cards[i])
    }

    /// Position of a card in catalog order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Whether the catalog contains a card id
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Cards in catalog order
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Iterate cards in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Number of cards
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the catalog has no cards; false once `new` has succeeded
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
