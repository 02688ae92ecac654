//! Flashcards, categories, and the in-memory deck

#[cfg(feature = "python")]
use pyo3::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Card category shown on the dashboard
#[cfg_attr(feature = "python", pyclass(eq, eq_int))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Animals,
    Fruits,
    Numbers,
    Colors,
    Shapes,
    Actions,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Animals,
        Category::Fruits,
        Category::Numbers,
        Category::Colors,
        Category::Shapes,
        Category::Actions,
    ];

    /// Lowercase key used in storage and config
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Animals => "animals",
            Category::Fruits => "fruits",
            Category::Numbers => "numbers",
            Category::Colors => "colors",
            Category::Shapes => "shapes",
            Category::Actions => "actions",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Animals => "Animals",
            Category::Fruits => "Fruits",
            Category::Numbers => "Numbers",
            Category::Colors => "Colors",
            Category::Shapes => "Shapes",
            Category::Actions => "Actions",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == key)
    }
}

/// A single flashcard
#[cfg_attr(feature = "python", pyclass)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashCard {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub id: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub word: String,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub image_name: String,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub difficulty: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub category: Category,
}

#[cfg(feature = "python")]
#[pymethods]
impl FlashCard {
    fn __repr__(&self) -> String {
        format!(
            "FlashCard(id={}, word='{}', category='{}')",
            self.id,
            self.word,
            self.category.as_str()
        )
    }
}

impl FlashCard {
    pub fn new(word: &str, difficulty: i64, category: Category) -> Self {
        Self {
            id: 0,
            word: word.to_string(),
            image_name: word.to_lowercase(),
            difficulty,
            category,
        }
    }
}

const BUILTIN: &[(&str, i64, Category)] = &[
    ("Apple", 1, Category::Fruits),
    ("Banana", 1, Category::Fruits),
    ("Cat", 1, Category::Animals),
    ("Dog", 1, Category::Animals),
    ("Elephant", 2, Category::Animals),
    ("Fish", 1, Category::Animals),
    ("Giraffe", 2, Category::Animals),
    ("Horse", 1, Category::Animals),
    ("Orange", 1, Category::Fruits),
    ("Grape", 1, Category::Fruits),
    ("One", 1, Category::Numbers),
    ("Two", 1, Category::Numbers),
    ("Three", 1, Category::Numbers),
    ("Red", 1, Category::Colors),
    ("Blue", 1, Category::Colors),
    ("Green", 1, Category::Colors),
    ("Circle", 1, Category::Shapes),
    ("Square", 1, Category::Shapes),
    ("Triangle", 2, Category::Shapes),
    ("Jump", 1, Category::Actions),
    ("Run", 1, Category::Actions),
    ("Clap", 1, Category::Actions),
];

/// Ordered collection of cards a session draws from
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<FlashCard>,
}

impl Deck {
    pub fn new(cards: Vec<FlashCard>) -> Self {
        Self { cards }
    }

    /// Starter deck with ids `1..=n`
    pub fn builtin() -> Self {
        let cards = BUILTIN
            .iter()
            .zip(1..)
            .map(|(&(word, difficulty, category), id)| FlashCard {
                id,
                ..FlashCard::new(word, difficulty, category)
            })
            .collect();
        Self { cards }
    }

    pub fn cards(&self) -> &[FlashCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards_for_category(&self, category: Category) -> Vec<FlashCard> {
        self.cards
            .iter()
            .filter(|c| c.category == category)
            .cloned()
            .collect()
    }

    /// Narrow the deck to one category
    pub fn filtered(&self, category: Category) -> Deck {
        Deck::new(self.cards_for_category(category))
    }

    pub fn random_card<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&FlashCard> {
        self.cards.choose(rng)
    }

    /// Random card other than `current`, unless it is the only card left
    pub fn next_card<R: Rng + ?Sized>(&self, current: &FlashCard, rng: &mut R) -> Option<&FlashCard> {
        let others: Vec<&FlashCard> = self
            .cards
            .iter()
            .filter(|c| c.id != current.id || c.word != current.word)
            .collect();
        if others.is_empty() {
            return self.random_card(rng);
        }
        others.choose(rng).copied()
    }
}
