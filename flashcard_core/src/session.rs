//! Game loop state: current card, score, and round outcomes

use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cards::{Deck, FlashCard};
use crate::config::GameConfig;
use crate::error::{FlashcardError, Result};
use crate::fuzzy::{classify_with, SimilarityResult, Thresholds};
use crate::progress::save_attempt;
use crate::speech::TranscriptionSource;

/// Stops the source when the listen ends, including when the `listen` future is dropped
struct StopOnDrop<'a, S: TranscriptionSource + ?Sized> {
    source: &'a mut S,
}

impl<S: TranscriptionSource + ?Sized> Drop for StopOnDrop<'_, S> {
    fn drop(&mut self) {
        self.source.stop_listening();
    }
}

/// What happened when a guess was scored
#[derive(Debug, Clone, Serialize)]
pub struct RoundOutcome {
    pub guess: String,
    pub card: FlashCard,
    pub result: SimilarityResult,
    pub feedback: &'static str,
    pub correct: bool,
    /// Card shown next, set only when the answer counted
    pub next_card: Option<FlashCard>,
}

pub struct GameSession {
    deck: Deck,
    current: FlashCard,
    score: u32,
    rounds: u32,
    thresholds: Thresholds,
    record_attempts: bool,
    rng: StdRng,
    store: Option<Connection>,
}

impl GameSession {
    pub fn new(deck: Deck, config: &GameConfig) -> Result<Self> {
        Self::with_rng(deck, config, StdRng::from_entropy())
    }

    /// Session with a caller-provided RNG (deterministic card order in tests)
    pub fn with_rng(deck: Deck, config: &GameConfig, mut rng: StdRng) -> Result<Self> {
        let thresholds = config.thresholds()?;
        let deck = match config.category {
            Some(category) => deck.filtered(category),
            None => deck,
        };
        let current = deck.random_card(&mut rng).cloned().ok_or_else(|| {
            let label = config.category.map(|c| c.as_str()).unwrap_or("all");
            FlashcardError::EmptyDeck(label.to_string())
        })?;

        info!(cards = deck.len(), first = %current.word, "game session started");
        Ok(Self {
            deck,
            current,
            score: 0,
            rounds: 0,
            thresholds,
            record_attempts: config.record_attempts,
            rng,
            store: None,
        })
    }

    /// Record every round into the `attempts` table of `conn`
    pub fn with_store(mut self, conn: Connection) -> Self {
        self.store = Some(conn);
        self
    }

    pub fn store(&self) -> Option<&Connection> {
        self.store.as_ref()
    }

    pub fn current_card(&self) -> &FlashCard {
        &self.current
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Score a finalized transcript against the current card
    pub fn submit_guess(&mut self, guess: &str) -> Result<RoundOutcome> {
        let card = self.current.clone();
        let result = classify_with(guess, &card.word, &self.thresholds);
        debug!(
            guess,
            target = %card.word,
            score = result.score,
            tier = result.tier.as_str(),
            "guess classified"
        );

        if self.record_attempts {
            if let Some(conn) = &self.store {
                save_attempt(conn, card.id, guess, &card.word, &result)?;
            }
        }
        self.rounds += 1;

        let correct = result.tier.is_correct();
        let next_card = if correct {
            self.score += 1;
            Some(self.advance().clone())
        } else {
            None
        };

        Ok(RoundOutcome {
            guess: guess.to_string(),
            card,
            result,
            feedback: result.tier.feedback(),
            correct,
            next_card,
        })
    }

    /// Move on without scoring
    pub fn skip(&mut self) -> &FlashCard {
        self.advance()
    }

    fn advance(&mut self) -> &FlashCard {
        if let Some(next) = self.deck.next_card(&self.current, &mut self.rng) {
            self.current = next.clone();
        }
        info!(word = %self.current.word, score = self.score, "next card");
        &self.current
    }

    /// Listen for one answer and score it. `Ok(None)` if the listen was abandoned.
    pub async fn listen<S>(&mut self, source: &mut S) -> Result<Option<RoundOutcome>>
    where
        S: TranscriptionSource + ?Sized,
    {
        let pending = source.start_listening()?;
        let listening = StopOnDrop { source };
        let transcript = pending.finalized().await;
        drop(listening);

        match transcript {
            Some(text) => self.submit_guess(&text).map(Some),
            None => {
                warn!(word = %self.current.word, "listen ended without a transcript");
                Ok(None)
            }
        }
    }
}
