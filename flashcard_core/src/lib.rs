//! Flashcard Core - Rust core for the spoken-word flashcard game
//!
//! Scores a child's spoken answer against the card's word (fuzzy matching),
//! and provides the card catalog, deck import, progress tracking, and the game
//! session that consumes the scores.

mod cards;
mod config;
mod db;
mod error;
mod excel;
mod fuzzy;
mod progress;
mod session;
mod speech;

pub use cards::{Category, Deck, FlashCard};
pub use config::GameConfig;
pub use db::{
    add_card, create_schema, delete_category, get_card_by_id, get_cards, get_categories, init_database,
    load_cards, load_deck, seed_builtin_deck, CategoryInfo,
};
pub use error::{FlashcardError, Result};
pub use excel::{parse_csv, parse_excel, parse_file, read_cards};
pub use fuzzy::{
    classify, classify_with, edit_distance, similarity_score, SimilarityResult, Thresholds, Tier,
    CLOSE_THRESHOLD, EXACT_THRESHOLD,
};
pub use progress::{get_stats, get_struggling_words, save_attempt, total_possible_score, AttemptStats};
pub use session::{GameSession, RoundOutcome};
pub use speech::{transcript_channel, PendingTranscript, TranscriptSender, TranscriptionSource};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Flashcard Core Python Module
#[cfg(feature = "python")]
#[pymodule]
fn flashcard_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Scoring
    m.add_function(wrap_pyfunction!(fuzzy::py_classify, m)?)?;
    m.add_function(wrap_pyfunction!(fuzzy::py_edit_distance, m)?)?;

    // Catalog
    m.add_function(wrap_pyfunction!(db::py_init_database, m)?)?;
    m.add_function(wrap_pyfunction!(db::py_get_cards, m)?)?;
    m.add_function(wrap_pyfunction!(db::py_get_categories, m)?)?;
    m.add_function(wrap_pyfunction!(db::py_delete_category, m)?)?;

    // Deck import (Excel and CSV)
    m.add_function(wrap_pyfunction!(excel::py_parse_file, m)?)?;

    // Progress tracking
    m.add_function(wrap_pyfunction!(progress::py_save_attempt, m)?)?;
    m.add_function(wrap_pyfunction!(progress::py_get_stats, m)?)?;
    m.add_function(wrap_pyfunction!(progress::py_get_struggling_words, m)?)?;

    m.add_class::<fuzzy::Tier>()?;
    m.add_class::<fuzzy::SimilarityResult>()?;
    m.add_class::<cards::Category>()?;
    m.add_class::<cards::FlashCard>()?;
    m.add_class::<db::CategoryInfo>()?;
    m.add_class::<progress::AttemptStats>()?;

    Ok(())
}
