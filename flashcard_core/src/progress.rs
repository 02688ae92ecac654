//! Progress tracking - attempt storage and statistics

#[cfg(feature = "python")]
use pyo3::prelude::*;
use chrono::Utc;
use rusqlite::{params, Connection};

use crate::cards::FlashCard;
use crate::error::Result;
use crate::fuzzy::{SimilarityResult, Tier};

/// Aggregate attempt statistics
#[cfg_attr(feature = "python", pyclass)]
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptStats {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub total_attempts: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub exact_count: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub close_count: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub low_count: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub accuracy_percent: f64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub last_attempt_at: Option<String>,
}

#[cfg(feature = "python")]
#[pymethods]
impl AttemptStats {
    fn __repr__(&self) -> String {
        format!(
            "AttemptStats(total={}, exact={}, accuracy={:.1}%)",
            self.total_attempts, self.exact_count, self.accuracy_percent
        )
    }
}

/// Record one scored guess
pub fn save_attempt(
    conn: &Connection,
    card_id: i64,
    guess: &str,
    target: &str,
    result: &SimilarityResult,
) -> Result<()> {
    conn.execute(
        "INSERT INTO attempts (card_id, guess, target, score, tier, attempted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            card_id,
            guess,
            target,
            result.score,
            result.tier.as_str(),
            Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn get_stats(conn: &Connection) -> Result<AttemptStats> {
    let stats = conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(tier = 'exact'), 0),
                COALESCE(SUM(tier = 'close'), 0),
                COALESCE(SUM(tier = 'low'), 0),
                MAX(attempted_at)
         FROM attempts",
        [],
        |row| {
            let total: i64 = row.get(0)?;
            let exact: i64 = row.get(1)?;
            let accuracy = if total > 0 {
                (exact as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            Ok(AttemptStats {
                total_attempts: total,
                exact_count: exact,
                close_count: row.get(2)?,
                low_count: row.get(3)?,
                accuracy_percent: accuracy,
                last_attempt_at: row.get(4)?,
            })
        },
    )?;
    Ok(stats)
}

/// Cards with the most non-exact attempts, most missed first
pub fn get_struggling_words(conn: &Connection, limit: Option<usize>) -> Result<Vec<(FlashCard, i64)>> {
    let limit = limit.map(|l| l as i64).unwrap_or(-1);
    let mut stmt = conn.prepare(
        "SELECT c.id, c.word, c.image_name, c.difficulty, c.category, COUNT(*) AS miss_count
         FROM cards c
         JOIN attempts a ON c.id = a.card_id
         WHERE a.tier != ?1
         GROUP BY c.id
         ORDER BY miss_count DESC, c.word ASC
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(params![Tier::Exact.as_str(), limit], |row| {
            Ok((
                FlashCard {
                    id: row.get(0)?,
                    word: row.get(1)?,
                    image_name: row.get(2)?,
                    difficulty: row.get(3)?,
                    category: row.get(4)?,
                },
                row.get::<_, i64>(5)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Dashboard denominator: one point per card in the catalog
pub fn total_possible_score(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?)
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "save_attempt")]
pub fn py_save_attempt(
    db_path: &str,
    card_id: i64,
    guess: &str,
    target: &str,
    result: SimilarityResult,
) -> PyResult<()> {
    let conn = crate::db::init_database(db_path)?;
    Ok(save_attempt(&conn, card_id, guess, target, &result)?)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "get_stats")]
pub fn py_get_stats(db_path: &str) -> PyResult<AttemptStats> {
    let conn = crate::db::init_database(db_path)?;
    Ok(get_stats(&conn)?)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "get_struggling_words")]
pub fn py_get_struggling_words(db_path: &str, limit: Option<usize>) -> PyResult<Vec<(FlashCard, i64)>> {
    let conn = crate::db::init_database(db_path)?;
    Ok(get_struggling_words(&conn, limit)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_schema, get_cards, seed_builtin_deck};
    use crate::fuzzy::classify;
    use approx::assert_relative_eq;

    fn seeded_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        seed_builtin_deck(&conn).unwrap();
        conn
    }

    fn card(conn: &Connection, word: &str) -> FlashCard {
        get_cards(conn, "a_to_z", None)
            .unwrap()
            .into_iter()
            .find(|c| c.word == word)
            .unwrap()
    }

    fn attempt(conn: &Connection, card: &FlashCard, guess: &str) {
        let result = classify(guess, &card.word);
        save_attempt(conn, card.id, guess, &card.word, &result).unwrap();
    }

    #[test]
    fn test_empty_stats() {
        let conn = seeded_db();
        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.accuracy_percent, 0.0);
        assert!(stats.last_attempt_at.is_none());
    }

    #[test]
    fn test_stats_by_tier() {
        let conn = seeded_db();
        let cat = card(&conn, "Cat");
        attempt(&conn, &cat, "cat");
        attempt(&conn, &cat, "cet");
        attempt(&conn, &cat, "dog");
        attempt(&conn, &cat, "CAT");

        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.total_attempts, 4);
        assert_eq!(stats.exact_count, 2);
        assert_eq!(stats.close_count, 1);
        assert_eq!(stats.low_count, 1);
        assert_relative_eq!(stats.accuracy_percent, 50.0);
        assert!(stats.last_attempt_at.is_some());
    }

    #[test]
    fn test_struggling_words_ordering() {
        let conn = seeded_db();
        let dog = card(&conn, "Dog");
        let horse = card(&conn, "Horse");
        attempt(&conn, &dog, "fog");
        attempt(&conn, &horse, "moose");
        attempt(&conn, &horse, "");
        attempt(&conn, &horse, "horse");

        let struggling = get_struggling_words(&conn, None).unwrap();
        assert_eq!(struggling.len(), 2);
        assert_eq!(struggling[0].0.word, "Horse");
        assert_eq!(struggling[0].1, 2);
        assert_eq!(struggling[1].0.word, "Dog");

        assert_eq!(get_struggling_words(&conn, Some(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_total_possible_score() {
        let conn = seeded_db();
        assert_eq!(
            total_possible_score(&conn).unwrap(),
            crate::cards::Deck::builtin().len() as i64
        );
    }
}
