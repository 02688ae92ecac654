//! SQLite card catalog

#[cfg(feature = "python")]
use pyo3::prelude::*;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Row};

use crate::cards::{Category, Deck, FlashCard};
use crate::error::{FlashcardError, Result};

/// Category name with its card count
#[cfg_attr(feature = "python", pyclass)]
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryInfo {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub category: Category,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub card_count: i64,
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Category::parse(text).ok_or(FromSqlError::InvalidType)
    }
}

/// Open (or create) the database at `db_path` and ensure the schema exists
pub fn init_database(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    create_schema(&conn)?;
    Ok(conn)
}

pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT NOT NULL,
            image_name TEXT NOT NULL DEFAULT '',
            difficulty INTEGER NOT NULL DEFAULT 1,
            category TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        CREATE TABLE IF NOT EXISTS attempts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            card_id INTEGER REFERENCES cards(id),
            guess TEXT NOT NULL,
            target TEXT NOT NULL,
            score REAL NOT NULL,
            tier TEXT NOT NULL,
            attempted_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_attempts_card ON attempts(card_id);",
    )?;
    Ok(())
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<FlashCard> {
    Ok(FlashCard {
        id: row.get(0)?,
        word: row.get(1)?,
        image_name: row.get(2)?,
        difficulty: row.get(3)?,
        category: row.get(4)?,
    })
}

/// Insert cards, returning how many were stored
pub fn load_cards(conn: &Connection, cards: &[FlashCard]) -> Result<usize> {
    let mut stmt = conn.prepare(
        "INSERT INTO cards (word, image_name, difficulty, category) VALUES (?1, ?2, ?3, ?4)",
    )?;
    let mut count = 0;
    for card in cards {
        stmt.execute(params![card.word, card.image_name, card.difficulty, card.category])?;
        count += 1;
    }
    Ok(count)
}

pub fn add_card(conn: &Connection, card: &FlashCard) -> Result<i64> {
    conn.execute(
        "INSERT INTO cards (word, image_name, difficulty, category) VALUES (?1, ?2, ?3, ?4)",
        params![card.word, card.image_name, card.difficulty, card.category],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Cards in the given order (`a_to_z`, `z_to_a`, `difficulty`, `random`), optionally one category
pub fn get_cards(conn: &Connection, order: &str, category: Option<Category>) -> Result<Vec<FlashCard>> {
    let order_clause = match order.to_lowercase().as_str() {
        "z_to_a" => " ORDER BY word DESC",
        "difficulty" => " ORDER BY difficulty ASC, word ASC",
        "random" => " ORDER BY RANDOM()",
        _ => " ORDER BY word ASC",
    };
    let query = format!(
        "SELECT id, word, image_name, difficulty, category FROM cards WHERE (?1 IS NULL OR category = ?1){}",
        order_clause
    );

    let mut stmt = conn.prepare(&query)?;
    let cards = stmt
        .query_map(params![category], card_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

pub fn get_card_by_id(conn: &Connection, card_id: i64) -> Result<Option<FlashCard>> {
    let result = conn.query_row(
        "SELECT id, word, image_name, difficulty, category FROM cards WHERE id = ?1",
        params![card_id],
        card_from_row,
    );

    match result {
        Ok(card) => Ok(Some(card)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_categories(conn: &Connection) -> Result<Vec<CategoryInfo>> {
    let mut stmt = conn.prepare(
        "SELECT category, COUNT(*) FROM cards GROUP BY category ORDER BY category",
    )?;
    let categories = stmt
        .query_map([], |row| {
            Ok(CategoryInfo {
                category: row.get(0)?,
                card_count: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(categories)
}

/// Delete a category's cards and their attempts
pub fn delete_category(conn: &Connection, category: Category) -> Result<usize> {
    conn.execute(
        "DELETE FROM attempts WHERE card_id IN (SELECT id FROM cards WHERE category = ?1)",
        params![category],
    )?;
    let deleted = conn.execute("DELETE FROM cards WHERE category = ?1", params![category])?;
    tracing::info!(category = category.as_str(), deleted, "category deleted");
    Ok(deleted)
}

/// Store the starter deck if the catalog is empty. Returns cards inserted.
pub fn seed_builtin_deck(conn: &Connection) -> Result<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(0);
    }
    let inserted = load_cards(conn, Deck::builtin().cards())?;
    tracing::info!(inserted, "seeded builtin deck");
    Ok(inserted)
}

/// Deck for a session, failing when nothing matches
pub fn load_deck(conn: &Connection, category: Option<Category>) -> Result<Deck> {
    let cards = get_cards(conn, "a_to_z", category)?;
    if cards.is_empty() {
        let label = category.map(Category::as_str).unwrap_or("all");
        return Err(FlashcardError::EmptyDeck(label.to_string()));
    }
    Ok(Deck::new(cards))
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "init_database")]
pub fn py_init_database(db_path: &str, seed: Option<bool>) -> PyResult<usize> {
    let conn = init_database(db_path)?;
    if seed.unwrap_or(true) {
        return Ok(seed_builtin_deck(&conn)?);
    }
    Ok(0)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "get_cards")]
pub fn py_get_cards(db_path: &str, order: Option<&str>, category: Option<&str>) -> PyResult<Vec<FlashCard>> {
    let conn = Connection::open(db_path).map_err(FlashcardError::from)?;
    let category = match category {
        Some(name) => Some(Category::parse(name).ok_or_else(|| {
            pyo3::exceptions::PyValueError::new_err(format!("Unknown category: {}", name))
        })?),
        None => None,
    };
    Ok(get_cards(&conn, order.unwrap_or("a_to_z"), category)?)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "get_categories")]
pub fn py_get_categories(db_path: &str) -> PyResult<Vec<CategoryInfo>> {
    let conn = Connection::open(db_path).map_err(FlashcardError::from)?;
    Ok(get_categories(&conn)?)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "delete_category")]
pub fn py_delete_category(db_path: &str, category: Category) -> PyResult<usize> {
    let conn = Connection::open(db_path).map_err(FlashcardError::from)?;
    Ok(delete_category(&conn, category)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_seed_is_idempotent() {
        let conn = memory_db();
        let first = seed_builtin_deck(&conn).unwrap();
        assert_eq!(first, Deck::builtin().len());
        assert_eq!(seed_builtin_deck(&conn).unwrap(), 0);
    }

    #[test]
    fn test_get_cards_by_category_and_order() {
        let conn = memory_db();
        seed_builtin_deck(&conn).unwrap();

        let animals = get_cards(&conn, "a_to_z", Some(Category::Animals)).unwrap();
        let words: Vec<&str> = animals.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, ["Cat", "Dog", "Elephant", "Fish", "Giraffe", "Horse"]);

        let reversed = get_cards(&conn, "z_to_a", Some(Category::Animals)).unwrap();
        assert_eq!(reversed.first().unwrap().word, "Horse");

        let all = get_cards(&conn, "random", None).unwrap();
        assert_eq!(all.len(), Deck::builtin().len());
    }

    #[test]
    fn test_add_and_fetch_card() {
        let conn = memory_db();
        let id = add_card(&conn, &FlashCard::new("Zebra", 2, Category::Animals)).unwrap();
        let card = get_card_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(card.word, "Zebra");
        assert_eq!(card.image_name, "zebra");
        assert_eq!(card.category, Category::Animals);
        assert!(get_card_by_id(&conn, id + 100).unwrap().is_none());
    }

    #[test]
    fn test_categories_and_delete() {
        let conn = memory_db();
        seed_builtin_deck(&conn).unwrap();

        let cats = get_categories(&conn).unwrap();
        assert_eq!(cats.len(), 6);
        let fruits = cats.iter().find(|c| c.category == Category::Fruits).unwrap();
        assert_eq!(fruits.card_count, 4);

        assert_eq!(delete_category(&conn, Category::Fruits).unwrap(), 4);
        assert!(matches!(
            load_deck(&conn, Some(Category::Fruits)),
            Err(FlashcardError::EmptyDeck(_))
        ));
        assert!(load_deck(&conn, None).is_ok());
    }
}
