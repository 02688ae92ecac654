//! Deck import from Excel and CSV files

#[cfg(feature = "python")]
use pyo3::prelude::*;
use calamine::{open_workbook, Data, Reader, Xlsx};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::path::Path;

use crate::cards::{Category, FlashCard};
use crate::error::{FlashcardError, Result};

/// Import cards from `file_path` into the catalog; rows without a category use `default_category`
pub fn parse_file(conn: &Connection, file_path: &str, default_category: Category) -> Result<usize> {
    let cards = read_cards(file_path, default_category)?;
    let count = crate::db::load_cards(conn, &cards)?;
    tracing::info!(file = file_path, count, "imported cards");
    Ok(count)
}

/// Read cards from an `.xlsx`/`.xls` or `.csv` file
pub fn read_cards(file_path: &str, default_category: Category) -> Result<Vec<FlashCard>> {
    let extension = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xls" => parse_excel(file_path, default_category),
        "csv" => parse_csv(file_path, default_category),
        _ => Err(FlashcardError::Import(format!("Unsupported file format: .{}", extension))),
    }
}

/// Column index mapping
#[derive(Debug, Default, Clone)]
struct ColumnMapping {
    word: usize,
    image: Option<usize>,
    difficulty: Option<usize>,
    category: Option<usize>,
}

fn detect_columns(headers: &[String]) -> Result<ColumnMapping> {
    let mut mapping = ColumnMapping::default();
    let mut word_found = false;

    for (i, header) in headers.iter().enumerate() {
        match header.trim().to_lowercase().as_str() {
            "word" | "words" => {
                mapping.word = i;
                word_found = true;
            }
            "image" | "image_name" | "picture" => mapping.image = Some(i),
            "difficulty" | "level" => mapping.difficulty = Some(i),
            "category" => mapping.category = Some(i),
            _ => {}
        }
    }

    if !word_found {
        return Err(FlashcardError::Import(
            "Missing required 'Word' column in file header".to_string(),
        ));
    }
    Ok(mapping)
}

/// Turn one row of cell text into a card, or `None` if the row is skipped
fn card_from_cells(
    cells: &[String],
    mapping: &ColumnMapping,
    default_category: Category,
    line: usize,
) -> Option<FlashCard> {
    let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).map(|s| s.trim()).filter(|s| !s.is_empty());

    let word = cell(Some(mapping.word))?;

    let category = match cell(mapping.category) {
        Some(name) => match Category::parse(name) {
            Some(c) => c,
            None => {
                tracing::warn!(line, category = name, "unknown category, row skipped");
                return None;
            }
        },
        None => default_category,
    };

    let difficulty = cell(mapping.difficulty)
        .and_then(|d| d.parse::<f64>().ok())
        .map(|d| (d as i64).max(1))
        .unwrap_or(1);

    let mut card = FlashCard::new(word, difficulty, category);
    if let Some(image) = cell(mapping.image) {
        card.image_name = image.to_string();
    }
    Some(card)
}

pub fn parse_excel(file_path: &str, default_category: Category) -> Result<Vec<FlashCard>> {
    let mut workbook: Xlsx<_> = open_workbook(file_path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| FlashcardError::Import("No sheets found in Excel file".to_string()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| FlashcardError::Import("Empty file - no header row".to_string()))?;
    let headers: Vec<String> = header_row.iter().map(get_cell_string).collect();
    let mapping = detect_columns(&headers)?;

    let cards = rows
        .enumerate()
        .filter_map(|(i, row)| {
            let cells: Vec<String> = row.iter().map(get_cell_string).collect();
            card_from_cells(&cells, &mapping, default_category, i + 2)
        })
        .collect();
    Ok(cards)
}

pub fn parse_csv(file_path: &str, default_category: Category) -> Result<Vec<FlashCard>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(file_path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    let mapping = detect_columns(&headers)?;

    let mut cards = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let cells: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        if let Some(card) = card_from_cells(&cells, &mapping, default_category, i + 2) {
            cards.push(card);
        }
    }
    Ok(cards)
}

fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "parse_file")]
pub fn py_parse_file(db_path: &str, file_path: &str, category: Option<&str>) -> PyResult<usize> {
    let category = category.and_then(Category::parse).unwrap_or(Category::Animals);
    let conn = crate::db::init_database(db_path)?;
    Ok(parse_file(&conn, file_path, category)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_csv_import_with_all_columns() {
        let file = write_csv("Word,Image,Difficulty,Category\nZebra,zebra_img,2,animals\nKiwi,,,fruits\n");
        let cards = read_cards(file.path().to_str().unwrap(), Category::Animals).unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].word, "Zebra");
        assert_eq!(cards[0].image_name, "zebra_img");
        assert_eq!(cards[0].difficulty, 2);
        assert_eq!(cards[1].image_name, "kiwi");
        assert_eq!(cards[1].difficulty, 1);
        assert_eq!(cards[1].category, Category::Fruits);
    }

    #[test]
    fn test_csv_skips_blank_and_unknown_rows() {
        let file = write_csv("category,word\nanimals,Lion\n,\nvehicles,Car\n,Star\n");
        let cards = read_cards(file.path().to_str().unwrap(), Category::Shapes).unwrap();

        let words: Vec<&str> = cards.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, ["Lion", "Star"]);
        assert_eq!(cards[1].category, Category::Shapes);
    }

    #[test]
    fn test_xlsx_import() {
        // Word | Difficulty | Category | Image, with a blank-word row and an unknown category
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/deck.xlsx");
        let cards = read_cards(path, Category::Shapes).unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].word, "Zebra");
        assert_eq!(cards[0].difficulty, 2);
        assert_eq!(cards[0].category, Category::Animals);
        assert_eq!(cards[0].image_name, "zebra_img");
        assert_eq!(cards[1].word, "Kiwi");
        assert_eq!(cards[1].difficulty, 1);
        assert_eq!(cards[1].category, Category::Fruits);
        assert_eq!(cards[1].image_name, "kiwi");
    }

    #[test]
    fn test_cell_strings() {
        assert_eq!(get_cell_string(&Data::Float(2.0)), "2");
        assert_eq!(get_cell_string(&Data::Int(3)), "3");
        assert_eq!(get_cell_string(&Data::String("  Cat ".to_string())), "Cat");
        assert_eq!(get_cell_string(&Data::Empty), "");
    }

    #[test]
    fn test_missing_word_column() {
        let file = write_csv("image,category\nx,animals\n");
        let err = read_cards(file.path().to_str().unwrap(), Category::Animals).unwrap_err();
        assert!(matches!(err, FlashcardError::Import(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = read_cards("deck.txt", Category::Animals).unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn test_parse_file_stores_cards() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::create_schema(&conn).unwrap();
        let file = write_csv("word\nPurple\nYellow\n");

        let count = parse_file(&conn, file.path().to_str().unwrap(), Category::Colors).unwrap();
        assert_eq!(count, 2);
        let colors = crate::db::get_cards(&conn, "a_to_z", Some(Category::Colors)).unwrap();
        assert_eq!(colors.len(), 2);
    }
}
