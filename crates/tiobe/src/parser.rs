use std::num::{ParseFloatError, ParseIntError};
use std::sync::{Arc, Mutex, PoisonError};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use scraper::{ElementRef, Html, Selector};

use crate::types::{LanguageStat, StatTable};

const ROW_SELECTOR: &str = "table#top20 tbody tr";
const CELL_SELECTOR: &str = "td";

const RANK_COLUMN: usize = 0;
const NAME_COLUMN: usize = 4;
const RATING_COLUMN: usize = 5;
const CHANGE_COLUMN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Why a single table row was left out of the result.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("Missing column {0}")]
    MissingCell(usize),
    #[error("Empty language name")]
    EmptyName,
    #[error("Failed to parse rank '{text}': {source}")]
    Rank {
        text: String,
        source: ParseIntError,
    },
    #[error("Failed to parse rating '{text}': {source}")]
    Rating {
        text: String,
        source: ParseFloatError,
    },
    #[error("Failed to parse change '{text}': {source}")]
    Change {
        text: String,
        source: ParseFloatError,
    },
}

fn parse_selector(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::Selector(format!("{selector}: {e:?}")))
}

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// Cell texts of every `top20` body row, in page order.
///
/// `Html` is not `Send`, so the document is dropped here before any row
/// work is handed to other tasks.
fn collect_rows(html: &str) -> Result<Vec<Vec<String>>, ParseError> {
    let row_sel = parse_selector(ROW_SELECTOR)?;
    let cell_sel = parse_selector(CELL_SELECTOR)?;

    let document = Html::parse_document(html);
    let rows = document
        .select(&row_sel)
        .map(|row| row.select(&cell_sel).map(elem_text).collect())
        .collect();

    Ok(rows)
}

fn parse_percent(text: &str) -> Result<f64, ParseFloatError> {
    let text = text.trim();
    text.strip_suffix('%').unwrap_or(text).parse()
}

fn parse_row(cells: &[String]) -> Result<LanguageStat, RowError> {
    let cell = |column: usize| {
        cells
            .get(column)
            .map(String::as_str)
            .ok_or(RowError::MissingCell(column))
    };

    let rank_text = cell(RANK_COLUMN)?.trim();
    let rank = rank_text.parse::<u32>().map_err(|source| RowError::Rank {
        text: rank_text.to_string(),
        source,
    })?;

    let name = cell(NAME_COLUMN)?;
    if name.trim().is_empty() {
        return Err(RowError::EmptyName);
    }

    let rating_text = cell(RATING_COLUMN)?;
    let rating = parse_percent(rating_text).map_err(|source| RowError::Rating {
        text: rating_text.to_string(),
        source,
    })?;

    let change_text = cell(CHANGE_COLUMN)?;
    let change = parse_percent(change_text).map_err(|source| RowError::Change {
        text: change_text.to_string(),
        source,
    })?;

    Ok(LanguageStat::new(rank, name.to_string(), rating, change))
}

/// Parses every row of the `top20` table, one spawned task per row.
///
/// Rows that fail to parse are logged and left out; they never fail the
/// call. A page without the table yields an empty [`StatTable`]. Must be
/// called from within a tokio runtime.
pub async fn extract_all(html: &str) -> Result<StatTable, ParseError> {
    let rows = collect_rows(html)?;
    let matched = rows.len();
    let table = Arc::new(Mutex::new(Vec::with_capacity(matched)));

    let mut tasks: FuturesUnordered<_> = rows
        .into_iter()
        .enumerate()
        .map(|(index, cells)| {
            let table = Arc::clone(&table);
            tokio::spawn(async move {
                match parse_row(&cells) {
                    Ok(stat) => table
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(stat),
                    Err(e) => log::warn!("Skipping row {}: {}", index + 1, e),
                }
            })
        })
        .collect();

    while let Some(result) = tasks.next().await {
        if let Err(e) = result {
            log::error!("Row task failed: {e}");
        }
    }

    let languages = std::mem::take(&mut *table.lock().unwrap_or_else(PoisonError::into_inner));
    log::debug!("Extracted {} of {} table rows", languages.len(), matched);

    Ok(StatTable::new(languages))
}
