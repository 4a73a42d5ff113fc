use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One row of the TIOBE index table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStat {
    rank: u32,
    name: String,
    rating: f64,
    change: f64,
}

impl LanguageStat {
    pub fn new(rank: u32, name: String, rating: f64, change: f64) -> Self {
        Self {
            rank,
            name,
            rating,
            change,
        }
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Share of the index, in percent.
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Year-over-year rating delta, in percentage points.
    pub fn change(&self) -> f64 {
        self.change
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl Display for LanguageStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, Rank: {}, Rating: {:.2}%, Change: {:+.2}%",
            self.name, self.rank, self.rating, self.change
        )
    }
}

/// Every row that parsed cleanly from one fetch of the index.
///
/// Row order follows task completion, not the page. Use
/// [`StatTable::sorted_by_rank`] when order matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatTable {
    languages: Vec<LanguageStat>,
}

impl StatTable {
    pub fn new(languages: Vec<LanguageStat>) -> Self {
        Self { languages }
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LanguageStat> {
        self.languages.iter()
    }

    /// First entry whose name equals `name`, ignoring case.
    pub fn find(&self, name: &str) -> Option<&LanguageStat> {
        self.languages.iter().find(|l| l.matches_name(name))
    }

    pub fn sorted_by_rank(mut self) -> Self {
        self.languages.sort_by_key(|l| l.rank);
        self
    }

    pub fn into_inner(self) -> Vec<LanguageStat> {
        self.languages
    }
}

impl Display for StatTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:>4}  {:<24} {:>8} {:>8}",
            "Rank", "Language", "Rating", "Change"
        )?;
        for lang in &self.languages {
            writeln!(
                f,
                "{:>4}  {:<24} {:>7.2}% {:>+7.2}%",
                lang.rank, lang.name, lang.rating, lang.change
            )?;
        }
        Ok(())
    }
}
