pub mod parser;
pub mod scraper;
pub mod types;

pub use scraper::{ScraperError, WebScraper};

pub(crate) const BASE_URL: &str = "https://www.tiobe.com";
pub(crate) const INDEX_PATH: &str = "/tiobe-index/";
