use tracing::warn;

use crate::domain::entities::view::{is_page_size_choice, DEFAULT_PAGE_SIZE};
use crate::infra::import::csv::CsvParser;

pub const DELIMITER_ENV: &str = "TABEDIT_DELIMITER";
pub const PAGE_SIZE_ENV: &str = "TABEDIT_PAGE_SIZE";
pub const DYNAMIC_TYPING_ENV: &str = "TABEDIT_DYNAMIC_TYPING";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub delimiter: u8,
    pub default_page_size: usize,
    pub dynamic_typing: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            default_page_size: DEFAULT_PAGE_SIZE,
            dynamic_typing: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `lookup`, keeping defaults for missing or bad values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(DELIMITER_ENV) {
            match parse_delimiter(&raw) {
                Some(delimiter) => config.delimiter = delimiter,
                None => warn!(value = %raw, "ignoring invalid {DELIMITER_ENV}"),
            }
        }

        if let Some(raw) = lookup(PAGE_SIZE_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(size) if is_page_size_choice(size) => config.default_page_size = size,
                _ => warn!(value = %raw, "ignoring invalid {PAGE_SIZE_ENV}"),
            }
        }

        if let Some(raw) = lookup(DYNAMIC_TYPING_ENV) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.dynamic_typing = true,
                "0" | "false" | "no" | "off" => config.dynamic_typing = false,
                _ => warn!(value = %raw, "ignoring invalid {DYNAMIC_TYPING_ENV}"),
            }
        }

        config
    }

    pub fn parser(&self) -> CsvParser {
        CsvParser::new(self.delimiter, self.dynamic_typing)
    }
}

fn parse_delimiter(raw: &str) -> Option<u8> {
    match raw {
        "tab" | "\\t" | "\t" => Some(b'\t'),
        "," | ";" | "|" => raw.bytes().next(),
        _ => None,
    }
}
