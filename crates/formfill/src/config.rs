//! config files
//!
//! The first line holds the form reference (see [crate::url::to_form_url]), every other
//! non-blank line that does not start with `#` is an [Entry]:
//!
//! ```text
//! https://docs.google.com/forms/d/e/.../viewform
//! # comment
//! w-1000;Question=Default
//! ! time - 1001 ; Time = current
//! *multiple choice - 1002 ; Class =
//! checkbox-1003; Languages = Python, Java, C++
//! *! extra-emailAddress; Email Address =
//! ```
//!
//! Entries must not send the same form field twice, e.g. `w-1000` twice, or `c-1000` next to
//! `mc-1000`.
use crate::entry::{Entry, EntryParseError};
use crate::payload::field_names;
use crate::url::{to_form_url, UrlError};
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Submission (`formResponse`) url
    pub url: String,
    pub entries: Vec<Entry>,
}

impl Config {
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!(path=%path.display(), "loading config");
        let contents = std::fs::read_to_string(path)?;
        contents.parse()
    }

    pub fn prompt_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.prompt).count()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        let mut lines = contents.lines();
        let url = lines.next().ok_or(ConfigError::MissingUrl)?;
        let url = to_form_url(url)?;

        let entries = parse_lines(lines, 2)?;
        tracing::debug!(%url, entries = entries.len(), "config loaded");

        Ok(Config { url, entries })
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.url)?;
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Parse a stream of entry lines (no url line)
pub fn parse_entries(contents: &str) -> Result<Vec<Entry>, ConfigError> {
    parse_lines(contents.lines(), 1)
}

fn parse_lines<'a>(
    lines: impl Iterator<Item = &'a str>,
    first_line_number: usize,
) -> Result<Vec<Entry>, ConfigError> {
    let mut entries = vec![];
    // form field -> line sending it
    let mut fields: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for (line_number, text) in (first_line_number..).zip(lines) {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let entry: Entry = trimmed.parse().map_err(|source| ConfigError::Entry {
            line: line_number,
            text: trimmed.to_string(),
            source,
        })?;

        for field in field_names(&entry.key, entry.field_type) {
            if let Some(&first_line) = fields.get(&field) {
                return Err(ConfigError::DuplicateField {
                    line: line_number,
                    first_line,
                    field,
                });
            }
            fields.insert(field, line_number);
        }
        entries.push(entry);
    }

    Ok(entries)
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Config is empty, the first line must be the form url")]
    MissingUrl,
    #[error("Invalid form url on line 1")]
    Url(#[from] UrlError),
    #[error("Invalid entry on line {line}: {text:?}")]
    Entry {
        line: usize,
        text: String,
        #[source]
        source: EntryParseError,
    },
    #[error("Entry on line {line} sends {field:?} which line {first_line} already sends")]
    DuplicateField {
        line: usize,
        first_line: usize,
        field: String,
    },
    #[error("IO error")]
    IoError(#[from] std::io::Error),
}
