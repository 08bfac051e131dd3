//! config line grammar
//!
//! A config line describes a single form field:
//!
//! ```text
//! [*] [!] type - key ; [title] = value
//! ```
//!
//! - `*` marks the entry as required
//! - `!` marks the entry as prompted (the value is asked for interactively)
//! - `type` is a [FieldType] name or one of its aliases
//! - `key` is the form's field id (`entry.<key>`), or an arbitrary key for [FieldType::Extra]
//! - `title` is a label for prompts, it falls back to `key` when empty
//! - `value` is the default value, empty means no default
//!
//! Whitespace around every token is ignored.
//!
//! ```
//! # use formfill::entry::{Entry, FieldType};
//! let entry: Entry = "*! time - 1001 ; Time = current".parse().unwrap();
//! assert!(entry.required);
//! assert!(entry.prompt);
//! assert_eq!(entry.field_type, FieldType::Time);
//! assert_eq!(entry.to_string(), "*!time-1001;Time=current");
//! ```
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// All supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Short answer and paragraph questions
    Words,
    /// Multiple choice and dropdown questions
    Choice,
    /// Checkbox questions, multiple values
    Checkboxes,
    /// `MM/DD/YYYY`
    Date,
    /// `HH:MM`
    Time,
    /// Data that is submitted as is, without the `entry.` prefix (e.g. `emailAddress`)
    Extra,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Words,
        FieldType::Choice,
        FieldType::Checkboxes,
        FieldType::Date,
        FieldType::Time,
        FieldType::Extra,
    ];

    /// Canonical name, this is what gets written when serializing an [Entry]
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Words => "words",
            FieldType::Choice => "choice",
            FieldType::Checkboxes => "checkboxes",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Extra => "extra",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            FieldType::Words => &["w", "word", "text"],
            FieldType::Choice => &["m", "mc", "multiple choice"],
            FieldType::Checkboxes => &["c", "checkbox"],
            FieldType::Date => &["d"],
            FieldType::Time => &["t"],
            FieldType::Extra => &["x", "xD", "extra data"],
        }
    }

    /// Resolve a type token (case-sensitive)
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field_type| field_type.name() == token || field_type.aliases().contains(&token))
    }

    /// Hint shown next to the title when prompting
    pub fn prompt_hint(self) -> &'static str {
        match self {
            FieldType::Words => "[Text]",
            FieldType::Choice => "[Multiple Choice]",
            FieldType::Checkboxes => "[Checkboxes (comma-separated)]",
            FieldType::Date => "[Date MM/DD/YYYY or 'today']",
            FieldType::Time => "[Time HH:MM or 'now']",
            FieldType::Extra => "[Extra Data]",
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = EntryParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::from_token(token).ok_or_else(|| EntryParseError::UnknownType(token.to_string()))
    }
}

/// One form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub required: bool,
    pub prompt: bool,
    pub field_type: FieldType,
    pub key: String,
    /// Never empty, falls back to `key`
    pub title: String,
    /// Raw default value, empty means there is none
    pub default_value: String,
}

impl Entry {
    /// Creates an optional, non-prompted entry
    ///
    /// An empty `title` is replaced by `key`.
    pub fn new(
        field_type: FieldType,
        key: impl Into<String>,
        title: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        let key = key.into();
        debug_assert!(!key.is_empty(), "entry key must not be empty");

        let mut title = title.into();
        if title.is_empty() {
            title.clone_from(&key);
        }

        Self {
            required: false,
            prompt: false,
            field_type,
            key,
            title,
            default_value: default_value.into(),
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }
}

impl FromStr for Entry {
    type Err = EntryParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(EntryParseError::EmptyLine);
        }

        let (required, rest) = strip_flag(line, '*');
        if rest.is_empty() {
            return Err(EntryParseError::MissingType);
        }
        let (prompt, rest) = strip_flag(rest, '!');

        let (type_token, rest) = partition(rest, '-');
        if type_token.is_empty() {
            return Err(EntryParseError::MissingType);
        }
        let field_type: FieldType = type_token.parse()?;
        let rest = rest.ok_or(EntryParseError::MissingTypeKeySeparator)?;

        let (key, rest) = partition(rest, ';');
        if key.is_empty() {
            return Err(EntryParseError::MissingKey);
        }
        let rest = rest.ok_or(EntryParseError::MissingKeyTitleSeparator)?;

        let (title, value) = partition(rest, '=');
        let value = value.ok_or(EntryParseError::MissingTitleValueSeparator)?;

        tracing::trace!(%field_type, key, title, value, "parsed entry line");

        Ok(Entry::new(field_type, key, title, value)
            .with_required(required)
            .with_prompt(prompt))
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.required {
            f.write_str("*")?;
        }
        if self.prompt {
            f.write_str("!")?;
        }
        write!(
            f,
            "{}-{};{}={}",
            self.field_type, self.key, self.title, self.default_value
        )
    }
}

/// Strips a leading flag character, returns whether it was present
fn strip_flag(s: &str, flag: char) -> (bool, &str) {
    match s.strip_prefix(flag) {
        Some(rest) => (true, rest.trim_start()),
        None => (false, s),
    }
}

/// Splits on the first `separator`, both halves trimmed
///
/// The second half is `None` when the separator is missing.
fn partition(s: &str, separator: char) -> (&str, Option<&str>) {
    match s.split_once(separator) {
        Some((head, tail)) => (head.trim(), Some(tail.trim())),
        None => (s.trim(), None),
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryParseError {
    #[error("Empty entry")]
    EmptyLine,
    #[error("Missing type")]
    MissingType,
    #[error("Type not valid: {0:?}")]
    UnknownType(String),
    #[error("Missing type/key separator '-'")]
    MissingTypeKeySeparator,
    #[error("Missing key")]
    MissingKey,
    #[error("Missing key/title separator ';'")]
    MissingKeyTitleSeparator,
    #[error("Missing title/value separator '='")]
    MissingTitleValueSeparator,
}
