//! parsed values
//!
//! A raw string value is parsed into a [Message] according to its [FieldType]:
//!
//! | type                       | accepted input                              | message               |
//! |----------------------------|---------------------------------------------|-----------------------|
//! | words, choice, extra       | anything                                    | the string            |
//! | checkboxes                 | comma separated, no empty choices           | list of choices       |
//! | date                       | `MM/DD/YYYY`, `today`, `current`            | `[month, day, year]`  |
//! | time                       | `HH:MM`, `now`, `current`                   | `[hour, minute]`      |
//!
//! Dates and times have to exist, `02/30/2024` and `24:00` are rejected.
use crate::entry::FieldType;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{ser::SerializeSeq, Serializer};

/// A type-correct value, ready to be formatted into a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Single(String),
    Multiple(Vec<String>),
}

impl Message {
    /// The message of an optional entry that was intentionally left blank
    pub fn empty() -> Self {
        Message::Single(String::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Message::Single(value) => value.is_empty(),
            Message::Multiple(values) => values.is_empty(),
        }
    }

    /// All values in order, a single message yields one value
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            Message::Single(value) => std::slice::from_ref(value),
            Message::Multiple(values) => values,
        };
        values.iter().map(String::as_str)
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Message::Single(value)
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Message::Single(value.to_string())
    }
}

impl<T: Into<String>> From<Vec<T>> for Message {
    fn from(values: Vec<T>) -> Self {
        Message::Multiple(values.into_iter().map(Into::into).collect())
    }
}

impl serde::ser::Serialize for Message {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Message::Single(value) => serializer.serialize_str(value),
            Message::Multiple(values) => {
                let mut ser = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    ser.serialize_element(value)?;
                }
                ser.end()
            }
        }
    }
}

/// Parse a raw value using the local clock for `today`/`now`
pub fn parse_value(value: &str, field_type: FieldType) -> Result<Message, ValueError> {
    parse_value_at(value, field_type, chrono::Local::now().naive_local())
}

/// Parse a raw value, `now` is used to resolve `today`/`now`/`current`
pub fn parse_value_at(
    value: &str,
    field_type: FieldType,
    now: NaiveDateTime,
) -> Result<Message, ValueError> {
    match field_type {
        FieldType::Words | FieldType::Choice | FieldType::Extra => Ok(value.into()),
        FieldType::Checkboxes => parse_checkboxes(value),
        FieldType::Date => parse_date(value, now.date()),
        FieldType::Time => parse_time(value, now.time()),
    }
}

fn parse_checkboxes(value: &str) -> Result<Message, ValueError> {
    let choices: Vec<&str> = value.split(',').map(str::trim).collect();
    if choices.iter().any(|choice| choice.is_empty()) {
        return Err(ValueError::EmptyChoice(value.to_string()));
    }
    Ok(choices.into())
}

fn parse_date(value: &str, today: NaiveDate) -> Result<Message, ValueError> {
    let value = match value {
        "current" | "today" => today.format("%m/%d/%Y").to_string(),
        _ => value.to_string(),
    };

    let bad_format = |reason| ValueError::BadDateFormat {
        value: value.clone(),
        reason,
    };

    let [month, day, year] = split_fields(&value, '/', [2, 2, 4])
        .ok_or_else(|| bad_format("expected MM/DD/YYYY"))?;

    let (Ok(m), Ok(d), Ok(y)) =
        (month.parse::<u32>(), day.parse::<u32>(), year.parse::<i32>())
    else {
        return Err(bad_format("expected MM/DD/YYYY"));
    };
    // chrono has a year 0, calendars start at year 1
    if y < 1 || NaiveDate::from_ymd_opt(y, m, d).is_none() {
        return Err(bad_format("date does not exist"));
    }

    Ok(vec![month, day, year].into())
}

fn parse_time(value: &str, now: NaiveTime) -> Result<Message, ValueError> {
    let value = match value {
        "current" | "now" => now.format("%H:%M").to_string(),
        _ => value.to_string(),
    };

    let bad_format = |reason| ValueError::BadTimeFormat {
        value: value.clone(),
        reason,
    };

    let [hour, minute] =
        split_fields(&value, ':', [2, 2]).ok_or_else(|| bad_format("expected HH:MM"))?;

    let (Ok(h), Ok(m)) = (hour.parse::<u32>(), minute.parse::<u32>()) else {
        return Err(bad_format("expected HH:MM"));
    };
    if NaiveTime::from_hms_opt(h, m, 0).is_none() {
        return Err(bad_format("time does not exist"));
    }

    Ok(vec![hour, minute].into())
}

/// Splits `value` into exactly `N` all-digit fields of the given widths
fn split_fields<const N: usize>(
    value: &str,
    separator: char,
    widths: [usize; N],
) -> Option<[String; N]> {
    let fields: Vec<&str> = value.split(separator).collect();
    if fields.len() != N {
        return None;
    }

    let valid = fields.iter().zip(widths).all(|(field, width)| {
        field.len() == width && field.bytes().all(|b| b.is_ascii_digit())
    });
    if !valid {
        return None;
    }

    Some(std::array::from_fn(|i| fields[i].to_string()))
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Empty choice in value: {0:?}")]
    EmptyChoice(String),
    #[error("Incorrect date {value:?}: {reason}")]
    BadDateFormat { value: String, reason: &'static str },
    #[error("Incorrect time {value:?}: {reason}")]
    BadTimeFormat { value: String, reason: &'static str },
}
