//! value resolution
//!
//! Turns an [Entry] into a [Message]:
//!
//! 1. prompted entries ask a [Prompter] for a candidate, others use the default value
//! 2. an empty candidate falls back to the default value, unless the entry is required and has no default
//! 3. the resulting value is parsed according to the field type
//!
//! An optional entry without default that was left blank is skipped: it resolves to [Message::empty]
//! without being parsed. Anything else that does not parse is an error, blank input is not
//! a reason to swallow a bad default.
//!
//! Prompted entries are asked again until they resolve, [Prompter::report] is told about each
//! rejected value. Entries using defaults fail immediately, an invalid default is a config error.
use crate::entry::Entry;
use crate::message::{parse_value_at, Message, ValueError};
use chrono::NaiveDateTime;

/// Source of interactive input
pub trait Prompter {
    /// Ask for a raw value, may return an empty string
    fn prompt(&mut self, entry: &Entry) -> std::io::Result<String>;

    /// Called with every rejected value, before prompting again
    fn report(&mut self, _entry: &Entry, _error: &ResolveError) {}
}

/// Time used to resolve `today`/`now`
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Local,
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::Local => chrono::Local::now().naive_local(),
            Clock::Fixed(now) => *now,
        }
    }
}

/// Resolve a candidate value for an entry
///
/// `candidate` is the prompted input, or the default value for entries that are not prompted.
pub fn resolve_value_at(
    entry: &Entry,
    candidate: &str,
    now: NaiveDateTime,
) -> Result<Message, ResolveError> {
    let value = if candidate.is_empty() {
        if entry.required && entry.default_value.is_empty() {
            return Err(ResolveError::RequiredValueMissing {
                title: entry.title.clone(),
            });
        }
        entry.default_value.as_str()
    } else {
        candidate
    };

    if value.is_empty() {
        // optional, no default and left blank on purpose
        return Ok(Message::empty());
    }

    parse_value_at(value, entry.field_type, now).map_err(|source| ResolveError::InvalidValue {
        title: entry.title.clone(),
        source,
    })
}

#[derive(derive_new::new)]
pub struct Resolver<P> {
    prompter: P,
    #[new(default)]
    clock: Clock,
}

impl<P: Prompter> Resolver<P> {
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Resolve a single entry, prompting until a valid value is given
    #[tracing::instrument(level = "debug", skip_all, fields(key = %entry.key))]
    pub fn resolve(&mut self, entry: &Entry) -> Result<Message, ResolveError> {
        if !entry.prompt {
            return resolve_value_at(entry, &entry.default_value, self.clock.now());
        }

        loop {
            // prompt failures are not retried
            let candidate = self.prompter.prompt(entry)?;

            match resolve_value_at(entry, &candidate, self.clock.now()) {
                Ok(message) => return Ok(message),
                Err(error) => {
                    tracing::debug!(%error, ?candidate, "value rejected");
                    self.prompter.report(entry, &error);
                }
            }
        }
    }

    /// Resolve entries in order, stops at the first failure
    pub fn resolve_all(&mut self, entries: &[Entry]) -> Result<Vec<Message>, ResolveError> {
        entries
            .iter()
            .map(|entry| {
                let message = self.resolve(entry)?;
                tracing::debug!(key = %entry.key, ?message, "entry resolved");
                Ok(message)
            })
            .collect()
    }
}

/// Prompter for configs without prompted entries
///
/// Fails when asked for a value.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn prompt(&mut self, entry: &Entry) -> std::io::Result<String> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("entry '{}' needs a prompt", entry.title),
        ))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("Value for entry '{title}' is required")]
    RequiredValueMissing { title: String },
    #[error("Invalid value for entry '{title}'")]
    InvalidValue {
        title: String,
        #[source]
        source: ValueError,
    },
    #[error("Failed to read value")]
    Prompt(#[from] std::io::Error),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entry::FieldType;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap()
    }

    fn resolve(entry: &Entry, candidate: &str) -> Result<Message, ResolveError> {
        resolve_value_at(entry, candidate, now())
    }

    /// Replays canned answers and records reported errors
    #[derive(Default)]
    struct Scripted {
        answers: VecDeque<&'static str>,
        prompted: usize,
        reported: Vec<String>,
    }

    impl Scripted {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                ..Default::default()
            }
        }
    }

    impl Prompter for Scripted {
        fn prompt(&mut self, _entry: &Entry) -> std::io::Result<String> {
            self.prompted += 1;
            self.answers
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| std::io::ErrorKind::UnexpectedEof.into())
        }

        fn report(&mut self, _entry: &Entry, error: &ResolveError) {
            self.reported.push(error.to_string());
        }
    }

    fn resolver(answers: &[&'static str]) -> Resolver<Scripted> {
        Resolver::new(Scripted::new(answers)).with_clock(Clock::Fixed(now()))
    }

    #[test]
    fn required_without_default() {
        let entry = Entry::new(FieldType::Date, "1001", "Day", "").with_required(true);

        let err = resolver(&[]).resolve(&entry).unwrap_err();
        assert!(matches!(err, ResolveError::RequiredValueMissing { title } if title == "Day"));
    }

    #[test]
    fn optional_blank_is_skipped() {
        for field_type in FieldType::ALL {
            let entry = Entry::new(field_type, "1001", "", "");
            assert_eq!(resolve(&entry, "").unwrap(), Message::empty(), "{field_type}");
        }
    }

    #[test]
    fn blank_falls_back_to_default() {
        let entry = Entry::new(FieldType::Time, "1001", "", "12:30").with_required(true);
        assert_eq!(resolve(&entry, "").unwrap(), Message::from(vec!["12", "30"]));

        let entry = Entry::new(FieldType::Words, "1001", "", "fallback");
        assert_eq!(resolve(&entry, "").unwrap(), Message::from("fallback"));
    }

    #[test]
    fn candidate_wins_over_default() {
        let entry = Entry::new(FieldType::Checkboxes, "1001", "", "A, B");
        assert_eq!(resolve(&entry, "C").unwrap(), Message::from(vec!["C"]));
    }

    #[test]
    fn invalid_values_are_never_swallowed() {
        // required
        let entry = Entry::new(FieldType::Date, "1001", "", "").with_required(true);
        assert!(matches!(
            resolve(&entry, "13/01/2024"),
            Err(ResolveError::InvalidValue { .. })
        ));

        // optional without default, but something was typed
        let entry = Entry::new(FieldType::Date, "1001", "", "");
        assert!(matches!(
            resolve(&entry, "13/01/2024"),
            Err(ResolveError::InvalidValue { .. })
        ));

        // optional with a bad default
        let entry = Entry::new(FieldType::Date, "1001", "", "13/01/2024");
        assert!(matches!(
            resolve(&entry, ""),
            Err(ResolveError::InvalidValue {
                source: ValueError::BadDateFormat { .. },
                ..
            })
        ));
    }

    #[test]
    fn defaults_are_used_without_prompting() {
        let entry = Entry::new(FieldType::Words, "1001", "", "value");
        let mut resolver = resolver(&["ignored"]);

        assert_eq!(resolver.resolve(&entry).unwrap(), Message::from("value"));
        assert_eq!(resolver.prompter().prompted, 0);
    }

    #[test]
    fn prompts_until_valid() {
        let entry = Entry::new(FieldType::Time, "1001", "Time", "")
            .with_required(true)
            .with_prompt(true);
        let mut resolver = resolver(&["", "25:00", "now"]);

        assert_eq!(
            resolver.resolve(&entry).unwrap(),
            Message::from(vec!["09", "05"])
        );
        assert_eq!(resolver.prompter().prompted, 3);
        assert_eq!(
            resolver.prompter().reported,
            [
                "Value for entry 'Time' is required",
                "Invalid value for entry 'Time'",
            ]
        );
    }

    #[test]
    fn prompt_failure_is_not_retried() {
        let entry = Entry::new(FieldType::Words, "1001", "", "")
            .with_required(true)
            .with_prompt(true);
        let mut resolver = resolver(&[""]);

        assert!(matches!(
            resolver.resolve(&entry),
            Err(ResolveError::Prompt(_))
        ));
        assert_eq!(resolver.prompter().prompted, 2);
    }

    #[test]
    fn resolve_all_is_fail_fast() {
        let entries = [
            Entry::new(FieldType::Words, "1", "", "first").with_prompt(true),
            Entry::new(FieldType::Date, "2", "", "bad").with_required(true),
            Entry::new(FieldType::Words, "3", "", "third").with_prompt(true),
        ];
        let mut resolver = resolver(&["", ""]);

        assert!(resolver.resolve_all(&entries).is_err());
        assert_eq!(resolver.prompter().prompted, 1);
    }

    #[test]
    fn resolve_all_keeps_order() {
        let entries = [
            Entry::new(FieldType::Words, "1", "", "").with_prompt(true),
            Entry::new(FieldType::Checkboxes, "2", "", "A,B"),
            Entry::new(FieldType::Date, "3", "", "").with_prompt(true),
        ];
        let mut resolver = resolver(&["typed", "today"]);

        assert_eq!(
            resolver.resolve_all(&entries).unwrap(),
            [
                Message::from("typed"),
                Message::from(vec!["A", "B"]),
                Message::from(vec!["03", "07", "2024"]),
            ]
        );
    }

    #[test]
    fn no_prompt_fails_on_prompted_entries() {
        let entry = Entry::new(FieldType::Words, "1", "", "").with_prompt(true);
        assert!(matches!(
            Resolver::new(NoPrompt).resolve(&entry),
            Err(ResolveError::Prompt(_))
        ));
    }
}
