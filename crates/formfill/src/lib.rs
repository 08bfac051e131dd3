//! # formfill - fill and submit google forms
//!
//! For a user guide and material related to CLI usage see the README.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `formfill` works internally.
//!
//! ### Google Forms terms
//!
//! - a form is submitted by POSTing a form-encoded body to its `formResponse` url
//! - the page a human looks at is the `viewform` url
//! - every question has a numeric id, its answer is sent as `entry.<id>`
//! - some question types need extra fields: multiple choice sends an empty `entry.<id>_sentinel`,
//!   dates and times are split into `entry.<id>_month`/`_day`/`_year` and `entry.<id>_hour`/`_minute`
//! - checkboxes repeat `entry.<id>` once per checked choice
//!
//! ### Config files
//!
//! see [config] and [entry]
//!
//! The first line references the form, each following line describes one field:
//!
//! ```text
//! https://docs.google.com/forms/d/e/1FAIpQLSfWiBiihYkMJcZEAOE3POOKXDv6p4Ox4rX_ZRsQwu77aql8kQ/viewform
//! # Class survey
//! *!words-2126808200;Name=
//! choice-363426485;Class=Option 1
//! checkboxes-1142411773;Checkboxes=Option 1, Option 2
//! !date-465882654;Date=today
//! ```
//!
//! ### Pipeline
//!
//! Each [entry::Entry] goes through three steps, strictly in file order:
//!
//! | step     | module      | input              | output              |
//! |----------|-------------|--------------------|---------------------|
//! | resolve  | [resolve]   | prompt or default  | raw string          |
//! | parse    | [message]   | raw string         | [message::Message]  |
//! | format   | [payload]   | message            | [payload::Payload]  |
//!
//! Resolving and parsing may fail. Prompted entries are asked again, entries using their default
//! value abort the whole run (a broken default is a config error). Formatting never fails.
//!
//! **Example**
//!
//! | line                             | message                  | payload                                      |
//! |----------------------------------|--------------------------|----------------------------------------------|
//! | `words-1000;=hi`                 | `"hi"`                   | `entry.1000=hi`                              |
//! | `choice-1001;=A`                 | `"A"`                    | `entry.1001=A`, `entry.1001_sentinel=`       |
//! | `checkboxes-1002;=A, B`          | `["A", "B"]`             | `entry.1002=A`, `entry.1002=B`               |
//! | `time-1003;=09:30`               | `["09", "30"]`           | `entry.1003_hour=09`, `entry.1003_minute=30` |
//! | `extra-emailAddress;=me@x.org`   | `"me@x.org"`             | `emailAddress=me@x.org`                      |
//!
//! ### Conversion
//!
//! [scrape] reads the data embedded in a form's page and generates config lines, every question
//! becomes a prompted entry.
//!
//! ### Submission
//!
//! [transport::Transport] sends the payload. Without the `http` feature there is no transport and
//! payloads can only be inspected.
//!
pub mod config;
pub mod entry;
pub mod message;
pub mod payload;
pub mod resolve;
pub mod scrape;
pub mod transport;
pub mod url;
