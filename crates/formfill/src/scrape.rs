//! form conversion
//!
//! A form's view page embeds its structure as a javascript array:
//!
//! ```text
//! <script>var FB_PUBLIC_LOAD_DATA_ = [null,["description",[<items>],...,"title"],...];</script>
//! ```
//!
//! Each answerable item looks like `[id, title, help, type, [[entry_id, options, required, ...]]]`
//! where `options` is a list of `[label, ...]` or `null`.
//!
//! [Form] collects what is needed to generate a config, every question becomes a prompted
//! [Entry] (required questions are marked required).
use crate::config::Config;
use crate::entry::{Entry, FieldType};
use crate::url::{to_form_url, UrlError};
use serde_json::Value as Json;

const LOAD_DATA_MARKER: &str = "FB_PUBLIC_LOAD_DATA_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    /// Submission (`formResponse`) url
    pub url: String,
    pub title: String,
    pub description: String,
    /// The form asks for the responder's email address
    pub takes_email: bool,
    pub questions: Vec<Question>,
}

#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub field_type: FieldType,
    pub key: String,
    pub title: String,
    pub required: bool,
    pub options: Vec<String>,
}

impl Question {
    /// Prompted entry without default value, options are listed in the title
    pub fn to_entry(&self) -> Entry {
        let mut title = sanitize(&self.title);
        if !self.options.is_empty() {
            let options: Vec<String> = self.options.iter().map(|o| sanitize(o)).collect();
            title = format!("{title} ({})", options.join(", "))
                .trim()
                .to_string();
        }

        Entry::new(self.field_type, self.key.as_str(), title, "")
            .with_required(self.required)
            .with_prompt(true)
    }
}

/// Titles must not contain line breaks or `=` to survive as a config line
fn sanitize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('=', ":")
}

impl Form {
    /// Read a form from its view page
    ///
    /// `reference` is anything accepted by [to_form_url].
    pub fn from_html(reference: &str, html: &str) -> Result<Self, ScrapeError> {
        let url = to_form_url(reference)?;
        let data = extract_load_data(html)?;

        let info = &data[1];
        if !info.is_array() {
            return Err(ScrapeError::Malformed("form info missing"));
        }

        let title = info[8]
            .as_str()
            .or_else(|| data[3].as_str())
            .unwrap_or_default()
            .to_string();
        let description = info[0].as_str().unwrap_or_default().to_string();

        let items = info[1]
            .as_array()
            .ok_or(ScrapeError::Malformed("form items missing"))?;

        let mut questions = vec![];
        for item in items {
            if let Some(question) = question_from_item(item)? {
                questions.push(question);
            }
        }

        let takes_email = form_block(html).contains(r#"type="email""#);
        tracing::debug!(%url, questions = questions.len(), takes_email, "form scraped");

        Ok(Self {
            url,
            title,
            description,
            takes_email,
            questions,
        })
    }

    /// Entries in form order, led by the email address when the form takes one
    pub fn entries(&self) -> Vec<Entry> {
        let email = self.takes_email.then(|| {
            Entry::new(FieldType::Extra, "emailAddress", "Email Address", "")
                .with_required(true)
                .with_prompt(true)
        });

        email
            .into_iter()
            .chain(self.questions.iter().map(Question::to_entry))
            .collect()
    }

    pub fn to_config(&self) -> Config {
        Config::new(self.url.clone(), self.entries())
    }

    /// Config file contents, the form title and description are kept as comments
    pub fn render_config(&self) -> String {
        let config = self.to_config();
        let mut rendered = format!("{}\n", config.url);

        for line in [self.title.as_str(), self.description.as_str()]
            .into_iter()
            .flat_map(str::lines)
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
        {
            rendered.push_str(&format!("# {line}\n"));
        }

        for entry in &config.entries {
            rendered.push_str(&format!("{entry}\n"));
        }

        rendered
    }
}

/// The `<form>` element holding the questions, empty if the page has none
fn form_block(html: &str) -> &str {
    let Some(start) = html.find("<form") else {
        return "";
    };
    let block = &html[start..];
    match block.find("</form>") {
        Some(end) => &block[..end],
        None => block,
    }
}

/// Extract the `FB_PUBLIC_LOAD_DATA_` array from a form page
pub fn extract_load_data(html: &str) -> Result<Json, ScrapeError> {
    let start = html
        .find(LOAD_DATA_MARKER)
        .ok_or(ScrapeError::MissingLoadData)?;
    let rest = &html[start + LOAD_DATA_MARKER.len()..];

    let (_, rest) = rest.split_once('=').ok_or(ScrapeError::MissingLoadData)?;
    let script = match rest.find("</script>") {
        Some(end) => &rest[..end],
        None => rest,
    };

    let script = script.trim();
    let script = script.strip_suffix(';').unwrap_or(script);

    Ok(serde_json::from_str(script)?)
}

fn question_from_item(item: &Json) -> Result<Option<Question>, ScrapeError> {
    let title = item[1].as_str().unwrap_or_default();
    let Some(type_code) = item[3].as_u64() else {
        return Err(ScrapeError::Malformed("item without type"));
    };

    let Some(answer) = item[4].as_array().and_then(|answers| answers.first()) else {
        // section headers, images, videos, ...
        tracing::trace!(title, type_code, "skipping item without answer");
        return Ok(None);
    };

    let field_type = match type_code {
        0 | 1 => FieldType::Words,
        2 | 3 | 5 => FieldType::Choice,
        4 => FieldType::Checkboxes,
        9 => FieldType::Date,
        10 => FieldType::Time,
        _ => {
            tracing::warn!(title, type_code, "skipping unsupported question");
            return Ok(None);
        }
    };

    let key = match &answer[0] {
        Json::Number(number) => number.to_string(),
        Json::String(key) if !key.is_empty() => key.clone(),
        _ => return Err(ScrapeError::Malformed("question without entry id")),
    };

    let options: Vec<String> = answer[1]
        .as_array()
        .map(|options| {
            options
                .iter()
                .filter_map(|option| option[0].as_str())
                .filter(|option| !option.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let required = match &answer[2] {
        Json::Bool(required) => *required,
        Json::Number(number) => number.as_u64() == Some(1),
        _ => false,
    };

    Ok(Some(Question::new(
        field_type,
        key,
        title.to_string(),
        required,
        options,
    )))
}

#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("Form page has no FB_PUBLIC_LOAD_DATA_ script")]
    MissingLoadData,
    #[error("Unable to parse form data")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected form data: {0}")]
    Malformed(&'static str),
    #[error("Invalid form url")]
    Url(#[from] UrlError),
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const ID: &str = "1FAIpQLSfWiBiihYkMJcZEAOE3POOKXDv6p4Ox4rX_ZRsQwu77aql8kQ";

    fn page(items: &str) -> String {
        format!(
            r#"<html><body><script type="text/javascript" nonce="x">var FB_PUBLIC_LOAD_DATA_ = [null,["Some description",[{items}],null,null,null,null,null,null,"Test Form"],"/forms","Test Form"]
;</script></body></html>"#
        )
    }

    #[test]
    fn extracts_load_data() {
        let data = extract_load_data(&page("")).unwrap();
        assert_eq!(data[1][8], "Test Form");

        assert!(matches!(
            extract_load_data("<html></html>"),
            Err(ScrapeError::MissingLoadData)
        ));
    }

    #[test]
    fn questions() {
        let items = r#"
            [1,"Name",null,0,[[1000,null,1]]],
            [2,"Section",null,8],
            [3,"Class",null,2,[[1001,[["A"],["B"]],0]]],
            [4,"Langs",null,4,[[1002,[["Rust"],["C = good"]],1]]],
            [5,"Grid",null,7,[[1003,[["x"]],0],[1004,[["y"]],0]]],
            [6,"Day",null,9,[[1005,null,0,null,null,null,null,[0,1]]]],
            [7,"When",null,10,[[1006,null,1]]]
        "#;

        let form = Form::from_html(ID, &page(items)).unwrap();
        assert_eq!(form.title, "Test Form");
        assert_eq!(form.description, "Some description");
        assert!(!form.takes_email);
        assert_eq!(
            form.url,
            format!("https://docs.google.com/forms/d/e/{ID}/formResponse")
        );

        assert_eq!(
            form.questions,
            [
                Question::new(FieldType::Words, "1000".into(), "Name".into(), true, vec![]),
                Question::new(
                    FieldType::Choice,
                    "1001".into(),
                    "Class".into(),
                    false,
                    vec!["A".into(), "B".into()]
                ),
                Question::new(
                    FieldType::Checkboxes,
                    "1002".into(),
                    "Langs".into(),
                    true,
                    vec!["Rust".into(), "C = good".into()]
                ),
                Question::new(FieldType::Date, "1005".into(), "Day".into(), false, vec![]),
                Question::new(FieldType::Time, "1006".into(), "When".into(), true, vec![]),
            ]
        );
    }

    #[test]
    fn entry_titles_are_config_safe() {
        let question = Question::new(
            FieldType::Checkboxes,
            "1002".into(),
            "Pick\nsome = many".into(),
            true,
            vec!["C = good".into(), "Rust".into()],
        );

        assert_eq!(
            question.to_entry().to_string(),
            "*!checkboxes-1002;Pick some : many (C : good, Rust)="
        );
    }

    #[test]
    fn email_leads_entries() {
        let mut html = page(r#"[1,"Name",null,0,[[1000,null,0]]]"#);
        html.push_str(r#"<form method="POST"><input type="email" name="emailAddress"></form>"#);

        let form = Form::from_html(ID, &html).unwrap();
        let lines: Vec<String> = form.entries().iter().map(Entry::to_string).collect();
        assert_eq!(
            lines,
            ["*!extra-emailAddress;Email Address=", "!words-1000;Name="]
        );
    }

    #[test]
    fn email_outside_the_form_is_ignored() {
        let mut html = page(r#"[1,"Name",null,0,[[1000,null,0]]]"#);
        html.push_str(r#"<div><input type="email" name="newsletter"></div><form></form>"#);
        assert!(!Form::from_html(ID, &html).unwrap().takes_email);

        let html = page("").replace("<body>", r#"<body><input type="email">"#);
        assert!(!Form::from_html(ID, &html).unwrap().takes_email);
    }

    #[test]
    fn rendered_config_parses() {
        let form = Form::from_html(ID, &page(r#"[1,"Name",null,0,[[1000,null,1]]]"#)).unwrap();
        let rendered = form.render_config();

        assert!(rendered.contains("# Test Form\n# Some description\n"));
        assert_eq!(rendered.parse::<Config>().unwrap(), form.to_config());
    }

    #[test]
    fn malformed_items() {
        assert!(matches!(
            Form::from_html(ID, &page(r#"[1,"No type"]"#)),
            Err(ScrapeError::Malformed(_))
        ));
        assert!(matches!(
            Form::from_html(ID, &page(r#"[1,"No id",null,0,[[null]]]"#)),
            Err(ScrapeError::Malformed(_))
        ));
        assert!(matches!(
            Form::from_html(ID, &page(r#"[1,"Empty id",null,0,[["",null,0]]]"#)),
            Err(ScrapeError::Malformed("question without entry id"))
        ));
    }
}
