//! form url normalization
//!
//! A form can be referred to by
//! - its 56 character id (`[a-zA-Z0-9_-]`)
//! - its submission url (ends in `formResponse`)
//! - its view url (ends in `viewform`)
use std::path::Path;

const FORM_ID_LEN: usize = 56;
const FORM_RESPONSE: &str = "formResponse";
const VIEW_FORM: &str = "viewform";

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Returns the url a form can be submitted (POSTed) to
///
/// ```
/// # use formfill::url::to_form_url;
/// let id = "1FAIpQLSfWiBiihYkMJcZEAOE3POOKXDv6p4Ox4rX_ZRsQwu77aql8kQ";
/// assert_eq!(
///     to_form_url(id).unwrap(),
///     format!("https://docs.google.com/forms/d/e/{id}/formResponse"),
/// );
/// assert!(to_form_url("not a form").is_err());
/// ```
pub fn to_form_url(reference: &str) -> Result<String, UrlError> {
    let reference = reference.trim();

    if !reference.is_empty() && reference.chars().all(is_id_char) {
        if reference.len() != FORM_ID_LEN {
            return Err(UrlError::InvalidFormUrl {
                reference: reference.to_string(),
                reason: "form ID not 56 characters long",
            });
        }
        return Ok(format!(
            "https://docs.google.com/forms/d/e/{reference}/{FORM_RESPONSE}"
        ));
    }

    if reference.ends_with(FORM_RESPONSE) {
        return Ok(reference.to_string());
    }

    if let Some(base) = reference.strip_suffix(VIEW_FORM) {
        return Ok(format!("{base}{FORM_RESPONSE}"));
    }

    Err(UrlError::InvalidFormUrl {
        reference: reference.to_string(),
        reason: "expected a form ID, a formResponse url or a viewform url",
    })
}

/// Returns the url a form can be viewed (GETed) at
///
/// Same rules as [to_form_url], but ends in `viewform`.
pub fn to_view_url(reference: &str) -> Result<String, UrlError> {
    let url = to_form_url(reference)?;
    let base = url.strip_suffix(FORM_RESPONSE).unwrap_or(&url);
    Ok(format!("{base}{VIEW_FORM}"))
}

/// Reads the target url of an internet shortcut (`.url`) file
///
/// ```ini
/// [InternetShortcut]
/// URL=https://docs.google.com/forms/d/e/.../viewform
/// ```
pub fn url_from_shortcut(path: &Path) -> Result<String, UrlError> {
    tracing::debug!(path=%path.display(), "reading internet shortcut");
    let contents = std::fs::read_to_string(path)?;
    parse_shortcut(&contents)
}

fn parse_shortcut(contents: &str) -> Result<String, UrlError> {
    let mut in_section = false;

    for line in contents.lines().map(str::trim) {
        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = section.trim() == "InternetShortcut";
            continue;
        }

        if !in_section {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            if key.trim().eq_ignore_ascii_case("url") {
                return Ok(value.trim().to_string());
            }
        }
    }

    Err(UrlError::ShortcutMissingUrl)
}

#[derive(thiserror::Error, Debug)]
pub enum UrlError {
    #[error("String cannot be converted into form link: {reference:?} ({reason})")]
    InvalidFormUrl {
        reference: String,
        reason: &'static str,
    },
    #[error("Internet shortcut has no [InternetShortcut] URL")]
    ShortcutMissingUrl,
    #[error("IO error")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const ID: &str = "1FAIpQLSfWiBiihYkMJcZEAOE3POOKXDv6p4Ox4rX_ZRsQwu77aql8kQ";

    #[test]
    fn id_expands() {
        assert_eq!(ID.len(), FORM_ID_LEN);
        assert_eq!(
            to_form_url(&format!("  {ID}\n")).unwrap(),
            format!("https://docs.google.com/forms/d/e/{ID}/formResponse")
        );
    }

    #[test]
    fn id_with_wrong_length() {
        let err = to_form_url(&ID[1..]).unwrap_err();
        assert!(matches!(
            err,
            UrlError::InvalidFormUrl { reference, .. } if reference == ID[1..]
        ));
    }

    #[test]
    fn form_response_is_kept() {
        let url = format!("https://docs.google.com/forms/d/e/{ID}/formResponse");
        assert_eq!(to_form_url(&url).unwrap(), url);
    }

    #[test]
    fn viewform_is_rewritten() {
        assert_eq!(
            to_form_url(&format!("https://docs.google.com/forms/d/e/{ID}/viewform")).unwrap(),
            format!("https://docs.google.com/forms/d/e/{ID}/formResponse")
        );
    }

    #[test]
    fn anything_else_is_invalid() {
        for reference in ["", "https://example.com/form", "hello world"] {
            let err = to_form_url(reference).unwrap_err();
            assert!(matches!(err, UrlError::InvalidFormUrl { .. }), "{reference:?}");
        }
    }

    #[test]
    fn view_url() {
        assert_eq!(
            to_view_url(ID).unwrap(),
            format!("https://docs.google.com/forms/d/e/{ID}/viewform")
        );
    }

    #[test]
    fn shortcut() {
        let contents = format!(
            "[DEFAULT]\nBASEURL=https://example.com\n\n[InternetShortcut]\nIDList=\nURL=https://docs.google.com/forms/d/e/{ID}/viewform\n"
        );
        assert_eq!(
            parse_shortcut(&contents).unwrap(),
            format!("https://docs.google.com/forms/d/e/{ID}/viewform")
        );

        assert!(matches!(
            parse_shortcut("[DEFAULT]\nURL=https://example.com\n"),
            Err(UrlError::ShortcutMissingUrl)
        ));
    }
}
