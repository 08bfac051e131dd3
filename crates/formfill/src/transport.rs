//! http transport
//!
//! [Transport] is the seam between the config pipeline and the network. The blocking
//! [UreqTransport] is only available with the `http` feature, without it there is no
//! [default_transport] and payloads can only be displayed.
use crate::payload::Payload;

/// Outcome of a submission
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub status: u16,
    pub reason: String,
}

impl Submission {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl std::fmt::Display for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.reason)
    }
}

pub trait Transport {
    /// GET a page
    fn fetch(&self, url: &str) -> Result<String, TransportError>;

    /// POST a payload form-encoded
    ///
    /// Any response is a [Submission], only a failed exchange is an error.
    fn submit(&self, url: &str, payload: &Payload) -> Result<Submission, TransportError>;
}

/// The transport used by the cli, if one was compiled in
#[cfg(feature = "http")]
pub fn default_transport() -> Option<Box<dyn Transport>> {
    Some(Box::new(UreqTransport::default()))
}

#[cfg(not(feature = "http"))]
pub fn default_transport() -> Option<Box<dyn Transport>> {
    tracing::debug!("built without the http feature");
    None
}

#[cfg(feature = "http")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "http")]
mod ureq_transport {
    use super::{Submission, Transport, TransportError};
    use crate::payload::Payload;

    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self {
                agent: ureq::Agent::new_with_defaults(),
            }
        }
    }

    fn reason_for(status: u16) -> String {
        ureq::http::StatusCode::from_u16(status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or_default()
            .to_string()
    }

    impl Transport for UreqTransport {
        #[tracing::instrument(level = "debug", skip(self))]
        fn fetch(&self, url: &str) -> Result<String, TransportError> {
            let mut response = self.agent.get(url).call().map_err(TransportError::http)?;
            response
                .body_mut()
                .read_to_string()
                .map_err(TransportError::http)
        }

        #[tracing::instrument(level = "debug", skip(self, payload), fields(field_count = payload.len()))]
        fn submit(&self, url: &str, payload: &Payload) -> Result<Submission, TransportError> {
            match self.agent.post(url).send_form(payload.pairs()) {
                Ok(response) => {
                    let status = response.status().as_u16();
                    Ok(Submission::new(status, reason_for(status)))
                }
                Err(ureq::Error::StatusCode(status)) => {
                    tracing::debug!(status, "form rejected submission");
                    Ok(Submission::new(status, reason_for(status)))
                }
                Err(err) => Err(TransportError::http(err)),
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    pub fn http(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        TransportError::Http(Box::new(err))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn success_is_2xx() {
        assert!(Submission::new(200, "OK".into()).is_success());
        assert!(Submission::new(204, "No Content".into()).is_success());
        assert!(!Submission::new(302, "Found".into()).is_success());
        assert!(!Submission::new(400, "Bad Request".into()).is_success());
    }

    #[test]
    fn display() {
        assert_eq!(Submission::new(200, "OK".into()).to_string(), "200 OK");
    }
}
