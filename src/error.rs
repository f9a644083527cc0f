use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportKind {
    Network,
    Http { status: u16 },
    Decode,
}

/// Errors of the catalog layer.
///
/// `Transport` and `NotFound` are runtime conditions surfaced to the view;
/// `MalformedRecord` and `InvalidCodeFormat` mean the input broke the contract.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("request failed: {message}")]
    Transport { kind: TransportKind, message: String },

    #[error("no country named {name:?}")]
    NotFound { name: String },

    #[error("malformed country record: {reason}")]
    MalformedRecord { reason: String },

    #[error("invalid country code {code:?}: expected 3 letters")]
    InvalidCodeFormat { code: String },
}

impl CatalogError {
    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self::Transport {
            kind: TransportKind::Network,
            message: e.to_string(),
        }
    }

    pub(crate) fn decode(e: impl std::fmt::Display) -> Self {
        Self::Transport {
            kind: TransportKind::Decode,
            message: e.to_string(),
        }
    }

    pub(crate) fn http(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Transport {
            kind: TransportKind::Http {
                status: status.as_u16(),
            },
            message: format!("{status}: {body}"),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    #[cfg(test)]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = CatalogError::NotFound {
            name: "Atlantis".to_string(),
        };
        assert_eq!(e.to_string(), "no country named \"Atlantis\"");

        let e = CatalogError::InvalidCodeFormat {
            code: "FR".to_string(),
        };
        assert!(e.to_string().contains("expected 3 letters"));
        assert!(!e.is_transport());
    }

    #[test]
    fn test_decode_is_transport() {
        let e = CatalogError::decode("expected array");
        assert!(e.is_transport());
        assert!(matches!(
            e,
            CatalogError::Transport {
                kind: TransportKind::Decode,
                ..
            }
        ));
    }
}
