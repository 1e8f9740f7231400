//! Graph client error types and classification.

use crate::types::ErrorEnvelope;

/// Graph error code for "object does not exist" (with subcode 33).
const CODE_UNSUPPORTED_GET: i64 = 100;
const SUBCODE_OBJECT_MISSING: i64 = 33;

/// Graph error codes returned when a call is throttled.
const RATE_LIMIT_CODES: &[i64] = &[4, 17, 32, 613];
const BUSINESS_RATE_LIMIT_CODES: std::ops::RangeInclusive<i64> = 80000..=80014;

/// Errors from the Graph client.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<i64>,
        subcode: Option<i64>,
        fbtrace_id: Option<String>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid access token")]
    InvalidToken,

    #[error("list receiver closed")]
    ListClosed,
}

impl GraphError {
    /// Builds an [`GraphError::Api`] from a failed response body.
    ///
    /// Falls back to the raw body as message when it is not a Graph error
    /// envelope.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(env) => GraphError::Api {
                status,
                message: env.error.message,
                code: env.error.code,
                subcode: env.error.error_subcode,
                fbtrace_id: env.error.fbtrace_id,
            },
            Err(_) => GraphError::Api {
                status,
                message: body.to_string(),
                code: None,
                subcode: None,
                fbtrace_id: None,
            },
        }
    }

    /// Returns `true` if the remote object does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            GraphError::Api {
                status, code, subcode, ..
            } => {
                *status == 404
                    || (*code == Some(CODE_UNSUPPORTED_GET)
                        && *subcode == Some(SUBCODE_OBJECT_MISSING))
            }
            GraphError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 404),
            _ => false,
        }
    }

    /// Returns `true` if the call was rejected by a rate limiter.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            GraphError::Api { status, code, .. } => {
                *status == 429
                    || code.is_some_and(|c| {
                        RATE_LIMIT_CODES.contains(&c) || BUSINESS_RATE_LIMIT_CODES.contains(&c)
                    })
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_graph_error_body() {
        let body = r#"{"error":{"message":"Unsupported get request.","type":"GraphMethodException","code":100,"error_subcode":33,"fbtrace_id":"AbC"}}"#;
        let err = GraphError::from_response(400, body);
        match &err {
            GraphError::Api {
                status,
                message,
                code,
                subcode,
                fbtrace_id,
            } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "Unsupported get request.");
                assert_eq!(*code, Some(100));
                assert_eq!(*subcode, Some(33));
                assert_eq!(fbtrace_id.as_deref(), Some("AbC"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_not_found());
    }

    #[test]
    fn non_json_body_kept_as_message() {
        let err = GraphError::from_response(502, "Bad Gateway");
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("Bad Gateway"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn http_404_is_not_found() {
        let err = GraphError::from_response(404, "");
        assert!(err.is_not_found());
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn code_100_without_subcode_is_not_not_found() {
        let body = r#"{"error":{"message":"Invalid parameter","code":100}}"#;
        assert!(!GraphError::from_response(400, body).is_not_found());
    }

    #[test]
    fn rate_limit_codes() {
        for code in [4, 17, 32, 613, 80000, 80004, 80014] {
            let body = format!(r#"{{"error":{{"message":"slow down","code":{code}}}}}"#);
            assert!(
                GraphError::from_response(400, &body).is_rate_limited(),
                "code {code} should be rate limited"
            );
        }
        assert!(GraphError::from_response(429, "").is_rate_limited());
        let body = r#"{"error":{"message":"nope","code":190}}"#;
        assert!(!GraphError::from_response(400, body).is_rate_limited());
    }

    #[test]
    fn other_variants_unclassified() {
        assert!(!GraphError::InvalidToken.is_not_found());
        assert!(!GraphError::ListClosed.is_rate_limited());
    }
}
