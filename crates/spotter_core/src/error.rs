//! crates/spotter_core/src/error.rs
//!
//! The application-level error taxonomy and the mapping policy that
//! normalizes raw backend failures into it. Every failure a UI collaborator
//! sees is one of the `AppError` kinds below — never a raw transport or
//! decode error.

use crate::ports::TransportError;

/// Postgres SQLSTATE codes the backend surfaces in its error bodies.
pub mod sqlstate {
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    pub const CHECK_VIOLATION: &str = "23514";
    pub const INSUFFICIENT_PRIVILEGE: &str = "42501";
}

/// The closed set of failure kinds this layer exposes to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// The device has no connectivity or the request timed out.
    #[error("network unavailable")]
    NetworkUnavailable,

    /// No signed-in identity, or the backend refused the credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The input was rejected; carries the backend's reason when it gave one.
    #[error("validation failed: {}", .0.as_deref().unwrap_or("invalid input"))]
    ValidationFailed(Option<String>),

    /// The write collided with an existing row (unique constraint).
    #[error("conflict with existing data")]
    Conflict,

    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// The backend failed internally (5xx).
    #[error("server error")]
    ServerError,

    /// Anything that could not be classified, including decode failures.
    #[error("unexpected error")]
    Unexpected,
}

/// A convenience alias for `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;

/// What an alert surface should show for a propagated error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPresentation {
    pub title: &'static str,
    pub detail: String,
    /// Present when offering a retry action makes sense for this kind.
    pub retry_label: Option<&'static str>,
}

impl AppError {
    /// Derives the title/detail/retry triple an alert renders for this kind.
    pub fn presentation(&self) -> ErrorPresentation {
        match self {
            AppError::NetworkUnavailable => ErrorPresentation {
                title: "No connection",
                detail: "Check your internet connection and try again.".to_string(),
                retry_label: Some("Retry"),
            },
            AppError::Unauthorized => ErrorPresentation {
                title: "Signed out",
                detail: "Sign in to continue.".to_string(),
                retry_label: None,
            },
            AppError::ValidationFailed(reason) => ErrorPresentation {
                title: "Invalid input",
                detail: reason
                    .clone()
                    .unwrap_or_else(|| "Please review your input and try again.".to_string()),
                retry_label: None,
            },
            AppError::Conflict => ErrorPresentation {
                title: "Already exists",
                detail: "That item already exists.".to_string(),
                retry_label: None,
            },
            AppError::NotFound => ErrorPresentation {
                title: "Not found",
                detail: "We couldn't find what you were looking for.".to_string(),
                retry_label: None,
            },
            AppError::ServerError => ErrorPresentation {
                title: "Something went wrong",
                detail: "The server had a problem. Please try again shortly.".to_string(),
                retry_label: Some("Retry"),
            },
            AppError::Unexpected => ErrorPresentation {
                title: "Something went wrong",
                detail: "An unexpected error occurred.".to_string(),
                retry_label: None,
            },
        }
    }
}

/// Classifies a raw transport failure into the `AppError` taxonomy.
///
/// Total and deterministic: every input maps to exactly one kind, in this
/// priority order — database constraint code first, then connectivity, then
/// HTTP status, then decode failure, then the `Unexpected` fallback.
pub fn map_transport(error: &TransportError) -> AppError {
    match error {
        TransportError::Status { status, code, .. } => {
            if let Some(code) = code.as_deref() {
                match code {
                    sqlstate::UNIQUE_VIOLATION => return AppError::Conflict,
                    sqlstate::FOREIGN_KEY_VIOLATION => {
                        return AppError::ValidationFailed(Some("Missing related item".into()))
                    }
                    sqlstate::CHECK_VIOLATION => {
                        return AppError::ValidationFailed(Some(
                            "Input violates constraint".into(),
                        ))
                    }
                    sqlstate::INSUFFICIENT_PRIVILEGE => return AppError::Unauthorized,
                    _ => {}
                }
            }
            match *status {
                401 | 403 => AppError::Unauthorized,
                404 => AppError::NotFound,
                500..=599 => AppError::ServerError,
                _ => AppError::Unexpected,
            }
        }
        TransportError::Connectivity { .. } => AppError::NetworkUnavailable,
        TransportError::Decode { .. } => AppError::Unexpected,
    }
}

impl From<TransportError> for AppError {
    fn from(error: TransportError) -> Self {
        map_transport(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn status(status: u16, code: Option<&str>) -> TransportError {
        TransportError::Status {
            status,
            code: code.map(str::to_string),
            message: "backend said no".to_string(),
        }
    }

    // One row per documented raw shape; the mapping must be total.
    #[rstest]
    #[case::unique_violation(status(409, Some(sqlstate::UNIQUE_VIOLATION)), AppError::Conflict)]
    #[case::fk_violation(
        status(409, Some(sqlstate::FOREIGN_KEY_VIOLATION)),
        AppError::ValidationFailed(Some("Missing related item".into()))
    )]
    #[case::check_violation(
        status(400, Some(sqlstate::CHECK_VIOLATION)),
        AppError::ValidationFailed(Some("Input violates constraint".into()))
    )]
    #[case::insufficient_privilege(
        status(403, Some(sqlstate::INSUFFICIENT_PRIVILEGE)),
        AppError::Unauthorized
    )]
    #[case::timeout(
        TransportError::Connectivity { timeout: true, detail: "deadline".into() },
        AppError::NetworkUnavailable
    )]
    #[case::offline(
        TransportError::Connectivity { timeout: false, detail: "dns".into() },
        AppError::NetworkUnavailable
    )]
    #[case::http_401(status(401, None), AppError::Unauthorized)]
    #[case::http_403(status(403, None), AppError::Unauthorized)]
    #[case::http_404(status(404, None), AppError::NotFound)]
    #[case::http_500(status(500, None), AppError::ServerError)]
    #[case::http_599(status(599, None), AppError::ServerError)]
    #[case::decode(
        TransportError::Decode { detail: "missing field `id`".into() },
        AppError::Unexpected
    )]
    #[case::unknown_status(status(418, None), AppError::Unexpected)]
    #[case::unknown_code(status(418, Some("XX000")), AppError::Unexpected)]
    fn classifies_every_documented_shape(
        #[case] raw: TransportError,
        #[case] expected: AppError,
    ) {
        assert_eq!(map_transport(&raw), expected);
    }

    #[test]
    fn constraint_code_wins_over_status() {
        // A unique violation delivered with a 500 status still maps to Conflict.
        let raw = status(500, Some(sqlstate::UNIQUE_VIOLATION));
        assert_eq!(map_transport(&raw), AppError::Conflict);
    }

    #[test]
    fn validation_presentation_surfaces_reason_verbatim() {
        let presentation =
            AppError::ValidationFailed(Some("Username too short".into())).presentation();
        assert_eq!(presentation.detail, "Username too short");
        assert!(presentation.retry_label.is_none());
    }

    #[test]
    fn network_presentation_offers_retry() {
        let presentation = AppError::NetworkUnavailable.presentation();
        assert_eq!(presentation.title, "No connection");
        assert_eq!(presentation.retry_label, Some("Retry"));
    }
}
