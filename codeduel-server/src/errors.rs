use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use codeduel_core::{DatabaseError, MatchmakingError};
use thiserror::Error;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{resource}:{identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{0}")]
    InvalidArgument(&'static str),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.as_status_code(), self.to_string()).into_response()
    }
}

impl From<DatabaseError> for ServerError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource,
                identifier,
            },
            DatabaseError::Conflict {
                resource,
                field,
                value,
            } => Self::Conflict {
                resource,
                field,
                value,
            },
            DatabaseError::Internal(e) => Self::StoreUnavailable(e.to_string()),
        }
    }
}

impl From<MatchmakingError> for ServerError {
    fn from(value: MatchmakingError) -> Self {
        match value {
            MatchmakingError::EmptyName => Self::InvalidArgument("Name is required"),
            MatchmakingError::Db(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_database_errors_map_to_status_codes() {
        let not_found: ServerError = DatabaseError::NotFound {
            resource: "room",
            identifier: "code",
        }
        .into();
        assert_eq!(not_found.as_status_code(), StatusCode::NOT_FOUND);

        let conflict: ServerError = DatabaseError::Conflict {
            resource: "room",
            field: "code",
            value: "AB12CD".to_string(),
        }
        .into();
        assert_eq!(conflict.as_status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_empty_name_maps_to_bad_request() {
        let error: ServerError = MatchmakingError::EmptyName.into();
        assert_eq!(error.as_status_code(), StatusCode::BAD_REQUEST);
    }
}
