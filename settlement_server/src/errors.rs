use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use settlement_engine::SettlementError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid request. {0}")]
    InvalidRequest(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("The data store is unavailable. {0}")]
    StoreUnavailable(String),
    #[error("The data store is overloaded. Try again shortly. {0}")]
    StoreOverloaded(String),
    #[error("Insufficient permissions. {0}")]
    InsufficientPermissions(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidSignature => StatusCode::BAD_REQUEST,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::StoreOverloaded(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "success": false, "error": self.to_string() }).to_string())
    }
}

impl From<SettlementError> for ServerError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::AllocationConflict(_) | SettlementError::CommitConflict(_) => {
                Self::StoreOverloaded(e.to_string())
            },
            SettlementError::DatabaseError(_) => Self::StoreUnavailable(e.to_string()),
            SettlementError::EmptyCart | SettlementError::CouponRejected(_) => Self::InvalidRequest(e.to_string()),
            SettlementError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            SettlementError::ProductNotFound(_) | SettlementError::DuplicateSettlement(_) => {
                Self::BackendError(e.to_string())
            },
        }
    }
}

#[cfg(test)]
mod test {
    use actix_web::{error::ResponseError, http::StatusCode};
    use settlement_engine::SettlementError;

    use super::ServerError;

    #[test]
    fn error_taxonomy_maps_to_the_right_status() {
        assert_eq!(ServerError::InvalidSignature.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServerError::InvalidSignature.to_string(), "Invalid signature");
        let overloaded: ServerError = SettlementError::AllocationConflict("order".into()).into();
        assert_eq!(overloaded.status_code(), StatusCode::TOO_MANY_REQUESTS);
        let overloaded: ServerError = SettlementError::CommitConflict("busy".into()).into();
        assert_eq!(overloaded.status_code(), StatusCode::TOO_MANY_REQUESTS);
        let unavailable: ServerError = SettlementError::DatabaseError("gone".into()).into();
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ServerError::InsufficientPermissions("nope".into()).status_code(), StatusCode::FORBIDDEN);
        let internal: ServerError = SettlementError::ProductNotFound(1).into();
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
