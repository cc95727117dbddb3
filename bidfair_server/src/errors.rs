use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use bidfair_engine::{AccountApiError, BidFlowError, VerificationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("{0}")]
    BidFlowError(#[from] BidFlowError),
    #[error("{0}")]
    VerificationError(#[from] VerificationError),
    #[error("{0}")]
    AccountError(#[from] AccountApiError),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            },
            Self::BidFlowError(e) => match e {
                BidFlowError::InvalidPrice(_) => StatusCode::BAD_REQUEST,
                BidFlowError::OrderNotFound(_) | BidFlowError::BidNotFound(_) | BidFlowError::CategoryNotFound(_) => {
                    StatusCode::NOT_FOUND
                },
                BidFlowError::OrderClosed | BidFlowError::DuplicateBid | BidFlowError::BidAlreadyProcessed => {
                    StatusCode::CONFLICT
                },
                BidFlowError::PartnerNotAuthorized | BidFlowError::NotOrderOwner => StatusCode::FORBIDDEN,
                BidFlowError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::VerificationError(e) => match e {
                VerificationError::InvalidCode | VerificationError::CodeExpired => StatusCode::UNAUTHORIZED,
                VerificationError::InvalidStagedData => StatusCode::UNAUTHORIZED,
                VerificationError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
                VerificationError::AccountAlreadyExists => StatusCode::CONFLICT,
                VerificationError::AccountNotFound => StatusCode::NOT_FOUND,
                VerificationError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::AccountError(e) => match e {
                AccountApiError::CategoryNotFound(_) | AccountApiError::AccountNotFound => StatusCode::NOT_FOUND,
                AccountApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InitializeError(_) | Self::BackendError(_) | Self::IOError(_) | Self::Unspecified(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("💻️ {self}");
        }
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("An access token is required for this endpoint.")]
    MissingToken,
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Insufficient permissions.")]
    InsufficientPermissions,
}
