use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use shop_engine::StoreError;
use thiserror::Error;

use crate::{credentials::CredentialError, integrations::stripe::PaymentError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid request body. {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("You are not authenticated!")]
    Unauthenticated,
    #[error("Token is not valid!")]
    InvalidToken,
    #[error("You are not allowed to do that!")]
    InsufficientPermissions,
    #[error("Wrong username")]
    WrongUsername,
    #[error("Wrong password")]
    WrongPassword,
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Could not secure the password. {0}")]
    CredentialError(#[from] CredentialError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Payment failed. {0}")]
    PaymentError(#[from] PaymentError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::WrongUsername => StatusCode::UNAUTHORIZED,
            Self::WrongPassword => StatusCode::UNAUTHORIZED,
            Self::InvalidToken => StatusCode::FORBIDDEN,
            Self::InsufficientPermissions => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::AuthenticationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CredentialError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PaymentError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Session token could not be validated. {0}")]
    ValidationError(String),
    #[error("Could not sign the session token. {0}")]
    SigningError(String),
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(msg) => Self::Conflict(format!("A record with the same key already exists. {msg}")),
            StoreError::DatabaseError(msg) => Self::BackendError(format!("Database error: {msg}")),
        }
    }
}
