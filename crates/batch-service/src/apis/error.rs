//! API error type with HTTP status mapping.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Json, Response},
};
use batch_wallet::WalletError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
	/// The wallet refused or failed a connection request (502)
	BadGateway { error_type: String, message: String },
}

impl ApiError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			ApiError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
		}
	}

	pub fn to_error_response(&self) -> ErrorResponse {
		match self {
			ApiError::BadGateway { error_type, message } => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
			},
		}
	}
}

impl From<WalletError> for ApiError {
	fn from(err: WalletError) -> Self {
		let error_type = if err.is_user_rejection() {
			"USER_REJECTED"
		} else {
			match err {
				WalletError::Rpc { .. } => "WALLET_RPC_ERROR",
				WalletError::Network(_) => "WALLET_UNREACHABLE",
				WalletError::InvalidResponse(_) => "WALLET_INVALID_RESPONSE",
			}
		};
		ApiError::BadGateway {
			error_type: error_type.to_string(),
			message: err.to_string(),
		}
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ApiError::BadGateway { message, .. } => write!(f, "Bad Gateway: {}", message),
		}
	}
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status_code(), Json(self.to_error_response())).into_response()
	}
}
