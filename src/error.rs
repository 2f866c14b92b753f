use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::goodreads::GoodreadsError;
use crate::views;

#[derive(Debug, Error)]
pub enum AppError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("password hash error: {0}")]
	Hash(argon2::password_hash::Error),
	#[error(transparent)]
	Goodreads(#[from] GoodreadsError),
}

impl From<argon2::password_hash::Error> for AppError {
	fn from(e: argon2::password_hash::Error) -> Self {
		AppError::Hash(e)
	}
}

impl AppError {
	fn status(&self) -> StatusCode {
		match self {
			AppError::Goodreads(_) => StatusCode::BAD_GATEWAY,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

// the detail goes to the log, the visitor gets a generic page
impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		log::error!("{self}");
		let page = views::error_page(
			"Something went wrong",
			"The server hit an internal problem, please try again later",
			"/",
		);
		(self.status(), page).into_response()
	}
}
