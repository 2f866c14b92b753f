use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use maud::Markup;
use tower_cookies::Cookies;

use crate::crypto;
use crate::error::AppError;
use crate::session::{self, FlashKind};
use crate::sql::{self, InsertReview};
use crate::types::{FormLogin, FormRegister, FormReview, QuerySearch};
use crate::{views, SharedState};

pub async fn display_index(State(stt): State<SharedState>, cookies: Cookies) -> Markup {
	let token = stt.sessions.attach(&cookies);
	let user = stt.sessions.user(token).await;
	views::home(user.as_ref().map(|(_, name)| name.as_str()))
}

pub async fn display_register() -> Markup {
	views::register_form()
}

// checks run in a fixed order so the first failure names the field at fault
pub fn validate_registration(form: &FormRegister, username_taken: bool) -> Result<(), &'static str> {
	if form.username.is_empty() {
		return Err("You must provide an username");
	}
	if username_taken {
		return Err("Username already exists");
	}
	if form.password.is_empty() {
		return Err("You must provide a password");
	}
	if form.confirm != form.password {
		return Err("Passwords do not match");
	}
	Ok(())
}

pub async fn perform_register(
	State(stt): State<SharedState>,
	Form(form): Form<FormRegister>,
) -> Result<Response, AppError> {
	// exact, case-sensitive match
	let taken = if form.username.is_empty() {
		false
	} else {
		sql::account_by_username(&stt.db, &form.username).await?.is_some()
	};

	if let Err(message) = validate_registration(&form, taken) {
		return Ok(views::register_error(message).into_response());
	}

	let hash = crypto::hash_password(&form.password)?;
	sql::insert_account(&stt.db, &form.username, &hash).await?;
	log::info!("registered account {}", form.username);

	Ok(Redirect::to("/login").into_response())
}

// drains flashes too: the review handler parks its "log in first"
// warning here
pub async fn display_login(State(stt): State<SharedState>, cookies: Cookies) -> Markup {
	let token = stt.sessions.attach(&cookies);
	let flashes = stt.sessions.take_flashes(token).await;
	views::login_form(&flashes)
}

pub async fn perform_login(
	State(stt): State<SharedState>,
	cookies: Cookies,
	Form(form): Form<FormLogin>,
) -> Result<Markup, AppError> {
	if form.username.is_empty() {
		return Ok(views::login_error("Please enter your username"));
	}
	if form.password.is_empty() {
		return Ok(views::login_error("Please enter your password"));
	}

	let Some(account) = sql::account_by_username(&stt.db, &form.username).await? else {
		return Ok(views::login_error("Invalid username/password"));
	};
	if !crypto::verify_password(&form.password, &account.hash)? {
		return Ok(views::login_error("Wrong password"));
	}

	let token = stt.sessions.attach(&cookies);
	stt.sessions.login(token, account.id, &account.username).await;
	log::info!("{} logged in", account.username);

	Ok(views::login_done(&account.username))
}

pub async fn display_search() -> Markup {
	views::search_form()
}

pub async fn perform_search(
	State(stt): State<SharedState>,
	Query(query): Query<QuerySearch>,
) -> Result<Markup, AppError> {
	let query = query.book.as_deref().unwrap_or("").trim().to_string();
	if query.is_empty() {
		return Ok(views::search_error("You must enter something"));
	}

	let books = sql::search_books(&stt.db, &query).await?;
	if books.is_empty() {
		return Ok(views::search_error("Sorry, we can't find your book :("));
	}

	Ok(views::search_results(&books))
}

pub async fn display_book(
	State(stt): State<SharedState>,
	cookies: Cookies,
	Path(isbn): Path<i64>,
) -> Result<Markup, AppError> {
	let token = stt.sessions.attach(&cookies);
	let isbn = isbn.to_string();

	let Some(book) = sql::book_by_isbn(&stt.db, &isbn).await? else {
		return Ok(views::error_page("Unknown book", "No book with that ISBN", "/search"));
	};

	let counts = stt.goodreads.review_counts(&book.isbn).await?;
	let reviews = sql::reviews_for_book(&stt.db, book.id).await?;
	let flashes = stt.sessions.take_flashes(token).await;
	let logged_in = stt.sessions.user(token).await.is_some();

	Ok(views::book_page(&book, &counts, &reviews, &flashes, logged_in))
}

// whole numbers 1..=5 only
pub fn parse_rating(raw: &str) -> Option<i32> {
	raw.trim().parse::<i32>().ok().filter(|r| (1..=5).contains(r))
}

pub async fn perform_review(
	State(stt): State<SharedState>,
	cookies: Cookies,
	Path(isbn): Path<i64>,
	Form(form): Form<FormReview>,
) -> Result<Response, AppError> {
	let token = stt.sessions.attach(&cookies);

	let Some((user_id, username)) = stt.sessions.user(token).await else {
		stt.sessions
			.flash(token, FlashKind::Warning, "You must be logged in to review")
			.await;
		return Ok(Redirect::to("/login").into_response());
	};

	let isbn = isbn.to_string();
	let Some(book) = sql::book_by_isbn(&stt.db, &isbn).await? else {
		return Ok(views::error_page("Unknown book", "No book with that ISBN", "/search").into_response());
	};
	let back = format!("/result/{isbn}");

	let Some(rating) = parse_rating(&form.rating) else {
		stt.sessions
			.flash(token, FlashKind::Error, "Rating must be a whole number from 1 to 5")
			.await;
		return Ok(Redirect::to(&back).into_response());
	};

	// the UNIQUE(user_id, book_id) constraint is the duplicate check,
	// so two concurrent submissions can't both land
	match sql::insert_review(&stt.db, user_id, book.id, &form.comment, rating).await? {
		InsertReview::Created => {
			log::info!("{} reviewed isbn {}", username, isbn);
			stt.sessions.flash(token, FlashKind::Info, "Review submitted!").await;
		},
		InsertReview::AlreadyReviewed => {
			stt.sessions
				.flash(token, FlashKind::Warning, "You already submitted a review for this book")
				.await;
		},
	}

	Ok(Redirect::to(&back).into_response())
}

pub fn round2(x: f64) -> f64 {
	(x * 100.0).round() / 100.0
}

pub async fn api_book(
	State(stt): State<SharedState>,
	Path(isbn): Path<String>,
) -> Result<Response, AppError> {
	let Some(stats) = sql::book_stats(&stt.db, &isbn).await? else {
		let body = Json(serde_json::json!({ "Error": "Invalid book ISBN" }));
		return Ok((StatusCode::UNPROCESSABLE_ENTITY, body).into_response());
	};

	Ok(Json(serde_json::json!({
		"title": stats.title,
		"author": stats.author,
		"year": stats.year,
		"isbn": stats.isbn,
		"review_count": stats.review_count,
		"average_score": round2(stats.average_score),
	}))
	.into_response())
}

pub async fn perform_logout(State(stt): State<SharedState>, cookies: Cookies) -> Redirect {
	let token = stt.sessions.attach(&cookies);
	stt.sessions.logout(token).await;
	cookies.remove(session::removal_cookie());
	Redirect::to("/")
}

#[cfg(test)]
mod tests {
	use super::*;

	fn form(username: &str, password: &str, confirm: &str) -> FormRegister {
		FormRegister {
			username: username.to_string(),
			password: password.to_string(),
			confirm: confirm.to_string(),
		}
	}

	#[test]
	fn registration_checks_username_first() {
		assert_eq!(
			validate_registration(&form("", "pw", "pw"), false),
			Err("You must provide an username")
		);
	}

	#[test]
	fn taken_username_is_rejected_before_password_checks() {
		assert_eq!(
			validate_registration(&form("ada", "", ""), true),
			Err("Username already exists")
		);
	}

	#[test]
	fn empty_password_is_rejected() {
		assert_eq!(
			validate_registration(&form("ada", "", ""), false),
			Err("You must provide a password")
		);
	}

	#[test]
	fn mismatched_confirm_is_rejected() {
		assert_eq!(
			validate_registration(&form("ada", "pw", "wp"), false),
			Err("Passwords do not match")
		);
	}

	#[test]
	fn well_formed_registration_passes() {
		assert_eq!(validate_registration(&form("ada", "pw", "pw"), false), Ok(()));
	}

	#[test]
	fn ratings_parse_in_range_only() {
		assert_eq!(parse_rating("3"), Some(3));
		assert_eq!(parse_rating(" 5 "), Some(5));
		assert_eq!(parse_rating("0"), None);
		assert_eq!(parse_rating("6"), None);
		assert_eq!(parse_rating("four"), None);
		assert_eq!(parse_rating("3.5"), None);
		assert_eq!(parse_rating(""), None);
	}

	#[test]
	fn average_score_rounds_to_two_decimals() {
		// mean of 4, 4, 5
		assert_eq!(round2(13.0 / 3.0), 4.33);
		assert_eq!(round2(2.0), 2.0);
		assert_eq!(round2(3.14159), 3.14);
		assert_eq!(round2(0.125), 0.13);
	}
}
