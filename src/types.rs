use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;

pub type Uid = i64;
pub type Bid = i64;

#[derive(Debug, Clone, FromRow)]
pub struct Account {
	pub id: Uid,
	pub username: String,
	pub hash: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Book {
	pub id: Bid,
	pub isbn: String,
	pub title: String,
	pub author: String,
	pub year: i32,
}

// one row of the search results table
#[derive(Debug, Clone, FromRow)]
pub struct BookHit {
	pub isbn: String,
	pub title: String,
	pub author: String,
}

// a stored review joined with the reviewer's name
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
	pub username: String,
	pub comment: String,
	pub rating: i32,
	pub time: DateTime<Utc>,
}

// aggregate row behind /api/<isbn>
#[derive(Debug, Clone, FromRow)]
pub struct BookStats {
	pub title: String,
	pub author: String,
	pub year: i32,
	pub isbn: String,
	pub review_count: i64,
	pub average_score: f64,
}

#[derive(Deserialize, Debug)]
pub struct FormRegister {
	pub username: String,
	pub password: String,
	pub confirm: String,
}

#[derive(Deserialize, Debug)]
pub struct FormLogin {
	pub username: String,
	pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct QuerySearch {
	pub book: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct FormReview {
	pub rating: String,
	pub comment: String,
}
