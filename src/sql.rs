use crate::types::{Account, Bid, Book, BookHit, BookStats, ReviewRow, Uid};

pub type Db = sqlx::Pool<sqlx::Postgres>;

// applied once at startup; every statement is idempotent.
// the catalog itself (books) is expected to be populated out of band.
pub const TABLE_SCHEMA: &[&str] = &[
	r#"
CREATE TABLE IF NOT EXISTS users (
	id BIGSERIAL PRIMARY KEY,
	username TEXT NOT NULL UNIQUE,
	hash TEXT NOT NULL
);
	"#,
	r#"
CREATE TABLE IF NOT EXISTS books (
	id BIGSERIAL PRIMARY KEY,
	isbn TEXT NOT NULL UNIQUE,
	title TEXT NOT NULL,
	author TEXT NOT NULL,
	year INTEGER NOT NULL
);
	"#,
	r#"
CREATE TABLE IF NOT EXISTS reviews (
	id BIGSERIAL PRIMARY KEY,
	user_id BIGINT NOT NULL REFERENCES users(id),
	book_id BIGINT NOT NULL REFERENCES books(id),
	comment TEXT NOT NULL,
	rating INTEGER NOT NULL,
	time TIMESTAMPTZ NOT NULL DEFAULT now(),
	UNIQUE(user_id, book_id)
);
	"#,
];

pub async fn apply_schema(db: &Db) -> Result<(), sqlx::Error> {
	for statement in TABLE_SCHEMA {
		sqlx::query(statement).execute(db).await?;
	}
	Ok(())
}

pub async fn account_by_username(db: &Db, username: &str) -> Result<Option<Account>, sqlx::Error> {
	sqlx::query_as::<_, Account>(
		"SELECT id, username, hash FROM users WHERE username = $1"
	)
		.bind(username)
		.fetch_optional(db).await
}

pub async fn insert_account(db: &Db, username: &str, hash: &str) -> Result<(), sqlx::Error> {
	sqlx::query("INSERT INTO users (username, hash) VALUES ($1, $2)")
		.bind(username)
		.bind(hash)
		.execute(db).await?;
	Ok(())
}

pub async fn search_books(db: &Db, query: &str) -> Result<Vec<BookHit>, sqlx::Error> {
	let pattern = format!("%{query}%");
	sqlx::query_as::<_, BookHit>(
		"SELECT isbn, title, author FROM books \
		 WHERE isbn LIKE $1 OR title LIKE $1 OR author LIKE $1"
	)
		.bind(pattern)
		.fetch_all(db).await
}

pub async fn book_by_isbn(db: &Db, isbn: &str) -> Result<Option<Book>, sqlx::Error> {
	sqlx::query_as::<_, Book>(
		"SELECT id, isbn, title, author, year FROM books WHERE isbn = $1"
	)
		.bind(isbn)
		.fetch_optional(db).await
}

// oldest first, like the book page shows them
pub async fn reviews_for_book(db: &Db, book_id: Bid) -> Result<Vec<ReviewRow>, sqlx::Error> {
	sqlx::query_as::<_, ReviewRow>(
		"SELECT users.username, comment, rating, time FROM users \
		 INNER JOIN reviews ON users.id = reviews.user_id \
		 WHERE book_id = $1 ORDER BY time"
	)
		.bind(book_id)
		.fetch_all(db).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertReview {
	Created,
	// UNIQUE(user_id, book_id) tripped, nothing was written
	AlreadyReviewed,
}

pub async fn insert_review(
	db: &Db,
	user_id: Uid,
	book_id: Bid,
	comment: &str,
	rating: i32,
) -> Result<InsertReview, sqlx::Error> {
	let inserted = sqlx::query(
		"INSERT INTO reviews (user_id, book_id, comment, rating) VALUES ($1, $2, $3, $4)"
	)
		.bind(user_id)
		.bind(book_id)
		.bind(comment)
		.bind(rating)
		.execute(db).await;

	match inserted {
		Ok(_) => Ok(InsertReview::Created),
		Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(InsertReview::AlreadyReviewed),
		Err(e) => Err(e),
	}
}

// INNER JOIN on purpose: a book with no reviews yields no row,
// which the api reports the same way as an unknown isbn
pub async fn book_stats(db: &Db, isbn: &str) -> Result<Option<BookStats>, sqlx::Error> {
	sqlx::query_as::<_, BookStats>(
		"SELECT title, author, year, isbn, \
		 COUNT(reviews.id) AS review_count, \
		 AVG(reviews.rating)::float8 AS average_score \
		 FROM books INNER JOIN reviews ON books.id = reviews.book_id \
		 WHERE isbn = $1 GROUP BY title, author, year, isbn"
	)
		.bind(isbn)
		.fetch_optional(db).await
}
