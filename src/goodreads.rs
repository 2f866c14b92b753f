use serde::Deserialize;
use thiserror::Error;

const REVIEW_COUNTS_URL: &str = "https://www.goodreads.com/book/review_counts.json";

// aggregate counts for one isbn, as review_counts.json reports them.
// average_rating arrives as a decimal string, e.g. "4.12"
#[derive(Debug, Clone, Deserialize)]
pub struct BookCounts {
	pub ratings_count: i64,
	pub work_ratings_count: i64,
	pub average_rating: String,
}

#[derive(Debug, Deserialize)]
struct ReviewCounts {
	books: Vec<BookCounts>,
}

#[derive(Debug, Error)]
pub enum GoodreadsError {
	#[error("review counts request failed: {0}")]
	Request(#[from] reqwest::Error),
	#[error("no review counts for isbn {0}")]
	Missing(String),
}

#[derive(Debug, Clone)]
pub struct Client {
	http: reqwest::Client,
	key: String,
}

impl Client {
	pub fn new(key: String) -> Self {
		Self {
			http: reqwest::Client::new(),
			key,
		}
	}

	// no retry and no fallback: a failed call surfaces as an error page
	pub async fn review_counts(&self, isbn: &str) -> Result<BookCounts, GoodreadsError> {
		let payload: ReviewCounts = self.http
			.get(REVIEW_COUNTS_URL)
			.query(&[("key", self.key.as_str()), ("isbns", isbn)])
			.send().await?
			.error_for_status()?
			.json().await?;

		payload.books
			.into_iter()
			.next()
			.ok_or_else(|| GoodreadsError::Missing(isbn.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// trimmed from a real review_counts.json response
	const FIXTURE: &str = r#"{
		"books": [{
			"id": 29207858,
			"isbn": "1416949658",
			"isbn13": "9781416949657",
			"ratings_count": 5626,
			"reviews_count": 10509,
			"text_reviews_count": 604,
			"work_ratings_count": 29963,
			"work_reviews_count": 57838,
			"work_text_reviews_count": 2789,
			"average_rating": "4.22"
		}]
	}"#;

	#[test]
	fn parses_review_counts_payload() {
		let payload: ReviewCounts = serde_json::from_str(FIXTURE).unwrap();
		let counts = &payload.books[0];
		assert_eq!(counts.ratings_count, 5626);
		assert_eq!(counts.work_ratings_count, 29963);
		assert_eq!(counts.average_rating, "4.22");
	}

	#[test]
	fn empty_books_array_is_missing() {
		let payload: ReviewCounts = serde_json::from_str(r#"{"books": []}"#).unwrap();
		assert!(payload.books.is_empty());
	}
}
