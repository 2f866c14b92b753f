use maud::{html, Markup, DOCTYPE};

use crate::goodreads::BookCounts;
use crate::session::Flash;
use crate::types::{Book, BookHit, ReviewRow};

fn page(title: &str, body: Markup) -> Markup {
	html! {
		(DOCTYPE)
		html {
			head { title { (title) } }
			body { (body) }
		}
	}
}

pub fn home(user: Option<&str>) -> Markup {
	page("Bookery", html! {
		h1 { "Bookery" }
		@if let Some(name) = user {
			p { "Logged in as " (name) ". " a href="/logout" { "Log out" } }
		} @else {
			p { a href="/login" { "Log in" } " or " a href="/register" { "register" } "." }
		}
		p { a href="/search" { "Search the catalog" } }
	})
}

pub fn register_form() -> Markup {
	page("Register", html! {
		h1 { "Register" }
		form method="POST" action="/register" {
			input name="username" type="text" placeholder="username" {}
			input name="password" type="password" placeholder="password" {}
			input name="confirm" type="password" placeholder="confirm password" {}
			button { "Register" }
		}
		p { "Already have an account? " a href="/login" { "Log in" } }
	})
}

pub fn login_form(flashes: &[Flash]) -> Markup {
	page("Log in", html! {
		@for flash in flashes {
			p class={ "flash " (flash.kind.label()) } { (flash.message) }
		}
		h1 { "Log in" }
		form method="POST" action="/login" {
			input name="username" type="text" placeholder="username" {}
			input name="password" type="password" placeholder="password" {}
			button { "LogIn" }
		}
		p { "No account yet? " a href="/register" { "Register" } }
	})
}

pub fn login_done(username: &str) -> Markup {
	page("Logged in", html! {
		h1 { "Welcome back, " (username) }
		p { a href="/search" { "Search the catalog" } }
		p { a href="/logout" { "Log out" } }
	})
}

pub fn search_form() -> Markup {
	page("Search", html! {
		h1 { "Search the catalog" }
		form method="GET" action="/results" {
			input name="book" type="text" placeholder="isbn, title or author" {}
			button { "Search" }
		}
	})
}

pub fn search_results(books: &[BookHit]) -> Markup {
	page("Results", html! {
		h1 { "Results" }
		table {
			thead { tr {
				td { "ISBN" }
				td { "Title" }
				td { "Author" }
			} }
			tbody {
				@for book in books {
					tr {
						th { a href={ "/result/" (book.isbn) } { (book.isbn) } }
						td { (book.title) }
						td { (book.author) }
					}
				}
			}
		}
		p { a href="/search" { "Search again" } }
	})
}

pub fn book_page(
	book: &Book,
	counts: &BookCounts,
	reviews: &[ReviewRow],
	flashes: &[Flash],
	logged_in: bool,
) -> Markup {
	page(&book.title, html! {
		@for flash in flashes {
			p class={ "flash " (flash.kind.label()) } { (flash.message) }
		}

		h1 { (book.title) }
		p { "by " (book.author) " (" (book.year) "), ISBN " (book.isbn) }

		h2 { "Goodreads" }
		p { (counts.work_ratings_count) " ratings, " (counts.average_rating) " average" }

		h2 { "Reviews" }
		@if reviews.is_empty() {
			p { "No reviews yet" }
		} @else {
			table {
				thead { tr {
					td { "User" }
					td { "Rating" }
					td { "Comment" }
					td { "When" }
				} }
				tbody {
					@for review in reviews {
						tr {
							th { (review.username) }
							td { (review.rating) "/5" }
							td { (review.comment) }
							td { (review.time.format("%d %b %y - %H:%M:%S")) }
						}
					}
				}
			}
		}

		@if logged_in {
			h2 { "Leave a review" }
			form method="POST" action={ "/result/" (book.isbn) } {
				label { "Rating (1-5) "
					input name="rating" type="number" min="1" max="5" {}
				}
				textarea name="comment" placeholder="your review" {}
				button { "Submit" }
			}
		} @else {
			p { a href="/login" { "Log in" } " to leave a review" }
		}

		p { a href="/search" { "Back to search" } }
	})
}

pub fn error_page(title: &str, message: &str, back: &str) -> Markup {
	page(title, html! {
		h1 { (title) }
		p { (message) }
		p { a href=(back) { "Go back" } }
	})
}

pub fn register_error(message: &str) -> Markup {
	error_page("Registration failed", message, "/register")
}

pub fn login_error(message: &str) -> Markup {
	error_page("Login failed", message, "/login")
}

pub fn search_error(message: &str) -> Markup {
	error_page("Search failed", message, "/search")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::{Flash, FlashKind};
	use chrono::{TimeZone, Utc};

	fn some_book() -> Book {
		Book {
			id: 1,
			isbn: "1416949658".to_string(),
			title: "The Book Thief".to_string(),
			author: "Markus Zusak".to_string(),
			year: 2006,
		}
	}

	fn some_counts() -> BookCounts {
		BookCounts {
			ratings_count: 5626,
			work_ratings_count: 29963,
			average_rating: "4.22".to_string(),
		}
	}

	#[test]
	fn results_table_lists_every_hit() {
		let hits = vec![
			BookHit {
				isbn: "1416949658".to_string(),
				title: "The Book Thief".to_string(),
				author: "Markus Zusak".to_string(),
			},
		];
		let markup = search_results(&hits).into_string();
		assert!(markup.contains("1416949658"));
		assert!(markup.contains("The Book Thief"));
		assert!(markup.contains("/result/1416949658"));
	}

	#[test]
	fn book_page_shows_stats_reviews_and_flashes() {
		let reviews = vec![ReviewRow {
			username: "ada".to_string(),
			comment: "loved it".to_string(),
			rating: 5,
			time: Utc.with_ymd_and_hms(2024, 2, 1, 12, 30, 0).unwrap(),
		}];
		let flashes = vec![Flash {
			kind: FlashKind::Info,
			message: "Review submitted!".to_string(),
		}];
		let markup = book_page(&some_book(), &some_counts(), &reviews, &flashes, true).into_string();
		assert!(markup.contains("29963"));
		assert!(markup.contains("4.22"));
		assert!(markup.contains("ada"));
		assert!(markup.contains("loved it"));
		assert!(markup.contains("Review submitted!"));
		assert!(markup.contains("name=\"rating\""));
	}

	#[test]
	fn book_page_hides_review_form_when_logged_out() {
		let markup = book_page(&some_book(), &some_counts(), &[], &[], false).into_string();
		assert!(!markup.contains("name=\"rating\""));
		assert!(markup.contains("to leave a review"));
	}

	#[test]
	fn login_form_renders_pending_flashes() {
		let flashes = vec![Flash {
			kind: FlashKind::Warning,
			message: "You must be logged in to review".to_string(),
		}];
		let markup = login_form(&flashes).into_string();
		assert!(markup.contains("You must be logged in to review"));
		assert!(markup.contains("name=\"username\""));

		let empty = login_form(&[]).into_string();
		assert!(!empty.contains("flash"));
	}

	#[test]
	fn error_pages_carry_their_message() {
		let markup = register_error("Username already exists").into_string();
		assert!(markup.contains("Username already exists"));
		assert!(markup.contains("/register"));
	}
}
