// book catalog & review server

mod crypto;
mod error;
mod goodreads;
mod routes;
mod session;
mod sql;
mod types;
mod views;

use std::sync::Arc;

use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_cookies::CookieManagerLayer;

use crate::session::Sessions;

pub struct ServerState {
	pub db: sql::Db,
	pub sessions: Sessions,
	pub goodreads: goodreads::Client,
}

pub type SharedState = Arc<ServerState>;

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();
	init_logger();

	let db_connection_str = std::env::var("DATABASE_URL")
		.expect("DATABASE_URL not set in env");
	// goodreads takes the key as a query parameter, never validated here
	let goodreads_key = std::env::var("GOODREADS_KEY").unwrap_or_default();

	// set up connection pool
	let pool = PgPoolOptions::new()
		.max_connections(5)
		.acquire_timeout(std::time::Duration::from_secs(3))
		.connect(&db_connection_str).await
		.expect("can't connect to database");

	sql::apply_schema(&pool).await
		.expect("can't apply table schema");

	let state = Arc::new(ServerState {
		db: pool,
		sessions: Sessions::default(),
		goodreads: goodreads::Client::new(goodreads_key),
	});

	let app = axum::Router::new()
		.route("/", get(routes::display_index))
		.route("/register", get(routes::display_register).post(routes::perform_register))
		.route("/login", get(routes::display_login).post(routes::perform_login))
		.route("/search", get(routes::display_search))
		.route("/results", get(routes::perform_search))
		.route("/result/:isbn", get(routes::display_book).post(routes::perform_review))
		.route("/api/:isbn", get(routes::api_book))
		.route("/logout", get(routes::perform_logout))
		.layer(CookieManagerLayer::new())
		.with_state(state);

	let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
	log::info!("listening on 0.0.0.0:8080");
	axum::serve(listener, app).await.unwrap();
}

fn init_logger() {
	fern::Dispatch::new()
		.format(|out, message, record| {
			let now = chrono::Local::now();
			out.finish(format_args!(
				"{} {:5} {} {}",
				now.format("%H:%M:%S"),
				record.level(),
				record.target(),
				message
			))
		})
		.level(log::LevelFilter::Warn)
		.level_for("bookery", log::LevelFilter::Info)
		.chain(std::io::stdout())
		.apply()
		.expect("logging is initialized");
}
