use std::collections::HashMap;
use tokio::sync::Mutex;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::types::Uid;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
	Info,
	Warning,
	Error,
}

impl FlashKind {
	pub fn label(self) -> &'static str {
		match self {
			FlashKind::Info => "info",
			FlashKind::Warning => "warning",
			FlashKind::Error => "error",
		}
	}
}

// one-time message, shown on the next rendered page
#[derive(Debug, Clone)]
pub struct Flash {
	pub kind: FlashKind,
	pub message: String,
}

#[derive(Debug, Default)]
struct Session {
	user: Option<(Uid, String)>,
	flashes: Vec<Flash>,
}

// scoped to the whole site, otherwise a cookie minted on /result/<isbn>
// sticks to that directory and shadows the one set at login
fn session_cookie(token: Uuid) -> Cookie<'static> {
	Cookie::build((SESSION_COOKIE, token.to_string()))
		.path("/")
		.build()
}

// removal has to name the same path to hit the same cookie
pub fn removal_cookie() -> Cookie<'static> {
	Cookie::build(SESSION_COOKIE).path("/").build()
}

// in-process store, keyed by the uuid carried in the session cookie
#[derive(Debug, Default)]
pub struct Sessions {
	inner: Mutex<HashMap<Uuid, Session>>,
}

impl Sessions {
	// token from the cookie, minting a fresh one on first contact
	pub fn attach(&self, cookies: &Cookies) -> Uuid {
		let known = cookies
			.get(SESSION_COOKIE)
			.and_then(|c| Uuid::parse_str(c.value()).ok());
		match known {
			Some(token) => token,
			None => {
				let token = Uuid::new_v4();
				cookies.add(session_cookie(token));
				token
			},
		}
	}

	pub async fn login(&self, token: Uuid, id: Uid, username: &str) {
		let mut sessions = self.inner.lock().await;
		sessions.entry(token).or_default().user = Some((id, username.to_string()));
	}

	pub async fn logout(&self, token: Uuid) {
		self.inner.lock().await.remove(&token);
	}

	pub async fn user(&self, token: Uuid) -> Option<(Uid, String)> {
		self.inner.lock().await.get(&token).and_then(|s| s.user.clone())
	}

	pub async fn flash(&self, token: Uuid, kind: FlashKind, message: impl Into<String>) {
		let mut sessions = self.inner.lock().await;
		sessions.entry(token).or_default().flashes.push(Flash {
			kind,
			message: message.into(),
		});
	}

	// drains: each flash is delivered at most once.
	// anonymous records are dropped once emptied so the map doesn't
	// grow with every client-supplied token
	pub async fn take_flashes(&self, token: Uuid) -> Vec<Flash> {
		let mut sessions = self.inner.lock().await;
		let Some(session) = sessions.get_mut(&token) else {
			return Vec::new();
		};
		let flashes = std::mem::take(&mut session.flashes);
		if session.user.is_none() {
			sessions.remove(&token);
		}
		flashes
	}

	#[cfg(test)]
	async fn record_count(&self) -> usize {
		self.inner.lock().await.len()
	}
}
