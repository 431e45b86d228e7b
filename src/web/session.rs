// src/web/session.rs
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

pub const SESSION_COOKIE: &str = "interview_session";

#[derive(Debug)]
pub enum SessionError {
    Missing,
}

/// The `feedback_id` of the interview this browser started last.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub feedback_id: String,
}

impl ActiveSession {
    pub fn store(cookies: &CookieJar<'_>, feedback_id: &str) {
        let cookie = Cookie::build((SESSION_COOKIE, feedback_id.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true);
        cookies.add_private(cookie);
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ActiveSession {
    type Error = SessionError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.cookies().get_private(SESSION_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => Outcome::Success(ActiveSession {
                feedback_id: cookie.value().to_string(),
            }),
            _ => Outcome::Error((Status::Unauthorized, SessionError::Missing)),
        }
    }
}
