//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). Only
//! compiled for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Book, BookFields, BookId, EmailAddress, Rating, Review, ReviewDraft, ReviewId, ReviewText,
    User, UserId, UserName,
};

/// Fixed instant used as "now" by fixtures.
pub fn fixture_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single() {
        Some(now) => now,
        None => panic!("fixture timestamp is unambiguous"),
    }
}

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// A clock starting at [`fixture_now`], ready to hand to a service.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new(fixture_now()))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// A complete, valid set of book fields.
pub fn book_fields(title: &str, author: &str, genre: &str, year: i64) -> BookFields {
    BookFields {
        title: Some(title.to_owned()),
        author: Some(author.to_owned()),
        description: Some(format!("{title} by {author}, a fixture synopsis.")),
        genre: Some(genre.to_owned()),
        year: Some(year),
    }
}

/// A stored book owned by `owner`, created at [`fixture_now`].
pub fn sample_book(owner: UserId) -> Book {
    let draft = match book_fields("Dune", "Frank Herbert", "Science Fiction", 1965).into_draft() {
        Ok(draft) => draft,
        Err(error) => panic!("fixture book fields are valid: {error}"),
    };
    Book::create(BookId::random(), draft, owner, fixture_now())
}

/// A stored review of `book` by `author`.
pub fn sample_review(book: BookId, author: UserId, stars: i64) -> Review {
    let draft = ReviewDraft {
        rating: match Rating::new(stars) {
            Ok(rating) => rating,
            Err(error) => panic!("fixture rating is valid: {error}"),
        },
        review_text: match ReviewText::new("A thoroughly considered review.") {
            Ok(text) => text,
            Err(error) => panic!("fixture review text is valid: {error}"),
        },
    };
    Review::create(ReviewId::random(), book, author, draft, fixture_now())
}

/// A public user with the given display name and email.
pub fn sample_user(name: &str, email: &str) -> User {
    let name = match UserName::new(name) {
        Ok(name) => name,
        Err(error) => panic!("fixture name is valid: {error}"),
    };
    let email = match EmailAddress::new(email) {
        Ok(email) => email,
        Err(error) => panic!("fixture email is valid: {error}"),
    };
    User::new(UserId::random(), name, email, fixture_now())
}
