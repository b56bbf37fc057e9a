//! In-process store implementing the user, book and review repositories.
//!
//! Used when no database is configured and by the HTTP integration tests. All
//! state lives behind one mutex so each repository call is serialised; the
//! `(book, user)` review constraint and the email constraint are checked
//! inside the insert that would violate them.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::Page;
use tracing::debug;

use crate::domain::ports::{
    BookRepository, BookRepositoryError, ReviewRepository, ReviewRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Book, BookId, BookListing, EmailAddress, Rating, RatingSummary, Review, ReviewId, User,
    UserAccount, UserId,
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, UserAccount>,
    books: HashMap<BookId, Book>,
    reviews: HashMap<ReviewId, Review>,
}

impl State {
    fn reviews_of_book(&self, book: &BookId) -> impl Iterator<Item = &Review> {
        self.reviews
            .values()
            .filter(move |review| review.book_id() == *book)
    }
}

/// Shared in-memory store.
///
/// Wrap in an `Arc` and hand the same instance to every service.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

/// Lock failure: another thread panicked while holding the store.
#[derive(Debug)]
struct Poisoned;

impl From<Poisoned> for UserRepositoryError {
    fn from(_: Poisoned) -> Self {
        Self::query("in-memory store lock poisoned")
    }
}

impl From<Poisoned> for BookRepositoryError {
    fn from(_: Poisoned) -> Self {
        Self::query("in-memory store lock poisoned")
    }
}

impl From<Poisoned> for ReviewRepositoryError {
    fn from(_: Poisoned) -> Self {
        Self::query("in-memory store lock poisoned")
    }
}

impl InMemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, Poisoned> {
        self.state.lock().map_err(|_| {
            debug!("in-memory store mutex poisoned");
            Poisoned
        })
    }
}

/// Newest first, identifier ascending among equal timestamps.
macro_rules! newest_first {
    ($items:expr) => {
        $items.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| left.id().cmp(&right.id()))
        })
    };
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut state = self.lock()?;
        let email = account.user.email();
        if state.users.values().any(|existing| existing.user.email() == email) {
            return Err(UserRepositoryError::duplicate_email(email.as_str()));
        }
        state.users.insert(account.user.id(), account.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .find(|account| account.user.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock()?;
        Ok(state.users.get(id).map(|account| account.user.clone()))
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id))
            .map(|account| account.user.clone())
            .collect())
    }
}

#[async_trait]
impl BookRepository for InMemoryStore {
    async fn insert(&self, book: &Book) -> Result<(), BookRepositoryError> {
        let mut state = self.lock()?;
        state.books.insert(book.id(), book.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookRepositoryError> {
        let state = self.lock()?;
        Ok(state.books.get(id).cloned())
    }

    async fn find_many(&self, ids: &[BookId]) -> Result<Vec<Book>, BookRepositoryError> {
        let state = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.books.get(id))
            .cloned()
            .collect())
    }

    async fn update_details(&self, book: &Book) -> Result<bool, BookRepositoryError> {
        let mut state = self.lock()?;
        let Some(stored) = state.books.get_mut(&book.id()) else {
            return Ok(false);
        };
        // Aggregates belong to the rating aggregator; keep what is stored.
        let rating = stored.rating();
        *stored = book.clone().with_rating(rating);
        Ok(true)
    }

    async fn set_rating(
        &self,
        id: &BookId,
        rating: RatingSummary,
    ) -> Result<bool, BookRepositoryError> {
        let mut state = self.lock()?;
        let Some(stored) = state.books.remove(id) else {
            return Ok(false);
        };
        state.books.insert(*id, stored.with_rating(rating));
        Ok(true)
    }

    async fn delete(&self, id: &BookId) -> Result<bool, BookRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.books.remove(id).is_some())
    }

    async fn list(&self, listing: &BookListing) -> Result<Page<Book>, BookRepositoryError> {
        let state = self.lock()?;
        let mut matching: Vec<&Book> = state
            .books
            .values()
            .filter(|book| listing.matches(book))
            .collect();
        matching.sort_by(|left, right| listing.compare(left, right));

        let request = listing.page();
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect();
        Ok(Page::new(items, request, total))
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Book>, BookRepositoryError> {
        let state = self.lock()?;
        let mut books: Vec<Book> = state
            .books
            .values()
            .filter(|book| book.is_owned_by(*owner))
            .cloned()
            .collect();
        newest_first!(books);
        Ok(books)
    }

    async fn list_ids(&self) -> Result<Vec<BookId>, BookRepositoryError> {
        let state = self.lock()?;
        let mut ids: Vec<BookId> = state.books.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut state = self.lock()?;
        let clash = state
            .reviews_of_book(&review.book_id())
            .any(|existing| existing.user_id() == review.user_id());
        if clash {
            return Err(ReviewRepositoryError::duplicate(
                review.book_id().to_string(),
                review.user_id().to_string(),
            ));
        }
        state.reviews.insert(review.id(), review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let state = self.lock()?;
        Ok(state.reviews.get(id).cloned())
    }

    async fn find_by_book_and_user(
        &self,
        book: &BookId,
        user: &UserId,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .reviews_of_book(book)
            .find(|review| review.user_id() == *user)
            .cloned())
    }

    async fn update(&self, review: &Review) -> Result<bool, ReviewRepositoryError> {
        let mut state = self.lock()?;
        match state.reviews.get_mut(&review.id()) {
            Some(stored) => {
                *stored = review.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.reviews.remove(id).is_some())
    }

    async fn delete_by_book(&self, book: &BookId) -> Result<u64, ReviewRepositoryError> {
        let mut state = self.lock()?;
        let before = state.reviews.len();
        state.reviews.retain(|_, review| review.book_id() != *book);
        let removed = before - state.reviews.len();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }

    async fn list_by_book(&self, book: &BookId) -> Result<Vec<Review>, ReviewRepositoryError> {
        let state = self.lock()?;
        let mut reviews: Vec<Review> = state.reviews_of_book(book).cloned().collect();
        newest_first!(reviews);
        Ok(reviews)
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Review>, ReviewRepositoryError> {
        let state = self.lock()?;
        let mut reviews: Vec<Review> = state
            .reviews
            .values()
            .filter(|review| review.is_authored_by(*user))
            .cloned()
            .collect();
        newest_first!(reviews);
        Ok(reviews)
    }

    async fn ratings_for_book(&self, book: &BookId) -> Result<Vec<Rating>, ReviewRepositoryError> {
        let state = self.lock()?;
        Ok(state.reviews_of_book(book).map(Review::rating).collect())
    }

    async fn count_by_book(&self, book: &BookId) -> Result<u64, ReviewRepositoryError> {
        let state = self.lock()?;
        let count = state.reviews_of_book(book).count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
