//! Catalogue use-cases.
//!
//! [`BookService`] implements [`BookCommand`] and [`BookQuery`]. Deleting a
//! book is an explicit two-step cascade: the book first, then its reviews.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use tracing::{error, info};

use super::ports::{
    BookCommand, BookQuery, BookRepository, CreateBookRequest, DeleteBookRequest, DeletedBook,
    ReviewRepository, UpdateBookRequest,
};
use super::{Book, BookId, BookListing, Error, RatingSummary, UserId};

/// Catalogue service over the book and review repositories.
pub struct BookService<B, R> {
    books: Arc<B>,
    reviews: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<B, R> BookService<B, R> {
    /// Create a new service.
    pub fn new(books: Arc<B>, reviews: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            books,
            reviews,
            clock,
        }
    }
}

impl<B, R> BookService<B, R>
where
    B: BookRepository,
    R: ReviewRepository,
{
    async fn require_owned(&self, id: &BookId, requester: UserId) -> Result<Book, Error> {
        let book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("book not found"))?;
        if book.is_owned_by(requester) {
            Ok(book)
        } else {
            Err(Error::forbidden("only the user who added this book can change it"))
        }
    }
}

#[async_trait]
impl<B, R> BookCommand for BookService<B, R>
where
    B: BookRepository,
    R: ReviewRepository,
{
    async fn create(&self, request: CreateBookRequest) -> Result<Book, Error> {
        let CreateBookRequest { owner, fields } = request;
        let draft = fields.into_draft()?;
        let book = Book::create(BookId::random(), draft, owner, self.clock.utc());
        self.books.insert(&book).await?;
        info!(book_id = %book.id(), user_id = %owner, "book created");
        Ok(book)
    }

    async fn update(&self, request: UpdateBookRequest) -> Result<Book, Error> {
        let UpdateBookRequest {
            book_id,
            requester,
            fields,
        } = request;
        let existing = self.require_owned(&book_id, requester).await?;
        let changes = fields.into_changes()?;

        let updated = existing.apply(changes, self.clock.utc());
        if !self.books.update_details(&updated).await? {
            return Err(Error::not_found("book not found"));
        }
        info!(book_id = %book_id, user_id = %requester, "book updated");
        Ok(updated)
    }

    async fn delete(&self, request: DeleteBookRequest) -> Result<DeletedBook, Error> {
        let DeleteBookRequest { book_id, requester } = request;
        self.require_owned(&book_id, requester).await?;

        if !self.books.delete(&book_id).await? {
            return Err(Error::not_found("book not found"));
        }
        let reviews_removed = match self.reviews.delete_by_book(&book_id).await {
            Ok(count) => count,
            Err(err) => {
                error!(
                    book_id = %book_id,
                    error = %err,
                    "book deleted but its reviews were not"
                );
                return Err(Error::internal(format!(
                    "book removed but review cleanup failed: {err}"
                )));
            }
        };
        info!(
            book_id = %book_id,
            user_id = %requester,
            reviews_removed,
            "book deleted"
        );
        Ok(DeletedBook {
            book_id,
            reviews_removed,
        })
    }
}

#[async_trait]
impl<B, R> BookQuery for BookService<B, R>
where
    B: BookRepository,
    R: ReviewRepository,
{
    async fn list(&self, listing: BookListing) -> Result<Page<Book>, Error> {
        Ok(self.books.list(&listing).await?)
    }

    async fn get(&self, id: &BookId) -> Result<Book, Error> {
        let book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("book not found"))?;
        let review_count = self.reviews.count_by_book(id).await?;
        let rating = RatingSummary {
            review_count,
            ..book.rating()
        };
        Ok(book.with_rating(rating))
    }
}
