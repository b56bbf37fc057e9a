//! Profile read model: a user, the books they added and the reviews they wrote.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{BookRepository, Profile, ProfileQuery, ReviewRepository, UserRepository};
use super::{Book, BookId, Error, Review, ReviewWithBook, UserId};

/// Assembles [`Profile`]s from the three repositories.
pub struct ProfileService<U, B, R> {
    users: Arc<U>,
    books: Arc<B>,
    reviews: Arc<R>,
}

impl<U, B, R> ProfileService<U, B, R> {
    /// Create a new service.
    pub const fn new(users: Arc<U>, books: Arc<B>, reviews: Arc<R>) -> Self {
        Self {
            users,
            books,
            reviews,
        }
    }
}

#[async_trait]
impl<U, B, R> ProfileQuery for ProfileService<U, B, R>
where
    U: UserRepository,
    B: BookRepository,
    R: ReviewRepository,
{
    async fn profile(&self, user_id: &UserId) -> Result<Profile, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))?;
        let books = self.books.list_by_owner(user_id).await?;
        let reviews = self.reviews.list_by_user(user_id).await?;

        let mut book_ids: Vec<BookId> = reviews.iter().map(Review::book_id).collect();
        book_ids.sort_unstable();
        book_ids.dedup();
        let reviewed: HashMap<BookId, Book> = self
            .books
            .find_many(&book_ids)
            .await?
            .into_iter()
            .map(|book| (book.id(), book))
            .collect();

        let reviews = reviews
            .into_iter()
            .map(|review| {
                let book = reviewed.get(&review.book_id());
                ReviewWithBook {
                    book_title: book.map(|b| b.title().clone()),
                    book_author: book.map(|b| b.author().clone()),
                    review,
                }
            })
            .collect();

        Ok(Profile {
            user,
            books,
            reviews,
        })
    }
}
