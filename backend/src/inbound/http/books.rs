//! Book catalogue handlers.
//!
//! ```text
//! GET    /api/books?search=dune&genre=Fiction&sort=-year&page=2&limit=5
//! GET    /api/books/{id}
//! POST   /api/books       (Bearer)
//! PUT    /api/books/{id}  (Bearer, owner)
//! DELETE /api/books/{id}  (Bearer, owner)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CreateBookRequest, DeleteBookRequest, DeletedBook, UpdateBookRequest,
};
use crate::domain::{ApiResult, Book, BookFields, BookListing, BookListingParams};

use super::auth::Authenticated;
use super::envelope::Envelope;
use super::error::ErrorEnvelope;
use super::state::HttpState;
use super::validation::{book_id, optional_count};

/// Raw listing query; numbers arrive as text so unreadable values fall back
/// to the defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookListQuery {
    /// One-based page number (default 1).
    pub page: Option<String>,
    /// Page size (default 5, values above 100 are clamped).
    pub limit: Option<String>,
    /// Case-insensitive substring of title or author.
    pub search: Option<String>,
    /// Exact genre.
    pub genre: Option<String>,
    /// Sort key such as `title` or `-year`.
    pub sort: Option<String>,
}

impl From<BookListQuery> for BookListingParams {
    fn from(query: BookListQuery) -> Self {
        Self {
            page: optional_count(query.page.as_deref()),
            limit: optional_count(query.limit.as_deref()),
            search: query.search,
            genre: query.genre,
            sort: query.sort,
        }
    }
}

/// One page of books.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub books: Vec<Book>,
    pub current_page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl From<pagination::Page<Book>> for BookPage {
    fn from(page: pagination::Page<Book>) -> Self {
        let (books, info) = page.into_parts();
        Self {
            books,
            current_page: info.current_page(),
            limit: info.limit(),
            total_items: info.total_items(),
            total_pages: info.total_pages(),
        }
    }
}

/// Book fields accepted on create (all required) and update (any subset).
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[schema(example = "The Dispossessed")]
    pub title: Option<String>,
    #[schema(example = "Ursula K. Le Guin")]
    pub author: Option<String>,
    pub description: Option<String>,
    #[schema(example = "Science Fiction")]
    pub genre: Option<String>,
    #[schema(example = 1974)]
    pub year: Option<i64>,
}

impl From<BookRequest> for BookFields {
    fn from(request: BookRequest) -> Self {
        Self {
            title: request.title,
            author: request.author,
            description: request.description,
            genre: request.genre,
            year: request.year,
        }
    }
}

/// List books with search, genre filter, sorting and paging.
#[utoipa::path(
    get,
    path = "/api/books",
    params(BookListQuery),
    responses(
        (status = 200, description = "Matching books", body = Envelope<BookPage>),
        (status = 400, description = "Unknown sort field", body = ErrorEnvelope)
    ),
    tags = ["books"],
    operation_id = "listBooks",
    security([])
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    query: web::Query<BookListQuery>,
) -> ApiResult<HttpResponse> {
    let params = BookListingParams::from(query.into_inner());
    let listing = BookListing::from_params(params, state.default_page_limit())?;
    let page = state.books_query.list(listing).await?;
    Ok(Envelope::ok(BookPage::from(page), "Books fetched successfully"))
}

/// Fetch one book with its live review count.
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Book", body = Envelope<Book>),
        (status = 400, description = "Malformed identifier", body = ErrorEnvelope),
        (status = 404, description = "No such book", body = ErrorEnvelope)
    ),
    tags = ["books"],
    operation_id = "getBook",
    security([])
)]
#[get("/books/{id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = book_id("id", &path)?;
    let book = state.books_query.get(&id).await?;
    Ok(Envelope::ok(book, "Book fetched successfully"))
}

/// Add a book owned by the caller.
#[utoipa::path(
    post,
    path = "/api/books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = Envelope<Book>),
        (status = 400, description = "Invalid fields", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    ),
    tags = ["books"],
    operation_id = "createBook",
    security(("bearer" = []))
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    let book = state
        .books
        .create(CreateBookRequest {
            owner: auth.user_id(),
            fields: payload.into_inner().into(),
        })
        .await?;
    Ok(Envelope::created(book, "Book created successfully"))
}

/// Change some fields of a book the caller owns.
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Book identifier")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = Envelope<Book>),
        (status = 400, description = "Invalid fields or identifier", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the book", body = ErrorEnvelope),
        (status = 404, description = "No such book", body = ErrorEnvelope)
    ),
    tags = ["books"],
    operation_id = "updateBook",
    security(("bearer" = []))
)]
#[put("/books/{id}")]
pub async fn update_book(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    let id = book_id("id", &path)?;
    let book = state
        .books
        .update(UpdateBookRequest {
            book_id: id,
            requester: auth.user_id(),
            fields: payload.into_inner().into(),
        })
        .await?;
    Ok(Envelope::ok(book, "Book updated successfully"))
}

/// Remove a book the caller owns together with its reviews.
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Book deleted", body = Envelope<DeletedBook>),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the book", body = ErrorEnvelope),
        (status = 404, description = "No such book", body = ErrorEnvelope)
    ),
    tags = ["books"],
    operation_id = "deleteBook",
    security(("bearer" = []))
)]
#[delete("/books/{id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = book_id("id", &path)?;
    let deleted = state
        .books
        .delete(DeleteBookRequest {
            book_id: id,
            requester: auth.user_id(),
        })
        .await?;
    Ok(Envelope::ok(deleted, "Book deleted successfully"))
}
