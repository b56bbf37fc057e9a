//! Review handlers.
//!
//! ```text
//! POST   /api/books/{bookId}/reviews              (Bearer)
//! GET    /api/books/{bookId}/reviews
//! GET    /api/books/{bookId}/rating-distribution
//! PUT    /api/reviews/{id}                        (Bearer, author)
//! DELETE /api/reviews/{id}                        (Bearer, author)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    BookReviews, CreateReviewRequest, DeleteReviewRequest, DeletedReview, UpdateReviewRequest,
};
use crate::domain::{ApiResult, RatingDistribution, Review, ReviewFields};

use super::auth::Authenticated;
use super::envelope::Envelope;
use super::error::ErrorEnvelope;
use super::state::HttpState;
use super::validation::{book_id, review_id};

/// Review fields; both required on create, either on update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[schema(minimum = 1, maximum = 5, example = 4)]
    pub rating: Option<i64>,
    #[schema(example = "Dense, strange and rewarding.")]
    pub review_text: Option<String>,
}

impl From<ReviewRequest> for ReviewFields {
    fn from(request: ReviewRequest) -> Self {
        Self {
            rating: request.rating,
            review_text: request.review_text,
        }
    }
}

/// Review a book the caller does not own.
#[utoipa::path(
    post,
    path = "/api/books/{bookId}/reviews",
    params(("bookId" = String, Path, description = "Book identifier")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Envelope<Review>),
        (status = 400, description = "Invalid fields or identifier", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller owns the book", body = ErrorEnvelope),
        (status = 404, description = "No such book", body = ErrorEnvelope),
        (status = 409, description = "Caller already reviewed the book", body = ErrorEnvelope)
    ),
    tags = ["reviews"],
    operation_id = "createReview",
    security(("bearer" = []))
)]
#[post("/books/{bookId}/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let book = book_id("bookId", &path)?;
    let review = state
        .reviews
        .create(CreateReviewRequest {
            book_id: book,
            reviewer: auth.user_id(),
            fields: payload.into_inner().into(),
        })
        .await?;
    Ok(Envelope::created(review, "Review added successfully"))
}

/// Reviews of a book, newest first, with the book's average rating.
#[utoipa::path(
    get,
    path = "/api/books/{bookId}/reviews",
    params(("bookId" = String, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Reviews", body = Envelope<BookReviews>),
        (status = 400, description = "Malformed identifier", body = ErrorEnvelope)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/books/{bookId}/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let book = book_id("bookId", &path)?;
    let reviews = state.reviews_query.list_for_book(&book).await?;
    Ok(Envelope::ok(reviews, "Reviews fetched successfully"))
}

/// Counts of reviews per star value, `[1★, 2★, 3★, 4★, 5★]`.
#[utoipa::path(
    get,
    path = "/api/books/{bookId}/rating-distribution",
    params(("bookId" = String, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Distribution", body = Envelope<RatingDistribution>),
        (status = 400, description = "Malformed identifier", body = ErrorEnvelope)
    ),
    tags = ["reviews"],
    operation_id = "ratingDistribution",
    security([])
)]
#[get("/books/{bookId}/rating-distribution")]
pub async fn rating_distribution(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let book = book_id("bookId", &path)?;
    let distribution = state.reviews_query.rating_distribution(&book).await?;
    Ok(Envelope::ok(
        distribution,
        "Rating distribution fetched successfully",
    ))
}

/// Edit the caller's review.
#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    params(("id" = String, Path, description = "Review identifier")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = Envelope<Review>),
        (status = 400, description = "Invalid fields or identifier", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller did not write the review", body = ErrorEnvelope),
        (status = 404, description = "No such review", body = ErrorEnvelope)
    ),
    tags = ["reviews"],
    operation_id = "updateReview",
    security(("bearer" = []))
)]
#[put("/reviews/{id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let id = review_id("id", &path)?;
    let review = state
        .reviews
        .update(UpdateReviewRequest {
            review_id: id,
            requester: auth.user_id(),
            fields: payload.into_inner().into(),
        })
        .await?;
    Ok(Envelope::ok(review, "Review updated successfully"))
}

/// Remove the caller's review.
#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Review deleted", body = Envelope<DeletedReview>),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller did not write the review", body = ErrorEnvelope),
        (status = 404, description = "No such review", body = ErrorEnvelope)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview",
    security(("bearer" = []))
)]
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = review_id("id", &path)?;
    let deleted = state
        .reviews
        .delete(DeleteReviewRequest {
            review_id: id,
            requester: auth.user_id(),
        })
        .await?;
    Ok(Envelope::ok(deleted, "Review deleted successfully"))
}
