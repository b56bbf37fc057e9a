//! Rating aggregates and the review guard, end to end over the in-memory store.

#[path = "support/api.rs"]
mod api;

use actix_web::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;

use api::{add_book, add_review, get_book, register, send, spawn};

#[rstest]
#[actix_web::test]
async fn unreviewed_book_has_zeroed_aggregates() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let book = add_book(&app, &owner, "Quiet Shelf", "Fiction", 1990).await;

    let data = get_book(&app, &book).await;

    assert_eq!(data["averageRating"], json!(0.0));
    assert_eq!(data["reviewCount"], json!(0));
}

#[rstest]
#[actix_web::test]
async fn aggregates_follow_creates_and_deletes() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let book = add_book(&app, &owner, "Three Opinions", "Fiction", 2001).await;

    let mut review_ids = Vec::new();
    for (index, rating) in [5, 3, 4].into_iter().enumerate() {
        let reader = register(&app, "Reader", &format!("reader{index}@example.com")).await;
        let (status, body) = add_review(&app, &reader, &book, rating).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        review_ids.push((reader, body["data"]["id"].as_str().expect("id").to_owned()));
    }

    let data = get_book(&app, &book).await;
    assert_eq!(data["reviewCount"], json!(3));
    assert_eq!(data["averageRating"], json!(4.0));

    let (reader, review) = &review_ids[1];
    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/reviews/{review}"),
        Some(reader),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["bookId"], json!(book));

    let data = get_book(&app, &book).await;
    assert_eq!(data["reviewCount"], json!(2));
    assert_eq!(data["averageRating"], json!(4.5));
}

#[rstest]
#[actix_web::test]
async fn owner_cannot_review_own_book() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let book = add_book(&app, &owner, "Self Regard", "Memoir", 2010).await;

    let (status, body) = add_review(&app, &owner, &book, 5).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("forbidden"));
    assert_eq!(get_book(&app, &book).await["reviewCount"], json!(0));
}

#[rstest]
#[actix_web::test]
async fn second_review_by_the_same_user_conflicts() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let reader = register(&app, "Reader", "reader@example.com").await;
    let book = add_book(&app, &owner, "Once Only", "Fiction", 1999).await;

    let (first, _) = add_review(&app, &reader, &book, 4).await;
    let (second, body) = add_review(&app, &reader, &book, 2).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["statusCode"], json!(409));
    let data = get_book(&app, &book).await;
    assert_eq!(data["reviewCount"], json!(1));
    assert_eq!(data["averageRating"], json!(4.0));
}

#[rstest]
#[actix_web::test]
async fn reviewing_a_missing_book_is_not_found() {
    let app = spawn().await;
    let reader = register(&app, "Reader", "reader@example.com").await;

    let (status, _) = add_review(&app, &reader, "3fa85f64-5717-4562-b3fc-2c963f66afa6", 4).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn rating_only_update_keeps_text_and_refreshes_average() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let reader = register(&app, "Reader", "reader@example.com").await;
    let book = add_book(&app, &owner, "Second Thoughts", "Fiction", 2015).await;
    let (_, created) = add_review(&app, &reader, &book, 2).await;
    let review = created["data"]["id"].as_str().expect("id").to_owned();
    let original_text = created["data"]["reviewText"].clone();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/reviews/{review}"),
        Some(&reader),
        Some(json!({ "rating": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["rating"], json!(5));
    assert_eq!(body["data"]["reviewText"], original_text);
    assert_eq!(get_book(&app, &book).await["averageRating"], json!(5.0));
}

#[rstest]
#[actix_web::test]
async fn only_the_author_may_edit_a_review() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let reader = register(&app, "Reader", "reader@example.com").await;
    let book = add_book(&app, &owner, "Hands Off", "Fiction", 2015).await;
    let (_, created) = add_review(&app, &reader, &book, 3).await;
    let review = created["data"]["id"].as_str().expect("id").to_owned();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/reviews/{review}"),
        Some(&owner),
        Some(json!({ "rating": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(get_book(&app, &book).await["averageRating"], json!(3.0));
}

#[rstest]
#[actix_web::test]
async fn out_of_range_rating_is_rejected() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let reader = register(&app, "Reader", "reader@example.com").await;
    let book = add_book(&app, &owner, "Six Stars", "Fiction", 2015).await;

    let (status, body) = add_review(&app, &reader, &book, 6).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], json!("rating"));
}

#[rstest]
#[actix_web::test]
async fn distribution_counts_each_star_value() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let book = add_book(&app, &owner, "Divisive", "Fiction", 2020).await;
    for (index, rating) in [1, 1, 3, 5, 5, 5].into_iter().enumerate() {
        let reader = register(&app, "Reader", &format!("reader{index}@example.com")).await;
        let (status, _) = add_review(&app, &reader, &book, rating).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/books/{book}/rating-distribution"),
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([2, 0, 1, 0, 3]));
}

#[rstest]
#[actix_web::test]
async fn review_listing_is_newest_first_with_reviewer_names() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let first = register(&app, "First Reader", "first@example.com").await;
    let second = register(&app, "Second Reader", "second@example.com").await;
    let book = add_book(&app, &owner, "Talked About", "Fiction", 2020).await;
    add_review(&app, &first, &book, 4).await;
    add_review(&app, &second, &book, 2).await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/books/{book}/reviews"),
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(2));
    assert_eq!(body["data"]["averageRating"], json!(3.0));
    let names: Vec<_> = body["data"]["reviews"]
        .as_array()
        .expect("reviews array")
        .iter()
        .map(|review| review["reviewerName"].clone())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&json!("First Reader")));
    assert!(names.contains(&json!("Second Reader")));
}
