//! Book listing queries and book lifecycle over the full application.

#[path = "support/api.rs"]
mod api;

use actix_web::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

use api::{add_book, add_review, get_book, register, send, spawn};

fn years(body: &Value) -> Vec<i64> {
    body["data"]["books"]
        .as_array()
        .expect("books array")
        .iter()
        .map(|book| book["year"].as_i64().expect("year"))
        .collect()
}

#[rstest]
#[actix_web::test]
async fn search_genre_sort_and_page_combine() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    for n in 1..=7 {
        add_book(&app, &owner, &format!("Foo {n}"), "Fiction", 1900 + n).await;
    }
    add_book(&app, &owner, "Foo Facts", "Science", 1950).await;
    add_book(&app, &owner, "Bar Story", "Fiction", 1960).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/books?search=foo&genre=Fiction&sort=-year&page=2&limit=5",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(years(&body), vec![1902, 1901]);
    assert_eq!(body["data"]["currentPage"], json!(2));
    assert_eq!(body["data"]["limit"], json!(5));
    assert_eq!(body["data"]["totalItems"], json!(7));
    assert_eq!(body["data"]["totalPages"], json!(2));
}

#[rstest]
#[actix_web::test]
async fn page_past_the_end_is_empty_with_totals() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    add_book(&app, &owner, "Lonely", "Fiction", 2000).await;

    let (status, body) = send(&app, Method::GET, "/api/books?page=9", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(years(&body).is_empty());
    assert_eq!(body["data"]["totalItems"], json!(1));
    assert_eq!(body["data"]["totalPages"], json!(1));
}

#[rstest]
#[actix_web::test]
async fn search_matches_author_case_insensitively() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    add_book(&app, &owner, "Untitled", "Poetry", 1980).await;

    let (_, body) = send(&app, Method::GET, "/api/books?search=TEST%20author", None, None).await;

    assert_eq!(body["data"]["totalItems"], json!(1));
}

#[rstest]
#[actix_web::test]
async fn sorting_by_rating_uses_refreshed_aggregates() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let reader = register(&app, "Reader", "reader@example.com").await;
    let low = add_book(&app, &owner, "Low", "Fiction", 2000).await;
    let high = add_book(&app, &owner, "High", "Fiction", 2001).await;
    add_review(&app, &reader, &low, 2).await;
    add_review(&app, &reader, &high, 5).await;

    let (_, body) = send(&app, Method::GET, "/api/books?sort=-averageRating", None, None).await;

    let ids: Vec<_> = body["data"]["books"]
        .as_array()
        .expect("books array")
        .iter()
        .map(|book| book["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(high), json!(low)]);
}

#[rstest]
#[case("page=0", 1, 5)]
#[case("page=abc&limit=xyz", 1, 5)]
#[case("limit=0", 1, 5)]
#[case("limit=101", 1, 100)]
#[actix_web::test]
async fn unusable_paging_is_normalised(
    #[case] query: &str,
    #[case] page: u32,
    #[case] limit: u32,
) {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    add_book(&app, &owner, "Only One", "Fiction", 2000).await;

    let (status, body) = send(&app, Method::GET, &format!("/api/books?{query}"), None, None).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["currentPage"], json!(page));
    assert_eq!(body["data"]["limit"], json!(limit));
    assert_eq!(body["data"]["totalItems"], json!(1));
    assert_eq!(years(&body), vec![2000]);
}

#[rstest]
#[actix_web::test]
async fn unknown_sort_field_is_rejected() {
    let app = spawn().await;

    let (status, body) = send(&app, Method::GET, "/api/books?sort=isbn", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["details"]["field"], json!("sort"));
}

#[rstest]
#[actix_web::test]
async fn only_the_owner_may_change_a_book() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let other = register(&app, "Other", "other@example.com").await;
    let book = add_book(&app, &owner, "Mine", "Fiction", 2000).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/books/{book}"),
        Some(&other),
        Some(json!({ "title": "Theirs" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("only the user who added this book can change it"));

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/books/{book}"),
        Some(&owner),
        Some(json!({ "title": "Still Mine" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let data = get_book(&app, &book).await;
    assert_eq!(data["title"], json!("Still Mine"));
    assert_eq!(data["genre"], json!("Fiction"));
}

#[rstest]
#[actix_web::test]
async fn deleting_a_book_removes_its_reviews() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let reader = register(&app, "Reader", "reader@example.com").await;
    let book = add_book(&app, &owner, "Short Lived", "Fiction", 2000).await;
    add_review(&app, &reader, &book, 4).await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/books/{book}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["reviewsRemoved"], json!(1));

    let (status, _) = send(&app, Method::GET, &format!("/api/books/{book}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listing) = send(
        &app,
        Method::GET,
        &format!("/api/books/{book}/reviews"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["data"]["reviews"], json!([]));
    assert_eq!(listing["data"]["total"], json!(0));

    let (_, profile) = send(&app, Method::GET, "/api/auth/profile", Some(&reader), None).await;
    assert_eq!(profile["data"]["reviews"], json!([]));
}
