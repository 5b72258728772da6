mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::*;

#[tokio::test]
async fn lists_books_of_an_author_by_title() {
    let app = app().await;
    let id = author_id(&app, "king").await;

    let resp = get(&app, &format!("/api/authors/{}/books", id)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let titles: Vec<_> = resp
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["It", "Misery", "The Shining", "The Stand"]);

    let unknown = get(&app, &format!("/api/authors/{}/books", Uuid::new_v4())).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_then_fetch_a_book() {
    let app = app().await;
    let id = author_id(&app, "adams").await;
    let uri = format!("/api/authors/{}/books", id);

    let created = send_json(
        &app,
        "POST",
        &uri,
        "application/json",
        json!({"title": "Mostly Harmless", "description": "The fifth book of the trilogy."}),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let body = created.json();
    assert_eq!(body["authorId"], id.to_string());
    let location = created.header("location").to_string();
    assert_eq!(
        location,
        format!("{}/{}", uri, body["id"].as_str().unwrap())
    );

    let fetched = get(&app, &location).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["title"], "Mostly Harmless");
}

#[tokio::test]
async fn book_validation_failures_are_unprocessable() {
    let app = app().await;
    let uri = format!("/api/authors/{}/books", author_id(&app, "adams").await);

    let same = send_json(
        &app,
        "POST",
        &uri,
        "application/json",
        json!({"title": "Same", "description": "Same"}),
    )
    .await;
    assert_eq!(same.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(same.json()["error"]
        .as_str()
        .unwrap()
        .contains("The provided description should be different from the title."));

    let untitled = send_json(
        &app,
        "POST",
        &uri,
        "application/json",
        json!({"description": "No title"}),
    )
    .await;
    assert_eq!(untitled.status, StatusCode::UNPROCESSABLE_ENTITY);

    let long = send_json(
        &app,
        "POST",
        &uri,
        "application/json",
        json!({"title": "x".repeat(101)}),
    )
    .await;
    assert_eq!(long.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn put_updates_or_creates() {
    let app = app().await;
    let author = author_id(&app, "lapidus").await;
    let new_id = Uuid::new_v4();
    let uri = format!("/api/authors/{}/books/{}", author, new_id);
    let body = json!({"title": "Never Fuck Up", "description": "Second of the trilogy."});

    let created = send_json(&app, "PUT", &uri, "application/json", body).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.header("location"), uri);
    assert_eq!(created.json()["id"], new_id.to_string());

    let updated = send_json(
        &app,
        "PUT",
        &uri,
        "application/json",
        json!({"title": "Life Deluxe", "description": "Third of the trilogy."}),
    )
    .await;
    assert_eq!(updated.status, StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &uri).await.json()["title"], "Life Deluxe");

    let no_description = send_json(
        &app,
        "PUT",
        &uri,
        "application/json",
        json!({"title": "Only a title"}),
    )
    .await;
    assert_eq!(no_description.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn stale_if_match_is_refused() {
    let app = app().await;
    let author = author_id(&app, "gaiman").await;
    let books = get(&app, &format!("/api/authors/{}/books", author)).await;
    let book_id = books.json()[0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/authors/{}/books/{}", author, book_id);

    let read = get(&app, &uri).await;
    let etag = read.header("etag").to_string();

    let stale = send(
        &app,
        Request::put(&uri)
            .header("content-type", "application/json")
            .header("if-match", "\"outdated\"")
            .body(Body::from(
                json!({"title": "Stardust", "description": "A fairy tale."}).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(stale.status, StatusCode::PRECONDITION_FAILED);

    let fresh = send(
        &app,
        Request::put(&uri)
            .header("content-type", "application/json")
            .header("if-match", &etag)
            .body(Body::from(
                json!({"title": "Stardust", "description": "A fairy tale."}).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(fresh.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn delete_a_book() {
    let app = app().await;
    let author = author_id(&app, "adams").await;
    let books = get(&app, &format!("/api/authors/{}/books", author)).await;
    let book_id = books.json()[0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/authors/{}/books/{}", author, book_id);

    let deleted = send(&app, Request::delete(&uri).body(Body::empty()).unwrap()).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &uri).await.status, StatusCode::NOT_FOUND);

    let again = send(&app, Request::delete(&uri).body(Body::empty()).unwrap()).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn book_of_another_author_is_not_found() {
    let app = app().await;
    let king = author_id(&app, "king").await;
    let adams = author_id(&app, "adams").await;
    let books = get(&app, &format!("/api/authors/{}/books", king)).await;
    let book_id = books.json()[0]["id"].as_str().unwrap().to_string();

    let resp = get(&app, &format!("/api/authors/{}/books/{}", adams, book_id)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
