//! API integration tests
//!
//! These run against a live server with the development configuration
//! (bootstrap administrator admin/admin).

use chrono::{Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::{Mutex, MutexGuard};

use locallibrary_server::{config::AppConfig, models::UserClaims};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Held by every test that writes to the catalog, so that count and
/// paging checks only see their own changes
static CATALOG_WRITES: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

async fn catalog_writes() -> MutexGuard<'static, ()> {
    CATALOG_WRITES.lock().await
}

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

fn unique_suffix() -> String {
    format!("{:x}", Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

/// 13-digit ISBN that is unique per test run
fn unique_isbn(salt: u64) -> String {
    let n = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
    format!("{:013}", (n / 1000 + salt) % 10_000_000_000_000)
}

async fn create_author(client: &Client, token: &str, last_name: &str) -> i64 {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "first_name": "Test",
            "last_name": last_name,
            "date_of_birth": "1920-01-02"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("author id")
}

async fn create_book(client: &Client, token: &str, author_id: i64, title: &str, salt: u64) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "author_id": author_id,
            "summary": "A book used by the integration tests.",
            "isbn": unique_isbn(salt)
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("book id")
}

async fn create_instance(client: &Client, token: &str, book_id: i64, copy: Value) -> String {
    let response = client
        .post(format!("{}/books/{}/instances", BASE_URL, book_id))
        .bearer_auth(token)
        .json(&copy)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_str().expect("instance id").to_string()
}

async fn create_genre(client: &Client, token: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/genres", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("genre id")
}

/// Token for a signed-in user without `catalog.manage`, signed with the
/// server's configured secret
fn reader_token() -> String {
    dotenvy::dotenv().ok();
    let config = AppConfig::load().expect("Failed to load configuration");
    let now = Utc::now().timestamp();
    UserClaims {
        sub: "reader".to_string(),
        user_id: i32::MAX,
        capabilities: vec![],
        exp: now + 3600,
        iat: now,
    }
    .create_token(&config.auth.jwt_secret)
    .expect("Failed to sign token")
}

async fn get_json(client: &Client, url: String, token: Option<&str>) -> Value {
    let mut request = client.get(url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    let response = request.send().await.expect("Failed to send request");
    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse response")
}

/// Every item of a paginated listing, page by page
async fn all_pages(client: &Client, listing: &str, token: Option<&str>) -> Vec<Value> {
    let first = get_json(client, format!("{}{}?page=1", BASE_URL, listing), token).await;
    let num_pages = first["num_pages"].as_i64().expect("num_pages");

    let mut items = first["items"].as_array().expect("items").clone();
    for page in 2..=num_pages {
        let body = get_json(client, format!("{}{}?page={}", BASE_URL, listing, page), token).await;
        let page_items = body["items"].as_array().expect("items");
        if page < num_pages {
            assert_eq!(page_items.len() as i64, body["per_page"].as_i64().unwrap());
        }
        items.extend(page_items.iter().cloned());
    }
    items
}

async fn current_user_id(client: &Client, token: &str) -> i64 {
    let body: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    body["id"].as_i64().expect("user id")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "admin");
    assert!(body.get("password_hash").is_none());
    assert_eq!(body["capabilities"][0], "catalog.manage");
}

#[tokio::test]
#[ignore]
async fn test_home_counts_visits_per_session() {
    let client = Client::builder().cookie_store(true).build().unwrap();

    let first: Value = client
        .get(format!("{}/home", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let second: Value = client
        .get(format!("{}/home", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(first["num_visits"], 1);
    assert_eq!(second["num_visits"], 2);
    assert!(second["num_books"].as_i64().unwrap() >= 0);
    assert!(second["num_instances_available"].as_i64().unwrap() <= second["num_instances"].as_i64().unwrap());

    // A new client is a new session
    let other: Value = Client::new()
        .get(format!("{}/home", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(other["num_visits"], 1);
}

#[tokio::test]
#[ignore]
async fn test_book_listing_pages() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 5);
    assert!(body["items"].as_array().unwrap().len() <= 5);

    let past_end = body["num_pages"].as_i64().unwrap() + 1;
    let response = client
        .get(format!("{}/books?page={}", BASE_URL, past_end))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_author_with_books_cannot_be_deleted() {
    let _writes = catalog_writes().await;
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let author_id = create_author(&client, &token, &format!("Restrict{}", unique_suffix())).await;
    let book_id = create_book(&client, &token, author_id, "The Restricted Author", 1).await;

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Still there
    let response = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["books"][0]["id"], book_id);

    // Deleting the book first frees the author
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
    assert_eq!(response.headers()["location"], "/api/v1/books");

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_book_with_unknown_genre_is_rejected() {
    let _writes = catalog_writes().await;
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let author_id = create_author(&client, &token, &format!("Genre{}", unique_suffix())).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Nowhere",
            "author_id": author_id,
            "summary": "Filed under a genre that does not exist.",
            "isbn": unique_isbn(2),
            "genre_ids": [i32::MAX]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["field"], "genre_ids");
}

#[tokio::test]
#[ignore]
async fn test_renewal_window() {
    let _writes = catalog_writes().await;
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let user_id = current_user_id(&client, &token).await;

    let today = Utc::now().date_naive();
    let author_id = create_author(&client, &token, &format!("Renew{}", unique_suffix())).await;
    let book_id = create_book(&client, &token, author_id, "Renewable", 3).await;
    let instance_id = create_instance(
        &client,
        &token,
        book_id,
        json!({
            "imprint": "Test Press, 2024",
            "status": "on_loan",
            "due_back": today + Duration::days(3),
            "borrower_id": user_id
        }),
    )
    .await;

    let renew = |date: chrono::NaiveDate| {
        client
            .post(format!("{}/instances/{}/renew", BASE_URL, instance_id))
            .bearer_auth(&token)
            .json(&json!({ "renewal_date": date }))
            .send()
    };

    let response = renew(today - Duration::days(1)).await.expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["field"], "renewal_date");
    assert_eq!(body["message"], "Invalid date - renewal in past");

    let response = renew(today + Duration::days(29)).await.expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid date - renewal more than 4 weeks ahead");

    let response = renew(today + Duration::days(28)).await.expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["due_back"], json!(today + Duration::days(28)));
    assert_eq!(body["previous_due_back"], json!(today + Duration::days(3)));

    let response = renew(today).await.expect("Failed to send request");
    assert!(response.status().is_success());

    // The form proposes three weeks from today
    let form: Value = client
        .get(format!("{}/instances/{}/renew", BASE_URL, instance_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(form["proposed_renewal_date"], json!(today + Duration::days(21)));
}

#[tokio::test]
#[ignore]
async fn test_available_copy_cannot_be_renewed() {
    let _writes = catalog_writes().await;
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let author_id = create_author(&client, &token, &format!("Shelf{}", unique_suffix())).await;
    let book_id = create_book(&client, &token, author_id, "On the Shelf", 4).await;
    let instance_id = create_instance(
        &client,
        &token,
        book_id,
        json!({ "imprint": "Shelf Press", "status": "available" }),
    )
    .await;

    let response = client
        .post(format!("{}/instances/{}/renew", BASE_URL, instance_id))
        .bearer_auth(&token)
        .json(&json!({ "renewal_date": Utc::now().date_naive() + Duration::days(7) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let response = client
        .put(format!("{}/instances/{}", BASE_URL, instance_id))
        .bearer_auth(&token)
        .json(&json!({ "imprint": "Shelf Press", "status": "maintenance" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Maintenance straight to on loan is not a lifecycle step
    let response = client
        .put(format!("{}/instances/{}", BASE_URL, instance_id))
        .bearer_auth(&token)
        .json(&json!({
            "imprint": "Shelf Press",
            "status": "on_loan",
            "due_back": Utc::now().date_naive() + Duration::days(7),
            "borrower_id": current_user_id(&client, &token).await
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["field"], "status");
}

#[tokio::test]
#[ignore]
async fn test_my_loans_are_ordered_by_due_date() {
    let _writes = catalog_writes().await;
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let user_id = current_user_id(&client, &token).await;
    let today = Utc::now().date_naive();

    let author_id = create_author(&client, &token, &format!("Order{}", unique_suffix())).await;
    let book_id = create_book(&client, &token, author_id, "Borrowed Twice", 5).await;
    for days in [10, -2] {
        create_instance(
            &client,
            &token,
            book_id,
            json!({
                "imprint": "Loan Press",
                "status": "on_loan",
                "due_back": today + Duration::days(days),
                "borrower_id": user_id
            }),
        )
        .await;
    }

    let body: Value = client
        .get(format!("{}/loans/mine", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let due: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|loan| loan["due_back"].as_str().unwrap())
        .collect();
    let mut sorted = due.clone();
    sorted.sort();
    assert_eq!(due, sorted);

    let overdue = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|loan| loan["due_back"] == json!(today - Duration::days(2)))
        .expect("overdue loan listed");
    assert_eq!(overdue["is_overdue"], true);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans/mine", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_home_counts_follow_catalog_changes() {
    let _writes = catalog_writes().await;
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let user_id = current_user_id(&client, &token).await;
    let suffix = unique_suffix();

    let before = get_json(&client, format!("{}/home", BASE_URL), None).await;

    let first = create_author(&client, &token, &format!("CountA{}", suffix)).await;
    create_author(&client, &token, &format!("CountB{}", suffix)).await;
    for n in 1..=4 {
        create_genre(&client, &token, &format!("Counted genre {} {}", n, suffix)).await;
    }

    // "the" is matched anywhere in the title, ignoring case
    let shelved = create_book(&client, &token, first, &format!("The Counted {}", suffix), 20).await;
    let lent = create_book(&client, &token, first, &format!("Gather Round {}", suffix), 21).await;
    create_book(&client, &token, first, &format!("Dune Count {}", suffix), 22).await;

    for status in ["available", "available", "maintenance"] {
        create_instance(&client, &token, shelved, json!({ "imprint": "Count Press", "status": status })).await;
    }
    create_instance(
        &client,
        &token,
        lent,
        json!({
            "imprint": "Count Press",
            "status": "on_loan",
            "due_back": Utc::now().date_naive() + Duration::days(7),
            "borrower_id": user_id
        }),
    )
    .await;
    create_instance(
        &client,
        &token,
        lent,
        json!({ "imprint": "Count Press", "status": "reserved", "borrower_id": user_id }),
    )
    .await;

    let after = get_json(&client, format!("{}/home", BASE_URL), None).await;
    let delta = |key: &str| after[key].as_i64().unwrap() - before[key].as_i64().unwrap();

    assert_eq!(delta("num_books"), 3);
    assert_eq!(delta("num_instances"), 5);
    assert_eq!(delta("num_instances_available"), 2);
    assert_eq!(delta("num_authors"), 2);
    assert_eq!(delta("num_genres"), 4);
    assert_eq!(delta("num_books_with_the"), 2);
}

#[tokio::test]
#[ignore]
async fn test_book_listing_second_page_follows_title_order() {
    let _writes = catalog_writes().await;
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let suffix = unique_suffix();

    let author_id = create_author(&client, &token, &format!("Paging{}", suffix)).await;
    let mut seeded = Vec::new();
    for n in 1..=12u64 {
        let title = format!("Paging {} {:02}", suffix, n);
        create_book(&client, &token, author_id, &title, 100 + n).await;
        seeded.push(title);
    }

    let titles: Vec<String> = all_pages(&client, "/books", None)
        .await
        .iter()
        .map(|book| book["title"].as_str().unwrap().to_string())
        .collect();

    // The seeded books appear once each, in title order
    let listed: Vec<&String> = titles.iter().filter(|t| t.starts_with(&format!("Paging {} ", suffix))).collect();
    assert_eq!(listed, seeded.iter().collect::<Vec<_>>());

    // Page 2 holds items 6 to 10 of the full ordering
    let page = get_json(&client, format!("{}/books?page=2", BASE_URL), None).await;
    let second: Vec<String> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(page["page"], 2);
    assert_eq!(second, titles[5..10].to_vec());
}

#[tokio::test]
#[ignore]
async fn test_all_loans_are_ordered_by_due_date() {
    let _writes = catalog_writes().await;
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let user_id = current_user_id(&client, &token).await;
    let today = Utc::now().date_naive();

    let author_id = create_author(&client, &token, &format!("AllLoans{}", unique_suffix())).await;
    let book_id = create_book(&client, &token, author_id, "Lent Twice", 6).await;
    let mut copies = Vec::new();
    for days in [10, 2] {
        let id = create_instance(
            &client,
            &token,
            book_id,
            json!({
                "imprint": "Loan Press",
                "status": "on_loan",
                "due_back": today + Duration::days(days),
                "borrower_id": user_id
            }),
        )
        .await;
        copies.push(id);
    }

    let loans = all_pages(&client, "/loans", Some(&token)).await;

    let due: Vec<&str> = loans.iter().map(|loan| loan["due_back"].as_str().unwrap()).collect();
    let mut sorted = due.clone();
    sorted.sort();
    assert_eq!(due, sorted);

    let position = |id: &str| {
        loans
            .iter()
            .position(|loan| loan["id"] == id)
            .expect("copy listed among loans")
    };
    let (later, sooner) = (position(&copies[0]), position(&copies[1]));
    assert!(sooner < later);
    assert_eq!(loans[sooner]["due_back"], json!(today + Duration::days(2)));
    assert_eq!(loans[sooner]["borrower"]["id"], user_id);
}

#[tokio::test]
#[ignore]
async fn test_reader_cannot_renew() {
    let _writes = catalog_writes().await;
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let user_id = current_user_id(&client, &token).await;
    let due_back: NaiveDate = Utc::now().date_naive() + Duration::days(3);

    let author_id = create_author(&client, &token, &format!("Reader{}", unique_suffix())).await;
    let book_id = create_book(&client, &token, author_id, "Not Yours to Renew", 7).await;
    let instance_id = create_instance(
        &client,
        &token,
        book_id,
        json!({
            "imprint": "Reader Press",
            "status": "on_loan",
            "due_back": due_back,
            "borrower_id": user_id
        }),
    )
    .await;

    let response = client
        .post(format!("{}/instances/{}/renew", BASE_URL, instance_id))
        .bearer_auth(reader_token())
        .json(&json!({ "renewal_date": due_back + Duration::days(7) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 3);

    let copy = get_json(&client, format!("{}/instances/{}", BASE_URL, instance_id), Some(&token)).await;
    assert_eq!(copy["due_back"], json!(due_back));
}

#[tokio::test]
#[ignore]
async fn test_book_detail_hides_borrowers() {
    let _writes = catalog_writes().await;
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let user_id = current_user_id(&client, &token).await;

    let author_id = create_author(&client, &token, &format!("Private{}", unique_suffix())).await;
    let book_id = create_book(&client, &token, author_id, "Borrowed Quietly", 8).await;
    create_instance(
        &client,
        &token,
        book_id,
        json!({
            "imprint": "Quiet Press",
            "status": "on_loan",
            "due_back": Utc::now().date_naive() - Duration::days(1),
            "borrower_id": user_id
        }),
    )
    .await;
    create_instance(
        &client,
        &token,
        book_id,
        json!({ "imprint": "Quiet Press", "status": "reserved", "borrower_id": user_id }),
    )
    .await;

    let book = get_json(&client, format!("{}/books/{}", BASE_URL, book_id), None).await;
    let copies = book["instances"].as_array().unwrap();
    assert_eq!(copies.len(), 2);
    for copy in copies {
        assert!(copy.get("borrower_id").is_none());
        assert!(copy.get("borrower").is_none());
    }
    let lent = copies.iter().find(|c| c["status"] == "on_loan").expect("copy on loan");
    assert_eq!(lent["is_overdue"], true);
}

#[tokio::test]
#[ignore]
async fn test_genre_and_language_can_be_renamed() {
    let _writes = catalog_writes().await;
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let suffix = unique_suffix();

    let genre_id = create_genre(&client, &token, &format!("Renamed genre {}", suffix)).await;
    let response = client
        .put(format!("{}/genres/{}", BASE_URL, genre_id))
        .bearer_auth(&token)
        .json(&json!({ "name": format!("  Fantasy {}  ", suffix) }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let genre = get_json(&client, format!("{}/genres/{}", BASE_URL, genre_id), None).await;
    assert_eq!(genre["name"], format!("Fantasy {}", suffix));

    let response = client
        .post(format!("{}/languages", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": format!("Quenya {}", suffix) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let language: Value = response.json().await.expect("Failed to parse response");

    let response = client
        .put(format!("{}/languages/{}", BASE_URL, language["id"]))
        .bearer_auth(&token)
        .json(&json!({ "name": format!("Sindarin {}", suffix) }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let renamed: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(renamed["id"], language["id"]);
    assert_eq!(renamed["name"], format!("Sindarin {}", suffix));
}
