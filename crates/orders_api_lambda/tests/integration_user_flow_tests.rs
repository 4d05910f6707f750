mod support;

use orders_api_lambda::adapters::memory_store::InMemoryTableStore;
use orders_api_lambda::handlers::{handle_orders_event, handle_users_event};
use serde_json::json;
use support::events::{body_json, create_user, proxy_event, send, ALICE_PROFILE};

#[test]
fn created_user_is_retrievable_with_identical_fields() {
    let store = InMemoryTableStore::new();
    let created = create_user(&store, "alice", ALICE_PROFILE);

    assert_eq!(
        created,
        json!({
            "username": "alice",
            "fullName": "Alice A",
            "email": "a@b.com",
            "addresses": [{"home": "123 Main Street"}],
        })
    );

    let fetched = send(
        &store,
        "GET",
        "/users/username/{username}",
        &[("username", "alice")],
        None,
    );
    assert_eq!(fetched.status_code, 200);
    assert_eq!(body_json(&fetched), created);
}

#[test]
fn unknown_user_lookup_is_not_found() {
    let store = InMemoryTableStore::new();
    let response = send(
        &store,
        "GET",
        "/users/username/{username}",
        &[("username", "nobody")],
        None,
    );

    assert_eq!(response.status_code, 404);
    assert_eq!(
        body_json(&response),
        json!({"error": "not_found", "message": "User nobody not found"})
    );
}

#[test]
fn user_lifecycle_through_put_and_delete() {
    let store = InMemoryTableStore::new();
    create_user(&store, "alice", ALICE_PROFILE);

    let updated = send(
        &store,
        "PUT",
        "/users/username/{username}",
        &[("username", "alice")],
        Some(r#"{"fullName":"Alice Liddell","email":"alice@wonder.land","addresses":[{"home":"Rabbit Hole Lane 1"}]}"#),
    );
    assert_eq!(updated.status_code, 200);
    assert_eq!(body_json(&updated)["email"], json!("alice@wonder.land"));

    let deleted = send(
        &store,
        "DELETE",
        "/users/username/{username}",
        &[("username", "alice")],
        None,
    );
    assert_eq!(deleted.status_code, 200);

    let again = send(
        &store,
        "DELETE",
        "/users/username/{username}",
        &[("username", "alice")],
        None,
    );
    assert_eq!(again.status_code, 404);
    assert!(store.is_empty());
}

#[test]
fn listing_users_spans_the_shared_partition() {
    let store = InMemoryTableStore::new();
    let empty = send(&store, "GET", "/users", &[], None);
    assert_eq!(empty.status_code, 200);
    assert_eq!(body_json(&empty), json!([]));

    create_user(&store, "alice", ALICE_PROFILE);
    create_user(&store, "carol", ALICE_PROFILE);

    let listed = body_json(&send(&store, "GET", "/users", &[], None));
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
    assert!(listed
        .as_array()
        .into_iter()
        .flatten()
        .all(|user| user.get("pk").is_none() && user.get("sk").is_none()));
}

#[test]
fn invalid_profile_is_rejected_with_validation_error() {
    let store = InMemoryTableStore::new();
    let response = send(
        &store,
        "POST",
        "/users/username/{username}",
        &[("username", "alice")],
        Some(r#"{"fullName":"Alice A","email":"a@b.com","addresses":[{"home":"short"}]}"#),
    );

    assert_eq!(response.status_code, 400);
    assert_eq!(
        body_json(&response),
        json!({
            "error": "validation_error",
            "message": "addresses[0].home must be at least 10 characters",
        })
    );
    assert!(store.is_empty());
}

#[test]
fn users_function_only_serves_user_routes() {
    let store = InMemoryTableStore::new();
    let create = proxy_event(
        "POST",
        "/users/username/{username}",
        &[("username", "alice")],
        Some(ALICE_PROFILE),
    );
    assert_eq!(handle_users_event(create.clone(), &store).status_code, 201);
    assert_eq!(handle_orders_event(create, &store).status_code, 400);
}
