mod common;

use chrono::{DateTime, Utc};
use open_game_list_lib::config::Profile;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::spawn_server;

async fn json_body(resp: reqwest::Response) -> Value {
    resp.json::<Value>().await.expect("json body")
}

fn timestamp(v: &Value) -> DateTime<Utc> {
    v.as_str().expect("timestamp string").parse().expect("rfc3339 timestamp")
}

#[tokio::test]
async fn bare_collection_is_not_found() {
    let server = spawn_server(Profile::Development).await;
    server.insert_item("exists", 0, 0).await;

    let resp = server.client.get(server.url("/api/items")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await, json!({ "error": "not found" }));
}

#[tokio::test]
async fn missing_ids_are_not_found_for_get_put_delete() {
    let server = spawn_server(Profile::Development).await;

    let get = server.client.get(server.url("/api/items/4242")).send().await.unwrap();
    assert_eq!(get.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(get).await["error"], "Item ID 4242 has not been found");

    let put = server
        .client
        .put(server.url("/api/items/4242"))
        .json(&json!({ "title": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(put.status(), StatusCode::NOT_FOUND);
    assert!(json_body(put).await["error"].as_str().unwrap().contains("4242"));

    let delete = server.client.delete(server.url("/api/items/4242")).send().await.unwrap();
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
    assert!(json_body(delete).await["error"].as_str().unwrap().contains("4242"));
}

#[tokio::test]
async fn responses_are_pretty_printed() {
    let server = spawn_server(Profile::Development).await;
    let item = server.insert_item("pretty", 0, 0).await;

    let resp = server
        .client
        .get(server.url(&format!("/api/items/{}", item.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()["content-type"].to_str().unwrap().starts_with("application/json"));
    let text = resp.text().await.unwrap();
    assert!(text.contains("\n  \"title\": \"pretty\""), "body was {}", text);
}

#[tokio::test]
async fn create_ignores_client_owner_and_timestamps() {
    let server = spawn_server(Profile::Development).await;

    let resp = server
        .client
        .post(server.url("/api/items"))
        .json(&json!({
            "id": 999,
            "title": "T",
            "description": "D",
            "type": 3,
            "flags": 1,
            "userId": "ignored-client-value",
            "viewCount": 500,
            "createdDate": "2001-01-01T00:00:00Z",
            "lastModifiedDate": "2002-02-02T00:00:00Z"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;

    assert_eq!(body["title"], "T");
    assert_eq!(body["description"], "D");
    assert_eq!(body["type"], 3);
    assert_eq!(body["flags"], 1);
    assert_eq!(body["userId"], server.admin_id());
    assert_eq!(body["viewCount"], 0);
    assert_ne!(body["id"], 999);
    assert_eq!(body["createdDate"], body["lastModifiedDate"]);
    assert!(timestamp(&body["createdDate"]).timestamp() > 1_600_000_000);

    // What was returned is what was stored
    let id = body["id"].as_i64().unwrap();
    let stored = json_body(
        server.client.get(server.url(&format!("/api/items/{}", id))).send().await.unwrap(),
    )
    .await;
    assert_eq!(stored, body);
}

#[tokio::test]
async fn create_with_null_or_invalid_payload_is_server_error() {
    let server = spawn_server(Profile::Development).await;

    for body in ["null", "", "{not json", r#"{"description":"no title"}"#] {
        let resp = server
            .client
            .post(server.url("/api/items"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "payload {:?}", body);
        assert!(resp.text().await.unwrap().is_empty());
    }

    // The server keeps working afterwards
    let resp = server.client.get(server.url("/api/items/GetLatest")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!([]));
}

#[tokio::test]
async fn update_changes_only_editable_fields() {
    let server = spawn_server(Profile::Development).await;
    let item = server.insert_item("before", 30, 17).await;
    let other = server.state.users.create("Other", None).await.unwrap();

    let resp = server
        .client
        .put(server.url(&format!("/api/items/{}", item.id)))
        .json(&json!({
            "title": "after",
            "description": "new description",
            "text": "new text",
            "notes": "new notes",
            "type": 4,
            "flags": 2,
            "userId": other.id,
            "viewCount": 0,
            "createdDate": "2001-01-01T00:00:00Z"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;

    assert_eq!(body["id"], item.id);
    assert_eq!(body["title"], "after");
    assert_eq!(body["description"], "new description");
    assert_eq!(body["text"], "new text");
    assert_eq!(body["notes"], "new notes");
    assert_eq!(body["type"], 4);
    assert_eq!(body["flags"], 2);
    assert_eq!(body["userId"], other.id);
    assert_eq!(body["viewCount"], 17);
    assert_eq!(timestamp(&body["createdDate"]), item.created_date);
    assert!(timestamp(&body["lastModifiedDate"]) > item.last_modified_date);
}

#[tokio::test]
async fn update_without_owner_keeps_it_and_rejects_unknown_owner() {
    let server = spawn_server(Profile::Development).await;
    let item = server.insert_item("owned", 0, 0).await;
    let url = server.url(&format!("/api/items/{}", item.id));

    let kept = json_body(
        server.client.put(&url).json(&json!({ "title": "renamed" })).send().await.unwrap(),
    )
    .await;
    assert_eq!(kept["userId"], server.admin_id());

    let resp = server
        .client
        .put(&url)
        .json(&json!({ "title": "renamed", "userId": "no-such-user" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].as_str().unwrap().contains("no-such-user"));
}

#[tokio::test]
async fn update_without_payload_is_not_found() {
    let server = spawn_server(Profile::Development).await;
    let item = server.insert_item("untouched", 0, 0).await;
    let url = server.url(&format!("/api/items/{}", item.id));

    for body in ["null", ""] {
        let resp = server
            .client
            .put(&url)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "payload {:?}", body);
        assert_eq!(
            json_body(resp).await["error"],
            format!("Item ID {} has not been found", item.id)
        );
    }

    let stored = json_body(server.client.get(&url).send().await.unwrap()).await;
    assert_eq!(stored["title"], "untouched");
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let server = spawn_server(Profile::Development).await;
    let item = server.insert_item("doomed", 0, 0).await;
    let url = server.url(&format!("/api/items/{}", item.id));

    let resp = server.client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().is_empty());

    let resp = server.client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ranked_listings_default_and_clamp() {
    let server = spawn_server(Profile::Development).await;
    for i in 0..105 {
        server.insert_item(&format!("item {}", i), i, i).await;
    }

    for listing in ["GetLatest", "GetMostViewed", "GetRandom"] {
        let default = json_body(
            server.client.get(server.url(&format!("/api/items/{}", listing))).send().await.unwrap(),
        )
        .await;
        assert_eq!(default.as_array().unwrap().len(), 5, "{} default", listing);

        let clamped = json_body(
            server
                .client
                .get(server.url(&format!("/api/items/{}/500", listing)))
                .send()
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(clamped.as_array().unwrap().len(), 100, "{} clamp", listing);

        let three = json_body(
            server.client.get(server.url(&format!("/api/items/{}/3", listing))).send().await.unwrap(),
        )
        .await;
        assert_eq!(three.as_array().unwrap().len(), 3, "{} n=3", listing);
    }
}

#[tokio::test]
async fn ranked_listings_are_ordered() {
    let server = spawn_server(Profile::Development).await;
    server.insert_item("ten", 5, 10).await;
    server.insert_item("fifty", 50, 50).await;
    server.insert_item("five", 1, 5).await;

    let viewed = json_body(
        server.client.get(server.url("/api/items/GetMostViewed/2")).send().await.unwrap(),
    )
    .await;
    let views: Vec<i64> = viewed.as_array().unwrap().iter().map(|v| v["viewCount"].as_i64().unwrap()).collect();
    assert_eq!(views, vec![50, 10]);

    let latest = json_body(server.client.get(server.url("/api/items/GetLatest")).send().await.unwrap()).await;
    let created: Vec<DateTime<Utc>> = latest
        .as_array()
        .unwrap()
        .iter()
        .map(|v| timestamp(&v["createdDate"]))
        .collect();
    assert_eq!(created.len(), 3);
    assert!(created.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(latest[0]["title"], "five");
}

#[tokio::test]
async fn random_listing_changes_order() {
    let server = spawn_server(Profile::Development).await;
    for i in 0..8 {
        server.insert_item(&format!("item {}", i), 0, 0).await;
    }

    let ids = |v: Value| -> Vec<i64> {
        v.as_array().unwrap().iter().map(|i| i["id"].as_i64().unwrap()).collect()
    };
    let first = ids(json_body(server.client.get(server.url("/api/items/GetRandom/8")).send().await.unwrap()).await);
    assert_eq!(first.len(), 8);

    let mut differs = false;
    for _ in 0..20 {
        let next = ids(json_body(server.client.get(server.url("/api/items/GetRandom/8")).send().await.unwrap()).await);
        if next != first {
            differs = true;
            break;
        }
    }
    assert!(differs, "GetRandom returned the same order 21 times");
}

#[tokio::test]
async fn production_profile_refuses_mutations() {
    let server = spawn_server(Profile::Production).await;
    assert!(server.state.fallback_user.is_none());

    let resp = server
        .client
        .post(server.url("/api/items"))
        .json(&json!({ "title": "T" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["error"], "authentication required");

    let resp = server.client.get(server.url("/api/items/GetLatest")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
