use std::net::SocketAddr;

use configs::AppConfig;
use reqwest::{multipart, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    media_root: std::path::PathBuf,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.media_root);
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    start_server_with(|_| {}).await
}

async fn start_server_with(configure: impl FnOnce(&mut AppConfig)) -> anyhow::Result<TestApp> {
    let db = models::db::connect_single("sqlite::memory:").await?;
    models::db::migrate(&db).await?;

    let media_root = std::env::temp_dir().join(format!("e2e_media_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.media.root = media_root.to_string_lossy().to_string();
    cfg.server.allowed_origins = vec!["http://localhost:3000".to_string()];
    configure(&mut cfg);

    let app = server::startup::build_app(db, &cfg);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, media_root })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn post_json(app: &TestApp, path: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
    let res = client().post(app.url(path)).json(&body).send().await?;
    let status = res.status();
    Ok((status, res.json().await?))
}

async fn patch_json(app: &TestApp, path: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
    let res = client().patch(app.url(path)).json(&body).send().await?;
    let status = res.status();
    Ok((status, res.json().await?))
}

async fn get_json(app: &TestApp, path: &str) -> anyhow::Result<(StatusCode, Value)> {
    let res = client().get(app.url(path)).send().await?;
    let status = res.status();
    Ok((status, res.json().await?))
}

async fn create_user(app: &TestApp, username: &str, locations: &[&str]) -> anyhow::Result<Value> {
    let (status, body) = post_json(
        app,
        "/users",
        json!({
            "username": username,
            "first_name": "Иван",
            "last_name": "Petrov",
            "password": "s3cret-pass",
            "role": "member",
            "age": 30,
            "locations": locations,
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    Ok(body)
}

async fn create_category(app: &TestApp, name: &str) -> anyhow::Result<i64> {
    let (status, body) = post_json(app, "/categories", json!({"name": name})).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    Ok(body["id"].as_i64().unwrap())
}

async fn create_ad(app: &TestApp, author: &str, category_id: i64, price: i64, published: bool) -> anyhow::Result<Value> {
    let (status, body) = post_json(
        app,
        "/advertisements",
        json!({
            "name": format!("Item {price}"),
            "author": author,
            "price": price,
            "description": "как новый",
            "is_published": published,
            "category_id": category_id,
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    Ok(body)
}

#[tokio::test]
async fn e2e_landing_health_and_docs() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (status, body) = get_json(&app, "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = get_json(&app, "/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "up");

    let (status, body) = get_json(&app, "/api-docs/openapi.json").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/advertisements/{id}/image"].is_object());
    Ok(())
}

#[tokio::test]
async fn e2e_category_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = client().post(app.url("/categories")).json(&json!({"name": "Electronics"})).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let created_text = res.text().await?;
    let created: Value = serde_json::from_str(&created_text)?;
    assert_eq!(created["name"], "Electronics");
    let id = created["id"].as_i64().unwrap();
    // Four-space indentation.
    assert!(created_text.starts_with("{\n    \""), "{created_text}");

    let fetched = client().get(app.url(&format!("/categories/{id}"))).send().await?.text().await?;
    assert_eq!(fetched, created_text);

    let res = client().delete(app.url(&format!("/categories/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"status": "ok"}));

    let (status, body) = get_json(&app, &format!("/categories/{id}")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn e2e_locations_are_unique_and_unescaped() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().post(app.url("/locations")).json(&json!({"name": "Москва"})).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let text = res.text().await?;
    assert!(text.contains("Москва"));
    assert!(!text.contains("\\u"));

    let (status, _) = post_json(&app, "/locations", json!({"name": "Москва"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    create_user(&app, "a", &["Москва"]).await?;
    create_user(&app, "b", &["Москва"]).await?;
    let (_, list) = get_json(&app, "/locations").await?;
    assert_eq!(list.as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn e2e_user_never_exposes_password() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create_user(&app, "ivan", &["Paris"]).await?;
    assert!(created.get("password").is_none());
    let id = created["id"].as_i64().unwrap();

    let (_, detail) = get_json(&app, &format!("/users/{id}")).await?;
    assert!(detail.get("password").is_none());
    assert_eq!(detail["first_name"], "Иван");

    let (_, list) = get_json(&app, "/users").await?;
    assert!(list["items"][0].get("password").is_none());
    assert_eq!(list["total"], 1);
    assert_eq!(list["pages_number"], 1);
    Ok(())
}

#[tokio::test]
async fn e2e_user_partial_update_and_location_replace() -> anyhow::Result<()> {
    let app = start_server().await?;
    let before = create_user(&app, "olga", &["Paris", "Rome"]).await?;
    let id = before["id"].as_i64().unwrap();

    let (status, after) = patch_json(&app, &format!("/users/{id}"), json!({"age": 31})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["age"], 31);
    for key in ["username", "first_name", "last_name", "role", "locations"] {
        assert_eq!(after[key], before[key], "{key} changed");
    }

    let (_, replaced) = patch_json(&app, &format!("/users/{id}"), json!({"locations": ["Berlin"]})).await?;
    assert_eq!(replaced["locations"], json!(["Berlin"]));

    let (status, _) = patch_json(&app, "/users/9999", json!({"age": 1})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let res = client().delete(app.url(&format!("/users/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let (status, _) = get_json(&app, &format!("/users/{id}")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_published_count_tracks_flag() -> anyhow::Result<()> {
    let app = start_server().await?;
    let user = create_user(&app, "seller", &[]).await?;
    let uid = user["id"].as_i64().unwrap();
    let cid = create_category(&app, "Bikes").await?;

    create_ad(&app, "seller", cid, 100, true).await?;
    create_ad(&app, "seller", cid, 200, false).await?;

    let (_, detail) = get_json(&app, &format!("/users/{uid}")).await?;
    assert_eq!(detail["total_advertisements"], 1);
    let (_, list) = get_json(&app, "/users").await?;
    assert_eq!(list["items"][0]["total_advertisements"], 1);
    Ok(())
}

#[tokio::test]
async fn e2e_advertisement_detail_and_restricted_update() -> anyhow::Result<()> {
    let app = start_server().await?;
    create_user(&app, "seller", &["Paris", "Rome"]).await?;
    let cid = create_category(&app, "Furniture").await?;
    let ad = create_ad(&app, "seller", cid, 300, false).await?;
    let id = ad["id"].as_i64().unwrap();

    assert_eq!(ad["author"], "seller");
    assert_eq!(ad["address"], json!(["Paris", "Rome"]));
    assert_eq!(ad["category_name"], "Furniture");
    assert!(ad["image"].is_null());

    let (status, updated) = patch_json(
        &app,
        &format!("/advertisements/{id}"),
        json!({"price": 250, "is_published": true, "category_id": 999}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 250);
    assert_eq!(updated["is_published"], false);
    assert_eq!(updated["category_id"], cid);

    let res = client().delete(app.url(&format!("/advertisements/{id}"))).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({"status": "ok"}));
    let (status, _) = get_json(&app, &format!("/advertisements/{id}")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_unknown_references_are_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    create_user(&app, "seller", &[]).await?;
    let cid = create_category(&app, "Misc").await?;

    let (status, body) = post_json(
        &app,
        "/advertisements",
        json!({"name": "Ghost", "author": "seller", "price": 1, "is_published": false, "category_id": cid + 100}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");

    let (status, _) = post_json(
        &app,
        "/advertisements",
        json!({"name": "Ghost", "author": "nobody", "price": 1, "category_id": cid}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = get_json(&app, "/advertisements").await?;
    assert_eq!(list["total"], 0);
    Ok(())
}

#[tokio::test]
async fn e2e_advertisement_pagination() -> anyhow::Result<()> {
    let app = start_server().await?;
    create_user(&app, "seller", &[]).await?;
    let cid = create_category(&app, "Misc").await?;
    for price in 1..=7 {
        create_ad(&app, "seller", cid, price * 10, true).await?;
    }

    let (_, first) = get_json(&app, "/advertisements").await?;
    assert_eq!(first["items"].as_array().unwrap().len(), 5);
    assert_eq!(first["items"][0], json!({"id": 7, "name": "Item 70", "author": "seller", "price": 70}));

    let (_, second) = get_json(&app, "/advertisements?page=2").await?;
    assert_eq!(second["items"].as_array().unwrap().len(), 2);
    assert_eq!(second["pages_number"], 2);
    assert_eq!(second["total"], 7);

    let (_, garbage) = get_json(&app, "/advertisements?page=abc").await?;
    assert_eq!(garbage["items"], first["items"]);
    let (_, beyond) = get_json(&app, "/advertisements?page=50").await?;
    assert_eq!(beyond["items"], second["items"]);
    Ok(())
}

#[tokio::test]
async fn e2e_image_upload() -> anyhow::Result<()> {
    let app = start_server().await?;
    create_user(&app, "seller", &[]).await?;
    let cid = create_category(&app, "Photo").await?;
    let ad = create_ad(&app, "seller", cid, 10, true).await?;
    let id = ad["id"].as_i64().unwrap();
    let payload = vec![0x89, b'P', b'N', b'G', 1, 2, 3];

    let form = multipart::Form::new().part(
        "image",
        multipart::Part::bytes(payload.clone()).file_name("camera.png").mime_str("image/png")?,
    );
    let res = client().post(app.url(&format!("/advertisements/{id}/image"))).multipart(form).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let image = body["image"].as_str().unwrap().to_string();
    assert!(image.starts_with("/media/ads/"), "{image}");
    assert!(image.ends_with("_camera.png"));

    let served = client().get(app.url(&image)).send().await?;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await?.to_vec(), payload);

    let wrong_field = multipart::Form::new().part("file", multipart::Part::bytes(vec![1]).mime_str("image/png")?);
    let res = client().post(app.url(&format!("/advertisements/{id}/image"))).multipart(wrong_field).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let not_image = multipart::Form::new().part("image", multipart::Part::text("hello").mime_str("text/plain")?);
    let res = client().post(app.url(&format!("/advertisements/{id}/image"))).multipart(not_image).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let form = multipart::Form::new().part("image", multipart::Part::bytes(payload).file_name("x.png").mime_str("image/png")?);
    let res = client().post(app.url("/advertisements/9999/image")).multipart(form).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_oversized_upload_is_a_json_413() -> anyhow::Result<()> {
    let app = start_server_with(|cfg| cfg.media.max_upload_bytes = 1024).await?;
    create_user(&app, "seller", &[]).await?;
    let cid = create_category(&app, "Photo").await?;
    let id = create_ad(&app, "seller", cid, 10, true).await?["id"].as_i64().unwrap();

    let small = multipart::Form::new().part(
        "image",
        multipart::Part::bytes(vec![7u8; 512]).file_name("small.png").mime_str("image/png")?,
    );
    let res = client().post(app.url(&format!("/advertisements/{id}/image"))).multipart(small).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let big = multipart::Form::new().part(
        "image",
        multipart::Part::bytes(vec![7u8; 80 * 1024]).file_name("big.png").mime_str("image/png")?,
    );
    let res = client().post(app.url(&format!("/advertisements/{id}/image"))).multipart(big).send().await?;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Payload Too Large");
    Ok(())
}

#[tokio::test]
async fn e2e_bad_ids_get_json_errors() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = client().get(app.url("/users/abc")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Malformed Request");
    assert!(body["detail"].as_str().unwrap().contains("abc"));

    let (status, body) = get_json(&app, "/users/99999999999").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");

    let res = client().delete(app.url("/categories/1.5")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Malformed Request");

    let (status, body) = patch_json(&app, "/advertisements/-99999999999", json!({"price": 1})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn e2e_malformed_bodies_are_client_errors() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(app.url("/categories"))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Malformed Request");

    let (status, _) = post_json(&app, "/users", json!({"first_name": "No username"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_cross_site_writes_are_forbidden() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(app.url("/categories"))
        .header("origin", "http://evil.example")
        .json(&json!({"name": "Spam"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client()
        .post(app.url("/categories"))
        .header("origin", "http://localhost:3000")
        .json(&json!({"name": "Trusted"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Reads are never guarded.
    let res = client().get(app.url("/categories")).header("origin", "http://evil.example").send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let list: Value = res.json().await?;
    assert_eq!(list.as_array().unwrap().len(), 1);
    Ok(())
}
