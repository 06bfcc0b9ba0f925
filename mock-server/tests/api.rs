use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Widget};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- list ---

#[tokio::test]
async fn list_widgets_contains_seed() {
    let resp = app().oneshot(get("/widgets")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let widgets: Vec<Widget> = body_json(resp).await;
    assert_eq!(
        widgets,
        vec![Widget {
            id: 1,
            name: "sprocket".to_string()
        }]
    );
}

#[tokio::test]
async fn list_widgets_honours_limit() {
    let resp = app().oneshot(get("/widgets?limit=0")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let widgets: Vec<Widget> = body_json(resp).await;
    assert!(widgets.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_widget_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/widgets", r#"{"name":"gear"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let widget: Widget = body_json(resp).await;
    assert_eq!(widget.id, 2);
    assert_eq!(widget.name, "gear");
}

#[tokio::test]
async fn create_widget_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/widgets", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_widget_not_found_has_empty_body() {
    let resp = app().oneshot(get("/widgets/99")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn get_widget_bad_id_returns_400() {
    let resp = app().oneshot(get("/widgets/not-a-number")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- plain text and echo ---

#[tokio::test]
async fn oops_is_plain_text() {
    let resp = app().oneshot(get("/oops")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "text/plain");
    assert_eq!(&body_bytes(resp).await[..], b"oops");
}

#[tokio::test]
async fn echo_reflects_request_headers() {
    let req = Request::builder()
        .uri("/echo")
        .header("X-Trace", "abc")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: std::collections::BTreeMap<String, String> = body_json(resp).await;
    assert_eq!(echoed.get("x-trace").map(String::as_str), Some("abc"));
}

#[tokio::test]
async fn bulk_returns_json_string_of_requested_size() {
    let resp = app().oneshot(get("/bulk?bytes=5")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], br#""aaaaa""#);
}

// --- lifecycle ---

#[tokio::test]
async fn create_get_delete_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/widgets", r#"{"name":"cog"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Widget = body_json(resp).await;
    let id = created.id;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/widgets/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Widget = body_json(resp).await;
    assert_eq!(fetched, created);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/widgets/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/widgets/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/widgets"))
        .await
        .unwrap();
    let widgets: Vec<Widget> = body_json(resp).await;
    assert_eq!(widgets.len(), 1);
}
