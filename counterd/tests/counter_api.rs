use counter::{Client, CounterValue, Error};
use counterd::storage::{InMemoryStorage, Sqlite};
use reqwest::{StatusCode, Url};
use spectral::prelude::*;
use std::{future, net::SocketAddr, sync::Arc};

const KEY: &str = "029d1abe-c121-4b54-806b-a692e101a5ea";
const SEEDED_KEY: &str = "e2268234-9d3d-4ab2-9b68-ec6088f8074b";

/// Starts a server on an ephemeral port; it runs until the test's runtime
/// is dropped.
fn start_server() -> Url {
    let storage = Arc::new(InMemoryStorage::with_counters(vec![(SEEDED_KEY, 10)]));
    let (addr, server) = counterd::serve(
        ([127, 0, 0, 1], 0).into(),
        storage,
        future::pending::<()>(),
    )
    .unwrap();
    tokio::spawn(server);

    base_url(addr)
}

fn base_url(addr: SocketAddr) -> Url {
    format!("http://{}", addr).parse().unwrap()
}

#[tokio::test]
async fn roundtrip() {
    let client = Client::new(start_server()).unwrap();

    // initial value will not be set
    let counter_value = client.get_counter(KEY).await.unwrap();
    assert!(counter_value.counter.is_none());

    client
        .put_counter(KEY, &CounterValue::new(11))
        .await
        .unwrap();

    let counter_value = client.get_counter(KEY).await.unwrap();
    assert_eq!(counter_value.counter, Some(11));
}

#[tokio::test]
async fn seeded_counter_is_visible() {
    let client = Client::new(start_server()).unwrap();

    let counter_value = client.get_counter(SEEDED_KEY).await;

    assert_that(&counter_value.ok())
        .is_some()
        .is_equal_to(CounterValue::new(10));
}

#[tokio::test]
async fn free_functions_write_then_read() {
    let base = start_server();

    counter::update_counter(&base, "k1", &CounterValue::new(11))
        .await
        .unwrap();
    let value = counter::fetch_counter(&base, "k1").await.unwrap();

    assert_eq!(value, CounterValue::new(11));
}

#[tokio::test]
async fn keys_with_reserved_characters_roundtrip() {
    let client = Client::new(start_server()).unwrap();
    let keys = ["a/b", "with space", "100%", "q?x=1#frag", "ключ", "...", "+&=;:@"];

    for (value, key) in keys.iter().enumerate() {
        client
            .put_counter(key, &CounterValue::new(value as u32))
            .await
            .unwrap();
    }

    for (value, key) in keys.iter().enumerate() {
        let stored = client.get_counter(key).await.unwrap();
        assert_eq!(stored, CounterValue::new(value as u32), "key {:?}", key);
    }
}

#[tokio::test]
async fn keys_are_independent() {
    let client = Client::new(start_server()).unwrap();

    client.put_counter("a/b", &CounterValue::new(1)).await.unwrap();

    assert_that(&client.get_counter("a").await.ok())
        .is_some()
        .is_equal_to(CounterValue::unset());
}

#[tokio::test]
async fn put_without_value_is_a_bad_request() {
    let client = Client::new(start_server()).unwrap();

    let error = client
        .put_counter(KEY, &CounterValue::unset())
        .await
        .unwrap_err();

    let payload = error.api_error().unwrap();
    assert_eq!(payload.message, "No value provided");
    assert_eq!(payload.error_code, None);
    assert!(!payload.request_id.is_empty());
}

#[tokio::test]
async fn path_base_prefix_is_not_found() {
    let mut base = start_server();
    base.set_path("/api/");
    let client = Client::new(base).unwrap();

    let error = client.get_counter(KEY).await.unwrap_err();

    assert_eq!(
        error.api_error().and_then(|p| p.error_code.as_deref()),
        Some("NotFound")
    );
}

#[tokio::test]
async fn concurrent_clients_do_not_interfere() {
    let client = Client::new(start_server()).unwrap();

    let writers = (0..8u32).map(|i| {
        let client = client.clone();
        tokio::spawn(async move {
            let key = format!("key-{}", i);
            client.put_counter(&key, &CounterValue::new(i)).await?;
            client.get_counter(&key).await
        })
    });

    for (i, writer) in writers.collect::<Vec<_>>().into_iter().enumerate() {
        let value = writer.await.unwrap().unwrap();
        assert_eq!(value, CounterValue::new(i as u32));
    }
}

#[tokio::test]
async fn server_error_responses_carry_error_payload() {
    let base = start_server();
    let http = reqwest::Client::new();
    let counter_url = base.join("counter/k1").unwrap();

    let cases = vec![
        (
            http.get(base.join("nope").unwrap()),
            StatusCode::NOT_FOUND,
            "NotFound",
        ),
        (
            http.post(counter_url.clone()).body("{}"),
            StatusCode::METHOD_NOT_ALLOWED,
            "MethodNotAllowed",
        ),
        (
            http.put(counter_url.clone())
                .header("content-type", "application/json")
                .body(r#"{"counter": "oops"}"#),
            StatusCode::BAD_REQUEST,
            "BadRequest",
        ),
        (
            http.put(counter_url.clone())
                .header("content-type", "text/plain")
                .body(r#"{"counter": 1}"#),
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "UnsupportedMediaType",
        ),
        (
            http.put(counter_url)
                .header("content-type", "application/json")
                .body(vec![b' '; 32 * 1024]),
            StatusCode::PAYLOAD_TOO_LARGE,
            "PayloadTooLarge",
        ),
    ];

    for (request, status, error_code) in cases {
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), status);

        let payload = response.json::<counter::ErrorPayload>().await.unwrap();
        assert_eq!(payload.error_code.as_deref(), Some(error_code));
        assert!(!payload.request_id.is_empty());
    }
}

#[tokio::test]
async fn openapi_document_is_served() {
    let base = start_server();

    let document = reqwest::get(base.join("openapi.json").unwrap())
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    assert_eq!(document, counter::openapi::document());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = Client::new(format!("http://{}", addr).parse().unwrap()).unwrap();

    let error = client.get_counter(KEY).await.unwrap_err();

    assert!(matches!(error, Error::Transport(_)));
}

#[tokio::test]
async fn counters_persist_across_server_restarts() {
    let tempdir = tempfile::tempdir().unwrap();
    let db_file = tempdir.path().join("counterd.sqlite");

    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
    let storage = Arc::new(Sqlite::new(&db_file).unwrap());
    let (addr, server) = counterd::serve(([127, 0, 0, 1], 0).into(), storage, async move {
        let _ = stopped.await;
    })
    .unwrap();
    let first = tokio::spawn(server);
    counter::update_counter(&base_url(addr), KEY, &CounterValue::new(11))
        .await
        .unwrap();
    stop.send(()).unwrap();
    first.await.unwrap();

    let storage = Arc::new(Sqlite::new(&db_file).unwrap());
    let (addr, server) =
        counterd::serve(([127, 0, 0, 1], 0).into(), storage, future::pending::<()>()).unwrap();
    tokio::spawn(server);

    let value = counter::fetch_counter(&base_url(addr), KEY).await;

    assert_that(&value.ok())
        .is_some()
        .is_equal_to(CounterValue::new(11));
}
