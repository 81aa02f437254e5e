//! End-to-end tests of the HTTP fetcher against a local mock server

use std::time::Duration;

use mockito::Matcher;
use serde_json::json;

use oadigest_core::{ClientError, HttpConfig};
use oadigest_openalex::{ClientConfig, DigestOptions, Entity, OpenAlexClient, Query};

fn client(server: &mockito::Server, mailto: Option<&str>) -> OpenAlexClient {
    let config = ClientConfig {
        base_url: server.url(),
        mailto: mailto.map(str::to_string),
        default_per_page: 2,
        http: HttpConfig {
            max_retries: 1,
            retry_base_delay: Duration::ZERO,
            ..Default::default()
        },
    };
    OpenAlexClient::new(config).unwrap()
}

#[test]
fn get_work_by_full_id() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/works/W2741809807")
        .match_query(Matcher::UrlEncoded("mailto".into(), "me@example.org".into()))
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "https://openalex.org/W2741809807",
                "publication_date": "2018-02-13",
                "abstract_inverted_index": {"Open": [0], "access": [1]}
            })
            .to_string(),
        )
        .create();

    let item = client(&server, Some("me@example.org"))
        .get_work(
            "https://openalex.org/W2741809807",
            DigestOptions::DIGEST_WITH_ABSTRACT,
        )
        .unwrap();
    mock.assert();

    let digested = item.as_digested().unwrap();
    assert_eq!(digested.get_str("abstract"), Some("Open access"));
    assert_eq!(digested.get_str("publication_date"), Some("2018-02-13"));
}

#[test]
fn list_all_follows_cursor() {
    let mut server = mockito::Server::new();
    let first = server
        .mock("GET", "/works")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cursor".into(), "*".into()),
            Matcher::UrlEncoded("per-page".into(), "2".into()),
            Matcher::UrlEncoded("filter".into(), "publication_year:2020".into()),
        ]))
        .with_body(
            json!({
                "results": [{"id": "W1"}, {"id": "W2"}],
                "meta": {"count": 3, "next_cursor": "page2"}
            })
            .to_string(),
        )
        .create();
    let second = server
        .mock("GET", "/works")
        .match_query(Matcher::UrlEncoded("cursor".into(), "page2".into()))
        .with_body(
            json!({"results": [{"id": "W3"}], "meta": {"count": 3, "next_cursor": null}})
                .to_string(),
        )
        .create();

    let c = client(&server, None);
    let ids: Vec<String> = c
        .list_all_works(Query::new().filter("publication_year:2020"), DigestOptions::RAW)
        .map(|item| item.unwrap().as_raw().unwrap().id().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["W1", "W2", "W3"]);
    first.assert();
    second.assert();
}

#[test]
fn count_reads_meta() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/institutions")
        .match_query(Matcher::UrlEncoded("per-page".into(), "1".into()))
        .with_body(json!({"results": [{"id": "I1"}], "meta": {"count": 1532}}).to_string())
        .create();

    let total = client(&server, None)
        .get_total_count(Entity::Institutions, None)
        .unwrap();
    assert_eq!(total, 1532);
    mock.assert();
}

#[test]
fn server_errors_retried_then_surfaced() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/authors")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(2)
        .create();

    let err = client(&server, None)
        .list_authors(&Query::new(), DigestOptions::RAW)
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    mock.assert();
}

#[test]
fn client_errors_not_retried() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/works")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error": "Invalid query parameters error."}"#)
        .expect(1)
        .create();

    let err = client(&server, None)
        .list_works(&Query::new().filter("nonsense:::"), DigestOptions::RAW)
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport { status: Some(400), .. }));
    assert!(err.to_string().contains("Invalid query parameters"), "{err}");
    mock.assert();
}

#[test]
fn malformed_body_is_decode_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/topics")
        .match_query(Matcher::Any)
        .with_body("<html>not json</html>")
        .create();

    let err = client(&server, None)
        .list_topics(&Query::new(), DigestOptions::RAW)
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}
