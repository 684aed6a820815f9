use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chronicler_viewer::archive::{ArchiveApi, ArchiveApiClient, PageRequest};
use chronicler_viewer::config::ArchiveConfig;
use chronicler_viewer::error::ViewerError;
use chronicler_viewer::resolver::resolve_name;

fn client_for(server: &MockServer) -> ArchiveApiClient {
    ArchiveApiClient::new(&ArchiveConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        page_size: 20,
    })
    .expect("client")
}

fn thread_body() -> serde_json::Value {
    json!({
        "id": "thread-1",
        "records": [
            {
                "time": 1_700_000_100,
                "text_content": "reply",
                "source": {"message_id": "5", "type": 1, "sender_id": "u1"},
                "parent": {"message_id": "3"}
            },
            {
                "time": 1_700_000_000,
                "text_content": "root",
                "source": {"message_id": "3", "type": 1, "sender_id": "u2"},
                "files": [{"file_id": "f", "file_url": "https://host/path/photo.JPG?sig=abc"}]
            }
        ],
        "userMetadata": [{"id": "u1", "username": "Alice"}]
    })
}

#[tokio::test]
async fn test_list_record_sets_sends_page_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chronicler/records"))
        .and(query_param("offset", "40"))
        .and(query_param("size", "20"))
        .and(query_param("query", "cats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "record_sets": [
                {"id": "a", "description": "first", "record_count": 2,
                 "root_record": {"text_content": "first", "source": {"sender_id": "u1"}}},
                {"id": "b", "description": "", "record_count": 0}
            ],
            "user_metadata": [{"id": "u1", "username": "Alice"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client_for(&server)
        .list_record_sets(&PageRequest::new(40, 20).with_query("cats"))
        .await
        .expect("listing");

    assert_eq!(listing.len(), 2);
    let root = listing.record_sets[0].root_record.as_ref().unwrap();
    assert_eq!(
        resolve_name(Some(&listing.source_metadata), None, root.source.as_ref()),
        "Alice"
    );
    assert!(listing.record_sets[1].root_record.is_none());
}

#[tokio::test]
async fn test_get_record_set_links_replies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chronicler/records/thread-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(thread_body()))
        .mount(&server)
        .await;

    let set = client_for(&server)
        .get_record_set("thread-1")
        .await
        .expect("thread");

    assert_eq!(set.id(), Some("thread-1"));
    assert_eq!(set.len(), 2);
    assert_eq!(set.parent(0).map(|r| r.text_content.as_str()), Some("root"));
    let photo = &set.get(1).unwrap().files[0];
    assert_eq!(photo.name, "photo.JPG");
    assert!(photo.is_image());
}

#[tokio::test]
async fn test_missing_thread_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chronicler/records/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_string("File nope/record.json not found"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_record_set("nope").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Not found: File nope/record.json not found");
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chronicler/records"))
        .respond_with(ResponseTemplate::new(500).set_body_string("storage offline"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_record_sets(&PageRequest::new(0, 10))
        .await
        .unwrap_err();
    match err {
        ViewerError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "storage offline");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_payload_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chronicler/records/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_record_set("broken").await.unwrap_err();
    assert!(matches!(err, ViewerError::Json(_)));
}

#[tokio::test]
async fn test_get_file_passes_file_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chronicler/records/thread-1"))
        .and(query_param("file", "photo.JPG"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&server)
        .await;

    let bytes = client_for(&server)
        .get_file("thread-1", "photo.JPG")
        .await
        .expect("file");
    assert_eq!(bytes, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_delete_joins_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chronicler/records/delete"))
        .and(query_param("ids", "a,b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Id": "a", "Deleted": true, "Error": null},
            {"Id": "b", "Deleted": true, "Error": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server)
        .delete_record_sets(&["a".to_string(), " ".to_string(), "b".to_string()])
        .await
        .expect("delete");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.deleted));
}

#[tokio::test]
async fn test_delete_requires_ids() {
    let server = MockServer::start().await;
    let err = client_for(&server)
        .delete_record_sets(&[])
        .await
        .unwrap_err();
    assert!(matches!(err, ViewerError::Validation(_)));
}
