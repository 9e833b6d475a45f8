use super::*;
use httpmock::prelude::*;
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use serde_json::json;

const SEND_PATH: &str = "/v1/projects/test-project/messages:send";

fn messaging(server: &MockServer) -> FirebaseMessaging {
    let client = ClientBuilder::new(Client::new()).build();
    FirebaseMessaging::new_with_client(client, server.url(SEND_PATH))
}

#[test]
fn test_wall_post_message_shape() {
    let message = wall_post_test_message("post-42");

    assert_eq!(message.topic.as_deref(), Some("all_posts"));
    assert!(message.token.is_none());
    let data = message.data.as_ref().unwrap();
    assert_eq!(data.get("type").map(String::as_str), Some("wall_post"));
    assert_eq!(data.get("postId").map(String::as_str), Some("post-42"));
    let notification = message.notification.as_ref().unwrap();
    assert_eq!(notification.title.as_deref(), Some("Test Post Notification"));
    assert_eq!(
        notification.body.as_deref(),
        Some("Click to open this specific post!")
    );
}

#[tokio::test]
async fn test_send_message() {
    let server = MockServer::start();
    let fcm = messaging(&server);

    let mock = server.mock(|when, then| {
        when.method(POST).path(SEND_PATH).json_body(json!({
            "validate_only": false,
            "message": {
                "data": { "type": "wall_post", "postId": "test_post_id" },
                "notification": {
                    "title": "Test Post Notification",
                    "body": "Click to open this specific post!"
                },
                "topic": "all_posts"
            }
        }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "name": "projects/test-project/messages/0:1500415314455276%31bd1c9631bd1c96" }));
    });

    let name = fcm
        .send(&wall_post_test_message(DEFAULT_TEST_POST_ID))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(
        name,
        "projects/test-project/messages/0:1500415314455276%31bd1c9631bd1c96"
    );
}

#[tokio::test]
async fn test_send_surfaces_api_error() {
    let server = MockServer::start();
    let fcm = messaging(&server);

    server.mock(|when, then| {
        when.method(POST).path(SEND_PATH);
        then.status(403).json_body(json!({
            "error": {
                "code": 403,
                "message": "SenderId mismatch",
                "status": "PERMISSION_DENIED"
            }
        }));
    });

    let err = fcm
        .send(&wall_post_test_message("p1"))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, MessagingError::ApiError(ref msg) if msg.contains("SenderId mismatch")));
}

#[tokio::test]
async fn test_message_without_single_target_is_rejected() {
    let server = MockServer::start();
    let fcm = messaging(&server);

    let any = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({ "name": "unused" }));
    });

    let mut message = wall_post_test_message("p1");
    message.token = Some("device-token".to_string());
    let err = fcm.send(&message).await.err().unwrap();
    assert!(matches!(err, MessagingError::InvalidMessage(_)));

    message.token = None;
    message.topic = None;
    let err = fcm.send(&message).await.err().unwrap();
    assert!(matches!(err, MessagingError::InvalidMessage(_)));

    any.assert_calls(0);
}
