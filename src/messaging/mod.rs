//! Firebase Cloud Messaging module.
//!
//! Sends single messages through the FCM v1 HTTP API and builds the wall-post
//! notification the app listens for on the `all_posts` topic.

pub mod models;

#[cfg(test)]
mod tests;

use crate::core::middleware::AuthMiddleware;
use crate::core::parse_error_response;
use crate::messaging::models::{Message, Notification, SendResponseInternal};
use reqwest::{header, Client};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

const FCM_V1_SEND: &str = "https://fcm.googleapis.com/v1/projects/{project_id}/messages:send";

pub const WALL_POST_TOPIC: &str = "all_posts";
pub const WALL_POST_TYPE: &str = "wall_post";
pub const DEFAULT_TEST_POST_ID: &str = "test_post_id";
const TEST_TITLE: &str = "Test Post Notification";
const TEST_BODY: &str = "Click to open this specific post!";

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("HTTP Request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

#[derive(Clone)]
pub struct FirebaseMessaging {
    client: ClientWithMiddleware,
    send_url: String,
}

// Wrapper for the request body required by FCM v1 API
#[derive(Serialize)]
struct SendRequest<'a> {
    validate_only: bool,
    message: &'a Message,
}

/// The test notification for a wall post: fixed topic and text, with the
/// post id in the data payload so a tap opens that post.
pub fn wall_post_test_message(post_id: &str) -> Message {
    let data = HashMap::from([
        ("type".to_string(), WALL_POST_TYPE.to_string()),
        ("postId".to_string(), post_id.to_string()),
    ]);

    Message {
        notification: Some(Notification {
            title: Some(TEST_TITLE.to_string()),
            body: Some(TEST_BODY.to_string()),
        }),
        data: Some(data),
        topic: Some(WALL_POST_TOPIC.to_string()),
        ..Default::default()
    }
}

impl FirebaseMessaging {
    pub fn new(middleware: AuthMiddleware, project_id: &str) -> Self {
        Self::new_with_url(middleware, FCM_V1_SEND.replace("{project_id}", project_id))
    }

    pub fn new_with_url(middleware: AuthMiddleware, send_url: String) -> Self {
        let client = ClientBuilder::new(Client::new()).with(middleware).build();
        Self { client, send_url }
    }

    #[cfg(test)]
    pub(crate) fn new_with_client(client: ClientWithMiddleware, send_url: String) -> Self {
        Self { client, send_url }
    }

    /// Sends `message` once and returns the message name assigned by FCM.
    pub async fn send(&self, message: &Message) -> Result<String, MessagingError> {
        validate_message(message)?;

        let request = SendRequest {
            validate_only: false,
            message,
        };

        let response = self
            .client
            .post(&self.send_url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MessagingError::ApiError(
                parse_error_response(response, "FCM send failed").await,
            ));
        }

        let result: SendResponseInternal = response.json().await?;
        Ok(result.name)
    }
}

fn validate_message(message: &Message) -> Result<(), MessagingError> {
    let num_targets = [
        message.token.is_some(),
        message.topic.is_some(),
        message.condition.is_some(),
    ]
    .iter()
    .filter(|&&t| t)
    .count();

    if num_targets != 1 {
        return Err(MessagingError::InvalidMessage(
            "Message must have exactly one of token, topic, or condition.".to_string(),
        ));
    }

    Ok(())
}
