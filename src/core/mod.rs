pub mod middleware;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GoogleErrorResponse {
    pub error: GoogleErrorDetails,
}

#[derive(Debug, Deserialize)]
pub struct GoogleErrorDetails {
    pub code: u16,
    pub message: String,
    pub status: Option<String>,
}

impl GoogleErrorResponse {
    pub fn display_message(&self) -> String {
        match &self.error.status {
            Some(status) => format!("{} ({} {})", self.error.message, self.error.code, status),
            None => format!("{} (code: {})", self.error.message, self.error.code),
        }
    }
}

/// Reads a failed response into `(status, body)`, keeping the body verbatim.
pub async fn read_error_body(response: reqwest::Response) -> (reqwest::StatusCode, String) {
    let status = response.status();
    (status, body_or_note(response.text().await))
}

fn body_or_note<E: std::fmt::Display>(text: Result<String, E>) -> String {
    match text {
        Ok(text) => text,
        Err(e) => format!("<unreadable body: {}>", e),
    }
}

/// Produces a one-line description of a failed response, preferring the
/// structured Google API error when the body carries one.
pub async fn parse_error_response(response: reqwest::Response, default_msg: &str) -> String {
    let (status, text) = read_error_body(response).await;
    match serde_json::from_str::<GoogleErrorResponse>(&text) {
        Ok(error_resp) => error_resp.display_message(),
        Err(_) if text.is_empty() => format!("{}: {}", default_msg, status),
        Err(_) => format!("{} {}: {}", default_msg, status, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_message_includes_status_when_present() {
        let resp: GoogleErrorResponse = serde_json::from_value(serde_json::json!({
            "error": { "code": 404, "message": "Release not found", "status": "NOT_FOUND" }
        }))
        .unwrap();
        assert_eq!(resp.display_message(), "Release not found (404 NOT_FOUND)");
    }

    #[test]
    fn unreadable_body_is_annotated() {
        assert_eq!(body_or_note::<&str>(Ok("{}".to_string())), "{}");
        assert_eq!(
            body_or_note(Err("connection reset")),
            "<unreadable body: connection reset>"
        );
    }
}
