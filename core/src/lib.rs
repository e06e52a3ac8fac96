mod api;
mod error;
mod models;

pub use api::{classify_error, delivery_id, send_url, DEFAULT_ENDPOINT};
pub use error::PushError;
pub use models::*;

use std::time::Duration;

/// Anything that can deliver a [`Message`] and report its delivery id.
#[allow(async_fn_in_trait)]
pub trait NotificationSender {
    async fn send(&self, message: &Message) -> Result<String, PushError>;
}

/// FCM HTTP v1 sender authenticated with an OAuth2 bearer token.
pub struct FcmClient {
    http: reqwest::Client,
    url: String,
    access_token: String,
    validate_only: bool,
}

impl FcmClient {
    pub fn new(project_id: &str, access_token: &str, timeout: Duration) -> Result<Self, PushError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, project_id, access_token, timeout)
    }

    pub fn with_endpoint(
        endpoint: &str,
        project_id: &str,
        access_token: &str,
        timeout: Duration,
    ) -> Result<Self, PushError> {
        let project_id = project_id.trim();
        if project_id.is_empty() || project_id.contains('/') {
            return Err(PushError::Config(format!("invalid project id '{}'", project_id)));
        }
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(PushError::Config("empty access token".into()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("apptools/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            url: send_url(endpoint, project_id),
            access_token: access_token.to_string(),
            validate_only: false,
        })
    }

    /// Ask FCM to validate the message without delivering it.
    pub fn validate_only(mut self, yes: bool) -> Self {
        self.validate_only = yes;
        self
    }

    pub fn url(&self) -> &str { &self.url }
}

impl NotificationSender for FcmClient {
    async fn send(&self, message: &Message) -> Result<String, PushError> {
        tracing::debug!(url = %self.url, to = %message.target.describe(), dry_run = self.validate_only, "sending push");
        api::send_message(&self.http, &self.url, &self.access_token, message, self.validate_only).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder { sent: Mutex<Vec<Message>> }

    impl NotificationSender for Recorder {
        async fn send(&self, message: &Message) -> Result<String, PushError> {
            let mut sent = self.sent.lock().unwrap();
            sent.push(message.clone());
            Ok(format!("projects/test/messages/{}", sent.len()))
        }
    }

    async fn deliver<S: NotificationSender>(sender: &S, msg: &Message) -> Result<String, PushError> {
        sender.send(msg).await
    }

    #[tokio::test]
    async fn sender_trait_reports_delivery_id() {
        let rec = Recorder { sent: Mutex::new(Vec::new()) };
        let msg = Message::new(Target::Topic("all_users".into()), "a", "b");
        assert_eq!(deliver(&rec, &msg).await.unwrap(), "projects/test/messages/1");
        assert_eq!(rec.sent.lock().unwrap()[0], msg);
    }

    #[test]
    fn client_rejects_bad_configuration() {
        let t = Duration::from_secs(5);
        assert!(matches!(FcmClient::new("", "tok", t), Err(PushError::Config(_))));
        assert!(matches!(FcmClient::new("a/b", "tok", t), Err(PushError::Config(_))));
        assert!(matches!(FcmClient::new("app", "  ", t), Err(PushError::Config(_))));
    }

    #[test]
    fn client_targets_project_endpoint() {
        let c = FcmClient::with_endpoint("http://127.0.0.1:9/v1", " my-app ", "tok", Duration::from_secs(1)).unwrap();
        assert_eq!(c.url(), "http://127.0.0.1:9/v1/projects/my-app/messages:send");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        let c = FcmClient::with_endpoint("http://127.0.0.1:9/v1", "my-app", "tok", Duration::from_secs(2)).unwrap();
        let msg = Message::new(Target::Token("x".repeat(32)), "a", "b");
        assert!(matches!(c.send(&msg).await, Err(PushError::Http(_))));
    }
}
