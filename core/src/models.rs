use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Where a message is delivered: every subscriber of a topic or one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Topic(String),
    Token(String),
}

impl Target {
    pub fn describe(&self) -> String {
        match self {
            Target::Topic(t) => format!("topic '{}'", t),
            Target::Token(t) => format!("device token {}…", t.chars().take(12).collect::<String>()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification { pub title: String, pub body: String }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AndroidPriority {
    Normal,
    #[default]
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct AndroidNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct AndroidOptions {
    pub priority: AndroidPriority,
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Aps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
    #[serde(
        rename = "content-available",
        skip_serializing_if = "is_false",
        serialize_with = "serialize_flag"
    )]
    pub content_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ApnsPayload { pub aps: Aps }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ApnsOptions { pub payload: ApnsPayload }

/// A single push notification, serialized in the FCM HTTP v1 message shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    #[serde(flatten)]
    pub target: Target,
    pub notification: Notification,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apns: Option<ApnsOptions>,
}

impl Message {
    pub fn new(target: Target, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            target,
            notification: Notification { title: title.into(), body: body.into() },
            data: BTreeMap::new(),
            android: None,
            apns: None,
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// High priority with the default sound on the given channel.
    pub fn with_android_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.android = Some(AndroidOptions {
            priority: AndroidPriority::High,
            notification: AndroidNotification {
                sound: Some("default".into()),
                channel_id: Some(channel_id.into()),
            },
        });
        self
    }

    pub fn with_apns_badge(mut self, badge: u32, content_available: bool) -> Self {
        self.apns = Some(ApnsOptions {
            payload: ApnsPayload {
                aps: Aps { sound: Some("default".into()), badge: Some(badge), content_available },
            },
        });
        self
    }
}

/// Request envelope for `messages:send`.
#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    #[serde(skip_serializing_if = "is_false")]
    pub validate_only: bool,
    pub message: &'a Message,
}

fn is_false(b: &bool) -> bool { !*b }

fn serialize_flag<S: Serializer>(flag: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*flag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn topic_message_matches_v1_shape() {
        let msg = Message::new(Target::Topic("all_users".into()), "Hola", "Cuerpo")
            .with_data("tipo", "apertura")
            .with_android_channel("main_channel")
            .with_apns_badge(1, false);
        let v = serde_json::to_value(SendRequest { validate_only: false, message: &msg }).unwrap();
        assert_eq!(
            v,
            json!({
                "message": {
                    "topic": "all_users",
                    "notification": { "title": "Hola", "body": "Cuerpo" },
                    "data": { "tipo": "apertura" },
                    "android": {
                        "priority": "high",
                        "notification": { "sound": "default", "channel_id": "main_channel" }
                    },
                    "apns": { "payload": { "aps": { "sound": "default", "badge": 1 } } }
                }
            })
        );
    }

    #[test]
    fn token_message_sets_content_available_and_validate_only() {
        let msg = Message::new(Target::Token("abc".into()), "t", "b").with_apns_badge(1, true);
        let v = serde_json::to_value(SendRequest { validate_only: true, message: &msg }).unwrap();
        assert_eq!(v["validate_only"], json!(true));
        assert_eq!(v["message"]["token"], json!("abc"));
        assert!(v["message"].get("topic").is_none());
        assert!(v["message"].get("data").is_none());
        assert_eq!(v["message"]["apns"]["payload"]["aps"]["content-available"], json!(1));
    }

    #[test]
    fn describe_truncates_tokens() {
        let t = Target::Token("0123456789abcdefghijklmnop".into());
        assert_eq!(t.describe(), "device token 0123456789ab…");
        assert_eq!(Target::Topic("news".into()).describe(), "topic 'news'");
    }
}
