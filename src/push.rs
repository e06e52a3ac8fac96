//! Ready-made test notifications for the app's push channel.

use apptools_push::{Message, Target};

pub const MIN_TOKEN_LEN: usize = 20;

pub fn market_open(topic: &str, channel: &str) -> Message {
    Message::new(
        Target::Topic(topic.to_string()),
        "Apertura del mercado",
        "El dólar blue subió a $1.485,00",
    )
    .with_data("tipo", "apertura")
    .with_data("dolar", "blue")
    .with_data("precio", "1485.00")
    .with_android_channel(channel)
    .with_apns_badge(1, false)
}

pub fn market_close(topic: &str, channel: &str) -> Message {
    Message::new(
        Target::Topic(topic.to_string()),
        "Cierre del día",
        "Dólar Blue bajó 0,34% y cerró el día a $1.485,00. La brecha con el Dólar Oficial desciende al 1,4%",
    )
    .with_data("tipo", "cierre")
    .with_data("variacion", "-0.34")
    .with_data("precio", "1485.00")
    .with_data("brecha", "1.4")
    .with_android_channel(channel)
    .with_apns_badge(1, false)
}

pub fn custom(topic: &str, channel: &str, title: &str, body: &str, kind: &str, timestamp: &str) -> Message {
    Message::new(Target::Topic(topic.to_string()), title, body)
        .with_data("tipo", kind)
        .with_data("timestamp", timestamp)
        .with_android_channel(channel)
        .with_apns_badge(1, false)
}

/// Direct-to-device test message; wakes the iOS app in the background too.
pub fn device_test(token: &str, channel: &str, title: &str, body: &str) -> Message {
    Message::new(Target::Token(token.to_string()), title, body)
        .with_data("tipo", "prueba")
        .with_data("origen", "script_ios")
        .with_android_channel(channel)
        .with_apns_badge(1, true)
}

/// Trim a device token and reject obviously truncated ones.
pub fn validate_device_token(raw: &str) -> Result<&str, String> {
    let token = raw.trim();
    if token.len() < MIN_TOKEN_LEN {
        return Err(format!(
            "device token too short ({} chars); pass the full FCM token the app logs",
            token.len()
        ));
    }
    Ok(token)
}

/// Local time without offset, e.g. `2024-05-01T10:20:30.123456`.
pub fn local_timestamp() -> String {
    chrono::Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_carry_payload_and_channel() {
        let m = market_close("all_users", "chan");
        assert_eq!(m.target, Target::Topic("all_users".into()));
        assert_eq!(m.data["tipo"], "cierre");
        assert_eq!(m.data["brecha"], "1.4");
        let android = m.android.unwrap();
        assert_eq!(android.notification.channel_id.as_deref(), Some("chan"));
        assert!(!m.apns.unwrap().payload.aps.content_available);

        assert_eq!(market_open("t", "c").data["tipo"], "apertura");
    }

    #[test]
    fn custom_message_is_stamped() {
        let m = custom("all_users", "c", "Hola", "Mundo", "custom", "2024-01-01T00:00:00.000000");
        assert_eq!(m.notification.title, "Hola");
        assert_eq!(m.data["tipo"], "custom");
        assert_eq!(m.data["timestamp"], "2024-01-01T00:00:00.000000");
    }

    #[test]
    fn device_test_targets_token() {
        let m = device_test("tok", "c", "t", "b");
        assert_eq!(m.target, Target::Token("tok".into()));
        assert_eq!(m.data["origen"], "script_ios");
        assert!(m.apns.unwrap().payload.aps.content_available);
    }

    #[test]
    fn token_validation_trims_and_checks_length() {
        let good = format!("  {}\n", "a".repeat(MIN_TOKEN_LEN));
        assert_eq!(validate_device_token(&good).unwrap().len(), MIN_TOKEN_LEN);
        assert!(validate_device_token("short").is_err());
        assert!(validate_device_token("   ").is_err());
    }

    #[test]
    fn timestamp_shape() {
        let ts = local_timestamp();
        assert_eq!(ts.len(), "2024-05-01T10:20:30.123456".len());
        assert_eq!(&ts[10..11], "T");
    }
}
