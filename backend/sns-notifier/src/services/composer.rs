use crate::models::NotificationEnvelope;

/// Payload published when no content service is configured
pub const HEARTBEAT_MESSAGE: &str = "Hello SNS";

/// Joins post bodies, newline separated, into the `default` channel.
///
/// Other channels are left empty for the caller to fill in.
pub fn compose<I, T>(items: I) -> NotificationEnvelope
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut body = String::new();
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            body.push('\n');
        }
        body.push_str(item.as_ref());
    }
    NotificationEnvelope::new(body)
}

pub fn compose_default() -> NotificationEnvelope {
    NotificationEnvelope::new(HEARTBEAT_MESSAGE)
}
