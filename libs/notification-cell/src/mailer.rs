use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::templates;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Mail relay error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mail relay rejected message (HTTP {status}): {body}")]
    Relay { status: u16, body: String },
}

/// Booking fields needed to render customer-facing mail.
#[derive(Debug, Clone)]
pub struct BookingEmail {
    pub booking_id: i64,
    pub dentist_name: String,
    pub patient_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Outbound email client. Built once at startup; delivery goes through the
/// configured HTTP mail relay. An unset relay URL disables dispatch.
pub struct Mailer {
    client: Client,
    relay_url: String,
    from: String,
    admin_address: String,
    public_base_url: String,
}

impl Mailer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            relay_url: config.mail_relay_url.clone(),
            from: config.mail_from.clone(),
            admin_address: config.mail_admin_address.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.relay_url.is_empty()
    }

    pub async fn send_payment_confirmation(
        &self,
        details: &BookingEmail,
    ) -> Result<(), NotificationError> {
        let (subject, text, html) = templates::payment_confirmation(details, &self.public_base_url);
        self.deliver(&details.email, &subject, &text, &html).await
    }

    pub async fn send_admin_payment_notice(
        &self,
        booking_id: i64,
        payment_id: &str,
    ) -> Result<(), NotificationError> {
        let (subject, text, html) = templates::admin_payment_notice(booking_id, payment_id);
        let to = self.admin_address.clone();
        self.deliver(&to, &subject, &text, &html).await
    }

    pub async fn send_reschedule_notice(
        &self,
        details: &BookingEmail,
    ) -> Result<(), NotificationError> {
        let (subject, text, html) = templates::reschedule_notice(details, &self.public_base_url);
        self.deliver(&details.email, &subject, &text, &html).await
    }

    pub async fn send_cancellation_notice(
        &self,
        details: &BookingEmail,
    ) -> Result<(), NotificationError> {
        let (subject, text, html) = templates::cancellation_notice(details);
        self.deliver(&details.email, &subject, &text, &html).await
    }

    async fn deliver(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: &str,
    ) -> Result<(), NotificationError> {
        if !self.is_enabled() {
            debug!("Mail relay not configured, dropping message to {}", to);
            return Ok(());
        }

        let message = OutboundMessage {
            from: &self.from,
            to,
            subject,
            text,
            html,
        };

        let response = self
            .client
            .post(&self.relay_url)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Mail relay rejected message ({}): {}", status, body);
            return Err(NotificationError::Relay {
                status: status.as_u16(),
                body,
            });
        }

        info!("Sent '{}' to {}", subject, to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(relay_url: String) -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "secret".to_string(),
            stripe_secret_key: String::new(),
            stripe_api_base_url: String::new(),
            mail_relay_url: relay_url,
            mail_from: "noreply@dnh.dental".to_string(),
            mail_admin_address: "admin@dnh.dental".to_string(),
            upload_dir: "uploads".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            port: 0,
        }
    }

    fn details() -> BookingEmail {
        BookingEmail {
            booking_id: 7,
            dentist_name: "Dr. Molar".to_string(),
            patient_name: Some("Pat Example".to_string()),
            email: "pat@example.com".to_string(),
            phone: "07000000000".to_string(),
            address: Some("1 High St".to_string()),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            time: chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn delivers_payment_confirmation_through_relay() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(body_partial_json(serde_json::json!({
                "to": "pat@example.com",
                "from": "noreply@dnh.dental"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = Mailer::new(&test_config(format!("{}/send", server.uri())));
        mailer
            .send_payment_confirmation(&details())
            .await
            .expect("delivery should succeed");
    }

    #[tokio::test]
    async fn relay_failure_surfaces_as_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let mailer = Mailer::new(&test_config(server.uri()));
        let err = mailer.send_cancellation_notice(&details()).await;
        assert!(matches!(err, Err(NotificationError::Relay { status: 502, .. })));
    }

    #[tokio::test]
    async fn unconfigured_relay_is_a_silent_noop() {
        let mailer = Mailer::new(&test_config(String::new()));
        assert!(!mailer.is_enabled());
        mailer
            .send_admin_payment_notice(7, "pi_123")
            .await
            .expect("disabled mailer should not fail");
    }
}
