//! Outbound email delivery.
//!
//! The auth flows hand a rendered [`EmailMessage`] to a [`Mailer`]. The real
//! implementation posts to the mail provider's HTTP API; development
//! environments without provider credentials fall back to [`LogMailer`].

use anyhow::Context;
use axum::async_trait;
use serde_json::json;
use tracing::info;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// A fully rendered outbound message.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message or return an error. One attempt, no retries; the
    /// caller decides what a failure means.
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

/// Mailer backed by the Resend HTTP API.
#[derive(Clone)]
pub struct ResendMailer {
    http: reqwest::Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: &str, from: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        let response = self
            .http
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": message.to,
                "subject": message.subject,
                "html": message.html,
            }))
            .send()
            .await
            .context("mail provider request")?;

        if !response.status().is_success() {
            anyhow::bail!("mail provider returned {}", response.status());
        }

        info!(to = %message.to, "verification email sent");
        Ok(())
    }
}

/// Local dev mailer that logs the message instead of sending it.
#[derive(Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        info!(to = %message.to, subject = %message.subject, "email send stub");
        Ok(())
    }
}

/// Render the account confirmation message.
pub fn verification_email(
    public_url: &str,
    first_name: &str,
    to: &str,
    token: &str,
) -> EmailMessage {
    let link = format!(
        "{}/auth/verify?token={}",
        public_url.trim_end_matches('/'),
        token
    );
    let html = format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Welcome to the studio!</h2>
  <p>Hi {first_name},</p>
  <p>Thanks for signing up. Click the button below to confirm your account:</p>
  <p style="text-align: center; margin: 30px 0;">
    <a href="{link}" style="background-color: #4a102a; color: white; padding: 12px 24px; text-decoration: none; border-radius: 50px;">Confirm my account</a>
  </p>
  <p>If the button does not work, copy this link into your browser:</p>
  <p style="word-break: break-all;">{link}</p>
  <p>This link expires in 24 hours.</p>
  <p>If you did not request this email, you can ignore it.</p>
</div>"#
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Confirm your account".to_string(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_email_carries_link_and_token() {
        let token = "ab".repeat(32);
        let message = verification_email("https://studio.example.com/", "Ana", "ana@x.com", &token);
        assert_eq!(message.to, "ana@x.com");
        assert!(message
            .html
            .contains(&format!("https://studio.example.com/auth/verify?token={token}")));
        assert!(message.html.contains("Hi Ana"));
        assert!(message.html.contains("24 hours"));
    }

    #[test]
    fn trailing_slash_does_not_double_up() {
        let message = verification_email("https://studio.example.com", "Ana", "a@x.com", "t0k");
        assert!(message.html.contains("https://studio.example.com/auth/verify?token=t0k"));
        assert!(!message.html.contains(".com//auth"));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let message = verification_email("http://localhost:3000", "Ana", "a@x.com", "t0k");
        assert!(LogMailer.send(&message).await.is_ok());
    }
}
