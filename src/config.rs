use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Provider API key; without one the app falls back to the log mailer.
    pub api_key: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Base URL used when building verification links.
    pub public_url: String,
    pub environment: String,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "studio-auth".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "studio-web".into()),
        };
        let mail = MailConfig {
            api_key: std::env::var("RESEND_API_KEY").ok(),
            from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Studio <onboarding@resend.dev>".into()),
        };
        Ok(Self {
            database_url,
            public_url: std::env::var("APP_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            jwt,
            mail,
        })
    }

    /// Session cookies carry the `Secure` attribute outside development.
    pub fn secure_cookies(&self) -> bool {
        self.environment == "production"
    }
}
