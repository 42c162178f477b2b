use std::env;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_key: String,
    pub supabase_bucket: String,
    pub jwt_secret: String,
    pub smtp: SmtpConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let supabase_url = env::var("SUPABASE_URL")?;
        let supabase_key = env::var("SUPABASE_KEY")?;
        let supabase_bucket =
            env::var("SUPABASE_BUCKET").unwrap_or_else(|_| "listing-photos".to_string());
        let jwt_secret = env::var("SUPABASE_JWT_SECRET")?;

        let smtp = SmtpConfig {
            host: env::var("SMTP_HOST")?,
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(587),
            user: env::var("SMTP_USER")?,
            password: env::var("SMTP_PASSWORD")?,
            from: env::var("SMTP_FROM")?,
        };

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        Ok(Self {
            supabase_url,
            supabase_key,
            supabase_bucket,
            jwt_secret,
            smtp,
            host,
            port,
        })
    }
}
