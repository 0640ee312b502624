use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// SQLCipher key applied via `PRAGMA key` on every new connection.
    /// None = database stored in plaintext.
    pub database_key: Option<String>,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    /// Extra allowed CORS origins beyond the frontend URL
    /// (comma-separated in the environment).
    pub cors_extra_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:moodlog.db?mode=rwc".into()),
            database_key: env::var("DATABASE_KEY").ok().filter(|k| !k.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn encryption_enabled(&self) -> bool {
        self.database_key.is_some()
    }
}
