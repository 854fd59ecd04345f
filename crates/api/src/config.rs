/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum accepted request body size in bytes (default: 20 MB).
    pub body_limit_bytes: usize,
    /// Deadline for one response-write unit of work, in seconds
    /// (default: `10`). The transaction is abandoned (and rolled back)
    /// when it does not complete in time.
    pub write_deadline_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                 |
    /// |-----------------------|-------------------------|
    /// | `HOST`                | `0.0.0.0`               |
    /// | `PORT`                | `3000`                  |
    /// | `CORS_ORIGINS`        | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`| `30`                    |
    /// | `BODY_LIMIT_BYTES`    | `20000000`              |
    /// | `WRITE_DEADLINE_SECS` | `10`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let body_limit_bytes: usize = std::env::var("BODY_LIMIT_BYTES")
            .unwrap_or_else(|_| "20000000".into())
            .parse()
            .expect("BODY_LIMIT_BYTES must be a valid usize");

        let write_deadline_secs: u64 = std::env::var("WRITE_DEADLINE_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("WRITE_DEADLINE_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            body_limit_bytes,
            write_deadline_secs,
        }
    }
}
