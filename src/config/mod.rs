use log::warn;

#[derive(Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub auth: AuthConfig,
}

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: String,
    pub server: String,
    pub port: u32,
    pub database: String,
}

#[derive(Clone)]
pub struct LlmConfig {
    /// Base URL of the Ollama-style generate endpoint.
    pub url: String,
    /// Model used for complaint classification (chat and voice paths).
    pub chat_model: String,
    /// Model used for billing hike explanations.
    pub billing_model: String,
    pub timeout_secs: u64,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

fn get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default development secret - DO NOT USE IN PRODUCTION");
            "dev-secret-key-change-in-production-minimum-32-chars".to_string()
        });

        AppConfig {
            server: ServerConfig {
                host: get_str("SERVER_HOST", "0.0.0.0"),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(8080),
            },
            database: DatabaseConfig {
                username: get_str("DB_USER", "ticketuser"),
                password: get_str("DB_PASSWORD", ""),
                server: get_str("DB_HOST", "localhost"),
                port: std::env::var("DB_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5432),
                database: get_str("DB_NAME", "ticketserver"),
            },
            llm: LlmConfig {
                url: get_str("LLM_URL", "http://localhost:11434"),
                chat_model: get_str("LLM_CHAT_MODEL", "mistral"),
                billing_model: get_str("LLM_BILLING_MODEL", "llama3"),
                timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(120),
            },
            auth: AuthConfig { jwt_secret },
        }
    }

    pub fn database_url(&self) -> String {
        // DATABASE_URL wins over the individual parts when set.
        if let Ok(url) = std::env::var("DATABASE_URL") {
            return url;
        }
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.database.username,
            self.database.password,
            self.database.server,
            self.database.port,
            self.database.database
        )
    }
}
