use std::net::{IpAddr, SocketAddr};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub environment: Environment,
    pub log_level: String,
    pub seed_sample_games: bool,
}

/// Where game records are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local concurrent map, lost on restart.
    Memory,
    /// Relational database reached through `SeaORM` (`PostgreSQL` or `SQLite`).
    Database { url: String },
    /// `MongoDB` collection; ids are `ObjectId` hex strings.
    Document { uri: String, database: String },
}

/// Deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Whether 500 responses may carry the underlying error chain.
    #[must_use]
    pub const fn exposes_error_details(&self) -> bool {
        matches!(self, Self::Development)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present).
    ///
    /// Optional with defaults: `STORE_BACKEND`, `DATABASE_URL`, `MONGODB_URI`,
    /// `MONGODB_DATABASE`, `SERVER_HOST`, `SERVER_PORT`, `ENVIRONMENT`, `LOG_LEVEL`,
    /// `SEED_SAMPLE_GAMES`.
    ///
    /// `PORT` overrides `SERVER_PORT`.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an invalid value, or if a database backend is
    /// selected without its connection string.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let mongodb_uri = lookup("MONGODB_URI").filter(|uri| !uri.trim().is_empty());
        let mongodb_database =
            lookup("MONGODB_DATABASE").unwrap_or_else(|| "game_collection".to_string());

        let store_backend = match lookup("STORE_BACKEND").as_deref() {
            Some("memory") => StoreBackend::Memory,
            Some("database") => StoreBackend::Database {
                url: database_url.ok_or_else(|| {
                    anyhow::anyhow!("DATABASE_URL must be set when STORE_BACKEND=database")
                })?,
            },
            Some("document") => StoreBackend::Document {
                uri: mongodb_uri.ok_or_else(|| {
                    anyhow::anyhow!("MONGODB_URI must be set when STORE_BACKEND=document")
                })?,
                database: mongodb_database,
            },
            Some(other) => anyhow::bail!(
                "STORE_BACKEND must be `memory`, `database` or `document`, got `{other}`"
            ),
            None => match (database_url, mongodb_uri) {
                (Some(url), _) => StoreBackend::Database { url },
                (None, Some(uri)) => StoreBackend::Document {
                    uri,
                    database: mongodb_database,
                },
                (None, None) => StoreBackend::Memory,
            },
        };

        let environment = match lookup("ENVIRONMENT").map(|env| env.to_ascii_lowercase()) {
            None => Environment::Development,
            Some(env) => match env.as_str() {
                "development" => Environment::Development,
                "staging" => Environment::Staging,
                "production" => Environment::Production,
                _ => anyhow::bail!(
                    "ENVIRONMENT must be `development`, `staging` or `production`, got `{env}`"
                ),
            },
        };

        let server_port = lookup("PORT")
            .or_else(|| lookup("SERVER_PORT"))
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT / PORT must be a valid u16"))?;

        // Containers need to listen on every interface
        let default_host = if environment == Environment::Production {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let server_host = lookup("SERVER_HOST")
            .unwrap_or_else(|| default_host.to_string())
            .parse::<IpAddr>()
            .map_err(|_| anyhow::anyhow!("SERVER_HOST must be a valid IP address"))?;

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let seed_sample_games = match lookup("SEED_SAMPLE_GAMES").as_deref() {
            None | Some("true" | "1") => true,
            Some("false" | "0") => false,
            Some(other) => {
                anyhow::bail!("SEED_SAMPLE_GAMES must be `true` or `false`, got `{other}`")
            }
        };

        Ok(Self {
            store_backend,
            server_host,
            server_port,
            environment,
            log_level,
            seed_sample_games,
        })
    }

    /// Build the socket address for the server to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let Ok(config) = load(&[]) else {
            unreachable!("an empty environment is valid");
        };
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.log_level, "info");
        assert!(config.seed_sample_games);
    }

    #[test]
    fn test_database_url_selects_database_backend() {
        let backend = load(&[("DATABASE_URL", "sqlite::memory:")]).map(|c| c.store_backend);
        assert_eq!(
            backend.ok(),
            Some(StoreBackend::Database {
                url: "sqlite::memory:".to_string()
            })
        );
    }

    #[test]
    fn test_explicit_memory_backend_ignores_database_url() {
        let backend = load(&[("STORE_BACKEND", "memory"), ("DATABASE_URL", "sqlite::memory:")])
            .map(|c| c.store_backend);
        assert_eq!(backend.ok(), Some(StoreBackend::Memory));
    }

    #[test]
    fn test_database_backend_requires_url() {
        assert!(load(&[("STORE_BACKEND", "database")]).is_err());
        assert!(load(&[("STORE_BACKEND", "mongo")]).is_err());
    }

    #[test]
    fn test_document_backend() {
        let backend = load(&[
            ("STORE_BACKEND", "document"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
        ])
        .map(|c| c.store_backend);
        assert_eq!(
            backend.ok(),
            Some(StoreBackend::Document {
                uri: "mongodb://localhost:27017".to_string(),
                database: "game_collection".to_string(),
            })
        );

        let backend = load(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("MONGODB_DATABASE", "games"),
        ])
        .map(|c| c.store_backend);
        assert_eq!(
            backend.ok(),
            Some(StoreBackend::Document {
                uri: "mongodb://db:27017".to_string(),
                database: "games".to_string(),
            })
        );

        assert!(load(&[("STORE_BACKEND", "document")]).is_err());
    }

    #[test]
    fn test_port_precedence() {
        let port = load(&[("PORT", "4000"), ("SERVER_PORT", "5000")]).map(|c| c.server_port);
        assert_eq!(port.ok(), Some(4000));

        let port = load(&[("SERVER_PORT", "5000")]).map(|c| c.server_port);
        assert_eq!(port.ok(), Some(5000));

        assert!(load(&[("PORT", "not-a-port")]).is_err());
    }

    #[test]
    fn test_production_binds_all_interfaces() {
        let Ok(config) = load(&[("ENVIRONMENT", "production")]) else {
            unreachable!("production is a known environment");
        };
        assert_eq!(config.server_host, IpAddr::from([0, 0, 0, 0]));
        assert!(!config.environment.exposes_error_details());
    }

    #[test]
    fn test_environment_is_case_insensitive() {
        for raw in ["Production", "PRODUCTION"] {
            let environment = load(&[("ENVIRONMENT", raw)]).map(|c| c.environment);
            assert_eq!(environment.ok(), Some(Environment::Production));
        }

        let environment = load(&[("ENVIRONMENT", "Staging")]).map(|c| c.environment);
        assert_eq!(environment.ok(), Some(Environment::Staging));
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        for raw in ["prod", "dev", ""] {
            assert!(load(&[("ENVIRONMENT", raw)]).is_err(), "`{raw}` was accepted");
        }
    }

    #[test]
    fn test_seed_flag() {
        let seed = load(&[("SEED_SAMPLE_GAMES", "false")]).map(|c| c.seed_sample_games);
        assert_eq!(seed.ok(), Some(false));
        assert!(load(&[("SEED_SAMPLE_GAMES", "maybe")]).is_err());
    }
}
