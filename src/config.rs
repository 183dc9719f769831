use std::env;
use std::str::FromStr;

/// Runtime settings, read from the environment (and `.env` via `dotenv`).
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a `Config` from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            Some(url) => Some(url),
            None => match lookup("DB_HOST").filter(|host| !host.is_empty()) {
                Some(host) => Some(compose_database_url(
                    &host,
                    parse_or(&lookup, "DB_PORT", 5432u16)?,
                    &lookup("DB_DATABASE").unwrap_or_else(|| "postgres".to_string()),
                    &lookup("DB_USER").unwrap_or_else(|| "postgres".to_string()),
                    lookup("DB_PASSWORD").as_deref(),
                    parse_or(&lookup, "DB_SSL", false)?,
                )),
                None => None,
            },
        };

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(format!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                bcrypt_cost
            ));
        }

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// Assembles a postgres URL from the individual `DB_*` settings.
pub fn compose_database_url(
    host: &str,
    port: u16,
    database: &str,
    user: &str,
    password: Option<&str>,
    ssl: bool,
) -> String {
    let credentials = match password {
        Some(password) if !password.is_empty() => format!("{}:{}", user, password),
        _ => user.to_string(),
    };
    let mut url = format!("postgres://{}@{}:{}/{}", credentials, host, port, database);
    if ssl {
        url.push_str("?sslmode=require");
    }
    url
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}
