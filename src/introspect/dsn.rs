//! DSN recognition and decoding.
//!
//! Two MySQL shapes (`user:pass@tcp(host:port)/db?…`, `user:pass@unix(/sock)/db`) and
//! two Postgres shapes (`host=… dbname=…` key/value, `postgres://` URL) are accepted.

use crate::error::{GenError, Result};
use crate::naming::mask_dsn;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Postgres,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::MySql => f.write_str("mysql"),
            Dialect::Postgres => f.write_str("postgres"),
        }
    }
}

/// Pick the dialect from the DSN's shape alone.
pub fn detect_dialect(dsn: &str) -> Result<Dialect> {
    let dsn = dsn.trim();
    if dsn.contains("@tcp(") || dsn.contains("@unix(") {
        Ok(Dialect::MySql)
    } else if dsn.starts_with("host=")
        || dsn.starts_with("postgres://")
        || dsn.starts_with("postgresql://")
    {
        Ok(Dialect::Postgres)
    } else {
        Err(GenError::UnsupportedDialect(mask_dsn(dsn)))
    }
}

/// Where a MySQL server is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MySqlAddress {
    Tcp { host: String, port: Option<u16> },
    Unix(String),
}

/// A decoded Go-driver style MySQL DSN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlDsn {
    pub user: String,
    pub password: Option<String>,
    pub address: MySqlAddress,
    pub database: String,
    pub params: BTreeMap<String, String>,
}

impl MySqlDsn {
    pub fn parse(dsn: &str) -> Result<Self> {
        let dsn = dsn.trim();
        let (marker, is_unix) = if let Some(pos) = dsn.find("@tcp(") {
            (pos, false)
        } else if let Some(pos) = dsn.find("@unix(") {
            (pos, true)
        } else {
            return Err(GenError::UnsupportedDialect(mask_dsn(dsn)));
        };

        let userinfo = &dsn[..marker];
        let (user, password) = match userinfo.split_once(':') {
            Some((u, p)) => (u.to_string(), Some(p.to_string())),
            None => (userinfo.to_string(), None),
        };

        let rest = &dsn[marker + 1..];
        let open = rest.find('(').ok_or_else(|| malformed(dsn, "missing address"))?;
        let close = rest.find(')').ok_or_else(|| malformed(dsn, "unclosed address"))?;
        let addr = &rest[open + 1..close];
        let address = if is_unix {
            MySqlAddress::Unix(addr.to_string())
        } else {
            match addr.rsplit_once(':') {
                Some((host, port)) => MySqlAddress::Tcp {
                    host: host.to_string(),
                    port: Some(
                        port.parse()
                            .map_err(|_| malformed(dsn, "port is not a number"))?,
                    ),
                },
                None => MySqlAddress::Tcp {
                    host: addr.to_string(),
                    port: None,
                },
            }
        };

        // Database is whatever follows the last '/', minus the query string.
        let tail = &rest[close + 1..];
        let after_slash = tail.rsplit_once('/').map(|(_, db)| db).unwrap_or("");
        let (database, query) = match after_slash.split_once('?') {
            Some((db, q)) => (db.to_string(), q),
            None => (after_slash.to_string(), ""),
        };
        if database.is_empty() {
            return Err(malformed(dsn, "missing database name"));
        }

        let params = query
            .split('&')
            .filter(|kv| !kv.is_empty())
            .filter_map(|kv| kv.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Ok(MySqlDsn {
            user,
            password,
            address,
            database,
            params,
        })
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut opts = MySqlConnectOptions::new()
            .username(&self.user)
            .database(&self.database);
        if let Some(password) = &self.password {
            opts = opts.password(password);
        }
        opts = match &self.address {
            MySqlAddress::Tcp { host, port } => {
                let opts = opts.host(host);
                match port {
                    Some(port) => opts.port(*port),
                    None => opts,
                }
            }
            MySqlAddress::Unix(path) => opts.socket(path),
        };
        if let Some(charset) = self.params.get("charset") {
            opts = opts.charset(charset);
        }
        opts
    }
}

/// A decoded Postgres DSN (either form).
#[derive(Debug, Clone)]
pub struct PostgresDsn {
    pub database: String,
    options: PgConnectOptions,
}

impl PostgresDsn {
    pub fn parse(dsn: &str) -> Result<Self> {
        let dsn = dsn.trim();
        if dsn.starts_with("postgres://") || dsn.starts_with("postgresql://") {
            let url = url::Url::parse(dsn).map_err(|e| malformed(dsn, &e.to_string()))?;
            let database = url.path().trim_start_matches('/').to_string();
            let options = PgConnectOptions::from_str(dsn).map_err(GenError::Connection)?;
            return Ok(PostgresDsn { database, options });
        }

        let pairs = parse_key_values(dsn);
        let mut options = PgConnectOptions::new();
        for (key, value) in &pairs {
            options = match key.as_str() {
                "host" => options.host(value),
                "port" => options.port(
                    value
                        .parse()
                        .map_err(|_| malformed(dsn, "port is not a number"))?,
                ),
                "user" => options.username(value),
                "password" => options.password(value),
                "dbname" => options.database(value),
                "sslmode" => options.ssl_mode(
                    PgSslMode::from_str(value).map_err(GenError::Connection)?,
                ),
                "application_name" => options.application_name(value),
                _ => options,
            };
        }
        let database = pairs.get("dbname").cloned().unwrap_or_default();
        Ok(PostgresDsn { database, options })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        self.options.clone()
    }
}

/// `key=value` pairs separated by whitespace; single-quoted values may hold spaces.
fn parse_key_values(dsn: &str) -> BTreeMap<String, String> {
    let mut pairs = BTreeMap::new();
    let mut chars = dsn.chars().peekable();
    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let key: String = chars.by_ref().take_while(|c| *c != '=').collect();
        if key.is_empty() {
            break;
        }
        let mut value = String::new();
        if chars.peek() == Some(&'\'') {
            chars.next();
            for c in chars.by_ref() {
                if c == '\'' {
                    break;
                }
                value.push(c);
            }
        } else {
            while let Some(c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                value.push(*c);
                chars.next();
            }
        }
        pairs.insert(key.trim().to_string(), value);
    }
    pairs
}

fn malformed(dsn: &str, reason: &str) -> GenError {
    GenError::Connection(sqlx::Error::Configuration(
        format!("malformed DSN `{}`: {reason}", mask_dsn(dsn)).into(),
    ))
}
