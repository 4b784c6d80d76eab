use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

/// Key-value store endpoint. The store must expose `GET {url}/keys`
/// (cursor-paginated) and `GET {url}/values/{key}`.
#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Store {
    pub url: String,
    /// Upper bound for each individual store call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Store {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_docs_host() -> String {
    "pkg.go.dev".into()
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    pub store: Store,
    /// Documentation site human visitors are redirected to.
    #[serde(default = "default_docs_host")]
    pub docs_host: String,
}
