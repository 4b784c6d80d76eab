use crate::errors::{Result, VanityError};
use crate::record::RawRecord;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

/// Read-only view of the package key-value store. Injected into the
/// request service so tests can substitute an in-memory fake.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Returns every package key in the store, following pagination
    /// cursors until the store reports completion. Keys are accumulated
    /// in the order the pages returned them.
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Fetches the raw stored value for `key`. A value body that is not a
    /// structured record is interpreted as a bare source string.
    async fn get_record(&self, key: &str) -> Result<RawRecord>;
}

/// One page of a key listing.
#[derive(Deserialize)]
struct ListPage {
    keys: Vec<KeyEntry>,
    cursor: Option<String>,
    list_complete: bool,
}

#[derive(Deserialize)]
struct KeyEntry {
    name: String,
}

/// HTTP client for the key-value store.
pub struct HttpKeyStore {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpKeyStore {
    pub fn new(base_url: &str, request_timeout: Duration) -> Self {
        HttpKeyStore {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| VanityError::StoreUnavailable(format!("invalid store URL: {e}")))
    }

    /// Issues one store call bounded by the configured timeout. A timeout
    /// or transport failure surfaces immediately; retries belong to the
    /// store client's own policy, not this layer.
    async fn fetch(&self, url: Url) -> Result<reqwest::Response> {
        timeout(self.request_timeout, self.client.get(url).send())
            .await
            .map_err(|_| {
                VanityError::StoreUnavailable(format!(
                    "timed out after {:?}",
                    self.request_timeout
                ))
            })?
            .map_err(|e| VanityError::StoreUnavailable(e.to_string()))
    }
}

#[async_trait]
impl KeyStore for HttpKeyStore {
    async fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;

        loop {
            let mut url = self.endpoint("keys")?;
            if let Some(ref c) = cursor {
                url.query_pairs_mut().append_pair("cursor", c);
            }

            let response = self.fetch(url).await?;
            if !response.status().is_success() {
                return Err(VanityError::StoreUnavailable(format!(
                    "key listing returned {}",
                    response.status()
                )));
            }

            let page = response
                .json::<ListPage>()
                .await
                .map_err(|e| VanityError::StoreUnavailable(format!("bad listing page: {e}")))?;

            keys.extend(page.keys.into_iter().map(|entry| entry.name));
            pages += 1;

            if page.list_complete {
                break;
            }
            // An incomplete listing must carry a continuation cursor.
            cursor = match page.cursor {
                Some(c) => Some(c),
                None => {
                    return Err(VanityError::StoreUnavailable(
                        "incomplete key listing without a cursor".into(),
                    ));
                }
            };
        }

        tracing::debug!(pages, keys = keys.len(), "fetched key listing from store");
        Ok(keys)
    }

    async fn get_record(&self, key: &str) -> Result<RawRecord> {
        let url = self.endpoint(&format!("values/{key}"))?;
        let response = self.fetch(url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(VanityError::KeyNotFound(key.to_string()));
        }
        if !response.status().is_success() {
            return Err(VanityError::StoreUnavailable(format!(
                "value fetch for {key} returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| VanityError::StoreUnavailable(e.to_string()))?;

        // Values are stored either as a JSON object or as a bare source
        // string. A failed structured decode means the latter, never a
        // hard failure. A missing key stays distinct, handled above.
        match serde_json::from_str::<RawRecord>(&body) {
            Ok(record) => Ok(record),
            Err(_) => Ok(RawRecord::bare(body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::service::service_fn;
    use hyper::{Request, Response};
    use hyper_util::rt::TokioExecutor;
    use std::convert::Infallible;
    use tokio::net::TcpListener;

    // Fixed three-page key listing plus a handful of values, standing in
    // for the real key-value backend.
    async fn kv_handler(
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let path = req.uri().path().to_string();
        let cursor = req
            .uri()
            .query()
            .and_then(|q| q.strip_prefix("cursor="))
            .unwrap_or("")
            .to_string();

        let (status, body) = match (path.as_str(), cursor.as_str()) {
            ("/keys", "") => (
                200,
                r#"{"keys":[{"name":"example.org/a"}],"cursor":"c1","list_complete":false}"#,
            ),
            ("/keys", "c1") => (
                200,
                r#"{"keys":[{"name":"example.org/b"}],"cursor":"c2","list_complete":false}"#,
            ),
            ("/keys", "c2") => (
                200,
                r#"{"keys":[{"name":"example.org/c"}],"list_complete":true}"#,
            ),
            ("/values/example.org/a", _) => {
                (200, r#"{"source":"github.com/user/a","vcs":"hg"}"#)
            }
            ("/values/example.org/b", _) => (200, "github.com/user/b"),
            _ => (404, ""),
        };

        Ok(Response::builder()
            .status(status)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap())
    }

    async fn start_store_server() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            loop {
                let (stream, _) = listener.accept().await.unwrap();
                let io = hyper_util::rt::TokioIo::new(stream);

                tokio::spawn(async move {
                    let _ = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new())
                        .serve_connection(io, service_fn(kv_handler))
                        .await;
                });
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        port
    }

    fn test_store(port: u16) -> HttpKeyStore {
        HttpKeyStore::new(
            &format!("http://127.0.0.1:{port}"),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn listing_follows_cursors_in_page_order() {
        let port = start_store_server().await;
        let store = test_store(port);

        let keys = store.list_keys().await.unwrap();
        assert_eq!(keys, vec!["example.org/a", "example.org/b", "example.org/c"]);
    }

    #[tokio::test]
    async fn structured_value_decodes_as_record() {
        let port = start_store_server().await;
        let store = test_store(port);

        let raw = store.get_record("example.org/a").await.unwrap();
        assert_eq!(raw.source.as_deref(), Some("github.com/user/a"));
        assert_eq!(raw.vcs.as_deref(), Some("hg"));
        assert_eq!(raw.default_branch, None);
    }

    #[tokio::test]
    async fn bare_text_value_becomes_source() {
        let port = start_store_server().await;
        let store = test_store(port);

        let raw = store.get_record("example.org/b").await.unwrap();
        assert_eq!(raw, RawRecord::bare("github.com/user/b"));
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let port = start_store_server().await;
        let store = test_store(port);

        let result = store.get_record("example.org/missing").await;
        assert!(matches!(result, Err(VanityError::KeyNotFound(_))));
    }

    #[tokio::test]
    async fn unreachable_store_is_unavailable() {
        // Non-routable address to trigger the timeout path.
        let store = HttpKeyStore::new("http://192.0.2.1:9999", Duration::from_secs(1));

        let result = store.list_keys().await;
        assert!(matches!(result, Err(VanityError::StoreUnavailable(_))));
    }
}
