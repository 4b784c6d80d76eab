use crate::compose::{self, ResponseBody};
use crate::errors::{Result, VanityError};
use crate::metrics_defs::{REQUESTS, RESOLVE_HIT, RESOLVE_MISS, STORE_ERRORS};
use crate::record::PackageRecord;
use crate::resolver;
use crate::store::KeyStore;
use hyper::body::Incoming;
use hyper::service::Service as HyperService;
use hyper::{Request, Response, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Hyper service handling one vanity-import lookup per request. All
/// derived state is request-local; the only shared resource is the
/// read-only store handle.
#[derive(Clone)]
pub struct VanityService {
    store: Arc<dyn KeyStore>,
    docs_host: Arc<str>,
}

impl VanityService {
    pub fn new(store: Arc<dyn KeyStore>, docs_host: &str) -> Self {
        VanityService {
            store,
            docs_host: docs_host.into(),
        }
    }

    /// Derives the `host + path` search target. The Host header (or the
    /// h2 authority) may carry a port, which is never part of a package
    /// key; the path is appended verbatim.
    fn search_target<B>(req: &Request<B>) -> Option<String> {
        let host = req
            .headers()
            .get(hyper::header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| req.uri().host())?;
        let host = host.split(':').next().unwrap_or(host);

        Some(format!("{host}{}", req.uri().path()))
    }

    /// Full lookup flow for one request: derive the search target, list
    /// the registered keys, resolve the owning package, fetch and
    /// normalize its record, render the page. The HTTP method is
    /// irrelevant; the response depends only on the target.
    pub async fn handle<B>(&self, req: Request<B>) -> Result<Response<ResponseBody>> {
        crate::counter!(REQUESTS).increment(1);

        let Some(search_for) = Self::search_target(&req) else {
            // Without a host the request cannot name a package.
            return compose::render_failure(StatusCode::NOT_FOUND);
        };
        tracing::debug!(search_for = %search_for, "resolving request");

        let keys = match self.store.list_keys().await {
            Ok(keys) => keys,
            Err(err) => return self.failure(err),
        };

        let Some(pkg) = resolver::resolve(&search_for, &keys) else {
            crate::counter!(RESOLVE_MISS).increment(1);
            tracing::warn!(search_for = %search_for, "no package matched");
            return compose::render_failure(StatusCode::NOT_FOUND);
        };
        let pkg = pkg.to_string();

        let record = match self.store.get_record(&pkg).await {
            Ok(raw) => match PackageRecord::normalize(&pkg, raw) {
                Ok(record) => record,
                Err(err) => return self.failure(err),
            },
            Err(err) => return self.failure(err),
        };

        crate::counter!(RESOLVE_HIT).increment(1);
        tracing::debug!(pkg = %record.name, source = %record.source, "resolved package");
        compose::render_success(&record, &self.docs_host)
    }

    /// Maps a store or record failure onto the response taxonomy. A key
    /// that vanished between listing and fetch renders the same 404 as a
    /// lookup miss; a misconfigured record and an unreachable store are
    /// server-side failures.
    fn failure(&self, err: VanityError) -> Result<Response<ResponseBody>> {
        crate::counter!(STORE_ERRORS).increment(1);

        let status = match &err {
            VanityError::KeyNotFound(_) => StatusCode::NOT_FOUND,
            VanityError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::NOT_FOUND {
            tracing::warn!(error = %err, "key vanished between listing and fetch");
        } else {
            tracing::error!(error = %err, status = %status, "request failed");
        }

        compose::render_failure(status)
    }
}

impl HyperService<Request<Incoming>> for VanityService {
    type Response = Response<ResponseBody>;
    type Error = VanityError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { service.handle(req).await })
    }
}
