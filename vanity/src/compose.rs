use crate::errors::{Result, VanityError};
use crate::record::PackageRecord;
use http_body_util::{BodyExt, Full, combinators::BoxBody};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};

pub type ResponseBody = BoxBody<Bytes, VanityError>;

/// `go-import` meta tag content: `importpath vcs repo-root`. The Go
/// toolchain parses this with a fixed grammar, so the string is built
/// byte-exact.
pub fn import_clause(pkg: &str, source: &str, vcs: &str) -> String {
    format!("{pkg} {vcs} https://{source}")
}

/// `go-source` meta tag content: `project-root meta-root-url
/// source-template`. The `{/dir}`, `{file}` and `{line}` substrings are
/// template placeholders owned by the consuming tool and are emitted
/// verbatim, unescaped.
pub fn source_clause(pkg: &str, source: &str, branch: &str) -> String {
    format!(
        "{pkg} https://{source} https://{source}/tree/{branch}{{/dir}} \
         https://{source}/blob/{branch}{{/dir}}/{{file}}#L{{line}}"
    )
}

/// URL of the package's documentation page.
pub fn package_url(docs_host: &str, pkg: &str) -> String {
    format!("https://{docs_host}/{pkg}")
}

/// Renders the discovery page for a resolved package: the `go-import` and
/// `go-source` meta tags plus an immediate redirect to the documentation
/// site for human visitors.
pub fn render_success(record: &PackageRecord, docs_host: &str) -> Result<Response<ResponseBody>> {
    let import = import_clause(&record.name, &record.source, &record.vcs);
    let source = source_clause(&record.name, &record.source, &record.default_branch);
    let docs = package_url(docs_host, &record.name);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta http-equiv="Content-Type" content="text/html; charset=utf-8" />
    <meta name="go-import" content="{import}" />
    <meta name="go-source" content="{source}" />
    <meta http-equiv="refresh" content="0; url={docs}" />
  </head>
  <body>
    Nothing to see here! <a href="{docs}">Move along</a>
  </body>
</html>"#
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html")
        .body(full_body(html))
        .map_err(VanityError::from)
}

/// Renders a plain-text failure response, e.g. `404 NOT FOUND`. Every
/// error path ends here; nothing propagates to the transport layer as an
/// uncaught failure.
pub fn render_failure(status: StatusCode) -> Result<Response<ResponseBody>> {
    let reason = status.canonical_reason().unwrap_or("ERROR");
    let body = format!("{} {}", status.as_u16(), reason.to_uppercase());

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain")
        .body(full_body(body))
        .map_err(VanityError::from)
}

fn full_body<T: Into<Bytes>>(data: T) -> ResponseBody {
    Full::new(data.into()).map_err(|e| match e {}).boxed()
}
