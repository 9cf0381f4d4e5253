//! Manifest loading with a transport fallback chain.
//!
//! The loader tries an ordered list of [`Transport`]s. Each attempt fetches the
//! endpoint with a fresh cache-busting stamp (`?t=<unix millis>`) and succeeds
//! only on a 2xx status with a body that parses as a [`Manifest`]. The first
//! success wins. When every transport fails, the compiled-in
//! [`catalog`](crate::catalog) manifest is used, so loading never fails
//! outward.
//!
//! ## Transports
//!
//! | Transport | Client | Used for |
//! |-----------|--------|----------|
//! | [`HttpTransport`] | `reqwest` blocking client | primary, http(s) endpoints |
//! | [`AgentTransport`] | `ureq` agent | secondary, http(s) endpoints |
//! | [`FileTransport`] | filesystem | endpoints that are paths in the site directory |
//!
//! Failures of every attempt are collected; their concatenation is the single
//! diagnostic reported through the status sink.

use crate::catalog;
use crate::status::{LogSink, Status, StatusSink};
use crate::types::{Category, Manifest};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Network(e.to_string())
    }
}

/// Why one attempt did not produce a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("HTTP {status}: {status_text}")]
    Status { status: u16, status_text: String },
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw response of a transport, before status and body are checked.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One way of fetching a URL.
pub trait Transport {
    /// Short name shown in statuses and diagnostics.
    fn name(&self) -> &str;
    /// Fetch `url`. Non-2xx statuses are returned, not raised.
    fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError>;
}

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Primary transport: `reqwest` blocking client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        Ok(FetchResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: response.text()?,
        })
    }
}

/// Secondary transport: `ureq` agent, a separate HTTP stack.
pub struct AgentTransport {
    agent: ureq::Agent,
}

impl Default for AgentTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentTransport {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
        Self { agent }
    }
}

impl Transport for AgentTransport {
    fn name(&self) -> &str {
        "agent"
    }

    fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let response = match self.agent.get(url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(t)) => return Err(TransportError::Network(t.to_string())),
        };
        let status = response.status();
        let status_text = response.status_text().to_string();
        let body = response.into_string()?;
        Ok(FetchResponse {
            status,
            status_text,
            body,
        })
    }
}

/// Reads manifests from a directory; the URL is a relative path.
pub struct FileTransport {
    root: PathBuf,
}

impl FileTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Transport for FileTransport {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let relative = url.split(['?', '#']).next().unwrap_or(url);
        let path = self.root.join(relative);
        match std::fs::read_to_string(&path) {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FetchResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: String::new(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Result of one transport attempt.
#[derive(Debug)]
pub enum Attempt {
    Loaded(Manifest),
    Failed(ManifestError),
}

/// A failed attempt, kept for the diagnostic.
#[derive(Debug)]
pub struct Failure {
    pub transport: String,
    pub error: ManifestError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// Delivered by the named transport.
    Transport(String),
    /// Every transport failed; the compiled-in catalog was used.
    Fallback,
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub manifest: Manifest,
    pub source: ManifestSource,
    pub failures: Vec<Failure>,
}

impl LoadOutcome {
    pub fn used_fallback(&self) -> bool {
        self.source == ManifestSource::Fallback
    }
}

/// `All loading methods failed. http: <e1>, agent: <e2>`
pub fn diagnostic(failures: &[Failure]) -> String {
    let parts: Vec<String> = failures
        .iter()
        .map(|f| format!("{}: {}", f.transport, f.error))
        .collect();
    format!("All loading methods failed. {}", parts.join(", "))
}

/// Append `<param>=<stamp>` to `endpoint`, using `&` if it already has a query.
pub fn cache_busted(endpoint: &str, param: &str, stamp: u128) -> String {
    let sep = if endpoint.contains('?') { '&' } else { '?' };
    format!("{endpoint}{sep}{param}={stamp}")
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

fn is_remote(endpoint: &str) -> bool {
    endpoint.starts_with("http://") || endpoint.starts_with("https://")
}

pub struct ManifestLoader {
    endpoint: String,
    cache_param: String,
    transports: Vec<Box<dyn Transport>>,
}

impl ManifestLoader {
    pub fn new(
        endpoint: impl Into<String>,
        cache_param: impl Into<String>,
        transports: Vec<Box<dyn Transport>>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            cache_param: cache_param.into(),
            transports,
        }
    }

    /// The standard chain for an endpoint.
    ///
    /// http(s) endpoints get the reqwest client, then the ureq agent. Anything
    /// else is a path read from `site_dir`.
    pub fn for_endpoint(endpoint: &str, cache_param: &str, site_dir: &Path) -> Self {
        let mut transports: Vec<Box<dyn Transport>> = Vec::new();
        if is_remote(endpoint) {
            match HttpTransport::new() {
                Ok(http) => transports.push(Box::new(http)),
                Err(e) => tracing::warn!(error = %e, "HTTP client unavailable, using agent only"),
            }
            transports.push(Box::new(AgentTransport::new()));
        } else {
            transports.push(Box::new(FileTransport::new(site_dir)));
        }
        Self::new(endpoint, cache_param, transports)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport_names(&self) -> Vec<&str> {
        self.transports.iter().map(|t| t.name()).collect()
    }

    fn attempt(&self, transport: &dyn Transport) -> Attempt {
        let url = cache_busted(&self.endpoint, &self.cache_param, unix_millis());
        tracing::debug!(transport = transport.name(), url = %url, "fetching manifest");
        let response = match transport.fetch(&url) {
            Ok(r) => r,
            Err(e) => return Attempt::Failed(e.into()),
        };
        if !response.is_success() {
            return Attempt::Failed(ManifestError::Status {
                status: response.status,
                status_text: response.status_text,
            });
        }
        match Manifest::from_json(&response.body) {
            Ok(manifest) => Attempt::Loaded(manifest),
            Err(e) => Attempt::Failed(e.into()),
        }
    }

    fn run_chain(&self) -> LoadOutcome {
        let mut failures = Vec::new();
        for transport in &self.transports {
            match self.attempt(transport.as_ref()) {
                Attempt::Loaded(manifest) => {
                    tracing::debug!(
                        transport = transport.name(),
                        categories = manifest.len(),
                        "manifest loaded"
                    );
                    return LoadOutcome {
                        manifest,
                        source: ManifestSource::Transport(transport.name().to_string()),
                        failures,
                    };
                }
                Attempt::Failed(error) => {
                    tracing::warn!(transport = transport.name(), error = %error, "manifest attempt failed");
                    failures.push(Failure {
                        transport: transport.name().to_string(),
                        error,
                    });
                }
            }
        }
        LoadOutcome {
            manifest: catalog::fallback_manifest(),
            source: ManifestSource::Fallback,
            failures,
        }
    }

    /// Load the manifest, reporting progress to `status`.
    pub fn load(&self, status: &mut dyn StatusSink) -> LoadOutcome {
        status.report(Status::Loading);
        let outcome = self.run_chain();
        match &outcome.source {
            ManifestSource::Transport(name) => status.report(Status::ManifestLoaded(name.clone())),
            ManifestSource::Fallback => {
                status.report(Status::Failed(diagnostic(&outcome.failures)));
                status.report(Status::UsingFallback);
            }
        }
        outcome
    }

    /// Fetch the manifest again and return one category.
    ///
    /// Runs the whole chain, fallback included, without status updates.
    pub fn reload_category(&self, key: &str) -> Option<Category> {
        let outcome = self.load(&mut QuietSink);
        outcome.manifest.get(key).cloned()
    }

    /// Load with log-only status reporting.
    pub fn load_logged(&self) -> LoadOutcome {
        self.load(&mut LogSink)
    }
}

struct QuietSink;

impl StatusSink for QuietSink {
    fn report(&mut self, status: Status) {
        tracing::debug!(status = %status, "reload");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Recorder;
    use crate::test_helpers::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use tempfile::TempDir;

    #[test]
    fn cache_busted_picks_separator() {
        assert_eq!(cache_busted("m.json", "t", 5), "m.json?t=5");
        assert_eq!(cache_busted("m.json?v=1", "t", 5), "m.json?v=1&t=5");
    }

    #[test]
    fn primary_success_skips_secondary() {
        let (primary, primary_log) = StaticTransport::ok("one", single_category_json());
        let (secondary, secondary_log) = StaticTransport::ok("two", single_category_json());
        let loader = ManifestLoader::new(
            "portfolio-manifest.json",
            "t",
            vec![Box::new(primary), Box::new(secondary)],
        );
        let mut rec = Recorder::default();
        let outcome = loader.load(&mut rec);

        assert_eq!(outcome.source, ManifestSource::Transport("one".into()));
        assert_eq!(primary_log.borrow().len(), 1);
        assert!(secondary_log.borrow().is_empty());
        assert_eq!(
            rec.history,
            vec![Status::Loading, Status::ManifestLoaded("one".into())]
        );
    }

    #[test]
    fn every_attempt_uses_cache_busting_url() {
        let (primary, primary_log) = StaticTransport::status("one", 500, "Internal Server Error");
        let (secondary, secondary_log) = StaticTransport::ok("two", single_category_json());
        let loader = ManifestLoader::new(
            "portfolio-manifest.json",
            "t",
            vec![Box::new(primary), Box::new(secondary)],
        );
        loader.load_logged();

        for url in primary_log.borrow().iter().chain(secondary_log.borrow().iter()) {
            let stamp = url.strip_prefix("portfolio-manifest.json?t=").unwrap();
            assert!(stamp.parse::<u128>().is_ok(), "{url}");
        }
        assert_eq!(secondary_log.borrow().len(), 1);
    }

    #[test]
    fn status_failure_falls_through_to_secondary() {
        let (primary, _) = StaticTransport::status("one", 404, "Not Found");
        let (secondary, _) = StaticTransport::ok("two", single_category_json());
        let loader = ManifestLoader::new("m.json", "t", vec![Box::new(primary), Box::new(secondary)]);
        let outcome = loader.load_logged();

        assert_eq!(outcome.source, ManifestSource::Transport("two".into()));
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].error.to_string(), "HTTP 404: Not Found");
        assert_eq!(outcome.manifest.get("embedded").unwrap().title, "T");
    }

    #[test]
    fn malformed_json_is_a_failure() {
        let (primary, _) = StaticTransport::ok("one", "{ not json");
        let loader = ManifestLoader::new("m.json", "t", vec![Box::new(primary)]);
        let outcome = loader.load_logged();
        assert!(outcome.used_fallback());
        assert!(outcome.failures[0].error.to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn both_failing_uses_catalog_and_reports_diagnostic() {
        let (primary, _) = StaticTransport::status("one", 404, "Not Found");
        let (secondary, _) = StaticTransport::network_error("two", "connection refused");
        let loader = ManifestLoader::new("m.json", "t", vec![Box::new(primary), Box::new(secondary)]);
        let mut rec = Recorder::default();
        let outcome = loader.load(&mut rec);

        assert!(outcome.used_fallback());
        let keys: Vec<&str> = outcome.manifest.keys().collect();
        assert_eq!(keys, vec!["embedded", "pcb", "gui", "testbox"]);
        assert_eq!(
            rec.history,
            vec![
                Status::Loading,
                Status::Failed(
                    "All loading methods failed. one: HTTP 404: Not Found, two: Network error: connection refused"
                        .into()
                ),
                Status::UsingFallback,
            ]
        );
    }

    #[test]
    fn empty_chain_uses_catalog() {
        let loader = ManifestLoader::new("m.json", "t", Vec::new());
        assert!(loader.load_logged().used_fallback());
    }

    #[test]
    fn reload_category_returns_one_entry() {
        let (primary, _) = StaticTransport::ok("one", single_category_json());
        let loader = ManifestLoader::new("m.json", "t", vec![Box::new(primary)]);
        let category = loader.reload_category("embedded").unwrap();
        assert_eq!(category.images.len(), 1);
        assert!(loader.reload_category("missing").is_none());
    }

    #[test]
    fn reload_category_falls_back_to_catalog() {
        let loader = ManifestLoader::new("m.json", "t", Vec::new());
        let category = loader.reload_category("gui").unwrap();
        assert_eq!(category.title, "Industrial GUI & HMI Solutions");
    }

    #[test]
    fn file_transport_reads_relative_path_ignoring_query() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("m.json"), single_category_json()).unwrap();
        let loader = ManifestLoader::for_endpoint("m.json", "t", tmp.path());
        assert_eq!(loader.transport_names(), vec!["file"]);
        let outcome = loader.load_logged();
        assert_eq!(outcome.source, ManifestSource::Transport("file".into()));
    }

    #[test]
    fn file_transport_missing_is_404() {
        let tmp = TempDir::new().unwrap();
        let transport = FileTransport::new(tmp.path());
        let response = transport.fetch("missing.json?t=1").unwrap();
        assert_eq!(response.status, 404);
    }

    #[test]
    fn remote_endpoint_gets_two_http_transports() {
        let tmp = TempDir::new().unwrap();
        let loader = ManifestLoader::for_endpoint("https://example.com/m.json", "t", tmp.path());
        assert_eq!(loader.transport_names(), vec!["http", "agent"]);
    }

    /// Serve exactly one canned HTTP response; yields the request line.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, std::thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            let request = String::from_utf8_lossy(&request).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{addr}/portfolio-manifest.json"), handle)
    }

    #[test]
    fn http_transport_fetches_over_tcp() {
        let (url, server) = serve_once("200 OK", r#"{"a":{"title":"A"}}"#);
        let transport = HttpTransport::new().unwrap();
        let response = transport.fetch(&format!("{url}?t=1")).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"a":{"title":"A"}}"#);
        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /portfolio-manifest.json?t=1 "));
    }

    #[test]
    fn agent_transport_returns_error_statuses() {
        let (url, server) = serve_once("404 Not Found", "");
        let transport = AgentTransport::new();
        let response = transport.fetch(&url).unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.status_text, "Not Found");
        server.join().unwrap();
    }

    #[test]
    fn agent_transport_unreachable_is_network_error() {
        // Bind then drop to get a port with nothing listening.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let transport = AgentTransport::new();
        let result = transport.fetch(&format!("http://127.0.0.1:{port}/m.json"));
        assert!(matches!(result, Err(TransportError::Network(_))));
    }
}
