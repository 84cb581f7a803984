// src/verify/probe.rs
// =============================================================================
// One network probe of one URL.
//
// Key functionality:
// - Makes an HTTP HEAD request (lightweight, no body download)
// - Falls back to GET when the server refuses HEAD (405 / 501)
// - Follows redirects up to a configured number of hops and reports the
//   final URL reached
// - Maps every transport error into an explicit Failure value, tagged as
//   transient (worth retrying) or terminal
//
// The Prober trait is the seam between the engine and the network: the
// retry loop and the scheduler only ever see `Result<String, Failure>`.
// =============================================================================

use reqwest::{Client, Response, StatusCode};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::io;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::CheckError;

/// Why a single probe failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The attempt did not finish within the per-attempt timeout
    Timeout,
    /// The peer reset the connection
    ConnectionReset,
    /// The connection was aborted locally
    ConnectionAborted,
    /// Some other socket-level hiccup (broken pipe, early EOF, ...)
    Socket(String),
    /// Host name could not be resolved
    Dns,
    /// TLS handshake or certificate problem
    Tls,
    /// The server answered with an error status (4xx / 5xx)
    HttpStatus(u16),
    /// The URL could not be parsed or uses an unsupported scheme
    InvalidUrl,
    /// Redirect chain longer than the configured hop limit
    TooManyRedirects,
    /// Nothing is listening on the target port
    ConnectionRefused,
    /// Anything we could not recognize
    Other(String),
}

impl Failure {
    /// Transient failures are plausibly fixed by trying again.
    ///
    /// Anything the server actively said (an error status) and anything we
    /// don't recognize is terminal.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Failure::Timeout
                | Failure::ConnectionReset
                | Failure::ConnectionAborted
                | Failure::Socket(_)
        )
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Timeout => write!(f, "timeout"),
            Failure::ConnectionReset => write!(f, "connection reset"),
            Failure::ConnectionAborted => write!(f, "connection aborted"),
            Failure::Socket(detail) => write!(f, "socket error: {detail}"),
            Failure::Dns => write!(f, "dns resolution failed"),
            Failure::Tls => write!(f, "tls handshake failed"),
            Failure::HttpStatus(code) => write!(f, "http status {code}"),
            Failure::InvalidUrl => write!(f, "invalid url"),
            Failure::TooManyRedirects => write!(f, "too many redirects"),
            Failure::ConnectionRefused => write!(f, "connection refused"),
            Failure::Other(detail) => write!(f, "{detail}"),
        }
    }
}

/// Checks whether a URL is reachable.
///
/// On success returns the final URL after following redirects. When no
/// redirect happened this must be the input string unchanged.
pub trait Prober: Send + Sync {
    fn probe(&self, url: &str) -> impl Future<Output = Result<String, Failure>> + Send;
}

/// Settings for the reqwest-backed prober.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub timeout: Duration,
    pub max_redirect_hops: usize,
    pub user_agent: String,
}

/// Probes URLs over real HTTP(S).
///
/// Holds one reqwest client so connections are pooled across the run.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(settings: &ProbeSettings) -> Result<Self, CheckError> {
        // Policy::limited(0) would turn the first redirect into an error;
        // with zero hops we want the 3xx itself so its Location can be reported.
        let redirect = if settings.max_redirect_hops == 0 {
            reqwest::redirect::Policy::none()
        } else {
            reqwest::redirect::Policy::limited(settings.max_redirect_hops)
        };

        let client = Client::builder()
            .timeout(settings.timeout)
            .redirect(redirect)
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            timeout: settings.timeout,
        })
    }

    async fn head_then_get(&self, url: &str) -> Result<Response, reqwest::Error> {
        let response = self.client.head(url).send().await?;

        if matches!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
        ) {
            debug!(url, status = response.status().as_u16(), "HEAD refused, retrying with GET");
            return self.client.get(url).send().await;
        }

        Ok(response)
    }
}

impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> Result<String, Failure> {
        // The whole HEAD(+GET) exchange shares one deadline. If it fires the
        // in-flight request future is dropped and its response never read.
        let response = match tokio::time::timeout(self.timeout, self.head_then_get(url)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(classify_transport_error(&e)),
            Err(_) => return Err(Failure::Timeout),
        };

        analyze_response(url, &response)
    }
}

// Turns an HTTP response into the final URL, or an error status.
//
// HTTP status codes:
// - 200-299: Success
// - 300-399: Success; only seen here when redirects were not followed,
//            in which case the Location header is the final URL
// - 400-599: Terminal failure
fn analyze_response(checked_url: &str, response: &Response) -> Result<String, Failure> {
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        return Err(Failure::HttpStatus(status.as_u16()));
    }

    let reached = if status.is_redirection() {
        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|location| response.url().join(location).ok())
            .unwrap_or_else(|| response.url().clone())
    } else {
        response.url().clone()
    };

    Ok(final_url(checked_url, &reached))
}

// reqwest normalizes URLs ("http://a.test" becomes "http://a.test/"), so
// compare parsed forms and hand back the caller's spelling when they match.
fn final_url(checked_url: &str, reached: &Url) -> String {
    match Url::parse(checked_url) {
        Ok(checked) if &checked == reached => checked_url.to_string(),
        _ => reached.to_string(),
    }
}

/// Maps any reqwest error into a [`Failure`].
///
/// Order matters: reqwest's own flags first, then the io::ErrorKind found
/// anywhere in the source chain, then DNS / TLS markers in the messages.
///
/// Markers are only searched in the causes below the reqwest error. Its own
/// message embeds the request URL, and the URL text must never decide the
/// failure kind.
pub fn classify_transport_error(err: &reqwest::Error) -> Failure {
    if err.is_timeout() {
        return Failure::Timeout;
    }
    if err.is_redirect() {
        return Failure::TooManyRedirects;
    }
    if err.is_builder() {
        return Failure::InvalidUrl;
    }
    if let Some(status) = err.status() {
        return Failure::HttpStatus(status.as_u16());
    }

    let url_text = err.url().map(|u| u.as_str().to_lowercase());
    let mut messages = Vec::new();
    let mut current = err.source();

    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if let Some(failure) = classify_io_kind(io_err) {
                return failure;
            }
        }
        messages.push(cause_message(e, url_text.as_deref()));
        current = e.source();
    }

    let chain = messages.join(": ");
    classify_message(&chain).unwrap_or_else(|| {
        if err.is_connect() {
            Failure::Other(format!("connection failed: {err}"))
        } else {
            Failure::Other(err.to_string())
        }
    })
}

// Lowercased message of one cause, with any copy of the request URL removed
fn cause_message(cause: &(dyn StdError + 'static), url_text: Option<&str>) -> String {
    let message = cause.to_string().to_lowercase();
    match url_text {
        Some(url) if !url.is_empty() => message.replace(url, ""),
        _ => message,
    }
}

fn classify_io_kind(err: &io::Error) -> Option<Failure> {
    match err.kind() {
        io::ErrorKind::TimedOut => Some(Failure::Timeout),
        io::ErrorKind::ConnectionReset => Some(Failure::ConnectionReset),
        io::ErrorKind::ConnectionAborted => Some(Failure::ConnectionAborted),
        io::ErrorKind::ConnectionRefused => Some(Failure::ConnectionRefused),
        io::ErrorKind::BrokenPipe | io::ErrorKind::UnexpectedEof => {
            Some(Failure::Socket(err.to_string()))
        }
        _ => None,
    }
}

fn classify_message(chain: &str) -> Option<Failure> {
    if chain.contains("dns error") || chain.contains("failed to lookup address") {
        Some(Failure::Dns)
    } else if chain.contains("certificate")
        || chain.contains("tls")
        || chain.contains("ssl")
        || chain.contains("handshake")
    {
        Some(Failure::Tls)
    } else if chain.contains("connection reset") {
        Some(Failure::ConnectionReset)
    } else if chain.contains("connection closed before message completed")
        || chain.contains("incomplete message")
    {
        Some(Failure::Socket("connection closed mid-response".to_string()))
    } else {
        None
    }
}
