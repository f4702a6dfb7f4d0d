use std::time::Duration;

use anyhow::Context;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; pubscan/0.1; +https://parflow.org)";

/// Largest response body read; bigger pages fail like a transport error.
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// What a single GET produced: the status line and the decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// The one network capability the pipeline needs.
///
/// An `Err` is a transport-level failure (connection, TLS, timeout, undecodable body). Any
/// status the server answered with, including 4xx and 5xx, comes back as `Ok`.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<Response>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str) -> anyhow::Result<Response> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP fetcher backed by a shared `ureq` agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let cfg = ureq::Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(10).min(timeout)))
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        HttpFetcher {
            agent: ureq::Agent::new_with_config(cfg),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<Response> {
        let res = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .with_context(|| format!("failed request for URL {url}"))?;
        let status = res.status().as_u16();
        let body = res
            .into_body()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .with_context(|| format!("failed to read body of {url}"))?;
        tracing::trace!(url, status, bytes = body.len(), "fetched");
        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead, BufReader, Write},
        net::TcpListener,
        thread,
    };

    use super::*;

    /// Serve one response with a body of `len` bytes on a local port.
    fn serve_once(status: u16, len: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = stream;
            let head = format!(
                "HTTP/1.1 {status} Whatever\r\nContent-Type: text/html\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n"
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&vec![b'x'; len]);
            let _ = stream.flush();
        });
        format!("http://{addr}/page")
    }

    #[test]
    fn reads_pages_past_the_client_default_limit() {
        let len = 12 * 1024 * 1024;
        let url = serve_once(200, len);
        let res = HttpFetcher::new(Duration::from_secs(30)).fetch(&url).unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(res.body.len(), len);
    }

    #[test]
    fn error_statuses_are_not_transport_errors() {
        let url = serve_once(403, 4);
        let res = HttpFetcher::new(Duration::from_secs(30)).fetch(&url).unwrap();
        assert_eq!(res.status, 403);
        assert_eq!(res.body, "xxxx");
    }
}
