use std::{error::Error, fmt};
use tracing::debug;

/// Anything that can turn a source identifier into text.
pub trait Fetch {
    fn fetch(&self, source: &str) -> Result<String, FetchError>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> Result<String, FetchError>,
{
    fn fetch(&self, source: &str) -> Result<String, FetchError> {
        self(source)
    }
}

#[derive(Debug)]
pub enum FetchError {
    /// The request never produced a response.
    Transport(minreq::Error),
    /// Anything but `200 OK`.
    Status { code: i32, reason: String },
    /// A 3xx answer; redirects are not followed.
    Redirect,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "request failed: {e}"),
            FetchError::Status { code, reason } => {
                write!(f, "unexpected status: {code} {reason}")
            }
            FetchError::Redirect => write!(f, "redirected, redirects are not followed"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Transport(e) => Some(e),
            FetchError::Status { .. } | FetchError::Redirect => None,
        }
    }
}

/// Single blocking GET. Only a direct `200` counts, redirects fail.
///
/// The body is decoded as UTF-8, invalid sequences become `U+FFFD`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl Fetch for HttpFetcher {
    fn fetch(&self, source: &str) -> Result<String, FetchError> {
        let response = minreq::get(source)
            .with_max_redirects(0)
            .send()
            .map_err(|e| match e {
                minreq::Error::TooManyRedirections
                | minreq::Error::InfiniteRedirectionLoop
                | minreq::Error::RedirectLocationMissing => FetchError::Redirect,
                e => FetchError::Transport(e),
            })?;
        debug!(
            "GET {} -> {} ({} bytes)",
            source,
            response.status_code,
            response.as_bytes().len()
        );
        if response.status_code != 200 {
            return Err(FetchError::Status {
                code: response.status_code,
                reason: response.reason_phrase,
            });
        }
        Ok(String::from_utf8_lossy(response.as_bytes()).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread::{self, JoinHandle},
    };

    #[test]
    fn closures_are_fetchers() {
        let fetcher = |source: &str| Ok::<_, FetchError>(format!("text of {source}"));
        assert_eq!(fetcher.fetch("a").unwrap(), "text of a");
    }

    #[test]
    fn status_error_display() {
        let err = FetchError::Status {
            code: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "unexpected status: 404 Not Found");
        assert!(err.source().is_none());
    }

    /// Answers one request on a local port with `response`.
    fn serve_once(response: Vec<u8>) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(&response);
        });
        (format!("http://{addr}/book.txt"), handle)
    }

    fn http(status: &str, headers: &str, body: &[u8]) -> Vec<u8> {
        let mut response = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n{headers}\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);
        response
    }

    #[test]
    fn ok_returns_body() {
        let (url, server) = serve_once(http("200 OK", "", b"The cat sat."));
        assert_eq!(HttpFetcher.fetch(&url).unwrap(), "The cat sat.");
        server.join().unwrap();
    }

    #[test]
    fn not_found_is_status_error() {
        let (url, server) = serve_once(http("404 Not Found", "", b"nope"));
        match HttpFetcher.fetch(&url) {
            Err(FetchError::Status { code, reason }) => {
                assert_eq!(code, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        server.join().unwrap();
    }

    #[test]
    fn redirect_is_not_followed() {
        let (url, server) = serve_once(http("302 Found", "Location: /elsewhere\r\n", b""));
        let err = HttpFetcher.fetch(&url).unwrap_err();
        assert!(
            matches!(err, FetchError::Redirect | FetchError::Status { code: 302, .. }),
            "{err:?}"
        );
        server.join().unwrap();
    }

    #[test]
    fn latin1_body_is_decoded_lossily() {
        let (url, server) = serve_once(http("200 OK", "", b"caf\xe9 cafe"));
        let text = HttpFetcher.fetch(&url).unwrap();
        assert_eq!(text, "caf\u{fffd} cafe");
        server.join().unwrap();
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = HttpFetcher.fetch(&format!("http://127.0.0.1:{port}/")).unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
        assert!(err.source().is_some());
    }
}
