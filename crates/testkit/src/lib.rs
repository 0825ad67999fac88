//! Local HTTP fakes shared by the RustedReact test suites.
//!
//! A [`FakeServer`] binds an ephemeral port on `127.0.0.1`, records every
//! request it receives and answers through a responder closure. Each
//! response closes the connection.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as seen by the fake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Request-line target: path plus query.
    pub target: String,
    pub user_agent: String,
    pub body: String,
}

/// `target prefix -> (status, body)`
pub type Routes = HashMap<String, (u16, String)>;

pub struct FakeServer {
    url: String,
    received: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeServer {
    /// Answer every request with `respond`.
    pub async fn start<F>(respond: F) -> Self
    where
        F: FnMut(&RecordedRequest) -> (u16, String) + Send + 'static,
    {
        Self::start_with(|_| respond).await
    }

    /// Like [`start`](Self::start), but the responder is built from the
    /// server's own URL, so replies can point back at it.
    pub async fn start_with<B, F>(build: B) -> Self
    where
        B: FnOnce(&str) -> F,
        F: FnMut(&RecordedRequest) -> (u16, String) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let mut respond = build(&url);
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = received.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = read_request(&mut socket).await;
                let (status, body) = respond(&request);
                log.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        Self { url, received }
    }

    /// The same reply for every request.
    pub async fn canned(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::start(move |_| (status, body.clone())).await
    }

    /// Route by the longest matching target prefix; anything else is a 404.
    pub async fn routed_with(build: impl FnOnce(&str) -> Routes) -> Self {
        Self::start_with(|url| {
            let routes = build(url);
            move |request: &RecordedRequest| route(&routes, &request.target)
        })
        .await
    }

    /// Replies in order; the last one repeats.
    pub async fn scripted_with(build: impl FnOnce(&str) -> Vec<(u16, String)>) -> Self {
        Self::start_with(|url| {
            let mut replies: VecDeque<(u16, String)> = build(url).into();
            move |_: &RecordedRequest| {
                if replies.len() > 1 {
                    replies.pop_front().unwrap()
                } else {
                    replies.front().cloned().unwrap_or((500, "{}".into()))
                }
            }
        })
        .await
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Requests answered so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.received.lock().unwrap().clone()
    }
}

fn route(routes: &Routes, target: &str) -> (u16, String) {
    routes
        .iter()
        .filter(|(prefix, _)| target.starts_with(prefix.as_str()))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, reply)| reply.clone())
        .unwrap_or((404, "not found".into()))
}

/// Read one request: the head, then `content-length` bytes of body.
async fn read_request(socket: &mut TcpStream) -> RecordedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = header(&text[..head_end], "content-length")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }

    let text = String::from_utf8_lossy(&buf).into_owned();
    let (head, body) = text.split_once("\r\n\r\n").unwrap_or((text.as_str(), ""));
    RecordedRequest {
        target: head
            .lines()
            .next()
            .and_then(|l| l.split_whitespace().nth(1))
            .unwrap_or("/")
            .to_string(),
        user_agent: header(head, "user-agent").unwrap_or_default(),
        body: body.to_string(),
    }
}

fn header(head: &str, name: &str) -> Option<String> {
    head.lines().find_map(|l| {
        let (k, v) = l.split_once(':')?;
        k.trim().eq_ignore_ascii_case(name).then(|| v.trim().to_string())
    })
}

/// A URL on a port with nothing listening.
pub async fn closed_port_url() -> String {
    let port = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    format!("http://127.0.0.1:{port}")
}
