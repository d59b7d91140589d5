// tests/common/http_stub.rs

//! One-shot HTTP server on a local port, for exercising the reqwest clients.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Raw request as received by the stub.
#[derive(Debug)]
pub struct CapturedRequest {
  pub head: String,
  pub body: Vec<u8>,
}

impl CapturedRequest {
  pub fn request_line(&self) -> &str {
    self.head.lines().next().unwrap_or_default()
  }

  /// Case-insensitive header lookup.
  pub fn header(&self, name: &str) -> Option<&str> {
    self.head.lines().skip(1).find_map(|line| {
      let (key, value) = line.split_once(':')?;
      key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
    })
  }

  pub fn body_text(&self) -> String {
    String::from_utf8_lossy(&self.body).into_owned()
  }
}

pub struct HttpStub {
  pub base_url: String,
  handle: JoinHandle<CapturedRequest>,
}

impl HttpStub {
  /// Answers exactly one request with `status` and `body`, then closes the connection.
  pub async fn respond_once(status: u16, body: &str) -> Self {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let body = body.to_string();

    let handle = tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let request = read_request(&mut socket).await;
      let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
      );
      socket.write_all(response.as_bytes()).await.unwrap();
      socket.shutdown().await.ok();
      request
    });

    Self { base_url, handle }
  }

  /// The request the stub received. Call after the client call has returned.
  pub async fn request(self) -> CapturedRequest {
    self.handle.await.unwrap()
  }
}

async fn read_request(socket: &mut TcpStream) -> CapturedRequest {
  let mut buf = Vec::new();
  let mut chunk = [0u8; 4096];

  let head_end = loop {
    if let Some(pos) = find(&buf, b"\r\n\r\n") {
      break pos + 4;
    }
    let n = socket.read(&mut chunk).await.unwrap();
    assert!(n > 0, "connection closed before the request head was complete");
    buf.extend_from_slice(&chunk[..n]);
  };

  let mut captured = CapturedRequest {
    head: String::from_utf8_lossy(&buf[..head_end]).into_owned(),
    body: buf[head_end..].to_vec(),
  };
  let content_length = captured
    .header("content-length")
    .and_then(|value| value.parse::<usize>().ok());
  let chunked = captured
    .header("transfer-encoding")
    .is_some_and(|value| value.eq_ignore_ascii_case("chunked"));

  loop {
    let complete = match content_length {
      Some(len) => captured.body.len() >= len,
      None if chunked => captured.body.ends_with(b"0\r\n\r\n"),
      None => true,
    };
    if complete {
      break;
    }
    let n = socket.read(&mut chunk).await.unwrap();
    if n == 0 {
      break;
    }
    captured.body.extend_from_slice(&chunk[..n]);
  }
  captured
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
  haystack.windows(needle.len()).position(|window| window == needle)
}
