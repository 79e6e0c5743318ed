//! Minimal HTTP/1.1 stub standing in for the inference API.
//!
//! The stub accepts a single connection, captures the request and either answers with a
//! canned response or keeps the connection open without answering, reporting when the
//! client closes it.

use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use url::Url;

pub enum StubReply {
    Respond { status: &'static str, body: String },
    Hang,
}

#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub struct StubServer {
    addr: SocketAddr,
    pub requests: Receiver<CapturedRequest>,
    pub closed: Receiver<()>,
}

impl StubServer {
    pub fn spawn(reply: StubReply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Should bind a local port");
        let addr = listener.local_addr().expect("Should have a local address");
        let (requests_tx, requests) = mpsc::channel();
        let (closed_tx, closed) = mpsc::channel();

        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let Some(request) = read_request(&mut stream) else {
                return;
            };
            let _ = requests_tx.send(request);

            match reply {
                StubReply::Respond { status, body } => {
                    let response = format!(
                        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes());
                    let _ = stream.flush();
                }
                StubReply::Hang => {
                    if wait_for_close(&mut stream) {
                        let _ = closed_tx.send(());
                    }
                }
            }
        });

        Self {
            addr,
            requests,
            closed,
        }
    }

    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/v2/", self.addr)).expect("Should be a valid url")
    }
}

fn read_request(stream: &mut TcpStream) -> Option<CapturedRequest> {
    stream.set_read_timeout(Some(Duration::from_secs(10))).ok()?;

    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(key, _)| key == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            return None;
        }
        body.extend_from_slice(&chunk[..read]);
    }

    Some(CapturedRequest {
        request_line,
        headers,
        body,
    })
}

/// Blocks until the peer closes the connection. Returns false if it never does.
fn wait_for_close(stream: &mut TcpStream) -> bool {
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => return true,
            Ok(_) => continue,
            Err(e) if matches!(e.kind(), ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted) => {
                return true;
            }
            Err(_) => return false,
        }
    }
}
