//! Minimal HTTP/1.1 server answering every request with one canned response.
//!
//! Counts requests so tests can assert how many fetches a run performed.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with `status` and `body`.
    Respond { status: u16, body: Vec<u8> },
    /// Read the request and never answer (until the connection is dropped).
    Hang,
}

impl Reply {
    pub fn json(body: &serde_json::Value) -> Self {
        Reply::Respond {
            status: 200,
            body: serde_json::to_vec(body).unwrap(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Reply::Respond {
            status,
            body: body.as_bytes().to_vec(),
        }
    }
}

pub struct JsonServer {
    url: String,
    hits: Arc<AtomicUsize>,
}

impl JsonServer {
    /// Base URL with trailing slash, e.g. `http://127.0.0.1:12345/`.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(reply: Reply) -> JsonServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let reply = reply.clone();
            let counter = Arc::clone(&counter);
            thread::spawn(move || handle(stream, &reply, &counter));
        }
    });
    JsonServer {
        url: format!("http://127.0.0.1:{port}/"),
        hits,
    }
}

fn handle(mut stream: TcpStream, reply: &Reply, hits: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    hits.fetch_add(1, Ordering::SeqCst);

    match reply {
        Reply::Hang => thread::sleep(Duration::from_secs(5)),
        Reply::Respond { status, body } => {
            let head = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                reason(*status),
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
            let _ = stream.flush();
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// A loopback URL nothing is listening on.
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}
