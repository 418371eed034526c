//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed table of paths. Unknown paths get 404 with a small body so
//! tests can check that error pages never reach disk.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub enum Route {
    /// 200 OK with this body.
    Ok(Vec<u8>),
    /// Arbitrary status line (e.g. "500 Internal Server Error") with a text body.
    Status(&'static str),
    /// 301 to a path on this server or to an absolute URL.
    Redirect(&'static str),
    /// 200 OK advertising `declared` bytes but sending only `body`, then closing.
    Truncated { declared: usize, body: Vec<u8> },
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: HashMap<String, Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/");

    let (status, extra, body): (&str, String, Vec<u8>) = match routes.get(path) {
        Some(Route::Ok(body)) => ("200 OK", String::new(), body.clone()),
        Some(Route::Truncated { declared, body }) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                declared
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
            return;
        }
        Some(Route::Status(status)) => (*status, String::new(), status.as_bytes().to_vec()),
        Some(Route::Redirect(to)) => (
            "301 Moved Permanently",
            format!("Location: {}\r\n", to),
            Vec::new(),
        ),
        None => ("404 Not Found", String::new(), b"no such file".to_vec()),
    };
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n",
        status,
        body.len(),
        extra
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}
