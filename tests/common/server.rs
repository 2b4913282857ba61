//! Minimal HTTP/1.1 server standing in for the remote issue tracker.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Canned reply: status code and JSON body.
pub type Reply = (u16, String);

pub struct FakeServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeServer {
    /// Serve every request with `route(request_target)` until the test exits.
    pub fn start<F>(route: F) -> Self
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base_url = format!("http://{}", listener.local_addr().expect("addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        let route = Arc::new(route);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let log = Arc::clone(&log);
                let route = Arc::clone(&route);
                thread::spawn(move || handle(stream, &*route, &log));
            }
        });

        Self { base_url, requests }
    }

    /// Request targets (path and query) seen so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock").clone()
    }
}

fn handle(mut stream: TcpStream, route: &dyn Fn(&str) -> Reply, log: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream.try_clone().expect("clone"));
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => break,
            Ok(_) if header == "\r\n" => break,
            Ok(_) => {}
        }
    }

    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();
    log.lock().expect("lock").push(target.clone());

    let (status, body) = route(&target);
    let response = format!(
        "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// A search page body with `keys` as issues.
pub fn search_page(keys: &[&str], max_results: usize, total: usize) -> String {
    let issues: Vec<serde_json::Value> = keys
        .iter()
        .map(|key| {
            serde_json::json!({
                "id": "1",
                "key": key,
                "fields": {
                    "summary": format!("Summary of {key}"),
                    "status": {
                        "name": "In Progress",
                        "statusCategory": {"key": "indeterminate", "name": "In Progress"}
                    },
                    "assignee": null,
                    "project": {"key": "OPS", "name": "Operations"},
                    "updated": "2024-03-01T10:20:30.000+0100"
                }
            })
        })
        .collect();
    serde_json::json!({
        "startAt": 0,
        "maxResults": max_results,
        "total": total,
        "issues": issues
    })
    .to_string()
}

/// Value of query parameter `name` in a request target.
pub fn query_param<'a>(target: &'a str, name: &str) -> Option<&'a str> {
    target.split_once('?')?.1.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}
