use serde_json::{json, Value};
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Method, Request, Response, Server};

/// A request as seen by the fake server
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub body: String,
}

#[derive(Default)]
struct State {
    notes: Vec<Value>,
    next_id: usize,
    fail_status: Option<u16>,
    requests: Vec<RecordedRequest>,
}

/// In-process notes API on an ephemeral localhost port
///
/// Speaks the same JSON as the real service: listings come back as
/// `{ "notes": [...], "totalPages": n }`.
#[allow(dead_code)]
pub struct FakeNotesServer {
    pub base_url: String,
    server: Arc<Server>,
    state: Arc<Mutex<State>>,
    handle: Option<JoinHandle<()>>,
}

#[allow(dead_code)]
impl FakeNotesServer {
    pub fn start() -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("Failed to bind fake server"));
        let addr = server
            .server_addr()
            .to_ip()
            .expect("Fake server should listen on TCP");
        let state = Arc::new(Mutex::new(State::default()));

        let handle = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    handle_request(request, &state);
                }
            })
        };

        Self {
            base_url: format!("http://{}", addr),
            server,
            state,
            handle: Some(handle),
        }
    }

    /// Seed notes titled "Note 1".."Note N"
    pub fn with_notes(self, count: usize) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for _ in 0..count {
                state.next_id += 1;
                let id = state.next_id;
                let note = make_note(id, &format!("Note {id}"), "", "Todo");
                state.notes.push(note);
            }
        }
        self
    }

    /// Answer every following request with `status`
    pub fn fail_with(&self, status: u16) {
        self.state.lock().unwrap().fail_status = Some(status);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn note_count(&self) -> usize {
        self.state.lock().unwrap().notes.len()
    }
}

impl Drop for FakeNotesServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn make_note(id: usize, title: &str, content: &str, tag: &str) -> Value {
    json!({
        "id": format!("srv-{id}"),
        "title": title,
        "content": content,
        "tag": tag,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
    })
}

fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.replace('+', " ").replace("%20", " "))
    })
}

fn handle_request(mut request: Request, state: &Mutex<State>) {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let method = request.method().clone();
    let url = request.url().to_string();

    let (status, payload) = {
        let mut state = state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.clone(),
            body: body.clone(),
        });
        match state.fail_status {
            Some(status) => (status, json!({ "message": "upstream unavailable" })),
            None => route(&mut state, &method, &url, &body),
        }
    };

    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
    let response = Response::from_string(payload.to_string())
        .with_status_code(status)
        .with_header(header);
    let _ = request.respond(response);
}

fn route(state: &mut State, method: &Method, url: &str, body: &str) -> (u16, Value) {
    let path = url.split('?').next().unwrap_or("");
    let id = path.strip_prefix("/notes/");

    match (method, path, id) {
        (Method::Get, "/notes", _) => {
            let page: usize = query_param(url, "page").and_then(|p| p.parse().ok()).unwrap_or(1);
            let per_page: usize = query_param(url, "perPage")
                .and_then(|p| p.parse().ok())
                .unwrap_or(12);
            let search = query_param(url, "search").unwrap_or_default().to_lowercase();
            let matching: Vec<&Value> = state
                .notes
                .iter()
                .filter(|n| {
                    n["title"].as_str().unwrap_or("").to_lowercase().contains(&search)
                })
                .collect();
            let total_pages = matching.len().div_ceil(per_page).max(1);
            let data: Vec<&Value> = matching
                .into_iter()
                .skip((page - 1) * per_page)
                .take(per_page)
                .collect();
            (200, json!({ "notes": data, "totalPages": total_pages }))
        }
        (Method::Post, "/notes", _) => {
            let draft: Value = serde_json::from_str(body).unwrap_or(Value::Null);
            state.next_id += 1;
            let note = make_note(
                state.next_id,
                draft["title"].as_str().unwrap_or(""),
                draft["content"].as_str().unwrap_or(""),
                draft["tag"].as_str().unwrap_or("Todo"),
            );
            state.notes.push(note.clone());
            (201, note)
        }
        (Method::Patch, _, Some(id)) => {
            let draft: Value = serde_json::from_str(body).unwrap_or(Value::Null);
            match state.notes.iter_mut().find(|n| n["id"] == id) {
                Some(note) => {
                    for field in ["title", "content", "tag"] {
                        note[field] = draft[field].clone();
                    }
                    note["updatedAt"] = json!("2024-01-02T00:00:00Z");
                    (200, note.clone())
                }
                None => (404, json!({ "message": "Note not found" })),
            }
        }
        (Method::Delete, _, Some(id)) => match state.notes.iter().position(|n| n["id"] == id) {
            Some(index) => (200, state.notes.remove(index)),
            None => (404, json!({ "message": "Note not found" })),
        },
        _ => (404, json!({ "message": "Route not found" })),
    }
}
