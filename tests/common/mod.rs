//! Common test utilities shared by the recipe-scout integration tests.
//!
//! - `fixtures`: in-memory images and canned responses
//! - `fake_service`: a scripted `RecommendationService`
//! - `http_stub`: a one-shot HTTP responder on a local port

#![allow(dead_code)]

/// Image and response fixtures generated in memory.
pub mod fixtures {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use recipe_scout::recipes::RecommendResponse;
    use serde_json::json;

    /// Encode a gradient test pattern.
    pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 251) as u8, (y % 241) as u8, ((x + y) % 199) as u8])
        });
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), format)
            .expect("encode fixture image");
        buf
    }

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        encoded_image(width, height, ImageFormat::Png)
    }

    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        encoded_image(width, height, ImageFormat::Jpeg)
    }

    /// Three recipes in server order with coverage 0.4, 0.9 and 0.2.
    pub fn response_json() -> serde_json::Value {
        json!({
            "ingredients": ["tomato", "egg", "basil"],
            "detectedIngredients": ["Tomato", "egg"],
            "manualIngredients": ["basil"],
            "fallback": false,
            "recipes": [
                {
                    "id": 1,
                    "title": "Tomato Salad",
                    "coverageScore": 0.4,
                    "usedIngredients": ["tomato"],
                    "missedIngredients": ["cucumber", "feta", "olive"],
                    "steps": ["Slice.", "Dress."]
                },
                {
                    "id": 2,
                    "title": "Shakshuka",
                    "coverageScore": 0.9,
                    "usedIngredients": [
                        {"name": "tomato", "quantity": "4"},
                        {"name": "egg", "quantity": "3"}
                    ],
                    "missedIngredients": [],
                    "prepTime": 10,
                    "cookTime": 20,
                    "servings": 2,
                    "difficulty": "Easy"
                },
                {
                    "id": "3",
                    "title": "Pesto Pasta",
                    "coverageScore": 0.2,
                    "usedIngredientCount": 5,
                    "usedIngredients": ["basil"],
                    "missedIngredients": ["pasta", "pine nuts"]
                }
            ]
        })
    }

    pub fn response() -> RecommendResponse {
        serde_json::from_value(response_json()).expect("fixture response parses")
    }
}

/// Scripted stand-in for the recommendation service.
pub mod fake_service {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use recipe_scout::client::{RecommendRequest, RecommendationService};
    use recipe_scout::error::{ScoutError, ScoutResult};
    use recipe_scout::recipes::RecommendResponse;
    use recipe_scout::session::BusyFlag;

    #[derive(Debug, Clone)]
    pub enum Reply {
        Ok(RecommendResponse),
        Http(u16, String),
        Unreachable,
    }

    /// What the fake saw on each call.
    #[derive(Debug, Clone)]
    pub struct Call {
        pub request: RecommendRequest,
        pub busy_during_call: Option<bool>,
    }

    #[derive(Clone)]
    pub struct FakeService {
        reply: Reply,
        calls: Arc<Mutex<Vec<Call>>>,
        busy_probe: Arc<Mutex<Option<BusyFlag>>>,
    }

    impl FakeService {
        pub fn replying(reply: Reply) -> Self {
            Self {
                reply,
                calls: Arc::new(Mutex::new(Vec::new())),
                busy_probe: Arc::new(Mutex::new(None)),
            }
        }

        pub fn ok(response: RecommendResponse) -> Self {
            Self::replying(Reply::Ok(response))
        }

        /// Record the state of `flag` whenever a request arrives.
        pub fn watch_busy(&self, flag: BusyFlag) {
            *self.busy_probe.lock().unwrap() = Some(flag);
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RecommendationService for FakeService {
        async fn recommend(&self, request: RecommendRequest) -> ScoutResult<RecommendResponse> {
            let busy_during_call = self
                .busy_probe
                .lock()
                .unwrap()
                .as_ref()
                .map(BusyFlag::is_busy);
            self.calls.lock().unwrap().push(Call {
                request,
                busy_during_call,
            });

            match &self.reply {
                Reply::Ok(response) => Ok(response.clone()),
                Reply::Http(status, detail) => Err(ScoutError::service(Some(*status), detail.clone())),
                Reply::Unreachable => Err(ScoutError::transport("http://10.0.0.1:9", false, None)),
            }
        }
    }
}

/// Minimal HTTP/1.1 responder for exercising the reqwest client.
pub mod http_stub {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// A request as the stub received it.
    #[derive(Debug, Clone)]
    pub struct CapturedRequest {
        pub head: String,
        pub body: Vec<u8>,
    }

    impl CapturedRequest {
        pub fn request_line(&self) -> &str {
            self.head.lines().next().unwrap_or_default()
        }

        pub fn header(&self, name: &str) -> Option<String> {
            self.head.lines().skip(1).find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.trim()
                    .eq_ignore_ascii_case(name)
                    .then(|| value.trim().to_string())
            })
        }

        pub fn body_text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }

    /// Answer exactly one request with `status` and `body`, then close.
    ///
    /// Returns the base URL to point the client at and a handle resolving to
    /// the captured request.
    pub async fn serve_once(
        status: u16,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub address");
        let body = body.into();
        let content_type = content_type.to_string();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let captured = read_request(&mut socket).await;

            let reason = reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("");
            let head = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                reason,
                content_type,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.expect("write head");
            socket.write_all(&body).await.expect("write body");
            socket.shutdown().await.ok();
            captured
        });

        (format!("http://{}", addr), handle)
    }

    /// A base URL nothing is listening on.
    pub async fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("address");
        drop(listener);
        format!("http://{}", addr)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.expect("read request");
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
        let lower = head.to_ascii_lowercase();
        let content_length = lower.lines().find_map(|line| {
            line.strip_prefix("content-length:")
                .and_then(|v| v.trim().parse::<usize>().ok())
        });
        let chunked = lower.contains("transfer-encoding: chunked");

        let mut raw_body = buf[header_end..].to_vec();
        loop {
            let done = match content_length {
                Some(len) => raw_body.len() >= len,
                None if chunked => find(&raw_body, b"0\r\n\r\n").is_some(),
                None => true,
            };
            if done {
                break;
            }
            let n = socket.read(&mut chunk).await.expect("read body");
            if n == 0 {
                break;
            }
            raw_body.extend_from_slice(&chunk[..n]);
        }

        let body = if chunked { dechunk(&raw_body) } else { raw_body };
        CapturedRequest { head, body }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn dechunk(mut raw: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(line_end) = find(raw, b"\r\n") {
            let size_text = String::from_utf8_lossy(&raw[..line_end]);
            let size = usize::from_str_radix(size_text.trim(), 16).unwrap_or(0);
            if size == 0 {
                break;
            }
            let start = line_end + 2;
            out.extend_from_slice(&raw[start..start + size]);
            raw = &raw[start + size + 2..];
        }
        out
    }
}
