//! Request interception boundary
//!
//! A port delivers one event per network request to a registered handler
//! and hands the handler's answer straight back; the handler must answer
//! synchronously. [`JsonLinesPort`] speaks line-delimited JSON: one request
//! object per input line, one blocking response per output line.

use std::io::{BufRead, Write};
use std::sync::Arc;

use rf_core::RequestType;
use serde_json::Value;

use crate::error::ServiceError;
use crate::interceptor::{BlockingResponse, Request, NO_TAB};

/// Type assumed for a request whose `type` is missing or not a string.
/// It goes through the matcher and is voided when blocked.
const UNTYPED_REQUEST: RequestType = RequestType::XmlHttpRequest;

/// Synchronous per-request callback.
pub trait RequestHandler: Send + Sync {
    fn on_before_request(&self, request: &Request) -> BlockingResponse;
}

/// Source of intercepted requests.
pub trait InterceptionPort {
    /// Register the handler that decides on every request.
    fn register(&mut self, handler: Arc<dyn RequestHandler>);

    /// Deliver requests until the source is exhausted.
    fn run(&mut self) -> Result<(), ServiceError>;
}

pub struct JsonLinesPort<R, W> {
    reader: R,
    writer: W,
    handler: Option<Arc<dyn RequestHandler>>,
}

impl<R: BufRead, W: Write> JsonLinesPort<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            handler: None,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> InterceptionPort for JsonLinesPort<R, W> {
    fn register(&mut self, handler: Arc<dyn RequestHandler>) {
        self.handler = Some(handler);
    }

    fn run(&mut self) -> Result<(), ServiceError> {
        let handler = self
            .handler
            .clone()
            .ok_or_else(|| ServiceError::Config("no request handler registered".to_string()))?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            // Answer every line so responses stay aligned with requests.
            let response = match read_request(trimmed) {
                Some(request) => handler.on_before_request(&request),
                None => {
                    log::warn!("Cancelling request without a url: {}", trimmed);
                    BlockingResponse::cancel()
                }
            };

            serde_json::to_writer(&mut self.writer, &response)?;
            self.writer.write_all(b"\n")?;
            self.writer.flush()?;
        }

        Ok(())
    }
}

/// Parse one request line. Fields that do not fit the request shape fall
/// back (`type` to [`UNTYPED_REQUEST`], `tabId` to [`NO_TAB`]); only a line
/// without a string `url` yields nothing.
fn read_request(line: &str) -> Option<Request> {
    let err = match serde_json::from_str::<Request>(line) {
        Ok(request) => return Some(request),
        Err(e) => e,
    };

    let value: Value = serde_json::from_str(line).ok()?;
    let url = value.get("url")?.as_str()?;
    log::warn!("Malformed request event for {}: {}", url, err);

    let request_type = value
        .get("type")
        .and_then(Value::as_str)
        .map_or(UNTYPED_REQUEST, RequestType::from_str);
    let tab_id = value
        .get("tabId")
        .and_then(Value::as_i64)
        .and_then(|id| i32::try_from(id).ok())
        .unwrap_or(NO_TAB);

    Some(Request::new(url, request_type, tab_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct VoidScripts;

    impl RequestHandler for VoidScripts {
        fn on_before_request(&self, request: &Request) -> BlockingResponse {
            if matches!(request.request_type, RequestType::Script | RequestType::XmlHttpRequest) {
                BlockingResponse {
                    cancel: None,
                    redirect_url: Some("about://blank".to_string()),
                }
            } else {
                BlockingResponse {
                    cancel: Some(false),
                    redirect_url: None,
                }
            }
        }
    }

    fn run(input: &str) -> String {
        let mut port = JsonLinesPort::new(Cursor::new(input.to_string()), Vec::new());
        port.register(Arc::new(VoidScripts));
        port.run().unwrap();
        String::from_utf8(port.into_writer()).unwrap()
    }

    #[test]
    fn test_one_response_per_request() {
        let output = run(concat!(
            r#"{"url": "https://a.com/x.js", "type": "script", "tabId": 1}"#,
            "\n",
            r#"{"url": "https://a.com/x.png", "type": "image", "tabId": 1}"#,
            "\n",
        ));
        assert_eq!(output, "{\"redirectUrl\":\"about://blank\"}\n{\"cancel\":false}\n");
    }

    #[test]
    fn test_blank_lines_are_skipped_and_garbage_is_cancelled() {
        let output = run("\n   \nnot json\n{\"type\": \"script\"}\n{\"url\": 7}\n");
        assert_eq!(output, "{\"cancel\":true}\n{\"cancel\":true}\n{\"cancel\":true}\n");
    }

    #[test]
    fn test_odd_fields_still_reach_the_handler() {
        let output = run(concat!(
            r#"{"url": "https://graph.facebook.com/x.js", "type": "script", "tabId": null}"#,
            "\n",
            r#"{"url": "https://graph.facebook.com/x.js", "type": "script", "tabId": 99999999999}"#,
            "\n",
            r#"{"url": "https://graph.facebook.com/x.js"}"#,
            "\n",
        ));
        let blank = "{\"redirectUrl\":\"about://blank\"}\n";
        assert_eq!(output, blank.repeat(3));
    }

    #[test]
    fn test_read_request_fallbacks() {
        let request = read_request(r#"{"url": "https://a.com/", "type": null, "tabId": 1.5}"#).unwrap();
        assert_eq!(request, Request::new("https://a.com/", UNTYPED_REQUEST, NO_TAB));

        let request = read_request(r#"{"url": "https://a.com/", "type": "font", "tabId": "3"}"#).unwrap();
        assert_eq!(request, Request::new("https://a.com/", RequestType::Other, NO_TAB));

        assert_eq!(read_request("[1, 2]"), None);
    }

    #[test]
    fn test_run_without_handler_fails() {
        let mut port = JsonLinesPort::new(Cursor::new(String::new()), Vec::new());
        assert!(matches!(port.run(), Err(ServiceError::Config(_))));
    }
}
