use std::net::TcpStream;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket, connect};

use crate::error::{Result, ToolError};
use crate::model::MemberRecord;

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// JavaScript evaluated in the target page to pull the member rows out of
/// the DOM. Selectors follow the team settings member list markup.
const MEMBER_ROWS_EXPRESSION: &str = r#"
Array.from(document.querySelectorAll(".flex.w-full.cursor-pointer")).map((element) => {
  const nameElement = element.querySelector('[class*="w-[150px]"] [class*="truncate"]');
  const emailElement = element.querySelector('[class*="w-[240px]"] span');
  const lastUsedElement = element.querySelector('[class*="w-[200px]"]');
  const roleElement = element.querySelector('[class*="text-brand-gray-600"]');
  return {
    name: (nameElement && (nameElement.getAttribute("title") || nameElement.textContent.trim())) || "No name",
    email: (emailElement && emailElement.textContent.trim()) || "",
    lastUsed: (lastUsedElement && lastUsedElement.getAttribute("title")) || "-",
    role: (roleElement && roleElement.textContent.trim()) || "Unknown",
  };
})
"#;

/// One open page reported by the remote-debugging endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub ws_url: Option<String>,
}

/// Client for the Chromium remote-debugging HTTP endpoint.
pub struct DevtoolsClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl DevtoolsClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Lists the pages currently open in the attached browser.
    pub fn pages(&self) -> Result<Vec<PageInfo>> {
        let url = format!("{}/json", self.endpoint);
        let pages = self.http.get(&url).send()?.error_for_status()?.json()?;
        Ok(pages)
    }

    /// Finds the first open page whose URL contains `fragment`. The page
    /// must already be open; the monitor never navigates.
    pub fn find_page(&self, fragment: &str) -> Result<PageInfo> {
        let pages = self.pages()?;
        debug!(count = pages.len(), "listed open pages");
        pages
            .into_iter()
            .find(|page| page.url.contains(fragment))
            .ok_or_else(|| ToolError::PageNotFound(fragment.to_string()))
    }
}

/// A DevTools protocol session over one page's WebSocket debugger URL.
pub struct PageSession {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
    next_id: u64,
}

impl PageSession {
    /// Connects to the debugger socket of the given page.
    pub fn connect(page: &PageInfo) -> Result<Self> {
        let ws_url = page.ws_url.as_deref().ok_or_else(|| {
            ToolError::Devtools(format!("page '{}' exposes no debugger URL", page.url))
        })?;
        let (socket, _response) =
            connect(ws_url).map_err(|error| ToolError::Devtools(error.to_string()))?;
        info!(url = %page.url, "attached to page");
        Ok(Self { socket, next_id: 0 })
    }

    /// Evaluates a JavaScript expression in the page and returns its result
    /// by value.
    pub fn evaluate(&mut self, expression: &str) -> Result<Value> {
        self.next_id += 1;
        let id = self.next_id;
        let request = json!({
            "id": id,
            "method": "Runtime.evaluate",
            "params": { "expression": expression, "returnByValue": true },
        });
        self.socket
            .send(Message::Text(request.to_string()))
            .map_err(|error| ToolError::Devtools(error.to_string()))?;

        loop {
            let message = self
                .socket
                .read()
                .map_err(|error| ToolError::Devtools(error.to_string()))?;
            let text = match message {
                Message::Text(text) => text,
                // Protocol events and pings arrive interleaved with replies.
                _ => continue,
            };
            let reply: Value = serde_json::from_str(&text)?;
            if reply.get("id").and_then(Value::as_u64) != Some(id) {
                continue;
            }
            if let Some(error) = reply.get("error") {
                return Err(ToolError::Devtools(error.to_string()));
            }
            return Ok(reply
                .pointer("/result/result/value")
                .cloned()
                .unwrap_or(Value::Null));
        }
    }

    /// Extracts the member rows from the page DOM.
    pub fn fetch_members(&mut self) -> Result<Vec<MemberRecord>> {
        let value = self.evaluate(MEMBER_ROWS_EXPRESSION)?;
        let members: Vec<MemberRecord> = serde_json::from_value(value)?;
        Ok(members)
    }
}
