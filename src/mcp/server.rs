use std::{
    fmt::Display,
    io::{self, BufRead, Write},
};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::{
    service::FeatureService,
    tools::{call_tool, tool_definitions},
};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const JSONRPC_VERSION: &str = "2.0";

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    /// `None` only when the key is absent, as for notifications. An explicit `null` id
    /// is a request like any other.
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

fn present_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcResponse {
    fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcError { code, message }),
        }
    }

    fn parse_error(reason: impl Display) -> Self {
        log::warn!("Could not parse request: {}", reason);
        Self::error(Value::Null, PARSE_ERROR, format!("Parse error: {}", reason))
    }

    fn encode(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(text) => Some(text),
            Err(err) => {
                log::error!("Could not encode response: {}", err);
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

pub struct McpServer<S: FeatureService> {
    service: S,
    info: ServerInfo,
}

impl<S: FeatureService> McpServer<S> {
    pub fn new(service: S, info: ServerInfo) -> Self {
        Self { service, info }
    }

    pub fn run_stdio(&self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        self.run(stdin.lock(), io::stdout().lock())
    }

    /// Serve requests until the reader is exhausted. Each request is handled to completion
    /// before the next line is read.
    pub fn run<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> anyhow::Result<()> {
        for line in reader.split(b'\n') {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let response = match String::from_utf8(line) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(&line),
                Err(err) => JsonRpcResponse::parse_error(err).encode(),
            };
            if let Some(response) = response {
                writeln!(writer, "{}", response)?;
                writer.flush()?;
            }
        }
        log::info!("Input closed, shutting down");
        Ok(())
    }

    pub fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request)?,
            Err(err) => JsonRpcResponse::parse_error(err),
        };
        response.encode()
    }

    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = match request.id {
            Some(id) => id,
            None => {
                log::debug!("Received notification {}", request.method);
                return None;
            }
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                format!("Unsupported jsonrpc version {:?}", request.jsonrpc),
            ));
        }
        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(),
            "tools/list" => json!({ "tools": tool_definitions() }),
            "tools/call" => self.handle_tools_call(&request.params),
            "ping" => json!({}),
            method => {
                return Some(JsonRpcResponse::error(
                    id,
                    METHOD_NOT_FOUND,
                    format!("Method not found: {}", method),
                ))
            }
        };
        Some(JsonRpcResponse::result(id, result))
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": self.info.name,
                "version": self.info.version
            },
            "capabilities": {
                "tools": {}
            }
        })
    }

    fn handle_tools_call(&self, params: &Value) -> Value {
        let name = params.get("name").and_then(Value::as_str).unwrap_or("");
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
        let response = call_tool(&self.service, name, &arguments);
        json!({
            "content": [{
                "type": "text",
                "text": response.to_text()
            }],
            "isError": !response.success
        })
    }
}
