//! Named-function dispatch over the search pipeline.
//!
//! A fixed catalog of operations with declared parameter schemas; `invoke`
//! validates and defaults an incoming parameter map, routes to the
//! orchestrator, and always answers with an envelope. Nothing escapes this
//! boundary as a raw fault.

use crate::tool::SearchTool;
use chrono::Utc;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use webscout_core::{Config, Envelope, Result, SearchBackend, TimeRange};

#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParamSpec>,
    pub returns: &'static str,
}

fn query_param() -> ParamSpec {
    ParamSpec {
        name: "query",
        kind: "string",
        description: "search keywords",
        required: true,
        default: None,
    }
}

fn num_results_param(default: u64) -> ParamSpec {
    ParamSpec {
        name: "num_results",
        kind: "integer",
        description: "number of results to return",
        required: false,
        default: Some(serde_json::json!(default)),
    }
}

/// The operation catalog. Names and parameter schemas are part of the
/// external contract; built once, read-only thereafter.
pub fn catalog() -> &'static [OperationSpec] {
    static CATALOG: OnceLock<Vec<OperationSpec>> = OnceLock::new();
    CATALOG
        .get_or_init(|| {
            vec![
                OperationSpec {
                    name: "search_web",
                    description: "general web search",
                    parameters: vec![
                        query_param(),
                        num_results_param(10),
                        ParamSpec {
                            name: "time_range",
                            kind: "string",
                            description: "recency window: day, week, month or year",
                            required: false,
                            default: Some(serde_json::json!("day")),
                        },
                    ],
                    returns: "success/error envelope with enriched results",
                },
                OperationSpec {
                    name: "search_news",
                    description: "latest news search",
                    parameters: vec![query_param(), num_results_param(5)],
                    returns: "success/error envelope, news-shaped",
                },
                OperationSpec {
                    name: "search_tech",
                    description: "technical content search",
                    parameters: vec![query_param(), num_results_param(5)],
                    returns: "success/error envelope, tech-shaped",
                },
                OperationSpec {
                    name: "get_tool_info",
                    description: "tool name, version and function list",
                    parameters: vec![],
                    returns: "envelope-shaped tool descriptor",
                },
            ]
        })
        .as_slice()
}

pub struct Dispatcher {
    config: Arc<Config>,
    tool: SearchTool,
}

impl Dispatcher {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let tool = SearchTool::new(config.clone())?;
        Ok(Self { config, tool })
    }

    /// Dispatcher over an injected backend (the real-engine seam).
    pub fn with_backend(config: Config, backend: Arc<dyn SearchBackend>) -> Result<Self> {
        let config = Arc::new(config);
        let tool = SearchTool::with_backend(config.clone(), backend)?;
        Ok(Self { config, tool })
    }

    /// Invoke an operation by name with a parameter map.
    ///
    /// Always answers with an envelope: unknown names, parameter faults and
    /// pipeline faults all come back as `status: "error"`.
    pub async fn invoke(&self, name: &str, params: &serde_json::Value) -> serde_json::Value {
        tracing::info!(operation = name, "dispatching");

        let Some(op) = catalog().iter().find(|o| o.name == name) else {
            return Envelope::error(query_of(params), format!("unknown operation: {name}"))
                .to_value();
        };

        let resolved = match resolve_params(op, params) {
            Ok(map) => map,
            Err(message) => {
                tracing::warn!(operation = name, "parameter fault: {message}");
                return Envelope::error(query_of(params), message).to_value();
            }
        };

        let query = resolved
            .get("query")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let num_results = resolved
            .get("num_results")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize);

        match op.name {
            "search_web" => {
                let range = match resolved.get("time_range").and_then(|v| v.as_str()) {
                    Some(s) => match TimeRange::parse(s) {
                        Some(t) => Some(t),
                        None => {
                            return Envelope::error(query, format!("invalid time_range: {s}"))
                                .to_value()
                        }
                    },
                    None => None,
                };
                self.tool.search_web(&query, num_results, range).await.to_value()
            }
            "search_news" => self.tool.search_news(&query, num_results).await.to_value(),
            "search_tech" => self.tool.search_tech(&query, num_results).await.to_value(),
            // The catalog gate above admits only registered names.
            _ => self.tool_info(),
        }
    }

    /// `invoke` for callers that hand over serialized parameters.
    /// Malformed JSON never raises past this boundary.
    pub async fn invoke_raw(&self, name: &str, params: &str) -> serde_json::Value {
        let trimmed = params.trim();
        let parsed: serde_json::Value = if trimmed.is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            match serde_json::from_str(trimmed) {
                Ok(v) => v,
                Err(e) => {
                    return Envelope::error(
                        "",
                        format!("invalid parameter syntax: parameters must be valid JSON ({e})"),
                    )
                    .to_value()
                }
            }
        };
        self.invoke(name, &parsed).await
    }

    /// Stable tool descriptor; repeated calls return identical
    /// name/version/function values.
    pub fn tool_info(&self) -> serde_json::Value {
        let functions: Vec<String> = catalog()
            .iter()
            .map(|o| format!("{} - {}", o.name, o.description))
            .collect();
        serde_json::json!({
            "status": "success",
            "name": "webscout",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "query-driven web search and content extraction tool",
            "author": "webscout contributors",
            "functions": functions,
            "timestamp": Utc::now(),
        })
    }

    /// One real probe through the full pipeline, reported as
    /// healthy/unhealthy. A failing probe is captured, never raised.
    pub async fn health(&self) -> serde_json::Value {
        let probe = self.tool.search_web("test", Some(1), None).await;
        let config_valid = self.config.validate();
        match probe {
            Envelope::Success { .. } => serde_json::json!({
                "status": "healthy",
                "timestamp": Utc::now(),
                "functions": {
                    "search_web": true,
                    "search_news": true,
                    "search_tech": true,
                    "get_tool_info": true,
                },
                "config_valid": config_valid,
            }),
            Envelope::Error { message, .. } => serde_json::json!({
                "status": "unhealthy",
                "timestamp": Utc::now(),
                "error": message,
                "functions": {
                    // news/tech share the probed pipeline; the info accessor
                    // is pure and stays available.
                    "search_web": false,
                    "search_news": false,
                    "search_tech": false,
                    "get_tool_info": true,
                },
                "config_valid": config_valid,
            }),
        }
    }
}

fn query_of(params: &serde_json::Value) -> String {
    params
        .get("query")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Overlay provided parameters onto declared defaults, then validate.
/// Undeclared extras are ignored, as the reference integration did.
fn resolve_params(
    op: &OperationSpec,
    params: &serde_json::Value,
) -> std::result::Result<serde_json::Map<String, serde_json::Value>, String> {
    let provided = match params {
        serde_json::Value::Null => serde_json::Map::new(),
        serde_json::Value::Object(m) => m.clone(),
        _ => return Err("parameters must be a JSON object".to_string()),
    };

    let mut resolved = serde_json::Map::new();
    for p in &op.parameters {
        let value = provided.get(p.name).filter(|v| !v.is_null()).cloned();
        match value {
            Some(v) => {
                match p.kind {
                    "string" if !v.is_string() => {
                        return Err(format!("parameter '{}' must be a string", p.name));
                    }
                    "integer" if v.as_u64().is_none() => {
                        return Err(format!(
                            "parameter '{}' must be a non-negative integer",
                            p.name
                        ));
                    }
                    _ => {}
                }
                if p.required {
                    if let Some(s) = v.as_str() {
                        if s.trim().is_empty() {
                            return Err(format!(
                                "required parameter '{}' must not be empty",
                                p.name
                            ));
                        }
                    }
                }
                resolved.insert(p.name.to_string(), v);
            }
            None if p.required => {
                return Err(format!("missing required parameter: {}", p.name));
            }
            None => {
                if let Some(d) = &p.default {
                    resolved.insert(p.name.to_string(), d.clone());
                }
            }
        }
    }
    Ok(resolved)
}
