//! Input parsing for Claude Code hook JSON format
//!
//! Parses the JSON input from stdin that Claude Code sends to hooks and
//! routes it to an inspection surface by tool name.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::engine::InspectionRequest;

/// Main input structure from Claude Code hooks
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawHookInput")]
pub struct HookInput {
    /// Name of the tool being invoked (e.g., "Write", "WebFetch", "Bash")
    pub tool_name: String,

    /// Tool-specific input parameters
    pub tool_input: ToolInput,

    /// Optional session identifier
    pub session_id: Option<String>,

    /// Hook event name (e.g., "PreToolUse")
    pub hook_event_name: Option<String>,
}

#[derive(Deserialize)]
struct RawHookInput {
    tool_name: String,
    #[serde(default)]
    tool_input: Value,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    hook_event_name: Option<String>,
}

impl From<RawHookInput> for HookInput {
    fn from(raw: RawHookInput) -> Self {
        let tool_input = ToolInput::from_tool(&raw.tool_name, raw.tool_input);
        HookInput {
            tool_name: raw.tool_name,
            tool_input,
            session_id: raw.session_id,
            hook_event_name: raw.hook_event_name,
        }
    }
}

/// Tool-specific input variants
#[derive(Debug, Clone)]
pub enum ToolInput {
    /// Write, Edit or MultiEdit: the text about to land in a file
    ContentWrite { file_path: String, content: String },

    /// WebSearch query
    WebSearch { query: String },

    /// WebFetch URL
    WebFetch { url: String },

    /// Bash command execution
    Bash { command: String },

    /// Unknown tool - pass through
    Unknown { raw: Value },
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(String::from)
}

impl ToolInput {
    /// Build the variant for `tool_name`; missing fields become empty strings
    pub fn from_tool(tool_name: &str, value: Value) -> Self {
        let Some(obj) = value.as_object() else {
            return ToolInput::Unknown { raw: value };
        };

        match tool_name {
            "Write" | "Edit" => ToolInput::ContentWrite {
                file_path: str_field(obj, "file_path").unwrap_or_default(),
                // Edit carries new_string, Write carries content
                content: str_field(obj, "new_string")
                    .or_else(|| str_field(obj, "content"))
                    .unwrap_or_default(),
            },
            "MultiEdit" => {
                let content = obj
                    .get("edits")
                    .and_then(|v| v.as_array())
                    .map(|edits| {
                        edits
                            .iter()
                            .filter_map(|e| e.get("new_string").and_then(|v| v.as_str()))
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                    .unwrap_or_default();
                ToolInput::ContentWrite {
                    file_path: str_field(obj, "file_path").unwrap_or_default(),
                    content,
                }
            }
            "WebSearch" => ToolInput::WebSearch {
                query: str_field(obj, "query").unwrap_or_default(),
            },
            "WebFetch" => ToolInput::WebFetch {
                url: str_field(obj, "url").unwrap_or_default(),
            },
            "Bash" => ToolInput::Bash {
                command: str_field(obj, "command").unwrap_or_default(),
            },
            _ => ToolInput::Unknown { raw: value },
        }
    }
}

impl HookInput {
    /// Parse input from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The inspection this input asks for; `None` when there is nothing to inspect
    pub fn to_request(&self) -> Option<InspectionRequest> {
        let request = match &self.tool_input {
            ToolInput::ContentWrite { file_path, content } => InspectionRequest::ContentWrite {
                content: content.clone(),
                file_path: (!file_path.is_empty()).then(|| file_path.clone()),
            },
            ToolInput::WebSearch { query } => InspectionRequest::Search {
                query: query.clone(),
            },
            ToolInput::WebFetch { url } => InspectionRequest::Fetch { url: url.clone() },
            ToolInput::Bash { command } => InspectionRequest::ShellCommand {
                command: command.clone(),
            },
            ToolInput::Unknown { .. } => return None,
        };

        if request.text().is_empty() {
            return None;
        }
        Some(request)
    }

    /// Hook event name to echo back in the response
    pub fn event_name(&self) -> &str {
        self.hook_event_name.as_deref().unwrap_or("PreToolUse")
    }

    /// Get a summary of the input for logging
    pub fn summary(&self) -> String {
        match &self.tool_input {
            ToolInput::Bash { command } => {
                format!("Bash: {}", crate::engine::common::excerpt(command, 100))
            }
            ToolInput::ContentWrite { file_path, content } => {
                format!("{}: {} ({} bytes)", self.tool_name, file_path, content.len())
            }
            ToolInput::WebSearch { query } => {
                format!("WebSearch: {}", crate::engine::common::excerpt(query, 100))
            }
            ToolInput::WebFetch { url } => {
                format!("WebFetch: {}", crate::engine::common::excerpt(url, 100))
            }
            ToolInput::Unknown { .. } => format!("Unknown tool: {}", self.tool_name),
        }
    }
}
