//! System prompt and tool schema loading.

use std::fs;
use std::path::Path;

use agent_provider::ToolDefinition;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a coding agent working in the user's current directory.
Use the provided tools to inspect and change files and to run shell commands.
Every write, edit and shell command is shown to the user and needs their approval; \
a declined action means the user wants something different, so ask or adjust.
Give each run_shell call a short description and a safety label \
(read-only, modify or destructive).
Keep answers brief and report what you changed.";

#[derive(Debug, Deserialize)]
struct ToolEntry {
    #[serde(rename = "type")]
    kind: String,
    function: FunctionEntry,
}

#[derive(Debug, Deserialize)]
struct FunctionEntry {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "empty_object")]
    parameters: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Loads the system prompt from `path`, or the built-in prompt when unset.
pub fn load_system_prompt(path: Option<&Path>) -> Result<String, ConfigError> {
    let Some(path) = path else {
        return Ok(DEFAULT_SYSTEM_PROMPT.to_string());
    };

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::SystemPromptUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(DEFAULT_SYSTEM_PROMPT.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Loads the static tool declarations advertised with every request.
///
/// The file holds a JSON array of `{"type": "function", "function": {..}}`
/// entries. Loaded once at startup and never mutated.
pub fn load_tool_definitions(path: &Path) -> Result<Vec<ToolDefinition>, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ToolsUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tool_definitions(&raw).map_err(|reason| ConfigError::ToolsInvalid {
        path: path.to_path_buf(),
        reason,
    })
}

pub fn parse_tool_definitions(raw: &str) -> Result<Vec<ToolDefinition>, String> {
    let entries: Vec<ToolEntry> = serde_json::from_str(raw).map_err(|error| error.to_string())?;
    if entries.is_empty() {
        return Err("no tools declared".to_string());
    }

    let mut definitions = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.kind != "function" {
            return Err(format!(
                "tool '{}' has unsupported type '{}'",
                entry.function.name, entry.kind
            ));
        }
        let name = entry.function.name.trim();
        if name.is_empty() {
            return Err("tool name must not be empty".to_string());
        }
        if definitions
            .iter()
            .any(|existing: &ToolDefinition| existing.name == name)
        {
            return Err(format!("tool '{name}' is declared more than once"));
        }

        definitions.push(ToolDefinition {
            name: name.to_string(),
            description: entry.function.description,
            parameters: entry.function.parameters,
        });
    }

    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn parses_function_entries_in_order() {
        let raw = json!([
            {"type": "function", "function": {"name": "read_file", "description": "Read", "parameters": {"type": "object"}}},
            {"type": "function", "function": {"name": "run_shell"}}
        ])
        .to_string();

        let tools = parse_tool_definitions(&raw).expect("tools");
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "read_file");
        assert_eq!(tools[0].description.as_deref(), Some("Read"));
        assert_eq!(tools[1].parameters, json!({}));
    }

    #[test]
    fn rejects_duplicates_and_empty_lists() {
        let duplicate = json!([
            {"type": "function", "function": {"name": "a"}},
            {"type": "function", "function": {"name": "a"}}
        ])
        .to_string();
        assert!(parse_tool_definitions(&duplicate)
            .expect_err("duplicate")
            .contains("more than once"));
        assert!(parse_tool_definitions("[]").is_err());
        assert!(parse_tool_definitions("{not json").is_err());
    }

    #[test]
    fn missing_tools_file_is_a_config_error() {
        let error = load_tool_definitions(Path::new("/nonexistent/tools.json"))
            .expect_err("missing file");
        assert!(matches!(error, ConfigError::ToolsUnreadable { .. }));
    }

    #[test]
    fn system_prompt_falls_back_to_default() {
        assert_eq!(
            load_system_prompt(None).expect("default"),
            DEFAULT_SYSTEM_PROMPT
        );

        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "  custom prompt").expect("write prompt");
        assert_eq!(
            load_system_prompt(Some(file.path())).expect("custom"),
            "custom prompt"
        );
    }

    #[test]
    fn repository_tool_schema_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../tools.json");
        let tools = load_tool_definitions(&path).expect("repository tools.json");
        let names: Vec<&str> = tools.iter().map(|tool| tool.name.as_str()).collect();
        assert_eq!(names, vec!["read_file", "write_file", "edit_file", "run_shell"]);
    }
}
