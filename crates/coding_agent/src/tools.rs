use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ArgumentError;

pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const EDIT_FILE: &str = "edit_file";
pub const RUN_SHELL: &str = "run_shell";

/// Risk label used when a shell call carries no `safety` argument.
pub const DEFAULT_SAFETY: &str = "modify";
const NO_DESCRIPTION: &str = "(no description)";

/// One decoded tool call, keyed by tool name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Read {
        path: String,
    },
    Write {
        path: String,
        content: String,
    },
    Edit {
        path: String,
        old_string: String,
        new_string: String,
        replace_all: bool,
    },
    Shell {
        command: String,
        description: Option<String>,
        safety: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    UnknownTool(String),
    Arguments(ArgumentError),
}

#[derive(Deserialize)]
struct ReadArgs {
    path: String,
}

#[derive(Deserialize)]
struct WriteArgs {
    path: String,
    content: String,
}

#[derive(Deserialize)]
struct EditArgs {
    path: String,
    old_string: String,
    new_string: String,
    #[serde(default)]
    replace_all: Option<bool>,
}

#[derive(Deserialize)]
struct ShellArgs {
    command: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    safety: Option<String>,
}

impl Action {
    /// Decodes the raw JSON argument text of a call to `name`.
    pub fn decode(name: &str, arguments: &str) -> Result<Self, DecodeError> {
        let action = match name {
            READ_FILE => {
                let args: ReadArgs = parse_arguments(name, arguments)?;
                Self::Read { path: args.path }
            }
            WRITE_FILE => {
                let args: WriteArgs = parse_arguments(name, arguments)?;
                Self::Write {
                    path: args.path,
                    content: args.content,
                }
            }
            EDIT_FILE => {
                let args: EditArgs = parse_arguments(name, arguments)?;
                Self::Edit {
                    path: args.path,
                    old_string: args.old_string,
                    new_string: args.new_string,
                    replace_all: args.replace_all.unwrap_or(false),
                }
            }
            RUN_SHELL => {
                let args: ShellArgs = parse_arguments(name, arguments)?;
                Self::Shell {
                    command: args.command,
                    description: non_blank(args.description),
                    safety: non_blank(args.safety),
                }
            }
            unknown => return Err(DecodeError::UnknownTool(unknown.to_string())),
        };
        Ok(action)
    }

    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::Read { .. } => READ_FILE,
            Self::Write { .. } => WRITE_FILE,
            Self::Edit { .. } => EDIT_FILE,
            Self::Shell { .. } => RUN_SHELL,
        }
    }

    /// Reads run immediately; everything else waits for confirmation.
    pub fn is_gated(&self) -> bool {
        !matches!(self, Self::Read { .. })
    }

    /// Advisory risk label. Display only; gating does not depend on it.
    pub fn risk_label(&self) -> &str {
        match self {
            Self::Read { .. } => "read-only",
            Self::Shell { safety, .. } => safety.as_deref().unwrap_or(DEFAULT_SAFETY),
            Self::Write { .. } | Self::Edit { .. } => DEFAULT_SAFETY,
        }
    }

    /// One-line summary shown in the status line.
    pub fn describe(&self) -> String {
        match self {
            Self::Read { path } => format!("Read('{path}')"),
            Self::Write { path, content } => {
                format!("Write('{path}', {} lines)", count_lines(content))
            }
            Self::Edit { path, .. } => format!("Edit('{path}')"),
            Self::Shell {
                command,
                description,
                ..
            } => format!(
                "Bash('{command}') # {}, {}",
                description.as_deref().unwrap_or(NO_DESCRIPTION),
                self.risk_label()
            ),
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: &str) -> Result<T, DecodeError> {
    let raw = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };
    serde_json::from_str(raw)
        .map_err(|error| DecodeError::Arguments(ArgumentError::new(tool, error.to_string())))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Lines as counted for display: separators plus one.
pub fn count_lines(content: &str) -> usize {
    content.split('\n').count()
}

/// Result of one executed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub ok: bool,
    /// Short label shown to the user in the resolved status line.
    pub status: String,
    /// Text returned to the model as the tool result.
    pub result: String,
}

impl ActionOutcome {
    pub fn ok(status: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            ok: true,
            status: status.into(),
            result: result.into(),
        }
    }

    /// Failure where the user and the model see the same reason.
    pub fn fail(reason: impl AsRef<str>) -> Self {
        let text = format!("fail: {}", reason.as_ref());
        Self {
            ok: false,
            status: text.clone(),
            result: text,
        }
    }
}

/// Performs one already-approved action.
pub trait ActionExecutor {
    fn execute(&mut self, action: &Action) -> ActionOutcome;
}

/// Executes actions against the local filesystem and `sh`.
///
/// Relative paths resolve against `root`; no sandboxing is applied.
#[derive(Debug, Clone)]
pub struct BuiltinActionExecutor {
    root: PathBuf,
}

impl BuiltinActionExecutor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    fn execute_read(&self, path: &str) -> ActionOutcome {
        match fs::read(self.resolve(path)) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes).into_owned();
                ActionOutcome::ok(format!("{} lines", count_lines(&content)), content)
            }
            Err(error) => ActionOutcome::fail(error.to_string()),
        }
    }

    fn execute_write(&self, path: &str, content: &str) -> ActionOutcome {
        let resolved = self.resolve(path);
        if let Some(parent) = resolved.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                return ActionOutcome::fail(error.to_string());
            }
        }

        match fs::write(&resolved, content) {
            Ok(()) => ActionOutcome::ok("written", "ok"),
            Err(error) => ActionOutcome::fail(error.to_string()),
        }
    }

    fn execute_edit(
        &self,
        path: &str,
        old_string: &str,
        new_string: &str,
        replace_all: bool,
    ) -> ActionOutcome {
        if old_string.is_empty() {
            return ActionOutcome::fail("old_string must not be empty");
        }

        let resolved = self.resolve(path);
        let current = match fs::read(&resolved) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => content,
                Err(_) => return ActionOutcome::fail("file is not valid UTF-8"),
            },
            Err(error) => return ActionOutcome::fail(error.to_string()),
        };

        let occurrences = current.matches(old_string).count();
        if occurrences == 0 {
            return ActionOutcome::fail("string not found");
        }
        if occurrences > 1 && !replace_all {
            return ActionOutcome::fail(format!("{occurrences} matches (use replace_all)"));
        }

        let updated = if replace_all {
            current.replace(old_string, new_string)
        } else {
            current.replacen(old_string, new_string, 1)
        };
        if let Err(error) = fs::write(&resolved, updated) {
            return ActionOutcome::fail(error.to_string());
        }

        ActionOutcome::ok("ok", format!("replaced {occurrences} occurrence(s)"))
    }

    fn execute_shell(&self, command: &str) -> ActionOutcome {
        let started = Instant::now();
        let output = Command::new("sh")
            .arg("-c")
            .arg(merged_streams_script(command))
            .current_dir(&self.root)
            .output();
        let elapsed = started.elapsed().as_secs_f64();

        match output {
            Ok(output) => {
                // stdout already carries both streams in write order; stderr only
                // holds what `sh` itself reports, such as a parse error.
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                let ok = output.status.success();
                let label = if ok { "ok" } else { "fail" };
                ActionOutcome {
                    ok,
                    status: format!("{label} ({elapsed:.1}s)"),
                    result: combined,
                }
            }
            Err(error) => ActionOutcome {
                ok: false,
                status: format!("fail ({elapsed:.1}s)"),
                result: format!("fail: could not start shell: {error}"),
            },
        }
    }
}

/// Wraps `command` so its stdout and stderr share one pipe, in write order.
fn merged_streams_script(command: &str) -> String {
    format!("{{ {command}\n}} 2>&1")
}

impl ActionExecutor for BuiltinActionExecutor {
    fn execute(&mut self, action: &Action) -> ActionOutcome {
        match action {
            Action::Read { path } => self.execute_read(path),
            Action::Write { path, content } => self.execute_write(path, content),
            Action::Edit {
                path,
                old_string,
                new_string,
                replace_all,
            } => self.execute_edit(path, old_string, new_string, *replace_all),
            Action::Shell { command, .. } => self.execute_shell(command),
        }
    }
}
