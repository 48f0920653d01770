//! Config serialization to TOML
//!
//! Single source of truth for the config file format: `config --show` prints
//! it and the first-run template is written from it.

use super::{Config, UNBIND};
use crate::app::Action;
use crate::clip::TrimPolicy;
use crate::transform::{CommandSpec, Transform, TransformKind};

/// TOML string literal with escaping
fn quote(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

/// Key names that aren't bare TOML keys get quoted
fn toml_key(s: &str) -> String {
    let bare = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if bare {
        s.to_string()
    } else {
        quote(s)
    }
}

fn command_to_toml(command: &CommandSpec) -> String {
    match command {
        CommandSpec::Line(line) => quote(line),
        CommandSpec::Words(words) => {
            let items: Vec<String> = words.iter().map(|w| quote(w)).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

/// A transform as a `[keys]` value
pub fn transform_to_toml(transform: &Transform) -> String {
    let (field, command) = match &transform.kind {
        TransformKind::Editor => return quote("editor"),
        TransformKind::Pipe(command) => ("pipe", command),
        TransformKind::TempFile(command) => ("tempfile", command),
    };
    match transform.trim {
        TrimPolicy::Normalize => format!("{{ {} = {} }}", field, command_to_toml(command)),
        TrimPolicy::Keep => format!(
            "{{ {} = {}, trim = false }}",
            field,
            command_to_toml(command)
        ),
    }
}

fn action_to_toml(action: &Action) -> String {
    match action {
        Action::Transform(transform) => transform_to_toml(transform),
        other => quote(&other.describe()),
    }
}

impl Config {
    /// `[keys]` body: every effective binding, then explicit unbinds
    fn keys_to_toml(&self) -> String {
        let table = self.key_table();
        let mut output = String::new();
        for (key, action) in table.sorted() {
            output.push_str(&format!(
                "{} = {}\n",
                toml_key(&key.to_string()),
                action_to_toml(action)
            ));
        }
        for (key, action) in &self.keys {
            if action.is_none() && table.resolve(key).is_none() {
                output.push_str(&format!("{} = {}\n", toml_key(&key.to_string()), quote(UNBIND)));
            }
        }
        output
    }

    /// Serialize config to TOML string (single source of truth for format)
    pub fn to_toml(&self) -> String {
        let editor = match &self.editor {
            Some(editor) => format!("editor = {}", quote(editor)),
            None => "# editor = \"vim\"".to_string(),
        };
        let on_capture = match &self.on_capture {
            Some(transform) => format!("on_capture = {}", transform_to_toml(transform)),
            None => "# on_capture = { pipe = \"sed 's/[[:space:]]*$//'\" }".to_string(),
        };

        format!(
            r#"# clipz configuration

# Number of clips kept in the capture history (--buffersize)
buffer_size = {buffer_size}

# Keep leading/trailing line breaks on captured clips (--leavecrlf)
leave_crlf = {leave_crlf}

# Editor for the "editor" action (defaults to $EDITOR)
{editor}

# Milliseconds between clipboard polls
poll_interval_ms = {poll}

# Keep the capture history across restarts
persist_history = {persist}

# Transform applied to every new capture (same forms as a key binding)
{on_capture}

# Key bindings. Values are an action name (up, down, scroll_left,
# scroll_right, toggle, delete, move_up, move_down, quit, editor), "none" to
# remove a default, or a transform:
#   p = {{ pipe = "sort" }}                     # clip on stdin, stdout replaces it
#   w = {{ pipe = ["fmt -w $0", "72"] }}        # extra words become $0, $1, ...
#   t = {{ tempfile = ["my-tool", "--fix"] }}   # runs my-tool --fix <file>
# Add trim = false to keep line breaks around the result.
[keys]
{keys}
[logging]
# Filter: trace, debug, info, warn, error (RUST_LOG overrides)
level = {level}
# JSON log files, never the terminal
file_enabled = {file_enabled}
file_dir = {file_dir}
# Rotation: hourly, daily, never
file_rotation = {rotation}
file_prefix = {prefix}
"#,
            buffer_size = self.buffer_size,
            leave_crlf = self.leave_crlf,
            editor = editor,
            poll = self.poll_interval_ms,
            persist = self.persist_history,
            on_capture = on_capture,
            keys = self.keys_to_toml(),
            level = quote(&self.logging.level),
            file_enabled = self.logging.file_enabled,
            file_dir = quote(&self.logging.file_dir.display().to_string()),
            rotation = quote(self.logging.file_rotation.as_str()),
            prefix = quote(&self.logging.file_prefix),
        )
    }
}
