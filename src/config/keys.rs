//! The `[keys]` table and `on_capture`
//!
//! A binding is either an action name (`"toggle"`, `"editor"`, `"none"`) or
//! an inline table describing a transform:
//!
//! ```toml
//! [keys]
//! p = { pipe = "sort", trim = true }
//! w = { pipe = ["fmt -w $0", "72"] }
//! t = { tempfile = ["my-tool", "--in-place"] }
//! x = "none"
//! ```

use crate::app::{Action, KeyChord};
use crate::clip::TrimPolicy;
use crate::transform::{CommandSpec, Transform};
use anyhow::{anyhow, bail, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Name that removes a binding
pub const UNBIND: &str = "none";

/// One binding as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BindingSpec {
    Name(String),
    Pipe {
        pipe: CommandSpec,
        #[serde(default = "default_trim")]
        trim: bool,
    },
    TempFile {
        tempfile: CommandSpec,
        #[serde(default = "default_trim")]
        trim: bool,
    },
}

fn default_trim() -> bool {
    true
}

impl BindingSpec {
    /// Resolve to an action; `Ok(None)` means "unbind"
    pub fn to_action(&self) -> Result<Option<Action>> {
        match self {
            BindingSpec::Name(name) if name == UNBIND => Ok(None),
            BindingSpec::Name(name) => Action::from_name(name)
                .map(Some)
                .ok_or_else(|| anyhow!("unknown action '{}'", name)),
            BindingSpec::Pipe { pipe, trim } => Ok(Some(Action::Transform(Transform::pipe(
                pipe.clone(),
                TrimPolicy::from_bool(*trim),
            )))),
            BindingSpec::TempFile { tempfile, trim } => Ok(Some(Action::Transform(
                Transform::temp_file(tempfile.clone(), TrimPolicy::from_bool(*trim)),
            ))),
        }
    }

    /// Resolve to a transform (for `on_capture`)
    pub fn to_transform(&self) -> Result<Transform> {
        match self.to_action()? {
            Some(Action::Transform(transform)) => Ok(transform),
            _ => bail!("on_capture must be a transform (editor, pipe or tempfile)"),
        }
    }
}

/// Parse the `[keys]` table
///
/// Bad entries are skipped and reported in the returned warnings; the rest
/// still apply.
pub fn parse_bindings(
    table: &BTreeMap<String, BindingSpec>,
) -> (Vec<(KeyChord, Option<Action>)>, Vec<String>) {
    let mut bindings = Vec::with_capacity(table.len());
    let mut warnings = Vec::new();

    for (name, spec) in table {
        let Some(key) = KeyChord::parse(name) else {
            warnings.push(format!("[keys] unknown key '{}'", name));
            continue;
        };
        match spec.to_action() {
            Ok(action) => bindings.push((key, action)),
            Err(e) => warnings.push(format!("[keys] {}: {}", name, e)),
        }
    }
    (bindings, warnings)
}
