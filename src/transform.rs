//! External transform actions
//!
//! A transform hands the selected clip to another program and takes back
//! rewritten text:
//!
//! - **editor**: the clip goes into a temp file opened in `$EDITOR`
//! - **pipe**: the clip is written to a shell command's stdin, stdout is the result
//! - **tempfile**: like editor, but runs a configured program with the file name appended
//!
//! Every failure (no editor, spawn error, non-zero exit, temp file I/O) means
//! "no transformation happened" and yields `None`. Nothing here is fatal.
//! There is no timeout: a child that never exits blocks the UI, the user
//! asked for it.

use crate::clip::{Normalizer, TrimPolicy};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// The display surface, as far as transforms are concerned
///
/// Interactive children (editors) need the real terminal, so the UI is
/// suspended around them.
pub trait Surface {
    fn suspend(&mut self) -> Result<()>;
    fn resume(&mut self) -> Result<()>;
}

/// Surface that does nothing
#[cfg(test)]
#[derive(Debug, Default)]
pub struct NoSurface;

#[cfg(test)]
impl Surface for NoSurface {
    fn suspend(&mut self) -> Result<()> {
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A command given either as one command line or as a list of words
///
/// For pipes the command runs through the shell. With the list form only the
/// first word is the shell command; the rest become the shell's positional
/// parameters (`$0`, `$1`, ...), not arguments of the program. Join the words
/// into one string to pass arguments the ordinary way.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Line(String),
    Words(Vec<String>),
}

impl CommandSpec {
    /// Split into program and arguments (no shell involved)
    fn program_and_args(&self) -> Option<(String, Vec<String>)> {
        let words: Vec<String> = match self {
            CommandSpec::Line(line) => line.split_whitespace().map(str::to_string).collect(),
            CommandSpec::Words(words) => words.clone(),
        };
        let (program, args) = words.split_first()?;
        if program.is_empty() {
            return None;
        }
        Some((program.clone(), args.to_vec()))
    }

    /// Build a shell invocation: `sh -c <first> <rest...>`
    fn shell_command(&self) -> Option<Command> {
        let (script, shell_args): (&str, &[String]) = match self {
            CommandSpec::Line(line) => (line.as_str(), &[]),
            CommandSpec::Words(words) => {
                let (first, rest) = words.split_first()?;
                (first.as_str(), rest)
            }
        };
        if script.trim().is_empty() {
            return None;
        }

        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(script);
            cmd
        };
        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(script);
            cmd
        };
        cmd.args(shell_args);
        Some(cmd)
    }

    pub fn display(&self) -> String {
        match self {
            CommandSpec::Line(line) => line.clone(),
            CommandSpec::Words(words) => words.join(" "),
        }
    }
}

/// What a transform does with the clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformKind {
    /// Edit in `$EDITOR` (or the configured editor)
    Editor,
    /// Pipe through a shell command
    Pipe(CommandSpec),
    /// Run a program on a temp file holding the clip
    TempFile(CommandSpec),
}

/// A transform action as bound to a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    pub kind: TransformKind,
    pub trim: TrimPolicy,
}

impl Transform {
    pub fn editor() -> Self {
        Self {
            kind: TransformKind::Editor,
            trim: TrimPolicy::Normalize,
        }
    }

    pub fn pipe(command: CommandSpec, trim: TrimPolicy) -> Self {
        Self {
            kind: TransformKind::Pipe(command),
            trim,
        }
    }

    pub fn temp_file(command: CommandSpec, trim: TrimPolicy) -> Self {
        Self {
            kind: TransformKind::TempFile(command),
            trim,
        }
    }
}

/// Runs transforms against clips
#[derive(Debug, Clone, Default)]
pub struct TransformRunner {
    /// Editor command line (program plus optional arguments)
    editor: Option<String>,
    normalizer: Normalizer,
}

impl TransformRunner {
    pub fn new(editor: Option<String>, normalizer: Normalizer) -> Self {
        let editor = editor.filter(|e| !e.trim().is_empty());
        Self { editor, normalizer }
    }

    /// Run `transform` on `clip`
    ///
    /// Returns the new text, or `None` when nothing should change: the
    /// program failed, or produced no output.
    pub fn run(
        &self,
        transform: &Transform,
        clip: &str,
        surface: &mut dyn Surface,
    ) -> Option<String> {
        let output = match &transform.kind {
            TransformKind::Editor => self.call_editor(clip, surface)?,
            TransformKind::Pipe(command) => pipe_through(clip, command)?,
            TransformKind::TempFile(command) => pass_as_tempfile(clip, command, surface)?,
        };
        let output = self.normalizer.apply(output, transform.trim);
        if output.is_empty() {
            return None;
        }
        Some(output)
    }

    /// Edit `clip` in the configured editor
    ///
    /// No editor configured means the clip comes back unchanged.
    pub fn call_editor(&self, clip: &str, surface: &mut dyn Surface) -> Option<String> {
        let Some(editor) = &self.editor else {
            tracing::debug!("No editor configured, leaving clip unchanged");
            return Some(clip.to_string());
        };
        pass_as_tempfile(clip, &CommandSpec::Line(editor.clone()), surface)
    }
}

/// Write `clip` to a temp file, run `command <file>` with the UI suspended,
/// and return the file's contents afterwards. The file is always removed.
pub fn pass_as_tempfile(
    clip: &str,
    command: &CommandSpec,
    surface: &mut dyn Surface,
) -> Option<String> {
    let Some((program, args)) = command.program_and_args() else {
        tracing::warn!("Empty command for temp file transform");
        return None;
    };

    let path = match write_temp_clip(clip) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("Temp file transform aborted: {:#}", e);
            return None;
        }
    };

    if let Err(e) = surface.suspend() {
        tracing::warn!("Failed to suspend display: {:#}", e);
    }
    let status = Command::new(&program).args(&args).arg(&*path).status();
    if let Err(e) = surface.resume() {
        tracing::warn!("Failed to resume display: {:#}", e);
    }

    let result = match status {
        Ok(status) if status.success() => read_back(&path),
        Ok(status) => {
            tracing::info!("{} exited with {}, clip unchanged", program, status);
            None
        }
        Err(e) => {
            tracing::warn!("Failed to run {}: {}", program, e);
            None
        }
    };

    if let Err(e) = path.close() {
        tracing::debug!("Temp file cleanup failed: {}", e);
    }
    result
}

fn write_temp_clip(clip: &str) -> Result<tempfile::TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix("clipz-")
        .suffix(".tmp")
        .tempfile()
        .context("Failed to create temp file")?;
    file.write_all(clip.as_bytes())
        .context("Failed to write temp file")?;
    file.flush().context("Failed to flush temp file")?;
    // Close our handle so editors that replace the file work on every platform
    Ok(file.into_temp_path())
}

fn read_back(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::warn!("Failed to read back {}: {}", path.display(), e);
            None
        }
    }
}

/// Pipe `clip` through a shell command and return its stdout
pub fn pipe_through(clip: &str, command: &CommandSpec) -> Option<String> {
    let Some(mut cmd) = command.shell_command() else {
        tracing::warn!("Empty pipe command");
        return None;
    };

    let mut child = match cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!("Failed to spawn `{}`: {}", command.display(), e);
            return None;
        }
    };

    // Feed stdin from a helper thread so a filter that writes before it has
    // read everything cannot deadlock against a full stdout pipe
    let writer = child.stdin.take().map(|mut stdin| {
        let input = clip.as_bytes().to_vec();
        std::thread::spawn(move || {
            // A filter may exit without reading its input
            let _ = stdin.write_all(&input);
        })
    });

    let output = child.wait_with_output();
    if let Some(writer) = writer {
        let _ = writer.join();
    }

    match output {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(output) => {
            tracing::info!(
                "`{}` exited with {}, clip unchanged",
                command.display(),
                output.status
            );
            None
        }
        Err(e) => {
            tracing::warn!("Failed to wait for `{}`: {}", command.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSurface {
        suspended: usize,
        resumed: usize,
    }

    impl Surface for CountingSurface {
        fn suspend(&mut self) -> Result<()> {
            self.suspended += 1;
            Ok(())
        }

        fn resume(&mut self) -> Result<()> {
            self.resumed += 1;
            Ok(())
        }
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_no_editor_returns_clip_unchanged() {
        let runner = TransformRunner::new(None, Normalizer::default());
        let mut surface = CountingSurface::default();
        assert_eq!(runner.call_editor("hi\n", &mut surface), Some("hi\n".to_string()));
        assert_eq!(surface.suspended, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_round_trip_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("seen-path");
        let editor = write_script(
            dir.path(),
            "bang-editor",
            &format!("printf '!' >> \"$1\"\necho \"$1\" > '{}'", record.display()),
        );

        let runner = TransformRunner::new(Some(editor), Normalizer::default());
        let mut surface = CountingSurface::default();
        let out = runner.run(&Transform::editor(), "hi", &mut surface);

        assert_eq!(out.as_deref(), Some("hi!"));
        assert_eq!((surface.suspended, surface.resumed), (1, 1));

        let seen = std::fs::read_to_string(&record).unwrap();
        assert!(!Path::new(seen.trim()).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_failure_means_no_change() {
        let dir = tempfile::tempdir().unwrap();
        let editor = write_script(dir.path(), "abort-editor", "echo changed > \"$1\"\nexit 1");

        let runner = TransformRunner::new(Some(editor), Normalizer::default());
        assert_eq!(runner.run(&Transform::editor(), "hi", &mut NoSurface), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_editor_program_means_no_change() {
        let runner = TransformRunner::new(
            Some("/nonexistent/clipz-editor".to_string()),
            Normalizer::default(),
        );
        assert_eq!(runner.run(&Transform::editor(), "hi", &mut NoSurface), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_output_trimmed_by_policy() {
        let dir = tempfile::tempdir().unwrap();
        let editor = write_script(dir.path(), "nl-editor", "printf 'edited\\n\\n' > \"$1\"");

        let runner = TransformRunner::new(Some(editor), Normalizer::default());
        let out = runner.run(&Transform::editor(), "x", &mut NoSurface);
        assert_eq!(out.as_deref(), Some("edited"));
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_line_through_shell() {
        let out = pipe_through("b\na\n", &CommandSpec::Line("sort".into()));
        assert_eq!(out.as_deref(), Some("a\nb\n"));

        let out = pipe_through("shout", &CommandSpec::Line("tr a-z A-Z".into()));
        assert_eq!(out.as_deref(), Some("SHOUT"));
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_words_are_shell_arguments() {
        let spec = CommandSpec::Words(vec!["echo \"$0-$1\"".into(), "zero".into(), "one".into()]);
        let out = pipe_through("ignored", &spec);
        assert_eq!(out.as_deref(), Some("zero-one\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_large_input_does_not_deadlock() {
        let big = "x".repeat(512 * 1024);
        let out = pipe_through(&big, &CommandSpec::Line("cat".into()));
        assert_eq!(out.map(|s| s.len()), Some(big.len()));
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_failure_and_empty_output_are_no_change() {
        let runner = TransformRunner::new(None, Normalizer::default());
        let failing = Transform::pipe(CommandSpec::Line("exit 3".into()), TrimPolicy::Normalize);
        assert_eq!(runner.run(&failing, "keep", &mut NoSurface), None);

        let silent = Transform::pipe(
            CommandSpec::Line("cat > /dev/null".into()),
            TrimPolicy::Normalize,
        );
        assert_eq!(runner.run(&silent, "keep", &mut NoSurface), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_trim_policy() {
        let keep = Transform::pipe(CommandSpec::Line("cat".into()), TrimPolicy::Keep);
        let trim = Transform::pipe(CommandSpec::Line("cat".into()), TrimPolicy::Normalize);
        let runner = TransformRunner::new(None, Normalizer::default());

        assert_eq!(runner.run(&keep, "a\n", &mut NoSurface).as_deref(), Some("a\n"));
        assert_eq!(runner.run(&trim, "a\n", &mut NoSurface).as_deref(), Some("a"));
    }

    #[cfg(unix)]
    #[test]
    fn test_tempfile_command_gets_path_last() {
        let dir = tempfile::tempdir().unwrap();
        let tool = write_script(
            dir.path(),
            "prefix-tool",
            concat!(
                "printf '%s:' \"$1\" > \"$2.out\"\n",
                "cat \"$2.out\" \"$2\" > \"$2.new\"\n",
                "mv \"$2.new\" \"$2\"\n",
                "rm \"$2.out\"",
            ),
        );

        let spec = CommandSpec::Words(vec![tool, "tag".into()]);
        let out = pass_as_tempfile("body", &spec, &mut NoSurface);
        assert_eq!(out.as_deref(), Some("tag:body"));
    }

    #[test]
    fn test_empty_commands_rejected() {
        assert!(CommandSpec::Line("  ".into()).shell_command().is_none());
        assert!(CommandSpec::Words(Vec::new()).program_and_args().is_none());
        assert_eq!(pipe_through("x", &CommandSpec::Words(Vec::new())), None);
    }
}
