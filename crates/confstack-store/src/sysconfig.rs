//! Sysconfig-file store backend
//!
//! Addresses shell-style `KEY="value"` variables in files under a root
//! directory. A two-segment path `.<file>.<KEY>` is variable `KEY` in file
//! `<file>`; a one-segment path names the file itself. Files are parsed
//! lazily and edits are buffered in memory; writing `Value::Null` to a
//! file-level path flushes that file to disk. Comment and unrecognized
//! lines survive a rewrite untouched, only changed assignments are
//! rewritten and new keys appended.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{IoOperation, StoreError, StoreResult},
    path::StorePath,
    store::ValueStore,
};

/// File-backed sysconfig store.
///
/// Edits stay in memory until the file-level flush write, so a group of
/// staged changes to one file lands on disk as a single rewrite.
pub struct SysconfigStore {
    root: PathBuf,
    files: Mutex<HashMap<String, FileBuffer>>,
}

impl SysconfigStore {
    /// Open a store over `root`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns error if the root directory cannot be created
    pub fn new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root)
                .map_err(|e| StoreError::io(root.clone(), IoOperation::Create, e))?;
            debug!("Created sysconfig root {:?}", root);
        }

        Ok(Self {
            root,
            files: Mutex::new(HashMap::new()),
        })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Split a store path into file name and optional variable name
    fn resolve<'p>(path: &'p StorePath) -> StoreResult<(&'p str, Option<&'p str>)> {
        let segments: Vec<&str> = path.segments().collect();
        match segments.as_slice() {
            &[file] => Ok((file, None)),
            &[file, key] => {
                if !is_valid_name(key) {
                    return Err(StoreError::invalid_path(
                        path.to_string(),
                        format!("'{key}' is not a valid sysconfig variable name"),
                    ));
                }
                Ok((file, Some(key)))
            }
            _ => Err(StoreError::invalid_path(
                path.to_string(),
                "expected .<file> or .<file>.<KEY>",
            )),
        }
    }

    /// Load `name` into the buffer table if it is not there yet
    fn load<'a>(
        &self,
        files: &'a mut HashMap<String, FileBuffer>,
        name: &str,
    ) -> StoreResult<&'a mut FileBuffer> {
        if !files.contains_key(name) {
            let disk_path = self.file_path(name);
            let buffer = if disk_path.exists() {
                let content = fs::read_to_string(&disk_path)
                    .map_err(|e| StoreError::io(disk_path.clone(), IoOperation::Read, e))?;
                debug!("Loaded sysconfig file {:?}", disk_path);
                FileBuffer::parse(&content)
            } else {
                debug!("Sysconfig file {:?} does not exist yet", disk_path);
                FileBuffer::default()
            };
            files.insert(name.to_string(), buffer);
        }
        // Just inserted above when missing
        Ok(files.get_mut(name).unwrap())
    }

    fn flush(&self, files: &mut HashMap<String, FileBuffer>, name: &str) -> StoreResult<()> {
        let Some(buffer) = files.get_mut(name) else {
            debug!("Flush of {name} skipped, never loaded");
            return Ok(());
        };
        if !buffer.dirty {
            debug!("Flush of {name} skipped, no buffered changes");
            return Ok(());
        }

        let disk_path = self.file_path(name);
        let content = buffer.render();
        fs::write(&disk_path, &content)
            .map_err(|e| StoreError::io(disk_path.clone(), IoOperation::Write, e))?;
        buffer.dirty = false;
        debug!("Flushed sysconfig file {:?} ({} bytes)", disk_path, content.len());
        Ok(())
    }
}

impl ValueStore for SysconfigStore {
    fn read(&self, path: &StorePath) -> StoreResult<Value> {
        let (name, key) = Self::resolve(path)?;
        let Some(key) = key else {
            // File-level paths are only addressable for flushing
            return Ok(Value::Null);
        };

        let mut files = self.files.lock().map_err(|_| StoreError::Lock)?;
        let buffer = self.load(&mut files, name)?;
        let value = match buffer.get(key, &self.file_path(name))? {
            Some(raw) => Value::String(raw),
            None => Value::Null,
        };
        debug!("Read {} from sysconfig store: {}", path, value);
        Ok(value)
    }

    fn write(&self, path: &StorePath, value: Value) -> StoreResult<()> {
        let (name, key) = Self::resolve(path)?;
        let mut files = self.files.lock().map_err(|_| StoreError::Lock)?;

        let Some(key) = key else {
            if !value.is_null() {
                return Err(StoreError::unsupported_value(
                    path.to_string(),
                    "only null (flush) writes are supported at file level",
                ));
            }
            return self.flush(&mut files, name);
        };

        debug!("Write {} to sysconfig store: {}", path, value);
        let buffer = self.load(&mut files, name)?;
        match value {
            Value::Null => buffer.remove(key),
            Value::String(s) => {
                if s.contains('"') || s.contains('\n') {
                    return Err(StoreError::unsupported_value(
                        path.to_string(),
                        "string contains characters a sysconfig value cannot hold",
                    ));
                }
                buffer.assign(key, &format!("{key}=\"{s}\""));
            }
            Value::Bool(b) => buffer.assign(key, &format!("{key}={b}")),
            Value::Number(n) => buffer.assign(key, &format!("{key}={n}")),
            other => {
                return Err(StoreError::unsupported_value(
                    path.to_string(),
                    format!("cannot encode {other} as a sysconfig value"),
                ));
            }
        }
        Ok(())
    }
}

/// One sysconfig file held as raw lines so rewrites are non-destructive
#[derive(Debug, Default)]
struct FileBuffer {
    lines: Vec<String>,
    dirty: bool,
}

impl FileBuffer {
    fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
            dirty: false,
        }
    }

    /// Value of `key`, from the last assignment line mentioning it
    fn get(&self, key: &str, disk_path: &std::path::Path) -> StoreResult<Option<String>> {
        let Some(index) = self.last_assignment(key) else {
            return Ok(None);
        };
        let raw = assignment_value(&self.lines[index]);
        match unquote(raw) {
            Ok(value) => Ok(Some(value)),
            Err(message) => Err(StoreError::parse(disk_path.to_path_buf(), index + 1, message)),
        }
    }

    /// Replace the last assignment of `key` with `line`, or append it
    fn assign(&mut self, key: &str, line: &str) {
        match self.last_assignment(key) {
            Some(index) => {
                if self.lines[index] != line {
                    self.lines[index] = line.to_string();
                    self.dirty = true;
                }
            }
            None => {
                self.lines.push(line.to_string());
                self.dirty = true;
            }
        }
    }

    /// Drop every assignment of `key`
    fn remove(&mut self, key: &str) {
        let before = self.lines.len();
        self.lines.retain(|line| assignment_name(line) != Some(key));
        if self.lines.len() != before {
            self.dirty = true;
        }
    }

    fn last_assignment(&self, key: &str) -> Option<usize> {
        self.lines
            .iter()
            .rposition(|line| assignment_name(line) == Some(key))
    }

    fn render(&self) -> String {
        let mut content = self.lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        content
    }
}

/// Variable name of an assignment line, `None` for comments and anything
/// else that is not `NAME=...`
fn assignment_name(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }
    let (name, _) = trimmed.split_once('=')?;
    let name = name.trim_end();
    if is_valid_name(name) {
        Some(name)
    } else {
        None
    }
}

fn assignment_value(line: &str) -> &str {
    match line.split_once('=') {
        Some((_, value)) => value.trim(),
        None => "",
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn unquote(raw: &str) -> Result<String, String> {
    for quote in ['"', '\''] {
        if let Some(rest) = raw.strip_prefix(quote) {
            return match rest.strip_suffix(quote) {
                Some(inner) => Ok(inner.to_string()),
                None => Err(format!("unterminated {quote} quote")),
            };
        }
    }
    if raw.contains('#') {
        warn!("Trailing comment in unquoted sysconfig value: {raw}");
    }
    Ok(raw.to_string())
}
