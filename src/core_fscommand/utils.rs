use crate::constants::{HEAD_TAIL_DEFAULT_LINES, HEAD_TAIL_MAX_LINES};
use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_network::SessionError;
use crate::session::Session;
use log::warn;
use std::collections::VecDeque;
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Maps a client-supplied path to an absolute path inside the session root.
///
/// Never fails and never returns a path outside `root_dir`:
/// - empty input is the current directory;
/// - an absolute input is reduced to its last segment;
/// - a relative input escaping the root with `..` is retried with its last
///   segment only, and if that still escapes, the current directory is used.
///
/// The last segment may itself be `..`, so `/x/..` means the parent of the
/// current directory.
///
/// The resolution is purely lexical, symbolic links are not followed.
pub fn resolve_path(session: &mut Session, raw_path: &str) -> PathBuf {
    let root = normalize_path(&session.root_dir);
    let mut base = normalize_path(&session.current_dir);

    if !base.starts_with(&root) {
        warn!(
            "Current directory {:?} escaped root {:?}, resetting",
            base, root
        );
        base = root.clone();
        session.current_dir = root.clone();
    }

    if raw_path.is_empty() {
        return base;
    }

    let mut requested = PathBuf::from(raw_path);
    if requested.is_absolute() || requested.has_root() {
        match last_segment(&requested) {
            Some(segment) => requested = segment,
            None => return base,
        }
    }

    let resolved = normalize_path(&base.join(&requested));
    if resolved.starts_with(&root) {
        return resolved;
    }

    warn!("Path {:?} is outside of the allowed area", raw_path);
    let Some(segment) = last_segment(&requested) else {
        return base;
    };
    let fallback = normalize_path(&base.join(segment));
    if fallback.starts_with(&root) {
        fallback
    } else {
        base
    }
}

/// Last component of `path`, `..` and `.` included.
fn last_segment(path: &Path) -> Option<PathBuf> {
    match path.components().next_back()? {
        Component::Normal(name) => Some(PathBuf::from(name)),
        Component::ParentDir => Some(PathBuf::from("..")),
        Component::CurDir => Some(PathBuf::from(".")),
        Component::RootDir | Component::Prefix(_) => None,
    }
}

/// Lexically collapses `.` and `..`. A `..` at the filesystem root is dropped.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal =
                    matches!(normalized.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// `path` relative to `base`, `/`-separated whatever the platform.
pub fn relative_display(base: &Path, path: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(relative) => relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.display().to_string(),
    }
}

pub fn require_param(arg: &str) -> Result<&str, CommandError> {
    let arg = arg.trim();
    if arg.is_empty() {
        Err(CommandError::MissingArgument)
    } else {
        Ok(arg)
    }
}

/// Splits `"<src> <dst>"` on the first space. No quoting support.
pub fn split_two(arg: &str) -> Result<(&str, &str), CommandError> {
    let arg = require_param(arg)?;
    let (first, second) = arg
        .split_once(' ')
        .ok_or(CommandError::ExpectedTwoArguments)?;
    let (first, second) = (first.trim(), second.trim());
    if first.is_empty() || second.is_empty() {
        return Err(CommandError::ExpectedTwoArguments);
    }
    Ok((first, second))
}

/// Line count argument of head/tail: default when absent or unparsable,
/// clamped to the allowed range otherwise.
pub fn parse_line_count(raw: Option<&str>) -> usize {
    match raw.map(|raw| raw.parse::<i64>()) {
        Some(Ok(n)) if n < 0 => 0,
        Some(Ok(n)) => (n as u64).min(HEAD_TAIL_MAX_LINES as u64) as usize,
        _ => HEAD_TAIL_DEFAULT_LINES,
    }
}

pub async fn existing_metadata(path: &Path) -> Result<Metadata, CommandError> {
    tokio::fs::metadata(path)
        .await
        .map_err(|_| CommandError::NotFound(path.to_path_buf()))
}

pub async fn require_file(path: &Path) -> Result<Metadata, CommandError> {
    let metadata = existing_metadata(path).await?;
    if !metadata.is_file() {
        return Err(CommandError::NotAFile(path.to_path_buf()));
    }
    Ok(metadata)
}

pub async fn require_dir(path: &Path) -> Result<Metadata, CommandError> {
    let metadata = existing_metadata(path).await?;
    if !metadata.is_dir() {
        return Err(CommandError::NotADirectory(path.to_path_buf()));
    }
    Ok(metadata)
}

/// Reads a regular file as UTF-8 text (lossily) and splits it into lines.
pub async fn read_text_lines(path: &Path) -> Result<Vec<String>, CommandError> {
    require_file(path).await?;
    let bytes = tokio::fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect())
}

/// First `count` lines of a text file. Stops reading once they are found.
pub async fn read_first_lines(path: &Path, count: usize) -> Result<Vec<String>, CommandError> {
    let mut reader = TextLines::open(path).await?;
    let mut lines = Vec::with_capacity(count.min(HEAD_TAIL_DEFAULT_LINES));
    while lines.len() < count {
        match reader.next_line().await? {
            Some(line) => lines.push(line),
            None => break,
        }
    }
    Ok(lines)
}

/// Last `count` lines of a text file, keeping at most `count` in memory.
pub async fn read_last_lines(path: &Path, count: usize) -> Result<Vec<String>, CommandError> {
    let mut reader = TextLines::open(path).await?;
    if count == 0 {
        return Ok(Vec::new());
    }
    let mut window = VecDeque::with_capacity(count.min(HEAD_TAIL_DEFAULT_LINES));
    while let Some(line) = reader.next_line().await? {
        if window.len() == count {
            window.pop_front();
        }
        window.push_back(line);
    }
    Ok(window.into())
}

/// Line reader with the same splitting rules as `str::lines`, decoding each
/// line lossily.
struct TextLines {
    reader: BufReader<File>,
    buffer: Vec<u8>,
}

impl TextLines {
    async fn open(path: &Path) -> Result<Self, CommandError> {
        require_file(path).await?;
        let file = File::open(path).await?;
        Ok(Self {
            reader: BufReader::new(file),
            buffer: Vec::new(),
        })
    }

    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer).await? == 0 {
            return Ok(None);
        }
        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
            if self.buffer.last() == Some(&b'\r') {
                self.buffer.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buffer).into_owned()))
    }
}

/// Answers a failed command: logs the reason and sends the KO status.
///
/// Filesystem failures are also written to the audit log.
pub async fn reject(
    session: &mut Session,
    command: FsCommand,
    error: CommandError,
) -> Result<bool, SessionError> {
    if let CommandError::Io(ref e) = error {
        session.audit_event(&format!("ERROR ({} failed: {})", command.verb(), e));
    }
    warn!(
        "[{}] {} failed: {} (request: {})",
        session.peer,
        command.verb(),
        error,
        session.last_received
    );
    session.reply(error.to_status_line()).await?;
    Ok(false)
}

/// Sends the `N` line followed by the `N` lines themselves.
pub async fn send_counted_lines(
    session: &mut Session,
    lines: &[String],
) -> Result<(), SessionError> {
    session.send_line(&lines.len().to_string()).await?;
    for line in lines {
        session.send_line(line).await?;
    }
    Ok(())
}

/// Sends the lines followed by the blank terminator line.
pub async fn send_terminated_list(
    session: &mut Session,
    lines: &[String],
) -> Result<(), SessionError> {
    for line in lines {
        session.send_line(line).await?;
    }
    session.send_line("").await
}
