use crate::constants::STATUS_OK;
use crate::core_client::error::ClientError;
use crate::core_network::transport::{copy_exactly, read_length, read_line, write_length, write_line};
use crate::core_network::{BoxedReader, BoxedWriter};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::net::TcpStream;

const MENU: &[&str] = &[
    "list <route>",
    "show <route>",
    "delete <route>",
    "upload <local_file>",
    "download <server_file>",
    "help",
    "ping",
    "mkdir <dir>",
    "rename <src> <dst>",
    "info <route>",
    "exists <route>",
    "copy <src> <dst>",
    "pwd",
    "cd <dir>",
    "touch <file>",
    "size <file>",
    "head <file> [n]",
    "tail <file> [n]",
    "tree [dir]",
    "find <pattern> [dir]",
    "hash <file>",
    "quit",
];

/// What follows an `OK` status, per verb.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum ResponseShape {
    StatusOnly,
    /// A fixed number of lines.
    Lines(usize),
    /// Lines up to a blank one.
    Terminated,
    /// A count line, then that many lines.
    Counted,
    Download,
}

fn response_shape(verb: &str) -> ResponseShape {
    match verb {
        "list" | "help" | "tree" | "find" => ResponseShape::Terminated,
        "show" | "head" | "tail" => ResponseShape::Counted,
        "ping" | "exists" | "pwd" | "size" | "hash" => ResponseShape::Lines(1),
        "info" | "stat" => ResponseShape::Lines(4),
        "download" => ResponseShape::Download,
        _ => ResponseShape::StatusOnly,
    }
}

/// A local file moved by `upload` or `download`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub path: PathBuf,
    pub bytes: u64,
}

/// The server's answer to one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: String,
    /// Payload lines, count line included for show/head/tail.
    pub lines: Vec<String>,
    pub transfer: Option<Transfer>,
}

impl Reply {
    fn status_only(status: String) -> Self {
        Self {
            status,
            lines: Vec::new(),
            transfer: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Client side of a connection.
///
/// Mirrors the server framing: every text line goes through `read_line`, so
/// the bytes of a binary block that follows are never swallowed by a buffer.
pub struct Client {
    reader: BoxedReader,
    writer: BoxedWriter,
    local_dir: PathBuf,
}

impl Client {
    /// Connects to the server. The process working directory becomes the
    /// local directory for uploads and downloads.
    pub async fn connect(host: &str, port: u16) -> Result<Self, ClientError> {
        let stream = TcpStream::connect((host, port)).await?;
        info!("Connected to {}:{}", host, port);
        let (reader, writer) = stream.into_split();
        Ok(Self::new(
            Box::new(reader),
            Box::new(writer),
            std::env::current_dir()?,
        ))
    }

    pub fn new(reader: BoxedReader, writer: BoxedWriter, local_dir: PathBuf) -> Self {
        Self {
            reader,
            writer,
            local_dir,
        }
    }

    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    pub fn set_local_dir(&mut self, local_dir: PathBuf) {
        self.local_dir = local_dir;
    }

    /// Sends one command line and reads the complete response.
    ///
    /// # Errors
    ///
    /// `Usage` and `LocalFile` are raised before anything is sent, the
    /// connection stays usable. Any other error leaves the protocol in an
    /// unknown state and the connection should be dropped.
    pub async fn execute(&mut self, line: &str) -> Result<Reply, ClientError> {
        let line = line.trim();
        let (verb, params) = match line.split_once(' ') {
            Some((verb, params)) => (verb, params.trim()),
            None => (line, ""),
        };
        if verb.is_empty() {
            return Err(ClientError::Usage(String::from("Empty command")));
        }

        match verb {
            "upload" => self.upload(params).await,
            "download" => self.download(line, params).await,
            _ => {
                write_line(&mut self.writer, line).await?;
                let status = self.read_status(verb).await?;
                if status != STATUS_OK {
                    return Ok(Reply::status_only(status));
                }
                let lines = self.read_payload(verb, response_shape(verb)).await?;
                Ok(Reply {
                    status,
                    lines,
                    transfer: None,
                })
            }
        }
    }

    /// Validates and opens the local file, then runs the upload exchange.
    async fn upload(&mut self, params: &str) -> Result<Reply, ClientError> {
        if params.is_empty() {
            return Err(ClientError::LocalFile(String::from("Missing local file.")));
        }
        let local = self.local_path(params);
        let not_found = || ClientError::LocalFile(format!("Local file not found: {}", local.display()));

        let metadata = tokio::fs::metadata(&local).await.map_err(|_| not_found())?;
        if !metadata.is_file() {
            return Err(not_found());
        }
        let name = local
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(not_found)?;
        let mut file = File::open(&local)
            .await
            .map_err(|e| ClientError::LocalFile(format!("Cannot read {}: {}", local.display(), e)))?;

        write_line(&mut self.writer, &format!("upload {}", name)).await?;
        let status = self.read_status("upload").await?;
        if status != STATUS_OK {
            return Ok(Reply::status_only(status));
        }

        let bytes = file.metadata().await?.len();
        write_length(&mut self.writer, bytes as i64).await?;
        copy_exactly(&mut file, &mut self.writer, bytes).await?;
        debug!("Upload sent: {} ({} bytes)", name, bytes);

        Ok(Reply {
            status,
            lines: Vec::new(),
            transfer: Some(Transfer { path: local, bytes }),
        })
    }

    /// Runs the download exchange, storing the file under its base name in
    /// the local directory. An existing local file is overwritten.
    async fn download(&mut self, line: &str, params: &str) -> Result<Reply, ClientError> {
        if params.is_empty() {
            return Err(ClientError::Usage(String::from("Missing server file.")));
        }
        let name = Path::new(params)
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| ClientError::Usage(format!("Not a file name: {}", params)))?;
        let target = self.local_dir.join(name);

        write_line(&mut self.writer, line).await?;
        let status = self.read_status("download").await?;
        if status != STATUS_OK {
            return Ok(Reply::status_only(status));
        }

        let length = read_length(&mut self.reader).await?;
        if length < 0 {
            return Err(ClientError::Protocol(format!(
                "negative download length {}",
                length
            )));
        }
        let bytes = length as u64;

        let mut file = match OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&target)
            .await
        {
            Ok(file) => file,
            Err(e) => {
                // Still consume the block so the next command lines up.
                copy_exactly(&mut self.reader, &mut tokio::io::sink(), bytes).await?;
                return Err(ClientError::LocalFile(format!(
                    "Cannot write {}: {}",
                    target.display(),
                    e
                )));
            }
        };
        copy_exactly(&mut self.reader, &mut file, bytes).await?;
        debug!("Downloaded: {} ({} bytes)", target.display(), bytes);

        Ok(Reply {
            status,
            lines: Vec::new(),
            transfer: Some(Transfer {
                path: target,
                bytes,
            }),
        })
    }

    fn local_path(&self, params: &str) -> PathBuf {
        let path = Path::new(params);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.local_dir.join(path)
        }
    }

    async fn read_status(&mut self, verb: &str) -> Result<String, ClientError> {
        self.read_expected_line(verb).await
    }

    async fn read_expected_line(&mut self, phase: &str) -> Result<String, ClientError> {
        read_line(&mut self.reader)
            .await?
            .ok_or_else(|| ClientError::ServerClosed {
                phase: phase.to_string(),
            })
    }

    async fn read_payload(
        &mut self,
        verb: &str,
        shape: ResponseShape,
    ) -> Result<Vec<String>, ClientError> {
        let mut lines = Vec::new();
        match shape {
            ResponseShape::StatusOnly | ResponseShape::Download => {}
            ResponseShape::Lines(count) => {
                for _ in 0..count {
                    lines.push(self.read_expected_line(verb).await?);
                }
            }
            ResponseShape::Terminated => loop {
                let line = self.read_expected_line(verb).await?;
                if line.is_empty() {
                    break;
                }
                lines.push(line);
            },
            ResponseShape::Counted => {
                let count_line = self.read_expected_line(verb).await?;
                let count: usize = count_line.trim().parse().map_err(|_| {
                    ClientError::Protocol(format!("invalid line count {:?}", count_line))
                })?;
                lines.push(count_line);
                let phase = format!("{} content", verb);
                for _ in 0..count {
                    lines.push(self.read_expected_line(&phase).await?);
                }
            }
        }
        Ok(lines)
    }

    /// Interactive loop: menu, prompt, one command per input line.
    ///
    /// Blank input is ignored. Stops after a successful `quit`, at the end of
    /// the input, or with an error when the connection breaks.
    pub async fn run_interactive<R, W>(&mut self, input: R, output: &mut W) -> Result<(), ClientError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut input = input.lines();

        loop {
            print_menu(output)?;
            write!(output, "Introduce the command: ")?;
            output.flush()?;

            let Some(line) = input.next_line().await? else {
                return Ok(());
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let reply = match self.execute(line).await {
                Ok(reply) => reply,
                Err(e) if e.is_recoverable() => {
                    writeln!(output, "{}", e)?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            writeln!(output, "{}", reply.status)?;
            for payload in &reply.lines {
                writeln!(output, "{}", payload)?;
            }
            if let Some(transfer) = &reply.transfer {
                let verb = if line.starts_with("upload") {
                    "Upload sent"
                } else {
                    "Downloaded"
                };
                writeln!(
                    output,
                    "{}: {} ({} bytes)",
                    verb,
                    transfer.path.display(),
                    transfer.bytes
                )?;
            }

            if reply.is_ok() && line.split_whitespace().next() == Some("quit") {
                return Ok(());
            }
        }
    }
}

pub fn print_menu<W: Write>(output: &mut W) -> std::io::Result<()> {
    writeln!(output, "Commands")?;
    for entry in MENU {
        writeln!(output, "{}", entry)?;
    }
    Ok(())
}
