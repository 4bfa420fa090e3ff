// In-memory harness shared by the command tests: a session whose transport is
// one end of a duplex pipe and whose root is a fresh temporary directory.
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::handlers::CommandCatalog;
use crate::core_log::AuditLog;
use crate::core_network::transport::{read_line, read_length};
use crate::session::Session;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

pub struct Harness {
    pub session: Session,
    pub peer: DuplexStream,
    pub catalog: CommandCatalog,
    pub root: PathBuf,
    _dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let (server_end, peer) = tokio::io::duplex(1 << 20);
        let (reader, writer) = tokio::io::split(server_end);
        let session = Session::new(
            Box::new(reader),
            Box::new(writer),
            String::from("127.0.0.1"),
            root.clone(),
            Arc::new(AuditLog::disabled()),
        );
        Self {
            session,
            peer,
            catalog: CommandCatalog::new(),
            root,
            _dir: dir,
        }
    }

    pub fn write_file(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.root.join(relative);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    /// Runs one command and returns its termination flag.
    pub async fn run(&mut self, command: FsCommand, arg: &str) -> bool {
        self.session.last_received = format!("{} {}", command.verb(), arg);
        self.catalog
            .execute(command, &mut self.session, arg.to_string())
            .await
            .unwrap()
    }

    pub async fn line(&mut self) -> String {
        read_line(&mut self.peer).await.unwrap().unwrap()
    }

    /// Reads lines up to the blank terminator.
    pub async fn lines_until_blank(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            let line = self.line().await;
            if line.is_empty() {
                return lines;
            }
            lines.push(line);
        }
    }

    /// Reads the count line and that many lines.
    pub async fn counted_lines(&mut self) -> Vec<String> {
        let count: usize = self.line().await.parse().unwrap();
        let mut lines = Vec::with_capacity(count);
        for _ in 0..count {
            lines.push(self.line().await);
        }
        lines
    }

    pub async fn binary_block(&mut self) -> Vec<u8> {
        let length = read_length(&mut self.peer).await.unwrap();
        let mut bytes = vec![0u8; length as usize];
        self.peer.read_exact(&mut bytes).await.unwrap();
        bytes
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.peer.write_all(bytes).await.unwrap();
    }

    /// Asserts nothing beyond what was already read has been written.
    pub async fn assert_drained(&mut self) {
        AsyncWriteExt::shutdown(&mut self.session.writer).await.unwrap();
        let mut rest = Vec::new();
        self.peer.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty(), "unexpected trailing output: {:?}", rest);
    }
}
