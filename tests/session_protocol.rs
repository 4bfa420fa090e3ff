// Raw wire-level conversations with a session loop over an in-memory pipe.
use rouillefsd::core_fscommand::CommandCatalog;
use rouillefsd::core_log::AuditLog;
use rouillefsd::core_network::transport::{read_length, read_line};
use rouillefsd::core_network::{run_session_loop, SessionEnd, SessionError};
use rouillefsd::session::Session;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;

struct Conversation {
    peer: DuplexStream,
    root: PathBuf,
    worker: JoinHandle<Result<SessionEnd, SessionError>>,
    _dir: TempDir,
}

impl Conversation {
    fn start() -> Self {
        Self::start_with_audit(Arc::new(AuditLog::disabled()))
    }

    fn start_with_audit(audit: Arc<AuditLog>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir_all(&root).unwrap();
        let root = root.canonicalize().unwrap();

        let (server_end, peer) = tokio::io::duplex(64 * 1024);
        let (reader, writer) = tokio::io::split(server_end);
        let mut session = Session::new(
            Box::new(reader),
            Box::new(writer),
            String::from("10.0.0.1"),
            root.clone(),
            audit,
        );
        let worker = tokio::spawn(async move {
            let catalog = CommandCatalog::new();
            run_session_loop(&mut session, &catalog).await
        });

        Self {
            peer,
            root,
            worker,
            _dir: dir,
        }
    }

    async fn send(&mut self, line: &str) {
        self.peer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .unwrap();
    }

    async fn line(&mut self) -> String {
        read_line(&mut self.peer).await.unwrap().unwrap()
    }

    async fn finish(self) -> Result<SessionEnd, SessionError> {
        let Conversation { mut peer, worker, .. } = self;
        peer.shutdown().await.unwrap();
        let result = worker.await.unwrap();
        drop(peer);
        result
    }
}

#[tokio::test]
async fn test_unknown_verb_then_session_continues() {
    let mut conversation = Conversation::start();
    conversation.send("frobnicate").await;
    assert_eq!(conversation.line().await, "KO");
    conversation.send("ping").await;
    assert_eq!(conversation.line().await, "OK");
    assert_eq!(conversation.line().await, "pong");

    let end = conversation.finish().await.unwrap();
    assert_eq!(end, SessionEnd::DisconnectedAbnormal);
}

#[tokio::test]
async fn test_cd_parent_at_root_then_pwd() {
    let mut conversation = Conversation::start();
    conversation.send("cd ..").await;
    assert_eq!(conversation.line().await, "OK");
    conversation.send("pwd").await;
    assert_eq!(conversation.line().await, "OK");
    assert_eq!(conversation.line().await, ".");

    conversation.send("cd .").await;
    assert_eq!(conversation.line().await, "OK");
    conversation.send("pwd").await;
    assert_eq!(conversation.line().await, "OK");
    assert_eq!(conversation.line().await, ".");
}

#[tokio::test]
async fn test_upload_then_size() {
    let mut conversation = Conversation::start();
    let payload = [b'x'; 37];

    conversation.send("upload report.txt").await;
    assert_eq!(conversation.line().await, "OK");
    conversation
        .peer
        .write_all(&37i64.to_be_bytes())
        .await
        .unwrap();
    conversation.peer.write_all(&payload).await.unwrap();

    conversation.send("size report.txt").await;
    assert_eq!(conversation.line().await, "OK");
    assert_eq!(conversation.line().await, "37");
    assert_eq!(
        std::fs::read(conversation.root.join("report.txt")).unwrap(),
        payload
    );
}

#[tokio::test]
async fn test_tail_zero_and_empty_find() {
    let mut conversation = Conversation::start();
    std::fs::write(conversation.root.join("log.txt"), "a\nb\nc\n").unwrap();

    conversation.send("tail log.txt 0").await;
    assert_eq!(conversation.line().await, "OK");
    assert_eq!(conversation.line().await, "0");

    conversation.send("find nomatch").await;
    assert_eq!(conversation.line().await, "OK");
    assert_eq!(conversation.line().await, "");

    conversation.send("ping").await;
    assert_eq!(conversation.line().await, "OK");
    assert_eq!(conversation.line().await, "pong");
}

#[tokio::test]
async fn test_download_followed_by_text_stays_framed() {
    let mut conversation = Conversation::start();
    let payload = b"\n\r\n\rbinary\0bytes\n".to_vec();
    std::fs::write(conversation.root.join("tricky.bin"), &payload).unwrap();

    conversation.send("download tricky.bin").await;
    conversation.send("pwd").await;

    assert_eq!(conversation.line().await, "OK");
    let length = read_length(&mut conversation.peer).await.unwrap();
    assert_eq!(length, payload.len() as i64);
    let mut received = vec![0u8; length as usize];
    conversation.peer.read_exact(&mut received).await.unwrap();
    assert_eq!(received, payload);

    assert_eq!(conversation.line().await, "OK");
    assert_eq!(conversation.line().await, ".");
}

#[tokio::test]
async fn test_negative_upload_length_is_fatal() {
    let mut conversation = Conversation::start();
    conversation.send("upload evil.bin").await;
    assert_eq!(conversation.line().await, "OK");
    conversation
        .peer
        .write_all(&(-1i64).to_be_bytes())
        .await
        .unwrap();

    let root = conversation.root.clone();
    let result = conversation.finish().await;
    assert!(matches!(result, Err(SessionError::NegativeLength(-1))));
    assert!(!root.join("evil.bin").exists());
}

#[tokio::test]
async fn test_quit_is_clean() {
    let mut conversation = Conversation::start();
    conversation.send("quit").await;
    assert_eq!(conversation.line().await, "OK");
    let end = conversation.worker.await.unwrap().unwrap();
    assert_eq!(end, SessionEnd::DisconnectedClean);
}

#[tokio::test]
async fn test_audit_records_request_and_status() {
    let audit_dir = tempfile::tempdir().unwrap();
    let audit_path = audit_dir.path().join("server.log");
    let audit = Arc::new(AuditLog::open(&audit_path).unwrap());

    let mut conversation = Conversation::start_with_audit(audit);
    conversation.send("  mkdir   photos  ").await;
    assert_eq!(conversation.line().await, "OK");
    conversation.send("show missing.txt").await;
    assert_eq!(conversation.line().await, "KO");
    conversation.send("quit").await;
    assert_eq!(conversation.line().await, "OK");
    conversation.worker.await.unwrap().unwrap();

    let log = std::fs::read_to_string(&audit_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("] [10.0.0.1] [RECV: mkdir photos -> RESP: OK]"));
    assert!(lines[1].ends_with("] [10.0.0.1] [RECV: show missing.txt -> RESP: KO]"));
    assert!(lines[2].ends_with("] [10.0.0.1] [RECV: quit -> RESP: OK]"));
}
