use chrono::Local;
use log::warn;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Append-only audit trail shared by every session.
///
/// One line per event: `[YYYY-MM-DD HH:MM:SS] [peer] [event]`. The file is
/// behind a mutex so concurrent sessions never interleave within a line.
/// Failures to write are logged and swallowed.
#[derive(Debug)]
pub struct AuditLog {
    file: Option<Mutex<File>>,
}

impl AuditLog {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some(Mutex::new(file)),
        })
    }

    /// An audit log that drops every event.
    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn record(&self, peer: &str, event: &str) {
        let Some(file) = &self.file else {
            return;
        };

        let line = format!(
            "[{}] [{}] [{}]\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            peer,
            event
        );

        match file.lock() {
            Ok(mut file) => {
                if let Err(e) = file.write_all(line.as_bytes()) {
                    warn!("Failed to write audit record: {}", e);
                }
            }
            Err(_) => warn!("Audit log lock poisoned, dropping event: {}", event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn assert_well_formed(line: &str) {
        // [2024-05-01 10:00:00] [peer] [event]
        assert!(line.starts_with('['), "bad line: {}", line);
        assert_eq!(&line[20..23], "] [", "bad line: {}", line);
        assert!(line.ends_with(']'), "bad line: {}", line);
    }

    #[test]
    fn test_record_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("server.log");
        let audit = AuditLog::open(&path).unwrap();

        audit.record("127.0.0.1", "CONNECT");
        audit.record("127.0.0.1", "RECV: ping -> RESP: OK");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] [127.0.0.1] [CONNECT]"));
        assert!(lines[1].ends_with("] [127.0.0.1] [RECV: ping -> RESP: OK]"));
        lines.iter().for_each(|line| assert_well_formed(line));
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        AuditLog::open(&path).unwrap().record("SERVER", "START port=2121");
        AuditLog::open(&path).unwrap().record("SERVER", "START port=2122");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_concurrent_records_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        let audit = Arc::new(AuditLog::open(&path).unwrap());

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let audit = Arc::clone(&audit);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        audit.record(&format!("10.0.0.{}", worker), &format!("event {}", i));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 400);
        lines.iter().for_each(|line| assert_well_formed(line));
    }

    #[test]
    fn test_disabled_log_is_silent() {
        let audit = AuditLog::disabled();
        assert!(!audit.is_enabled());
        audit.record("127.0.0.1", "CONNECT");
    }
}
