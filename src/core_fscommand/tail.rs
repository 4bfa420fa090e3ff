use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{
    parse_line_count, read_last_lines, reject, require_param, resolve_path, send_counted_lines,
};
use crate::core_network::SessionError;
use crate::session::Session;

/// Handles `tail <file> [n]`: the last `n` lines of a text file, same count
/// rules as `head`.
pub async fn handle_tail_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    match last_lines(session, &arg).await {
        Ok(lines) => {
            session.reply_ok().await?;
            send_counted_lines(session, &lines).await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Tail, e).await,
    }
}

async fn last_lines(session: &mut Session, arg: &str) -> Result<Vec<String>, CommandError> {
    let mut parts = require_param(arg)?.split_whitespace();
    let file = parts.next().ok_or(CommandError::MissingArgument)?;
    let count = parse_line_count(parts.next());

    let path = resolve_path(session, file);
    read_last_lines(&path, count).await
}

#[cfg(test)]
mod tests {
    use crate::core_fscommand::test_support::Harness;
    use crate::core_fscommand::FsCommand;

    #[tokio::test]
    async fn test_tail_last_lines() {
        let mut harness = Harness::new();
        harness.write_file("log.txt", b"a\nb\nc\nd\n");
        harness.run(FsCommand::Tail, "log.txt 2").await;
        assert_eq!(harness.line().await, "OK");
        assert_eq!(harness.counted_lines().await, vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_tail_zero_sends_only_the_count() {
        let mut harness = Harness::new();
        harness.write_file("log.txt", b"a\nb\n");
        harness.run(FsCommand::Tail, "log.txt 0").await;
        assert_eq!(harness.line().await, "OK");
        assert_eq!(harness.line().await, "0");
        harness.assert_drained().await;
    }

    #[tokio::test]
    async fn test_tail_unparsable_count_uses_default() {
        let mut harness = Harness::new();
        let body: String = (0..12).map(|i| format!("{}\n", i)).collect();
        harness.write_file("log.txt", body.as_bytes());
        harness.run(FsCommand::Tail, "log.txt many").await;
        assert_eq!(harness.line().await, "OK");
        let lines = harness.counted_lines().await;
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "2");
        assert_eq!(lines[9], "11");
    }

    #[tokio::test]
    async fn test_tail_crlf_without_final_newline() {
        let mut harness = Harness::new();
        harness.write_file("win.txt", b"first\r\nsecond\r\nthird");
        harness.run(FsCommand::Tail, "win.txt 2").await;
        assert_eq!(harness.line().await, "OK");
        assert_eq!(harness.counted_lines().await, vec!["second", "third"]);
    }

    #[tokio::test]
    async fn test_tail_on_directory() {
        let mut harness = Harness::new();
        harness.mkdir("logs");
        harness.run(FsCommand::Tail, "logs 3").await;
        assert_eq!(harness.line().await, "KO");
        harness.assert_drained().await;
    }
}
