use crate::constants::COPY_CHUNK_SIZE;
use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{reject, require_file, require_param, resolve_path};
use crate::core_network::SessionError;
use crate::session::Session;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Handles the `hash` command: SHA-256 of a regular file, lowercase hex.
pub async fn handle_hash_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    let digest = match require_param(&arg) {
        Ok(arg) => {
            let path = resolve_path(session, arg);
            sha256_hex(&path).await
        }
        Err(e) => Err(e),
    };

    match digest {
        Ok(digest) => {
            session.reply_ok().await?;
            session.send_line(&digest).await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Hash, e).await,
    }
}

async fn sha256_hex(path: &Path) -> Result<String, CommandError> {
    require_file(path).await?;

    let mut file = File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; COPY_CHUNK_SIZE];
    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    let digest = hasher.finalize();
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}
