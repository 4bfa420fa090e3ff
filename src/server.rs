use crate::config::Config;
use crate::constants::AUDIT_SERVER_PEER;
use crate::core_fscommand::CommandCatalog;
use crate::core_log::AuditLog;
use crate::core_network::network::{self, ServerContext};
use anyhow::{Context, Result};
use log::{info, warn};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// A bound, not yet running server.
pub struct Server {
    listener: TcpListener,
    context: Arc<ServerContext>,
}

impl Server {
    /// Prepares the sandbox root and the audit log, builds the command
    /// catalog and binds the listening socket.
    ///
    /// # Arguments
    ///
    /// * `config` - The server configuration, CLI overrides already applied.
    ///
    /// # Returns
    ///
    /// The bound server, or an error if the root cannot be created, the audit
    /// log cannot be opened or the port is unavailable.
    pub async fn bind(config: &Config) -> Result<Self> {
        let root_dir = prepare_root(Path::new(&config.server.root_dir))?;
        info!("Sandbox root: {}", root_dir.display());

        let audit = if config.server.audit_enabled {
            AuditLog::open(&config.server.audit_log).with_context(|| {
                format!("Failed to open audit log: {}", config.server.audit_log)
            })?
        } else {
            AuditLog::disabled()
        };
        if !audit.is_enabled() {
            warn!("Audit log disabled");
        }

        let listener = TcpListener::bind(("0.0.0.0", config.server.listen_port))
            .await
            .with_context(|| format!("Failed to bind port {}", config.server.listen_port))?;

        let context = ServerContext {
            root_dir,
            catalog: Arc::new(CommandCatalog::new()),
            audit: Arc::new(audit),
            idle_timeout: config.server.idle_timeout_secs.map(Duration::from_secs),
        };

        Ok(Self {
            listener,
            context: Arc::new(context),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn root_dir(&self) -> &Path {
        &self.context.root_dir
    }

    /// Serves connections until the process is stopped.
    pub async fn run(self) -> Result<()> {
        let port = self.local_addr()?.port();
        self.context
            .audit
            .record(AUDIT_SERVER_PEER, &format!("START port={}", port));

        network::start_server(self.listener, self.context).await?;
        Ok(())
    }
}

/// Creates the root if needed and returns its canonical absolute path.
pub fn prepare_root(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)
        .with_context(|| format!("Failed to create root directory: {}", root.display()))?;
    root.canonicalize()
        .with_context(|| format!("Failed to resolve root directory: {}", root.display()))
}

/// Runs the server with the provided configuration.
pub async fn run(config: Config) -> Result<()> {
    Server::bind(&config).await?.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_root_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let wanted = dir.path().join("srv").join("files");

        let root = prepare_root(&wanted).unwrap();
        assert!(root.is_absolute());
        assert!(root.is_dir());
        assert_eq!(root, wanted.canonicalize().unwrap());
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.listen_port = 0;
        config.server.root_dir = dir.path().join("root").to_string_lossy().into_owned();
        config.server.audit_enabled = false;

        let server = Server::bind(&config).await.unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
        assert!(server.root_dir().is_dir());
    }
}
