// src/constants.rs

pub const DEFAULT_LISTEN_PORT: u16 = 2121;
pub const DEFAULT_CONFIG_PATH: &str = "rouillefsd.toml";
pub const DEFAULT_ROOT_DIR: &str = ".";
pub const DEFAULT_AUDIT_LOG: &str = "server.log";

pub const STATUS_OK: &str = "OK";
pub const STATUS_KO: &str = "KO";

/// Chunk size used by every binary copy, whatever the direction.
pub const COPY_CHUNK_SIZE: usize = 4096;
/// Size in bytes of the big-endian length field preceding a binary block.
pub const LENGTH_FIELD_SIZE: usize = 8;

pub const HEAD_TAIL_DEFAULT_LINES: usize = 10;
pub const HEAD_TAIL_MAX_LINES: usize = 5000;
pub const TREE_MAX_ITEMS: usize = 20000;
pub const FIND_MAX_RESULTS: usize = 5000;

pub const AUDIT_SERVER_PEER: &str = "SERVER";
