use thiserror::Error;

#[derive(Debug, Error)]
pub enum FatscopeError {
    #[error("Truncated record at offset {offset:#x}: needed {needed} bytes, got {got}")]
    TruncatedRecord {
        offset: u64,
        needed: usize,
        got: usize,
    },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cluster chain: {0}")]
    CorruptChain(String),

    #[error("Cluster chain cycle at cluster {0}")]
    ChainCycle(u16),
}
