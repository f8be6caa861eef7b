/// Backend facts the finalize hooks of a field need to coerce values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionContext {
    /// Timestamps are stored time-zone aware (`timestamptz`); naive values
    /// are taken to be UTC.
    pub use_tz: bool,
}

impl Default for ConnectionContext {
    fn default() -> Self {
        Self { use_tz: true }
    }
}
