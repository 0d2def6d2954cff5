//! A `Session` owns everything one compilation needs: the source map and
//! the diagnostic `Handler` (`§10.3`), threaded by reference through the
//! pipeline exactly as the teacher's driver threads its own `Session`.

use faxc_util::diagnostic::Handler;
use faxc_util::span::{FileId, SourceMap};

pub struct Session {
    pub source_map: SourceMap,
    pub handler: Handler,
}

impl Session {
    pub fn new() -> Self {
        Self { source_map: SourceMap::new(), handler: Handler::new() }
    }

    /// Registers one source file and returns the `FileId` downstream stages
    /// tag every span with.
    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<std::sync::Arc<str>>) -> FileId {
        self.source_map.add_file(name, content)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
