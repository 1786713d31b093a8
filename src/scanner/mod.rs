pub mod ignore;
pub mod walker;

pub use ignore::{DEFAULT_IGNORE_FILE, IgnoreRules};
pub use walker::{FileEntry, scan_repository};
