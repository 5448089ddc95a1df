use std::path::{Path, PathBuf};

/// Resolve `configured` against `base_dir` unless it is already absolute.
pub fn resolve_path(base_dir: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        base_dir.join(configured)
    }
}
