//! Overwrite-guarded persistence of rendered artifacts.
//!
//! Content is written to a temporary file in the target directory and then
//! renamed into place, so a target is either untouched or fully replaced.
//! With [`OverwritePolicy::SkipIfExists`] the rename refuses to clobber, which
//! also covers a file appearing between the existence check and the rename.

use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::GenerationError;
use crate::planner::OverwritePolicy;

/// Result of one successful write call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteOutcome {
    Written,
    /// Target existed and the policy said to keep it
    Skipped,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileWriter;

impl FileWriter {
    pub fn new() -> Self {
        FileWriter
    }

    /// Persist `content` at `path` under `policy`.
    pub fn write(
        &self,
        path: &Path,
        content: &str,
        policy: OverwritePolicy,
    ) -> Result<WriteOutcome, GenerationError> {
        if policy == OverwritePolicy::SkipIfExists && path.exists() {
            debug!(path = %path.display(), "target exists, skipping");
            return Ok(WriteOutcome::Skipped);
        }

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| GenerationError::write(path, e))?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| GenerationError::write(path, e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| GenerationError::write(path, e))?;
        // temp files are created owner-only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))
                .map_err(|e| GenerationError::write(path, e))?;
        }

        let persisted = match policy {
            OverwritePolicy::Overwrite => tmp.persist(path),
            OverwritePolicy::SkipIfExists => tmp.persist_noclobber(path),
        };
        match persisted {
            Ok(_) => {
                info!(path = %path.display(), bytes = content.len(), "artifact written");
                Ok(WriteOutcome::Written)
            }
            Err(err) if policy == OverwritePolicy::SkipIfExists
                && err.error.kind() == ErrorKind::AlreadyExists =>
            {
                debug!(path = %path.display(), "target appeared before rename, skipping");
                Ok(WriteOutcome::Skipped)
            }
            Err(err) => Err(GenerationError::write(path, err.error)),
        }
    }
}
