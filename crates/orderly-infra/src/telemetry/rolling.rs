//! Size-rolled log file
//!
//! The live file keeps its configured name. When it grows past the size limit
//! it is renamed to `<name>.1` (older backups shift up), optionally gzipped,
//! and backups beyond the count or age limits are removed.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use orderly_core::LogConfig;

const BYTES_PER_MB: u64 = 1024 * 1024;
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Rolling limits. Zero backups or no age keeps every backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RollingPolicy {
    pub max_bytes: usize,
    pub max_backups: usize,
    pub max_age: Option<Duration>,
    pub compress: bool,
}

impl RollingPolicy {
    pub(crate) fn from_config(config: &LogConfig) -> Self {
        let max_size_mb = if config.max_size_mb == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            config.max_size_mb
        };

        Self {
            max_bytes: usize::try_from(max_size_mb.saturating_mul(BYTES_PER_MB))
                .unwrap_or(usize::MAX),
            max_backups: if config.max_backups == 0 {
                usize::MAX
            } else {
                config.max_backups
            },
            max_age: (config.max_age_days > 0)
                .then(|| Duration::from_secs(config.max_age_days.saturating_mul(SECS_PER_DAY))),
            compress: config.compress,
        }
    }
}

/// Log file writer enforcing a [`RollingPolicy`]
pub(crate) struct RollingFile {
    path: PathBuf,
    policy: RollingPolicy,
    inner: FileRotate<AppendCount>,
    written_since_prune: usize,
}

impl RollingFile {
    /// Open (or create) the live file, dropping backups that are already too old.
    pub(crate) fn open(path: &Path, policy: RollingPolicy) -> io::Result<Self> {
        let path = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir)?;
                path.to_path_buf()
            }
            _ => Path::new(".").join(path),
        };

        OpenOptions::new().create(true).append(true).open(&path)?;

        if let Some(max_age) = policy.max_age {
            prune_expired(&path, max_age)?;
        }

        let inner = build(&path, &policy);
        Ok(Self {
            path,
            policy,
            inner,
            written_since_prune: 0,
        })
    }

    /// Remove aged backups after a roll. The rotator is rebuilt when anything
    /// was removed so its view of the backups matches the directory.
    fn prune(&mut self) -> io::Result<()> {
        self.written_since_prune = 0;

        let Some(max_age) = self.policy.max_age else {
            return Ok(());
        };
        if prune_expired(&self.path, max_age)? > 0 {
            self.inner.flush()?;
            self.inner = build(&self.path, &self.policy);
        }
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;

        // At least one roll has happened once a full limit has been written
        self.written_since_prune = self.written_since_prune.saturating_add(written);
        if self.written_since_prune > self.policy.max_bytes {
            self.prune()?;
        }

        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn build(path: &Path, policy: &RollingPolicy) -> FileRotate<AppendCount> {
    let compression = if policy.compress {
        Compression::OnRotate(0)
    } else {
        Compression::None
    };

    FileRotate::new(
        path,
        AppendCount::new(policy.max_backups),
        ContentLimit::BytesSurpassed(policy.max_bytes),
        compression,
        #[cfg(unix)]
        None,
    )
}

/// Delete backups of `path` (`<name>.N`, `<name>.N.gz`) older than `max_age`
fn prune_expired(path: &Path, max_age: Duration) -> io::Result<usize> {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return Ok(0);
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let backup_prefix = format!("{name}.");

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_backup = entry
            .file_name()
            .to_str()
            .is_some_and(|file| file.starts_with(&backup_prefix));
        if !is_backup {
            continue;
        }

        let age = entry
            .metadata()?
            .modified()?
            .elapsed()
            .unwrap_or_default();
        if age > max_age {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}
