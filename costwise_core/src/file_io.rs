//! # File I/O Module
//!
//! Persists businesses between wizard sessions, with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Prevent concurrent edits on shared drives
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! Businesses are saved as `.cwb` (Costwise business) files containing
//! JSON. Lock files use the `.cwb.lock` extension with metadata about
//! who holds the lock.
//!
//! Concurrent edits of the same file resolve through the lock; once a
//! business is loaded into memory the policy is last-write-wins, which
//! is documented rather than guaranteed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use costwise_core::business::Business;
//! use costwise_core::file_io::{load_business, save_business, FileLock};
//! use std::path::Path;
//!
//! let business = Business::new("Dana Baker", "Corner Lemonade");
//! let path = Path::new("lemonade.cwb");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "dana@example.com").unwrap();
//! save_business(&business, path).unwrap();
//!
//! // Lock is released when dropped
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::business::{Business, SCHEMA_VERSION};
use crate::errors::{EngineError, EngineResult};

/// Lock file metadata stored in .cwb.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Get the hostname of the current machine
fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata for user visibility
pub struct FileLock {
    /// Path to the business file
    business_path: PathBuf,
    /// Path to the lock file
    lock_path: PathBuf,
    /// The underlying file handle (keeps OS lock)
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a business file.
    ///
    /// # Errors
    ///
    /// [`EngineError::FileLocked`] when another live process holds the
    /// lock; stale locks (dead pid, or older than a day) are taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> EngineResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(EngineError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                // Lock is stale, we can take it over
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                EngineError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        // Exclusive OS-level lock, non-blocking
        lock_file.try_lock_exclusive().map_err(|_| {
            EngineError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| {
            EngineError::SerializationError {
                reason: e.to_string(),
            }
        })?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            EngineError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            EngineError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            business_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// Get the path to the business file
    pub fn business_path(&self) -> &Path {
        &self.business_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Remove the lock file; OS lock releases with the handle
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Get the lock file path for a business file
fn lock_path_for(business_path: &Path) -> PathBuf {
    let mut lock_path = business_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// Read lock info from a lock file
fn read_lock_info(lock_path: &Path) -> EngineResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        EngineError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        EngineError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| EngineError::SerializationError {
        reason: e.to_string(),
    })
}

/// Check if a lock is stale (holder no longer running, or too old)
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
        }
    }

    // Locks older than a day are stale regardless of origin
    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

/// Save a business to a file with atomic write semantics.
///
/// Serializes to pretty JSON, writes a `.tmp` sibling, fsyncs, then
/// renames over the target so an interrupted save never corrupts an
/// existing file.
pub fn save_business(business: &Business, path: &Path) -> EngineResult<()> {
    let json = serde_json::to_string_pretty(business).map_err(|e| {
        EngineError::SerializationError {
            reason: e.to_string(),
        }
    })?;

    let tmp_path = path.with_extension("cwb.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        EngineError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        EngineError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        EngineError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        EngineError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a business from a file.
///
/// # Errors
///
/// * [`EngineError::VersionMismatch`] - file schema is incompatible
/// * [`EngineError::SerializationError`] - invalid JSON
/// * [`EngineError::FileError`] - I/O failure
pub fn load_business(path: &Path) -> EngineResult<Business> {
    let mut file = File::open(path)
        .map_err(|e| EngineError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| EngineError::file_error("read", path.display().to_string(), e.to_string()))?;

    let business: Business =
        serde_json::from_str(&contents).map_err(|e| EngineError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&business.meta.version)?;

    Ok(business)
}

/// Load a business, reporting whether another user holds its lock.
///
/// # Returns
///
/// * `Ok((Business, None))` - loaded, no lock held
/// * `Ok((Business, Some(LockInfo)))` - loaded, but read-only for now
pub fn load_business_with_lock_check(path: &Path) -> EngineResult<(Business, Option<LockInfo>)> {
    let business = load_business(path)?;
    let lock_info = FileLock::check(path);
    Ok((business, lock_info))
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> EngineResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(EngineError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(EngineError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // For 0.x versions, a newer minor than we support is a breaking change
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(EngineError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_business_path(name: &str) -> PathBuf {
        temp_dir().join(format!("costwise_test_{}.cwb", name))
    }

    #[test]
    fn test_lock_path_generation() {
        let path = Path::new("/path/to/lemonade.cwb");
        assert_eq!(lock_path_for(path), Path::new("/path/to/lemonade.cwb.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("test@example.com");
        assert_eq!(info.user_id, "test@example.com");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_business_path("roundtrip");

        let business = Business::new("Test Owner", "Test Shop");
        save_business(&business, &path).unwrap();

        let loaded = load_business(&path).unwrap();
        assert_eq!(loaded.meta.owner, "Test Owner");
        assert_eq!(loaded.meta.name, "Test Shop");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_business_path("atomic");
        let tmp_path = path.with_extension("cwb.tmp");

        let business = Business::new("Test", "Shop");
        save_business(&business, &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_business_path("lock_test");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.user_id, "test@example.com");

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());

        // Different major should fail
        assert!(validate_version("1.0.0").is_err());

        // Newer minor (in 0.x) should fail
        assert!(validate_version("0.2.0").is_err());
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_business_path("lock_check");

        let business = Business::new("Test", "Shop");
        save_business(&business, &path).unwrap();

        let (loaded, lock_info) = load_business_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.name, "Shop");
        assert!(lock_info.is_none());

        let _ = fs::remove_file(&path);
    }
}
