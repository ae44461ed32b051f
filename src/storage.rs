//! Date-partitioned snapshot storage.
//!
//! Images land at `<root>/<host>/<YYYY-MM-DD>/img_<YYYYMMDDHHMMSS>.jpg`. A file
//! is created exclusively and written under an exclusive `flock`, so two
//! writers racing for the same second cannot clobber each other: the loser
//! gets `WriteConflictError` immediately.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{info, warn};
use nix::fcntl::{Flock, FlockArg};

use crate::constants::{
    DATE_FORMAT, IMAGE_EXTENSION, IMAGE_FILE_MODE, IMAGE_PREFIX, IMAGE_TIMESTAMP_FORMAT,
};
use crate::error::{CamError, Result};
use crate::protocol::check_host;

pub fn image_dir(root: &Path, host: &str, now: NaiveDateTime) -> PathBuf {
    root.join(host).join(now.format(DATE_FORMAT).to_string())
}

pub fn image_name(now: NaiveDateTime) -> String {
    format!(
        "{}{}.{}",
        IMAGE_PREFIX,
        now.format(IMAGE_TIMESTAMP_FORMAT),
        IMAGE_EXTENSION
    )
}

/// Create `path` and its parents. An existing directory is fine.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    if let Err(e) = tokio::fs::create_dir_all(path).await {
        // Lost a creation race to another process.
        if tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir()) {
            return Ok(());
        }
        return Err(CamError::DirectoryError(format!(
            "cannot create {}: {}",
            path.display(),
            e
        )));
    }

    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| CamError::DirectoryError(format!("cannot stat {}: {}", path.display(), e)))?;
    if !meta.is_dir() {
        return Err(CamError::DirectoryError(format!(
            "{} exists and is not a directory",
            path.display()
        )));
    }
    Ok(())
}

/// Write `data` to a new file at `path`. Never overwrites and never waits on
/// another writer's lock.
pub fn write_exclusive(path: &Path, data: &[u8]) -> Result<()> {
    write_new_file(path, |file| {
        file.write_all(data)?;
        file.flush()
    })
}

/// Create `path` exclusively, lock it and hand it to `fill`. A failed fill
/// removes the partial file so the name is free again.
fn write_new_file<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(IMAGE_FILE_MODE)
        .open(path)
        .map_err(|e| CamError::WriteConflictError(format!("{}: {}", path.display(), e)))?;

    let mut locked = match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
        Ok(locked) => locked,
        Err((_, errno)) => {
            return Err(CamError::WriteConflictError(format!(
                "{}: lock held elsewhere: {}",
                path.display(),
                errno
            )));
        }
    };

    if let Err(e) = fill(&mut locked) {
        if let Err(rm) = std::fs::remove_file(path) {
            warn!("cannot remove partial image {}: {}", path.display(), rm);
        }
        return Err(CamError::WriteConflictError(format!("{}: {}", path.display(), e)));
    }

    // Dropping the guard releases the lock and closes the file.
    Ok(())
}

/// Persist one snapshot taken at `now` and return its file name.
pub async fn store_image(
    root: &Path,
    host: &str,
    now: NaiveDateTime,
    data: Vec<u8>,
) -> Result<String> {
    check_host(host)?;
    let dir = image_dir(root, host, now);
    ensure_dir(&dir).await?;

    let name = image_name(now);
    let path = dir.join(&name);

    let target = path.clone();
    let written = tokio::task::spawn_blocking(move || write_exclusive(&target, &data)).await?;
    if let Err(e) = written {
        warn!("Failed to write image file {}: {}", name, e);
        return Err(e);
    }

    info!("Saved snapshot {}", path.display());
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scratch_dir(tag: &str) -> PathBuf {
        static SEQ: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "foscam-storage-{}-{}-{}",
            tag,
            std::process::id(),
            SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|d| d.and_hms_opt(h, mi, s))
            .unwrap()
    }

    #[test]
    fn path_is_root_host_and_iso_date() {
        let now = at(2024, 3, 5, 10, 15, 30);
        assert_eq!(
            image_dir(Path::new("/srv/img"), "cam1.local", now),
            PathBuf::from("/srv/img/cam1.local/2024-03-05")
        );
        assert_eq!(image_name(now), "img_20240305101530.jpg");
    }

    #[test]
    fn name_is_zero_padded() {
        assert_eq!(image_name(at(2025, 1, 2, 3, 4, 5)), "img_20250102030405.jpg");
    }

    #[tokio::test]
    async fn ensure_dir_is_idempotent() {
        let dir = scratch_dir("idem").join("a").join("b");
        ensure_dir(&dir).await.unwrap();
        ensure_dir(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn ensure_dir_rejects_a_file() {
        let base = scratch_dir("file");
        std::fs::create_dir_all(&base).unwrap();
        let path = base.join("occupied");
        std::fs::write(&path, b"x").unwrap();

        let err = ensure_dir(&path).await.unwrap_err();
        assert!(matches!(err, CamError::DirectoryError(_)));
    }

    #[test]
    fn existing_file_is_never_overwritten() {
        let base = scratch_dir("exists");
        std::fs::create_dir_all(&base).unwrap();
        let path = base.join("img.jpg");

        write_exclusive(&path, b"first").unwrap();
        let err = write_exclusive(&path, b"second").unwrap_err();
        assert!(matches!(err, CamError::WriteConflictError(_)));
        assert_eq!(std::fs::read(&path).unwrap(), b"first");
    }

    #[test]
    fn racing_writers_leave_exactly_one_image() {
        let base = scratch_dir("race");
        std::fs::create_dir_all(&base).unwrap();
        let path = base.join("img_20240305101530.jpg");

        let payloads: Vec<Vec<u8>> = vec![vec![0xAA; 256 * 1024], vec![0xBB; 256 * 1024]];
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(payloads.len()));

        let handles: Vec<_> = payloads
            .iter()
            .cloned()
            .map(|data| {
                let path = path.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    write_exclusive(&path, &data).map(|_| data)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        let losers = results
            .iter()
            .filter(|r| matches!(r, Err(CamError::WriteConflictError(_))))
            .count();

        assert_eq!(winners.len(), 1);
        assert_eq!(losers, 1);
        assert_eq!(&std::fs::read(&path).unwrap(), winners[0]);
    }

    #[test]
    fn failed_write_frees_the_name() {
        let base = scratch_dir("partial");
        std::fs::create_dir_all(&base).unwrap();
        let path = base.join("img_20240305101530.jpg");

        let err = write_new_file(&path, |file| {
            file.write_all(b"half a jp")?;
            Err(io::Error::other("disk full"))
        })
        .unwrap_err();
        assert!(matches!(err, CamError::WriteConflictError(_)));
        assert!(!path.exists());

        write_exclusive(&path, b"whole jpeg").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"whole jpeg");
    }

    #[tokio::test]
    async fn host_cannot_escape_the_root() {
        let base = scratch_dir("escape");
        let root = base.join("root");
        let now = at(2024, 3, 5, 10, 15, 30);

        for host in ["127.0.0.1/../..", "..", "cam\\.."] {
            let err = store_image(&root, host, now, b"jpeg".to_vec())
                .await
                .unwrap_err();
            assert!(matches!(err, CamError::InvalidArgument(_)), "{host:?}");
        }
        assert!(!base.join("2024-03-05").exists());
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn store_image_returns_the_file_name() {
        let root = scratch_dir("store");
        let now = at(2024, 3, 5, 10, 15, 30);

        let name = store_image(&root, "cam1.local", now, b"jpeg".to_vec())
            .await
            .unwrap();
        assert_eq!(name, "img_20240305101530.jpg");

        let path = root.join("cam1.local/2024-03-05/img_20240305101530.jpg");
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");

        let again = store_image(&root, "cam1.local", now, b"other".to_vec()).await;
        assert!(matches!(again, Err(CamError::WriteConflictError(_))));
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");
    }
}
