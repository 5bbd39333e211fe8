//! Downloaded files and their lifetime.
//!
//! Every file a request writes lives in the download dir under the request's
//! stem (`<stem>.mp4`, `<stem>.mp4.part`, `<stem>.f22.ytdl`, ...). The finished
//! file is owned by a [`DownloadedArtifact`], which deletes it when dropped.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extensions yt-dlp uses for in-progress or bookkeeping files
const PARTIAL_SUFFIXES: &[&str] = &[".part", ".ytdl", ".temp", ".tmp"];

/// Finished video on disk, deleted on drop.
#[derive(Debug)]
pub struct DownloadedArtifact {
    path: PathBuf,
    title: Option<String>,
    extension: String,
    armed: bool,
}

impl DownloadedArtifact {
    pub fn new(path: PathBuf, title: Option<String>) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp4")
            .to_string();
        Self {
            path,
            title: title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            extension,
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Title reported by the extractor, if any
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Deletes the file now. A file that is already gone is not an error.
    pub fn remove(mut self) -> std::io::Result<()> {
        self.armed = false;
        remove_if_exists(&self.path)
    }

    /// Moves the file to `dest` and disarms deletion.
    ///
    /// Falls back to copy + delete when a rename crosses filesystems.
    pub fn persist_to(mut self, dest: &Path) -> std::io::Result<PathBuf> {
        if fs_err::rename(&self.path, dest).is_err() {
            fs_err::copy(&self.path, dest)?;
            remove_if_exists(&self.path)?;
        }
        self.armed = false;
        Ok(dest.to_path_buf())
    }
}

impl Drop for DownloadedArtifact {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match remove_if_exists(&self.path) {
            Ok(()) => log::debug!("🗑️ Removed artifact {}", self.path.display()),
            Err(e) => log::warn!("Failed to remove artifact {}: {}", self.path.display(), e),
        }
    }
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs_err::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

fn is_partial(name: &str) -> bool {
    PARTIAL_SUFFIXES.iter().any(|s| name.ends_with(s))
}

fn request_files(dir: &Path, stem: &str) -> Vec<PathBuf> {
    let Ok(entries) = fs_err::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(stem))
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect()
}

/// Finds the finished file a request produced, ignoring partial files.
pub fn find_request_file(dir: &Path, stem: &str) -> Option<PathBuf> {
    request_files(dir, stem)
        .into_iter()
        .find(|path| !is_partial(&path.to_string_lossy()))
}

/// Removes every file that belongs to a request. Returns how many were removed.
pub fn cleanup_request_files(dir: &Path, stem: &str) -> usize {
    remove_all(request_files(dir, stem), stem)
}

/// Removes only in-progress files of a request, keeping the finished one.
pub fn cleanup_partial_files(dir: &Path, stem: &str) -> usize {
    let partials = request_files(dir, stem)
        .into_iter()
        .filter(|path| is_partial(&path.to_string_lossy()))
        .collect();
    remove_all(partials, stem)
}

fn remove_all(paths: Vec<PathBuf>, stem: &str) -> usize {
    let mut removed = 0;
    for path in paths {
        match remove_if_exists(&path) {
            Ok(()) => removed += 1,
            Err(e) => log::warn!("Failed to remove leftover {}: {}", path.display(), e),
        }
    }
    if removed > 0 {
        log::debug!("🧹 Removed {} leftover file(s) for {}", removed, stem);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"data").unwrap();
        path
    }

    #[test]
    fn test_drop_deletes_file() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "abc.mp4");
        {
            let artifact = DownloadedArtifact::new(path.clone(), Some("Demo".into()));
            assert!(artifact.exists());
            assert_eq!(artifact.extension(), "mp4");
            assert_eq!(artifact.title(), Some("Demo"));
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "abc.webm");
        std::fs::remove_file(&path).unwrap();
        assert!(DownloadedArtifact::new(path, None).remove().is_ok());
    }

    #[test]
    fn test_blank_title_is_none() {
        let dir = TempDir::new().unwrap();
        let artifact = DownloadedArtifact::new(touch(&dir, "abc.mp4"), Some("   ".into()));
        assert_eq!(artifact.title(), None);
    }

    #[test]
    fn test_persist_to_disarms_deletion() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let path = touch(&dir, "abc.mp4");
        let dest = out.path().join("kept.mp4");

        let kept = DownloadedArtifact::new(path.clone(), None).persist_to(&dest).unwrap();
        assert_eq!(kept, dest);
        assert!(dest.exists());
        assert!(!path.exists());
    }

    #[test]
    fn test_find_request_file_skips_partials() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "abc.mp4.part");
        touch(&dir, "other.mp4");
        assert!(find_request_file(dir.path(), "abc").is_none());

        let done = touch(&dir, "abc.mp4");
        assert_eq!(find_request_file(dir.path(), "abc"), Some(done));
    }

    #[test]
    fn test_cleanup_only_touches_own_stem() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "abc.mp4.part");
        touch(&dir, "abc.f18.ytdl");
        let foreign = touch(&dir, "xyz.mp4");

        assert_eq!(cleanup_request_files(dir.path(), "abc"), 2);
        assert!(foreign.exists());
        assert_eq!(cleanup_request_files(dir.path(), "abc"), 0);
    }

    #[test]
    fn test_cleanup_partials_keeps_finished_file() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "abc.mp4.part");
        let done = touch(&dir, "abc.mp4");

        assert_eq!(cleanup_partial_files(dir.path(), "abc"), 1);
        assert!(done.exists());
    }
}
