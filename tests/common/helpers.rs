//! Test helpers for building configuration and on-disk fixtures

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use clipdrop::core::config::AppConfig;

/// Netscape cookie file scoped to youtube.com, large enough to pass the probe
pub const VALID_COOKIES: &str = "# Netscape HTTP Cookie File\n\
    .youtube.com\tTRUE\t/\tTRUE\t1999999999\tSID\tabcdefghijklmnopqrstuvwxyz\n\
    .youtube.com\tTRUE\t/\tTRUE\t1999999999\tHSID\tzyxwvutsrqponmlkjihgfedcba\n";

/// Separate scratch and config directories, so "download dir is empty"
/// checks are not disturbed by the cookie file.
pub struct TestDirs {
    pub downloads: TempDir,
    pub config: TempDir,
}

impl TestDirs {
    pub fn new() -> Self {
        Self {
            downloads: TempDir::new().unwrap(),
            config: TempDir::new().unwrap(),
        }
    }

    pub fn cookies_path(&self) -> PathBuf {
        self.config.path().join("cookies.txt")
    }

    /// Number of entries left in the download dir
    pub fn download_count(&self) -> usize {
        std::fs::read_dir(self.downloads.path()).unwrap().count()
    }
}

/// Builds an `AppConfig` pointing at the test directories, plus overrides.
pub fn test_config(dirs: &TestDirs, overrides: &[(&str, &str)]) -> AppConfig {
    let mut map: HashMap<String, String> = HashMap::new();
    map.insert(
        "DOWNLOAD_FOLDER".to_string(),
        dirs.downloads.path().to_string_lossy().into_owned(),
    );
    map.insert(
        "YTDL_COOKIES_FILE".to_string(),
        dirs.cookies_path().to_string_lossy().into_owned(),
    );
    for (k, v) in overrides {
        map.insert(k.to_string(), v.to_string());
    }
    AppConfig::from_lookup(|key| map.get(key).cloned()).unwrap()
}

pub fn write_valid_cookies(path: &Path) {
    std::fs::write(path, VALID_COOKIES).unwrap();
}
