use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::PosterResult;

/// File extensions accepted as overlay assets.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "svg"];

/// Ordered, de-duplicated set of overlay asset paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetPool {
    paths: Vec<PathBuf>,
}

impl AssetPool {
    /// Build a pool from explicit paths, keeping first occurrences in order.
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut out: Vec<PathBuf> = Vec::new();
        for p in paths {
            if !out.contains(&p) {
                out.push(p);
            }
        }
        Self { paths: out }
    }

    /// List image files directly inside `dir`, sorted by file name.
    ///
    /// A missing directory yields an empty pool: templates are not required to ship overlays.
    pub fn discover(dir: &Path) -> PosterResult<Self> {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "no overlay asset directory");
            return Ok(Self::default());
        }

        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("list overlay assets in '{}'", dir.display()))?;
        let mut paths: Vec<PathBuf> = rd
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && has_image_extension(p))
            .collect();
        paths.sort();
        Ok(Self::from_paths(paths))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Find an asset by file name (`star.png`) or stem (`star`).
    pub fn find_by_name(&self, name: &str) -> Option<&Path> {
        let by = |f: fn(&Path) -> Option<&std::ffi::OsStr>| {
            self.paths
                .iter()
                .find(|p| f(p.as_path()).and_then(|s| s.to_str()) == Some(name))
        };
        by(Path::file_name)
            .or_else(|| by(Path::file_stem))
            .map(PathBuf::as_path)
    }
}

pub(crate) fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/pool.rs"]
mod tests;
