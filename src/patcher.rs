use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("page {0} not found")]
    PageNotFound(PathBuf),
    #[error("marker {0:?} not found in page")]
    MarkerNotFound(String),
    #[error("end marker appears before start marker")]
    MarkersOutOfOrder,
    #[error("failed to access page {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// The pair of literal tokens delimiting the generated region of a page.
#[derive(Debug, Clone, Copy)]
pub struct Markers<'a> {
    pub start: &'a str,
    pub end: &'a str,
}

/// A fragment and the markers it goes between.
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    pub markers: Markers<'a>,
    pub fragment: &'a str,
}

/// Replaces everything between the first start marker and the first end
/// marker with `fragment`. Both markers are kept.
pub fn splice(html: &str, fragment: &str, markers: Markers<'_>) -> Result<String, PatchError> {
    let start = html
        .find(markers.start)
        .ok_or_else(|| PatchError::MarkerNotFound(markers.start.to_string()))?;
    let end = html
        .find(markers.end)
        .ok_or_else(|| PatchError::MarkerNotFound(markers.end.to_string()))?;

    let content_start = start + markers.start.len();
    if end < content_start {
        return Err(PatchError::MarkersOutOfOrder);
    }

    let mut patched = String::with_capacity(content_start + fragment.len() + html.len() - end);
    patched.push_str(&html[..content_start]);
    patched.push_str(fragment);
    patched.push_str(&html[end..]);
    Ok(patched)
}

/// Splices `fragment` into the page at `path` and rewrites it. The file is
/// left untouched on any error.
pub fn patch_page(path: &Path, fragment: &str, markers: Markers<'_>) -> Result<(), PatchError> {
    patch_regions(path, &[Region { markers, fragment }])
}

/// Splices every region, in order, then rewrites the page once. If any
/// region fails the file is left untouched.
pub fn patch_regions(path: &Path, regions: &[Region<'_>]) -> Result<(), PatchError> {
    let html = match std::fs::read_to_string(path) {
        Ok(html) => html,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PatchError::PageNotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(PatchError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut patched = html;
    for region in regions {
        patched = splice(&patched, region.fragment, region.markers)?;
    }

    std::fs::write(path, patched).map_err(|source| PatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Wrote {}", path.display());
    Ok(())
}
