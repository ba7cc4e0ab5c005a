//! Figure lookup and raster conversion for question pool diagrams

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "svg"];

/// An index of the figure images available on disk, keyed by normalized
/// reference. Built once per run by scanning a single directory level.
#[derive(Debug)]
pub struct FigureLibrary {
    images: HashMap<String, PathBuf>,
}

impl FigureLibrary {
    /// Scan a directory for image files and index them by their normalized
    /// file stems. A missing or unreadable directory yields an empty
    /// library; every lookup against it returns None.
    pub fn open(directory: &Path) -> FigureLibrary {
        let mut images = HashMap::new();

        let entries = match std::fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    "Cannot read figure directory {}: {}",
                    directory.display(),
                    error
                );
                return FigureLibrary { images };
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(extension) = path
                .extension()
                .and_then(|extension| extension.to_str())
            else {
                continue;
            };
            if !SUPPORTED_EXTENSIONS.contains(
                &extension
                    .to_lowercase()
                    .as_str(),
            ) {
                continue;
            }
            let Some(stem) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
            else {
                continue;
            };
            images.insert(normalize(stem), path);
        }

        debug!("Indexed {} figure images", images.len());
        FigureLibrary { images }
    }

    /// Look up the image for a figure reference and return its bytes,
    /// rasterizing vector sources on the fly. Returns None when the
    /// reference is unknown or conversion fails; the caller treats that as
    /// the absence of an image, never as an error.
    pub fn resolve(&self, figure_ref: &str) -> Option<Vec<u8>> {
        let path = self
            .images
            .get(&normalize(figure_ref))?;

        let vector = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("svg"));
        if vector {
            rasterize(path)
        } else {
            std::fs::read(path).ok()
        }
    }
}

/// Figure references and image filenames disagree on case and separators
/// ("T-1" in the text, "t1.png" on disk). Both sides of the lookup collapse
/// to the same key: whitespace, hyphens, and underscores dropped, letters
/// lowercased.
fn normalize(reference: &str) -> String {
    reference
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Convert an SVG to a raster image by invoking rsvg-convert, falling back
/// to ImageMagick when that is not installed.
fn rasterize(source: &Path) -> Option<Vec<u8>> {
    let target = tempfile::Builder::new()
        .prefix("figure")
        .suffix(".png")
        .tempfile()
        .ok()?;

    let converted = Command::new("rsvg-convert")
        .arg("-f")
        .arg("png")
        .arg("-o")
        .arg(target.path())
        .arg(source)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
        || Command::new("convert")
            .arg(source)
            .arg(target.path())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);

    if !converted {
        warn!(
            "Could not convert {}; install rsvg-convert or ImageMagick",
            source.display()
        );
        return None;
    }

    std::fs::read(target.path()).ok()
}
