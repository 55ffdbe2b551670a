//! Locating configuration files and reading them within bounds.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use cfgmap_common::error::AnalysisError;
use cfgmap_dialect::extract::{decode_text, extract_printable_text};
use tracing::debug;

/// Plain-text configuration dumps.
pub const CONFIG_EXTENSIONS: &[&str] = &["txt", "cfg", "conf", "config", "dump"];

/// Binary simulator projects, read with reduced fidelity.
pub const PROJECT_EXTENSION: &str = "pkt";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InputFile {
    pub path: PathBuf,
    pub reduced_fidelity: bool,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let reduced_fidelity = extension_of(&path).is_some_and(|ext| ext == PROJECT_EXTENSION);
        Self { path, reduced_fidelity }
    }

    /// Reads the file, refusing anything larger than `limit` bytes.
    pub fn read(&self, limit: u64) -> Result<Vec<u8>, AnalysisError> {
        let unreadable = |source| AnalysisError::FileUnreadable {
            path: self.path.clone(),
            source,
        };

        let size = fs::metadata(&self.path).map_err(unreadable)?.len();
        if size > limit {
            return Err(AnalysisError::FileTooLarge {
                path: self.path.clone(),
                size,
                limit,
            });
        }

        // the file may grow between the metadata call and the read
        let mut bytes = Vec::with_capacity(size as usize);
        File::open(&self.path)
            .and_then(|file| file.take(limit + 1).read_to_end(&mut bytes))
            .map_err(unreadable)?;
        if bytes.len() as u64 > limit {
            return Err(AnalysisError::FileTooLarge {
                path: self.path.clone(),
                size: bytes.len() as u64,
                limit,
            });
        }
        Ok(bytes)
    }

    /// Configuration text of `bytes`, recovered from binary for project files.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, AnalysisError> {
        let decoded = if self.reduced_fidelity {
            extract_printable_text(bytes)
        } else {
            decode_text(bytes)
        };
        decoded.map_err(|err| AnalysisError::malformed(&self.path, None, err.to_string()))
    }
}

/// Inputs under `path`, sorted by path.
///
/// A directory is scanned without recursion and only recognized extensions are
/// kept. A single file is taken as is.
pub fn discover_inputs(path: &Path) -> Result<Vec<InputFile>, AnalysisError> {
    let unreadable = |source| AnalysisError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(unreadable)?;
    if metadata.is_file() {
        return Ok(vec![InputFile::new(path)]);
    }

    let mut inputs = Vec::new();
    for entry in fs::read_dir(path).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let candidate = entry.path();
        if !candidate.is_file() {
            continue;
        }
        if is_recognized(&candidate) {
            inputs.push(InputFile::new(candidate));
        } else {
            debug!(path = %candidate.display(), "ignoring file with unrecognized extension");
        }
    }

    inputs.sort();
    Ok(inputs)
}

pub fn is_recognized(path: &Path) -> bool {
    extension_of(path)
        .is_some_and(|ext| ext == PROJECT_EXTENSION || CONFIG_EXTENSIONS.contains(&ext.as_str()))
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
