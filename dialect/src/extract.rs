//! Turning file bytes into configuration text.

use thiserror::Error;

const MIN_PRINTABLE_RUN: usize = 4;
/// Share of control characters above which a file is considered binary.
const BINARY_CONTROL_RATIO: f64 = 0.10;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContentError {
    #[error("file is empty")]
    Empty,
    #[error("binary content ({:.0}% control characters)", .control_ratio * 100.0)]
    Binary { control_ratio: f64 },
    #[error("no printable text could be extracted")]
    NothingExtracted,
}

/// Decodes a plain-text configuration.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; NUL bytes or a
/// high share of control characters mark the file as binary.
pub fn decode_text(bytes: &[u8]) -> Result<String, ContentError> {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ContentError::Empty);
    }

    let control = bytes
        .iter()
        .filter(|b| b.is_ascii_control() && !matches!(**b, b'\n' | b'\r' | b'\t' | 0x0C))
        .count();
    let control_ratio = control as f64 / bytes.len() as f64;
    if bytes.contains(&0) || control_ratio > BINARY_CONTROL_RATIO {
        return Err(ContentError::Binary { control_ratio });
    }

    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Best-effort text recovery from a binary project file: keeps runs of at
/// least four printable ASCII characters, one run per line.
pub fn extract_printable_text(bytes: &[u8]) -> Result<String, ContentError> {
    if bytes.is_empty() {
        return Err(ContentError::Empty);
    }

    let runs: Vec<String> = bytes
        .split(|b| !(b.is_ascii_graphic() || *b == b' ' || *b == b'\t'))
        .filter(|run| run.len() >= MIN_PRINTABLE_RUN)
        .map(|run| String::from_utf8_lossy(run).into_owned())
        .collect();

    if runs.is_empty() {
        return Err(ContentError::NothingExtracted);
    }
    Ok(runs.join("\n"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
