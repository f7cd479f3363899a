//! Plain-text (`P2`) grayscale raster decoding.
//!
//! Layout: a type token, then width, height and maximum intensity, then
//! `width * height` intensity tokens in row-major order. Tokens are separated
//! by arbitrary whitespace and `#` starts a comment that runs to the end of
//! the line. Decoding is all-or-nothing: any malformed token fails the whole
//! file, so a partially decoded grid never reaches the recognizer.

use std::path::Path;

use crate::grid::{GridError, RawGrid};

/// The only supported type token.
pub const PLAIN_GRAY_MAGIC: &str = "P2";

/// Errors returned by the raster decoder.
#[derive(Debug)]
pub enum PgmError {
    /// The file could not be read.
    Io {
        /// Path that failed to open or read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The input contains no tokens at all.
    MissingMagic,
    /// The type token is not `P2`.
    UnsupportedFormat(String),
    /// The header ended before the named field.
    MissingHeader(&'static str),
    /// A token could not be parsed as the expected integer.
    InvalidToken {
        /// Zero-based index of the token after the type token.
        index: usize,
        /// Offending token text.
        token: String,
    },
    /// The declared maximum intensity is outside `1..=65535`.
    MaxValueOutOfRange(u64),
    /// Fewer intensity tokens than `width * height`.
    TruncatedData {
        /// Expected pixel count.
        expected: usize,
        /// Pixel tokens found.
        got: usize,
    },
    /// More intensity tokens than `width * height`.
    TrailingData {
        /// Number of surplus tokens.
        extra: usize,
    },
    /// The decoded values violate grid invariants.
    Grid(GridError),
}

impl std::fmt::Display for PgmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {}: {}", path, source),
            Self::MissingMagic => write!(f, "empty input: missing type token"),
            Self::UnsupportedFormat(magic) => {
                write!(f, "{} is not a recognized file type", magic)
            }
            Self::MissingHeader(field) => write!(f, "header ended before {}", field),
            Self::InvalidToken { index, token } => {
                write!(f, "token {} ({:?}) is not a valid integer", index, token)
            }
            Self::MaxValueOutOfRange(v) => {
                write!(f, "maximum intensity {} outside 1..=65535", v)
            }
            Self::TruncatedData { expected, got } => {
                write!(f, "expected {} pixels, found {}", expected, got)
            }
            Self::TrailingData { extra } => {
                write!(f, "{} unexpected tokens after pixel data", extra)
            }
            Self::Grid(e) => write!(f, "invalid grid: {}", e),
        }
    }
}

impl std::error::Error for PgmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for PgmError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

/// Split the input into tokens, dropping `#` comments.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(head, _)| head))
        .flat_map(str::split_whitespace)
}

fn parse_field<T: std::str::FromStr>(index: usize, token: &str) -> Result<T, PgmError> {
    token.parse().map_err(|_| PgmError::InvalidToken {
        index,
        token: token.to_string(),
    })
}

/// Decode a `P2` raster held in memory.
pub fn decode_str(text: &str) -> Result<RawGrid, PgmError> {
    let mut toks = tokens(text);
    let magic = toks.next().ok_or(PgmError::MissingMagic)?;
    if magic != PLAIN_GRAY_MAGIC {
        return Err(PgmError::UnsupportedFormat(magic.to_string()));
    }

    let mut body = toks.enumerate();
    let (i, t) = body.next().ok_or(PgmError::MissingHeader("width"))?;
    let width: u32 = parse_field(i, t)?;
    let (i, t) = body.next().ok_or(PgmError::MissingHeader("height"))?;
    let height: u32 = parse_field(i, t)?;
    let (i, t) = body
        .next()
        .ok_or(PgmError::MissingHeader("maximum intensity"))?;
    let max_value: u64 = parse_field(i, t)?;
    let max_value = u16::try_from(max_value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or(PgmError::MaxValueOutOfRange(max_value))?;

    let expected = (width as usize).saturating_mul(height as usize);
    // Every pixel token takes at least two bytes, so the header cannot
    // reserve more than the text could ever fill.
    let mut data = Vec::with_capacity(expected.min(text.len() / 2 + 1));
    let mut extra = 0usize;
    for (index, token) in body {
        if data.len() == expected {
            extra += 1;
            continue;
        }
        let value: u64 = parse_field(index, token)?;
        if value > u64::from(max_value) {
            let n = data.len() as u32;
            return Err(GridError::ValueOutOfRange {
                x: n % width,
                y: n / width,
                value: u16::try_from(value).unwrap_or(u16::MAX),
                max_value,
            }
            .into());
        }
        data.push(value as u16);
    }
    if data.len() < expected {
        return Err(PgmError::TruncatedData {
            expected,
            got: data.len(),
        });
    }
    if extra > 0 {
        return Err(PgmError::TrailingData { extra });
    }

    Ok(RawGrid::new(width, height, max_value, data)?)
}

/// Read and decode a `P2` raster file.
pub fn read_file(path: &Path) -> Result<RawGrid, PgmError> {
    let text = std::fs::read_to_string(path).map_err(|source| PgmError::Io {
        path: path.display().to_string(),
        source,
    })?;
    decode_str(&text)
}

/// Encode an 8-bit image as a `P2` raster (maximum intensity 255).
pub fn encode_gray(gray: &image::GrayImage) -> String {
    let (w, h) = gray.dimensions();
    let mut out = format!("{}\n{} {}\n255\n", PLAIN_GRAY_MAGIC, w, h);
    for row in gray.rows() {
        let line: Vec<String> = row.map(|p| p[0].to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}
