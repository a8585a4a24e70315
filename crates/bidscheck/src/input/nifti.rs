//! NIfTI-1 header decoding.
//!
//! Only the fields the validators consult are decoded: image dimensions,
//! voxel sizes and the unit code. Gzip-compressed images are inflated just
//! far enough to read the 348-byte header.

use std::io::{BufRead, BufReader, Read};

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::{BidsError, Result};
use super::source::FileRef;

/// Size of a NIfTI-1 header in bytes.
pub const HEADER_SIZE: usize = 348;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const DIM_OFFSET: usize = 40;
const PIXDIM_OFFSET: usize = 76;
const XYZT_UNITS_OFFSET: usize = 123;
const MAGIC_OFFSET: usize = 344;

/// Time unit encoded in `xyzt_units`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Unknown,
    Seconds,
    Milliseconds,
    Microseconds,
    /// Any other code (Hz, ppm, rad/s).
    Other,
}

impl TimeUnit {
    fn from_code(xyzt_units: u8) -> Self {
        match xyzt_units & 0x38 {
            0 => TimeUnit::Unknown,
            8 => TimeUnit::Seconds,
            16 => TimeUnit::Milliseconds,
            24 => TimeUnit::Microseconds,
            _ => TimeUnit::Other,
        }
    }

    /// Factor converting this unit to seconds.
    pub fn to_seconds(&self) -> Option<f64> {
        match self {
            TimeUnit::Seconds => Some(1.0),
            TimeUnit::Milliseconds => Some(1e-3),
            TimeUnit::Microseconds => Some(1e-6),
            TimeUnit::Unknown | TimeUnit::Other => None,
        }
    }
}

/// The subset of a NIfTI-1 header used for validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NiftiHeader {
    /// `dim[0]` is the number of dimensions, `dim[1..=7]` their sizes.
    pub dim: [i16; 8],
    /// Voxel sizes; `pixdim[4]` is the repetition time.
    pub pixdim: [f32; 8],
    /// Spatial and temporal unit codes.
    pub xyzt_units: u8,
    /// Whether the header was stored big-endian.
    pub big_endian: bool,
}

impl NiftiHeader {
    /// Read and decode the header of a NIfTI file.
    pub fn read(file: &FileRef) -> Result<Self> {
        let mut reader = BufReader::new(file.open()?);
        let gzipped = reader
            .fill_buf()
            .map_err(|e| file.io_error(e))?
            .starts_with(&GZIP_MAGIC);

        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        let read = if gzipped {
            GzDecoder::new(reader)
                .take(HEADER_SIZE as u64)
                .read_to_end(&mut bytes)
        } else {
            reader.take(HEADER_SIZE as u64).read_to_end(&mut bytes)
        };
        read.map_err(|e| BidsError::NiftiHeader(format!("{}: {}", file.relative_path, e)))?;

        Self::parse(&bytes)
    }

    /// Decode a header from its raw bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(BidsError::NiftiHeader(format!(
                "header truncated: {} of {} bytes",
                bytes.len(),
                HEADER_SIZE
            )));
        }

        let size_bytes = [bytes[0], bytes[1], bytes[2], bytes[3]];
        let big_endian = if i32::from_le_bytes(size_bytes) == HEADER_SIZE as i32 {
            false
        } else if i32::from_be_bytes(size_bytes) == HEADER_SIZE as i32 {
            true
        } else {
            return Err(BidsError::NiftiHeader(
                "sizeof_hdr is not 348 (not a NIfTI-1 file)".to_string(),
            ));
        };

        let magic = &bytes[MAGIC_OFFSET..MAGIC_OFFSET + 4];
        if magic != b"n+1\0" && magic != b"ni1\0" {
            return Err(BidsError::NiftiHeader(format!(
                "unrecognized magic {:?}",
                String::from_utf8_lossy(&magic[..3])
            )));
        }

        let mut dim = [0i16; 8];
        for (i, value) in dim.iter_mut().enumerate() {
            let at = DIM_OFFSET + i * 2;
            let raw = [bytes[at], bytes[at + 1]];
            *value = if big_endian {
                i16::from_be_bytes(raw)
            } else {
                i16::from_le_bytes(raw)
            };
        }

        let mut pixdim = [0f32; 8];
        for (i, value) in pixdim.iter_mut().enumerate() {
            let at = PIXDIM_OFFSET + i * 4;
            let raw = [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]];
            *value = if big_endian {
                f32::from_be_bytes(raw)
            } else {
                f32::from_le_bytes(raw)
            };
        }

        Ok(Self {
            dim,
            pixdim,
            xyzt_units: bytes[XYZT_UNITS_OFFSET],
            big_endian,
        })
    }

    /// Temporal unit of `pixdim[4]`.
    pub fn time_unit(&self) -> TimeUnit {
        TimeUnit::from_code(self.xyzt_units)
    }

    /// Repetition time in seconds, when the unit is known.
    pub fn repetition_time(&self) -> Option<f64> {
        self.time_unit()
            .to_seconds()
            .map(|scale| self.pixdim[4] as f64 * scale)
    }

    /// Number of volumes (1 for 3D images).
    pub fn volume_count(&self) -> usize {
        if self.dim[0] < 4 {
            1
        } else {
            self.dim[4].max(0) as usize
        }
    }

    /// Spatial image size (`dim[1..=3]`).
    pub fn spatial_dims(&self) -> [i16; 3] {
        [self.dim[1], self.dim[2], self.dim[3]]
    }

    /// Spatial voxel size (`pixdim[1..=3]`).
    pub fn voxel_size(&self) -> [f32; 3] {
        [self.pixdim[1], self.pixdim[2], self.pixdim[3]]
    }
}

/// Build a minimal header for tests and fixtures.
#[cfg(test)]
pub(crate) fn header_bytes(dim: [i16; 8], pixdim: [f32; 8], xyzt_units: u8, big_endian: bool) -> Vec<u8> {
    let mut bytes = vec![0u8; HEADER_SIZE];
    let size = HEADER_SIZE as i32;
    bytes[0..4].copy_from_slice(&if big_endian { size.to_be_bytes() } else { size.to_le_bytes() });
    for (i, d) in dim.iter().enumerate() {
        let at = DIM_OFFSET + i * 2;
        bytes[at..at + 2].copy_from_slice(&if big_endian { d.to_be_bytes() } else { d.to_le_bytes() });
    }
    for (i, p) in pixdim.iter().enumerate() {
        let at = PIXDIM_OFFSET + i * 4;
        bytes[at..at + 4].copy_from_slice(&if big_endian { p.to_be_bytes() } else { p.to_le_bytes() });
    }
    bytes[XYZT_UNITS_OFFSET] = xyzt_units;
    bytes[MAGIC_OFFSET..MAGIC_OFFSET + 4].copy_from_slice(b"n+1\0");
    bytes
}
