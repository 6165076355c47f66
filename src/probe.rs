//! Width/height recovery straight from PNG and JPEG headers.
//!
//! Only the bytes needed to find the dimensions are read; pixel data is never
//! touched. Every failure comes back as a [`ProbeError`] so the caller picks
//! the fallback.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

const PNG_SIGNATURE: [u8; 8] = *b"\x89PNG\r\n\x1a\n";
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// Initial read; enough for the PNG signature and IHDR.
const PROBE_LEN: usize = 32;
/// Signature (8) + chunk length (4) + chunk type (4) + width (4) + height (4).
const PNG_HEADER_LEN: usize = 24;

const SOF0: u8 = 0xC0;
const SOF2: u8 = 0xC2;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("cannot read image: {0}")]
    Io(#[from] io::Error),
    #[error("not a PNG or JPEG file")]
    UnknownFormat,
    #[error("image header is truncated")]
    Truncated,
    #[error("malformed image header: {0}")]
    Malformed(&'static str),
}

/// What a JPEG start-of-frame segment declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JpegFrame {
    pub width: u32,
    pub height: u32,
    /// Colour channels: 1 gray, 3 YCbCr/RGB, 4 CMYK/YCCK.
    pub components: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

/// Identify the format from the leading bytes.
pub fn sniff(head: &[u8]) -> Option<ImageKind> {
    if head.starts_with(&PNG_SIGNATURE) {
        Some(ImageKind::Png)
    } else if head.starts_with(&JPEG_SOI) {
        Some(ImageKind::Jpeg)
    } else {
        None
    }
}

pub fn probe_file(path: &Path) -> Result<(u32, u32), ProbeError> {
    let file = File::open(path)?;
    probe_reader(&mut BufReader::new(file))
}

pub fn probe_bytes(data: &[u8]) -> Result<(u32, u32), ProbeError> {
    probe_reader(&mut Cursor::new(data))
}

pub fn probe_reader<R: Read + Seek>(reader: &mut R) -> Result<(u32, u32), ProbeError> {
    let mut head = [0u8; PROBE_LEN];
    let mut filled = fill(reader, &mut head, PNG_SIGNATURE.len())?;

    match sniff(&head[..filled]) {
        Some(ImageKind::Png) => {
            if filled < PNG_HEADER_LEN {
                let wanted = PNG_HEADER_LEN - filled;
                let more = fill(reader, &mut head[filled..PNG_HEADER_LEN], wanted)?;
                filled += more;
            }
            if filled < PNG_HEADER_LEN {
                return Err(ProbeError::Truncated);
            }
            if &head[12..16] != b"IHDR" {
                return Err(ProbeError::Malformed("first chunk is not IHDR"));
            }
            let width = u32::from_be_bytes([head[16], head[17], head[18], head[19]]);
            let height = u32::from_be_bytes([head[20], head[21], head[22], head[23]]);
            non_zero(width, height)
        }
        Some(ImageKind::Jpeg) => {
            reader.seek(SeekFrom::Start(JPEG_SOI.len() as u64))?;
            scan_jpeg(reader).map(|frame| (frame.width, frame.height))
        }
        None => Err(ProbeError::UnknownFormat),
    }
}

pub fn probe_jpeg(data: &[u8]) -> Result<JpegFrame, ProbeError> {
    if sniff(data) != Some(ImageKind::Jpeg) {
        return Err(ProbeError::UnknownFormat);
    }
    let mut reader = Cursor::new(data);
    reader.seek(SeekFrom::Start(JPEG_SOI.len() as u64))?;
    scan_jpeg(&mut reader)
}

/// Walk JPEG marker segments until a baseline or progressive start-of-frame.
fn scan_jpeg<R: Read + Seek>(reader: &mut R) -> Result<JpegFrame, ProbeError> {
    loop {
        if read_u8(reader)? != 0xFF {
            return Err(ProbeError::Malformed("expected marker prefix"));
        }
        let mut code = read_u8(reader)?;
        while code == 0xFF {
            code = read_u8(reader)?;
        }
        if is_standalone(code) {
            continue;
        }

        let seg_len = read_u16(reader)?;
        if seg_len < 2 {
            return Err(ProbeError::Malformed("segment length below 2"));
        }
        let payload_len = seg_len as usize - 2;

        if code == SOF0 || code == SOF2 {
            let mut seg = vec![0u8; payload_len];
            read_exact(reader, &mut seg)?;
            if seg.len() < 5 {
                return Err(ProbeError::Malformed("start-of-frame segment too short"));
            }
            let height = u16::from_be_bytes([seg[1], seg[2]]) as u32;
            let width = u16::from_be_bytes([seg[3], seg[4]]) as u32;
            let (width, height) = non_zero(width, height)?;
            // Frames cut short before the channel count are taken as colour.
            let components = seg.get(5).copied().unwrap_or(3);
            return Ok(JpegFrame {
                width,
                height,
                components,
            });
        }

        reader.seek(SeekFrom::Current(payload_len as i64))?;
    }
}

/// Markers with no length field: SOI, EOI, RSTn and TEM.
fn is_standalone(code: u8) -> bool {
    matches!(code, 0xD8 | 0xD9 | 0xD0..=0xD7 | 0x01)
}

fn non_zero(width: u32, height: u32) -> Result<(u32, u32), ProbeError> {
    if width == 0 || height == 0 {
        Err(ProbeError::Malformed("zero image dimension"))
    } else {
        Ok((width, height))
    }
}

/// Read until at least `min` bytes are in `buf` or the reader is exhausted.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8], min: usize) -> io::Result<usize> {
    let mut filled = 0;
    while filled < min.min(buf.len()) {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), ProbeError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ProbeError::Truncated,
        _ => ProbeError::Io(e),
    })
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8, ProbeError> {
    let mut b = [0u8; 1];
    read_exact(reader, &mut b)?;
    Ok(b[0])
}

fn read_u16<R: Read>(reader: &mut R) -> Result<u16, ProbeError> {
    let mut b = [0u8; 2];
    read_exact(reader, &mut b)?;
    Ok(u16::from_be_bytes(b))
}

/// An image file plus whatever the probe could learn about it.
#[derive(Clone, Debug)]
pub struct ImageDescriptor {
    pub path: PathBuf,
    /// `None` when the dimensions could not be determined.
    pub size: Option<(u32, u32)>,
}

impl ImageDescriptor {
    pub fn probe(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let size = match probe_file(&path) {
            Ok(size) => Some(size),
            Err(e) => {
                log::debug!("image probe failed for {}: {e}", path.display());
                None
            }
        };
        ImageDescriptor { path, size }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
