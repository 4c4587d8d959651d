//! EXIF orientation reader
//!
//! Walks the JPEG marker stream directly over the raw bytes: no decoding, no
//! sub-allocation, every read bounds-checked. Anything unexpected resolves to
//! [`Orientation::Normal`]; this path never reports errors.

use super::orientation::Orientation;

/// EXIF headers sit near the start of the stream; nothing past this is read.
pub const SCAN_LIMIT: usize = 64 * 1024;

const MARKER_SOI: u16 = 0xFFD8;
const MARKER_APP1: u16 = 0xFFE1;
const MARKER_PREFIX: u16 = 0xFF00;
const EXIF_MAGIC: u32 = 0x4578_6966; // "Exif"
const EXIF_HEADER_LEN: usize = 6; // "Exif" + two padding bytes
const TIFF_LITTLE_ENDIAN: u16 = 0x4949; // "II"
const TAG_ORIENTATION: u16 = 0x0112;
const IFD_ENTRY_LEN: usize = 12;
const IFD_VALUE_OFFSET: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteOrder {
    Little,
    Big,
}

/// Bounds-checked integer reads over one borrowed buffer.
struct ByteView<'a> {
    data: &'a [u8],
}

impl<'a> ByteView<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data: &data[..data.len().min(SCAN_LIMIT)],
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        let end = offset.checked_add(N)?;
        self.data.get(offset..end)?.try_into().ok()
    }

    fn u16_at(&self, offset: usize, order: ByteOrder) -> Option<u16> {
        let bytes = self.array::<2>(offset)?;
        Some(match order {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        })
    }

    fn u32_at(&self, offset: usize, order: ByteOrder) -> Option<u32> {
        let bytes = self.array::<4>(offset)?;
        Some(match order {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        })
    }
}

/// Read the EXIF orientation of a JPEG stream.
///
/// Returns [`Orientation::Normal`] for non-JPEG input, missing or malformed
/// EXIF data, and out-of-range tag values.
pub fn read_orientation(data: &[u8]) -> Orientation {
    let view = ByteView::new(data);
    scan_markers(&view).unwrap_or_default()
}

fn scan_markers(view: &ByteView<'_>) -> Option<Orientation> {
    if view.u16_at(0, ByteOrder::Big)? != MARKER_SOI {
        return None;
    }

    let mut offset = 2usize;
    while offset < view.len() {
        let marker = view.u16_at(offset, ByteOrder::Big)?;
        offset += 2;

        if marker == MARKER_APP1 {
            // Segment length; only its presence matters here
            view.u16_at(offset, ByteOrder::Big)?;
            offset += 2;

            if view.u32_at(offset, ByteOrder::Big)? != EXIF_MAGIC {
                return None;
            }
            view.u16_at(offset + 4, ByteOrder::Big)?;

            return read_ifd0_orientation(view, offset + EXIF_HEADER_LEN);
        } else if marker & MARKER_PREFIX == MARKER_PREFIX {
            let segment_len = view.u16_at(offset, ByteOrder::Big)?;
            offset += segment_len as usize;
        } else {
            return None;
        }
    }

    None
}

fn read_ifd0_orientation(view: &ByteView<'_>, tiff_start: usize) -> Option<Orientation> {
    let order = if view.u16_at(tiff_start, ByteOrder::Big)? == TIFF_LITTLE_ENDIAN {
        ByteOrder::Little
    } else {
        ByteOrder::Big
    };

    let ifd_offset = view.u32_at(tiff_start.checked_add(4)?, order)?;
    let ifd_start = tiff_start.checked_add(usize::try_from(ifd_offset).ok()?)?;
    let entry_count = view.u16_at(ifd_start, order)? as usize;
    let entries_start = ifd_start.checked_add(2)?;

    for index in 0..entry_count {
        let entry = entries_start.checked_add(index * IFD_ENTRY_LEN)?;
        if view.u16_at(entry, order)? == TAG_ORIENTATION {
            let value = view.u16_at(entry.checked_add(IFD_VALUE_OFFSET)?, order)?;
            return Some(Orientation::from_exif(value));
        }
    }

    None
}
