use crate::container::MetadataContainer;
use crate::error::AppError;
use exif::experimental::Writer;
use exif::{Exif, Field, In, Reader, Tag, Value};
use img_parts::jpeg::{markers, Jpeg, JpegSegment};
use std::fs::File;
use std::io::{self, BufReader, Cursor};
use std::path::Path;

const LITTLE_ENDIAN: bool = true;
const EXIF_HEADER: &[u8] = b"Exif\0\0";
/// Largest APP1 payload a two-byte segment length can describe.
const MAX_APP1_CONTENTS: usize = 0xFFFF - 2;

/// Tags the writer derives from the layout it produces.
const LAYOUT_TAGS: [Tag; 9] = [
    Tag::ExifIFDPointer,
    Tag::GPSInfoIFDPointer,
    Tag::InteropIFDPointer,
    Tag::JPEGInterchangeFormat,
    Tag::JPEGInterchangeFormatLength,
    Tag::StripOffsets,
    Tag::StripByteCounts,
    Tag::TileOffsets,
    Tag::TileByteCounts,
];

pub fn load(path: &Path) -> Result<MetadataContainer, AppError> {
    log::trace!("Extracting EXIF data for image: {:?}", path);
    let file = File::open(path)?;
    let mut buf_reader = BufReader::new(file);
    let exif = Reader::new().read_from_container(&mut buf_reader)?;
    Ok(from_exif(&exif))
}

fn from_exif(exif: &Exif) -> MetadataContainer {
    let fields = exif
        .fields()
        .filter(|f| !LAYOUT_TAGS.contains(&f.tag))
        .filter(|f| {
            let writable = !matches!(f.value, Value::Unknown(..));
            if !writable {
                log::debug!("Dropping field {} with unknown type", f.tag);
            }
            writable
        })
        .map(|f| Field {
            tag: f.tag,
            ifd_num: f.ifd_num,
            value: f.value.clone(),
        })
        .collect();
    MetadataContainer::new(fields, thumbnail(exif))
}

fn thumbnail(exif: &Exif) -> Option<Vec<u8>> {
    let offset = exif
        .get_field(Tag::JPEGInterchangeFormat, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;
    let length = exif
        .get_field(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;
    exif.buf()
        .get(offset..offset.checked_add(length)?)
        .map(<[u8]>::to_vec)
}

/// Encodes the container as a TIFF structure, ready for an APP1 segment.
pub fn serialize(container: &MetadataContainer) -> Result<Vec<u8>, AppError> {
    let mut writer = Writer::new();
    for field in container.fields() {
        writer.push_field(field);
    }
    if let Some(jpeg) = container.thumbnail() {
        writer.set_jpeg(jpeg, In::THUMBNAIL);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, LITTLE_ENDIAN)?;
    Ok(buf.into_inner())
}

/// Returns `jpeg` with its EXIF segment replaced by `tiff`. Every other
/// segment is kept byte for byte. A JPEG without EXIF gets the new APP1
/// segment after its leading APP0 segments.
pub fn splice(jpeg: Vec<u8>, tiff: &[u8]) -> Result<Vec<u8>, AppError> {
    if EXIF_HEADER.len() + tiff.len() > MAX_APP1_CONTENTS {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("EXIF block of {} bytes does not fit in one segment", tiff.len()),
        )
        .into());
    }
    let mut contents = Vec::with_capacity(EXIF_HEADER.len() + tiff.len());
    contents.extend_from_slice(EXIF_HEADER);
    contents.extend_from_slice(tiff);

    let mut jpeg = Jpeg::from_bytes(jpeg.into())?;
    let segments = jpeg.segments_mut();
    segments.retain(|s| !is_exif_segment(s));
    let at = segments
        .iter()
        .take_while(|s| s.marker() == markers::APP0)
        .count();
    segments.insert(
        at,
        JpegSegment::new_with_contents(markers::APP1, contents.into()),
    );
    Ok(jpeg.encoder().bytes().to_vec())
}

fn is_exif_segment(segment: &JpegSegment) -> bool {
    segment.marker() == markers::APP1 && segment.contents().starts_with(EXIF_HEADER)
}
