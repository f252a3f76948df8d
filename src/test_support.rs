//! JPEG fixtures for unit tests.

use crate::codec;
use crate::container::MetadataContainer;
use exif::{Field, In, Rational, Tag, Value};
use std::path::{Path, PathBuf};

/// SOI, a JFIF APP0, DQT, SOF0, DHT, a one-component SOS with a few scan
/// bytes, EOI. Enough segments for any library that assumes a real header.
fn bare_jpeg() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8];
    bytes.extend_from_slice(&[
        0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01,
        0x00, 0x01, 0x00, 0x00,
    ]);
    bytes.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x43, 0x00]);
    bytes.extend_from_slice(&[0x01; 64]);
    bytes.extend_from_slice(&[
        0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00,
    ]);
    bytes.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x14, 0x00, 0x01]);
    bytes.extend_from_slice(&[0x00; 15]);
    bytes.push(0x00);
    bytes.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    bytes.extend_from_slice(&[0x12, 0x34, 0x56, 0x78]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

/// Make, model and both capture timestamps set to `captured`.
pub fn camera_fields(make: &str, model: &str, captured: &str) -> Vec<Field> {
    vec![
        ascii(Tag::Make, make),
        ascii(Tag::Model, model),
        ascii(Tag::DateTimeOriginal, captured),
        ascii(Tag::DateTimeDigitized, captured),
    ]
}

pub fn gps_fields(date: &str, time: [u32; 3]) -> Vec<Field> {
    vec![
        ascii(Tag::GPSDateStamp, date),
        Field {
            tag: Tag::GPSTimeStamp,
            ifd_num: In::PRIMARY,
            value: Value::Rational(time.iter().map(|&num| Rational { num, denom: 1 }).collect()),
        },
    ]
}

fn copy_fields(fields: &[Field]) -> Vec<Field> {
    fields
        .iter()
        .map(|f| Field {
            tag: f.tag,
            ifd_num: f.ifd_num,
            value: f.value.clone(),
        })
        .collect()
}

pub fn jpeg_bytes(fields: &[Field]) -> Vec<u8> {
    if fields.is_empty() {
        return bare_jpeg();
    }
    let container = MetadataContainer::new(copy_fields(fields), None);
    let tiff = codec::serialize(&container).unwrap();
    codec::splice(bare_jpeg(), &tiff).unwrap()
}

/// SOI, one EXIF APP1, SOS with scan data, EOI. Fewer segments than most
/// camera files, as written by some minimal encoders.
pub fn short_jpeg_bytes(fields: &[Field]) -> Vec<u8> {
    let container = MetadataContainer::new(copy_fields(fields), None);
    let tiff = codec::serialize(&container).unwrap();
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1];
    bytes.extend_from_slice(&(2 + 6 + tiff.len() as u16).to_be_bytes());
    bytes.extend_from_slice(b"Exif\0\0");
    bytes.extend_from_slice(&tiff);
    bytes.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    bytes.extend_from_slice(&[0x12, 0x34, 0xFF, 0xD9]);
    bytes
}

pub fn write_jpeg(dir: &Path, name: &str, fields: &[Field]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, jpeg_bytes(fields)).unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use img_parts::jpeg::{markers, Jpeg};

    #[test]
    fn bare_fixture_has_a_full_header() {
        let jpeg = Jpeg::from_bytes(bare_jpeg().into()).unwrap();
        let found: Vec<u8> = jpeg.segments().iter().map(|s| s.marker()).collect();
        assert_eq!(
            found,
            vec![markers::APP0, markers::DQT, markers::SOF0, markers::DHT, markers::SOS]
        );
    }
}
