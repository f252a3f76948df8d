// src/container.rs

use crate::error::AppError;
use exif::{Context, Field, In, Rational, Tag, Value};

/// The IFDs whose tags the correction engine reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagGroup {
    /// IFD0: make, model.
    Image,
    /// Exif sub-IFD: capture timestamps.
    Capture,
    /// GPS sub-IFD.
    Gps,
}

impl TagGroup {
    fn context(self) -> Context {
        match self {
            TagGroup::Image => Context::Tiff,
            TagGroup::Capture => Context::Exif,
            TagGroup::Gps => Context::Gps,
        }
    }

    pub fn tag(self, number: u16) -> Tag {
        Tag(self.context(), number)
    }
}

/// All EXIF fields of one image, plus its embedded thumbnail.
///
/// Lookups address the primary image; thumbnail-IFD fields are carried
/// through untouched.
#[derive(Debug, Clone, Default)]
pub struct MetadataContainer {
    fields: Vec<Field>,
    thumbnail: Option<Vec<u8>>,
}

impl MetadataContainer {
    pub fn new(fields: Vec<Field>, thumbnail: Option<Vec<u8>>) -> Self {
        MetadataContainer { fields, thumbnail }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.thumbnail.as_deref()
    }

    pub fn get(&self, group: TagGroup, number: u16) -> Option<&Value> {
        let tag = group.tag(number);
        self.fields
            .iter()
            .find(|f| f.tag == tag && f.ifd_num == In::PRIMARY)
            .map(|f| &f.value)
    }

    /// Inserts the value, replacing any existing entry for the same tag.
    pub fn set(&mut self, group: TagGroup, number: u16, value: Value) {
        let tag = group.tag(number);
        match self
            .fields
            .iter_mut()
            .find(|f| f.tag == tag && f.ifd_num == In::PRIMARY)
        {
            Some(field) => field.value = value,
            None => self.fields.push(Field {
                tag,
                ifd_num: In::PRIMARY,
                value,
            }),
        }
    }

    /// Decodes an ASCII tag as UTF-8, dropping trailing NULs. Bytes that are
    /// not valid UTF-8 are a `Format` error.
    pub fn text(&self, group: TagGroup, number: u16) -> Result<Option<String>, AppError> {
        let first = match self.get(group, number) {
            Some(Value::Ascii(parts)) => match parts.first() {
                Some(first) => first,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
        let end = first.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        String::from_utf8(first[..end].to_vec())
            .map(Some)
            .map_err(|e| {
                AppError::format(
                    group.tag(number).to_string(),
                    String::from_utf8_lossy(e.as_bytes()),
                )
            })
    }

    pub fn set_text(&mut self, group: TagGroup, number: u16, text: &str) {
        self.set(group, number, Value::Ascii(vec![text.as_bytes().to_vec()]));
    }

    pub fn rationals(&self, group: TagGroup, number: u16) -> Option<&[Rational]> {
        match self.get(group, number)? {
            Value::Rational(values) => Some(values),
            _ => None,
        }
    }
}
