//! OSS XML deserialization: parsing response bodies into Rust types.
//!
//! This module provides the [`OssDeserialize`] trait, the [`from_xml`] entry
//! point and implementations for every response model in [`crate::types`].
//! Unknown elements are skipped so newer service fields do not break parsing.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::XmlError;
use crate::types::{
    Bucket, ErrorResponse, ListAllMyBucketsResult, ListBucketResult, ObjectSummary, Owner,
};

/// Trait for deserializing OSS types from XML.
///
/// The root element has already been consumed by the caller; the
/// implementation reads child elements until the matching end tag.
pub trait OssDeserialize: Sized {
    /// Deserialize an instance from the given XML reader.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` if the XML is malformed or a value cannot be parsed.
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError>;
}

/// Deserialize an OSS XML document into a typed value.
///
/// Finds the root element and delegates to the type's [`OssDeserialize`] implementation.
///
/// # Errors
///
/// Returns `XmlError` if the XML is malformed, empty, or deserialization fails.
///
/// # Examples
///
/// ```
/// use rustoss_xml::{ErrorResponse, from_xml};
///
/// let xml = b"<Error><Code>NoSuchBucket</Code><Message>gone</Message></Error>";
/// let err: ErrorResponse = from_xml(xml).unwrap();
/// assert_eq!(err.code, "NoSuchBucket");
/// ```
pub fn from_xml<T: OssDeserialize>(xml: &[u8]) -> Result<T, XmlError> {
    let mut reader = Reader::from_reader(xml);
    // Leaf text is kept verbatim; quick-xml splits it at entity references.
    reader.config_mut().trim_text(false);

    loop {
        match reader.read_event()? {
            Event::Start(_) => {
                return T::deserialize_xml(&mut reader);
            }
            Event::Eof => {
                return Err(XmlError::MissingElement("root element".to_owned()));
            }
            // Declaration, comments, processing instructions.
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Walk the children of the current element, calling `on_child` with each start tag name.
///
/// `on_child` must consume the child through its end tag. Returns once the
/// enclosing element's end tag is read.
fn read_children<F>(
    reader: &mut Reader<&[u8]>,
    context: &str,
    mut on_child: F,
) -> Result<(), XmlError>
where
    F: FnMut(&mut Reader<&[u8]>, &str) -> Result<(), XmlError>,
{
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name();
                let tag_name = std::str::from_utf8(name.as_ref())
                    .map_err(|e| XmlError::ParseError(e.to_string()))?
                    .to_owned();
                on_child(reader, &tag_name)?;
            }
            Event::End(_) => return Ok(()),
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(format!(
                    "unexpected EOF in {context}"
                )));
            }
            // Indentation between child elements.
            _ => {}
        }
    }
}

/// Read the text content of the current element and consume its end tag.
///
/// The text is returned exactly as sent; object keys may begin or end with spaces.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::GeneralRef(e) => {
                if let Some(ch) = e
                    .resolve_char_ref()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?
                {
                    text.push(ch);
                } else {
                    let entity = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&entity)
                        .ok_or_else(|| XmlError::ParseError(format!("unknown entity &{entity};")))?;
                    text.push_str(resolved);
                }
            }
            Event::CData(e) => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::End(_) => {
                return Ok(text);
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while reading text content".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while skipping element".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

/// Deserialize a list of items where each item is wrapped in `item_tag`.
fn deserialize_list<T: OssDeserialize>(
    reader: &mut Reader<&[u8]>,
    item_tag: &str,
) -> Result<Vec<T>, XmlError> {
    let mut items = Vec::new();
    read_children(reader, "list", |reader, tag| {
        if tag == item_tag {
            items.push(T::deserialize_xml(reader)?);
            Ok(())
        } else {
            skip_element(reader)
        }
    })?;
    Ok(items)
}

fn parse_bool(s: &str) -> Result<bool, XmlError> {
    match s.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(XmlError::ParseError(format!("invalid boolean: {s}"))),
    }
}

fn parse_i32(s: &str) -> Result<i32, XmlError> {
    s.trim()
        .parse::<i32>()
        .map_err(|e| XmlError::ParseError(format!("invalid i32 '{s}': {e}")))
}

fn parse_i64(s: &str) -> Result<i64, XmlError> {
    s.trim()
        .parse::<i64>()
        .map_err(|e| XmlError::ParseError(format!("invalid i64 '{s}': {e}")))
}

/// Parse an ISO 8601 timestamp such as `2006-02-03T16:45:09.000Z`.
fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, XmlError> {
    let s = s.trim();
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ")
                .map(|ndt| ndt.and_utc())
        })
        .map_err(|e| XmlError::ParseError(format!("invalid timestamp '{s}': {e}")))
}

// ---------------------------------------------------------------------------
// OssDeserialize implementations
// ---------------------------------------------------------------------------

impl OssDeserialize for Owner {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut owner = Owner::default();
        read_children(reader, "Owner", |reader, tag| {
            match tag {
                "ID" => owner.id = read_text_content(reader)?,
                "DisplayName" => owner.display_name = read_text_content(reader)?,
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(owner)
    }
}

impl OssDeserialize for Bucket {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut bucket = Bucket::default();
        read_children(reader, "Bucket", |reader, tag| {
            match tag {
                "Name" => bucket.name = read_text_content(reader)?,
                "CreationDate" => {
                    bucket.creation_date = Some(parse_timestamp(&read_text_content(reader)?)?);
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(bucket)
    }
}

impl OssDeserialize for ListAllMyBucketsResult {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut result = ListAllMyBucketsResult::default();
        read_children(reader, "ListAllMyBucketsResult", |reader, tag| {
            match tag {
                "Owner" => result.owner = Some(Owner::deserialize_xml(reader)?),
                "Buckets" => result.buckets = deserialize_list(reader, "Bucket")?,
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(result)
    }
}

impl OssDeserialize for ObjectSummary {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut object = ObjectSummary::default();
        read_children(reader, "Contents", |reader, tag| {
            match tag {
                "Key" => object.key = read_text_content(reader)?,
                "LastModified" => {
                    object.last_modified = Some(parse_timestamp(&read_text_content(reader)?)?);
                }
                "ETag" => object.etag = read_text_content(reader)?,
                "Size" => object.size = parse_i64(&read_text_content(reader)?)?,
                "StorageClass" => object.storage_class = Some(read_text_content(reader)?),
                "Owner" => object.owner = Some(Owner::deserialize_xml(reader)?),
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(object)
    }
}

/// Read one `<CommonPrefixes><Prefix>..</Prefix></CommonPrefixes>` entry.
fn read_common_prefix(reader: &mut Reader<&[u8]>) -> Result<Option<String>, XmlError> {
    let mut prefix = None;
    read_children(reader, "CommonPrefixes", |reader, tag| {
        if tag == "Prefix" {
            prefix = Some(read_text_content(reader)?);
            Ok(())
        } else {
            skip_element(reader)
        }
    })?;
    Ok(prefix)
}

impl OssDeserialize for ListBucketResult {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut result = ListBucketResult::default();
        read_children(reader, "ListBucketResult", |reader, tag| {
            match tag {
                "Name" => result.name = read_text_content(reader)?,
                "Prefix" => result.prefix = read_text_content(reader)?,
                "Marker" => result.marker = read_text_content(reader)?,
                "NextMarker" => result.next_marker = Some(read_text_content(reader)?),
                "MaxKeys" => result.max_keys = parse_i32(&read_text_content(reader)?)?,
                "Delimiter" => result.delimiter = Some(read_text_content(reader)?),
                "IsTruncated" => result.is_truncated = parse_bool(&read_text_content(reader)?)?,
                "Contents" => result.contents.push(ObjectSummary::deserialize_xml(reader)?),
                "CommonPrefixes" => {
                    if let Some(prefix) = read_common_prefix(reader)? {
                        result.common_prefixes.push(prefix);
                    }
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(result)
    }
}

impl OssDeserialize for ErrorResponse {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut error = ErrorResponse::default();
        read_children(reader, "Error", |reader, tag| {
            match tag {
                "Code" => error.code = read_text_content(reader)?,
                "Message" => error.message = read_text_content(reader)?,
                "Resource" => error.resource = Some(read_text_content(reader)?),
                "RequestId" => error.request_id = Some(read_text_content(reader)?),
                "HostId" => error.host_id = Some(read_text_content(reader)?),
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(error)
    }
}
