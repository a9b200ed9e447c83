use std::io::{Read, Write};

use anyhow::{Context, Result};

use crate::document::Document;

/// Decodes a single YAML document.
///
/// Decoding is strict: malformed YAML, a repeated key in any mapping and
/// streams holding more than one document are all rejected. Empty input
/// decodes to [`Document::Null`].
///
/// # Errors
/// Returns an error if the input is not exactly one well-formed document.
pub fn decode_str(input: &str) -> Result<Document> {
    if input.trim().is_empty() {
        return Ok(Document::Null);
    }
    serde_yaml::from_str(input).context("decode input yaml")
}

/// Reads `reader` to the end and decodes it with [`decode_str`].
///
/// # Errors
/// Returns an error if reading fails or the content does not decode.
pub fn decode_reader<R: Read>(mut reader: R) -> Result<Document> {
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .context("read input yaml")?;
    decode_str(&buf)
}

/// Encodes `doc` as YAML, keeping mapping and sequence order as given.
///
/// # Errors
/// Returns an error if the document cannot be represented in YAML.
pub fn encode_string(doc: &Document) -> Result<String> {
    serde_yaml::to_string(doc).context("encode sorted yaml")
}

/// Encodes `doc` fully before writing anything to `writer`.
///
/// # Errors
/// Returns an error if encoding or writing fails.
pub fn encode_writer<W: Write>(mut writer: W, doc: &Document) -> Result<()> {
    let s = encode_string(doc)?;
    writer
        .write_all(s.as_bytes())
        .context("write sorted yaml")?;
    writer.flush().context("flush sorted yaml")
}
