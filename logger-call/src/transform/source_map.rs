//! Source Map revision 3: building, encoding, decoding and lookup.

use serde_json::{json, Value};

use crate::error::SourceMapError;

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Append `value` as a base64 VLQ.
pub fn encode_vlq(value: i64, out: &mut String) {
    let mut rest = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        value.unsigned_abs() << 1
    };
    loop {
        let mut digit = rest & 0b1_1111;
        rest >>= 5;
        if rest > 0 {
            digit |= 0b10_0000;
        }
        if let Some(c) = usize::try_from(digit).ok().and_then(|d| BASE64.get(d)) {
            out.push(char::from(*c));
        }
        if rest == 0 {
            break;
        }
    }
}

fn base64_digit(c: char) -> Result<u64, SourceMapError> {
    BASE64
        .iter()
        .position(|b| char::from(*b) == c)
        .map(|d| d as u64)
        .ok_or(SourceMapError::InvalidBase64(c))
}

/// Read one base64 VLQ from `chars`.
pub fn decode_vlq(chars: &mut impl Iterator<Item = char>) -> Result<i64, SourceMapError> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    loop {
        let digit = base64_digit(chars.next().ok_or(SourceMapError::TruncatedVlq)?)?;
        result |= (digit & 0b1_1111).checked_shl(shift).unwrap_or_default();
        shift += 5;
        if digit & 0b10_0000 == 0 {
            break;
        }
    }
    let magnitude = i64::try_from(result >> 1).unwrap_or(i64::MAX);
    Ok(if result & 1 == 1 { -magnitude } else { magnitude })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalPosition {
    pub source: u32,
    pub line: u32,
    pub column: u32,
    pub name: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub generated_column: u32,
    pub original: Option<OriginalPosition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    pub file: Option<String>,
    pub sources: Vec<String>,
    pub sources_content: Vec<Option<String>>,
    pub names: Vec<String>,
    /// Segments per generated line, sorted by generated column.
    lines: Vec<Vec<Segment>>,
}

impl SourceMap {
    pub fn new(file: Option<String>) -> Self {
        SourceMap {
            file,
            ..SourceMap::default()
        }
    }

    /// Register a source and return its index.
    pub fn add_source(&mut self, name: impl Into<String>, content: Option<String>) -> u32 {
        self.sources.push(name.into());
        self.sources_content.push(content);
        u32::try_from(self.sources.len() - 1).unwrap_or(u32::MAX)
    }

    pub fn add_segment(&mut self, generated_line: u32, segment: Segment) {
        let line = generated_line as usize;
        if self.lines.len() <= line {
            self.lines.resize_with(line + 1, Vec::new);
        }
        if let Some(segments) = self.lines.get_mut(line) {
            let at = segments.partition_point(|s| s.generated_column <= segment.generated_column);
            segments.insert(at, segment);
        }
    }

    pub fn lines(&self) -> &[Vec<Segment>] {
        &self.lines
    }

    /// The original position of the segment covering a generated position.
    pub fn original_position_for(&self, line: u32, column: u32) -> Option<OriginalPosition> {
        let segments = self.lines.get(line as usize)?;
        let covering = segments.partition_point(|s| s.generated_column <= column);
        segments.get(covering.checked_sub(1)?)?.original
    }

    pub fn encode_mappings(&self) -> String {
        let mut out = String::new();
        let (mut source, mut line, mut column, mut name) = (0i64, 0i64, 0i64, 0i64);
        for (index, segments) in self.lines.iter().enumerate() {
            if index > 0 {
                out.push(';');
            }
            let mut generated_column = 0i64;
            for (at, segment) in segments.iter().enumerate() {
                if at > 0 {
                    out.push(',');
                }
                encode_vlq(i64::from(segment.generated_column) - generated_column, &mut out);
                generated_column = i64::from(segment.generated_column);
                let Some(original) = segment.original else {
                    continue;
                };
                encode_vlq(i64::from(original.source) - source, &mut out);
                encode_vlq(i64::from(original.line) - line, &mut out);
                encode_vlq(i64::from(original.column) - column, &mut out);
                source = i64::from(original.source);
                line = i64::from(original.line);
                column = i64::from(original.column);
                if let Some(original_name) = original.name {
                    encode_vlq(i64::from(original_name) - name, &mut out);
                    name = i64::from(original_name);
                }
            }
        }
        out
    }

    pub fn decode_mappings(mappings: &str) -> Result<Vec<Vec<Segment>>, SourceMapError> {
        let (mut source, mut line, mut column, mut name) = (0i64, 0i64, 0i64, 0i64);
        let mut lines = Vec::new();
        for text in mappings.split(';') {
            let mut segments = Vec::new();
            let mut generated_column = 0i64;
            for encoded in text.split(',').filter(|s| !s.is_empty()) {
                let mut chars = encoded.chars().peekable();
                let mut fields = Vec::with_capacity(5);
                while chars.peek().is_some() {
                    fields.push(decode_vlq(&mut chars)?);
                }
                generated_column += fields.first().copied().unwrap_or_default();
                let original = match fields.as_slice() {
                    [_] => None,
                    [_, s, l, c, rest @ ..] if rest.len() <= 1 => {
                        source += s;
                        line += l;
                        column += c;
                        let original_name = rest.first().map(|n| {
                            name += n;
                            to_u32(name)
                        });
                        Some(OriginalPosition {
                            source: to_u32(source),
                            line: to_u32(line),
                            column: to_u32(column),
                            name: original_name,
                        })
                    }
                    other => return Err(SourceMapError::InvalidSegment(other.len())),
                };
                segments.push(Segment {
                    generated_column: to_u32(generated_column),
                    original,
                });
            }
            lines.push(segments);
        }
        Ok(lines)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "version": 3,
            "file": self.file,
            "sources": self.sources,
            "sourcesContent": self.sources_content,
            "names": self.names,
            "mappings": self.encode_mappings(),
        })
    }

    pub fn from_json(text: &str) -> Result<SourceMap, SourceMapError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| SourceMapError::Json(e.to_string()))?;
        let version = value
            .get("version")
            .and_then(Value::as_u64)
            .ok_or(SourceMapError::MissingField("version"))?;
        if version != 3 {
            return Err(SourceMapError::UnsupportedVersion(version));
        }
        let strings = |field: &str| -> Vec<Option<String>> {
            value
                .get(field)
                .and_then(Value::as_array)
                .map(|items| items.iter().map(|v| v.as_str().map(str::to_string)).collect())
                .unwrap_or_default()
        };
        if value.get("sources").and_then(Value::as_array).is_none() {
            return Err(SourceMapError::MissingField("sources"));
        }
        let mappings = value
            .get("mappings")
            .and_then(Value::as_str)
            .ok_or(SourceMapError::MissingField("mappings"))?;
        Ok(SourceMap {
            file: value.get("file").and_then(Value::as_str).map(str::to_string),
            sources: strings("sources").into_iter().map(Option::unwrap_or_default).collect(),
            sources_content: strings("sourcesContent"),
            names: strings("names").into_iter().flatten().collect(),
            lines: SourceMap::decode_mappings(mappings)?,
        })
    }
}

impl std::fmt::Display for SourceMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or_default()
}
