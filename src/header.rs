//! Header of a Praat short text file
//!
//! A short text file starts with a file type declaration and an object class
//! line, followed by one line per attribute of the object. For a `Pitch 1`
//! object the attributes before the frames are:
//!
//! ```text
//! File type = "ooTextFile"
//! Object class = "Pitch 1"
//!
//! xmin
//! xmax
//! nx
//! dx
//! x1
//! ceiling
//! maxnCandidates
//! ```

use crate::text_file::TextReader;
use crate::{PitchExportError, Result};
use std::io::BufRead;

/// First line of every Praat text file, terminator included
const FILE_TYPE_LINE: &str = "File type = \"ooTextFile\"\n";

const OBJECT_CLASS_PREFIX: &str = "Object class = ";

/// The only object class this crate converts
pub const SUPPORTED_OBJECT_CLASS: &str = "Pitch 1";

/// Header attributes of a `Pitch 1` text file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceHeader {
    pub object_class: String,
    /// Start time of the analysed sound
    pub xmin: f64,
    /// End time of the analysed sound
    pub xmax: f64,
    /// Number of frames (`nx`); may be zero or negative in a damaged file
    pub frame_count: i64,
    /// Time step between frames (`dx`)
    pub frame_step: f64,
    /// Time of the first frame centre (`x1`)
    pub first_frame_time: f64,
    /// Pitch ceiling used for the analysis (Hz)
    pub ceiling: f64,
    /// Maximum number of candidates per frame
    pub max_candidates: i64,
}

impl SourceHeader {
    /// Parse the header, leaving the reader positioned at the first frame.
    ///
    /// The declaration and class lines are checked before anything numeric
    /// is read; an unsupported class stops reading right after the class line.
    pub fn read<R: BufRead>(reader: &mut TextReader<R>) -> Result<Self> {
        let object_class = read_object_class(reader)?;
        if object_class != SUPPORTED_OBJECT_CLASS {
            return Err(PitchExportError::UnsupportedClass(object_class));
        }
        reader.skip_line()?;

        let header = Self {
            object_class,
            xmin: reader.read_f64("xmin")?,
            xmax: reader.read_f64("xmax")?,
            frame_count: reader.read_int("nx")?,
            frame_step: reader.read_f64("dx")?,
            first_frame_time: reader.read_f64("x1")?,
            ceiling: reader.read_f64("ceiling")?,
            max_candidates: reader.read_int("maxnCandidates")?,
        };

        log::debug!(
            "Pitch header: nx={} dx={} x1={} ceiling={} maxnCandidates={}",
            header.frame_count,
            header.frame_step,
            header.first_frame_time,
            header.ceiling,
            header.max_candidates
        );
        Ok(header)
    }
}

/// Check the file type declaration and return the unescaped object class
fn read_object_class<R: BufRead>(reader: &mut TextReader<R>) -> Result<String> {
    match reader.next_raw_line()? {
        Some(line) if line == FILE_TYPE_LINE.as_bytes() => {}
        Some(line) => {
            return Err(PitchExportError::Format(format!(
                "not a Praat text file (first line is {:?})",
                String::from_utf8_lossy(line).trim_end()
            )))
        }
        None => return Err(PitchExportError::Format("file is empty".to_string())),
    }

    let line = reader
        .next_raw_line()?
        .ok_or_else(|| PitchExportError::Format("missing object class line".to_string()))?;
    let line = std::str::from_utf8(line)
        .map_err(|_| PitchExportError::Format("object class line is not text".to_string()))?;
    let literal = line
        .strip_prefix(OBJECT_CLASS_PREFIX)
        .ok_or_else(|| PitchExportError::Format(format!("expected object class, found {:?}", line.trim_end())))?;
    unescape_string(literal.trim())
}

/// Unescape a Praat string literal: `"Pitch 1"` -> `Pitch 1`, `""` -> `"`
pub fn unescape_string(literal: &str) -> Result<String> {
    let inner = literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| PitchExportError::Format(format!("malformed string literal {}", literal)))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '"' {
            // Inside the literal a quote only appears doubled
            if chars.next() != Some('"') {
                return Err(PitchExportError::Format(format!(
                    "malformed string literal {}",
                    literal
                )));
            }
        }
        out.push(c);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    fn reader(text: &str) -> TextReader<Cursor<String>> {
        TextReader::new(Cursor::new(text.to_string()))
    }

    const HEADER: &str = "File type = \"ooTextFile\"\nObject class = \"Pitch 1\"\n\n\
0\n1.5\n148\n0.01\n0.02\n600\n15\n";

    #[test]
    fn test_read_pitch_header() {
        let mut r = reader(HEADER);
        let header = SourceHeader::read(&mut r).unwrap();
        assert_eq!(header.object_class, "Pitch 1");
        assert_eq!(header.frame_count, 148);
        assert_eq!(header.max_candidates, 15);
        assert_relative_eq!(header.xmax, 1.5);
        assert_relative_eq!(header.frame_step, 0.01);
        assert_relative_eq!(header.first_frame_time, 0.02);
        assert_relative_eq!(header.ceiling, 600.0);
        assert_eq!(r.line_number(), 10);
    }

    #[test]
    fn test_wrong_file_type() {
        let mut r = reader("File type = \"ooBinaryFile\"\nObject class = \"Pitch 1\"\n");
        assert!(matches!(SourceHeader::read(&mut r), Err(PitchExportError::Format(_))));
        // Nothing past the first line is consumed
        assert_eq!(r.line_number(), 1);
    }

    #[test]
    fn test_binary_pitch_file_is_format_error() {
        let mut bytes = b"ooBinaryFile\x05Pitch\x00".to_vec();
        bytes.extend_from_slice(&0.0f64.to_be_bytes());
        bytes.extend_from_slice(&1.5f64.to_be_bytes());
        bytes.push(b'\n');
        let mut r = TextReader::new(Cursor::new(bytes));
        assert!(matches!(SourceHeader::read(&mut r), Err(PitchExportError::Format(_))));
    }

    #[test]
    fn test_non_text_class_line_is_format_error() {
        let mut bytes = b"File type = \"ooTextFile\"\n".to_vec();
        bytes.extend_from_slice(b"Object class = \"\xff\xfe\"\n");
        let mut r = TextReader::new(Cursor::new(bytes));
        assert!(matches!(SourceHeader::read(&mut r), Err(PitchExportError::Format(_))));
    }

    #[test]
    fn test_file_type_needs_terminator() {
        let mut r = reader("File type = \"ooTextFile\"");
        assert!(matches!(SourceHeader::read(&mut r), Err(PitchExportError::Format(_))));
    }

    #[test]
    fn test_missing_class_prefix() {
        let mut r = reader("File type = \"ooTextFile\"\nClass = \"Pitch 1\"\n");
        assert!(matches!(SourceHeader::read(&mut r), Err(PitchExportError::Format(_))));
    }

    #[test]
    fn test_unsupported_class_stops_early() {
        let mut r = reader("File type = \"ooTextFile\"\nObject class = \"Intensity 2\"\n\nnot a number\n");
        match SourceHeader::read(&mut r) {
            Err(PitchExportError::UnsupportedClass(class)) => assert_eq!(class, "Intensity 2"),
            other => panic!("expected unsupported class, got {:?}", other),
        }
        assert_eq!(r.line_number(), 2);
    }

    #[test]
    fn test_bad_numeric_header_line() {
        let text = HEADER.replace("148", "many");
        let mut r = reader(&text);
        assert!(matches!(
            SourceHeader::read(&mut r),
            Err(PitchExportError::Parse { line: 6, .. })
        ));
    }

    #[test]
    fn test_unescape_string() {
        assert_eq!(unescape_string("\"Pitch 1\"").unwrap(), "Pitch 1");
        assert_eq!(unescape_string("\"a \"\"b\"\"\"").unwrap(), "a \"b\"");
        assert_eq!(unescape_string("\"\"").unwrap(), "");
        assert!(unescape_string("Pitch 1").is_err());
        assert!(unescape_string("\"").is_err());
        assert!(unescape_string("\"a\"b\"").is_err());
    }
}
