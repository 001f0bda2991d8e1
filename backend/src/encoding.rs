// Character encoding detection and conversion for the input XML
// A byte order mark wins, then the encoding declared in the XML declaration, then UTF-8.
// Line endings are normalized to LF.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::fs;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::logger;

/// How far into the file the XML declaration is looked for
const DECLARATION_SCAN_LIMIT: usize = 1024;

/// Reads an XML file, decodes it and normalizes line endings
pub fn read_xml_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| ConvertError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;

    decode_xml_bytes(&bytes, path)
}

fn decode_xml_bytes(bytes: &[u8], path: &Path) -> Result<String> {
    let (encoding, has_bom) = detect_encoding(bytes);

    let bytes_without_bom = if has_bom {
        match encoding {
            e if e == UTF_16LE || e == UTF_16BE => &bytes[2..],
            _ => &bytes[3..],
        }
    } else {
        bytes
    };

    let encoding = if has_bom {
        encoding
    } else {
        match declared_encoding(bytes) {
            Some(label) => encoding_for_label(label, path)?,
            None => encoding,
        }
    };

    logger::debug(&format!(
        "File: {:?}, Encoding: {}, BOM: {}",
        path.file_name().unwrap_or_default(),
        encoding.name(),
        has_bom
    ));

    let decoded = encoding
        .decode_without_bom_handling_and_without_replacement(bytes_without_bom)
        .ok_or_else(|| ConvertError::InvalidEncoding {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        })?;

    Ok(normalize_line_endings(&decoded))
}

/// Detects file encoding by examining the BOM
fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, bool) {
    // UTF-16LE BOM: 0xFF 0xFE
    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        return (UTF_16LE, true);
    }

    // UTF-16BE BOM: 0xFE 0xFF
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        return (UTF_16BE, true);
    }

    // UTF-8 BOM: 0xEF 0xBB 0xBF
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return (UTF_8, true);
    }

    (UTF_8, false)
}

/// The `encoding="..."` value of a leading `<?xml ...?>` declaration
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let head = &bytes[..bytes.len().min(DECLARATION_SCAN_LIMIT)];
    let head = head.strip_prefix(b"<?xml")?;
    let end = head.windows(2).position(|w| w == b"?>")?;
    let declaration = std::str::from_utf8(&head[..end]).ok()?;

    let rest = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let close = value.find(quote)?;

    Some(&value[..close])
}

fn encoding_for_label(label: &str, path: &Path) -> Result<&'static Encoding> {
    let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| ConvertError::UnsupportedEncoding {
        path: path.to_path_buf(),
        label: label.to_string(),
    })?;

    // A declaration readable as ASCII means the bytes are not UTF-16
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Ok(UTF_8);
    }
    Ok(encoding)
}

/// XML end-of-line handling: CRLF and lone CR become LF
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<String> {
        decode_xml_bytes(bytes, Path::new("in.xml"))
    }

    #[test]
    fn test_detect_utf16le_bom() {
        let bytes = vec![0xFF, 0xFE, 0x41, 0x00];
        let (encoding, has_bom) = detect_encoding(&bytes);
        assert_eq!(encoding, UTF_16LE);
        assert!(has_bom);
    }

    #[test]
    fn test_detect_utf8_bom() {
        let bytes = vec![0xEF, 0xBB, 0xBF, 0x41];
        let (encoding, has_bom) = detect_encoding(&bytes);
        assert_eq!(encoding, UTF_8);
        assert!(has_bom);
    }

    #[test]
    fn test_detect_no_bom() {
        let (encoding, has_bom) = detect_encoding(b"<Root/>");
        assert_eq!(encoding, UTF_8);
        assert!(!has_bom);
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("<Root>Qualität</Root>".as_bytes());
        assert_eq!(decode(&bytes).unwrap(), "<Root>Qualität</Root>");
    }

    #[test]
    fn test_decode_utf16le() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<a>ä</a>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode(&bytes).unwrap(), "<a>ä</a>");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let err = decode(b"<a>Qualit\xE4t</a>").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidEncoding { encoding: "UTF-8", .. }));
    }

    #[test]
    fn test_declared_latin1_is_honoured() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a>Qualit\xE4t</a>";
        assert_eq!(decode(bytes).unwrap(), "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a>Qualität</a>");
    }

    #[test]
    fn test_declared_encoding_single_quotes() {
        assert_eq!(declared_encoding(b"<?xml version='1.0' encoding = 'utf-8' ?><a/>"), Some("utf-8"));
        assert_eq!(declared_encoding(b"<?xml version=\"1.0\"?><a/>"), None);
        assert_eq!(declared_encoding(b"<a/>"), None);
    }

    #[test]
    fn test_unknown_declared_encoding() {
        let err = decode(b"<?xml version=\"1.0\" encoding=\"klingon\"?><a/>").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedEncoding { ref label, .. } if label == "klingon"));
    }

    #[test]
    fn test_line_endings_are_normalized() {
        assert_eq!(decode(b"<a>1\r\n2\r3\n4</a>").unwrap(), "<a>1\n2\n3\n4</a>");
    }
}
