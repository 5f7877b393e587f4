//! File type detection from raw bytes
//!
//! Detection never fails. Content sniffing through the `infer` registry is
//! tried first (when the `sniff` feature is enabled); otherwise a short list
//! of signatures covers the formats the analyzers understand, and anything
//! else is treated as plain text.

use log::debug;

pub const PDF: &str = "application/pdf";
pub const JPEG: &str = "image/jpeg";
pub const PNG: &str = "image/png";
pub const GIF: &str = "image/gif";
pub const BMP: &str = "image/bmp";
pub const PLAIN_TEXT: &str = "text/plain";

/// Image types the image analyzer decodes and the chat backend accepts inline.
pub const IMAGE_TYPES: [&str; 4] = [JPEG, PNG, GIF, BMP];

const PDF_MAGIC: &[u8] = b"%PDF";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];

#[cfg(feature = "sniff")]
const PORTABLE_EXECUTABLE: &str = "application/vnd.microsoft.portable-executable";

/// Sizes of the BMP info headers in use (BITMAPCOREHEADER through BITMAPV5HEADER).
#[cfg(feature = "sniff")]
const BMP_INFO_HEADER_SIZES: [u32; 8] = [12, 16, 40, 52, 56, 64, 108, 124];

/// Analyzer family a media type routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Pdf,
    Text,
    Unsupported,
}

impl MediaKind {
    pub fn from_media_type(media_type: &str) -> Self {
        if IMAGE_TYPES.contains(&media_type) {
            MediaKind::Image
        } else if media_type == PDF {
            MediaKind::Pdf
        } else if media_type == PLAIN_TEXT || media_type.contains("text") {
            MediaKind::Text
        } else {
            MediaKind::Unsupported
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MediaKind::Image => "image",
            MediaKind::Pdf => "pdf",
            MediaKind::Text => "text",
            MediaKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Detected media type together with the analyzer family it routes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub media_type: String,
    pub kind: MediaKind,
}

/// Best-guess media type for `bytes`.
pub fn detect(bytes: &[u8]) -> String {
    if let Some(media_type) = sniff(bytes) {
        debug!("Sniffed media type: {}", media_type);
        return media_type;
    }

    let media_type = fallback_signature(bytes);
    debug!("Fallback media type: {}", media_type);
    media_type.to_string()
}

pub fn detect_kind(bytes: &[u8]) -> Detection {
    let media_type = detect(bytes);
    let kind = MediaKind::from_media_type(&media_type);
    Detection { media_type, kind }
}

/// Signature checks used when content sniffing is unavailable or finds nothing.
pub fn fallback_signature(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(PDF_MAGIC) {
        PDF
    } else if bytes.starts_with(JPEG_MAGIC) {
        JPEG
    } else if bytes.starts_with(PNG_MAGIC) {
        PNG
    } else {
        PLAIN_TEXT
    }
}

#[cfg(feature = "sniff")]
fn sniff(bytes: &[u8]) -> Option<String> {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .filter(|mime| !mime.is_empty())
        .filter(|mime| {
            let confirmed = header_confirms(mime, bytes);
            if !confirmed {
                debug!("Discarding {} match: header does not check out", mime);
            }
            confirmed
        })
        .map(str::to_string)
}

/// `infer` matches BMP and PE files on their first two bytes alone, which
/// plain text starting with "BM" or "MZ" also satisfies. Those two need a
/// structural check; every other match is taken as is.
#[cfg(feature = "sniff")]
fn header_confirms(media_type: &str, bytes: &[u8]) -> bool {
    match media_type {
        BMP => is_bmp_header(bytes),
        PORTABLE_EXECUTABLE => is_pe_header(bytes),
        _ => true,
    }
}

#[cfg(feature = "sniff")]
fn read_u32_le(bytes: &[u8], offset: usize) -> Option<u32> {
    let field = bytes.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([field[0], field[1], field[2], field[3]]))
}

/// "BM", then a 12-byte file header, then an info header of a known size.
#[cfg(feature = "sniff")]
fn is_bmp_header(bytes: &[u8]) -> bool {
    bytes.starts_with(b"BM")
        && read_u32_le(bytes, 14).map_or(false, |size| BMP_INFO_HEADER_SIZES.contains(&size))
}

/// "MZ", with the offset at 0x3C pointing at a "PE\0\0" signature.
#[cfg(feature = "sniff")]
fn is_pe_header(bytes: &[u8]) -> bool {
    if !bytes.starts_with(b"MZ") {
        return false;
    }
    read_u32_le(bytes, 0x3C)
        .and_then(|offset| usize::try_from(offset).ok())
        .and_then(|offset| bytes.get(offset..offset.checked_add(4)?))
        .map_or(false, |signature| signature == b"PE\0\0")
}

#[cfg(not(feature = "sniff"))]
fn sniff(_bytes: &[u8]) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_signatures() {
        assert_eq!(fallback_signature(b"%PDF-1.4\n"), PDF);
        assert_eq!(fallback_signature(&[0xFF, 0xD8, 0xFF, 0xE0]), JPEG);
        assert_eq!(fallback_signature(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]), PNG);
        assert_eq!(fallback_signature(b""), PLAIN_TEXT);
        assert_eq!(fallback_signature(b"just some words"), PLAIN_TEXT);
    }

    #[test]
    fn test_partial_signatures_fall_through() {
        // Two of the three JPEG marker bytes
        assert_eq!(fallback_signature(&[0xFF, 0xD8]), PLAIN_TEXT);
        assert_eq!(fallback_signature(b"%PD"), PLAIN_TEXT);
    }

    #[test]
    fn test_detect_known_prefixes() {
        assert_eq!(detect(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n"), PDF);
        assert_eq!(detect(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F']), JPEG);
        assert_eq!(detect(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]), PNG);
    }

    #[test]
    fn test_detect_defaults_to_text() {
        assert_eq!(detect(b""), PLAIN_TEXT);
        assert_eq!(detect(&[0x13, 0x37, 0x42, 0x99, 0x07, 0x01]), PLAIN_TEXT);
        assert_eq!(detect(b"hello\nworld\n"), PLAIN_TEXT);
    }

    #[test]
    fn test_detect_never_returns_empty() {
        let samples: [&[u8]; 5] = [b"", b"\x00", b"\xFF\xFF\xFF\xFF", b"GIF89a", b"PK\x03\x04"];
        for sample in samples {
            assert!(!detect(sample).is_empty());
        }
    }

    #[test]
    fn test_media_kind_routing() {
        assert_eq!(MediaKind::from_media_type("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_media_type("image/bmp"), MediaKind::Image);
        assert_eq!(MediaKind::from_media_type("application/pdf"), MediaKind::Pdf);
        assert_eq!(MediaKind::from_media_type("text/plain"), MediaKind::Text);
        assert_eq!(MediaKind::from_media_type("text/html"), MediaKind::Text);
        assert_eq!(MediaKind::from_media_type("application/zip"), MediaKind::Unsupported);
        assert_eq!(MediaKind::from_media_type("image/webp"), MediaKind::Unsupported);
    }

    #[test]
    fn test_text_with_weak_signature_prefix() {
        assert_eq!(detect(b"BMW quarterly sales\nrevenue up 4%\n"), PLAIN_TEXT);
        assert_eq!(detect(b"BM"), PLAIN_TEXT);
        assert_eq!(detect(b"MZ Corp meeting notes\nagenda: hiring plan, office move\n"), PLAIN_TEXT);
    }

    #[cfg(feature = "sniff")]
    #[test]
    fn test_bmp_header_check() {
        let mut header = vec![0u8; 54];
        header[..2].copy_from_slice(b"BM");
        header[14..18].copy_from_slice(&40u32.to_le_bytes());
        assert!(is_bmp_header(&header));

        header[14..18].copy_from_slice(b"W qu");
        assert!(!is_bmp_header(&header));
        assert!(!is_bmp_header(b"BM\x00\x00"));
    }

    #[cfg(feature = "sniff")]
    #[test]
    fn test_pe_header_check() {
        let mut exe = vec![0u8; 0x84];
        exe[..2].copy_from_slice(b"MZ");
        exe[0x3C..0x40].copy_from_slice(&0x80u32.to_le_bytes());
        exe[0x80..0x84].copy_from_slice(b"PE\0\0");
        assert!(is_pe_header(&exe));

        exe[0x3C..0x40].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(!is_pe_header(&exe));
        assert!(!is_pe_header(b"MZ"));
    }

    #[cfg(feature = "sniff")]
    #[test]
    fn test_real_executable_still_sniffed() {
        let mut exe = vec![0u8; 0x84];
        exe[..2].copy_from_slice(b"MZ");
        exe[0x3C..0x40].copy_from_slice(&0x80u32.to_le_bytes());
        exe[0x80..0x84].copy_from_slice(b"PE\0\0");
        assert_eq!(detect_kind(&exe).kind, MediaKind::Unsupported);
    }

    #[test]
    fn test_detect_kind() {
        let detection = detect_kind(b"%PDF-1.5");
        assert_eq!(detection.media_type, PDF);
        assert_eq!(detection.kind, MediaKind::Pdf);
    }
}
