//! Payload packaging for exports and uploads.
//!
//! An export travels as one JSON document, either bare or wrapped in a zip
//! archive that contains exactly one `.json` member. Uploads are read back
//! through the same module: the byte ceiling is enforced before anything is
//! decoded, zip input is detected by magic bytes, and the payload must be
//! valid JSON before it reaches the import pipeline.

pub mod error;

pub use error::{ArchiveError, ArchiveResult};

use chrono::Utc;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Uploads larger than this are rejected before any parsing happens.
pub const MAX_PAYLOAD_BYTES: usize = 1_000_000;

const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

/// Output packaging for an export document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormat {
    Json,
    Zip,
}

impl PackageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PackageFormat::Json => "json",
            PackageFormat::Zip => "zip",
        }
    }
}

/// `<prefix>-<YYYY-MM-DD>`, the file stem both package formats share.
pub fn package_stem(prefix: &str) -> String {
    format!("{}-{}", prefix, Utc::now().format("%Y-%m-%d"))
}

/// Writes an export document under `dir`, named from `prefix` and today's
/// date. The zip format produces an archive with a single `<stem>.json`
/// member. Returns the path written.
pub fn write_package(
    dir: &Path,
    prefix: &str,
    json_text: &str,
    format: PackageFormat,
) -> ArchiveResult<PathBuf> {
    let stem = package_stem(prefix);
    let path = dir.join(format!("{}.{}", stem, format.extension()));

    match format {
        PackageFormat::Json => {
            std::fs::write(&path, json_text)?;
        }
        PackageFormat::Zip => {
            let file = std::fs::File::create(&path)?;
            let mut archive = zip::ZipWriter::new(file);
            let options = zip::write::FileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            archive.start_file(format!("{}.json", stem), options)?;
            archive.write_all(json_text.as_bytes())?;
            archive.finish()?;
        }
    }

    info!(path = %path.display(), bytes = json_text.len(), "wrote export package");
    Ok(path)
}

/// Reads a package file and returns the JSON text inside it.
pub fn read_package(path: &Path) -> ArchiveResult<String> {
    let bytes = std::fs::read(path)?;
    read_payload(&bytes)
}

/// Decodes an uploaded payload into JSON text. Enforces the byte ceiling
/// first, unwraps zip input, and rejects anything that is not valid JSON —
/// all before any handler sees the document.
pub fn read_payload(bytes: &[u8]) -> ArchiveResult<String> {
    if bytes.is_empty() {
        return Err(ArchiveError::MissingPayload);
    }
    if bytes.len() > MAX_PAYLOAD_BYTES {
        return Err(ArchiveError::Oversized { size: bytes.len(), limit: MAX_PAYLOAD_BYTES });
    }

    let text = if bytes.starts_with(ZIP_MAGIC) {
        extract_json_member(bytes)?
    } else {
        String::from_utf8(bytes.to_vec())
            .map_err(|_| ArchiveError::InvalidJson("payload is not UTF-8".to_string()))?
    };

    if let Err(e) = serde_json::from_str::<serde_json::Value>(&text) {
        return Err(ArchiveError::InvalidJson(e.to_string()));
    }

    Ok(text)
}

/// Pulls the `.json` member out of a zip payload. Archives may carry hidden
/// system files, so only the `.json` member counts.
fn extract_json_member(bytes: &[u8]) -> ArchiveResult<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let member_name = (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
        .find(|name| name.ends_with(".json"))
        .ok_or(ArchiveError::NoJsonMember)?;

    let mut member = archive.by_name(&member_name)?;
    let mut text = String::new();
    member.read_to_string(&mut text)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn zip_with_members(members: &[(&str, &str)]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut archive = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::FileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            for (name, content) in members {
                archive.start_file(*name, options).unwrap();
                archive.write_all(content.as_bytes()).unwrap();
            }
            archive.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn zip_package_round_trips_exactly() {
        let dir = tempdir().unwrap();
        let document = r#"{"payment_gateways":{"cod":{"enabled":"yes"}}}"#;

        let path = write_package(dir.path(), "payment-gateways", document, PackageFormat::Zip)
            .unwrap();
        assert_eq!(path.extension().unwrap(), "zip");

        // Exactly one member, and it is the .json one
        let bytes = std::fs::read(&path).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        assert_eq!(archive.len(), 1);

        let text = read_package(&path).unwrap();
        assert_eq!(text, document);
    }

    #[test]
    fn json_package_round_trips() {
        let dir = tempdir().unwrap();
        let document = r#"{"general_tab":{"currency":"USD"}}"#;

        let path =
            write_package(dir.path(), "general-tab-settings", document, PackageFormat::Json)
                .unwrap();
        assert_eq!(path.extension().unwrap(), "json");
        assert_eq!(read_package(&path).unwrap(), document);
    }

    #[test]
    fn oversized_payload_is_rejected_before_parsing() {
        // Not valid JSON either, but the ceiling must fire first
        let payload = vec![b'x'; MAX_PAYLOAD_BYTES + 1];
        let result = read_payload(&payload);
        assert!(matches!(result, Err(ArchiveError::Oversized { .. })));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(read_payload(&[]), Err(ArchiveError::MissingPayload)));
    }

    #[test]
    fn invalid_json_is_rejected() {
        let result = read_payload(b"{\"unterminated\": ");
        assert!(matches!(result, Err(ArchiveError::InvalidJson(_))));
    }

    #[test]
    fn zip_with_system_files_still_finds_the_json_member() {
        let bytes = zip_with_members(&[
            (".hidden", "junk"),
            ("export-2026-01-01.json", r#"{"shipping":{}}"#),
        ]);
        assert_eq!(read_payload(&bytes).unwrap(), r#"{"shipping":{}}"#);
    }

    #[test]
    fn zip_without_json_member_is_rejected() {
        let bytes = zip_with_members(&[("readme.txt", "nothing here")]);
        assert!(matches!(read_payload(&bytes), Err(ArchiveError::NoJsonMember)));
    }

    #[test]
    fn zip_with_invalid_json_member_is_rejected() {
        let bytes = zip_with_members(&[("export.json", "not json at all")]);
        assert!(matches!(read_payload(&bytes), Err(ArchiveError::InvalidJson(_))));
    }
}
