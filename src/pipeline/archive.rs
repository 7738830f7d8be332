//! ZIP traversal: enumerate archive entries and filter them for extraction.
//!
//! ## Eligibility
//!
//! An entry is extracted iff it is not a directory, its name ends in `.pdf`
//! case-insensitively, and it does not live under the macOS metadata folder
//! (`__MACOSX/…` resource forks ship inside ZIPs created by Finder and are
//! not real PDFs despite their extension). Anything else — text files,
//! images, and notably nested `.zip` archives — is ignored: one level of
//! nesting is the contract, deeper nesting fails closed.
//!
//! Entries are visited in the archive's own listing order so the traversal
//! is deterministic for byte-identical input.

use crate::error::FileError;
use std::io::{Cursor, Read};
use tracing::debug;

/// One eligible archive entry. Transient: exists only during traversal.
#[derive(Debug)]
pub struct ArchiveEntry {
    /// Entry name (relative path inside the ZIP).
    pub name: String,
    /// Entry content, or the reason it could not be read.
    ///
    /// A single unreadable entry must not abort its siblings, so the read
    /// failure travels alongside the name instead of short-circuiting.
    pub data: Result<Vec<u8>, String>,
}

/// Upper bound on the buffer pre-allocated from an entry's declared size.
/// The size field comes from the archive and is untrusted; a forged header
/// must not be able to pre-allocate gigabytes. `read_to_end` still grows the
/// buffer past this for genuinely large entries.
const MAX_PREALLOC_BYTES: u64 = 16 * 1024 * 1024;

fn initial_capacity(declared_size: u64) -> usize {
    declared_size.min(MAX_PREALLOC_BYTES) as usize
}

/// Decide whether a ZIP entry should be extracted as a nested PDF.
pub fn is_eligible_entry(name: &str, is_dir: bool) -> bool {
    !is_dir && !name.starts_with("__MACOSX") && name.to_lowercase().ends_with(".pdf")
}

/// Open `data` as a ZIP archive and return its eligible entries in listing
/// order.
///
/// # Errors
/// [`FileError::InvalidArchive`] when the bytes are not a readable ZIP
/// container at all. Per-entry read failures do not error; they are carried
/// in [`ArchiveEntry::data`].
pub fn eligible_entries(archive_name: &str, data: &[u8]) -> Result<Vec<ArchiveEntry>, FileError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|e| FileError::InvalidArchive {
            name: archive_name.to_string(),
            detail: e.to_string(),
        })?;

    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                // Name unknown when the local header itself is broken.
                entries.push(ArchiveEntry {
                    name: format!("entry #{index}"),
                    data: Err(e.to_string()),
                });
                continue;
            }
        };

        let name = entry.name().to_string();
        if !is_eligible_entry(&name, entry.is_dir()) {
            debug!("Skipping ineligible archive entry: {}", name);
            continue;
        }

        let mut bytes = Vec::with_capacity(initial_capacity(entry.size()));
        let data = entry
            .read_to_end(&mut bytes)
            .map(|_| bytes)
            .map_err(|e| e.to_string());
        entries.push(ArchiveEntry { name, data });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])], dirs: &[&str]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for dir in dirs {
            writer.add_directory(*dir, options).unwrap();
        }
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn eligibility_predicate() {
        assert!(is_eligible_entry("a.pdf", false));
        assert!(is_eligible_entry("nested/dir/b.PDF", false));
        assert!(!is_eligible_entry("a.pdf", true));
        assert!(!is_eligible_entry("__MACOSX/._a.pdf", false));
        assert!(!is_eligible_entry("notes.txt", false));
        assert!(!is_eligible_entry("inner.zip", false));
        assert!(!is_eligible_entry("", false));
    }

    #[test]
    fn entries_come_back_in_listing_order() {
        let data = build_zip(
            &[("z.pdf", b"zz"), ("a.pdf", b"aa"), ("m.pdf", b"mm")],
            &[],
        );
        let entries = eligible_entries("stukken.zip", &data).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["z.pdf", "a.pdf", "m.pdf"]);
    }

    #[test]
    fn directories_and_macos_artifacts_are_filtered() {
        let data = build_zip(
            &[("__MACOSX/._a.pdf", b"junk"), ("a.pdf", b"aa"), ("readme.txt", b"hi")],
            &["folder/"],
        );
        let entries = eligible_entries("stukken.zip", &data).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.pdf");
        assert_eq!(entries[0].data.as_deref().unwrap(), b"aa");
    }

    #[test]
    fn declared_size_cannot_force_a_huge_allocation() {
        assert_eq!(initial_capacity(0), 0);
        assert_eq!(initial_capacity(1024), 1024);
        assert_eq!(initial_capacity(u64::MAX), MAX_PREALLOC_BYTES as usize);
    }

    #[test]
    fn entries_are_debuggable() {
        let data = build_zip(&[("a.pdf", b"aa")], &[]);
        let entries = eligible_entries("stukken.zip", &data).unwrap();
        let dbg = format!("{entries:?}");
        assert!(dbg.contains("a.pdf"));
    }

    #[test]
    fn garbage_is_an_invalid_archive() {
        let err = eligible_entries("broken.zip", b"PK\x03\x04 but not really").unwrap_err();
        assert!(matches!(err, FileError::InvalidArchive { ref name, .. } if name == "broken.zip"));
    }

    #[test]
    fn zip_without_eligible_entries_is_empty_not_error() {
        let data = build_zip(&[("notes.txt", b"hi")], &["empty/"]);
        let entries = eligible_entries("stukken.zip", &data).unwrap();
        assert!(entries.is_empty());
    }
}
