//! Best-effort check that library PDFs carry encryption.
//!
//! This is a diagnostic signal only. Nothing in the package build depends on
//! the answer.

use std::fmt;
use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::library::list_documents;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Protection {
    /// The document declares an `/Encrypt` dictionary.
    Protected,
    /// The document parsed cleanly and has no encryption.
    NotProtected,
    /// The probe could not decide; the reason is attached.
    Indeterminate(String),
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protection::Protected => write!(f, "protected"),
            Protection::NotProtected => write!(f, "not protected"),
            Protection::Indeterminate(reason) => write!(f, "indeterminate ({reason})"),
        }
    }
}

/// Probe raw PDF bytes.
///
/// lopdf may refuse to load a document whose user password is not empty, and
/// may drop `/Encrypt` from the trailer once it decrypts with the empty
/// password. The raw trailer is therefore checked before loading. Text that
/// merely mentions `/Encrypt` elsewhere in the file does not count.
pub fn probe_bytes(bytes: &[u8]) -> Protection {
    if !bytes.starts_with(b"%PDF-") {
        return Protection::Indeterminate("missing %PDF- header".to_string());
    }
    let declares_encrypt = trailer_declares_encrypt(bytes);
    match Document::load_mem(bytes) {
        Ok(doc) if doc.is_encrypted() || declares_encrypt => Protection::Protected,
        Ok(_) => Protection::NotProtected,
        Err(_) if declares_encrypt => Protection::Protected,
        Err(e) => Protection::Indeterminate(format!("parse error: {e}")),
    }
}

/// Probe one file on disk. A read failure is indeterminate, not an error.
pub fn probe_file(path: &Path) -> Protection {
    match std::fs::read(path) {
        Ok(bytes) => probe_bytes(&bytes),
        Err(e) => Protection::Indeterminate(format!("cannot read {}: {e}", path.display())),
    }
}

/// Probe the first document (by filename) in `dir`.
pub fn probe_sample(dir: &Path, extension: &str) -> Protection {
    let files = match list_documents(dir, extension) {
        Ok(files) => files,
        Err(e) => return Protection::Indeterminate(e.to_string()),
    };
    match files.first() {
        Some(sample) => {
            debug!(sample = %sample.display(), "probing sample document");
            probe_file(sample)
        }
        None => Protection::Indeterminate(format!("no documents in {}", dir.display())),
    }
}

/// Whether the raw trailer dictionary names an `/Encrypt` entry.
///
/// Classic files keep the trailer between the last `trailer` keyword and
/// `startxref`. Files with a cross-reference stream keep it in the stream
/// dictionary at the offset `startxref` points to.
fn trailer_declares_encrypt(bytes: &[u8]) -> bool {
    let trailer = match rfind(bytes, b"trailer") {
        Some(start) => {
            let tail = &bytes[start..];
            let end = find(tail, b"startxref").unwrap_or(tail.len());
            &tail[..end]
        }
        None => match xref_stream_dict(bytes) {
            Some(dict) => dict,
            None => return false,
        },
    };
    find(trailer, b"/Encrypt").is_some()
}

/// Dictionary of the cross-reference stream object named by `startxref`.
fn xref_stream_dict(bytes: &[u8]) -> Option<&[u8]> {
    let keyword = rfind(bytes, b"startxref")?;
    let digits: String = bytes[keyword + b"startxref".len()..]
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take_while(|b| b.is_ascii_digit())
        .map(|&b| char::from(b))
        .collect();
    let offset: usize = digits.parse().ok()?;
    let object = bytes.get(offset..)?;
    let end = find(object, b"stream").unwrap_or(object.len());
    Some(&object[..end])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Object, Stream, dictionary};
    use tempfile::TempDir;

    fn plain_pdf() -> Vec<u8> {
        plain_pdf_with_content(b"")
    }

    fn plain_pdf_with_content(content: &[u8]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn encrypted_pdf() -> Vec<u8> {
        concat!(
            "%PDF-1.4\n",
            "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n",
            "2 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n",
            "3 0 obj\n<< /Filter /Standard /V 2 /R 3 /Length 128 /P -3904 ",
            "/O <00> /U <00> >>\nendobj\n",
            "trailer\n<< /Root 1 0 R /Encrypt 3 0 R /Size 4 >>\n",
            "%%EOF\n",
        )
        .as_bytes()
        .to_vec()
    }

    #[test]
    fn plain_pdf_not_protected() {
        assert_eq!(probe_bytes(&plain_pdf()), Protection::NotProtected);
    }

    #[test]
    fn encrypt_trailer_is_protected() {
        assert_eq!(probe_bytes(&encrypted_pdf()), Protection::Protected);
    }

    #[test]
    fn encrypt_mentioned_in_page_text_is_not_protected() {
        let pdf = plain_pdf_with_content(b"BT /F1 12 Tf (see /Encrypt docs) Tj ET");
        assert!(find(&pdf, b"/Encrypt").is_some());
        assert_eq!(probe_bytes(&pdf), Protection::NotProtected);
    }

    #[test]
    fn xref_stream_trailer_is_checked() {
        let pdf = concat!(
            "%PDF-1.5\n",
            "5 0 obj\n<< /Type /XRef /Root 1 0 R /Encrypt 3 0 R /Size 6 >>\n",
            "stream\nxx\nendstream\nendobj\n",
            "startxref\n9\n%%EOF\n",
        );
        assert!(trailer_declares_encrypt(pdf.as_bytes()));

        let plain = pdf.replace("/Encrypt 3 0 R ", "");
        assert!(!trailer_declares_encrypt(plain.as_bytes()));
    }

    #[test]
    fn non_pdf_is_indeterminate() {
        assert!(matches!(
            probe_bytes(b"hello world"),
            Protection::Indeterminate(_)
        ));
    }

    #[test]
    fn unreadable_file_is_indeterminate() {
        assert!(matches!(
            probe_file(Path::new("/nonexistent/sample.pdf")),
            Protection::Indeterminate(_)
        ));
    }

    #[test]
    fn sample_uses_first_document() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), encrypted_pdf()).unwrap();
        std::fs::write(tmp.path().join("b.pdf"), plain_pdf()).unwrap();
        assert_eq!(probe_sample(tmp.path(), "pdf"), Protection::Protected);
    }

    #[test]
    fn empty_dir_sample_is_indeterminate() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            probe_sample(tmp.path(), "pdf"),
            Protection::Indeterminate(_)
        ));
    }
}
