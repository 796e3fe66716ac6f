//! Deployment package: a local mirror of the remote storage layout.
//!
//! The package directory is replaced wholesale on every build. Each language
//! directory is copied to `<package>/<code>/` and an instructions file
//! describing the manual upload is written at the package root.

use std::path::{Path, PathBuf};

use doclib_core::LanguageDir;
use tracing::info;

use crate::StoreError;
use crate::library::{count_entries, list_documents};

/// Document count of one source language directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCount {
    pub code: String,
    pub path: PathBuf,
    pub documents: usize,
}

/// One language subdirectory of a built package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedLanguage {
    pub code: String,
    pub dir: PathBuf,
    /// Entries in the copied subdirectory.
    pub entries: usize,
}

#[derive(Debug, Clone)]
pub struct PackageManifest {
    pub dir: PathBuf,
    pub languages: Vec<PackagedLanguage>,
    pub instructions: PathBuf,
}

impl PackageManifest {
    pub fn total_entries(&self) -> usize {
        self.languages.iter().map(|l| l.entries).sum()
    }
}

/// Check every source directory exists and count its documents.
///
/// The first missing directory aborts with [`StoreError::DirectoryNotFound`].
pub fn verify_sources(
    languages: &[LanguageDir],
    extension: &str,
) -> Result<Vec<SourceCount>, StoreError> {
    let mut counts = Vec::with_capacity(languages.len());
    for lang in languages {
        let documents = list_documents(&lang.path, extension)?.len();
        info!(
            lang = %lang.code,
            documents,
            dir = %lang.path.display(),
            "source directory verified"
        );
        counts.push(SourceCount {
            code: lang.code.clone(),
            path: lang.path.clone(),
            documents,
        });
    }
    let total: usize = counts.iter().map(|c| c.documents).sum();
    info!(total, "protected documents found");
    Ok(counts)
}

/// Build the package at `package_dir`, replacing anything already there.
pub fn build_package(
    languages: &[LanguageDir],
    package_dir: &Path,
    instructions_file: &str,
    bucket: &str,
) -> Result<PackageManifest, StoreError> {
    if package_dir.exists() {
        info!(dir = %package_dir.display(), "removing previous package");
        std::fs::remove_dir_all(package_dir).map_err(StoreError::io(package_dir))?;
    }
    std::fs::create_dir_all(package_dir).map_err(StoreError::io(package_dir))?;

    let mut packaged = Vec::with_capacity(languages.len());
    for lang in languages {
        if !lang.path.is_dir() {
            return Err(StoreError::DirectoryNotFound(lang.path.clone()));
        }
        let dest = package_dir.join(&lang.code);
        copy_dir_all(&lang.path, &dest)?;
        let entries = count_entries(&dest)?;
        info!(lang = %lang.code, entries, dest = %dest.display(), "copied documents");
        packaged.push(PackagedLanguage {
            code: lang.code.clone(),
            dir: dest,
            entries,
        });
    }

    let instructions = package_dir.join(instructions_file);
    std::fs::write(&instructions, render_instructions(&packaged, bucket))
        .map_err(StoreError::io(&instructions))?;

    info!(dir = %package_dir.display(), "deployment package created");
    Ok(PackageManifest {
        dir: package_dir.to_path_buf(),
        languages: packaged,
        instructions,
    })
}

/// Upload instructions shipped inside the package.
pub fn render_instructions(languages: &[PackagedLanguage], bucket: &str) -> String {
    let mut out =
        String::from("\n# Protected Documents Upload Instructions\n\n## Package Contents\n");
    for lang in languages {
        out.push_str(&format!(
            "- {code}/ - {code} protected documents ({n} files)\n",
            code = lang.code,
            n = lang.entries
        ));
    }

    out.push_str("\n## Upload to Supabase Storage\n");
    out.push_str("1. Go to your Supabase project dashboard\n");
    out.push_str(&format!("2. Navigate to Storage → {bucket} bucket\n"));
    let mut step = 3;
    for lang in languages {
        out.push_str(&format!(
            "{step}. Upload the contents of the '{code}' folder to the '{code}' path in storage\n",
            code = lang.code
        ));
        step += 1;
    }
    out.push_str(&format!(
        "{step}. Use \"Replace\" option to overwrite existing files\n"
    ));

    out.push_str(
        "\n## Verification\n\
         After upload, test that:\n\
         1. Documents require password to open\n\
         2. Watermark appears at bottom of each page\n\
         3. Printing and copying are disabled\n",
    );
    out
}

fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), StoreError> {
    std::fs::create_dir_all(dst).map_err(StoreError::io(dst))?;
    for entry in std::fs::read_dir(src).map_err(StoreError::io(src))? {
        let entry = entry.map_err(StoreError::io(src))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let ty = entry.file_type().map_err(StoreError::io(&from))?;
        if ty.is_dir() {
            copy_dir_all(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(StoreError::io(&from))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn library(root: &Path, en: usize, es: usize) -> Vec<LanguageDir> {
        let langs = vec![
            LanguageDir::new("en", root.join("english")),
            LanguageDir::new("es", root.join("spanish")),
        ];
        for (lang, n) in langs.iter().zip([en, es]) {
            std::fs::create_dir_all(&lang.path).unwrap();
            for i in 0..n {
                std::fs::write(lang.path.join(format!("doc-{i}.pdf")), b"%PDF-1.4").unwrap();
            }
        }
        langs
    }

    #[test]
    fn verify_counts_documents() {
        let tmp = TempDir::new().unwrap();
        let langs = library(tmp.path(), 3, 2);
        std::fs::write(langs[0].path.join("notes.txt"), b"x").unwrap();

        let counts = verify_sources(&langs, "pdf").unwrap();
        assert_eq!(counts[0].documents, 3);
        assert_eq!(counts[1].documents, 2);
    }

    #[test]
    fn verify_missing_dir_errors() {
        let tmp = TempDir::new().unwrap();
        let mut langs = library(tmp.path(), 1, 1);
        langs[1].path = tmp.path().join("absent");
        assert!(matches!(
            verify_sources(&langs, "pdf"),
            Err(StoreError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn build_mirrors_sources() {
        let tmp = TempDir::new().unwrap();
        let langs = library(tmp.path(), 4, 2);
        let package = tmp.path().join("package");

        let manifest = build_package(&langs, &package, "UPLOAD_INSTRUCTIONS.txt", "documents")
            .unwrap();

        assert_eq!(count_entries(&package.join("en")).unwrap(), 4);
        assert_eq!(count_entries(&package.join("es")).unwrap(), 2);
        assert_eq!(manifest.total_entries(), 6);
        assert!(manifest.instructions.is_file());

        let text = std::fs::read_to_string(&manifest.instructions).unwrap();
        assert!(text.contains("- en/ - en protected documents (4 files)"));
        assert!(text.contains("- es/ - es protected documents (2 files)"));
    }

    #[test]
    fn rebuild_drops_stale_files() {
        let tmp = TempDir::new().unwrap();
        let langs = library(tmp.path(), 1, 1);
        let package = tmp.path().join("package");
        std::fs::create_dir_all(package.join("en")).unwrap();
        std::fs::write(package.join("en/stale.pdf"), b"old").unwrap();
        std::fs::write(package.join("leftover.txt"), b"old").unwrap();

        build_package(&langs, &package, "UPLOAD_INSTRUCTIONS.txt", "documents").unwrap();

        assert!(!package.join("en/stale.pdf").exists());
        assert!(!package.join("leftover.txt").exists());
        assert_eq!(count_entries(&package.join("en")).unwrap(), 1);
    }

    #[test]
    fn copies_nested_directories() {
        let tmp = TempDir::new().unwrap();
        let langs = library(tmp.path(), 1, 0);
        std::fs::create_dir_all(langs[0].path.join("archive")).unwrap();
        std::fs::write(langs[0].path.join("archive/old.pdf"), b"x").unwrap();
        let package = tmp.path().join("package");

        build_package(&langs, &package, "UPLOAD_INSTRUCTIONS.txt", "documents").unwrap();

        assert!(package.join("en/archive/old.pdf").is_file());
        assert_eq!(count_entries(&package.join("en")).unwrap(), 2);
    }

    #[test]
    fn instructions_number_steps_per_language() {
        let langs = vec![
            PackagedLanguage {
                code: "en".into(),
                dir: PathBuf::from("p/en"),
                entries: 1,
            },
            PackagedLanguage {
                code: "es".into(),
                dir: PathBuf::from("p/es"),
                entries: 0,
            },
        ];
        let text = render_instructions(&langs, "documents");
        assert!(text.contains("2. Navigate to Storage → documents bucket"));
        assert!(text.contains("3. Upload the contents of the 'en' folder to the 'en' path"));
        assert!(text.contains("4. Upload the contents of the 'es' folder to the 'es' path"));
        assert!(text.contains("5. Use \"Replace\" option"));
    }
}
