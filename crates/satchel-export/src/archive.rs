//! Grouping-selector zip export.
//!
//! Entries are named by each file document's original name and their bytes
//! round-trip exactly. An empty selection produces no output file at all,
//! not an empty archive. When a password is supplied, entries are AES-256
//! encrypted.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{AesMode, CompressionMethod, ZipWriter};

use satchel_core::{validate, DocumentKind, EntityId, Error, Result, UserId};
use satchel_store::Store;

/// Which grouping to export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupSelector {
    Aspect(EntityId),
    Briefcase(EntityId),
    Collection(EntityId),
}

/// Export the file documents of a grouping into `{out_dir}/{name}.zip`.
///
/// Returns the archive path, or `None` when the selection contains no file
/// documents (in which case nothing is written).
pub fn export_archive(
    store: &Store,
    owner: UserId,
    selector: GroupSelector,
    out_dir: &Path,
    name: &str,
    password: Option<&str>,
) -> Result<Option<PathBuf>> {
    validate::require_name("archive name", name)?;
    if name.contains(['/', '\\']) {
        return Err(Error::IllegalArgument(
            "archive name must not contain path separators".into(),
        ));
    }

    let members = match selector {
        GroupSelector::Aspect(id) => store.aspects.documents_with(owner, id)?,
        GroupSelector::Briefcase(id) => store.briefcases.contents(owner, id)?,
        GroupSelector::Collection(id) => store.collections.documents_in(owner, id)?,
    };

    let mut entries = Vec::new();
    for doc in members {
        if store.documents.kind(owner, doc)? != DocumentKind::File {
            continue;
        }
        let details = store.documents.file_details(owner, doc)?;
        let bytes = store.versions.current_content(owner, doc)?;
        entries.push((details.name, bytes));
    }
    if entries.is_empty() {
        debug!(owner, ?selector, "export: empty selection, no archive written");
        return Ok(None);
    }

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{}.zip", name));
    let file = fs::File::create(&path)?;
    let mut zip = ZipWriter::new(file);

    let mut used = HashSet::new();
    for (file_name, bytes) in &entries {
        let mut options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        if let Some(pw) = password {
            options = options.with_aes_encryption(AesMode::Aes256, pw);
        }
        let entry_name = unique_entry_name(&mut used, file_name);
        zip.start_file(entry_name.as_str(), options)
            .map_err(|e| Error::Archive(e.to_string()))?;
        zip.write_all(bytes)?;
    }
    zip.finish().map_err(|e| Error::Archive(e.to_string()))?;

    info!(owner, entries = entries.len(), path = %path.display(), "export: archive written");
    Ok(Some(path))
}

/// Entries keep their original file name; a repeated name gets a numeric
/// suffix before the extension.
fn unique_entry_name(used: &mut HashSet<String>, name: &str) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{}", ext)),
        _ => (name.to_string(), String::new()),
    };
    for k in 2.. {
        let candidate = format!("{} ({}){}", stem, k, ext);
        if used.insert(candidate.clone()) {
            return candidate;
        }
    }
    unreachable!("an unused suffix always exists")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_entry_name_suffixes_repeats() {
        let mut used = HashSet::new();
        assert_eq!(unique_entry_name(&mut used, "a.txt"), "a.txt");
        assert_eq!(unique_entry_name(&mut used, "a.txt"), "a (2).txt");
        assert_eq!(unique_entry_name(&mut used, "a.txt"), "a (3).txt");
        assert_eq!(unique_entry_name(&mut used, "README"), "README");
        assert_eq!(unique_entry_name(&mut used, "README"), "README (2)");
    }
}
