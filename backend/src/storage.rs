/* agridata-backend
 * Copyright (C) 2026 The agridata-backend authors
 *
 * This library is free software; you can redistribute it and/or
 * modify it under the terms of the GNU Lesser General Public
 * License as published by the Free Software Foundation; either
 * version 2 of the License, or (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
 * Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public
 * License along with this library; if not, write to the
 * Free Software Foundation, Inc., 59 Temple Place - Suite 330,
 * Boston, MA 02111-1307, USA.
 */

//! File-backed blob store for device images. The database only holds the
//! relative file name returned by [`ImageStore::save`].

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(ImageStore { root })
    }

    /// Copy an uploaded file into the store and return the opaque
    /// relative name to persist. Files are grouped per device.
    pub fn save(
        &self,
        device_id: uuid::Uuid,
        source: &Path,
        original_name: &str,
    ) -> io::Result<String> {
        let file_name = format!(
            "{}/{}-{}",
            device_id,
            uuid::Uuid::new_v4(),
            sanitize_file_name(original_name)
        );
        let target = self.root.join(&file_name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, &target)?;

        Ok(file_name)
    }

    /// Resolve a stored name back to a path inside the store root.
    /// Names containing parent components do not resolve.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        let relative = Path::new(file_name);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return None;
        }

        Some(self.root.join(relative))
    }

    pub fn remove(&self, file_name: &str) -> io::Result<()> {
        match self.resolve(file_name) {
            Some(path) => fs::remove_file(path),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid stored file name",
            )),
        }
    }
}

/// Strip any path components and replace everything outside a
/// conservative character set.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\temp\\shot.png"), "shot.png");
        assert_eq!(sanitize_file_name("weird name?.png"), "weird_name_.png");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name(".."), "file");
    }

    #[test]
    fn test_save_and_resolve_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path()).unwrap();

        let mut src = tempfile::NamedTempFile::new().unwrap();
        src.write_all(b"not really a jpeg").unwrap();

        let device_id = uuid::Uuid::new_v4();
        let name = store.save(device_id, src.path(), "plot.jpg").unwrap();
        assert!(name.starts_with(&device_id.to_string()));
        assert!(name.ends_with("plot.jpg"));

        let path = store.resolve(&name).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"not really a jpeg");

        store.remove(&name).unwrap();
        assert!(!store.resolve(&name).unwrap().exists());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path()).unwrap();

        assert!(store.resolve("../outside.jpg").is_none());
        assert!(store.resolve("a/../../outside.jpg").is_none());
        assert!(store.resolve("/etc/passwd").is_none());
        assert!(store.remove("../outside.jpg").is_err());
    }
}
