//! # Listado de Directorios
//! src/library/listing.rs
//!
//! Enumera solo los hijos inmediatos de un directorio ya resuelto.
//! Se ordenan por nombre para que dos requests iguales den la misma página.

use super::{relative_link, Entry, EntryKind, LibraryRoot};
use std::fs;
use std::io;
use std::path::Path;

/// Lista los hijos inmediatos de `dir`
///
/// Los directorios llevan `/` al final del link. Un directorio vacío da
/// un vector vacío.
pub fn list_directory(root: &LibraryRoot, dir: &Path) -> io::Result<Vec<Entry>> {
    let mut children = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    children.sort_by_key(|child| child.file_name());

    let mut entries = Vec::with_capacity(children.len());

    for child in children {
        let path = child.path();
        let Some(mut link) = relative_link(root, &path) else {
            // Solo pasa con un hermano aceptado por el prefijo de texto
            log::warn!("⚠️  {} no es relativo a la raíz, se omite", path.display());
            continue;
        };

        // fs::metadata sigue symlinks, como el resto del servidor
        let kind = if path.is_dir() {
            link.push('/');
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        entries.push(Entry {
            name: child.file_name().to_string_lossy().into_owned(),
            link,
            kind,
        });
    }

    Ok(entries)
}
