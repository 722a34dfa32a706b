//! # Biblioteca en Disco
//! src/library/mod.rs
//!
//! Todo lo que toca el sistema de archivos:
//!
//! - `resolver`: path del request → ruta en disco confinada a la raíz
//! - `listing`: hijos inmediatos de un directorio
//! - `search`: búsqueda recursiva por nombre con puntaje
//!
//! Las entradas se crean por request y se descartan al responder.

pub mod listing;
pub mod resolver;
pub mod search;

pub use listing::list_directory;
pub use resolver::{LibraryRoot, PathKind, ResolveError, ResolvedPath};
pub use search::{search, SearchResult};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::Path;

/// Caracteres que quedan sin escapar en un link (además de alfanuméricos)
const LINK_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Tipo de entrada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// Una entrada para mostrar: nombre, link relativo a la raíz y tipo
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    /// Percent-encoded, relativo a la raíz, sin `/` inicial
    pub link: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Link percent-encoded de `path` relativo a la raíz.
///
/// Retorna `None` si `path` no cuelga (por componentes) de la raíz.
pub(crate) fn relative_link(root: &LibraryRoot, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root.dir()).ok()?;
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Some(utf8_percent_encode(&joined, LINK_ENCODE_SET).to_string())
}
