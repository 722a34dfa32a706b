//! # Resolución de Paths
//! src/library/resolver.rs
//!
//! Convierte el path de un request en una ruta de disco dentro de la raíz.
//! Es la única barrera contra `../../etc/passwd`.
//!
//! ## Modos de contención
//!
//! - **Literal** (por defecto): se normaliza léxicamente (`.`, `..`,
//!   separadores repetidos) y se exige que el resultado empiece, como
//!   texto, con la ruta de la raíz. No resuelve symlinks: un symlink dentro
//!   de la raíz que apunte afuera se sirve igual. Al ser un prefijo de texto,
//!   un hermano como `<raíz>2/` también pasa.
//! - **Estricto** (`--strict-paths`): raíz y candidato se canonicalizan
//!   (symlinks resueltos) y la comparación es por componentes.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errores de resolución
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// El path normalizado queda fuera de la raíz
    #[error("Path outside library root: {}", .0.display())]
    OutsideRoot(PathBuf),
}

/// Qué hay en disco en la ruta resuelta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Directory,
    File,
    /// No existe, o no es ni archivo ni directorio
    Missing,
}

/// Ruta garantizada dentro de la raíz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
    kind: PathKind,
}

impl ResolvedPath {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind == PathKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == PathKind::File
    }
}

/// Directorio raíz de la biblioteca, fijado al arrancar
#[derive(Debug, Clone)]
pub struct LibraryRoot {
    dir: PathBuf,
    strict: bool,
}

impl LibraryRoot {
    /// Fija la raíz.
    ///
    /// En modo literal la ruta se vuelve absoluta y se normaliza, sin tocar
    /// el disco. En modo estricto se canonicaliza y por lo tanto debe existir.
    pub fn new(dir: impl AsRef<Path>, strict: bool) -> io::Result<Self> {
        let dir = if strict {
            fs::canonicalize(dir.as_ref())?
        } else {
            normalize(&std::path::absolute(dir.as_ref())?)
        };

        Ok(Self { dir, strict })
    }

    /// Ruta absoluta de la raíz
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Resuelve un path de request (ya decodificado) contra la raíz
    ///
    /// # Ejemplo
    /// ```
    /// use audiobook_server::library::LibraryRoot;
    ///
    /// let root = LibraryRoot::new("/srv/books", false).unwrap();
    /// assert!(root.resolve("/../../etc/passwd").is_err());
    /// assert!(root.resolve("/sagas/../tolkien/").is_ok());
    /// ```
    pub fn resolve(&self, request_path: &str) -> Result<ResolvedPath, ResolveError> {
        let joined = self.dir.join(request_path.trim_matches('/'));
        let normalized = normalize(&joined);

        let path = if self.strict {
            self.contain_strict(normalized)?
        } else {
            self.contain_literal(normalized)?
        };

        let kind = match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => PathKind::Directory,
            Ok(meta) if meta.is_file() => PathKind::File,
            _ => PathKind::Missing,
        };

        Ok(ResolvedPath { path, kind })
    }

    /// Prefijo de texto sobre la ruta normalizada
    fn contain_literal(&self, normalized: PathBuf) -> Result<PathBuf, ResolveError> {
        let root = self.dir.as_os_str().as_encoded_bytes();
        if normalized.as_os_str().as_encoded_bytes().starts_with(root) {
            Ok(normalized)
        } else {
            Err(ResolveError::OutsideRoot(normalized))
        }
    }

    /// Contención por componentes sobre la ruta real
    fn contain_strict(&self, normalized: PathBuf) -> Result<PathBuf, ResolveError> {
        // Si no existe no hay symlink que seguir; basta la ruta léxica
        let candidate = fs::canonicalize(&normalized).unwrap_or(normalized);
        if candidate.starts_with(&self.dir) {
            Ok(candidate)
        } else {
            Err(ResolveError::OutsideRoot(candidate))
        }
    }
}

/// Normalización léxica: colapsa `.`, `..` y separadores repetidos.
///
/// `..` por encima de `/` se queda en `/`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(name) => out.push(name),
        }
    }

    out
}
