//! # Búsqueda por Nombre
//! src/library/search.rs
//!
//! Recorre todo el árbol bajo la raíz y devuelve cada archivo o directorio
//! cuyo nombre contenga el término (sin distinguir mayúsculas).
//!
//! ## Puntaje
//!
//! ```text
//! score = ocurrencias(término, nombre) / max(len(nombre), len(término))
//! ```
//!
//! Es solo informativo: el orden es el del recorrido, salvo que se pida
//! ranking explícito. El recorrido va directorio por directorio: primero
//! los subdirectorios y luego los archivos de ese nivel (cada grupo por
//! nombre), y después se desciende a cada subdirectorio en ese orden. Los
//! symlinks a directorios se listan pero no se recorren.

use super::{relative_link, Entry, EntryKind, LibraryRoot};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Una coincidencia de búsqueda
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub entry: Entry,
    /// En [0, 1]
    pub match_score: f64,
}

/// Busca `term` en los nombres de todo el árbol de la raíz
///
/// Sin límite de resultados. Un término vacío no devuelve nada.
pub fn search(root: &LibraryRoot, term: &str) -> Vec<SearchResult> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    let mut pending = vec![root.dir().to_path_buf()];

    // Arriba hacia abajo: en cada directorio primero sus subdirectorios,
    // luego sus archivos, y recién después se baja a cada subdirectorio
    while let Some(dir) = pending.pop() {
        let (dirs, files) = read_level(&dir);

        for (path, name) in dirs.iter().chain(files.iter()) {
            if !name.to_lowercase().contains(&needle) {
                continue;
            }

            let Some(link) = relative_link(root, path) else {
                continue;
            };

            let kind = if path.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            results.push(SearchResult {
                match_score: match_score(name, term),
                entry: Entry {
                    name: name.clone(),
                    link,
                    kind,
                },
            });
        }

        // Al revés para que el primero por nombre salga primero de la pila
        pending.extend(
            dirs.into_iter()
                .filter(|(path, _)| !path.is_symlink())
                .map(|(path, _)| path)
                .rev(),
        );
    }

    log::debug!("🔎 '{}': {} resultados", term, results.len());
    results
}

/// Ordena por puntaje descendente; los empates conservan el orden del recorrido
pub fn rank(results: &mut [SearchResult]) {
    results.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
}

/// Hijos inmediatos de `dir`, separados en (directorios, archivos) y
/// ordenados por nombre. Un symlink a directorio cuenta como directorio.
fn read_level(dir: &Path) -> (Vec<(PathBuf, String)>, Vec<(PathBuf, String)>) {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for item in walker {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                log::warn!("⚠️  Entrada ilegible durante la búsqueda: {}", e);
                continue;
            }
        };

        let name = item.file_name().to_string_lossy().into_owned();
        let path = item.into_path();
        if path.is_dir() {
            dirs.push((path, name));
        } else {
            files.push((path, name));
        }
    }

    (dirs, files)
}

/// Ocurrencias (sin solapamiento) del término en el nombre, sobre la
/// longitud mayor de los dos
pub fn match_score(name: &str, term: &str) -> f64 {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return 0.0;
    }

    let occurrences = name.to_lowercase().matches(needle.as_str()).count();
    let longest = name.chars().count().max(term.chars().count());

    occurrences as f64 / longest as f64
}
