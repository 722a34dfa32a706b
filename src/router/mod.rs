//! # Enrutamiento
//! src/router/mod.rs
//!
//! Decide qué hacer con cada request. Los casos son excluyentes y se
//! evalúan en este orden sobre el path ya decodificado:
//!
//! ```text
//! 1. Directorio existente   → listado (o búsqueda si hay ?search=) en HTML
//! 2. Archivo existente      → archivo inline, sin Content-Disposition
//! 3. /download/<path>       → archivo como adjunto, o 404
//! 4. /listen/<path>         → archivo inline (pensado para audio), o 404
//! 5. Cualquier otra cosa    → 404
//! ```
//!
//! Un path fuera de la raíz no es un error distinto: simplemente no
//! resuelve y cae al 404.

use crate::error::Result;
use crate::http::mime::content_type_for;
use crate::http::request::decode_path;
use crate::http::{Request, Response, StatusCode};
use crate::library::{self, search, LibraryRoot, ResolvedPath};
use crate::render;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

const DOWNLOAD_PREFIX: &str = "/download/";
const LISTEN_PREFIX: &str = "/listen/";

/// Router sin estado mutable; se comparte entre threads con `Arc`
pub struct Router {
    root: Arc<LibraryRoot>,
    rank_results: bool,
}

impl Router {
    /// Crea un router sobre la raíz dada
    pub fn new(root: Arc<LibraryRoot>) -> Self {
        Self {
            root,
            rank_results: false,
        }
    }

    /// Ordenar resultados de búsqueda por puntaje en vez de por recorrido
    pub fn with_ranking(mut self, rank_results: bool) -> Self {
        self.rank_results = rank_results;
        self
    }

    pub fn root(&self) -> &LibraryRoot {
        &self.root
    }

    /// Encuentra la respuesta para un request
    ///
    /// Los errores de I/O (listar, abrir) se propagan; quien llama los
    /// registra y cierra la conexión.
    ///
    /// # Ejemplo
    /// ```
    /// use audiobook_server::http::{Request, StatusCode};
    /// use audiobook_server::library::LibraryRoot;
    /// use audiobook_server::router::Router;
    /// use std::sync::Arc;
    ///
    /// let dir = std::env::temp_dir();
    /// let router = Router::new(Arc::new(LibraryRoot::new(&dir, false).unwrap()));
    ///
    /// let request = Request::parse(b"GET /../../etc/passwd HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request).unwrap().status(), StatusCode::NotFound);
    /// ```
    pub fn route(&self, request: &Request) -> Result<Response> {
        let path = decode_path(request.path());

        if let Ok(resolved) = self.root.resolve(&path) {
            if resolved.is_dir() {
                let current = request.path().trim_start_matches('/');
                return self.directory(&resolved, request.search_term(), current);
            }
            if resolved.is_file() {
                return self.file(resolved.path(), false);
            }
        }

        if let Some(rest) = path.strip_prefix(DOWNLOAD_PREFIX) {
            self.prefixed(rest, true)
        } else if let Some(rest) = path.strip_prefix(LISTEN_PREFIX) {
            self.prefixed(rest, false)
        } else {
            log::debug!("🚫 Sin coincidencia para {}", path);
            Ok(Response::not_found())
        }
    }

    /// Listado del directorio, o búsqueda en toda la raíz si hay término
    fn directory(
        &self,
        dir: &ResolvedPath,
        search_term: Option<&str>,
        current: &str,
    ) -> Result<Response> {
        let body = match search_term {
            Some(term) => {
                let mut results = library::search(&self.root, term);
                if self.rank_results {
                    search::rank(&mut results);
                }
                render::render_page(&results, Some(term), current)
            }
            None => {
                let entries = library::list_directory(&self.root, dir.path())?;
                render::render_page(&entries, None, current)
            }
        };

        Ok(Response::html(StatusCode::Ok, body))
    }

    /// `/download/...` y `/listen/...`: el resto se resuelve de nuevo
    fn prefixed(&self, rest: &str, attachment: bool) -> Result<Response> {
        match self.root.resolve(rest) {
            Ok(resolved) if resolved.is_file() => self.file(resolved.path(), attachment),
            _ => Ok(Response::not_found()),
        }
    }

    /// Abre el archivo; el body se manda luego en streaming
    fn file(&self, path: &Path, attachment: bool) -> Result<Response> {
        let file = File::open(path)?;
        let response = Response::file(file, content_type_for(path));

        if !attachment {
            return Ok(response);
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(response.with_attachment(&filename))
    }
}
