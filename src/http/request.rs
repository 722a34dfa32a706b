//! # Parsing de Requests
//! src/http/request.rs
//!
//! Parser deliberadamente estrecho: solo se mira la request line del primer
//! bloque leído del socket. Los headers se ignoran.
//!
//! ## Formato esperado
//!
//! ```text
//! GET /carpeta/?search=hobbit HTTP/1.1\r\n
//! Host: 192.168.1.10:8080\r\n
//! \r\n
//! ```
//!
//! Si la request line no entra en el primer read (ver
//! [`REQUEST_BUFFER_SIZE`]) el path queda truncado. Es una limitación
//! aceptada, no un bug.

use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Tamaño máximo del primer read de una conexión
pub const REQUEST_BUFFER_SIZE: usize = 1024;

/// Marcador del único query parameter soportado
const SEARCH_MARKER: &str = "?search=";

/// Representa un request parseado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Método tal cual llegó (no se hace branching por método)
    method: String,

    /// Path sin el `?search=...` y todavía percent-encoded
    path: String,

    /// Término de búsqueda ya decodificado; `None` si no hay o está vacío
    search_term: Option<String>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No llegó nada (o solo espacios): la conexión se cierra sin respuesta
    #[error("Empty request")]
    EmptyRequest,
}

impl Request {
    /// Parsea un request desde los bytes del primer read
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use audiobook_server::http::Request;
    ///
    /// let raw = b"GET /sagas/?search=el%20hobbit HTTP/1.1\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.path(), "/sagas/");
    /// assert_eq!(request.search_term(), Some("el hobbit"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let text = String::from_utf8_lossy(buffer);

        if text.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        // Solo la request line; el resto del buffer se descarta
        let request_line = text.lines().next().unwrap_or_default();

        let mut parts = request_line.split(' ');
        let method = parts.next().unwrap_or_default().to_string();
        let raw_path = match parts.next() {
            Some(p) if !p.is_empty() => p,
            _ => "/",
        };

        let (path, search_term) = Self::split_search(raw_path);

        Ok(Request {
            method,
            path,
            search_term,
        })
    }

    /// Separa `?search=` del path
    ///
    /// Ejemplo: "/libros/?search=tolkien%20anillos"
    /// Retorna: ("/libros/", Some("tolkien anillos"))
    ///
    /// Solo se decodifica `%XX`: un `+` queda como `+`.
    fn split_search(raw_path: &str) -> (String, Option<String>) {
        match raw_path.find(SEARCH_MARKER) {
            Some(idx) => {
                let term = decode_path(&raw_path[idx + SEARCH_MARKER.len()..]);
                let term = if term.is_empty() { None } else { Some(term) };
                (raw_path[..idx].to_string(), term)
            }
            None => (raw_path.to_string(), None),
        }
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene el path del request (sin decodificar)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene el término de búsqueda, si lo hay
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }
}

/// Decodifica un segmento de path (`%20` → espacio). El `+` se mantiene.
pub fn decode_path(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}
