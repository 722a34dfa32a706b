//! # Inferencia de Content-Type
//!
//! Mapea el nombre/extensión de un archivo a su tipo MIME. Lo desconocido
//! se sirve como `application/octet-stream`.

use std::path::Path;

/// Content-Type para un archivo según su extensión
///
/// # Ejemplo
/// ```
/// use audiobook_server::http::mime::content_type_for;
///
/// assert_eq!(content_type_for("cap1.mp3"), "audio/mpeg");
/// assert_eq!(content_type_for("sin_extension"), "application/octet-stream");
/// ```
pub fn content_type_for(path: impl AsRef<Path>) -> String {
    mime_guess::from_path(path.as_ref())
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
