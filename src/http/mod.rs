//! # Módulo HTTP
//!
//! Implementación mínima del protocolo, sin librerías de alto nivel:
//!
//! - Parsing de la request line (método, path y `?search=`)
//! - Escritura de responses con body de texto o archivo en streaming
//! - Códigos de estado
//! - Inferencia de Content-Type
//!
//! No hay keep-alive ni chunked encoding: cada response termina cerrando
//! la conexión.
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: audio/mpeg\r\n
//! Content-Disposition: attachment; filename="book.mp3"\r\n
//! Connection: close\r\n
//! \r\n
//! <bytes del archivo hasta cerrar la conexión>
//! ```

pub mod mime;      // Content-Type a partir del nombre de archivo
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción y escritura de HTTP responses
pub mod status;    // Códigos de estado HTTP

pub use request::Request;
pub use response::{Body, Response};
pub use status::StatusCode;
