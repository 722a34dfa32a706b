//! # Construcción y Escritura de Respuestas
//!
//! Una respuesta tiene siempre el mismo esqueleto:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! [Content-Disposition: attachment; filename="x.mp3"\r\n]
//! Connection: close\r\n
//! \r\n
//! body
//! ```
//!
//! El body de texto se escribe en un solo buffer. El de archivo se manda en
//! bloques de [`CHUNK_SIZE`] bytes sin cargarlo entero en memoria; no se
//! envía `Content-Length`, el fin del body es el cierre de la conexión.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use audiobook_server::http::{Response, StatusCode};
//!
//! let response = Response::html(StatusCode::Ok, "<h1>Hola</h1>".to_string());
//!
//! let mut out = Vec::new();
//! response.write_to(&mut out).unwrap();
//! assert!(out.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

use super::StatusCode;
use crate::render::html;
use std::fs::File;
use std::io::{self, Read, Write};

/// Tamaño de cada bloque al hacer streaming de un archivo
pub const CHUNK_SIZE: usize = 1024;

/// Cuerpo de la respuesta
#[derive(Debug)]
pub enum Body {
    /// Texto completo (HTML)
    Text(String),

    /// Archivo abierto que se manda por bloques desde el inicio
    File(File),
}

/// Representa una respuesta HTTP lista para escribir en el socket
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    content_type: String,
    disposition: Option<String>,
    body: Body,
}

impl Response {
    /// Respuesta HTML con el body completo
    pub fn html(status: StatusCode, body: String) -> Self {
        Self {
            status,
            content_type: "text/html".to_string(),
            disposition: None,
            body: Body::Text(body),
        }
    }

    /// 404 con el body HTML mínimo
    pub fn not_found() -> Self {
        Self::html(StatusCode::NotFound, html::render_not_found().to_string())
    }

    /// 200 con un archivo en streaming
    pub fn file(file: File, content_type: impl Into<String>) -> Self {
        Self {
            status: StatusCode::Ok,
            content_type: content_type.into(),
            disposition: None,
            body: Body::File(file),
        }
    }

    /// Marca la respuesta como descarga (`Content-Disposition: attachment`)
    ///
    /// El nombre va entre comillas: se escapan `"` y `\\`, y se descartan los
    /// caracteres de control para que no pueda cortar el header.
    pub fn with_attachment(mut self, filename: &str) -> Self {
        self.disposition = Some(format!(
            "attachment; filename=\"{}\"",
            quote_filename(filename)
        ));
        self
    }

    /// Status line y headers, terminados por la línea vacía
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {}\r\n", self.status);
        head.push_str(&format!("Content-Type: {}\r\n", self.content_type));
        if let Some(disposition) = &self.disposition {
            head.push_str(&format!("Content-Disposition: {}\r\n", disposition));
        }
        head.push_str("Connection: close\r\n\r\n");
        head.into_bytes()
    }

    /// Escribe la respuesta completa y retorna los bytes de body enviados
    ///
    /// Cualquier error de lectura/escritura a mitad del streaming se propaga;
    /// el cliente puede quedarse con una respuesta parcial.
    pub fn write_to<W: Write>(self, out: &mut W) -> io::Result<u64> {
        out.write_all(&self.head_bytes())?;

        let sent = match self.body {
            Body::Text(text) => {
                out.write_all(text.as_bytes())?;
                text.len() as u64
            }
            Body::File(mut file) => stream_file(&mut file, out)?,
        };

        out.flush()?;
        Ok(sent)
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene el Content-Type
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Obtiene el Content-Disposition, si hay
    pub fn disposition(&self) -> Option<&str> {
        self.disposition.as_deref()
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// Copia el archivo al writer en bloques de `CHUNK_SIZE` hasta EOF
fn stream_file<R: Read, W: Write>(file: &mut R, out: &mut W) -> io::Result<u64> {
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        out.write_all(&chunk[..n])?;
        total += n as u64;
    }

    Ok(total)
}

/// Contenido de un quoted-string para el nombre de archivo
fn quote_filename(filename: &str) -> String {
    let mut quoted = String::with_capacity(filename.len());
    for c in filename.chars().filter(|c| !c.is_control()) {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted
}
