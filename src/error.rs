//! # Errores del Servidor
//! src/error.rs
//!
//! Tipo de error común para todo lo que puede fallar mientras se atiende
//! una conexión o se arranca el servidor.

use std::path::PathBuf;
use thiserror::Error;

/// Resultado con el error del servidor
pub type Result<T> = std::result::Result<T, ServeError>;

/// Errores que pueden ocurrir en el servidor
#[derive(Debug, Error)]
pub enum ServeError {
    /// Fallo de I/O (socket, lectura de archivos, listado de directorios)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// El directorio raíz no existe o no es un directorio
    #[error("Invalid library root: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// Configuración inválida
    #[error("Invalid configuration: {0}")]
    Config(String),
}
