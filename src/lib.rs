//! # AudioBook Server
//! src/lib.rs
//!
//! Servidor HTTP mínimo que expone un directorio en disco para navegarlo,
//! buscar por nombre, escuchar y descargar archivos. El HTTP se parsea a
//! mano sobre sockets TCP.
//!
//! ## Arquitectura
//!
//! - `http`: parsing de la request line, escritura de responses, MIME
//! - `library`: resolución segura de paths, listado y búsqueda
//! - `render`: páginas HTML
//! - `router`: decide directorio / archivo / descarga / escucha / 404
//! - `server`: loop de accept, un thread por conexión
//! - `config`: CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use audiobook_server::config::Config;
//! use audiobook_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("Error al iniciar servidor");
//! server.run().expect("Error en el loop de accept");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod library;
pub mod render;
pub mod router;
pub mod server;

pub use error::{Result, ServeError};
