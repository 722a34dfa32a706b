//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y variables
//! de entorno. Se construye una sola vez en `main` y se inyecta en el resto
//! de componentes; no hay estado global.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./audiobook-server --port 8080 --root ./audiobooklib --lan
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=9000 LIBRARY_DIR=/srv/books ./audiobook-server
//! ```

use crate::error::ServeError;
use clap::Parser;
use std::net::{IpAddr, UdpSocket};
use std::path::PathBuf;

/// Dirección pública usada solo para descubrir la interfaz de salida.
/// No se envía ningún paquete: `connect` en UDP solo fija la ruta.
const LAN_ROUTE_ADDR: &str = "8.8.8.8:80";

/// Configuración del servidor de audiolibros
#[derive(Debug, Clone, Parser)]
#[command(name = "audiobook-server")]
#[command(about = "Servidor HTTP para explorar, buscar, escuchar y descargar audiolibros")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Escuchar en la IP de la red local detectada en vez de `--host`
    #[arg(long, env = "HTTP_LAN")]
    pub lan: bool,

    /// Directorio raíz de la biblioteca que se expone
    #[arg(short, long = "root", default_value = "audiobooklib", env = "LIBRARY_DIR")]
    pub root_dir: PathBuf,

    /// Resolver symlinks antes de validar que una ruta queda dentro de la raíz
    #[arg(long = "strict-paths", env = "STRICT_PATHS")]
    pub strict_paths: bool,

    /// Ordenar los resultados de búsqueda por puntaje (descendente)
    #[arg(long = "rank-results", env = "RANK_RESULTS")]
    pub rank_results: bool,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Fija el host de bind una sola vez.
    ///
    /// Con `--lan` intenta detectar la IP local y la deja en `host`; si
    /// falla, se queda el `host` configurado. Después `lan` queda apagado,
    /// así que `address()` no vuelve a tocar la red.
    pub fn resolve_lan(&mut self) {
        if !self.lan {
            return;
        }

        match detect_local_ip() {
            Ok(ip) => self.host = ip.to_string(),
            Err(e) => {
                log::warn!("⚠️  No se pudo detectar la IP local ({}), usando {}", e, self.host);
            }
        }
        self.lan = false;
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use audiobook_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// La raíz debe existir y ser un directorio.
    pub fn validate(&self) -> Result<(), ServeError> {
        if self.host.trim().is_empty() {
            return Err(ServeError::Config("Host must not be empty".to_string()));
        }

        if !self.root_dir.is_dir() {
            return Err(ServeError::InvalidRoot(self.root_dir.clone()));
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════╗");
        println!("║          AudioBookService Configuration      ║");
        println!("╚══════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:      {}", self.address());
        println!();
        println!("📚 Library:");
        println!("   Root:         {}", self.root_dir.display());
        println!("   Strict paths: {}", if self.strict_paths { "enabled" } else { "disabled" });
        println!("   Ranking:      {}", if self.rank_results { "by score" } else { "traversal order" });
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            lan: false,
            root_dir: PathBuf::from("audiobooklib"),
            strict_paths: false,
            rank_results: false,
        }
    }
}

/// Detecta la IP de la interfaz de red local usada para salir a Internet
pub fn detect_local_ip() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(LAN_ROUTE_ADDR)?;
    Ok(socket.local_addr()?.ip())
}
