//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Un thread por conexión, sin pool ni límite: cada thread lee un request,
//! responde y cierra. No hay timeouts; un cliente lento ocupa su thread
//! indefinidamente.

use crate::config::Config;
use crate::error::Result;
use crate::http::request::REQUEST_BUFFER_SIZE;
use crate::http::Request;
use crate::library::LibraryRoot;
use crate::router::Router;
use std::io::Read;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Servidor HTTP de la biblioteca
pub struct Server {
    router: Arc<Router>,
    listener: TcpListener,
}

impl Server {
    /// Fija la raíz y hace bind en la dirección configurada
    ///
    /// Con `--lan`, `Config::resolve_lan` ya debe haber fijado el host.
    pub fn bind(config: &Config) -> Result<Self> {
        let root = LibraryRoot::new(&config.root_dir, config.strict_paths)?;
        let router = Router::new(Arc::new(root)).with_ranking(config.rank_results);

        let address = config.address();
        log::info!("[*] Iniciando servidor en {}", address);
        let listener = TcpListener::bind(&address)?;

        Ok(Self {
            router: Arc::new(router),
            listener,
        })
    }

    /// Dirección real del socket (útil con puerto 0)
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de accept. Solo termina si muere el proceso.
    pub fn run(&self) -> Result<()> {
        log::info!("[+] Servidor escuchando en http://{}", self.local_addr()?);
        let root = self.router.root();
        log::info!(
            "[*] Sirviendo {} (contención {})",
            root.dir().display(),
            if root.is_strict() { "estricta" } else { "por prefijo" }
        );
        log::info!("[*] Modo concurrente: un thread por conexion");

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);

                    let peer_addr = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());
                    log::info!("✅ Nueva conexión desde: {}", peer_addr);

                    thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, &router) {
                            log::error!("❌ Error atendiendo a {}: {}", peer_addr, e);
                        }
                    });
                }
                Err(e) => {
                    log::error!("❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }
}

/// Atiende una conexión completa: un read, ruteo, escritura y cierre.
///
/// Un request vacío cierra sin responder. El socket se cierra al salir
/// (drop) haya o no error.
fn handle_connection(mut stream: TcpStream, router: &Router) -> Result<()> {
    let start = Instant::now();

    let mut buffer = [0u8; REQUEST_BUFFER_SIZE];
    let bytes_read = stream.read(&mut buffer)?;

    let request = match Request::parse(&buffer[..bytes_read]) {
        Ok(request) => request,
        Err(e) => {
            log::debug!("   Conexión cerrada sin respuesta: {}", e);
            return Ok(());
        }
    };

    log::info!("   {} {}", request.method(), request.path());

    let response = router.route(&request)?;
    let status = response.status();
    let sent = response.write_to(&mut stream)?;

    log::info!(
        "   {} ({} bytes, {:.2}ms)",
        status,
        sent,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::net::Shutdown;

    fn ephemeral_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("bind")
    }

    fn router_for(dir: &std::path::Path) -> Router {
        Router::new(Arc::new(LibraryRoot::new(dir, false).unwrap()))
    }

    /// Acepta una conexión, la atiende y retorna lo que recibió el cliente
    fn exchange(router: Router, raw: &[u8]) -> Vec<u8> {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let t = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_connection(stream, &router).unwrap();
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(raw).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        t.join().unwrap();
        buf
    }

    #[test]
    fn test_handle_connection_listing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cap1.mp3"), b"x").unwrap();

        let buf = exchange(router_for(dir.path()), b"GET / HTTP/1.1\r\nHost: x\r\n\r\n");
        let text = String::from_utf8_lossy(&buf);

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.contains("cap1.mp3"));
    }

    #[test]
    fn test_handle_connection_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let buf = exchange(router_for(dir.path()), b"GET /nope HTTP/1.1\r\n\r\n");
        let text = String::from_utf8_lossy(&buf);

        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("404"));
    }

    #[test]
    fn test_handle_connection_peer_closed_immediately() {
        // Cubre la rama de request vacío: no se escribe nada
        let dir = tempfile::tempdir().unwrap();
        let buf = exchange(router_for(dir.path()), b"");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_server_bind_ephemeral() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.port = 0;
        config.root_dir = dir.path().to_path_buf();

        let server = Server::bind(&config).unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
    }

    #[test]
    fn test_server_bind_strict_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.port = 0;
        config.root_dir = dir.path().join("missing");
        config.strict_paths = true;

        assert!(Server::bind(&config).is_err());
    }
}
