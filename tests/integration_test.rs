//! Tests de integración para el servidor
//! tests/integration_test.rs
//!
//! Cada test levanta un `Server` real en 127.0.0.1:0 sobre una biblioteca
//! temporal y habla HTTP crudo por `TcpStream`.

use audiobook_server::config::Config;
use audiobook_server::server::Server;
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Biblioteca de prueba:
///
/// ```text
/// audiobooklib/
///   book1.mp3
///   Book2.mp3
///   notes.txt
///   El Señor de los Anillos/
///     01 La Comunidad.mp3
/// secret.txt            (fuera de la raíz)
/// ```
fn library() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let lib = tmp.path().join("audiobooklib");
    let saga = lib.join("El Señor de los Anillos");
    fs::create_dir_all(&saga).unwrap();

    fs::write(lib.join("book1.mp3"), b"ID3-book-one").unwrap();
    fs::write(lib.join("Book2.mp3"), b"ID3-book-two").unwrap();
    fs::write(lib.join("notes.txt"), b"some notes").unwrap();

    let audio: Vec<u8> = (0..5000u32).map(|i| (i % 256) as u8).collect();
    fs::write(saga.join("01 La Comunidad.mp3"), audio).unwrap();

    fs::write(tmp.path().join("secret.txt"), b"top secret").unwrap();
    tmp
}

/// Levanta el servidor en un puerto efímero y retorna su dirección
fn start_server(root: &Path) -> SocketAddr {
    let mut config = Config::default();
    config.port = 0;
    config.root_dir = root.to_path_buf();

    let server = Server::bind(&config).expect("bind");
    let addr = server.local_addr().unwrap();

    thread::spawn(move || {
        let _ = server.run();
    });

    addr
}

/// Envía un request crudo y retorna la respuesta completa (bytes)
fn send_raw(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.set_write_timeout(Some(Duration::from_secs(5))).unwrap();

    stream.write_all(raw).unwrap();
    stream.flush().unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    response
}

fn get(addr: SocketAddr, path: &str) -> Vec<u8> {
    send_raw(addr, format!("GET {} HTTP/1.1\r\nHost: test\r\n\r\n", path).as_bytes())
}

/// Separa headers y body
fn split_response(response: &[u8]) -> (String, &[u8]) {
    let pos = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response without header terminator");
    (
        String::from_utf8_lossy(&response[..pos + 4]).into_owned(),
        &response[pos + 4..],
    )
}

#[test]
fn test_root_listing() {
    let tmp = library();
    let addr = start_server(&tmp.path().join("audiobooklib"));

    let response = get(addr, "/");
    let (head, body) = split_response(&response);
    let body = String::from_utf8_lossy(body);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Type: text/html\r\n"));
    assert!(head.contains("Connection: close\r\n"));
    assert!(body.contains("href=\"/book1.mp3\""));
    assert!(body.contains("href=\"/El%20Se%C3%B1or%20de%20los%20Anillos/\""));
    assert!(body.contains("/listen/book1.mp3"));
    assert!(!body.contains("/listen/notes.txt"));
}

#[test]
fn test_search_case_insensitive() {
    let tmp = library();
    let addr = start_server(&tmp.path().join("audiobooklib"));

    let response = get(addr, "/?search=book");
    let (_, body) = split_response(&response);
    let body = String::from_utf8_lossy(body);

    assert!(body.contains("book1.mp3 (Score: 0.11)"));
    assert!(body.contains("Book2.mp3 (Score: 0.11)"));
    assert!(!body.contains("notes.txt"));
}

#[test]
fn test_search_percent_decoded_term() {
    let tmp = library();
    let addr = start_server(&tmp.path().join("audiobooklib"));

    let response = get(addr, "/?search=la%20comunidad");
    let (_, body) = split_response(&response);
    let body = String::from_utf8_lossy(body);

    assert!(body.contains("01 La Comunidad.mp3"));
    assert!(body.contains("value=\"la comunidad\""));
}

#[test]
fn test_search_plus_is_literal() {
    let tmp = library();
    let lib = tmp.path().join("audiobooklib");
    fs::write(lib.join("a+b.mp3"), b"x").unwrap();
    let addr = start_server(&lib);

    let response = get(addr, "/?search=a+b");
    let (_, body) = split_response(&response);
    let body = String::from_utf8_lossy(body);

    assert!(body.contains("a+b.mp3 (Score:"));
    assert!(body.contains("value=\"a+b\""));
}

#[test]
fn test_download_is_byte_identical() {
    let tmp = library();
    let lib = tmp.path().join("audiobooklib");
    let addr = start_server(&lib);

    let response = get(addr, "/download/El%20Se%C3%B1or%20de%20los%20Anillos/01%20La%20Comunidad.mp3");
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Type: audio/mpeg\r\n"));
    assert!(head.contains("Content-Disposition: attachment; filename=\"01 La Comunidad.mp3\"\r\n"));
    assert!(!head.contains("Content-Length"));

    let on_disk = fs::read(lib.join("El Señor de los Anillos").join("01 La Comunidad.mp3")).unwrap();
    assert_eq!(body, &on_disk[..]);
}

#[test]
fn test_direct_file_inline() {
    let tmp = library();
    let addr = start_server(&tmp.path().join("audiobooklib"));

    let response = get(addr, "/notes.txt");
    let (head, body) = split_response(&response);

    assert!(head.contains("Content-Type: text/plain\r\n"));
    assert!(!head.contains("Content-Disposition"));
    assert_eq!(body, b"some notes");
}

#[test]
fn test_listen_existing_and_missing() {
    let tmp = library();
    let addr = start_server(&tmp.path().join("audiobooklib"));

    let response = get(addr, "/listen/book1.mp3");
    let (head, body) = split_response(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(!head.contains("Content-Disposition"));
    assert_eq!(body, b"ID3-book-one");

    let response = get(addr, "/listen/missing.mp3");
    let (head, body) = split_response(&response);
    assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(String::from_utf8_lossy(body).contains("404"));
}

#[test]
fn test_traversal_rejected() {
    let tmp = library();
    let addr = start_server(&tmp.path().join("audiobooklib"));

    for path in [
        "/../secret.txt",
        "/../../etc/passwd",
        "/download/../secret.txt",
        "/listen/%2E%2E/secret.txt",
    ] {
        let response = get(addr, path);
        let (head, body) = split_response(&response);
        assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"), "{}", path);
        assert!(!String::from_utf8_lossy(body).contains("top secret"), "{}", path);
    }
}

#[test]
fn test_same_request_twice_is_identical() {
    let tmp = library();
    let addr = start_server(&tmp.path().join("audiobooklib"));

    assert_eq!(get(addr, "/"), get(addr, "/"));
    assert_eq!(get(addr, "/?search=mp3"), get(addr, "/?search=mp3"));
}

#[test]
fn test_listing_links_round_trip() {
    let tmp = library();
    let lib = tmp.path().join("audiobooklib");
    let addr = start_server(&lib);

    // Entrar a la carpeta usando el link del listado
    let response = get(addr, "/El%20Se%C3%B1or%20de%20los%20Anillos/");
    let (_, body) = split_response(&response);
    let body = String::from_utf8_lossy(body).into_owned();

    let marker = "href=\"/";
    let start = body.find(marker).expect("card link") + marker.len();
    let end = start + body[start..].find('"').unwrap();
    let link = &body[start..end];

    let response = get(addr, &format!("/{}", link));
    let (_, file_body) = split_response(&response);
    let on_disk = fs::read(lib.join("El Señor de los Anillos").join("01 La Comunidad.mp3")).unwrap();
    assert_eq!(file_body, &on_disk[..]);
}

#[test]
fn test_empty_request_gets_no_response() {
    let tmp = library();
    let addr = start_server(&tmp.path().join("audiobooklib"));

    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.shutdown(std::net::Shutdown::Write).unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).unwrap();
    assert!(buf.is_empty());
}

#[test]
fn test_concurrent_clients() {
    let tmp = library();
    let addr = start_server(&tmp.path().join("audiobooklib"));

    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(move || get(addr, "/download/book1.mp3")))
        .collect();

    for handle in handles {
        let response = handle.join().unwrap();
        let (_, body) = split_response(&response);
        assert_eq!(body, b"ID3-book-one");
    }
}
