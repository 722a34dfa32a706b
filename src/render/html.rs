//! # Páginas HTML
//! src/render/html.rs
//!
//! Una sola plantilla: formulario de búsqueda arriba y una tarjeta por
//! entrada. Las tarjetas de archivo llevan botón de descarga y, si el
//! archivo es audio, botón para escuchar.

use crate::library::{Entry, SearchResult};

/// Extensiones que reciben el botón "Listen"
const AUDIO_EXTENSIONS: &[&str] = &[
    ".mp3", ".m4a", ".m4b", ".aac", ".ogg", ".opus", ".flac", ".wav",
];

const NOT_FOUND_BODY: &str = "<h1>404 Not Found</h1>";

const STYLE: &str = "\
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: Arial, sans-serif; color: #333; background: #e9ecef; min-height: 100vh; display: flex; flex-direction: column; }
header { background: #343a40; color: #fff; padding: 1em; text-align: center; }
main { flex: 1; padding: 2em; display: flex; justify-content: center; }
.container { width: 90%; max-width: 1200px; }
.search-form { display: flex; justify-content: center; margin: 1em 0; }
.search-form input[type=text] { padding: .5em; width: 300px; max-width: 100%; border: 1px solid #ced4da; border-radius: 4px 0 0 4px; }
.search-form button { padding: .5em 1em; border: 1px solid #ced4da; border-radius: 0 4px 4px 0; background: #007bff; color: #fff; cursor: pointer; }
.current { margin-bottom: 1em; color: #555; }
.cards { display: flex; flex-direction: column; gap: 1em; }
.card { background: #fff; border-radius: 6px; padding: 1em; display: flex; align-items: center; justify-content: space-between; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.card-link { color: #007bff; text-decoration: none; font-weight: bold; }
.button { margin-left: .5em; padding: .4em .8em; border: none; border-radius: 4px; color: #fff; cursor: pointer; }
.download-button { background: #28a745; }
.listen-button { background: #17a2b8; }
.empty { text-align: center; color: #777; }
footer { background: #343a40; color: #fff; text-align: center; padding: .5em; }
";

/// Lo que necesita una tarjeta: la entrada y, si viene de una búsqueda,
/// su puntaje
pub trait Card {
    fn entry(&self) -> &Entry;

    fn score(&self) -> Option<f64> {
        None
    }
}

impl Card for Entry {
    fn entry(&self) -> &Entry {
        self
    }
}

impl Card for SearchResult {
    fn entry(&self) -> &Entry {
        &self.entry
    }

    fn score(&self) -> Option<f64> {
        Some(self.match_score)
    }
}

/// Página completa para un listado o un resultado de búsqueda
///
/// `current_path` es el path del request sin la `/` inicial; vacío en la raíz.
///
/// # Ejemplo
/// ```
/// use audiobook_server::library::{Entry, EntryKind};
/// use audiobook_server::render::render_page;
///
/// let entries = vec![Entry {
///     name: "cap1.mp3".to_string(),
///     link: "cap1.mp3".to_string(),
///     kind: EntryKind::File,
/// }];
/// let page = render_page(&entries, None, "");
/// assert!(page.contains("/listen/cap1.mp3"));
/// ```
pub fn render_page<C: Card>(items: &[C], search_term: Option<&str>, current_path: &str) -> String {
    let cards = if items.is_empty() {
        "<p class='empty'>Empty folder</p>".to_string()
    } else {
        items
            .iter()
            .map(|item| render_card(item, search_term.is_some()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let current = if current_path.is_empty() {
        String::new()
    } else {
        format!("<h2 class=\"current\">/{}</h2>", escape(&decode_for_display(current_path)))
    };

    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"UTF-8\">
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
<title>AudioBookService</title>
<style>
{style}</style>
</head>
<body>
<header><h1>AudioBookService</h1></header>
<main>
<div class=\"container\">
<div class=\"search-form\">
<form method=\"get\" action=\"/\">
<input type=\"text\" name=\"search\" placeholder=\"Search...\" value=\"{term}\">
<button type=\"submit\">Search</button>
</form>
</div>
{current}
<div class=\"cards\">
{cards}
</div>
</div>
</main>
<footer><p>&copy; AudioBookService</p></footer>
</body>
</html>
",
        style = STYLE,
        term = escape(search_term.unwrap_or_default()),
        current = current,
        cards = cards,
    )
}

/// Body del 404
pub fn render_not_found() -> &'static str {
    NOT_FOUND_BODY
}

fn render_card<C: Card>(item: &C, show_score: bool) -> String {
    let entry = item.entry();

    let score = match item.score() {
        Some(score) if show_score => format!(" (Score: {:.2})", score),
        _ => String::new(),
    };

    let mut buttons = String::new();
    if !entry.is_dir() {
        buttons.push_str(&format!(
            "<button class='button download-button' onclick=\"window.location.href='/download/{}';\">Download</button>",
            entry.link
        ));
        if is_audio(&entry.link) {
            buttons.push_str(&format!(
                "<button class='button listen-button' onclick=\"window.location.href='/listen/{}';\">Listen</button>",
                entry.link
            ));
        }
    }

    let icon = if entry.is_dir() { "📁" } else { "" };

    format!(
        "<div class=\"card\">
<div class=\"card-header\"><span class='folder-emoji'>{icon}</span> <a href=\"/{link}\" class=\"card-link\">{name}{score}</a></div>
<div class=\"card-buttons\">{buttons}</div>
</div>",
        icon = icon,
        link = entry.link,
        name = escape(&entry.name),
        score = score,
        buttons = buttons,
    )
}

/// El link termina en una extensión de audio (sin distinguir mayúsculas)
pub fn is_audio(link: &str) -> bool {
    let lower = link.to_lowercase();
    AUDIO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn decode_for_display(path: &str) -> String {
    crate::http::request::decode_path(path)
}

/// Escape mínimo para texto y atributos
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
