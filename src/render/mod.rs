//! # Renderizado
//!
//! Convierte listados y resultados de búsqueda en páginas HTML. El router
//! no sabe nada de HTML: solo le pasa entradas, término y path actual.

pub mod html;

pub use html::{render_not_found, render_page, Card};
