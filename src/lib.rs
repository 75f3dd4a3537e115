//! # Hotel Paraíso
//!
//! API REST para gestionar las reservas de habitaciones del Hotel Paraíso,
//! construida con Rust y Actix Web.
//!
//! ## Arquitectura
//!
//! ```text
//! Cliente HTTP
//!     ↓ JSON
//! api      (Actix Web: rutas, errores, forma de las respuestas)
//!     ↓
//! domain   (validación y filtrado, sin E/S)
//!     ↓
//! db       (ReservaStore: archivo JSON, MongoDB o memoria)
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
