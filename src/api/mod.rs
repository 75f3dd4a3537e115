//! # Módulo API
//!
//! Este módulo contiene todas las rutas y controladores de la API REST.
//!
//! ## Módulos principales
//!
//! - [`reservation`] - Gestión de reservas (crear, listar, consultar, actualizar, eliminar)
//! - [`docs`] - Documento OpenAPI de la API
//! - [`errors`] - Manejo de errores de la aplicación

pub mod docs;
pub mod errors;
pub mod middleware;
pub mod reservation;

// Re-exportar tipos comunes para facilitar su uso
pub use errors::{AppError, AppResult, ErrorResponse, ResultExt};

use actix_web::web;

/// Cuerpos JSON malformados o con tipos incorrectos responden `400 { "error": ... }`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Configura todas las rutas de la API
///
/// ## Rutas configuradas
///
/// - `/api/reservas/*` - Ver [`reservation::routes`]
/// - `/api-docs` - Ver [`docs::routes`]
///
/// El almacén se registra aparte, como `web::Data<dyn ReservaStore>`.
///
/// # Ejemplo
///
/// ```no_run
/// use std::sync::Arc;
/// use actix_web::{web, App};
/// use hotel_paraiso::api;
/// use hotel_paraiso::db::{MemoryStore, ReservaStore};
///
/// let store: Arc<dyn ReservaStore> = Arc::new(MemoryStore::default());
/// let app = App::new()
///     .app_data(web::Data::from(store))
///     .configure(api::init_routes);
/// ```
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.app_data(query_config());
    reservation::routes(cfg);
    docs::routes(cfg);
}
