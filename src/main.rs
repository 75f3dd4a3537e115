//! # Hotel Paraíso Server
//!
//! Servidor web para las reservas del Hotel Paraíso.
//!
//! ## Configuración
//!
//! El servidor se configura mediante variables de entorno (archivo `.env`):
//!
//! ```env
//! # Servidor
//! PORT=3000
//!
//! # Almacén: file (por defecto), mongodb o memory
//! STORE_BACKEND=file
//! RESERVAS_FILE=data/reservas.json
//!
//! # MongoDB (solo con STORE_BACKEND=mongodb)
//! MONGODB_URI=mongodb://localhost:27017
//! MONGODB_DATABASE=hotel_paraiso
//!
//! # Logging
//! RUST_LOG=debug,mongodb=info
//! ```
//!
//! ## Ejecución
//!
//! ```bash
//! cargo run
//! curl http://localhost:3000/api/reservas
//! ```

use actix_web::{middleware::Logger, web, App, HttpServer};

use hotel_paraiso::api::{self, middleware::ErrorLogExt};
use hotel_paraiso::config::AppConfig;
use hotel_paraiso::db::{self, ReservaStore};

/// Función principal que inicia el servidor web
///
/// 1. Carga variables de entorno desde `.env`
/// 2. Configura el sistema de logging con tracing
/// 3. Construye el almacén de reservas configurado
/// 4. Arranca el servidor HTTP con las rutas de la API
///
/// # Errores
///
/// Retorna `std::io::Error` si la configuración es inválida, si no se puede
/// abrir el almacén o si no se puede bindear la dirección.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Configurar sistema de logging con tracing
    let filtro = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hotel_paraiso=debug,actix_web=info,mongodb=info"));
    tracing_subscriber::fmt().with_env_filter(filtro).init();

    tracing::info!("Iniciando Hotel Paraíso Server...");

    let config = AppConfig::from_env()
        .log_error_chain()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let store: web::Data<dyn ReservaStore> = web::Data::from(
        db::conectar(&config.backend)
            .await
            .log_error_context("conectando el almacén de reservas")
            .map_err(std::io::Error::other)?,
    );

    tracing::info!("Servidor iniciando en {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .wrap(Logger::default())
            .configure(api::init_routes)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
