//! # Configuración
//!
//! Se lee de variables de entorno (y del archivo `.env`, cargado con `dotenvy`):
//!
//! | Variable | Default |
//! |---|---|
//! | `BIND_ADDRESS` | `0.0.0.0:$PORT` |
//! | `PORT` | `3000` |
//! | `STORE_BACKEND` | `file` (`file`, `mongodb` o `memory`) |
//! | `RESERVAS_FILE` | `data/reservas.json` |
//! | `MONGODB_URI` | `mongodb://localhost:27017` |
//! | `MONGODB_DATABASE` | `hotel_paraiso` |

use std::env;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_RESERVAS_FILE: &str = "data/reservas.json";
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_MONGODB_DATABASE: &str = "hotel_paraiso";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STORE_BACKEND desconocido: '{0}' (use file, mongodb o memory)")]
    BackendDesconocido(String),
}

/// Dónde se guardan las reservas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    File(PathBuf),
    MongoDb { uri: String, database: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_address: String,
    pub backend: StoreBackend,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|nombre| env::var(nombre).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de variables
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |nombre: &str| var(nombre).filter(|v| !v.trim().is_empty());

        let bind_address = var("BIND_ADDRESS").unwrap_or_else(|| {
            let port = var("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
            format!("0.0.0.0:{}", port)
        });

        let backend = match var("STORE_BACKEND").as_deref().map(str::to_ascii_lowercase) {
            None => Self::file_backend(&var),
            Some(nombre) => match nombre.as_str() {
                "file" | "json" => Self::file_backend(&var),
                "mongodb" | "mongo" => StoreBackend::MongoDb {
                    uri: var("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string()),
                    database: var("MONGODB_DATABASE")
                        .unwrap_or_else(|| DEFAULT_MONGODB_DATABASE.to_string()),
                },
                "memory" => StoreBackend::Memory,
                _ => return Err(ConfigError::BackendDesconocido(nombre)),
            },
        };

        Ok(AppConfig {
            bind_address,
            backend,
        })
    }

    fn file_backend(var: &impl Fn(&str) -> Option<String>) -> StoreBackend {
        StoreBackend::File(PathBuf::from(
            var("RESERVAS_FILE").unwrap_or_else(|| DEFAULT_RESERVAS_FILE.to_string()),
        ))
    }
}
