//! # Manejo de errores de la API
//!
//! Todos los errores se responden con el cuerpo `{ "error": "<mensaje>" }`.
//! Los fallos del almacén se registran con su cadena completa y un trace id,
//! pero al cliente solo le llega un mensaje genérico.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use super::middleware::log_error_chain;
use crate::db::StoreError;
use crate::domain::{FiltroInvalido, ValidationErrors};

/// Tipos de error de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// Una o más reglas de validación incumplidas
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Parámetro de consulta inválido en el listado
    #[error("{0}")]
    InvalidFilter(#[from] FiltroInvalido),

    /// Id de la ruta que no es un entero positivo
    #[error("El ID debe ser un número entero positivo")]
    InvalidId,

    /// Cuerpo o query que no se pudo interpretar
    #[error("{0}")]
    BadRequest(String),

    #[error("Reserva No Encontrada")]
    NotFound,

    /// Fallo del almacén; `message` es lo único que ve el cliente
    #[error("{message}")]
    Store {
        message: String,
        trace_id: String,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    /// Error del almacén durante `accion` ("crear la reserva", "obtener las reservas"...)
    pub fn store(accion: &str, source: StoreError) -> Self {
        Self::Store {
            message: format!("Error interno del servidor al {}", accion),
            trace_id: uuid::Uuid::new_v4().to_string(),
            source,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidFilter(_) | Self::InvalidId | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Validation(errores) => {
                tracing::warn!(
                    violaciones = errores.violaciones().len(),
                    detalle = %errores,
                    "Validation error"
                );
            }
            Self::NotFound => {
                tracing::info!("Resource not found");
            }
            Self::Store {
                message,
                trace_id,
                source,
            } => {
                tracing::error!(trace_id = %trace_id, respuesta = %message, "Store error occurred");
                log_error_chain(source, Some(trace_id.as_str()));
            }
            error => {
                tracing::warn!(error = %error, "Bad request");
            }
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type AppResult<T> = Result<T, AppError>;

pub trait ResultExt<T> {
    /// Convierte un fallo del almacén en el 500 de la operación `accion`
    fn map_err_store(self, accion: &str) -> AppResult<T>;
}

impl<T> ResultExt<T> for Result<T, StoreError> {
    fn map_err_store(self, accion: &str) -> AppResult<T> {
        self.map_err(|e| AppError::store(accion, e))
    }
}
