//! # Lógica de reservas
//!
//! Reglas puras, sin E/S:
//!
//! - [`validation`] - Validación de los datos de una reserva
//! - [`filter`] - Filtros de consulta sobre una colección de reservas

pub mod filter;
pub mod validation;

pub use filter::{filtrar, CriteriosFiltro, FiltroInvalido, RangoFechas, ReservaQuery};
pub use validation::{
    hoy, validar, validar_coherencia, validar_fecha, Operacion, ValidationErrors, Violacion,
};
