//! # Almacén de reservas
//!
//! La colección de reservas vive detrás del trait [`ReservaStore`]. Hay tres
//! implementaciones, elegidas con `STORE_BACKEND`:
//!
//! - [`JsonFileStore`] - archivo JSON leído y escrito completo en cada operación
//! - [`MongoStore`] - colección `reservas` en MongoDB
//! - [`MemoryStore`] - vector en memoria, para pruebas y demos

pub mod json_file;
pub mod memory;
pub mod models;
pub mod mongodb;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StoreBackend;

pub use self::mongodb::MongoStore;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use models::{
    Capacidad, EstadoReserva, IdInvalido, NuevaReserva, Reserva, ReservaId, ReservaInput,
    ReservaPatch, TipoHabitacion,
};

/// Fallo del almacenamiento subyacente
///
/// Nunca significa "no encontrado": esa situación se expresa con `None` o `false`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Error de E/S en '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error serializando reservas: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("El archivo de reservas '{}' contiene registros ilegibles; no se sobrescribe", .path.display())]
    ColeccionIlegible { path: PathBuf },

    #[error("No quedan ids disponibles tras el id {0}")]
    IdsAgotados(ReservaId),

    #[error("Error de base de datos en operación '{operation}': {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: ::mongodb::error::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn database(operation: &'static str, source: ::mongodb::error::Error) -> Self {
        Self::Database { operation, source }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operaciones CRUD sobre la colección ordenada de reservas
#[async_trait]
pub trait ReservaStore: Send + Sync {
    /// Todas las reservas, en orden de inserción
    async fn find_all(&self) -> StoreResult<Vec<Reserva>>;

    async fn find_by_id(&self, id: ReservaId) -> StoreResult<Option<Reserva>>;

    /// Añade la reserva al final con `id = último id + 1` (o 1 si está vacía)
    async fn create(&self, datos: NuevaReserva) -> StoreResult<Reserva>;

    /// Combina los cambios sobre la reserva; `None` si no existe
    async fn update(&self, id: ReservaId, cambios: ReservaPatch) -> StoreResult<Option<Reserva>>;

    /// Elimina la reserva; `false` si no existe
    async fn delete(&self, id: ReservaId) -> StoreResult<bool>;
}

/// Siguiente id según la última reserva de la colección
///
/// No es el máximo ni el número de elementos: si se borra la última reserva,
/// su id vuelve a asignarse.
pub fn siguiente_id(reservas: &[Reserva]) -> StoreResult<ReservaId> {
    siguiente_tras(reservas.last())
}

pub(crate) fn siguiente_tras(ultima: Option<&Reserva>) -> StoreResult<ReservaId> {
    match ultima {
        None => Ok(ReservaId::PRIMERO),
        Some(ultima) => ultima
            .id
            .siguiente()
            .ok_or(StoreError::IdsAgotados(ultima.id)),
    }
}

/// Operaciones comunes a los almacenes que trabajan sobre un `Vec` completo
pub(crate) mod coleccion {
    use super::*;

    pub fn crear(reservas: &mut Vec<Reserva>, datos: NuevaReserva) -> StoreResult<Reserva> {
        let reserva = Reserva::nueva(siguiente_id(reservas)?, datos);
        reservas.push(reserva.clone());
        Ok(reserva)
    }

    pub fn actualizar(
        reservas: &mut [Reserva],
        id: ReservaId,
        cambios: &ReservaPatch,
    ) -> Option<Reserva> {
        let reserva = reservas.iter_mut().find(|r| r.id == id)?;
        reserva.aplicar(cambios);
        Some(reserva.clone())
    }

    pub fn eliminar(reservas: &mut Vec<Reserva>, id: ReservaId) -> bool {
        match reservas.iter().position(|r| r.id == id) {
            Some(indice) => {
                reservas.remove(indice);
                true
            }
            None => false,
        }
    }
}

/// Construye el almacén configurado
pub async fn conectar(backend: &StoreBackend) -> StoreResult<Arc<dyn ReservaStore>> {
    match backend {
        StoreBackend::File(ruta) => {
            tracing::info!(ruta = %ruta.display(), "Usando almacén de reservas en archivo JSON");
            Ok(Arc::new(JsonFileStore::new(ruta.clone())))
        }
        StoreBackend::MongoDb { uri, database } => {
            let store = MongoStore::init(uri, database).await?;

            // Sin índice las consultas funcionan igual, solo más lentas
            if let Err(e) = store.create_indexes().await {
                tracing::warn!("Advertencia creando índices: {}", e);
            }

            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Usando almacén en memoria: las reservas se pierden al reiniciar");
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reserva(id: u64) -> Reserva {
        Reserva {
            id: ReservaId::new(id).unwrap(),
            hotel: "Hotel Paraíso".to_string(),
            fecha_inicio: NaiveDate::from_ymd_opt(2099, 8, 15).unwrap(),
            fecha_fin: NaiveDate::from_ymd_opt(2099, 8, 20).unwrap(),
            tipo_habitacion: TipoHabitacion::Doble,
            estado: EstadoReserva::Pendiente,
            num_huespedes: 2,
        }
    }

    #[test]
    fn primer_id_es_uno() {
        assert_eq!(siguiente_id(&[]).unwrap(), ReservaId::PRIMERO);
    }

    #[test]
    fn siguiente_id_usa_la_ultima_reserva() {
        // No es el máximo: manda la última posición
        let reservas = vec![reserva(8), reserva(3)];
        assert_eq!(siguiente_id(&reservas).unwrap().get(), 4);
    }

    #[test]
    fn borrar_la_ultima_reutiliza_su_id() {
        let mut reservas = vec![reserva(1), reserva(2), reserva(3)];
        assert!(coleccion::eliminar(&mut reservas, ReservaId::new(3).unwrap()));
        assert_eq!(siguiente_id(&reservas).unwrap().get(), 3);

        assert!(coleccion::eliminar(&mut reservas, ReservaId::new(1).unwrap()));
        assert_eq!(siguiente_id(&reservas).unwrap().get(), 3);
    }

    #[test]
    fn ids_agotados_es_error() {
        let reservas = vec![reserva(u64::MAX)];
        let err = siguiente_id(&reservas).unwrap_err();
        assert!(matches!(err, StoreError::IdsAgotados(id) if id.get() == u64::MAX));
    }

    #[test]
    fn eliminar_inexistente_no_modifica() {
        let mut reservas = vec![reserva(1), reserva(2)];
        assert!(!coleccion::eliminar(&mut reservas, ReservaId::new(9).unwrap()));
        assert_eq!(reservas.len(), 2);
    }
}
