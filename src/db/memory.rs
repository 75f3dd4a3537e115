use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{coleccion, NuevaReserva, Reserva, ReservaId, ReservaPatch, ReservaStore, StoreResult};

/// Almacén volátil en memoria
#[derive(Debug, Default)]
pub struct MemoryStore {
    reservas: Mutex<Vec<Reserva>>,
}

impl MemoryStore {
    /// Almacén que parte de una colección ya existente
    pub fn con_reservas(reservas: Vec<Reserva>) -> Self {
        Self {
            reservas: Mutex::new(reservas),
        }
    }
}

#[async_trait]
impl ReservaStore for MemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<Reserva>> {
        Ok(self.reservas.lock().await.clone())
    }

    async fn find_by_id(&self, id: ReservaId) -> StoreResult<Option<Reserva>> {
        let reservas = self.reservas.lock().await;
        Ok(reservas.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, datos: NuevaReserva) -> StoreResult<Reserva> {
        let mut reservas = self.reservas.lock().await;
        coleccion::crear(&mut reservas, datos)
    }

    async fn update(&self, id: ReservaId, cambios: ReservaPatch) -> StoreResult<Option<Reserva>> {
        let mut reservas = self.reservas.lock().await;
        Ok(coleccion::actualizar(&mut reservas, id, &cambios))
    }

    async fn delete(&self, id: ReservaId) -> StoreResult<bool> {
        let mut reservas = self.reservas.lock().await;
        Ok(coleccion::eliminar(&mut reservas, id))
    }
}
