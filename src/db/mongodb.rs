use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database};

use super::{siguiente_tras, NuevaReserva, Reserva, ReservaId, ReservaPatch, ReservaStore, StoreError, StoreResult};

/// Almacén respaldado por MongoDB
///
/// Los documentos tienen la misma forma que el registro JSON (con un campo
/// numérico `id`, además del `_id` propio de MongoDB). El orden de la colección
/// es el orden natural de inserción.
#[derive(Debug, Clone)]
pub struct MongoStore {
    pub client: Client,
    pub database: Database,
}

fn filtro_id(id: ReservaId) -> Document {
    // BSON no tiene enteros sin signo; los ids caben de sobra en i64
    doc! { "id": id.get() as i64 }
}

impl MongoStore {
    pub async fn init(uri: &str, database_name: &str) -> StoreResult<MongoStore> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::database("conectar", e))?;

        let database = client.database(database_name);

        // Test connection
        database
            .run_command(doc! {"ping": 1})
            .await
            .map_err(|e| StoreError::database("ping", e))?;

        tracing::info!(database = %database_name, "Conexión a MongoDB establecida exitosamente");

        Ok(MongoStore { client, database })
    }

    pub fn reservas(&self) -> Collection<Reserva> {
        self.database.collection("reservas")
    }

    pub async fn create_indexes(&self) -> StoreResult<()> {
        use mongodb::{options::IndexOptions, IndexModel};

        let indice = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.reservas()
            .create_index(indice)
            .await
            .map_err(|e| StoreError::database("crear índices", e))?;

        tracing::info!("Índices MongoDB creados exitosamente");
        Ok(())
    }

    async fn ultima(&self) -> StoreResult<Option<Reserva>> {
        self.reservas()
            .find_one(doc! {})
            .sort(doc! { "$natural": -1 })
            .await
            .map_err(|e| StoreError::database("buscar última reserva", e))
    }
}

#[async_trait]
impl ReservaStore for MongoStore {
    async fn find_all(&self) -> StoreResult<Vec<Reserva>> {
        let mut cursor = self
            .reservas()
            .find(doc! {})
            .sort(doc! { "$natural": 1 })
            .await
            .map_err(|e| StoreError::database("listar reservas", e))?;

        let mut reservas = Vec::new();
        while cursor
            .advance()
            .await
            .map_err(|e| StoreError::database("iterar cursor", e))?
        {
            let reserva = cursor
                .deserialize_current()
                .map_err(|e| StoreError::database("deserializar reserva", e))?;
            reservas.push(reserva);
        }

        Ok(reservas)
    }

    async fn find_by_id(&self, id: ReservaId) -> StoreResult<Option<Reserva>> {
        self.reservas()
            .find_one(filtro_id(id))
            .await
            .map_err(|e| StoreError::database("buscar reserva", e))
    }

    async fn create(&self, datos: NuevaReserva) -> StoreResult<Reserva> {
        let ultima = self.ultima().await?;
        let id = siguiente_tras(ultima.as_ref())?;
        let reserva = Reserva::nueva(id, datos);

        self.reservas()
            .insert_one(&reserva)
            .await
            .map_err(|e| StoreError::database("guardar reserva", e))?;

        Ok(reserva)
    }

    async fn update(&self, id: ReservaId, cambios: ReservaPatch) -> StoreResult<Option<Reserva>> {
        let Some(mut reserva) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        reserva.aplicar(&cambios);

        self.reservas()
            .replace_one(filtro_id(id), &reserva)
            .await
            .map_err(|e| StoreError::database("actualizar reserva", e))?;

        Ok(Some(reserva))
    }

    async fn delete(&self, id: ReservaId) -> StoreResult<bool> {
        let resultado = self
            .reservas()
            .delete_one(filtro_id(id))
            .await
            .map_err(|e| StoreError::database("eliminar reserva", e))?;

        Ok(resultado.deleted_count > 0)
    }
}
