//! Almacén en un único archivo JSON
//!
//! El archivo contiene un array con todas las reservas. Cada operación lee el
//! archivo completo, modifica la colección en memoria y lo reescribe completo.
//! Un mutex serializa las operaciones dentro del proceso, de modo que dos
//! peticiones concurrentes no pierden escrituras entre sí.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{
    coleccion, NuevaReserva, Reserva, ReservaId, ReservaPatch, ReservaStore, StoreError,
    StoreResult,
};

/// Resultado de leer el archivo; `completa` es falso si se omitió algún registro
struct Lectura {
    reservas: Vec<Reserva>,
    completa: bool,
}

impl Lectura {
    fn vacia() -> Self {
        Lectura {
            reservas: Vec::new(),
            completa: true,
        }
    }
}

#[derive(Debug)]
pub struct JsonFileStore {
    ruta: PathBuf,
    cerrojo: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(ruta: impl Into<PathBuf>) -> Self {
        Self {
            ruta: ruta.into(),
            cerrojo: Mutex::new(()),
        }
    }

    pub fn ruta(&self) -> &Path {
        &self.ruta
    }

    /// Lee la colección completa
    ///
    /// Un archivo inexistente o vacío es una colección vacía. Si el contenido no
    /// es un array JSON, o alguno de sus registros no es una reserva válida, la
    /// lectura se devuelve incompleta: los registros ilegibles se omiten y se
    /// avisa en el log. El resto de errores de E/S se propagan.
    async fn leer(&self) -> StoreResult<Lectura> {
        let contenido = match tokio::fs::read_to_string(&self.ruta).await {
            Ok(contenido) => contenido,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Lectura::vacia()),
            Err(e) => return Err(StoreError::io(&self.ruta, e)),
        };

        if contenido.trim().is_empty() {
            return Ok(Lectura::vacia());
        }

        let valores: Vec<Value> = match serde_json::from_str(&contenido) {
            Ok(valores) => valores,
            Err(e) => {
                tracing::warn!(
                    ruta = %self.ruta.display(),
                    error = %e,
                    "Archivo de reservas ilegible, se trata como vacío"
                );
                return Ok(Lectura {
                    reservas: Vec::new(),
                    completa: false,
                });
            }
        };

        let mut lectura = Lectura {
            reservas: Vec::with_capacity(valores.len()),
            completa: true,
        };
        for (indice, valor) in valores.into_iter().enumerate() {
            match serde_json::from_value::<Reserva>(valor) {
                Ok(reserva) => lectura.reservas.push(reserva),
                Err(e) => {
                    tracing::warn!(
                        ruta = %self.ruta.display(),
                        indice,
                        error = %e,
                        "Registro de reserva ilegible, se omite"
                    );
                    lectura.completa = false;
                }
            }
        }
        Ok(lectura)
    }

    /// Lee la colección antes de reescribirla
    ///
    /// Falla con [`StoreError::ColeccionIlegible`] si la lectura omitió algo:
    /// reescribir el archivo borraría esos registros.
    async fn leer_para_escribir(&self) -> StoreResult<Vec<Reserva>> {
        let lectura = self.leer().await?;
        if !lectura.completa {
            return Err(StoreError::ColeccionIlegible {
                path: self.ruta.clone(),
            });
        }
        Ok(lectura.reservas)
    }

    async fn guardar(&self, reservas: &[Reserva]) -> StoreResult<()> {
        if let Some(directorio) = self.ruta.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(directorio)
                .await
                .map_err(|e| StoreError::io(directorio, e))?;
        }

        let json = serde_json::to_string_pretty(reservas)?;
        tokio::fs::write(&self.ruta, json)
            .await
            .map_err(|e| StoreError::io(&self.ruta, e))?;

        tracing::debug!(total = reservas.len(), "Reservas guardadas");
        Ok(())
    }
}

#[async_trait]
impl ReservaStore for JsonFileStore {
    async fn find_all(&self) -> StoreResult<Vec<Reserva>> {
        let _guard = self.cerrojo.lock().await;
        Ok(self.leer().await?.reservas)
    }

    async fn find_by_id(&self, id: ReservaId) -> StoreResult<Option<Reserva>> {
        let _guard = self.cerrojo.lock().await;
        Ok(self.leer().await?.reservas.into_iter().find(|r| r.id == id))
    }

    async fn create(&self, datos: NuevaReserva) -> StoreResult<Reserva> {
        let _guard = self.cerrojo.lock().await;
        let mut reservas = self.leer_para_escribir().await?;
        let reserva = coleccion::crear(&mut reservas, datos)?;
        self.guardar(&reservas).await?;
        Ok(reserva)
    }

    async fn update(&self, id: ReservaId, cambios: ReservaPatch) -> StoreResult<Option<Reserva>> {
        let _guard = self.cerrojo.lock().await;
        let mut reservas = self.leer_para_escribir().await?;
        let Some(actualizada) = coleccion::actualizar(&mut reservas, id, &cambios) else {
            return Ok(None);
        };
        self.guardar(&reservas).await?;
        Ok(Some(actualizada))
    }

    async fn delete(&self, id: ReservaId) -> StoreResult<bool> {
        let _guard = self.cerrojo.lock().await;
        let mut reservas = self.leer_para_escribir().await?;
        if !coleccion::eliminar(&mut reservas, id) {
            return Ok(false);
        }
        self.guardar(&reservas).await?;
        Ok(true)
    }
}
