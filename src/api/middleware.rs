//! # Registro de fallos internos
//!
//! Los fallos del almacén llegan envueltos: un [`StoreError`](crate::db::StoreError)
//! de E/S guarda el `io::Error` original como causa. Al cliente solo se le
//! responde con un mensaje genérico, así que la cadena completa de causas se
//! deja en el log, junto al `trace_id` de la respuesta o al paso de arranque
//! que falló.

use std::error::Error as StdError;

/// Mensajes del error y de todas sus causas, del más externo al más interno
pub fn cadena_de_errores(error: &(dyn StdError + 'static)) -> Vec<String> {
    let mut cadena = Vec::new();
    let mut actual = Some(error);

    while let Some(err) = actual {
        cadena.push(err.to_string());
        actual = err.source();
    }
    cadena
}

/// Registra la cadena de causas de un fallo interno
///
/// `contexto` es el `trace_id` devuelto al cliente cuando el fallo ocurre
/// atendiendo una petición, o una descripción del paso de arranque.
pub fn log_error_chain<E>(error: &E, contexto: Option<&str>)
where
    E: StdError + 'static,
{
    let cadena = cadena_de_errores(error);

    match contexto {
        Some(contexto) => tracing::error!(
            contexto = %contexto,
            causas = ?cadena,
            "Fallo interno con su cadena de causas"
        ),
        None => tracing::error!(causas = ?cadena, "Fallo interno con su cadena de causas"),
    }
}

/// Registra la cadena de causas de un `Result` fallido y lo devuelve intacto
///
/// Lo usa el arranque del servidor, antes de convertir el error en `io::Error`
/// y perder sus causas:
///
/// ```no_run
/// # async fn ejemplo(backend: hotel_paraiso::config::StoreBackend) -> Result<(), hotel_paraiso::db::StoreError> {
/// use hotel_paraiso::api::middleware::ErrorLogExt;
///
/// let store = hotel_paraiso::db::conectar(&backend)
///     .await
///     .log_error_context("conectando el almacén de reservas")?;
/// # Ok(())
/// # }
/// ```
pub trait ErrorLogExt<T, E> {
    fn log_error_chain(self) -> Result<T, E>;

    fn log_error_context(self, contexto: &str) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_chain(self) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, None);
        }
        self
    }

    fn log_error_context(self, contexto: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, Some(contexto));
        }
        self
    }
}
