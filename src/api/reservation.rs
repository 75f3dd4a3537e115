//! # API de Reservas
//!
//! Operaciones CRUD sobre `/api/reservas`:
//! - Crear nuevas reservas
//! - Listar reservas con filtros opcionales
//! - Consultar una reserva por ID
//! - Actualizar parcialmente una reserva
//! - Eliminar una reserva
//!
//! Cada handler valida la entrada, llama al almacén y da forma a la respuesta.
//! Una petición rechazada nunca modifica el almacén.

use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Serialize;

use super::errors::ResultExt;
use super::{AppError, AppResult};
use crate::db::{NuevaReserva, ReservaId, ReservaInput, ReservaPatch, ReservaStore};
use crate::domain::{filtrar, hoy, validar_coherencia, CriteriosFiltro, ReservaQuery};

/// Respuesta de una eliminación correcta
#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// Id de la ruta para consultas: un id malformado es un error del cliente
fn id_consulta(path: &str) -> AppResult<ReservaId> {
    path.parse().map_err(|_| AppError::InvalidId)
}

/// Id de la ruta para modificaciones: un id malformado no puede existir
fn id_existente(path: &str) -> AppResult<ReservaId> {
    path.parse().map_err(|_| AppError::NotFound)
}

/// Crea una nueva reserva
///
/// # Validaciones
/// - `hotel`, `fecha_inicio`, `fecha_fin`, `tipo_habitacion` y `num_huespedes` obligatorios
/// - Fechas en formato YYYY-MM-DD, inicio anterior al fin y no en el pasado
/// - Tipo de habitación y estado dentro de los valores admitidos
/// - Número de huéspedes entre 1 y la capacidad de la habitación
///
/// # Respuesta
/// `201 Created` con la reserva guardada (estado `pendiente` si no se indica):
/// ```json
/// {
///   "id": 1,
///   "hotel": "Hotel Paraíso",
///   "fecha_inicio": "2099-08-15",
///   "fecha_fin": "2099-08-20",
///   "tipo_habitacion": "doble",
///   "estado": "pendiente",
///   "num_huespedes": 2
/// }
/// ```
///
/// # Errores
/// - `400 Bad Request`: Reglas incumplidas, unidas con ". "
/// - `500 Internal Server Error`: Error del almacén
#[post("/api/reservas")]
async fn crear_reserva(
    store: web::Data<dyn ReservaStore>,
    datos: web::Json<ReservaInput>,
) -> AppResult<impl Responder> {
    let nueva = NuevaReserva::desde_input(datos.into_inner(), hoy())?;

    let reserva = store.create(nueva).await.map_err_store("crear la reserva")?;

    tracing::info!(id = %reserva.id, hotel = %reserva.hotel, "Reserva creada");
    Ok(HttpResponse::Created().json(reserva))
}

/// Lista las reservas con filtros opcionales
///
/// # Filtros disponibles
/// - `hotel`: Nombre exacto del hotel
/// - `tipo_habitacion`: individual, doble, triple o suite
/// - `estado`: pendiente, confirmada, cancelada o completada
/// - `num_huespedes`: Entero entre 1 y 4
/// - `fecha_inicio` + `fecha_fin`: Reservas que se solapan con el rango.
///   Solo se aplica si llegan las dos fechas.
///
/// # Errores
/// - `400 Bad Request`: Algún filtro con valor inválido
/// - `500 Internal Server Error`: Error del almacén
#[get("/api/reservas")]
async fn listar_reservas(
    store: web::Data<dyn ReservaStore>,
    query: web::Query<ReservaQuery>,
) -> AppResult<impl Responder> {
    let criterios = CriteriosFiltro::try_from(query.into_inner())?;

    let reservas = store
        .find_all()
        .await
        .map_err_store("obtener las reservas")?;
    let resultado = filtrar(&reservas, &criterios);

    tracing::debug!(total = reservas.len(), encontradas = resultado.len(), "Reservas filtradas");
    Ok(HttpResponse::Ok().json(resultado))
}

/// Obtiene una reserva por su ID
///
/// # Errores
/// - `400 Bad Request`: El ID no es un entero positivo
/// - `404 Not Found`: Reserva no encontrada
/// - `500 Internal Server Error`: Error del almacén
#[get("/api/reservas/{id}")]
async fn obtener_reserva(
    store: web::Data<dyn ReservaStore>,
    path: web::Path<String>,
) -> AppResult<impl Responder> {
    let id = id_consulta(&path)?;

    let reserva = store
        .find_by_id(id)
        .await
        .map_err_store("obtener la reserva")?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(reserva))
}

/// Actualiza parcialmente una reserva
///
/// Solo cambian los campos presentes en el cuerpo; el `id` nunca cambia.
/// Además de validar los campos recibidos, se comprueba que la reserva
/// resultante siga siendo coherente (fechas en orden y capacidad respetada).
///
/// # Errores
/// - `400 Bad Request`: Reglas incumplidas
/// - `404 Not Found`: Reserva no encontrada
/// - `500 Internal Server Error`: Error del almacén
#[put("/api/reservas/{id}")]
async fn actualizar_reserva(
    store: web::Data<dyn ReservaStore>,
    path: web::Path<String>,
    datos: web::Json<ReservaInput>,
) -> AppResult<impl Responder> {
    let cambios = ReservaPatch::desde_input(datos.into_inner(), hoy())?;
    let id = id_existente(&path)?;

    let actual = store
        .find_by_id(id)
        .await
        .map_err_store("actualizar la reserva")?
        .ok_or(AppError::NotFound)?;
    validar_coherencia(&actual.con_cambios(&cambios))?;

    let reserva = store
        .update(id, cambios)
        .await
        .map_err_store("actualizar la reserva")?
        .ok_or(AppError::NotFound)?;

    tracing::info!(id = %reserva.id, estado = %reserva.estado, "Reserva actualizada");
    Ok(HttpResponse::Ok().json(reserva))
}

/// Elimina una reserva
///
/// # Respuesta
/// ```json
/// { "message": "Reserva Eliminada Correctamente" }
/// ```
///
/// # Errores
/// - `404 Not Found`: Reserva no encontrada
/// - `500 Internal Server Error`: Error del almacén
#[delete("/api/reservas/{id}")]
async fn eliminar_reserva(
    store: web::Data<dyn ReservaStore>,
    path: web::Path<String>,
) -> AppResult<impl Responder> {
    let id = id_existente(&path)?;

    let eliminada = store
        .delete(id)
        .await
        .map_err_store("eliminar la reserva")?;
    if !eliminada {
        return Err(AppError::NotFound);
    }

    tracing::info!(id = %id, "Reserva eliminada");
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Reserva Eliminada Correctamente",
    }))
}

/// Configura las rutas relacionadas con reservas
///
/// # Rutas disponibles
/// - `POST /api/reservas` - Crear nueva reserva
/// - `GET /api/reservas` - Listar reservas con filtros opcionales
/// - `GET /api/reservas/{id}` - Consultar una reserva
/// - `PUT /api/reservas/{id}` - Actualizar una reserva
/// - `DELETE /api/reservas/{id}` - Eliminar una reserva
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(crear_reserva);
    cfg.service(listar_reservas);
    cfg.service(obtener_reserva);
    cfg.service(actualizar_reserva);
    cfg.service(eliminar_reserva);
}
