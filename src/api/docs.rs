//! Documento OpenAPI 3.0 de la API, servido en `GET /api-docs`

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::{json, Value};

use crate::db::{EstadoReserva, TipoHabitacion};

fn reserva_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "minimum": 1, "readOnly": true, "example": 1 },
            "hotel": { "type": "string", "example": "Hotel Paraíso" },
            "fecha_inicio": { "type": "string", "format": "date", "example": "2099-08-15" },
            "fecha_fin": { "type": "string", "format": "date", "example": "2099-08-20" },
            "tipo_habitacion": {
                "type": "string",
                "enum": TipoHabitacion::TODOS.map(TipoHabitacion::as_str),
                "example": "doble"
            },
            "estado": {
                "type": "string",
                "enum": EstadoReserva::TODOS.map(EstadoReserva::as_str),
                "default": EstadoReserva::default().as_str()
            },
            "num_huespedes": { "type": "integer", "minimum": 1, "maximum": 4, "example": 2 }
        }
    })
}

fn respuesta_error(descripcion: &str) -> Value {
    json!({
        "description": descripcion,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
    })
}

fn respuesta_reserva(descripcion: &str) -> Value {
    json!({
        "description": descripcion,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Reserva" } } }
    })
}

fn parametro_query(nombre: &str, schema: Value) -> Value {
    json!({ "name": nombre, "in": "query", "required": false, "schema": schema })
}

/// Construye el documento OpenAPI completo
pub fn openapi() -> Value {
    let capacidades: Vec<String> = TipoHabitacion::TODOS
        .iter()
        .map(|t| {
            let c = t.capacidad();
            format!("{}: {}-{} huéspedes", t, c.min, c.max)
        })
        .collect();

    let cuerpo = json!({
        "required": true,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Reserva" } } }
    });
    let id_param = json!({
        "name": "id", "in": "path", "required": true,
        "schema": { "type": "integer", "minimum": 1 }
    });

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "API de Reservas Hotel Paraíso",
            "version": env!("CARGO_PKG_VERSION"),
            "description": format!(
                "Gestión de reservas del Hotel Paraíso. Capacidades: {}.",
                capacidades.join("; ")
            )
        },
        "paths": {
            "/api/reservas": {
                "post": {
                    "summary": "Crear nueva reserva",
                    "requestBody": cuerpo,
                    "responses": {
                        "201": respuesta_reserva("Reserva creada"),
                        "400": respuesta_error("Datos inválidos"),
                        "500": respuesta_error("Error al crear la reserva")
                    }
                },
                "get": {
                    "summary": "Listar reservas",
                    "description": "El filtro por fechas solo se aplica si se indican fecha_inicio y fecha_fin.",
                    "parameters": [
                        parametro_query("hotel", json!({ "type": "string" })),
                        parametro_query("fecha_inicio", json!({ "type": "string", "format": "date" })),
                        parametro_query("fecha_fin", json!({ "type": "string", "format": "date" })),
                        parametro_query("tipo_habitacion", reserva_schema()["properties"]["tipo_habitacion"].clone()),
                        parametro_query("estado", reserva_schema()["properties"]["estado"].clone()),
                        parametro_query("num_huespedes", json!({ "type": "integer", "minimum": 1, "maximum": 4 }))
                    ],
                    "responses": {
                        "200": {
                            "description": "Reservas encontradas",
                            "content": { "application/json": { "schema": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Reserva" }
                            } } }
                        },
                        "400": respuesta_error("Filtro inválido"),
                        "500": respuesta_error("Error al obtener las reservas")
                    }
                }
            },
            "/api/reservas/{id}": {
                "get": {
                    "summary": "Obtener reserva por ID",
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": respuesta_reserva("Reserva encontrada"),
                        "400": respuesta_error("ID inválido"),
                        "404": respuesta_error("Reserva No Encontrada"),
                        "500": respuesta_error("Error al obtener la reserva")
                    }
                },
                "put": {
                    "summary": "Actualizar reserva",
                    "parameters": [id_param.clone()],
                    "requestBody": cuerpo,
                    "responses": {
                        "200": respuesta_reserva("Reserva actualizada"),
                        "400": respuesta_error("Datos inválidos"),
                        "404": respuesta_error("Reserva No Encontrada"),
                        "500": respuesta_error("Error al actualizar la reserva")
                    }
                },
                "delete": {
                    "summary": "Eliminar reserva",
                    "parameters": [id_param],
                    "responses": {
                        "200": {
                            "description": "Reserva Eliminada Correctamente",
                            "content": { "application/json": { "schema": {
                                "type": "object",
                                "properties": { "message": { "type": "string" } }
                            } } }
                        },
                        "404": respuesta_error("Reserva No Encontrada"),
                        "500": respuesta_error("Error al eliminar la reserva")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Reserva": reserva_schema(),
                "Error": {
                    "type": "object",
                    "required": ["error"],
                    "properties": { "error": { "type": "string" } }
                }
            }
        }
    })
}

#[get("/api-docs")]
async fn api_docs() -> impl Responder {
    HttpResponse::Ok().json(openapi())
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(api_docs);
}
