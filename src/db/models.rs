//! # Modelos de datos
//!
//! Tipos que representan una reserva tal como se persiste y tal como llega
//! desde el cliente:
//!
//! - [`Reserva`]: registro persistido, con tipos fuertes
//! - [`ReservaInput`]: cuerpo JSON sin validar (creación o actualización)
//! - [`NuevaReserva`] / [`ReservaPatch`]: datos ya validados, listos para el almacén

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Identificador de una reserva: entero positivo asignado por el almacén
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ReservaId(u64);

/// Error al interpretar un identificador recibido como texto
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ID de reserva inválido: '{0}'")]
pub struct IdInvalido(pub String);

impl ReservaId {
    /// Identificador de la primera reserva de una colección vacía
    pub const PRIMERO: ReservaId = ReservaId(1);

    /// Crea un identificador; `None` si el valor no es positivo
    pub fn new(valor: u64) -> Option<Self> {
        (valor > 0).then_some(ReservaId(valor))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// `None` si ya no quedan ids por asignar
    pub fn siguiente(self) -> Option<Self> {
        self.0.checked_add(1).map(ReservaId)
    }
}

impl fmt::Display for ReservaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Acepta "7", " 7 " o "007"; rechaza "0", "-1", "7a"
impl FromStr for ReservaId {
    type Err = IdInvalido;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(ReservaId::new)
            .ok_or_else(|| IdInvalido(s.to_string()))
    }
}

impl TryFrom<u64> for ReservaId {
    type Error = IdInvalido;

    fn try_from(valor: u64) -> Result<Self, Self::Error> {
        ReservaId::new(valor).ok_or_else(|| IdInvalido(valor.to_string()))
    }
}

// Los registros antiguos pueden guardar el id como número o como texto.
impl<'de> Deserialize<'de> for ReservaId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IdCrudo {
            Numero(u64),
            Texto(String),
        }

        match IdCrudo::deserialize(deserializer)? {
            IdCrudo::Numero(n) => ReservaId::try_from(n).map_err(serde::de::Error::custom),
            IdCrudo::Texto(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Rango admitido de huéspedes para un tipo de habitación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacidad {
    pub min: u8,
    pub max: u8,
}

impl Capacidad {
    pub fn admite(&self, huespedes: f64) -> bool {
        huespedes >= f64::from(self.min) && huespedes <= f64::from(self.max)
    }
}

/// Tipos de habitación del hotel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoHabitacion {
    Individual,
    Doble,
    Triple,
    Suite,
}

impl TipoHabitacion {
    pub const TODOS: [TipoHabitacion; 4] = [
        TipoHabitacion::Individual,
        TipoHabitacion::Doble,
        TipoHabitacion::Triple,
        TipoHabitacion::Suite,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TipoHabitacion::Individual => "individual",
            TipoHabitacion::Doble => "doble",
            TipoHabitacion::Triple => "triple",
            TipoHabitacion::Suite => "suite",
        }
    }

    /// Interpreta el nombre exacto (sensible a mayúsculas) de un tipo
    pub fn parse(s: &str) -> Option<Self> {
        Self::TODOS.into_iter().find(|t| t.as_str() == s)
    }

    pub fn capacidad(self) -> Capacidad {
        let max = match self {
            TipoHabitacion::Individual => 1,
            TipoHabitacion::Doble => 2,
            TipoHabitacion::Triple => 3,
            TipoHabitacion::Suite => 4,
        };
        Capacidad { min: 1, max }
    }

    /// Lista "individual, doble, triple, suite" usada en los mensajes de error
    pub fn listado() -> String {
        Self::TODOS.map(Self::as_str).join(", ")
    }
}

impl fmt::Display for TipoHabitacion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estado del ciclo de vida de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoReserva {
    #[default]
    Pendiente,
    Confirmada,
    Cancelada,
    Completada,
}

impl EstadoReserva {
    pub const TODOS: [EstadoReserva; 4] = [
        EstadoReserva::Pendiente,
        EstadoReserva::Confirmada,
        EstadoReserva::Cancelada,
        EstadoReserva::Completada,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EstadoReserva::Pendiente => "pendiente",
            EstadoReserva::Confirmada => "confirmada",
            EstadoReserva::Cancelada => "cancelada",
            EstadoReserva::Completada => "completada",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::TODOS.into_iter().find(|e| e.as_str() == s)
    }

    pub fn listado() -> String {
        Self::TODOS.map(Self::as_str).join(", ")
    }
}

impl fmt::Display for EstadoReserva {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reserva persistida
///
/// El orden de los campos es el orden en que aparecen en el archivo JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserva {
    pub id: ReservaId,
    pub hotel: String,
    /// Fecha de entrada (YYYY-MM-DD)
    pub fecha_inicio: NaiveDate,
    /// Fecha de salida (YYYY-MM-DD)
    pub fecha_fin: NaiveDate,
    pub tipo_habitacion: TipoHabitacion,
    pub estado: EstadoReserva,
    pub num_huespedes: u8,
}

impl Reserva {
    /// Construye el registro que el almacén añadirá al final de la colección
    pub fn nueva(id: ReservaId, datos: NuevaReserva) -> Self {
        Reserva {
            id,
            hotel: datos.hotel,
            fecha_inicio: datos.fecha_inicio,
            fecha_fin: datos.fecha_fin,
            tipo_habitacion: datos.tipo_habitacion,
            estado: datos.estado.unwrap_or_default(),
            num_huespedes: datos.num_huespedes,
        }
    }

    /// Sobrescribe solo los campos presentes en `cambios`. El `id` nunca cambia.
    pub fn aplicar(&mut self, cambios: &ReservaPatch) {
        if let Some(hotel) = &cambios.hotel {
            self.hotel = hotel.clone();
        }
        if let Some(fecha) = cambios.fecha_inicio {
            self.fecha_inicio = fecha;
        }
        if let Some(fecha) = cambios.fecha_fin {
            self.fecha_fin = fecha;
        }
        if let Some(tipo) = cambios.tipo_habitacion {
            self.tipo_habitacion = tipo;
        }
        if let Some(estado) = cambios.estado {
            self.estado = estado;
        }
        if let Some(huespedes) = cambios.num_huespedes {
            self.num_huespedes = huespedes;
        }
    }

    pub fn con_cambios(&self, cambios: &ReservaPatch) -> Self {
        let mut copia = self.clone();
        copia.aplicar(cambios);
        copia
    }
}

/// Cuerpo JSON recibido al crear o actualizar una reserva, antes de validar
///
/// Los campos de texto se reciben tal cual; `num_huespedes` se conserva como
/// valor JSON arbitrario para poder distinguir "no es un entero" de "fuera de rango".
/// Cualquier `id` presente en el cuerpo se ignora.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservaInput {
    pub hotel: Option<String>,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    pub tipo_habitacion: Option<String>,
    pub num_huespedes: Option<serde_json::Value>,
    pub estado: Option<String>,
}

/// Datos validados para crear una reserva
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NuevaReserva {
    pub hotel: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub tipo_habitacion: TipoHabitacion,
    pub num_huespedes: u8,
    /// `None` se guarda como `pendiente`
    pub estado: Option<EstadoReserva>,
}

/// Cambios validados de una actualización parcial
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservaPatch {
    pub hotel: Option<String>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub tipo_habitacion: Option<TipoHabitacion>,
    pub num_huespedes: Option<u8>,
    pub estado: Option<EstadoReserva>,
}
