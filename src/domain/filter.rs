//! # Filtrado de reservas
//!
//! Convierte los parámetros de consulta de `GET /api/reservas` en
//! [`CriteriosFiltro`] y los aplica a una colección de reservas.
//!
//! Todos los criterios son opcionales y se combinan con AND. El filtro por
//! rango de fechas solo se activa cuando llegan **ambas** fechas; con una sola
//! no se filtra por fecha. Es el comportamiento que siempre ha tenido la API y
//! los clientes existentes dependen de él.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use super::validation::{fechas_coherentes, validar_fecha, MAX_HUESPEDES};
use crate::db::{EstadoReserva, Reserva, TipoHabitacion};

/// Parámetros de consulta tal como llegan en la URL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservaQuery {
    pub hotel: Option<String>,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    pub tipo_habitacion: Option<String>,
    pub estado: Option<String>,
    pub num_huespedes: Option<String>,
}

/// Parámetro de filtro rechazado antes de filtrar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FiltroInvalido {
    #[error("Tipo de habitación inválido. Debe ser uno de: {}", TipoHabitacion::listado())]
    TipoHabitacion,

    #[error("Estado inválido. Debe ser uno de: {}", EstadoReserva::listado())]
    Estado,

    #[error("La fecha de inicio debe tener el formato YYYY-MM-DD")]
    FechaInicio,

    #[error("La fecha de fin debe tener el formato YYYY-MM-DD")]
    FechaFin,

    #[error("La fecha de inicio debe ser anterior a la fecha de fin")]
    RangoFechas,

    #[error("El número de huéspedes debe ser un entero entre 1 y {}", MAX_HUESPEDES)]
    NumHuespedes,
}

/// Rango de fechas consultado, inclusivo en ambos extremos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangoFechas {
    pub inicio: NaiveDate,
    pub fin: NaiveDate,
}

impl RangoFechas {
    /// La reserva se solapa con el rango si empieza antes de que acabe
    /// y acaba después de que empiece
    pub fn se_solapa(&self, reserva: &Reserva) -> bool {
        reserva.fecha_inicio <= self.fin && reserva.fecha_fin >= self.inicio
    }
}

/// Criterios de filtrado ya validados
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriosFiltro {
    pub hotel: Option<String>,
    pub tipo_habitacion: Option<TipoHabitacion>,
    pub estado: Option<EstadoReserva>,
    pub num_huespedes: Option<u8>,
    pub rango: Option<RangoFechas>,
}

impl TryFrom<ReservaQuery> for CriteriosFiltro {
    type Error = FiltroInvalido;

    fn try_from(query: ReservaQuery) -> Result<Self, Self::Error> {
        let tipo_habitacion = presente(query.tipo_habitacion.as_deref())
            .map(|t| TipoHabitacion::parse(t).ok_or(FiltroInvalido::TipoHabitacion))
            .transpose()?;

        let estado = presente(query.estado.as_deref())
            .map(|e| EstadoReserva::parse(e).ok_or(FiltroInvalido::Estado))
            .transpose()?;

        let inicio = presente(query.fecha_inicio.as_deref())
            .map(|f| validar_fecha(f).ok_or(FiltroInvalido::FechaInicio))
            .transpose()?;

        let fin = presente(query.fecha_fin.as_deref())
            .map(|f| validar_fecha(f).ok_or(FiltroInvalido::FechaFin))
            .transpose()?;

        let rango = match (inicio, fin) {
            (Some(inicio), Some(fin)) if !fechas_coherentes(inicio, fin) => {
                return Err(FiltroInvalido::RangoFechas);
            }
            (Some(inicio), Some(fin)) => Some(RangoFechas { inicio, fin }),
            _ => None,
        };

        let num_huespedes = presente(query.num_huespedes.as_deref())
            .map(|n| {
                n.trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|n| (1..=MAX_HUESPEDES).contains(n))
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or(FiltroInvalido::NumHuespedes)
            })
            .transpose()?;

        Ok(CriteriosFiltro {
            hotel: presente(query.hotel.as_deref()).map(str::to_string),
            tipo_habitacion,
            estado,
            num_huespedes,
            rango,
        })
    }
}

impl CriteriosFiltro {
    pub fn coincide(&self, reserva: &Reserva) -> bool {
        self.hotel.as_ref().map_or(true, |h| *h == reserva.hotel)
            && self.tipo_habitacion.map_or(true, |t| t == reserva.tipo_habitacion)
            && self.estado.map_or(true, |e| e == reserva.estado)
            && self.num_huespedes.map_or(true, |n| n == reserva.num_huespedes)
            && self.rango.map_or(true, |r| r.se_solapa(reserva))
    }
}

/// Devuelve, en el orden original, las reservas que cumplen todos los criterios
pub fn filtrar(reservas: &[Reserva], criterios: &CriteriosFiltro) -> Vec<Reserva> {
    reservas
        .iter()
        .filter(|r| criterios.coincide(r))
        .cloned()
        .collect()
}

fn presente(valor: Option<&str>) -> Option<&str> {
    valor.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ReservaId;

    fn fecha(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn reserva(
        id: u64,
        hotel: &str,
        tipo: TipoHabitacion,
        huespedes: u8,
        inicio: &str,
        fin: &str,
    ) -> Reserva {
        Reserva {
            id: ReservaId::new(id).unwrap(),
            hotel: hotel.to_string(),
            fecha_inicio: fecha(inicio),
            fecha_fin: fecha(fin),
            tipo_habitacion: tipo,
            estado: EstadoReserva::Pendiente,
            num_huespedes: huespedes,
        }
    }

    fn coleccion() -> Vec<Reserva> {
        let mut confirmada = reserva(2, "Hotel Paraíso", TipoHabitacion::Suite, 4, "2099-09-01", "2099-09-05");
        confirmada.estado = EstadoReserva::Confirmada;
        vec![
            reserva(1, "Hotel Paraíso", TipoHabitacion::Doble, 2, "2099-08-15", "2099-08-20"),
            confirmada,
            reserva(3, "Hotel Edén", TipoHabitacion::Doble, 1, "2099-08-18", "2099-08-19"),
        ]
    }

    fn criterios(query: ReservaQuery) -> CriteriosFiltro {
        CriteriosFiltro::try_from(query).unwrap()
    }

    fn ids(reservas: &[Reserva]) -> Vec<u64> {
        reservas.iter().map(|r| r.id.get()).collect()
    }

    #[test]
    fn sin_criterios_devuelve_todo_en_orden() {
        let resultado = filtrar(&coleccion(), &CriteriosFiltro::default());
        assert_eq!(ids(&resultado), vec![1, 2, 3]);
    }

    #[test]
    fn solapamiento_de_fechas() {
        let c = criterios(ReservaQuery {
            fecha_inicio: Some("2099-08-16".into()),
            fecha_fin: Some("2099-08-18".into()),
            ..Default::default()
        });
        assert_eq!(ids(&filtrar(&coleccion(), &c)), vec![1, 3]);
    }

    #[test]
    fn solapamiento_inclusivo_en_los_extremos() {
        let c = criterios(ReservaQuery {
            fecha_inicio: Some("2099-08-20".into()),
            fecha_fin: Some("2099-09-01".into()),
            ..Default::default()
        });
        assert_eq!(ids(&filtrar(&coleccion(), &c)), vec![1, 2]);
    }

    #[test]
    fn una_sola_fecha_no_filtra() {
        let c = criterios(ReservaQuery {
            fecha_inicio: Some("2099-12-01".into()),
            ..Default::default()
        });
        assert_eq!(c.rango, None);
        assert_eq!(ids(&filtrar(&coleccion(), &c)), vec![1, 2, 3]);
    }

    #[test]
    fn criterios_combinados() {
        let c = criterios(ReservaQuery {
            hotel: Some("Hotel Paraíso".into()),
            tipo_habitacion: Some("doble".into()),
            num_huespedes: Some("2".into()),
            ..Default::default()
        });
        assert_eq!(ids(&filtrar(&coleccion(), &c)), vec![1]);

        let c = criterios(ReservaQuery {
            estado: Some("confirmada".into()),
            ..Default::default()
        });
        assert_eq!(ids(&filtrar(&coleccion(), &c)), vec![2]);
    }

    #[test]
    fn valores_vacios_se_ignoran() {
        let c = criterios(ReservaQuery {
            hotel: Some(String::new()),
            estado: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(c, CriteriosFiltro::default());
    }

    #[test]
    fn parametros_invalidos() {
        let err = |query: ReservaQuery| CriteriosFiltro::try_from(query).unwrap_err();

        assert_eq!(
            err(ReservaQuery { tipo_habitacion: Some("loft".into()), ..Default::default() }),
            FiltroInvalido::TipoHabitacion
        );
        assert_eq!(
            err(ReservaQuery { estado: Some("borrada".into()), ..Default::default() }),
            FiltroInvalido::Estado
        );
        assert_eq!(
            err(ReservaQuery { fecha_fin: Some("2099-02-30".into()), ..Default::default() }),
            FiltroInvalido::FechaFin
        );
        assert_eq!(
            err(ReservaQuery {
                fecha_inicio: Some("2099-08-18".into()),
                fecha_fin: Some("2099-08-18".into()),
                ..Default::default()
            }),
            FiltroInvalido::RangoFechas
        );
        for n in ["0", "5", "dos", "1.5"] {
            assert_eq!(
                err(ReservaQuery { num_huespedes: Some(n.into()), ..Default::default() }),
                FiltroInvalido::NumHuespedes
            );
        }
        assert_eq!(
            FiltroInvalido::NumHuespedes.to_string(),
            "El número de huéspedes debe ser un entero entre 1 y 4"
        );
    }

    #[test]
    fn filtrar_no_modifica_la_entrada_y_es_repetible() {
        let reservas = coleccion();
        let c = criterios(ReservaQuery {
            tipo_habitacion: Some("doble".into()),
            ..Default::default()
        });
        let primera = filtrar(&reservas, &c);
        let segunda = filtrar(&reservas, &c);
        assert_eq!(primera, segunda);
        assert_eq!(reservas, coleccion());
    }
}
