//! # Validación de reservas
//!
//! Reglas aplicadas a los datos de una reserva antes de tocar el almacén.
//! Todas las reglas se evalúan de forma independiente y se informan juntas,
//! en un orden fijo, como una lista de [`Violacion`].
//!
//! La frontera HTTP une los mensajes con `". "`; el resto del código trabaja
//! con la lista tipada.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde_json::Value;
use thiserror::Error;

use crate::db::{
    EstadoReserva, NuevaReserva, Reserva, ReservaInput, ReservaPatch, TipoHabitacion,
};

/// Número máximo de huéspedes que admite cualquier habitación
pub const MAX_HUESPEDES: i64 = 4;

/// Contexto en el que se valida una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operacion {
    /// Todos los campos obligatorios deben estar presentes
    Creacion,
    /// Actualización parcial: los campos ausentes no se validan
    Actualizacion,
}

/// Regla incumplida por una reserva
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violacion {
    #[error("El campo hotel es obligatorio")]
    HotelObligatorio,

    #[error("La fecha de inicio es obligatoria")]
    FechaInicioObligatoria,

    #[error("La fecha de fin es obligatoria")]
    FechaFinObligatoria,

    #[error("El tipo de habitación es obligatorio")]
    TipoHabitacionObligatorio,

    #[error("El número de huéspedes es obligatorio")]
    NumHuespedesObligatorio,

    #[error("La fecha de inicio debe tener el formato YYYY-MM-DD")]
    FormatoFechaInicio,

    #[error("La fecha de fin debe tener el formato YYYY-MM-DD")]
    FormatoFechaFin,

    #[error("La fecha de inicio debe ser anterior a la fecha de fin")]
    FechasIncoherentes,

    #[error("La fecha de inicio no puede ser en el pasado")]
    FechaEnPasado,

    #[error("El tipo de habitación debe ser uno de: {}", TipoHabitacion::listado())]
    TipoHabitacionInvalido,

    #[error("El estado debe ser uno de: {}", EstadoReserva::listado())]
    EstadoInvalido,

    #[error("El número de huéspedes debe ser un número entero mayor a 0")]
    NumHuespedesNoEntero,

    #[error("El número máximo de huéspedes es {}", MAX_HUESPEDES)]
    NumHuespedesExcedeMaximo,

    #[error(
        "El número de huéspedes para habitación {tipo} debe estar entre {} y {}",
        .tipo.capacidad().min,
        .tipo.capacidad().max
    )]
    CapacidadExcedida { tipo: TipoHabitacion },
}

/// Conjunto no vacío de reglas incumplidas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<Violacion>);

impl ValidationErrors {
    pub fn violaciones(&self) -> &[Violacion] {
        &self.0
    }

    pub fn contiene(&self, violacion: &Violacion) -> bool {
        self.0.contains(violacion)
    }

    fn desde(violaciones: Vec<Violacion>) -> Result<(), Self> {
        if violaciones.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(violaciones))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mensajes: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&mensajes.join(". "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Fecha de hoy según el reloj local
pub fn hoy() -> NaiveDate {
    Local::now().date_naive()
}

/// Valida una fecha `YYYY-MM-DD` que además debe existir en el calendario
///
/// Rechaza tanto formatos alternativos (`2025-1-5`, `2025/01/05`) como fechas
/// imposibles (`2025-02-30`).
pub fn validar_fecha(texto: &str) -> Option<NaiveDate> {
    let bytes = texto.as_bytes();
    let forma_correcta = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !forma_correcta {
        return None;
    }

    let fecha = NaiveDate::parse_from_str(texto, "%Y-%m-%d").ok()?;
    (fecha.format("%Y-%m-%d").to_string() == texto).then_some(fecha)
}

/// Estricto: el inicio debe ser anterior al fin
pub fn fechas_coherentes(inicio: NaiveDate, fin: NaiveDate) -> bool {
    inicio < fin
}

pub fn fecha_no_en_pasado(fecha: NaiveDate, hoy: NaiveDate) -> bool {
    fecha >= hoy
}

/// Valida los datos de una reserva y devuelve todas las reglas incumplidas
///
/// Un texto vacío cuenta como campo ausente. En [`Operacion::Actualizacion`]
/// los campos ausentes se ignoran, pero los presentes pasan por las mismas
/// reglas que en la creación.
pub fn validar(datos: &ReservaInput, operacion: Operacion, hoy: NaiveDate) -> Vec<Violacion> {
    let mut errores = Vec::new();

    let hotel = datos.hotel.as_deref().filter(|h| !h.trim().is_empty());
    let fecha_inicio = texto_presente(&datos.fecha_inicio);
    let fecha_fin = texto_presente(&datos.fecha_fin);
    let tipo = texto_presente(&datos.tipo_habitacion);
    let estado = texto_presente(&datos.estado);
    let huespedes = datos.num_huespedes.as_ref().filter(|v| valor_presente(v));

    if operacion == Operacion::Creacion {
        if hotel.is_none() {
            errores.push(Violacion::HotelObligatorio);
        }
        if fecha_inicio.is_none() {
            errores.push(Violacion::FechaInicioObligatoria);
        }
        if fecha_fin.is_none() {
            errores.push(Violacion::FechaFinObligatoria);
        }
        if tipo.is_none() {
            errores.push(Violacion::TipoHabitacionObligatorio);
        }
        if huespedes.is_none() {
            errores.push(Violacion::NumHuespedesObligatorio);
        }
    }

    let inicio = fecha_inicio.map(validar_fecha);
    let fin = fecha_fin.map(validar_fecha);
    if let Some(None) = inicio {
        errores.push(Violacion::FormatoFechaInicio);
    }
    if let Some(None) = fin {
        errores.push(Violacion::FormatoFechaFin);
    }

    if let (Some(Some(inicio)), Some(Some(fin))) = (inicio, fin) {
        if !fechas_coherentes(inicio, fin) {
            errores.push(Violacion::FechasIncoherentes);
        }
    }
    if let Some(Some(inicio)) = inicio {
        if !fecha_no_en_pasado(inicio, hoy) {
            errores.push(Violacion::FechaEnPasado);
        }
    }

    let tipo_valido = tipo.and_then(TipoHabitacion::parse);
    if tipo.is_some() && tipo_valido.is_none() {
        errores.push(Violacion::TipoHabitacionInvalido);
    }

    if estado.is_some_and(|e| EstadoReserva::parse(e).is_none()) {
        errores.push(Violacion::EstadoInvalido);
    }

    if let Some(valor) = huespedes {
        match entero(valor) {
            Some(n) if n < 1 => errores.push(Violacion::NumHuespedesNoEntero),
            Some(n) if n > MAX_HUESPEDES => errores.push(Violacion::NumHuespedesExcedeMaximo),
            Some(_) => {}
            None => errores.push(Violacion::NumHuespedesNoEntero),
        }
    }

    if let (Some(tipo), Some(valor)) = (tipo_valido, huespedes) {
        let cabe = valor_numerico(valor).is_some_and(|n| tipo.capacidad().admite(n));
        if !cabe {
            errores.push(Violacion::CapacidadExcedida { tipo });
        }
    }

    errores
}

/// Comprueba una reserva ya combinada con sus cambios
///
/// Una actualización parcial puede ser válida por sí sola y dejar la reserva
/// incoherente (por ejemplo, cambiar solo `fecha_fin` a un día anterior al inicio).
pub fn validar_coherencia(reserva: &Reserva) -> Result<(), ValidationErrors> {
    let mut errores = Vec::new();
    if !fechas_coherentes(reserva.fecha_inicio, reserva.fecha_fin) {
        errores.push(Violacion::FechasIncoherentes);
    }
    let tipo = reserva.tipo_habitacion;
    if !tipo.capacidad().admite(f64::from(reserva.num_huespedes)) {
        errores.push(Violacion::CapacidadExcedida { tipo });
    }
    ValidationErrors::desde(errores)
}

impl NuevaReserva {
    /// Valida el cuerpo de una creación y lo convierte a tipos fuertes
    pub fn desde_input(datos: ReservaInput, hoy: NaiveDate) -> Result<Self, ValidationErrors> {
        ValidationErrors::desde(validar(&datos, Operacion::Creacion, hoy))?;

        let falta = |v: Violacion| ValidationErrors(vec![v]);
        Ok(NuevaReserva {
            hotel: datos.hotel.ok_or_else(|| falta(Violacion::HotelObligatorio))?,
            fecha_inicio: datos
                .fecha_inicio
                .as_deref()
                .and_then(validar_fecha)
                .ok_or_else(|| falta(Violacion::FormatoFechaInicio))?,
            fecha_fin: datos
                .fecha_fin
                .as_deref()
                .and_then(validar_fecha)
                .ok_or_else(|| falta(Violacion::FormatoFechaFin))?,
            tipo_habitacion: datos
                .tipo_habitacion
                .as_deref()
                .and_then(TipoHabitacion::parse)
                .ok_or_else(|| falta(Violacion::TipoHabitacionInvalido))?,
            num_huespedes: datos
                .num_huespedes
                .as_ref()
                .and_then(huespedes_validos)
                .ok_or_else(|| falta(Violacion::NumHuespedesNoEntero))?,
            estado: texto_presente(&datos.estado).and_then(EstadoReserva::parse),
        })
    }
}

impl ReservaPatch {
    /// Valida el cuerpo de una actualización parcial
    ///
    /// Los campos vacíos (`""`, `null`, `0`) se tratan como ausentes y no
    /// modifican la reserva.
    pub fn desde_input(datos: ReservaInput, hoy: NaiveDate) -> Result<Self, ValidationErrors> {
        ValidationErrors::desde(validar(&datos, Operacion::Actualizacion, hoy))?;

        Ok(ReservaPatch {
            hotel: datos.hotel.filter(|h| !h.trim().is_empty()),
            fecha_inicio: texto_presente(&datos.fecha_inicio).and_then(validar_fecha),
            fecha_fin: texto_presente(&datos.fecha_fin).and_then(validar_fecha),
            tipo_habitacion: texto_presente(&datos.tipo_habitacion)
                .and_then(TipoHabitacion::parse),
            num_huespedes: datos
                .num_huespedes
                .as_ref()
                .filter(|v| valor_presente(v))
                .and_then(huespedes_validos),
            estado: texto_presente(&datos.estado).and_then(EstadoReserva::parse),
        })
    }
}

fn texto_presente(campo: &Option<String>) -> Option<&str> {
    campo.as_deref().filter(|s| !s.is_empty())
}

/// `null`, `false`, `0` y `""` cuentan como valor no informado
fn valor_presente(valor: &Value) -> bool {
    match valor {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Solo números JSON enteros (`2` o `2.0`); el texto `"2"` no cuenta
///
/// Los enteros fuera de rango se saturan a `i64::MIN`/`i64::MAX`, así que
/// `1e20` se informa como exceso y no como decimal.
fn entero(valor: &Value) -> Option<i64> {
    let Value::Number(n) = valor else {
        return None;
    };
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Valor numérico usado al comparar con la capacidad de la habitación
fn valor_numerico(valor: &Value) -> Option<f64> {
    match valor {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn huespedes_validos(valor: &Value) -> Option<u8> {
    entero(valor)
        .filter(|n| (1..=MAX_HUESPEDES).contains(n))
        .and_then(|n| u8::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn fecha(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn hoy_fijo() -> NaiveDate {
        fecha("2030-06-01")
    }

    fn input(valor: Value) -> ReservaInput {
        serde_json::from_value(valor).unwrap()
    }

    fn completa() -> Value {
        json!({
            "hotel": "Hotel Paraíso",
            "tipo_habitacion": "doble",
            "num_huespedes": 2,
            "fecha_inicio": "2099-08-15",
            "fecha_fin": "2099-08-20"
        })
    }

    fn mensajes(violaciones: &[Violacion]) -> Vec<String> {
        violaciones.iter().map(ToString::to_string).collect()
    }

    #[test_case("2025-01-31", true ; "fecha normal")]
    #[test_case("2024-02-29", true ; "bisiesto")]
    #[test_case("2025-02-29", false ; "no bisiesto")]
    #[test_case("2025-02-30", false ; "dia inexistente")]
    #[test_case("2025-13-01", false ; "mes inexistente")]
    #[test_case("2025-1-05", false ; "mes sin cero")]
    #[test_case("2025/01/05", false ; "separador incorrecto")]
    #[test_case("2025-01-05T00:00", false ; "con hora")]
    #[test_case("20250105", false ; "sin separadores")]
    #[test_case(" 2025-01-05", false ; "espacio inicial")]
    fn formato_de_fecha(texto: &str, valida: bool) {
        assert_eq!(validar_fecha(texto).is_some(), valida);
        if valida {
            assert_eq!(validar_fecha(texto).unwrap().format("%Y-%m-%d").to_string(), texto);
        }
    }

    #[test]
    fn reserva_completa_es_valida() {
        assert!(validar(&input(completa()), Operacion::Creacion, hoy_fijo()).is_empty());
    }

    #[test]
    fn creacion_exige_campos_obligatorios_en_orden() {
        let errores = validar(&input(json!({})), Operacion::Creacion, hoy_fijo());
        assert_eq!(
            errores,
            vec![
                Violacion::HotelObligatorio,
                Violacion::FechaInicioObligatoria,
                Violacion::FechaFinObligatoria,
                Violacion::TipoHabitacionObligatorio,
                Violacion::NumHuespedesObligatorio,
            ]
        );
    }

    #[test]
    fn hotel_en_blanco_es_obligatorio() {
        let mut datos = completa();
        datos["hotel"] = json!("   ");
        let errores = validar(&input(datos), Operacion::Creacion, hoy_fijo());
        assert_eq!(errores, vec![Violacion::HotelObligatorio]);
    }

    #[test]
    fn cero_huespedes_cuenta_como_ausente() {
        let mut datos = completa();
        datos["num_huespedes"] = json!(0);
        let errores = validar(&input(datos), Operacion::Creacion, hoy_fijo());
        assert_eq!(errores, vec![Violacion::NumHuespedesObligatorio]);
    }

    #[test]
    fn actualizacion_admite_campos_ausentes() {
        let errores = validar(
            &input(json!({ "estado": "confirmada" })),
            Operacion::Actualizacion,
            hoy_fijo(),
        );
        assert!(errores.is_empty());
    }

    #[test]
    fn actualizacion_valida_los_campos_presentes() {
        let errores = validar(
            &input(json!({ "estado": "archivada", "fecha_fin": "2099-02-30" })),
            Operacion::Actualizacion,
            hoy_fijo(),
        );
        assert_eq!(errores, vec![Violacion::FormatoFechaFin, Violacion::EstadoInvalido]);
    }

    #[test]
    fn fechas_invertidas_o_iguales() {
        let mut datos = completa();
        datos["fecha_fin"] = json!("2099-08-15");
        let errores = validar(&input(datos), Operacion::Creacion, hoy_fijo());
        assert_eq!(errores, vec![Violacion::FechasIncoherentes]);
    }

    #[test]
    fn orden_solo_si_ambas_fechas_son_validas() {
        let mut datos = completa();
        datos["fecha_fin"] = json!("2099-08-32");
        let errores = validar(&input(datos), Operacion::Creacion, hoy_fijo());
        assert_eq!(errores, vec![Violacion::FormatoFechaFin]);
    }

    #[test]
    fn fecha_de_inicio_en_el_pasado() {
        let mut datos = completa();
        datos["fecha_inicio"] = json!("2020-01-01");
        datos["fecha_fin"] = json!("2020-01-05");
        let errores = validar(&input(datos), Operacion::Creacion, hoy_fijo());
        assert_eq!(errores, vec![Violacion::FechaEnPasado]);
    }

    #[test]
    fn hoy_no_cuenta_como_pasado() {
        let mut datos = completa();
        datos["fecha_inicio"] = json!("2030-06-01");
        datos["fecha_fin"] = json!("2030-06-02");
        assert!(validar(&input(datos), Operacion::Creacion, hoy_fijo()).is_empty());
    }

    #[test]
    fn pasado_tambien_en_actualizacion() {
        let errores = validar(
            &input(json!({ "fecha_inicio": "2020-01-01" })),
            Operacion::Actualizacion,
            hoy_fijo(),
        );
        assert_eq!(errores, vec![Violacion::FechaEnPasado]);
    }

    #[test_case("individual", 1, true)]
    #[test_case("individual", 2, false)]
    #[test_case("doble", 1, true)]
    #[test_case("doble", 2, true)]
    #[test_case("doble", 3, false)]
    #[test_case("triple", 3, true)]
    #[test_case("triple", 4, false)]
    #[test_case("suite", 4, true)]
    fn capacidad_por_tipo(tipo: &str, huespedes: i64, valida: bool) {
        let mut datos = completa();
        datos["tipo_habitacion"] = json!(tipo);
        datos["num_huespedes"] = json!(huespedes);
        let errores = validar(&input(datos), Operacion::Creacion, hoy_fijo());
        assert_eq!(errores.is_empty(), valida, "{errores:?}");
    }

    #[test]
    fn mensaje_de_capacidad() {
        let mut datos = completa();
        datos["tipo_habitacion"] = json!("individual");
        let errores = validar(&input(datos), Operacion::Creacion, hoy_fijo());
        assert_eq!(
            mensajes(&errores),
            vec!["El número de huéspedes para habitación individual debe estar entre 1 y 1"]
        );
    }

    #[test]
    fn mas_de_cuatro_huespedes() {
        let mut datos = completa();
        datos["tipo_habitacion"] = json!("suite");
        datos["num_huespedes"] = json!(5);
        let errores = validar(&input(datos), Operacion::Creacion, hoy_fijo());
        assert_eq!(
            errores,
            vec![
                Violacion::NumHuespedesExcedeMaximo,
                Violacion::CapacidadExcedida { tipo: TipoHabitacion::Suite },
            ]
        );
    }

    #[test_case(json!(1e20) ; "exponente")]
    #[test_case(json!(u64::MAX) ; "mayor que i64")]
    #[test_case(json!(5.0) ; "entero con decimales")]
    fn huespedes_enormes_exceden_el_maximo(valor: Value) {
        let mut datos = completa();
        datos["tipo_habitacion"] = json!("suite");
        datos["num_huespedes"] = valor;
        let errores = NuevaReserva::desde_input(input(datos), hoy_fijo()).unwrap_err();
        assert!(errores.contiene(&Violacion::NumHuespedesExcedeMaximo), "{errores}");
        assert!(!errores.contiene(&Violacion::NumHuespedesNoEntero), "{errores}");
    }

    #[test_case(json!(-1) ; "negativo")]
    #[test_case(json!(1.5) ; "decimal")]
    #[test_case(json!("2") ; "texto")]
    #[test_case(json!(true) ; "booleano")]
    fn huespedes_no_enteros(valor: Value) {
        let mut datos = completa();
        datos["tipo_habitacion"] = json!("suite");
        datos["num_huespedes"] = valor;
        let errores = validar(&input(datos), Operacion::Creacion, hoy_fijo());
        assert_eq!(errores.first(), Some(&Violacion::NumHuespedesNoEntero));
    }

    #[test]
    fn tipo_invalido_no_comprueba_capacidad() {
        let mut datos = completa();
        datos["tipo_habitacion"] = json!("presidencial");
        datos["num_huespedes"] = json!(3);
        let errores = validar(&input(datos), Operacion::Creacion, hoy_fijo());
        assert_eq!(
            mensajes(&errores),
            vec!["El tipo de habitación debe ser uno de: individual, doble, triple, suite"]
        );
    }

    #[test]
    fn todas_las_reglas_se_informan_juntas() {
        let datos = json!({
            "hotel": "Hotel Paraíso",
            "tipo_habitacion": "loft",
            "num_huespedes": 9,
            "fecha_inicio": "2020-01-10",
            "fecha_fin": "2020-01-01",
            "estado": "perdida"
        });
        let errores = validar(&input(datos), Operacion::Creacion, hoy_fijo());
        assert_eq!(
            errores,
            vec![
                Violacion::FechasIncoherentes,
                Violacion::FechaEnPasado,
                Violacion::TipoHabitacionInvalido,
                Violacion::EstadoInvalido,
                Violacion::NumHuespedesExcedeMaximo,
            ]
        );
    }

    #[test]
    fn mensajes_unidos_con_punto() {
        let errores = NuevaReserva::desde_input(input(json!({ "hotel": "Hotel Paraíso" })), hoy_fijo())
            .unwrap_err();
        assert_eq!(
            errores.to_string(),
            "La fecha de inicio es obligatoria. La fecha de fin es obligatoria. \
             El tipo de habitación es obligatorio. El número de huéspedes es obligatorio"
        );
    }

    #[test]
    fn nueva_reserva_tipada() {
        let nueva = NuevaReserva::desde_input(input(completa()), hoy_fijo()).unwrap();
        assert_eq!(nueva.tipo_habitacion, TipoHabitacion::Doble);
        assert_eq!(nueva.num_huespedes, 2);
        assert_eq!(nueva.fecha_inicio, fecha("2099-08-15"));
        assert_eq!(nueva.estado, None);
    }

    #[test]
    fn patch_ignora_campos_vacios() {
        let cambios = ReservaPatch::desde_input(
            input(json!({ "hotel": "", "estado": "confirmada", "num_huespedes": null })),
            hoy_fijo(),
        )
        .unwrap();
        assert_eq!(
            cambios,
            ReservaPatch {
                estado: Some(EstadoReserva::Confirmada),
                ..Default::default()
            }
        );
    }

    #[test]
    fn coherencia_tras_combinar_cambios() {
        let reserva = Reserva {
            id: crate::db::ReservaId::PRIMERO,
            hotel: "Hotel Paraíso".to_string(),
            fecha_inicio: fecha("2099-08-15"),
            fecha_fin: fecha("2099-08-20"),
            tipo_habitacion: TipoHabitacion::Doble,
            estado: EstadoReserva::Pendiente,
            num_huespedes: 2,
        };
        assert!(validar_coherencia(&reserva).is_ok());

        let cambios = ReservaPatch {
            fecha_fin: Some(fecha("2099-08-10")),
            tipo_habitacion: Some(TipoHabitacion::Individual),
            ..Default::default()
        };
        let errores = validar_coherencia(&reserva.con_cambios(&cambios)).unwrap_err();
        assert_eq!(
            errores.violaciones(),
            &[
                Violacion::FechasIncoherentes,
                Violacion::CapacidadExcedida { tipo: TipoHabitacion::Individual },
            ]
        );
    }
}
