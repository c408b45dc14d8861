use crate::error::PagosError;
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NOTA_CREADO: &str = "Creado";
pub const NOTA_EDITADO: &str = "Editado";

/// Lifecycle status of a payment.
///
/// No transition rules are enforced; any status may be set through an edit.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum EstadoPago {
    #[default]
    Pendiente,
    Autorizado,
    Pagado,
}

impl EstadoPago {
    pub const ALL: [EstadoPago; 3] = [Self::Pendiente, Self::Autorizado, Self::Pagado];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "PENDIENTE",
            Self::Autorizado => "AUTORIZADO",
            Self::Pagado => "PAGADO",
        }
    }
}

impl fmt::Display for EstadoPago {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstadoPago {
    type Err = PagosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|estado| estado.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PagosError::InvalidValue(format!("unknown estadoPago '{s}'")))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum IngresoOGasto {
    Ingreso,
    #[default]
    Gasto,
}

impl FromStr for IngresoOGasto {
    type Err = PagosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INGRESO" => Ok(Self::Ingreso),
            "GASTO" => Ok(Self::Gasto),
            _ => Err(PagosError::InvalidValue(format!(
                "unknown ingresoOGasto '{s}'"
            ))),
        }
    }
}

/// A single audit-trail entry.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Trazabilidad {
    pub usuario: String,
    pub fecha: DateTime<Utc>,
    pub nota: String,
}

impl Trazabilidad {
    pub fn now(usuario: &str, nota: &str) -> Self {
        Self {
            usuario: usuario.to_string(),
            fecha: Utc::now(),
            nota: nota.to_string(),
        }
    }
}

/// A payment record as exchanged with the remote collection.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Pago {
    pub id: String,
    #[serde(deserialize_with = "deserialize_fecha")]
    pub fecha: NaiveDate,
    pub empresa: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_operacion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubro: Option<String>,
    pub tercero: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor_operacion: Decimal,
    pub estado_pago: EstadoPago,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingreso_o_gasto: Option<IngresoOGasto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forma_pago: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiene_presupuesto: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factura_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soporte_url: Option<String>,
    #[serde(default)]
    pub trazabilidad: Vec<Trazabilidad>,
}

impl Pago {
    /// Shallow merge: every field present in `patch` overwrites the record's value.
    ///
    /// The id never changes, even if the patch carries a different one.
    pub fn merge(&mut self, patch: PagoPatch) {
        if let Some(fecha) = patch.fecha {
            self.fecha = fecha;
        }
        if let Some(empresa) = patch.empresa {
            self.empresa = empresa;
        }
        if let Some(area_operacion) = patch.area_operacion {
            self.area_operacion = area_operacion;
        }
        if let Some(rubro) = patch.rubro {
            self.rubro = rubro;
        }
        if let Some(tercero) = patch.tercero {
            self.tercero = tercero;
        }
        if let Some(valor) = patch.valor_operacion {
            self.valor_operacion = valor;
        }
        if let Some(estado) = patch.estado_pago {
            self.estado_pago = estado;
        }
        if patch.ingreso_o_gasto.is_some() {
            self.ingreso_o_gasto = patch.ingreso_o_gasto;
        }
        if let Some(forma_pago) = patch.forma_pago {
            self.forma_pago = forma_pago;
        }
        if patch.tiene_presupuesto.is_some() {
            self.tiene_presupuesto = patch.tiene_presupuesto;
        }
        if let Some(factura_url) = patch.factura_url {
            self.factura_url = factura_url;
        }
        if let Some(soporte_url) = patch.soporte_url {
            self.soporte_url = soporte_url;
        }
        if let Some(trazabilidad) = patch.trazabilidad {
            self.trazabilidad = trazabilidad;
        }
    }
}

/// Partial update payload. Absent fields are left out of the JSON body.
///
/// Optional text fields are doubly wrapped: `Some(None)` is sent as an explicit `null`
/// and clears the stored value, while `None` leaves it untouched.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PagoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_fecha_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fecha: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empresa: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub area_operacion: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub rubro: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tercero: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub valor_operacion: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado_pago: Option<EstadoPago>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingreso_o_gasto: Option<IngresoOGasto>,
    #[serde(
        default,
        deserialize_with = "deserialize_clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub forma_pago: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiene_presupuesto: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub factura_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub soporte_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trazabilidad: Option<Vec<Trazabilidad>>,
}

impl From<Pago> for PagoPatch {
    fn from(pago: Pago) -> Self {
        Self {
            id: Some(pago.id),
            fecha: Some(pago.fecha),
            empresa: Some(pago.empresa),
            area_operacion: Some(pago.area_operacion),
            rubro: Some(pago.rubro),
            tercero: Some(pago.tercero),
            valor_operacion: Some(pago.valor_operacion),
            estado_pago: Some(pago.estado_pago),
            ingreso_o_gasto: pago.ingreso_o_gasto,
            forma_pago: Some(pago.forma_pago),
            tiene_presupuesto: pago.tiene_presupuesto,
            factura_url: Some(pago.factura_url),
            soporte_url: Some(pago.soporte_url),
            trazabilidad: Some(pago.trazabilidad),
        }
    }
}

/// Generates a client-side id in the `P-NNNN` format (1000..=9999).
pub fn generate_id() -> String {
    let n: u16 = rand::thread_rng().gen_range(1000..=9999);
    format!("P-{n:04}")
}

/// Parses either a plain `YYYY-MM-DD` date or a full ISO datetime, keeping the date part.
pub fn parse_fecha(value: &str) -> Result<NaiveDate, PagosError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| PagosError::InvalidValue(format!("invalid fecha '{value}'")))
}

fn deserialize_fecha<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_fecha(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_fecha_option<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_fecha(&raw).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from a missing key (`None` via `default`).
fn deserialize_clearable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
