use super::notice::Notice;
use super::store::RecordStore;
use crate::domain::pago::{EstadoPago, IngresoOGasto, Pago, PagoPatch, Trazabilidad, generate_id};
use crate::error::{PagosError, Result};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

pub const MIN_TERCERO_LEN: usize = 3;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit,
    View,
}

impl FormMode {
    /// Unknown or missing modes open the form in create mode.
    pub fn parse(mode: Option<&str>) -> Self {
        match mode.map(str::trim) {
            Some("edit") => Self::Edit,
            Some("view") => Self::View,
            _ => Self::Create,
        }
    }
}

/// Mode and target id, read once when the form opens.
#[derive(Debug, Clone, Default)]
pub struct NavigationContext {
    pub mode: FormMode,
    pub id: Option<String>,
}

impl NavigationContext {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(id: impl Into<String>) -> Self {
        Self {
            mode: FormMode::Edit,
            id: Some(id.into()),
        }
    }

    pub fn view(id: impl Into<String>) -> Self {
        Self {
            mode: FormMode::View,
            id: Some(id.into()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Field {
    Fecha,
    Empresa,
    Tercero,
    ValorOperacion,
    EstadoPago,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Self::Fecha,
        Self::Empresa,
        Self::Tercero,
        Self::ValorOperacion,
        Self::EstadoPago,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fecha => "fecha",
            Self::Empresa => "empresa",
            Self::Tercero => "tercero",
            Self::ValorOperacion => "valorOperacion",
            Self::EstadoPago => "estadoPago",
        })
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(Field),
    #[error("{field} must have at least {min} characters")]
    MinLength { field: Field, min: usize },
    #[error("{field} must be at least {min}")]
    Min { field: Field, min: Decimal },
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            Self::Required(field) => *field,
            Self::MinLength { field, .. } | Self::Min { field, .. } => *field,
        }
    }
}

/// Editable field set backing the payment form.
#[derive(Debug, Clone, PartialEq)]
pub struct PagoForm {
    pub id: String,
    pub fecha: Option<NaiveDate>,
    pub empresa: String,
    pub area_operacion: Option<String>,
    pub rubro: Option<String>,
    pub tercero: String,
    pub valor_operacion: Option<Decimal>,
    pub estado_pago: Option<EstadoPago>,
    pub ingreso_o_gasto: Option<IngresoOGasto>,
    pub forma_pago: Option<String>,
    pub tiene_presupuesto: bool,
    pub factura_url: Option<String>,
    pub soporte_url: Option<String>,
}

impl Default for PagoForm {
    fn default() -> Self {
        Self {
            id: String::new(),
            fecha: None,
            empresa: String::new(),
            area_operacion: None,
            rubro: None,
            tercero: String::new(),
            valor_operacion: Some(Decimal::ZERO),
            estado_pago: Some(EstadoPago::Pendiente),
            ingreso_o_gasto: Some(IngresoOGasto::Gasto),
            forma_pago: Some("TRANSFERENCIA".to_string()),
            tiene_presupuesto: false,
            factura_url: None,
            soporte_url: None,
        }
    }
}

impl PagoForm {
    fn patch_from(&mut self, pago: &Pago) {
        self.id = pago.id.clone();
        self.fecha = Some(pago.fecha);
        self.empresa = pago.empresa.clone();
        self.area_operacion = pago.area_operacion.clone();
        self.rubro = pago.rubro.clone();
        self.tercero = pago.tercero.clone();
        self.valor_operacion = Some(pago.valor_operacion);
        self.estado_pago = Some(pago.estado_pago);
        self.ingreso_o_gasto = pago.ingreso_o_gasto;
        self.forma_pago = pago.forma_pago.clone();
        self.tiene_presupuesto = pago.tiene_presupuesto.unwrap_or(false);
        self.factura_url = pago.factura_url.clone();
        self.soporte_url = pago.soporte_url.clone();
    }

    /// Checks every rule and returns all failures, in field order.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.fecha.is_none() {
            errors.push(FieldError::Required(Field::Fecha));
        }
        if self.empresa.trim().is_empty() {
            errors.push(FieldError::Required(Field::Empresa));
        }
        let tercero = self.tercero.trim();
        if tercero.is_empty() {
            errors.push(FieldError::Required(Field::Tercero));
        } else if tercero.chars().count() < MIN_TERCERO_LEN {
            errors.push(FieldError::MinLength {
                field: Field::Tercero,
                min: MIN_TERCERO_LEN,
            });
        }
        match self.valor_operacion {
            None => errors.push(FieldError::Required(Field::ValorOperacion)),
            Some(valor) if valor < Decimal::ONE => errors.push(FieldError::Min {
                field: Field::ValorOperacion,
                min: Decimal::ONE,
            }),
            Some(_) => {}
        }
        if self.estado_pago.is_none() {
            errors.push(FieldError::Required(Field::EstadoPago));
        }
        errors
    }

    /// Builds the record; `None` if a required field is missing.
    fn to_pago(&self, trazabilidad: Vec<Trazabilidad>) -> Option<Pago> {
        Some(Pago {
            id: self.id.clone(),
            fecha: self.fecha?,
            empresa: self.empresa.clone(),
            area_operacion: non_empty(&self.area_operacion),
            rubro: non_empty(&self.rubro),
            tercero: self.tercero.clone(),
            valor_operacion: self.valor_operacion?,
            estado_pago: self.estado_pago?,
            ingreso_o_gasto: self.ingreso_o_gasto,
            forma_pago: non_empty(&self.forma_pago),
            tiene_presupuesto: Some(self.tiene_presupuesto),
            factura_url: self.factura_url.clone(),
            soporte_url: self.soporte_url.clone(),
            trazabilidad,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Result of a save attempt.
#[derive(Debug, PartialEq)]
pub enum SaveOutcome {
    /// Persisted; the caller goes back to the list.
    Saved(Notice),
    /// The remote call failed; the caller stays on the form.
    Failed(Notice),
    /// Local validation failed and no request was sent.
    Invalid(Vec<FieldError>),
}

pub struct FormController {
    mode: FormMode,
    pago: Option<Pago>,
    form: PagoForm,
    touched: BTreeSet<Field>,
    disabled: bool,
}

impl FormController {
    /// Opens the form for `ctx`, loading the target record from the store's latest snapshot.
    pub fn open(store: &RecordStore, ctx: NavigationContext) -> Self {
        let mut controller = Self {
            mode: ctx.mode,
            pago: None,
            form: PagoForm::default(),
            touched: BTreeSet::new(),
            disabled: false,
        };

        match ctx.id {
            Some(id) => controller.load(store, &id),
            None => controller.initialize_new(),
        }
        controller
    }

    fn load(&mut self, store: &RecordStore, id: &str) {
        self.pago = store.snapshot().into_iter().find(|p| p.id == id);
        match &self.pago {
            Some(pago) => {
                self.form.patch_from(pago);
                if self.mode == FormMode::View {
                    self.disabled = true;
                }
            }
            None => warn!(id, "Pago not found in current snapshot"),
        }
    }

    fn initialize_new(&mut self) {
        self.form.id = generate_id();
        self.form.fecha = Some(Local::now().date_naive());
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// The record loaded for edit/view, if it was found.
    pub fn pago(&self) -> Option<&Pago> {
        self.pago.as_ref()
    }

    pub fn form(&self) -> &PagoForm {
        &self.form
    }

    pub fn fields_mut(&mut self) -> Result<&mut PagoForm> {
        if self.disabled {
            return Err(PagosError::ReadOnly);
        }
        Ok(&mut self.form)
    }

    pub fn is_read_only(&self) -> bool {
        self.disabled
    }

    pub fn touched(&self) -> &BTreeSet<Field> {
        &self.touched
    }

    /// Errors to display: only those on fields the user has touched.
    pub fn visible_errors(&self) -> Vec<FieldError> {
        self.form
            .validate()
            .into_iter()
            .filter(|e| self.touched.contains(&e.field()))
            .collect()
    }

    pub fn touch(&mut self, field: Field) {
        self.touched.insert(field);
    }

    pub fn attach_factura<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let name = file_name(path.as_ref())?;
        self.fields_mut()?.factura_url = Some(name);
        Ok(())
    }

    pub fn attach_soporte<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let name = file_name(path.as_ref())?;
        self.fields_mut()?.soporte_url = Some(name);
        Ok(())
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Crear Nuevo Pago",
            FormMode::Edit => "Editar Pago",
            FormMode::View => "Ver Detalles del Pago",
        }
    }

    /// Validates, then creates or updates through the store.
    ///
    /// The store appends the audit entry, so each successful save adds exactly one
    /// "Creado" or "Editado" entry to the record's trail.
    pub async fn save(&mut self, store: &RecordStore) -> Result<SaveOutcome> {
        if self.disabled {
            return Err(PagosError::ReadOnly);
        }

        let errors = self.form.validate();
        if !errors.is_empty() {
            self.touched.extend(Field::ALL);
            return Ok(SaveOutcome::Invalid(errors));
        }

        let trazabilidad = self
            .pago
            .as_ref()
            .map(|p| p.trazabilidad.clone())
            .unwrap_or_default();
        let Some(pago) = self.form.to_pago(trazabilidad) else {
            return Ok(SaveOutcome::Invalid(self.form.validate()));
        };

        let outcome = match self.mode {
            FormMode::Create => match store.create(pago).await {
                Ok(_) => SaveOutcome::Saved(Notice::success(
                    "Guardado",
                    "Pago creado correctamente",
                )),
                Err(e) => {
                    warn!(error = %e, "Failed to create pago");
                    SaveOutcome::Failed(Notice::error("Error", "No se pudo crear el pago"))
                }
            },
            FormMode::Edit => {
                let id = pago.id.clone();
                match store.update(&id, PagoPatch::from(pago)).await {
                    Ok(_) => SaveOutcome::Saved(Notice::success(
                        "Guardado",
                        "Pago actualizado correctamente",
                    )),
                    Err(e) => {
                        warn!(error = %e, id = %id, "Failed to update pago");
                        SaveOutcome::Failed(Notice::error(
                            "Error",
                            "No se pudo actualizar el pago",
                        ))
                    }
                }
            }
            FormMode::View => return Err(PagosError::ReadOnly),
        };
        Ok(outcome)
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| PagosError::InvalidValue(format!("not a file path: {}", path.display())))
}
