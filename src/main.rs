use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use pagos::application::form::{FormController, NavigationContext, PagoForm, SaveOutcome};
use pagos::application::list::{Filters, ListController};
use pagos::application::notice::{Notice, Severity};
use pagos::application::store::RecordStore;
use pagos::config::{Config, DEFAULT_PREFS_PATH, DEFAULT_USER};
use pagos::domain::access::{AccessPolicy, Role};
use pagos::domain::pago::{EstadoPago, IngresoOGasto, Pago};
use pagos::infrastructure::http::{DEFAULT_BASE_URL, RestPagosApi};
use pagos::infrastructure::preferences::FilePreferences;
use pagos::infrastructure::sample::sample_pagos;
use pagos::interfaces::csv::export::export_file_name;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the payment collection
    #[arg(long, env = "PAGOS_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    api_url: String,

    /// File holding the stored role preference
    #[arg(long, env = "PAGOS_PREFS", default_value = DEFAULT_PREFS_PATH, global = true)]
    prefs: PathBuf,

    /// Actor recorded in audit entries
    #[arg(long, env = "PAGOS_USER", default_value = DEFAULT_USER, global = true)]
    user: String,

    /// Fail instead of showing sample data when the collection cannot be read
    #[arg(long, global = true)]
    no_fallback: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List payments matching the filters
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Offset of the first row
        #[arg(long, default_value_t = 0)]
        first: usize,
        /// Rows per page
        #[arg(long, default_value_t = 20)]
        rows: usize,
    },
    /// Export payments matching the filters to CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file (defaults to pagos_export_<today>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show a single payment
    Show { id: String },
    /// Create a payment
    Create(PagoArgs),
    /// Edit an existing payment
    Edit {
        id: String,
        #[command(flatten)]
        fields: PagoArgs,
    },
    /// Delete a payment
    Delete { id: String },
    /// Show the current role, or store a new one
    Role { role: Option<Role> },
}

#[derive(Args)]
struct FilterArgs {
    /// Status to include (repeatable)
    #[arg(long = "estado")]
    estados: Vec<EstadoPago>,
    #[arg(long)]
    empresa: Option<String>,
    /// Earliest date (YYYY-MM-DD), inclusive
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest date (YYYY-MM-DD), inclusive
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Free-text search
    #[arg(long, default_value = "")]
    search: String,
}

impl From<FilterArgs> for Filters {
    fn from(args: FilterArgs) -> Self {
        Self {
            estados: args.estados,
            empresa: args.empresa,
            date_from: args.from,
            date_to: args.to,
            search: args.search,
        }
    }
}

#[derive(Args)]
struct PagoArgs {
    #[arg(long)]
    fecha: Option<NaiveDate>,
    #[arg(long)]
    empresa: Option<String>,
    #[arg(long)]
    area: Option<String>,
    #[arg(long)]
    rubro: Option<String>,
    #[arg(long)]
    tercero: Option<String>,
    #[arg(long)]
    valor: Option<Decimal>,
    #[arg(long)]
    estado: Option<EstadoPago>,
    #[arg(long)]
    ingreso_o_gasto: Option<IngresoOGasto>,
    #[arg(long)]
    forma_pago: Option<String>,
    #[arg(long)]
    presupuesto: Option<bool>,
    /// Invoice attachment
    #[arg(long)]
    factura: Option<PathBuf>,
    /// Supporting document attachment
    #[arg(long)]
    soporte: Option<PathBuf>,
}

impl PagoArgs {
    fn apply(self, form: &mut FormController) -> Result<()> {
        let fields: &mut PagoForm = form.fields_mut().into_diagnostic()?;
        if let Some(fecha) = self.fecha {
            fields.fecha = Some(fecha);
        }
        if let Some(empresa) = self.empresa {
            fields.empresa = empresa;
        }
        if self.area.is_some() {
            fields.area_operacion = self.area;
        }
        if self.rubro.is_some() {
            fields.rubro = self.rubro;
        }
        if let Some(tercero) = self.tercero {
            fields.tercero = tercero;
        }
        if self.valor.is_some() {
            fields.valor_operacion = self.valor;
        }
        if self.estado.is_some() {
            fields.estado_pago = self.estado;
        }
        if self.ingreso_o_gasto.is_some() {
            fields.ingreso_o_gasto = self.ingreso_o_gasto;
        }
        if self.forma_pago.is_some() {
            fields.forma_pago = self.forma_pago;
        }
        if let Some(presupuesto) = self.presupuesto {
            fields.tiene_presupuesto = presupuesto;
        }
        if let Some(path) = self.factura {
            form.attach_factura(path).into_diagnostic()?;
        }
        if let Some(path) = self.soporte {
            form.attach_soporte(path).into_diagnostic()?;
        }
        Ok(())
    }
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            api_url: self.api_url.clone(),
            prefs_path: self.prefs.clone(),
            user: self.user.clone(),
            fallback: !self.no_fallback,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let access = AccessPolicy::new(FilePreferences::new(&config.prefs_path));

    // Role changes never touch the remote collection.
    if let Command::Role { role } = &cli.command {
        let permissions = match role {
            Some(role) => access.set_role(*role).into_diagnostic()?,
            None => access.permissions().into_diagnostic()?,
        };
        println!(
            "{} ({})",
            permissions.role_label(),
            permissions.active().join(", ")
        );
        return Ok(());
    }

    let mut store = RecordStore::new(Box::new(RestPagosApi::new(&config.api_url)), &config.user);
    if config.fallback {
        store = store.with_fallback(sample_pagos());
    }
    store.load_all().await.into_diagnostic()?;

    match cli.command {
        Command::List {
            filters,
            first,
            rows,
        } => {
            let mut list = ListController::new(store.observe());
            list.set_filters(filters.into());
            list.on_page_change(first, rows);
            let permissions = access.permissions().into_diagnostic()?;
            println!(
                "Rol: {} ({})",
                permissions.role_label(),
                permissions.active().join(", ")
            );
            for pago in list.page() {
                print_row(pago);
            }
            println!(
                "{} de {} pagos, total {}",
                list.page().len(),
                list.filtered().len(),
                list.total_value().normalize()
            );
        }
        Command::Export { filters, out } => {
            let mut list = ListController::new(store.observe());
            list.set_filters(filters.into());
            if list.filtered().is_empty() {
                report(&Notice::warn("Sin datos", "No hay pagos para exportar"))?;
                return Ok(());
            }
            let path = out
                .unwrap_or_else(|| PathBuf::from(export_file_name(Local::now().date_naive())));
            let file = File::create(&path).into_diagnostic()?;
            let notice = list.export(BufWriter::new(file)).into_diagnostic()?;
            report(&notice)?;
            println!("{}", path.display());
        }
        Command::Show { id } => {
            let form = FormController::open(&store, NavigationContext::view(&id));
            let pago = form
                .pago()
                .ok_or_else(|| miette!("Pago {id} no encontrado"))?;
            println!("{}", form.title());
            println!("{}", serde_json::to_string_pretty(pago).into_diagnostic()?);
        }
        Command::Create(fields) => {
            access
                .require("create", |p| p.can_create)
                .into_diagnostic()?;
            let mut form = FormController::open(&store, NavigationContext::create());
            fields.apply(&mut form)?;
            save(&mut form, &store).await?;
        }
        Command::Edit { id, fields } => {
            let mut form = FormController::open(&store, NavigationContext::edit(&id));
            if form.pago().is_none() {
                return Err(miette!("Pago {id} no encontrado"));
            }
            fields.apply(&mut form)?;
            save(&mut form, &store).await?;
        }
        Command::Delete { id } => {
            access
                .require("delete", |p| p.can_delete)
                .into_diagnostic()?;
            match store.delete(&id).await {
                Ok(()) => report(&Notice::success(
                    "Eliminado",
                    format!("Pago {id} eliminado correctamente"),
                ))?,
                Err(e) => {
                    tracing::warn!(error = %e, id = %id, "Failed to delete pago");
                    report(&Notice::error("Error", "No se pudo eliminar el pago"))?;
                }
            }
        }
        Command::Role { .. } => {}
    }

    Ok(())
}

async fn save(form: &mut FormController, store: &RecordStore) -> Result<()> {
    match form.save(store).await.into_diagnostic()? {
        SaveOutcome::Saved(notice) => report(&notice),
        SaveOutcome::Failed(notice) => report(&notice),
        SaveOutcome::Invalid(errors) => {
            for error in &errors {
                eprintln!("{error}");
            }
            Err(miette!("{} campos con errores", errors.len()))
        }
    }
}

fn report(notice: &Notice) -> Result<()> {
    match notice.severity {
        Severity::Success => {
            println!("{notice}");
            Ok(())
        }
        Severity::Warn => {
            eprintln!("{notice}");
            Ok(())
        }
        Severity::Error => Err(miette!("{notice}")),
    }
}

fn print_row(pago: &Pago) {
    println!(
        "{:<7} {} {:<10} {:<30} {:>14} {}",
        pago.id,
        pago.fecha,
        pago.empresa,
        pago.tercero,
        pago.valor_operacion.normalize(),
        pago.estado_pago
    );
}
