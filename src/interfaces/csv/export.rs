use crate::domain::pago::Pago;
use crate::error::Result;
use chrono::NaiveDate;
use std::io::Write;

pub const EXPORT_HEADERS: [&str; 9] = [
    "id",
    "fecha",
    "empresa",
    "areaOperacion",
    "rubro",
    "tercero",
    "valorOperacion",
    "estadoPago",
    "formaPago",
];

/// Writes payments as the fixed nine-column export CSV.
///
/// Fields are quoted by `csv` only when they contain the delimiter, a quote or a newline.
/// Missing optional fields are written as empty strings.
pub struct PagoCsvWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PagoCsvWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        Self { writer }
    }

    /// Writes the header row followed by one row per payment, then flushes.
    pub fn write_pagos<'a, I>(&mut self, pagos: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Pago>,
    {
        self.writer.write_record(EXPORT_HEADERS)?;
        let mut rows = 0;
        for pago in pagos {
            self.writer.write_record(row(pago))?;
            rows += 1;
        }
        self.writer.flush()?;
        Ok(rows)
    }
}

fn row(pago: &Pago) -> [String; 9] {
    [
        pago.id.clone(),
        pago.fecha.format("%Y-%m-%d").to_string(),
        pago.empresa.clone(),
        pago.area_operacion.clone().unwrap_or_default(),
        pago.rubro.clone().unwrap_or_default(),
        pago.tercero.clone(),
        pago.valor_operacion.normalize().to_string(),
        pago.estado_pago.to_string(),
        pago.forma_pago.clone().unwrap_or_default(),
    ]
}

/// Download name for an export made on `today`.
pub fn export_file_name(today: NaiveDate) -> String {
    format!("pagos_export_{}.csv", today.format("%Y-%m-%d"))
}
