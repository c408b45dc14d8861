use super::notice::Notice;
use crate::domain::pago::{EstadoPago, Pago};
use crate::error::Result;
use crate::interfaces::csv::export::PagoCsvWriter;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;
use tokio::sync::watch;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Filter criteria for the list view. An unset criterion always passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub estados: Vec<EstadoPago>,
    pub empresa: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring matched against the text columns.
    pub search: String,
}

impl Filters {
    pub fn matches(&self, pago: &Pago) -> bool {
        if !self.estados.is_empty() && !self.estados.contains(&pago.estado_pago) {
            return false;
        }
        if let Some(empresa) = &self.empresa
            && pago.empresa != *empresa
        {
            return false;
        }
        if let Some(from) = self.date_from
            && pago.fecha < from
        {
            return false;
        }
        if let Some(to) = self.date_to
            && pago.fecha > to
        {
            return false;
        }
        self.matches_search(pago)
    }

    fn matches_search(&self, pago: &Pago) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(pago.id.as_str()),
            Some(pago.empresa.as_str()),
            Some(pago.tercero.as_str()),
            pago.area_operacion.as_deref(),
            pago.rubro.as_deref(),
            pago.forma_pago.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply(&self, pagos: &[Pago]) -> Vec<Pago> {
        pagos.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Offset of the first visible row.
    pub first: usize,
    pub rows: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            first: 0,
            rows: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Filtered, paginated view over the record store's latest snapshot.
pub struct ListController {
    source: watch::Receiver<Vec<Pago>>,
    filters: Filters,
    pagination: Pagination,
    filtered: Vec<Pago>,
}

impl ListController {
    pub fn new(source: watch::Receiver<Vec<Pago>>) -> Self {
        let mut controller = Self {
            source,
            filters: Filters::default(),
            pagination: Pagination::default(),
            filtered: Vec::new(),
        };
        controller.refresh();
        controller
    }

    /// Re-derives the filtered list from the latest published snapshot.
    pub fn refresh(&mut self) {
        let snapshot = self.source.borrow_and_update();
        self.filtered = self.filters.apply(&snapshot);
    }

    /// Waits for the store to publish a new snapshot, then re-derives the filtered list.
    ///
    /// Returns `false` once the store has been dropped and no further snapshots can arrive.
    pub async fn changed(&mut self) -> bool {
        if self.source.changed().await.is_err() {
            return false;
        }
        self.refresh();
        true
    }

    fn on_filter_change(&mut self) {
        self.pagination.first = 0;
        self.refresh();
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.on_filter_change();
    }

    pub fn set_estados(&mut self, estados: Vec<EstadoPago>) {
        self.filters.estados = estados;
        self.on_filter_change();
    }

    pub fn set_empresa(&mut self, empresa: Option<String>) {
        self.filters.empresa = empresa;
        self.on_filter_change();
    }

    /// Sets both bounds, or clears both when `range` is `None`.
    pub fn set_date_range(&mut self, range: Option<(NaiveDate, NaiveDate)>) {
        let (from, to) = range.unzip();
        self.filters.date_from = from;
        self.filters.date_to = to;
        self.on_filter_change();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.on_filter_change();
    }

    pub fn clear_filters(&mut self) {
        self.filters = Filters::default();
        self.on_filter_change();
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn on_page_change(&mut self, first: usize, rows: usize) {
        self.pagination = Pagination {
            first,
            rows: rows.max(1),
        };
    }

    pub fn filtered(&self) -> &[Pago] {
        &self.filtered
    }

    /// Rows visible on the current page.
    pub fn page(&self) -> &[Pago] {
        let start = self.pagination.first.min(self.filtered.len());
        let end = start
            .saturating_add(self.pagination.rows)
            .min(self.filtered.len());
        &self.filtered[start..end]
    }

    pub fn total_value(&self) -> Decimal {
        self.filtered.iter().map(|p| p.valor_operacion).sum()
    }

    /// Distinct companies across the whole snapshot, in first-seen order.
    pub fn empresa_options(&self) -> Vec<String> {
        let mut empresas: Vec<String> = Vec::new();
        for pago in self.source.borrow().iter() {
            if !empresas.contains(&pago.empresa) {
                empresas.push(pago.empresa.clone());
            }
        }
        empresas
    }

    /// Writes the filtered subset as CSV.
    ///
    /// Nothing is written when the filtered set is empty; a warning notice is returned instead.
    pub fn export<W: Write>(&self, sink: W) -> Result<Notice> {
        if self.filtered.is_empty() {
            return Ok(Notice::warn("Sin datos", "No hay pagos para exportar"));
        }
        let rows = PagoCsvWriter::new(sink).write_pagos(&self.filtered)?;
        Ok(Notice::success(
            "Exportado",
            format!("{rows} pagos exportados correctamente"),
        ))
    }
}
