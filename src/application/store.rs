use crate::domain::pago::{NOTA_CREADO, NOTA_EDITADO, Pago, PagoPatch, Trazabilidad};
use crate::domain::ports::PagosApiBox;
use crate::error::Result;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

/// The single writable source of truth for the cached payment collection.
///
/// Every mutation goes through the remote API first and only touches the cache once the
/// call succeeded, so subscribers never observe a record the server rejected.
/// Responses are applied in completion order; a slow response can overwrite newer state.
pub struct RecordStore {
    api: PagosApiBox,
    pagos: watch::Sender<Vec<Pago>>,
    loading: watch::Sender<bool>,
    fallback: Option<Vec<Pago>>,
    usuario: String,
}

impl RecordStore {
    /// Creates a store with an empty cache and no read fallback.
    ///
    /// # Arguments
    ///
    /// * `api` - The remote payment collection.
    /// * `usuario` - Actor recorded in audit entries.
    pub fn new(api: PagosApiBox, usuario: impl Into<String>) -> Self {
        Self {
            api,
            pagos: watch::Sender::new(Vec::new()),
            loading: watch::Sender::new(false),
            fallback: None,
            usuario: usuario.into(),
        }
    }

    /// Publishes `pagos` instead of failing when `load_all` cannot reach the remote side.
    pub fn with_fallback(mut self, pagos: Vec<Pago>) -> Self {
        self.fallback = Some(pagos);
        self
    }

    /// Live view of the collection. New receivers see the latest value immediately.
    pub fn observe(&self) -> watch::Receiver<Vec<Pago>> {
        self.pagos.subscribe()
    }

    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn snapshot(&self) -> Vec<Pago> {
        self.pagos.borrow().clone()
    }

    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<Vec<Pago>> {
        self.loading.send_replace(true);
        let result = self.api.list().await;
        self.loading.send_replace(false);

        match result {
            Ok(pagos) => {
                info!(count = pagos.len(), "Loaded pagos");
                self.pagos.send_replace(pagos.clone());
                Ok(pagos)
            }
            Err(e) => match &self.fallback {
                Some(sample) => {
                    warn!(error = %e, "Failed to load pagos, using sample data");
                    self.pagos.send_replace(sample.clone());
                    Ok(sample.clone())
                }
                None => Err(e),
            },
        }
    }

    #[instrument(skip(self, pago), fields(id = %pago.id))]
    pub async fn create(&self, mut pago: Pago) -> Result<Pago> {
        pago.trazabilidad.push(Trazabilidad::now(&self.usuario, NOTA_CREADO));

        let created = self.api.create(&pago).await?;
        self.pagos.send_modify(|list| list.push(created.clone()));
        info!("Pago created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, mut patch: PagoPatch) -> Result<PagoPatch> {
        patch
            .trazabilidad
            .get_or_insert_with(Vec::new)
            .push(Trazabilidad::now(&self.usuario, NOTA_EDITADO));

        let updated = self.api.update(id, &patch).await?;
        self.pagos.send_modify(|list| {
            for pago in list.iter_mut().filter(|p| p.id == id) {
                pago.merge(updated.clone());
            }
        });
        info!("Pago updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(id).await?;
        self.pagos.send_modify(|list| list.retain(|p| p.id != id));
        info!("Pago deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pago::EstadoPago;
    use crate::error::PagosError;
    use crate::infrastructure::in_memory::InMemoryPagosApi;
    use crate::infrastructure::sample::sample_pagos;
    use rust_decimal_macros::dec;

    fn store_with(api: &InMemoryPagosApi) -> RecordStore {
        RecordStore::new(Box::new(api.clone()), "mockUser")
    }

    #[tokio::test]
    async fn test_load_all_publishes_and_resets_loading() {
        let api = InMemoryPagosApi::with_pagos(sample_pagos());
        let store = store_with(&api);
        let rx = store.observe();
        let loading = store.loading();

        let loaded = store.load_all().await.unwrap();

        assert_eq!(loaded.len(), sample_pagos().len());
        assert_eq!(rx.borrow().len(), loaded.len());
        assert!(!*loading.borrow());
    }

    #[tokio::test]
    async fn test_load_all_fallback_on_transport_failure() {
        let api = InMemoryPagosApi::new();
        api.set_offline(true);
        let store = store_with(&api).with_fallback(sample_pagos());

        let loaded = store.load_all().await.unwrap();

        assert_eq!(loaded, sample_pagos());
        assert_eq!(store.snapshot(), sample_pagos());
        assert!(!*store.loading().borrow());
    }

    #[tokio::test]
    async fn test_load_all_without_fallback_propagates() {
        let api = InMemoryPagosApi::new();
        api.set_offline(true);
        let store = store_with(&api);

        assert!(matches!(
            store.load_all().await,
            Err(PagosError::Unavailable(_))
        ));
        assert!(store.snapshot().is_empty());
        assert!(!*store.loading().borrow());
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_latest_value() {
        let api = InMemoryPagosApi::with_pagos(sample_pagos());
        let store = store_with(&api);
        store.load_all().await.unwrap();

        let late = store.observe();
        assert_eq!(late.borrow().len(), sample_pagos().len());
    }

    #[tokio::test]
    async fn test_create_appends_single_creado_entry() {
        let api = InMemoryPagosApi::new();
        let store = store_with(&api);
        let mut pago = sample_pagos().remove(0);
        pago.trazabilidad.clear();

        let created = store.create(pago).await.unwrap();

        assert_eq!(created.trazabilidad.len(), 1);
        assert_eq!(created.trazabilidad[0].nota, "Creado");
        assert_eq!(created.trazabilidad[0].usuario, "mockUser");
        assert_eq!(store.snapshot(), vec![created]);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_cache_unchanged() {
        let api = InMemoryPagosApi::with_pagos(sample_pagos());
        let store = store_with(&api);
        store.load_all().await.unwrap();
        let rx = store.observe();

        api.set_offline(true);
        let result = store.create(sample_pagos().remove(0)).await;

        assert!(result.is_err());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.snapshot(), sample_pagos());
    }

    #[tokio::test]
    async fn test_update_appends_exactly_one_editado() {
        let api = InMemoryPagosApi::with_pagos(sample_pagos());
        let store = store_with(&api);
        store.load_all().await.unwrap();
        let existing = store.snapshot()[0].clone();

        let patch = PagoPatch {
            estado_pago: Some(EstadoPago::Autorizado),
            trazabilidad: Some(vec![Trazabilidad::now("otro", "Manual")]),
            ..Default::default()
        };
        let echoed = store.update(&existing.id, patch).await.unwrap();

        let trail = echoed.trazabilidad.unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[1].nota, "Editado");

        let cached = store
            .snapshot()
            .into_iter()
            .find(|p| p.id == existing.id)
            .unwrap();
        assert_eq!(cached.estado_pago, EstadoPago::Autorizado);
        assert_eq!(cached.empresa, existing.empresa);
    }

    #[tokio::test]
    async fn test_update_without_trail_starts_one() {
        let api = InMemoryPagosApi::with_pagos(sample_pagos());
        let store = store_with(&api);
        store.load_all().await.unwrap();

        let echoed = store
            .update(
                "P-0002",
                PagoPatch {
                    valor_operacion: Some(dec!(99)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let notas: Vec<_> = echoed
            .trazabilidad
            .unwrap()
            .into_iter()
            .map(|t| t.nota)
            .collect();
        assert_eq!(notas, vec!["Editado"]);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_cache_unchanged() {
        let api = InMemoryPagosApi::with_pagos(sample_pagos());
        let store = store_with(&api);
        store.load_all().await.unwrap();

        api.set_offline(true);
        let patch = PagoPatch {
            estado_pago: Some(EstadoPago::Pagado),
            ..Default::default()
        };
        assert!(store.update("P-0001", patch).await.is_err());
        assert_eq!(store.snapshot(), sample_pagos());
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let api = InMemoryPagosApi::with_pagos(sample_pagos());
        let store = store_with(&api);
        store.load_all().await.unwrap();
        let before = store.snapshot().len();

        store.delete("P-0002").await.unwrap();

        let after = store.snapshot();
        assert_eq!(after.len(), before - 1);
        assert!(after.iter().all(|p| p.id != "P-0002"));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_record() {
        let api = InMemoryPagosApi::with_pagos(sample_pagos());
        let store = store_with(&api);
        store.load_all().await.unwrap();

        assert!(matches!(
            store.delete("P-4040").await,
            Err(PagosError::NotFound(_))
        ));
        assert_eq!(store.snapshot().len(), sample_pagos().len());
    }
}
