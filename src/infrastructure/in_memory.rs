use crate::domain::pago::{Pago, PagoPatch};
use crate::domain::ports::PagosApi;
use crate::error::{PagosError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory payment collection.
///
/// Uses `Arc<RwLock<Vec<Pago>>>` so clones share the same records, which lets a test keep
/// a handle to the backend after handing a boxed copy to a `RecordStore`.
/// `set_offline(true)` makes every call fail as if the remote side were unreachable.
#[derive(Default, Clone)]
pub struct InMemoryPagosApi {
    pagos: Arc<RwLock<Vec<Pago>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryPagosApi {
    /// Creates a new, empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pagos(pagos: Vec<Pago>) -> Self {
        Self {
            pagos: Arc::new(RwLock::new(pagos)),
            offline: Arc::default(),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn records(&self) -> Vec<Pago> {
        self.pagos.read().await.clone()
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(PagosError::Unavailable("in-memory backend is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PagosApi for InMemoryPagosApi {
    async fn list(&self) -> Result<Vec<Pago>> {
        self.ensure_online()?;
        Ok(self.pagos.read().await.clone())
    }

    async fn create(&self, pago: &Pago) -> Result<Pago> {
        self.ensure_online()?;
        let mut pagos = self.pagos.write().await;
        pagos.push(pago.clone());
        Ok(pago.clone())
    }

    async fn update(&self, id: &str, patch: &PagoPatch) -> Result<PagoPatch> {
        self.ensure_online()?;
        let mut pagos = self.pagos.write().await;
        let pago = pagos
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PagosError::NotFound(id.to_string()))?;
        pago.merge(patch.clone());
        Ok(PagoPatch::from(pago.clone()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.ensure_online()?;
        let mut pagos = self.pagos.write().await;
        let before = pagos.len();
        pagos.retain(|p| p.id != id);
        if pagos.len() == before {
            return Err(PagosError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pago::EstadoPago;
    use crate::infrastructure::sample::sample_pagos;

    #[tokio::test]
    async fn test_in_memory_create_and_list() {
        let api = InMemoryPagosApi::new();
        let pago = sample_pagos().remove(0);

        let created = api.create(&pago).await.unwrap();
        assert_eq!(created, pago);
        assert_eq!(api.list().await.unwrap(), vec![pago]);
    }

    #[tokio::test]
    async fn test_in_memory_update_echoes_merged_record() {
        let api = InMemoryPagosApi::with_pagos(sample_pagos());
        let patch = PagoPatch {
            estado_pago: Some(EstadoPago::Pagado),
            ..Default::default()
        };

        let echoed = api.update("P-0001", &patch).await.unwrap();
        assert_eq!(echoed.estado_pago, Some(EstadoPago::Pagado));
        assert_eq!(echoed.empresa.as_deref(), Some("Bavaria"));

        assert!(matches!(
            api.update("P-4040", &patch).await,
            Err(PagosError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_in_memory_offline() {
        let api = InMemoryPagosApi::with_pagos(sample_pagos());
        api.set_offline(true);
        assert!(matches!(api.list().await, Err(PagosError::Unavailable(_))));
        assert!(api.delete("P-0001").await.is_err());

        api.set_offline(false);
        api.delete("P-0001").await.unwrap();
        assert_eq!(api.records().await.len(), sample_pagos().len() - 1);
    }
}
