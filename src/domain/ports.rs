use super::pago::{Pago, PagoPatch};
use crate::error::Result;
use async_trait::async_trait;

/// Remote payment collection.
#[async_trait]
pub trait PagosApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Pago>>;
    async fn create(&self, pago: &Pago) -> Result<Pago>;
    /// Returns the fields echoed back by the remote side.
    async fn update(&self, id: &str, patch: &PagoPatch) -> Result<PagoPatch>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Persisted key/value preferences, holding the active role tag.
pub trait RolePreferences: Send + Sync {
    fn load_role(&self) -> Result<Option<String>>;
    fn save_role(&self, role: &str) -> Result<()>;
}

pub type PagosApiBox = Box<dyn PagosApi>;
