use crate::domain::pago::{Pago, PagoPatch};
use crate::domain::ports::PagosApi;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/pagos";

/// `PagosApi` over the REST collection at `base_url`.
///
/// Any non-2xx response is reported as a transport failure. No timeout is configured,
/// so a request stays pending until the remote side answers or drops the connection.
#[derive(Clone)]
pub struct RestPagosApi {
    client: Client,
    base_url: String,
}

impl RestPagosApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

#[async_trait]
impl PagosApi for RestPagosApi {
    async fn list(&self) -> Result<Vec<Pago>> {
        debug!(url = %self.base_url, "GET pagos");
        let pagos = self
            .client
            .get(&self.base_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(pagos)
    }

    async fn create(&self, pago: &Pago) -> Result<Pago> {
        debug!(url = %self.base_url, id = %pago.id, "POST pago");
        let created = self
            .client
            .post(&self.base_url)
            .json(pago)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(created)
    }

    async fn update(&self, id: &str, patch: &PagoPatch) -> Result<PagoPatch> {
        let url = self.item_url(id);
        debug!(url = %url, "PATCH pago");
        let updated = self
            .client
            .patch(&url)
            .json(patch)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.item_url(id);
        debug!(url = %url, "DELETE pago");
        self.client.delete(&url).send().await?.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_drops_trailing_slash() {
        let api = RestPagosApi::with_client(Client::new(), "http://localhost:3001/pagos/");
        assert_eq!(api.base_url(), DEFAULT_BASE_URL);
        assert_eq!(api.item_url("P-0001"), "http://localhost:3001/pagos/P-0001");
    }
}
