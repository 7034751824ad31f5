mod model;

pub use model::*;

use std::future::pending;

use serde_json::json;
use tokio::sync::watch;

use super::{http::ApiRequest, ApiClient};
use crate::error::ClientResult;

impl ApiClient {
    /// Returns the server's matches as-is; the client neither filters nor pages.
    pub async fn list_services(&self, filter: &ServiceFilter) -> ClientResult<Vec<Service>> {
        let request = ApiRequest::get(["api", "services"]).with_query(filter.to_query());
        self.execute(request).await
    }

    /// Like [`ApiClient::list_services`], but a later search cancels this one.
    ///
    /// Resolves to `None` when superseded; its in-flight request is dropped.
    pub async fn search_services(&self, filter: &ServiceFilter) -> ClientResult<Option<Vec<Service>>> {
        let mut generation = 0;
        self.searches.send_modify(|g| {
            *g += 1;
            generation = *g;
        });
        let mut rx = self.searches.subscribe();

        let outcome = tokio::select! {
            result = self.list_services(filter) => Some(result),
            _ = superseded(&mut rx, generation) => None,
        };

        let latest = *self.searches.borrow();
        settle_search(outcome, generation, latest)
    }

    pub async fn get_service(&self, id: &str) -> ClientResult<Service> {
        self.execute(ApiRequest::get(["api", "services", id])).await
    }

    /// Listings owned by the signed-in provider.
    pub async fn list_my_services(&self) -> ClientResult<Vec<Service>> {
        let session = self.require_provider().await?;
        self.execute_as(&session, ApiRequest::get(["api", "services", "provider"]))
            .await
    }

    pub async fn create_service_listing(&self, listing: &NewServiceListing) -> ClientResult<Service> {
        let session = self.require_provider().await?;
        listing.validate()?;

        let request = ApiRequest::post(
            ["api", "services"],
            json!({
                "title": listing.title.trim(),
                "category": listing.category.trim(),
                "location": listing.location.trim(),
                "price": listing.price,
            }),
        );
        let service: Service = self.execute_as(&session, request).await?;
        info!("Created service listing {}", service.id);
        Ok(service)
    }
}

/// Keeps a finished search only if no newer one was issued before its result was looked at.
fn settle_search(
    outcome: Option<ClientResult<Vec<Service>>>,
    generation: u64,
    latest: u64,
) -> ClientResult<Option<Vec<Service>>> {
    match outcome {
        Some(result) if latest == generation => result.map(Some),
        Some(_) => {
            debug!("Search {} finished after being superseded", generation);
            Ok(None)
        }
        None => {
            debug!("Search {} superseded, cancelling", generation);
            Ok(None)
        }
    }
}

async fn superseded(rx: &mut watch::Receiver<u64>, generation: u64) {
    loop {
        if rx.changed().await.is_err() {
            pending::<()>().await;
        }
        if *rx.borrow_and_update() != generation {
            return;
        }
    }
}
