//! Notary adapter - connects flows to the uniqueness service.

use async_trait::async_trait;
use lf_02_flow_engine::{NotaryClient, NotaryClientError, NotaryResponse};
use lf_03_notary::{NotarisationRequest, NotaryApi, NotaryError, NotaryVerdict};
use shared_types::{ContentRoot, Party, StateRef};
use std::collections::BTreeSet;
use std::sync::Arc;

/// `NotaryClient` calling an in-process `NotaryApi`.
#[derive(Clone)]
pub struct NotaryClientAdapter {
    notary: Arc<dyn NotaryApi>,
}

impl NotaryClientAdapter {
    pub fn new(notary: Arc<dyn NotaryApi>) -> Self {
        Self { notary }
    }
}

#[async_trait]
impl NotaryClient for NotaryClientAdapter {
    fn identity(&self) -> &Party {
        self.notary.identity()
    }

    async fn request_uniqueness(
        &self,
        inputs: BTreeSet<StateRef>,
        root: ContentRoot,
    ) -> Result<NotaryResponse, NotaryClientError> {
        let verdict = self
            .notary
            .notarise(NotarisationRequest { inputs, root })
            .await
            .map_err(|e| match e {
                NotaryError::StoreUnavailable(_) => NotaryClientError::Unavailable(e.to_string()),
                NotaryError::Signing(_) => NotaryClientError::Refused(e.to_string()),
            })?;

        Ok(match verdict {
            NotaryVerdict::Accept(signature) => NotaryResponse::Accept(signature),
            NotaryVerdict::Reject { conflicts } => NotaryResponse::Reject { conflicts },
        })
    }
}
