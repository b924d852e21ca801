//! Which issuance requests an issuer accepts.

use crate::domain::errors::IssuanceError;
use crate::domain::request::IssuanceRequest;
use shared_types::{Currency, Party};
use std::collections::BTreeSet;

/// Issuer-side validation, applied before any state is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuancePolicy {
    allowed_currencies: BTreeSet<Currency>,
}

impl IssuancePolicy {
    pub fn new(allowed_currencies: impl IntoIterator<Item = Currency>) -> Self {
        Self {
            allowed_currencies: allowed_currencies.into_iter().collect(),
        }
    }

    pub fn allowed_currencies(&self) -> &BTreeSet<Currency> {
        &self.allowed_currencies
    }

    /// Accept or reject `request` for an issuer notarising with `notary`.
    pub fn validate(&self, request: &IssuanceRequest, notary: &Party) -> Result<(), IssuanceError> {
        if !self.allowed_currencies.contains(&request.amount.token) {
            return Err(IssuanceError::CurrencyNotAllowed(request.amount.token));
        }
        if request.amount.quantity == 0 {
            return Err(IssuanceError::NonPositiveAmount);
        }
        if request.notary != *notary {
            return Err(IssuanceError::UnknownNotary(request.notary.name.clone()));
        }
        Ok(())
    }
}

impl Default for IssuancePolicy {
    fn default() -> Self {
        Self::new([Currency::USD, Currency::GBP, Currency::EUR, Currency::CHF])
    }
}
