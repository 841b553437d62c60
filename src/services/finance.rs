//! Finance service implementation
//!
//! Fees, payments, and receipts. Receipt documents come from the functions
//! gateway; thermal printing is behind a feature flag. The overdue sweep
//! flips pending fees past their due date.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::config::FeaturesConfig;
use crate::database::repositories::{FinanceRepository, PersonRepository};
use crate::models::finance::{CreateFeeRequest, FeeStatus, FinancialFee};
use crate::services::functions::FunctionsClient;
use crate::utils::errors::{EkklesiaError, Result};
use crate::utils::helpers;
use crate::utils::logging;

/// Finance service for fee lifecycle and receipts
#[derive(Debug, Clone)]
pub struct FinanceService {
    finance_repository: FinanceRepository,
    person_repository: PersonRepository,
    functions: FunctionsClient,
    features: FeaturesConfig,
}

impl FinanceService {
    /// Create a new FinanceService instance
    pub fn new(
        finance_repository: FinanceRepository,
        person_repository: PersonRepository,
        functions: FunctionsClient,
        features: FeaturesConfig,
    ) -> Self {
        Self {
            finance_repository,
            person_repository,
            functions,
            features,
        }
    }

    /// Create a new fee for a person
    pub async fn create_fee(&self, request: CreateFeeRequest) -> Result<FinancialFee> {
        if request.amount_cents <= 0 {
            return Err(EkklesiaError::InvalidInput(
                "Fee amount must be positive".to_string(),
            ));
        }
        if request.description.trim().is_empty() {
            return Err(EkklesiaError::InvalidInput(
                "Fee description is required".to_string(),
            ));
        }

        let person_id = request.person_id;
        self.person_repository
            .find_by_id(person_id)
            .await?
            .ok_or(EkklesiaError::PersonNotFound { person_id })?;

        let fee = self.finance_repository.create(request).await?;
        info!(fee_id = fee.id, person_id = person_id, "Fee created");

        Ok(fee)
    }

    /// Get fee by ID
    pub async fn get_fee(&self, fee_id: i64) -> Result<FinancialFee> {
        self.finance_repository
            .find_by_id(fee_id)
            .await?
            .ok_or_else(|| EkklesiaError::InvalidInput(format!("Fee {fee_id} does not exist")))
    }

    /// Settle a fee: stamp payment time and receipt number, generate the
    /// receipt document, and optionally dispatch it to the thermal printer.
    pub async fn mark_paid(&self, fee_id: i64) -> Result<FinancialFee> {
        let fee = self.get_fee(fee_id).await?;

        if fee.status == FeeStatus::Paid.as_str() {
            return Err(EkklesiaError::BusinessRule(format!(
                "Fee \"{}\" is already settled",
                fee.description
            )));
        }

        let receipt_number = helpers::generate_receipt_number(Utc::now());
        let fee = self
            .finance_repository
            .mark_paid(fee.id, &receipt_number)
            .await?;

        let person_id = fee.person_id;
        let person = self
            .person_repository
            .find_by_id(person_id)
            .await?
            .ok_or(EkklesiaError::PersonNotFound { person_id })?;

        // Receipt generation is best-effort: the payment already settled.
        match self
            .functions
            .generate_receipt(
                &receipt_number,
                &person.full_name,
                &fee.description,
                fee.amount_cents,
            )
            .await
        {
            Ok(document) => {
                if self.features.thermal_printing {
                    if let Err(e) = self.functions.dispatch_thermal_print(document).await {
                        warn!(fee_id = fee_id, error = %e, "Thermal print dispatch failed");
                    }
                }
            }
            Err(e) => {
                warn!(fee_id = fee_id, error = %e, "Receipt generation failed");
            }
        }

        info!(fee_id = fee_id, receipt_number = %receipt_number, "Fee settled");
        Ok(fee)
    }

    /// Waive a fee
    pub async fn waive(&self, fee_id: i64) -> Result<FinancialFee> {
        let fee = self.get_fee(fee_id).await?;

        if fee.status == FeeStatus::Paid.as_str() {
            return Err(EkklesiaError::BusinessRule(
                "A settled fee cannot be waived".to_string(),
            ));
        }

        let fee = self
            .finance_repository
            .set_status(fee.id, FeeStatus::Waived)
            .await?;

        info!(fee_id = fee_id, "Fee waived");
        Ok(fee)
    }

    /// Flip pending fees past their due date to overdue
    pub async fn run_overdue_sweep(&self, today: NaiveDate) -> Result<u64> {
        let started = std::time::Instant::now();
        let flipped = self.finance_repository.mark_overdue(today).await?;

        logging::log_sweep_run(
            "overdue_fees",
            flipped as usize,
            flipped as usize,
            started.elapsed().as_millis() as u64,
        );
        Ok(flipped)
    }

    /// Fees of a person, newest due date first
    pub async fn list_for_person(&self, person_id: i64) -> Result<Vec<FinancialFee>> {
        self.finance_repository.list_by_person(person_id).await
    }

    /// Fees holding a status
    pub async fn list_by_status(&self, status: FeeStatus) -> Result<Vec<FinancialFee>> {
        self.finance_repository.list_by_status(status).await
    }

    /// Outstanding balance of a person, in cents
    pub async fn outstanding(&self, person_id: i64) -> Result<i64> {
        self.finance_repository.outstanding_cents(person_id).await
    }
}
