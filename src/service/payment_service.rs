// service/payment_service.rs
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, paymentdb::PaymentExt, taskdb::TaskExt, userdb::UserExt},
    models::{
        paymentmodel::{PaymentRecord, PaymentStatus, PendingClassification, ResponsibleParty},
        taskmodel::SubmissionStatus,
    },
    service::{
        audit_service::AuditService,
        error::ServiceError,
        pager::{CursorPager, LoadOutcome},
    },
};

/// Classifies a `pending_details` payment from its two blocking inputs.
/// Total over all four combinations; (true, true) means the block is gone
/// and the payment must be promoted, not labelled.
pub fn classify(bank_complete: bool, proof_exists: bool) -> PendingClassification {
    match (bank_complete, proof_exists) {
        (false, false) => PendingClassification::Blocked(ResponsibleParty::Both),
        (false, true) => PendingClassification::Blocked(ResponsibleParty::Worker),
        (true, false) => PendingClassification::Blocked(ResponsibleParty::Employer),
        (true, true) => PendingClassification::Resolved,
    }
}

#[derive(Debug, Serialize)]
pub struct ClassifiedPayment {
    #[serde(flatten)]
    pub payment: PaymentRecord,
    pub responsible_party: Option<ResponsibleParty>,
}

#[derive(Debug, Serialize)]
pub struct ReconcileOutcome {
    pub payment: PaymentRecord,
    pub classification: PendingClassification,
}

#[derive(Debug, Serialize)]
pub struct SweepOutcome {
    pub scanned: usize,
    pub promoted: usize,
}

#[derive(Debug, Clone)]
pub struct PaymentService {
    db_client: Arc<DBClient>,
    audit_service: Arc<AuditService>,
}

impl PaymentService {
    pub fn new(db_client: Arc<DBClient>, audit_service: Arc<AuditService>) -> Self {
        Self {
            db_client,
            audit_service,
        }
    }

    /// Creates the payment record for an approved submission and moves it
    /// straight to `pending_details` so reconcile can take over.
    pub async fn open_payment_for_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<PaymentRecord, ServiceError> {
        let submission = self
            .db_client
            .get_submission(submission_id)
            .await?
            .ok_or(ServiceError::SubmissionNotFound(submission_id))?;

        if submission.status_or_pending() != SubmissionStatus::Approved {
            return Err(ServiceError::InvalidSubmissionState(
                submission_id,
                submission.status_or_pending(),
            ));
        }

        let task = self
            .db_client
            .get_task(submission.task_id)
            .await?
            .ok_or(ServiceError::Validation("Task no longer exists".to_string()))?;

        let payment = self
            .db_client
            .create_payment(
                task.id,
                submission.worker_id,
                submission.employer_id,
                task.payment_amount.clone(),
            )
            .await?;

        let payment = self
            .db_client
            .update_payment_status(payment.id, PaymentStatus::PendingDetails)
            .await?;

        Ok(payment)
    }

    /// Live classification of one payment without mutating it.
    pub async fn classify_payment(
        &self,
        payment_id: Uuid,
    ) -> Result<PendingClassification, ServiceError> {
        let payment = self
            .db_client
            .get_payment(payment_id)
            .await?
            .ok_or(ServiceError::PaymentNotFound(payment_id))?;

        let bank_complete = self
            .db_client
            .bank_details_complete(payment.worker_id)
            .await?;
        let proof_exists = self.db_client.transaction_proof_exists(payment_id).await?;

        Ok(classify(bank_complete, proof_exists))
    }

    /// Checks live completeness and performs the `pending_details ->
    /// processing` transition when both blockers are gone. This is the only
    /// path that performs that transition; the db layer's UPDATE is guarded
    /// on the current status so a concurrent reconcile cannot double-fire.
    pub async fn reconcile(
        &self,
        actor_id: Uuid,
        payment_id: Uuid,
    ) -> Result<ReconcileOutcome, ServiceError> {
        let payment = self
            .db_client
            .get_payment(payment_id)
            .await?
            .ok_or(ServiceError::PaymentNotFound(payment_id))?;

        if !payment.status_or_pending().accepts_details() {
            return Err(ServiceError::InvalidPaymentState(
                payment_id,
                payment.status_or_pending(),
            ));
        }

        let bank_complete = self
            .db_client
            .bank_details_complete(payment.worker_id)
            .await?;
        let proof_exists = self.db_client.transaction_proof_exists(payment_id).await?;

        let classification = classify(bank_complete, proof_exists);

        let payment = match classification {
            PendingClassification::Resolved => {
                let promoted = self
                    .db_client
                    .promote_to_processing(payment_id)
                    .await?
                    // Guarded UPDATE matched nothing: someone else already
                    // moved it. Re-read and report the current row.
                    .unwrap_or(payment);

                self.audit_service
                    .log_payment_transition(
                        actor_id,
                        promoted.id,
                        PaymentStatus::PendingDetails,
                        PaymentStatus::Processing,
                    )
                    .await?;

                promoted
            }
            PendingClassification::Blocked(party) => {
                tracing::debug!(payment_id = %payment_id, ?party, "payment still blocked");
                payment
            }
        };

        Ok(ReconcileOutcome {
            payment,
            classification,
        })
    }

    /// Lists a worker's payments with the derived responsible party attached
    /// to every `pending_details` row.
    pub async fn worker_payments_with_parties(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<ClassifiedPayment>, ServiceError> {
        let payments = self.db_client.get_worker_payments(worker_id).await?;
        let bank_complete = self.db_client.bank_details_complete(worker_id).await?;

        let mut out = Vec::with_capacity(payments.len());
        for payment in payments {
            let responsible_party = if payment.status_or_pending() == PaymentStatus::PendingDetails
            {
                let proof_exists = self.db_client.transaction_proof_exists(payment.id).await?;
                match classify(bank_complete, proof_exists) {
                    PendingClassification::Blocked(party) => Some(party),
                    PendingClassification::Resolved => None,
                }
            } else {
                None
            };
            out.push(ClassifiedPayment {
                payment,
                responsible_party,
            });
        }
        Ok(out)
    }

    /// Employer attaches the transaction proof, then reconcile runs to see
    /// whether the payment can move forward.
    pub async fn attach_proof(
        &self,
        employer_id: Uuid,
        payment_id: Uuid,
        proof_path: String,
    ) -> Result<ReconcileOutcome, ServiceError> {
        let payment = self
            .db_client
            .get_payment(payment_id)
            .await?
            .ok_or(ServiceError::PaymentNotFound(payment_id))?;

        if payment.employer_id != employer_id {
            return Err(ServiceError::Unauthorized(employer_id, payment_id));
        }

        // Reject before the proof write so the error path mutates nothing.
        if !payment.status_or_pending().accepts_details() {
            return Err(ServiceError::InvalidPaymentState(
                payment_id,
                payment.status_or_pending(),
            ));
        }

        self.db_client
            .attach_transaction_proof(payment_id, proof_path)
            .await?;

        self.reconcile(employer_id, payment_id).await
    }

    /// Admin settles a processing payment, crediting the worker's earnings.
    pub async fn complete_payment(
        &self,
        admin_id: Uuid,
        payment_id: Uuid,
    ) -> Result<PaymentRecord, ServiceError> {
        let payment = self
            .db_client
            .get_payment(payment_id)
            .await?
            .ok_or(ServiceError::PaymentNotFound(payment_id))?;

        if payment.status_or_pending() != PaymentStatus::Processing {
            return Err(ServiceError::InvalidPaymentState(
                payment_id,
                payment.status_or_pending(),
            ));
        }

        let completed = self
            .db_client
            .update_payment_status(payment_id, PaymentStatus::Completed)
            .await?;

        self.db_client
            .credit_worker_earnings(completed.worker_id, completed.amount.clone())
            .await?;
        self.db_client
            .increment_completed_tasks(completed.worker_id)
            .await?;

        self.audit_service
            .log_payment_transition(
                admin_id,
                payment_id,
                PaymentStatus::Processing,
                PaymentStatus::Completed,
            )
            .await?;

        Ok(completed)
    }

    /// Walks every `pending_details` payment in id order and reconciles each
    /// one. Returns how many promoted to `processing`.
    pub async fn reconcile_sweep(&self, actor_id: Uuid) -> Result<SweepOutcome, ServiceError> {
        let pager: CursorPager<PaymentRecord, Uuid> = CursorPager::new(100);
        let mut batch: Vec<PaymentRecord> = Vec::new();
        let mut scanned = 0usize;
        let mut promoted = 0usize;

        loop {
            let outcome = pager
                .load_more(
                    |p| p.id,
                    |cursor, limit| self.db_client.get_pending_details_page(cursor, limit),
                    &mut batch,
                )
                .await?;

            for payment in batch.drain(..) {
                scanned += 1;
                match self.reconcile(actor_id, payment.id).await {
                    Ok(outcome) => {
                        if matches!(outcome.classification, PendingClassification::Resolved) {
                            promoted += 1;
                        }
                    }
                    // Another reconcile may have moved it between the page
                    // read and ours; skip rather than abort the sweep.
                    Err(ServiceError::InvalidPaymentState(..)) => {}
                    Err(e) => return Err(e),
                }
            }

            match outcome {
                LoadOutcome::Exhausted | LoadOutcome::AlreadyLoading => break,
                LoadOutcome::Loaded(n) if (n as i64) < pager.page_size() => break,
                LoadOutcome::Loaded(_) => {}
            }
        }

        tracing::info!(scanned, promoted, "reconcile sweep finished");
        Ok(SweepOutcome { scanned, promoted })
    }

    pub async fn fail_payment(
        &self,
        admin_id: Uuid,
        payment_id: Uuid,
    ) -> Result<PaymentRecord, ServiceError> {
        let payment = self
            .db_client
            .get_payment(payment_id)
            .await?
            .ok_or(ServiceError::PaymentNotFound(payment_id))?;

        let from = payment.status_or_pending();
        if from.is_terminal() {
            return Err(ServiceError::InvalidPaymentState(payment_id, from));
        }

        let failed = self
            .db_client
            .update_payment_status(payment_id, PaymentStatus::Failed)
            .await?;

        self.audit_service
            .log_payment_transition(admin_id, payment_id, from, PaymentStatus::Failed)
            .await?;

        Ok(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_is_total_over_all_inputs() {
        let cases = [
            (false, false, PendingClassification::Blocked(ResponsibleParty::Both)),
            (false, true, PendingClassification::Blocked(ResponsibleParty::Worker)),
            (true, false, PendingClassification::Blocked(ResponsibleParty::Employer)),
            (true, true, PendingClassification::Resolved),
        ];
        for (bank, proof, expected) in cases {
            assert_eq!(classify(bank, proof), expected);
        }
    }

    #[test]
    fn incomplete_bank_with_proof_present_blames_worker() {
        assert_eq!(
            classify(false, true),
            PendingClassification::Blocked(ResponsibleParty::Worker)
        );
    }

    #[test]
    fn both_present_resolves_instead_of_labelling() {
        // Resolution is a transition trigger, not a responsible party.
        match classify(true, true) {
            PendingClassification::Resolved => {}
            other => panic!("expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn settled_payments_cannot_be_failed() {
        // fail_payment refuses terminal states: a completed payment has
        // already credited the worker, so flipping it to failed would leave
        // the credit with no payment backing it.
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());

        for status in [
            PaymentStatus::Pending,
            PaymentStatus::PendingDetails,
            PaymentStatus::Processing,
        ] {
            assert!(!status.is_terminal());
        }
    }

    #[test]
    fn only_pending_details_payments_accept_detail_input() {
        // attach_proof and reconcile both check this before any write, so
        // proof attached to a settled payment is rejected without mutating
        // the row.
        assert!(PaymentStatus::PendingDetails.accepts_details());

        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Processing,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
        ] {
            assert!(!status.accepts_details());
        }
    }
}
