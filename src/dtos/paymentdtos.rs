use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::paymentmodel::{PendingClassification, ResponsibleParty};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AttachProofDto {
    #[validate(length(min = 1, max = 255, message = "Proof file name is required"))]
    pub proof_file_name: String,
}

#[derive(Debug, Serialize)]
pub struct ClassificationResponseDto {
    pub payment_id: String,
    pub classification: &'static str,
    pub responsible_party: Option<ResponsibleParty>,
}

impl ClassificationResponseDto {
    pub fn from_classification(
        payment_id: uuid::Uuid,
        classification: PendingClassification,
    ) -> Self {
        let (label, party) = match classification {
            PendingClassification::Resolved => ("resolved", None),
            PendingClassification::Blocked(party) => ("blocked", Some(party)),
        };
        Self {
            payment_id: payment_id.to_string(),
            classification: label,
            responsible_party: party,
        }
    }
}
