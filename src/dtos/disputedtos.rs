use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::disputemodel::DisputeType;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RaiseDisputeDto {
    pub against: Uuid,

    pub task_id: Option<Uuid>,

    pub dispute_type: DisputeType,

    #[validate(length(
        min = 20,
        max = 2000,
        message = "Description must be between 20 and 2000 characters"
    ))]
    pub description: String,

    pub attachment_file_names: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CloseDisputeDto {
    /// true resolves the dispute, false rejects it.
    pub resolved: bool,

    #[validate(length(
        min = 10,
        max = 2000,
        message = "Resolution must be between 10 and 2000 characters"
    ))]
    pub resolution: String,
}
