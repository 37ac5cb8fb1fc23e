// service/status_rules.rs
//
// Pure rules mapping a worker's document/interview state to an onboarding
// status, and the per-status access descriptor every screen consumes. Kept
// free of any I/O so the whole funnel is testable in isolation.

use serde::Serialize;

use crate::models::{
    onboardingmodel::{DocumentStats, Interview, InterviewResult},
    usermodel::WorkerStatus,
};

/// Immutable description of what a status means and allows. One shared
/// lookup instead of per-screen switch statements.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusDescriptor {
    pub status: WorkerStatus,
    pub title: &'static str,
    pub description: &'static str,
    pub can_access_jobs: bool,
    pub can_submit_tasks: bool,
    pub next_steps: &'static [&'static str],
}

static DOCUMENT_UPLOAD_PENDING: StatusDescriptor = StatusDescriptor {
    status: WorkerStatus::DocumentUploadPending,
    title: "Documents Required",
    description: "Upload all required documents to start verification.",
    can_access_jobs: false,
    can_submit_tasks: false,
    next_steps: &[
        "Upload every required document",
        "Re-upload any document that was rejected",
    ],
};

static VERIFICATION_PENDING: StatusDescriptor = StatusDescriptor {
    status: WorkerStatus::VerificationPending,
    title: "Verification In Progress",
    description: "Your documents are being reviewed by our team.",
    can_access_jobs: false,
    can_submit_tasks: false,
    next_steps: &[
        "Wait for document review",
        "Re-upload any document that gets rejected",
    ],
};

static INTERVIEW_PENDING: StatusDescriptor = StatusDescriptor {
    status: WorkerStatus::InterviewPending,
    title: "Interview Pending",
    description: "Documents verified. An interview will be scheduled shortly.",
    can_access_jobs: true,
    can_submit_tasks: false,
    next_steps: &["Wait for your interview to be scheduled"],
};

static INTERVIEW_SCHEDULED: StatusDescriptor = StatusDescriptor {
    status: WorkerStatus::InterviewScheduled,
    title: "Interview Scheduled",
    description: "Your interview has been booked. Check the meeting details.",
    can_access_jobs: true,
    can_submit_tasks: false,
    next_steps: &["Attend the interview at the scheduled time"],
};

static ACTIVE_EMPLOYEE: StatusDescriptor = StatusDescriptor {
    status: WorkerStatus::ActiveEmployee,
    title: "Active",
    description: "You are fully onboarded and can work on tasks.",
    can_access_jobs: true,
    can_submit_tasks: true,
    next_steps: &[],
};

static REJECTED: StatusDescriptor = StatusDescriptor {
    status: WorkerStatus::Rejected,
    title: "Application Rejected",
    description: "Your application was not successful.",
    can_access_jobs: false,
    can_submit_tasks: false,
    next_steps: &["Contact support if you believe this is a mistake"],
};

pub fn descriptor(status: WorkerStatus) -> &'static StatusDescriptor {
    match status {
        WorkerStatus::DocumentUploadPending => &DOCUMENT_UPLOAD_PENDING,
        WorkerStatus::VerificationPending => &VERIFICATION_PENDING,
        WorkerStatus::InterviewPending => &INTERVIEW_PENDING,
        WorkerStatus::InterviewScheduled => &INTERVIEW_SCHEDULED,
        WorkerStatus::ActiveEmployee => &ACTIVE_EMPLOYEE,
        WorkerStatus::Rejected => &REJECTED,
    }
}

/// Descriptor for a possibly-missing stored status. Unknown and missing both
/// land on the most restrictive state.
pub fn descriptor_or_default(status: Option<WorkerStatus>) -> &'static StatusDescriptor {
    descriptor(status.unwrap_or(WorkerStatus::DocumentUploadPending))
}

/// Derives the onboarding status purely from document counts and the active
/// interview. Precedence, top first:
///
/// 1. not every required document uploaded  -> DocumentUploadPending
/// 2. any rejection, or not yet all approved -> VerificationPending
/// 3. all approved, no interview row        -> InterviewPending
/// 4. interview result selected             -> ActiveEmployee
/// 5. interview result rejected             -> Rejected
/// 6. interview booked, result pending      -> InterviewScheduled
/// 7. otherwise                             -> InterviewPending
pub fn derive_status(stats: &DocumentStats, interview: Option<&Interview>) -> WorkerStatus {
    if !stats.all_uploaded() {
        return WorkerStatus::DocumentUploadPending;
    }

    // A rejected document keeps the worker in verification until re-upload
    // resets it to pending.
    if stats.rejected > 0 || !stats.all_approved() {
        return WorkerStatus::VerificationPending;
    }

    match interview {
        None => WorkerStatus::InterviewPending,
        Some(interview) => match interview.result_or_pending() {
            InterviewResult::Selected => WorkerStatus::ActiveEmployee,
            InterviewResult::Rejected => WorkerStatus::Rejected,
            InterviewResult::Pending => {
                if interview.is_booked() {
                    WorkerStatus::InterviewScheduled
                } else {
                    WorkerStatus::InterviewPending
                }
            }
        },
    }
}

/// A recompute writes only when the derived status differs from the stored
/// one. Every status is a fixed point of its own recompute, so a second
/// recompute over unchanged inputs performs zero writes.
pub fn recompute_writes(stored: WorkerStatus, derived: WorkerStatus) -> bool {
    derived != stored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::onboardingmodel::{InterviewStatus, InterviewResult};
    use chrono::Utc;
    use uuid::Uuid;

    fn stats(uploaded: usize, approved: usize, rejected: usize) -> DocumentStats {
        DocumentStats {
            required: 5,
            uploaded,
            approved,
            rejected,
        }
    }

    fn interview(
        status: InterviewStatus,
        result: InterviewResult,
        booked: bool,
    ) -> Interview {
        Interview {
            id: Uuid::new_v4(),
            worker_id: Uuid::new_v4(),
            status: Some(status),
            result: Some(result),
            scheduled_at: booked.then(Utc::now),
            meeting_link: None,
            notes: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    #[test]
    fn incomplete_uploads_stay_in_upload_pending() {
        assert_eq!(
            derive_status(&stats(3, 0, 0), None),
            WorkerStatus::DocumentUploadPending
        );
        assert_eq!(
            derive_status(&stats(0, 0, 0), None),
            WorkerStatus::DocumentUploadPending
        );
    }

    #[test]
    fn uploads_complete_but_unreviewed_is_verification_pending() {
        assert_eq!(
            derive_status(&stats(5, 2, 0), None),
            WorkerStatus::VerificationPending
        );
    }

    #[test]
    fn any_rejection_holds_in_verification_pending() {
        assert_eq!(
            derive_status(&stats(5, 4, 1), None),
            WorkerStatus::VerificationPending
        );
    }

    #[test]
    fn all_approved_with_no_interview_is_interview_pending() {
        assert_eq!(
            derive_status(&stats(5, 5, 0), None),
            WorkerStatus::InterviewPending
        );
    }

    #[test]
    fn booked_interview_with_pending_result_is_interview_scheduled() {
        let iv = interview(InterviewStatus::Scheduled, InterviewResult::Pending, true);
        assert_eq!(
            derive_status(&stats(5, 5, 0), Some(&iv)),
            WorkerStatus::InterviewScheduled
        );
    }

    #[test]
    fn unbooked_interview_is_still_interview_pending() {
        let iv = interview(InterviewStatus::Scheduled, InterviewResult::Pending, false);
        assert_eq!(
            derive_status(&stats(5, 5, 0), Some(&iv)),
            WorkerStatus::InterviewPending
        );
    }

    #[test]
    fn selected_result_activates_worker() {
        let iv = interview(InterviewStatus::Completed, InterviewResult::Selected, true);
        assert_eq!(
            derive_status(&stats(5, 5, 0), Some(&iv)),
            WorkerStatus::ActiveEmployee
        );
    }

    #[test]
    fn rejected_result_rejects_worker() {
        let iv = interview(InterviewStatus::Completed, InterviewResult::Rejected, true);
        assert_eq!(
            derive_status(&stats(5, 5, 0), Some(&iv)),
            WorkerStatus::Rejected
        );
    }

    #[test]
    fn access_rules_per_status() {
        for status in [
            WorkerStatus::DocumentUploadPending,
            WorkerStatus::VerificationPending,
            WorkerStatus::Rejected,
        ] {
            let d = descriptor(status);
            assert!(!d.can_access_jobs);
            assert!(!d.can_submit_tasks);
        }

        for status in [
            WorkerStatus::InterviewPending,
            WorkerStatus::InterviewScheduled,
        ] {
            let d = descriptor(status);
            assert!(d.can_access_jobs);
            assert!(!d.can_submit_tasks);
        }

        let active = descriptor(WorkerStatus::ActiveEmployee);
        assert!(active.can_access_jobs);
        assert!(active.can_submit_tasks);
    }

    #[test]
    fn recompute_over_unchanged_inputs_writes_nothing() {
        // Derivation is a pure function of its inputs: the second pass over
        // the same state yields the same status and therefore no write.
        let s = stats(5, 5, 0);
        let iv = interview(InterviewStatus::Scheduled, InterviewResult::Pending, true);
        let first = derive_status(&s, Some(&iv));
        let second = derive_status(&s, Some(&iv));
        assert_eq!(first, second);
        assert!(!recompute_writes(first, second));

        for status in [
            WorkerStatus::DocumentUploadPending,
            WorkerStatus::VerificationPending,
            WorkerStatus::InterviewPending,
            WorkerStatus::InterviewScheduled,
            WorkerStatus::ActiveEmployee,
            WorkerStatus::Rejected,
        ] {
            assert!(!recompute_writes(status, status));
        }

        // A genuine drift still triggers the corrective write.
        assert!(recompute_writes(
            WorkerStatus::VerificationPending,
            WorkerStatus::InterviewPending
        ));
    }

    #[test]
    fn missing_status_fails_safe_to_most_restrictive() {
        let d = descriptor_or_default(None);
        assert_eq!(d.status, WorkerStatus::DocumentUploadPending);
        assert!(!d.can_access_jobs);

        assert_eq!(
            WorkerStatus::parse_or_default(Some("something_new")),
            WorkerStatus::DocumentUploadPending
        );
        assert_eq!(
            WorkerStatus::parse_or_default(None),
            WorkerStatus::DocumentUploadPending
        );
    }
}
