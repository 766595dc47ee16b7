//! # Wizard State Machine
//!
//! One `Wizard` owns one editing session: form state, step pointer,
//! validation errors, and submission phase. Every mutation snapshots
//! the draft for this session's scope before returning.
//!
//! The submission translator is injected as an async closure at the
//! call site — the wizard neither knows nor cares which datastore the
//! finalized form state is written to.

use std::collections::BTreeMap;
use std::future::Future;

use thiserror::Error;

use cpi_core::coerce::is_blank;
use cpi_core::CompanyId;
use cpi_form::{FieldValue, FormError, FormState, ListSection};

use crate::draft::{DraftError, DraftSnapshot, DraftStore, SessionScope};
use crate::step::WizardStep;

/// The submission lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    /// Normal editing and navigation.
    Editing,
    /// The translator is running.
    Submitting,
    /// Submission completed; the draft for this scope is cleared.
    Succeeded,
    /// Submission failed; form state and step are retained.
    Failed,
}

impl std::fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Editing => "EDITING",
            Self::Submitting => "SUBMITTING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Errors raised by wizard operations.
#[derive(Error, Debug)]
pub enum WizardError {
    /// A form-state operation was rejected.
    #[error(transparent)]
    Form(#[from] FormError),

    /// Draft persistence failed.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// "Next" invoked on the final step — forward navigation past
    /// step 7 does not exist; only submit applies.
    #[error("no step follows {step}")]
    NoFurtherStep {
        /// The final step.
        step: WizardStep,
    },

    /// Submit invoked before reaching the final step.
    #[error("cannot submit from {step}; submission is gated on the final step")]
    NotAtFinalStep {
        /// The step the session is on.
        step: WizardStep,
    },

    /// Step validation rejected the submission.
    #[error("validation failed for the current step")]
    ValidationFailed,

    /// The translator reported a fatal error; one message is surfaced
    /// for the whole submission attempt.
    #[error("submission failed: {message}")]
    SubmissionFailed {
        /// The first fatal error's message.
        message: String,
    },
}

/// Step-local validation: only step 1 has required fields.
pub fn step_errors(state: &FormState, step: WizardStep) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    if step == WizardStep::CompanyIdentity {
        if is_blank(&state.company.name) {
            errors.insert("name".to_string(), "Company name is required".to_string());
        }
        if is_blank(&state.company.sector) {
            errors.insert("sector".to_string(), "Sector is required".to_string());
        }
    }
    errors
}

/// One intake session.
#[derive(Debug)]
pub struct Wizard<D: DraftStore> {
    scope: SessionScope,
    state: FormState,
    step: WizardStep,
    errors: BTreeMap<String, String>,
    phase: WizardPhase,
    submit_error: Option<String>,
    drafts: D,
}

impl<D: DraftStore> Wizard<D> {
    /// Start a create-mode session, restoring a previously drafted form
    /// state if one exists. The step always restarts at 1.
    pub fn create(drafts: D) -> Result<Self, WizardError> {
        let scope = SessionScope::Create;
        let mut state = FormState::new();
        if let Some(snapshot) = drafts.load(&scope)? {
            if let Some(drafted) = snapshot.state {
                state = drafted;
            }
        }
        Ok(Self {
            scope,
            state,
            step: WizardStep::CompanyIdentity,
            errors: BTreeMap::new(),
            phase: WizardPhase::Editing,
            submit_error: None,
            drafts,
        })
    }

    /// Start an edit-mode session over a record fetched by the caller,
    /// restoring the drafted step pointer if one exists.
    pub fn edit(company: CompanyId, initial: FormState, drafts: D) -> Result<Self, WizardError> {
        let scope = SessionScope::Edit(company);
        let mut step = WizardStep::CompanyIdentity;
        if let Some(snapshot) = drafts.load(&scope)? {
            if let Some(drafted) = snapshot.step {
                step = drafted;
            }
        }
        Ok(Self {
            scope,
            state: initial,
            step,
            errors: BTreeMap::new(),
            phase: WizardPhase::Editing,
            submit_error: None,
            drafts,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The session's draft scope.
    pub fn scope(&self) -> &SessionScope {
        &self.scope
    }

    /// The company being edited, if this is an edit-mode session.
    pub fn company_id(&self) -> Option<CompanyId> {
        match self.scope {
            SessionScope::Create => None,
            SessionScope::Edit(id) => Some(id),
        }
    }

    /// The aggregate form state.
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// The current step.
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// The submission phase.
    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    /// Per-field validation errors from the last gated navigation.
    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// The surfaced message of the last failed submission.
    pub fn submission_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    // ── Field and list operations ────────────────────────────────────

    /// Apply a scalar company field update. Clears any recorded
    /// validation error for that field name.
    pub fn set_company_field(&mut self, field: &str, value: &FieldValue) -> Result<(), WizardError> {
        self.state.set_company_field(field, value)?;
        self.errors.remove(field);
        self.persist()?;
        Ok(())
    }

    /// Apply a field update to one row of a list section. A financial
    /// row recomputes its derived ratios in the same update.
    pub fn set_list_field(
        &mut self,
        section: ListSection,
        index: usize,
        field: &str,
        value: &FieldValue,
    ) -> Result<(), WizardError> {
        self.state.set_list_field(section, index, field, value)?;
        self.errors.remove(field);
        self.persist()?;
        Ok(())
    }

    /// Apply a field update to one investor row of a funding round.
    pub fn set_investor_field(
        &mut self,
        round: usize,
        index: usize,
        field: &str,
        value: &FieldValue,
    ) -> Result<(), WizardError> {
        self.state.set_investor_field(round, index, field, value)?;
        self.errors.remove(field);
        self.persist()?;
        Ok(())
    }

    /// Append a default row to a list section.
    pub fn add_row(&mut self, section: ListSection) -> Result<(), WizardError> {
        self.state.push_default(section);
        self.persist()?;
        Ok(())
    }

    /// Remove the row at `index`, re-indexing later rows.
    pub fn remove_row(&mut self, section: ListSection, index: usize) -> Result<(), WizardError> {
        self.state.remove_at(section, index)?;
        self.persist()?;
        Ok(())
    }

    /// Append a default investor row to a funding round.
    pub fn add_investor(&mut self, round: usize) -> Result<(), WizardError> {
        self.state.push_investor(round)?;
        self.persist()?;
        Ok(())
    }

    /// Remove one investor row from a funding round.
    pub fn remove_investor(&mut self, round: usize, index: usize) -> Result<(), WizardError> {
        self.state.remove_investor(round, index)?;
        self.persist()?;
        Ok(())
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Advance to the next step.
    ///
    /// Runs step-local validation first. On failure the step is
    /// unchanged, the per-field errors are recorded, and `Ok(false)` is
    /// returned. Invoking "Next" on the final step is an error — the
    /// only forward action there is [`Wizard::submit`].
    pub fn next(&mut self) -> Result<bool, WizardError> {
        let target = self
            .step
            .next()
            .ok_or(WizardError::NoFurtherStep { step: self.step })?;
        let errors = step_errors(&self.state, self.step);
        if !errors.is_empty() {
            self.errors = errors;
            return Ok(false);
        }
        self.step = target;
        self.persist()?;
        Ok(true)
    }

    /// Go back one step. Never validates, always succeeds, clamps at
    /// step 1 (where it is a no-op).
    pub fn previous(&mut self) -> Result<(), WizardError> {
        self.step = self.step.previous();
        self.persist()?;
        Ok(())
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Submit the finalized form state through the injected translator.
    ///
    /// Gated on the final step. Success transitions to `Succeeded` and
    /// clears this scope's draft; failure transitions to `Failed`,
    /// retains form state and step, and surfaces the translator's
    /// message as a single submission error.
    pub async fn submit<O, E, F, Fut>(&mut self, translate: F) -> Result<O, WizardError>
    where
        F: FnOnce(FormState) -> Fut,
        Fut: Future<Output = Result<O, E>>,
        E: std::fmt::Display,
    {
        if !self.step.is_final() {
            return Err(WizardError::NotAtFinalStep { step: self.step });
        }
        let errors = step_errors(&self.state, self.step);
        if !errors.is_empty() {
            self.errors = errors;
            return Err(WizardError::ValidationFailed);
        }

        self.phase = WizardPhase::Submitting;
        match translate(self.state.clone()).await {
            Ok(outcome) => {
                self.phase = WizardPhase::Succeeded;
                self.submit_error = None;
                if let Err(e) = self.drafts.clear(&self.scope) {
                    tracing::warn!(error = %e, "failed to clear draft after submission");
                }
                Ok(outcome)
            }
            Err(e) => {
                let message = e.to_string();
                self.phase = WizardPhase::Failed;
                self.submit_error = Some(message.clone());
                Err(WizardError::SubmissionFailed { message })
            }
        }
    }

    /// Abandon the session, discarding its draft.
    pub fn discard(&mut self) -> Result<(), WizardError> {
        self.drafts.clear(&self.scope)?;
        Ok(())
    }

    /// Snapshot the draft for this scope: create-mode sessions persist
    /// the full form state, edit-mode sessions persist the step pointer.
    fn persist(&self) -> Result<(), DraftError> {
        let snapshot = match self.scope {
            SessionScope::Create => DraftSnapshot {
                step: None,
                state: Some(self.state.clone()),
            },
            SessionScope::Edit(_) => DraftSnapshot {
                step: Some(self.step),
                state: None,
            },
        };
        self.drafts.save(&self.scope, &snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::MemoryDraftStore;
    use std::sync::Arc;

    // Arc so the tests keep a handle on the store after moving it into
    // a wizard.
    type SharedDrafts = Arc<MemoryDraftStore>;

    fn create_wizard() -> Wizard<SharedDrafts> {
        Wizard::create(SharedDrafts::default()).unwrap()
    }

    fn fill_required(wizard: &mut Wizard<SharedDrafts>) {
        wizard
            .set_company_field("name", &FieldValue::text("Acme"))
            .unwrap();
        wizard
            .set_company_field("sector", &FieldValue::text("technology"))
            .unwrap();
    }

    #[test]
    fn test_next_blocked_without_required_fields() {
        let mut wizard = create_wizard();
        assert_eq!(wizard.next().unwrap(), false);
        assert_eq!(wizard.step(), WizardStep::CompanyIdentity);
        assert!(wizard.field_errors().contains_key("name"));
        assert!(wizard.field_errors().contains_key("sector"));
    }

    #[test]
    fn test_next_blocked_iff_name_or_sector_blank() {
        let mut wizard = create_wizard();
        wizard
            .set_company_field("name", &FieldValue::text("Acme"))
            .unwrap();
        assert_eq!(wizard.next().unwrap(), false);
        assert!(!wizard.field_errors().contains_key("name"));
        assert!(wizard.field_errors().contains_key("sector"));

        wizard
            .set_company_field("sector", &FieldValue::text("technology"))
            .unwrap();
        assert_eq!(wizard.next().unwrap(), true);
        assert_eq!(wizard.step(), WizardStep::AddressesContacts);
    }

    #[test]
    fn test_update_clears_recorded_error() {
        let mut wizard = create_wizard();
        wizard.next().unwrap();
        assert!(wizard.field_errors().contains_key("name"));
        wizard
            .set_company_field("name", &FieldValue::text("Acme"))
            .unwrap();
        assert!(!wizard.field_errors().contains_key("name"));
    }

    #[test]
    fn test_later_steps_never_block() {
        let mut wizard = create_wizard();
        fill_required(&mut wizard);
        for _ in 0..6 {
            assert_eq!(wizard.next().unwrap(), true);
        }
        assert_eq!(wizard.step(), WizardStep::NewsRelationships);
    }

    #[test]
    fn test_next_on_final_step_is_absent() {
        let mut wizard = create_wizard();
        fill_required(&mut wizard);
        for _ in 0..6 {
            wizard.next().unwrap();
        }
        assert!(matches!(
            wizard.next(),
            Err(WizardError::NoFurtherStep { .. })
        ));
    }

    #[test]
    fn test_previous_is_noop_at_first_step() {
        let mut wizard = create_wizard();
        wizard.previous().unwrap();
        assert_eq!(wizard.step(), WizardStep::CompanyIdentity);
    }

    #[test]
    fn test_previous_never_validates() {
        let mut wizard = create_wizard();
        fill_required(&mut wizard);
        wizard.next().unwrap();
        // Blank out a required field, then navigate backward.
        wizard
            .set_company_field("name", &FieldValue::text(""))
            .unwrap();
        wizard.previous().unwrap();
        assert_eq!(wizard.step(), WizardStep::CompanyIdentity);
    }

    #[test]
    fn test_create_draft_restores_state() {
        let drafts = SharedDrafts::default();
        {
            let mut wizard = Wizard::create(drafts.clone()).unwrap();
            wizard
                .set_company_field("name", &FieldValue::text("Acme"))
                .unwrap();
        }
        let restored = Wizard::create(drafts).unwrap();
        assert_eq!(restored.state().company.name, "Acme");
        assert_eq!(restored.step(), WizardStep::CompanyIdentity);
    }

    #[test]
    fn test_edit_draft_restores_step_only() {
        let drafts = SharedDrafts::default();
        let company = CompanyId::new();
        {
            let mut wizard =
                Wizard::edit(company, FormState::new(), drafts.clone()).unwrap();
            fill_required(&mut wizard);
            wizard.next().unwrap();
            wizard.next().unwrap();
        }
        let restored = Wizard::edit(company, FormState::new(), drafts).unwrap();
        assert_eq!(restored.step(), WizardStep::KeyOfficials);
        // Edit-mode drafts never carry form state.
        assert_eq!(restored.state().company.name, "");
    }

    #[tokio::test]
    async fn test_submit_before_final_step_rejected() {
        let mut wizard = create_wizard();
        fill_required(&mut wizard);
        let result = wizard
            .submit(|_state| async { Ok::<_, std::io::Error>(()) })
            .await;
        assert!(matches!(result, Err(WizardError::NotAtFinalStep { .. })));
        assert_eq!(wizard.phase(), WizardPhase::Editing);
    }

    #[tokio::test]
    async fn test_submit_success_clears_draft() {
        let drafts = SharedDrafts::default();
        let mut wizard = Wizard::create(drafts.clone()).unwrap();
        fill_required(&mut wizard);
        for _ in 0..6 {
            wizard.next().unwrap();
        }
        let outcome = wizard
            .submit(|state| async move { Ok::<_, std::io::Error>(state.company.name) })
            .await
            .unwrap();
        assert_eq!(outcome, "Acme");
        assert_eq!(wizard.phase(), WizardPhase::Succeeded);
        assert!(drafts.load(&SessionScope::Create).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submit_failure_retains_state_and_surfaces_one_message() {
        let drafts = SharedDrafts::default();
        let mut wizard = Wizard::create(drafts.clone()).unwrap();
        fill_required(&mut wizard);
        for _ in 0..6 {
            wizard.next().unwrap();
        }
        let result: Result<(), _> = wizard
            .submit(|_state| async {
                Err::<(), _>(std::io::Error::other("companies insert rejected"))
            })
            .await;
        assert!(matches!(result, Err(WizardError::SubmissionFailed { .. })));
        assert_eq!(wizard.phase(), WizardPhase::Failed);
        assert_eq!(
            wizard.submission_error(),
            Some("companies insert rejected")
        );
        // Form state, step, and draft all survive a failed submission.
        assert_eq!(wizard.state().company.name, "Acme");
        assert_eq!(wizard.step(), WizardStep::NewsRelationships);
        assert!(drafts.load(&SessionScope::Create).unwrap().is_some());
    }
}
