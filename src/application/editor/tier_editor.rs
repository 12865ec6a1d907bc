//! Tier ladder editor
//!
//! Holds the canonical tier list of one usage component while it is being
//! edited. Every accepted mutation re-runs the validator over the whole
//! ladder; the resulting report decides whether the component may be saved.

use rust_decimal::Decimal;
use tracing::{debug, error};

use crate::domain::tier::{
    is_field_editable, render_rows, Tier, TierPatch, TierReport, TierRow, TierValidator,
};
use crate::shared::errors::EditorError;

#[derive(Debug, Clone)]
pub struct TierEditor {
    tiers: Vec<Tier>,
    /// Upper bound the next appended tier starts from
    last_range_end: Option<Decimal>,
    validator: TierValidator,
    report: TierReport,
    error: Option<String>,
}

impl TierEditor {
    /// Start a new ladder with a single free tier from zero
    pub fn new(validator: TierValidator) -> Self {
        Self::from_tiers(vec![Tier::free(Decimal::ZERO)], validator)
    }

    /// Resume editing existing tiers; an empty list starts a new ladder
    pub fn from_tiers(mut tiers: Vec<Tier>, validator: TierValidator) -> Self {
        if tiers.is_empty() {
            return Self::new(validator);
        }
        tiers.iter_mut().for_each(Tier::normalize);
        let last_range_end = tiers.last().and_then(|t| t.range_end);
        let mut editor = Self {
            tiers,
            last_range_end,
            validator,
            report: TierReport::default(),
            error: None,
        };
        editor.revalidate();
        editor
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn last_range_end(&self) -> Option<Decimal> {
        self.last_range_end
    }

    pub fn report(&self) -> &TierReport {
        &self.report
    }

    /// Message currently blocking the user, if any
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.report.is_valid()
    }

    /// Table rows, with the delete action offered where [`Self::can_delete`] allows it
    pub fn rows(&self) -> Vec<TierRow> {
        render_rows(&self.tiers, |tier| self.can_delete(tier.range_start))
    }

    /// Append an open-ended flat tier after the remembered range end.
    pub fn append(&mut self) -> Result<(), EditorError> {
        let Some(previous_end) = self.last_range_end else {
            let err = EditorError::MissingRangeEnd;
            self.error = Some(err.to_string());
            record("append", false);
            return Err(err);
        };

        let Some(start) = self.validator.convention().next_start(previous_end) else {
            let err = EditorError::RangeExhausted(previous_end);
            self.error = Some(err.to_string());
            record("append", false);
            return Err(err);
        };
        self.tiers.push(Tier::flat(start, Decimal::ZERO));
        self.last_range_end = None;
        self.error = None;
        debug!(range_start = %start, tiers = self.tiers.len(), "Tier appended");

        self.revalidate();
        record("append", true);
        Ok(())
    }

    /// Apply a user edit to the tier starting at `range_start`.
    ///
    /// Fields the tier's current charge type does not expose are rejected
    /// before anything changes.
    pub fn edit(&mut self, range_start: Decimal, patch: TierPatch) -> Result<(), EditorError> {
        let index = self.position(range_start)?;
        let tier_type = &self.tiers[index].tier_type;

        if let Some(field) = patch
            .fields()
            .into_iter()
            .find(|f| !is_field_editable(tier_type, *f))
        {
            record("edit", false);
            return Err(EditorError::FieldNotEditable {
                field,
                tier_type: tier_type.clone(),
            });
        }

        // Rows are keyed by their start, so two tiers may never share one.
        if let Some(new_start) = patch.range_start {
            let taken = self
                .tiers
                .iter()
                .enumerate()
                .any(|(i, t)| i != index && t.range_start == new_start);
            if taken {
                record("edit", false);
                return Err(EditorError::DuplicateRangeStart(new_start));
            }
        }

        self.edit_in_place(index, patch);
        record("edit", true);
        Ok(())
    }

    fn edit_in_place(&mut self, index: usize, patch: TierPatch) {
        let tier = &mut self.tiers[index];
        patch.apply_to(tier);
        tier.normalize();
        self.last_range_end = tier.range_end;
        debug!(index, range_start = %tier.range_start, "Tier edited");
        self.revalidate();
    }

    /// Whether the delete action is offered for the tier at `range_start`
    pub fn can_delete(&self, range_start: Decimal) -> bool {
        self.tiers.len() > 1 && !range_start.is_zero()
    }

    pub fn delete(&mut self, range_start: Decimal) -> Result<(), EditorError> {
        if range_start.is_zero() {
            record("delete", false);
            return Err(EditorError::FirstTierLocked);
        }
        if self.tiers.len() <= 1 {
            record("delete", false);
            return Err(EditorError::LastRemainingTier);
        }
        let index = self.position(range_start)?;

        self.tiers.remove(index);
        self.last_range_end = self.tiers.last().and_then(|t| t.range_end);
        debug!(range_start = %range_start, tiers = self.tiers.len(), "Tier deleted");

        self.revalidate();
        record("delete", true);
        Ok(())
    }

    /// Hand over the ladder if it is valid
    pub fn finish(&self) -> Result<Vec<Tier>, EditorError> {
        match self.report.blocking_message() {
            Some(message) => Err(EditorError::InvalidTiers(message)),
            None => Ok(self.tiers.clone()),
        }
    }

    fn position(&self, range_start: Decimal) -> Result<usize, EditorError> {
        self.tiers
            .iter()
            .position(|t| t.range_start == range_start)
            .ok_or_else(|| {
                error!(
                    range_start = %range_start,
                    tiers = self.tiers.len(),
                    "Edit addressed a tier that does not exist"
                );
                EditorError::TierNotFound(range_start)
            })
    }

    fn revalidate(&mut self) {
        self.report = self.validator.validate(&self.tiers);
        self.error = self.report.blocking_message();
    }
}

fn record(op: &'static str, accepted: bool) {
    let outcome = if accepted { "accepted" } else { "rejected" };
    metrics::counter!("tier_editor_operations_total", "op" => op, "outcome" => outcome)
        .increment(1);
}

// ── Tests ──────────────────────────────────────────────────────
