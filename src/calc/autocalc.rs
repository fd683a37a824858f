use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::calc::payroll::PayrollDraftRow;

pub const DEFAULT_OVERTIME_THRESHOLD: f64 = 53.0;
pub const DEFAULT_OVERTIME_MULTIPLIER: f64 = 1.8;

/// Live-derivation toggles applied while a payroll row is being edited.
///
/// The two policies are independent: hour splitting moves everything above
/// `threshold` into overtime, rate derivation keeps the overtime rate at
/// `primary_rate * multiplier` (rounded to cents).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AutoCalcSettings {
    pub split_hours: bool,
    #[schema(example = 53.0)]
    pub threshold: f64,
    pub derive_overtime_rate: bool,
    #[schema(example = 1.8)]
    pub multiplier: f64,
}

impl Default for AutoCalcSettings {
    fn default() -> Self {
        Self {
            split_hours: true,
            threshold: DEFAULT_OVERTIME_THRESHOLD,
            derive_overtime_rate: true,
            multiplier: DEFAULT_OVERTIME_MULTIPLIER,
        }
    }
}

/// A single field edit on a draft row.
#[derive(Debug, Clone, Copy)]
pub enum Edit {
    PrimaryHours(f64),
    PrimaryRate(f64),
    OvertimeHours(f64),
}

/// Round half-up to two decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Apply one edit to a row under the active settings.
///
/// Ordering matters and is fixed: the threshold split runs first (it may
/// change the overtime-hours field), then the rate derivation reads the
/// resulting row. Both policies mutate the row in place; nothing else is
/// touched.
pub fn apply_edit(settings: &AutoCalcSettings, row: &mut PayrollDraftRow, edit: Edit) {
    match edit {
        Edit::PrimaryHours(entered) => {
            if settings.split_hours {
                row.primary_hours = entered.min(settings.threshold);
                row.overtime_hours = (entered - settings.threshold).max(0.0);
                // the split counts as an overtime-hours change
                refresh_overtime_rate(settings, row);
            } else {
                row.primary_hours = entered;
            }
        }
        Edit::PrimaryRate(entered) => {
            row.primary_rate = entered;
            refresh_overtime_rate(settings, row);
        }
        Edit::OvertimeHours(entered) => {
            row.overtime_hours = entered;
            refresh_overtime_rate(settings, row);
        }
    }
}

fn refresh_overtime_rate(settings: &AutoCalcSettings, row: &mut PayrollDraftRow) {
    if settings.derive_overtime_rate {
        row.overtime_rate = round2(row.primary_rate * settings.multiplier);
    }
}

/// Normalize a whole draft row as if its hours and rate had just been
/// entered under the active settings. Used by the server-side batch preview.
pub fn normalize_row(settings: &AutoCalcSettings, row: &PayrollDraftRow) -> PayrollDraftRow {
    let mut out = row.clone();
    let entered_hours = row.primary_hours + row.overtime_hours;
    apply_edit(settings, &mut out, Edit::PrimaryHours(entered_hours));
    apply_edit(settings, &mut out, Edit::PrimaryRate(row.primary_rate));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn threshold_splits_hours() {
        let settings = AutoCalcSettings::default();
        let mut row = PayrollDraftRow::default();
        apply_edit(&settings, &mut row, Edit::PrimaryHours(60.0));
        assert!((row.primary_hours - 53.0).abs() < EPS);
        assert!((row.overtime_hours - 7.0).abs() < EPS);
    }

    #[test]
    fn under_threshold_leaves_no_overtime() {
        let settings = AutoCalcSettings::default();
        let mut row = PayrollDraftRow::default();
        apply_edit(&settings, &mut row, Edit::PrimaryHours(40.0));
        assert!((row.primary_hours - 40.0).abs() < EPS);
        assert_eq!(row.overtime_hours, 0.0);
    }

    #[test]
    fn split_disabled_keeps_raw_value() {
        let settings = AutoCalcSettings {
            split_hours: false,
            ..Default::default()
        };
        let mut row = PayrollDraftRow {
            overtime_hours: 3.0,
            ..Default::default()
        };
        apply_edit(&settings, &mut row, Edit::PrimaryHours(60.0));
        assert!((row.primary_hours - 60.0).abs() < EPS);
        // overtime untouched when the split is off
        assert!((row.overtime_hours - 3.0).abs() < EPS);
    }

    #[test]
    fn rate_edit_derives_overtime_rate() {
        let settings = AutoCalcSettings::default();
        let mut row = PayrollDraftRow::default();
        apply_edit(&settings, &mut row, Edit::PrimaryRate(50.0));
        assert!((row.overtime_rate - 90.0).abs() < EPS);
    }

    #[test]
    fn derived_rate_rounds_half_up_to_cents() {
        let settings = AutoCalcSettings {
            multiplier: 1.5,
            ..Default::default()
        };
        let mut row = PayrollDraftRow::default();
        apply_edit(&settings, &mut row, Edit::PrimaryRate(33.33));
        assert!((row.overtime_rate - 50.0).abs() < EPS); // 49.995 -> 50.00
    }

    #[test]
    fn rate_derivation_disabled_keeps_manual_rate() {
        let settings = AutoCalcSettings {
            derive_overtime_rate: false,
            ..Default::default()
        };
        let mut row = PayrollDraftRow {
            overtime_rate: 77.0,
            ..Default::default()
        };
        apply_edit(&settings, &mut row, Edit::PrimaryRate(50.0));
        assert!((row.overtime_rate - 77.0).abs() < EPS);
    }

    #[test]
    fn hours_split_triggers_rate_derivation() {
        let settings = AutoCalcSettings::default();
        let mut row = PayrollDraftRow {
            primary_rate: 50.0,
            ..Default::default()
        };
        apply_edit(&settings, &mut row, Edit::PrimaryHours(60.0));
        assert!((row.overtime_rate - 90.0).abs() < EPS);
    }

    #[test]
    fn normalize_row_applies_both_policies() {
        let settings = AutoCalcSettings::default();
        let row = PayrollDraftRow {
            name: "Ana".into(),
            primary_hours: 60.0,
            primary_rate: 50.0,
            ..Default::default()
        };
        let out = normalize_row(&settings, &row);
        assert!((out.primary_hours - 53.0).abs() < EPS);
        assert!((out.overtime_hours - 7.0).abs() < EPS);
        assert!((out.overtime_rate - 90.0).abs() < EPS);
    }
}
