use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One editable payroll row as entered in the capture table.
///
/// Every numeric field defaults to 0 so partially-filled rows deserialize
/// cleanly from the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PayrollDraftRow {
    #[schema(example = "Juan Pérez")]
    pub name: String,
    #[schema(example = 48.0)]
    pub primary_hours: f64,
    #[schema(example = 7.0)]
    pub overtime_hours: f64,
    #[schema(example = 50.0)]
    pub primary_rate: f64,
    #[schema(example = 90.0)]
    pub overtime_rate: f64,
    pub weekly_bonus: f64,
    pub monthly_bonus: f64,
    pub commission: f64,
    pub deductions: f64,
    pub pending_deduction: f64,
    pub base_weekly_pay: f64,
    pub note: Option<String>,
}

/// Fully derived payroll figures for one employee for one pay period.
///
/// The cumulative `total_with_*` fields keep every intermediate subtotal
/// inspectable in the captured batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PayrollEmployeeRecord {
    pub name: String,
    pub total_hours: f64,
    pub primary_hours: f64,
    pub overtime_hours: f64,
    pub primary_rate: f64,
    pub overtime_rate: f64,
    pub primary_pay: f64,
    pub overtime_pay: f64,
    pub base_weekly_pay: f64,
    pub deductions: f64,
    pub pending_deduction: f64,
    pub net_after_deductions: f64,
    pub weekly_bonus: f64,
    pub total_with_weekly_bonus: f64,
    pub monthly_bonus: f64,
    pub total_with_monthly_bonus: f64,
    pub commission: f64,
    pub total_with_commission: f64,
    pub note: Option<String>,
    pub final_total: f64,
}

impl Default for PayrollEmployeeRecord {
    fn default() -> Self {
        derive(&PayrollDraftRow::default())
    }
}

/// One captured pay period: a week label, the derived employee records and
/// the grand total over them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollBatch {
    #[schema(example = "Semana 34")]
    pub week_label: String,
    pub employees: Vec<PayrollEmployeeRecord>,
    pub grand_total: f64,
}

/// Compute every dependent monetary figure from a draft row.
///
/// Pure arithmetic: `final_total` always equals
/// `primary_pay + overtime_pay - deductions + weekly_bonus + monthly_bonus + commission`.
pub fn derive(row: &PayrollDraftRow) -> PayrollEmployeeRecord {
    let primary_pay = row.primary_hours * row.primary_rate;
    let overtime_pay = row.overtime_hours * row.overtime_rate;
    let net_after_deductions = primary_pay + overtime_pay - row.deductions;
    let total_with_weekly_bonus = net_after_deductions + row.weekly_bonus;
    let total_with_monthly_bonus = total_with_weekly_bonus + row.monthly_bonus;
    let total_with_commission = total_with_monthly_bonus + row.commission;

    PayrollEmployeeRecord {
        name: row.name.clone(),
        total_hours: row.primary_hours + row.overtime_hours,
        primary_hours: row.primary_hours,
        overtime_hours: row.overtime_hours,
        primary_rate: row.primary_rate,
        overtime_rate: row.overtime_rate,
        primary_pay,
        overtime_pay,
        base_weekly_pay: row.base_weekly_pay,
        deductions: row.deductions,
        pending_deduction: row.pending_deduction,
        net_after_deductions,
        weekly_bonus: row.weekly_bonus,
        total_with_weekly_bonus,
        monthly_bonus: row.monthly_bonus,
        total_with_monthly_bonus,
        commission: row.commission,
        total_with_commission,
        note: row.note.clone(),
        final_total: total_with_commission,
    }
}

/// Sum of `final_total` over a set of derived records.
pub fn grand_total(employees: &[PayrollEmployeeRecord]) -> f64 {
    employees.iter().map(|e| e.final_total).sum()
}

/// Build a submittable batch from draft rows.
///
/// Rows with an empty or whitespace-only name are silently excluded.
pub fn build_batch(week_label: &str, drafts: &[PayrollDraftRow]) -> PayrollBatch {
    let employees: Vec<PayrollEmployeeRecord> = drafts
        .iter()
        .filter(|d| !d.name.trim().is_empty())
        .map(derive)
        .collect();
    let grand_total = grand_total(&employees);

    PayrollBatch {
        week_label: week_label.to_string(),
        employees,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sample_row(name: &str) -> PayrollDraftRow {
        PayrollDraftRow {
            name: name.to_string(),
            primary_hours: 48.0,
            overtime_hours: 7.0,
            primary_rate: 50.0,
            overtime_rate: 90.0,
            weekly_bonus: 200.0,
            monthly_bonus: 300.0,
            commission: 150.0,
            deductions: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn derive_computes_pays() {
        let rec = derive(&sample_row("Ana"));
        assert!((rec.primary_pay - 2400.0).abs() < EPS);
        assert!((rec.overtime_pay - 630.0).abs() < EPS);
        assert!((rec.total_hours - 55.0).abs() < EPS);
        assert!((rec.net_after_deductions - 2930.0).abs() < EPS);
    }

    #[test]
    fn cumulative_subtotals_remain_inspectable() {
        let rec = derive(&sample_row("Ana"));
        assert!((rec.total_with_weekly_bonus - 3130.0).abs() < EPS);
        assert!((rec.total_with_monthly_bonus - 3430.0).abs() < EPS);
        assert!((rec.total_with_commission - 3580.0).abs() < EPS);
        assert!((rec.final_total - rec.total_with_commission).abs() < EPS);
    }

    #[test]
    fn final_total_invariant() {
        let rows = [
            sample_row("Ana"),
            PayrollDraftRow {
                name: "Luis".into(),
                primary_hours: 53.0,
                primary_rate: 62.5,
                deductions: 250.0,
                ..Default::default()
            },
            PayrollDraftRow::default(),
        ];
        for row in &rows {
            let rec = derive(row);
            let expected = rec.primary_pay + rec.overtime_pay - row.deductions
                + row.weekly_bonus
                + row.monthly_bonus
                + row.commission;
            assert!(
                (rec.final_total - expected).abs() < EPS,
                "invariant broken for {:?}",
                row.name
            );
        }
    }

    #[test]
    fn build_batch_skips_blank_names() {
        let drafts = [
            sample_row("Ana"),
            sample_row("   "),
            sample_row(""),
            sample_row("Luis"),
        ];
        let batch = build_batch("Semana 1", &drafts);
        assert_eq!(batch.employees.len(), 2);
        assert_eq!(batch.employees[0].name, "Ana");
        assert_eq!(batch.employees[1].name, "Luis");
    }

    #[test]
    fn batch_grand_total_is_sum_of_finals() {
        let drafts = [sample_row("Ana"), sample_row("Luis")];
        let batch = build_batch("Semana 1", &drafts);
        let expected: f64 = batch.employees.iter().map(|e| e.final_total).sum();
        assert!((batch.grand_total - expected).abs() < EPS);
    }
}
