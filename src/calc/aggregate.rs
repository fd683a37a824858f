use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use utoipa::ToSchema;

/// Label used when a row has no value in the name column.
pub const UNNAMED: &str = "(unnamed)";

/// Column-name fragments that mark a period-like column (week label, month,
/// date, year). Spanish first: that is what the captured sheets use.
const PERIOD_HINTS: &[&str] = &[
    "periodo", "semana", "mes", "fecha", "anio", "año", "period", "week", "month", "date", "year",
];

/// A loosely-typed row, as flattened from captured payroll batches.
pub type Row = Map<String, Value>;

fn stringify(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Numeric coercion for hand-entered data: numbers pass through, numeric
/// strings parse, everything else contributes 0. Never NaN.
fn coerce_number(v: Option<&Value>) -> f64 {
    match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Rows sampled when sniffing whether a column is numeric.
const NUMERIC_SAMPLE: usize = 150;

/// A column is numeric when its sampled non-empty values all look like
/// numbers (JSON numbers or numeric strings). Columns with no values at all
/// are not numeric.
pub fn is_numeric_column(rows: &[Row], column: &str) -> bool {
    let mut seen = false;
    for row in rows.iter().take(NUMERIC_SAMPLE) {
        match row.get(column) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) if s.is_empty() => {}
            Some(Value::Number(_)) => seen = true,
            Some(Value::String(s)) if s.trim().parse::<f64>().is_ok() => seen = true,
            _ => return false,
        }
    }
    seen
}

/// Numeric columns in first-row key order; candidates for an amount column.
pub fn numeric_columns(rows: &[Row]) -> Vec<String> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    first
        .keys()
        .filter(|c| is_numeric_column(rows, c))
        .cloned()
        .collect()
}

/// Count of unique non-empty stringified values in a column.
pub fn distinct_count(rows: &[Row], field: &str) -> usize {
    let mut seen: HashSet<String> = rows.iter().map(|r| stringify(r.get(field))).collect();
    seen.remove("");
    seen.len()
}

/// Sum over a numeric column; malformed values count as 0.
pub fn sum_field(rows: &[Row], field: &str) -> f64 {
    rows.iter().map(|r| coerce_number(r.get(field))).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NameTotal {
    pub name: String,
    pub total: f64,
}

/// Group rows by the name column, sum the amount column per group, and
/// return the top `n` by total. The sort is stable descending, so ties keep
/// first-encounter order; rows without a name fall under [`UNNAMED`].
pub fn top_n(rows: &[Row], name_field: &str, amount_field: &str, n: usize) -> Vec<NameTotal> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for row in rows {
        let mut name = stringify(row.get(name_field));
        if name.is_empty() {
            name = UNNAMED.to_string();
        }
        let amount = coerce_number(row.get(amount_field));
        if !totals.contains_key(&name) {
            order.push(name.clone());
        }
        *totals.entry(name).or_insert(0.0) += amount;
    }

    let mut ranked: Vec<NameTotal> = order
        .into_iter()
        .map(|name| {
            let total = totals[&name];
            NameTotal { name, total }
        })
        .collect();
    ranked.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(n);
    ranked
}

/// Detect a period-like column among the known columns, by name fragment.
pub fn detect_period_column(columns: &[String]) -> Option<String> {
    columns
        .iter()
        .find(|c| {
            let lc = c.to_lowercase();
            PERIOD_HINTS.iter().any(|hint| lc.contains(hint))
        })
        .cloned()
}

/// Restrict rows to those whose period column stringifies exactly to `period`.
pub fn filter_period(rows: Vec<Row>, column: &str, period: &str) -> Vec<Row> {
    rows.into_iter()
        .filter(|r| stringify(r.get(column)) == period)
        .collect()
}

/// Distinct period values in encounter order, empty values dropped, sorted.
pub fn period_values(rows: &[Row], column: &str) -> Vec<String> {
    let mut values: Vec<String> = rows
        .iter()
        .map(|r| stringify(r.get(column)))
        .filter(|s| !s.is_empty())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    values.sort();
    values
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeekEmployeeSummary {
    #[schema(example = "Juan Pérez")]
    pub name: String,
    pub hours_total: f64,
    pub record_count: u64,
}

/// Group (name, hours) pairs by name, alphabetically. Shared by the
/// close-week endpoint so the served summary and any client-side fallback
/// agree on grouping and order.
pub fn summarize_week<'a, I>(entries: I) -> Vec<WeekEmployeeSummary>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut grouped: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    for (name, hours) in entries {
        let slot = grouped.entry(name.to_string()).or_insert((0.0, 0));
        slot.0 += hours;
        slot.1 += 1;
    }
    grouped
        .into_iter()
        .map(|(name, (hours_total, record_count))| WeekEmployeeSummary {
            name,
            hours_total,
            record_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EPS: f64 = 1e-9;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn sample_rows() -> Vec<Row> {
        vec![
            row(&[("name", json!("A")), ("amt", json!(10))]),
            row(&[("name", json!("B")), ("amt", json!(30))]),
            row(&[("name", json!("A")), ("amt", json!(5))]),
        ]
    }

    #[test]
    fn numeric_columns_follow_first_row_key_order() {
        let rows = vec![
            row(&[
                ("name", json!("A")),
                ("amt", json!(10)),
                ("hours", json!("8.5")),
            ]),
            row(&[
                ("name", json!("B")),
                ("amt", json!(30)),
                ("hours", json!("")),
            ]),
        ];
        assert_eq!(numeric_columns(&rows), vec!["amt", "hours"]);
    }

    #[test]
    fn numeric_column_rejects_mixed_values() {
        let rows = vec![
            row(&[("amt", json!(10))]),
            row(&[("amt", json!("n/a"))]),
        ];
        assert!(!is_numeric_column(&rows, "amt"));
    }

    #[test]
    fn numeric_column_needs_at_least_one_value() {
        let rows = vec![
            row(&[("amt", Value::Null)]),
            row(&[("amt", json!(""))]),
            row(&[]),
        ];
        assert!(!is_numeric_column(&rows, "amt"));
        assert_eq!(numeric_columns(&[]), Vec::<String>::new());
    }

    #[test]
    fn distinct_count_skips_empty() {
        let rows = vec![
            row(&[("name", json!("A"))]),
            row(&[("name", json!(""))]),
            row(&[("name", json!("B"))]),
            row(&[("name", Value::Null)]),
            row(&[("name", json!("A"))]),
        ];
        assert_eq!(distinct_count(&rows, "name"), 2);
    }

    #[test]
    fn sum_coerces_malformed_to_zero() {
        let rows = vec![
            row(&[("amt", json!(10))]),
            row(&[("amt", json!("2.5"))]),
            row(&[("amt", json!("n/a"))]),
            row(&[("amt", Value::Null)]),
            row(&[]),
        ];
        assert!((sum_field(&rows, "amt") - 12.5).abs() < EPS);
    }

    #[test]
    fn top_n_groups_and_ranks() {
        let ranked = top_n(&sample_rows(), "name", "amt", 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "B");
        assert!((ranked[0].total - 30.0).abs() < EPS);
        assert_eq!(ranked[1].name, "A");
        assert!((ranked[1].total - 15.0).abs() < EPS);
    }

    #[test]
    fn top_n_ties_keep_encounter_order() {
        let rows = vec![
            row(&[("name", json!("X")), ("amt", json!(10))]),
            row(&[("name", json!("Y")), ("amt", json!(10))]),
            row(&[("name", json!("Z")), ("amt", json!(10))]),
        ];
        let ranked = top_n(&rows, "name", "amt", 3);
        let names: Vec<&str> = ranked.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["X", "Y", "Z"]);
    }

    #[test]
    fn top_n_missing_name_uses_sentinel() {
        let rows = vec![
            row(&[("amt", json!(40))]),
            row(&[("name", json!("A")), ("amt", json!(10))]),
        ];
        let ranked = top_n(&rows, "name", "amt", 5);
        assert_eq!(ranked[0].name, UNNAMED);
        assert!((ranked[0].total - 40.0).abs() < EPS);
    }

    #[test]
    fn period_column_detection() {
        let columns = vec!["name".to_string(), "week_label".to_string()];
        assert_eq!(detect_period_column(&columns), Some("week_label".into()));
        let none = vec!["name".to_string(), "amt".to_string()];
        assert_eq!(detect_period_column(&none), None);
    }

    #[test]
    fn period_filter_is_exact_match() {
        let rows = vec![
            row(&[("semana", json!("Semana 1")), ("amt", json!(1))]),
            row(&[("semana", json!("Semana 10")), ("amt", json!(2))]),
        ];
        let kept = filter_period(rows, "semana", "Semana 1");
        assert_eq!(kept.len(), 1);
        assert!((sum_field(&kept, "amt") - 1.0).abs() < EPS);
    }

    #[test]
    fn summarize_week_of_nothing_is_empty() {
        let summary = summarize_week(std::iter::empty());
        assert!(summary.is_empty());
    }

    #[test]
    fn summarize_week_groups_alphabetically() {
        let entries = [("Luis", 8.0), ("Ana", 9.0), ("Luis", 7.5), ("Ana", 8.0)];
        let summary = summarize_week(entries.iter().map(|(n, h)| (*n, *h)));
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].name, "Ana");
        assert!((summary[0].hours_total - 17.0).abs() < EPS);
        assert_eq!(summary[0].record_count, 2);
        assert_eq!(summary[1].name, "Luis");
        assert!((summary[1].hours_total - 15.5).abs() < EPS);
    }
}
