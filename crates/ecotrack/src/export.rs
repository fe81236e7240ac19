//! CSV export of filtered emission records.
//!
//! The export applies the same filter pipeline as reporting, so the
//! file always matches what a report over the same filter would show,
//! window fallback included. Every field is double-quoted with internal
//! quotes doubled, and rows are joined with `\n` without a trailing
//! newline.

use chrono::NaiveDate;
use tracing::debug;

use crate::activity::EmissionRecord;
use crate::analytics::{filter_records, ReportFilter};
use crate::error::{Error, Result};

/// Column headers, in output order.
const HEADERS: [&str; 5] = [
    "Date",
    "Category",
    "Type",
    "Amount (kg CO₂e)",
    "Description",
];

/// Render the filtered records as CSV text.
///
/// Produces one header line plus one line per record. Amounts are
/// written in plain number form (`115.5`, not `115.50`).
///
/// # Errors
///
/// Returns [`Error::ExportEmpty`] when no records match the filter.
pub fn export_csv(
    records: &[EmissionRecord],
    today: NaiveDate,
    filter: &ReportFilter,
) -> Result<String> {
    let filtered = filter_records(records, today, filter);
    if filtered.records.is_empty() {
        return Err(Error::ExportEmpty);
    }

    let mut lines = Vec::with_capacity(filtered.records.len() + 1);
    lines.push(HEADERS.map(csv_field).join(","));
    for record in &filtered.records {
        let row = [
            record.date.to_string(),
            record.category.to_string(),
            record.kind.clone(),
            record.amount.to_string(),
            record.description.clone(),
        ];
        lines.push(row.map(|cell| csv_field(&cell)).join(","));
    }

    debug!("Exported {} records to CSV", filtered.records.len());
    Ok(lines.join("\n"))
}

/// The suggested file name for an export with the given filter.
///
/// Follows the pattern `emissions-{range}-{category}-{date}.csv`, with
/// the date in ISO form.
#[must_use]
pub fn export_filename(filter: &ReportFilter, date: NaiveDate) -> String {
    format!(
        "emissions-{}-{}-{date}.csv",
        filter.range, filter.category
    )
}

/// Quote a single field, doubling any embedded quotes.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityDetails, Category};
    use crate::analytics::{CategoryFilter, ReportRange};

    fn create_test_record(
        id: i64,
        date: (i32, u32, u32),
        category: Category,
        kind: &str,
        amount: f64,
        description: &str,
    ) -> EmissionRecord {
        EmissionRecord {
            id,
            user_id: 1,
            category,
            kind: kind.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: description.to_string(),
            details: ActivityDetails::None,
        }
    }

    fn create_test_records() -> Vec<EmissionRecord> {
        vec![
            create_test_record(
                1,
                (2025, 2, 10),
                Category::Transportation,
                "car",
                115.5,
                "Commute",
            ),
            create_test_record(2, (2025, 2, 12), Category::Food, "beef", 120.0, "Roast"),
            create_test_record(
                3,
                (2025, 2, 14),
                Category::Energy,
                "electricity",
                156.8,
                "Monthly bill",
            ),
        ]
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 15).unwrap()
    }

    /// Minimal quoted-CSV line parser for round-trip checks.
    fn parse_line(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        current.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '"' => in_quotes = true,
                ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
                c => current.push(c),
            }
        }
        fields.push(current);
        fields
    }

    #[test]
    fn test_header_row() {
        let csv = export_csv(&create_test_records(), today(), &ReportFilter::default()).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "\"Date\",\"Category\",\"Type\",\"Amount (kg CO₂e)\",\"Description\""
        );
    }

    #[test]
    fn test_one_line_per_record() {
        let records = create_test_records();
        let csv = export_csv(&records, today(), &ReportFilter::default()).unwrap();
        assert_eq!(csv.lines().count(), records.len() + 1);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_row_fields_in_order() {
        let records = vec![create_test_record(
            1,
            (2025, 2, 10),
            Category::Transportation,
            "car",
            115.5,
            "Commute",
        )];
        let csv = export_csv(&records, today(), &ReportFilter::default()).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            parse_line(row),
            vec!["2025-02-10", "transportation", "car", "115.5", "Commute"]
        );
    }

    #[test]
    fn test_quotes_round_trip() {
        let description = "Said \"less beef\" at dinner";
        let records = vec![create_test_record(
            1,
            (2025, 2, 12),
            Category::Food,
            "beef",
            60.0,
            description,
        )];
        let csv = export_csv(&records, today(), &ReportFilter::default()).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert!(row.contains("\"\"less beef\"\""));
        assert_eq!(parse_line(row)[4], description);
    }

    #[test]
    fn test_amounts_in_plain_number_form() {
        let csv = export_csv(&create_test_records(), today(), &ReportFilter::default()).unwrap();
        let amounts: Vec<String> = csv
            .lines()
            .skip(1)
            .map(|line| parse_line(line)[3].clone())
            .collect();
        assert_eq!(amounts, vec!["115.5", "120", "156.8"]);
    }

    #[test]
    fn test_respects_category_filter() {
        let filter = ReportFilter::new(ReportRange::Month, CategoryFilter::Only(Category::Food));
        let csv = export_csv(&create_test_records(), today(), &filter).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert_eq!(parse_line(csv.lines().nth(1).unwrap())[1], "food");
    }

    #[test]
    fn test_window_fallback_records_exported() {
        // All records predate the week window; the unwindowed set ships.
        let records = create_test_records();
        let filter = ReportFilter::new(ReportRange::Week, CategoryFilter::All);
        let csv = export_csv(&records, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), &filter)
            .unwrap();
        assert_eq!(csv.lines().count(), records.len() + 1);
    }

    #[test]
    fn test_empty_export_is_an_error() {
        let err = export_csv(&[], today(), &ReportFilter::default()).unwrap_err();
        assert!(err.is_export_empty());

        let filter = ReportFilter::new(ReportRange::Month, CategoryFilter::Only(Category::Other));
        let err = export_csv(&create_test_records(), today(), &filter).unwrap_err();
        assert!(err.is_export_empty());
    }

    #[test]
    fn test_filename_pattern() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();
        assert_eq!(
            export_filename(&ReportFilter::default(), date),
            "emissions-month-all-2025-02-15.csv"
        );

        let filter = ReportFilter::new(ReportRange::Week, CategoryFilter::Only(Category::Food));
        assert_eq!(
            export_filename(&filter, date),
            "emissions-week-food-2025-02-15.csv"
        );
    }
}
