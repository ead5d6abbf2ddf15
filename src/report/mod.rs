//! Export artifacts: location CSV, summary table/CSV and a standalone HTML
//! report.

mod csv_export;
mod html;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::Company;
use crate::view::status_breakdown;

pub use csv_export::{write_location_csv, write_summary_csv};
pub use html::{escape_html, render_html};

/// Column headers of the summary table, in order.
pub const SUMMARY_HEADERS: [&str; 7] = [
    "Name",
    "Account owner",
    "Partnership contact",
    "Phone",
    "Status",
    "Commission",
    "Brokers",
];

/// One line of the partner summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub name: String,
    pub account_owner: String,
    /// Partnership contact, or the operational responsible when unset.
    pub partnership_contact: String,
    pub phone: String,
    pub status: String,
    pub commission: String,
    pub brokers: u32,
}

impl From<&Company> for SummaryRow {
    fn from(c: &Company) -> Self {
        Self {
            name: c.name.clone(),
            account_owner: c.account_owner.clone(),
            partnership_contact: c
                .partner_contact_or_responsible()
                .unwrap_or_default()
                .to_string(),
            phone: crate::validate::document::format_phone(&c.phone),
            status: c.status.label().to_string(),
            commission: format_commission(c.commission_rate),
            brokers: c.broker_count,
        }
    }
}

pub fn summary_rows(companies: &[Company]) -> Vec<SummaryRow> {
    companies.iter().map(SummaryRow::from).collect()
}

/// "N partners (M active)"
pub fn summary_headline(companies: &[Company]) -> String {
    let (active, _) = status_breakdown(companies);
    let noun = if companies.len() == 1 { "partner" } else { "partners" };
    format!("{} {} ({} active)", companies.len(), noun, active)
}

pub fn format_commission(rate: f64) -> String {
    format!("{}%", rate)
}

/// Timestamped file name for an export, e.g. `partner_map_20261019-143000.csv`.
pub fn export_file_name(stem: &str, extension: &str, at: NaiveDateTime) -> String {
    format!("{}_{}.{}", stem, at.format("%Y%m%d-%H%M%S"), extension)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{sample_draft, CompanyStatus};
    use chrono::NaiveDate;

    pub(crate) fn fixture() -> Vec<Company> {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let first = Company::from_draft(sample_draft(), today);

        let mut draft = sample_draft();
        draft.name = "Casa & Cia \"Prime\"".to_string();
        draft.partnership_contact = None;
        draft.responsible = Some("Rita".to_string());
        draft.broker_count = 3;
        draft.commission_rate = 4.5;
        draft.status = CompanyStatus::Inactive;
        let second = Company::from_draft(draft, today);

        vec![first, second]
    }

    #[test]
    fn test_summary_rows_fall_back_to_responsible() {
        let rows = summary_rows(&fixture());
        assert_eq!(rows[0].partnership_contact, "Marcos");
        assert_eq!(rows[1].partnership_contact, "Rita");
        assert_eq!(rows[0].phone, "(11) 99876-5432");
        assert_eq!(rows[0].commission, "5%");
        assert_eq!(rows[1].commission, "4.5%");
        assert_eq!(rows[1].status, "Inactive");
    }

    #[test]
    fn test_headline() {
        assert_eq!(summary_headline(&fixture()), "2 partners (1 active)");
        assert_eq!(summary_headline(&[]), "0 partners (0 active)");
    }

    #[test]
    fn test_export_file_name() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap();
        assert_eq!(
            export_file_name("partner_map", "csv", at),
            "partner_map_20261019-143005.csv"
        );
    }
}
