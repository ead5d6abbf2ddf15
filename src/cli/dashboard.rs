use anyhow::Result;
use chrono::{Local, NaiveDate};

use crate::cli::display::format_date;
use crate::cli::ui::{short_id, truncate};
use crate::models::Company;
use crate::store::CompanyStore;
use crate::view::{
    account_owner_suggestions, dashboard_stats, partnership_contact_suggestions,
    upcoming_contacts,
};

/// Execute the dashboard command
pub fn run_dashboard(store: &impl CompanyStore) -> Result<()> {
    let today = Local::now().date_naive();
    print!("{}", render_dashboard(store.list(), today));
    Ok(())
}

/// Dashboard text for the given day.
pub fn render_dashboard(companies: &[Company], today: NaiveDate) -> String {
    let stats = dashboard_stats(companies);
    let mut out = String::new();

    out.push_str(&format!("partners      {}\n", stats.total_companies));
    out.push_str(&format!("brokers       {}\n", stats.total_brokers));
    out.push_str(&format!("avg brokers   {}\n", stats.avg_brokers));
    out.push_str(&format!("active        {}%\n", stats.active_percentage));

    out.push_str("\nupcoming follow-ups\n");
    let upcoming = upcoming_contacts(companies, today);
    if upcoming.is_empty() {
        out.push_str("  none scheduled\n");
    }
    for c in upcoming {
        if let Some(next) = c.next_contact {
            let when = if next == today {
                "today".to_string()
            } else {
                format_date(next)
            };
            out.push_str(&format!(
                "  {:<10}  {}  {}\n",
                when,
                short_id(c.id),
                truncate(&c.name, 40)
            ));
        }
    }

    let owners = account_owner_suggestions(companies);
    if !owners.is_empty() {
        out.push_str(&format!("\naccount owners\n  {}\n", owners.join(", ")));
    }
    let contacts = partnership_contact_suggestions(companies);
    if !contacts.is_empty() {
        out.push_str(&format!("\npartner contacts\n  {}\n", contacts.join(", ")));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_draft;

    #[test]
    fn test_empty_dashboard() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let text = render_dashboard(&[], today);
        assert!(text.contains("partners      0"));
        assert!(text.contains("active        0%"));
        assert!(text.contains("none scheduled"));
        assert!(!text.contains("account owners"));
    }

    #[test]
    fn test_dashboard_lists_follow_ups() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut due_today = Company::from_draft(sample_draft(), today);
        due_today.next_contact = Some(today);
        let mut later = Company::from_draft(sample_draft(), today);
        later.name = "Later Ltda".to_string();
        later.next_contact = today.succ_opt();

        let text = render_dashboard(&[later, due_today], today);
        let today_pos = text.find("today").unwrap();
        let later_pos = text.find("20/10/2026").unwrap();
        assert!(today_pos < later_pos);
        assert!(text.contains("partners      2"));
        assert!(text.contains("brokers       24"));
        assert!(text.contains("account owners\n  Ana"));
    }
}
