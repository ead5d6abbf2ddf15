use chrono::NaiveDate;

use crate::cli::ui::{short_id, truncate};
use crate::models::{Company, ContactHistoryEntry};
use crate::validate::document::{format_phone, format_postal_code};

/// `19/10/2026`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn print_field(label: &str, value: &str) {
    if !value.trim().is_empty() {
        println!("  {:<20}{}", label, value);
    }
}

/// Print a full partner record (only non-empty fields)
pub fn print_company_detail(company: &Company) {
    println!("{}", company.name);
    println!("  {}  {}\n", company.id, company.status.label());

    let kind = company.identifier.kind().as_str().to_uppercase();
    print_field(&kind, &company.identifier.display());
    print_field("account owner", &company.account_owner);
    print_field("partner contact", company.partnership_contact.as_deref().unwrap_or(""));
    print_field("responsible", company.responsible.as_deref().unwrap_or(""));
    print_field("email", &company.email);
    print_field("phone", &format_phone(&company.phone));
    print_field("website", company.website.as_deref().unwrap_or(""));

    if !company.address.is_empty() {
        print_field("address", &company.address.to_string());
    }
    print_field("postal code", &format_postal_code(&company.postal_code));
    print_field(
        "location",
        &format!("{:.5}, {:.5}", company.location.lat, company.location.lng),
    );

    print_field("brokers", &company.broker_count.to_string());
    print_field("commission", &format!("{}%", company.commission_rate));
    print_field("registered", &format_date(company.registered_on));

    if let Some(date) = company.last_contact {
        let channel = company
            .last_contact_channel
            .map(|c| format!(" ({})", c.label()))
            .unwrap_or_default();
        print_field("last contact", &format!("{}{}", format_date(date), channel));
    }
    print_field("contact summary", company.contact_summary.as_deref().unwrap_or(""));
    if let Some(date) = company.next_contact {
        print_field("next contact", &format_date(date));
    }
    print_field("notes", company.notes.as_deref().unwrap_or(""));

    if !company.contact_history.is_empty() {
        println!("\n  history ({})", company.contact_history.len());
        for entry in history_newest_first(&company.contact_history).iter().take(5) {
            println!("    {}", history_line(entry));
        }
    }
}

/// One-line summary used by `list`: short ID, name, document, owner, status.
pub fn company_line(company: &Company, name_width: usize) -> String {
    format!(
        "{}  {:<width$}  {:<18}  {:<16}  {:>4}  {:>6}  {}",
        short_id(company.id),
        truncate(&company.name, name_width),
        company.identifier.display(),
        truncate(&company.account_owner, 16),
        company.broker_count,
        format!("{}%", company.commission_rate),
        company.status.label(),
        width = name_width,
    )
}

pub fn history_line(entry: &ContactHistoryEntry) -> String {
    let mut line = format!(
        "{}  {:<10}  {}",
        format_date(entry.date),
        entry.channel.label(),
        entry.summary
    );
    if let Some(follow_up) = entry.follow_up {
        line.push_str(&format!("  (follow-up {})", format_date(follow_up)));
    }
    line
}

/// Interactions sorted by date, newest first; ties keep logging order.
pub fn history_newest_first(history: &[ContactHistoryEntry]) -> Vec<&ContactHistoryEntry> {
    let mut entries: Vec<&ContactHistoryEntry> = history.iter().collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}
