use anyhow::{anyhow, Result};
use tracing::info;

use crate::cli::display::format_date;
use crate::cli::ui::{confirm, find_company};
use crate::models::Company;
use crate::store::CompanyStore;

/// Execute the delete command
pub fn run_delete(store: &mut impl CompanyStore, identifier: &str, force: bool) -> Result<()> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(anyhow!("Identifier cannot be empty."));
    }

    let Some(company) = find_company(store.list(), identifier)? else {
        return Ok(());
    };

    print_summary(&company);
    println!();

    if !force && !confirm(&format!("Delete {}?", company.name))? {
        return Ok(());
    }

    store.delete(company.id)?;
    info!(id = %company.id, "deleted partner");
    println!("Deleted.");
    Ok(())
}

fn print_summary(company: &Company) {
    println!("{}", company.name);
    println!("  {}", company.identifier.display());
    println!("  {}", company.account_owner);
    if let Some(location) = company.address.city_region() {
        println!("  {}", location);
    }
    if !company.contact_history.is_empty() {
        println!(
            "  {} logged interactions (last {})",
            company.contact_history.len(),
            company
                .last_contact
                .map(format_date)
                .unwrap_or_else(|| "-".to_string())
        );
    }
}
