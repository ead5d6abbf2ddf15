use anyhow::Result;

use crate::cli::fields::parse_status;
use crate::cli::ui::{find_company, prompt_field, FormResult};
use crate::cli::EditArgs;
use crate::models::{Company, CompanyPatch};
use crate::store::CompanyStore;

/// Execute the edit command
pub fn run_edit(store: &mut impl CompanyStore, args: &EditArgs) -> Result<()> {
    let Some(company) = find_company(store.list(), &args.identifier)? else {
        return Ok(());
    };

    let patch = if args.fields.is_empty() && args.clear.is_empty() {
        match interactive_patch(&company)? {
            Some(patch) => patch,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    } else {
        args.fields.to_patch(&company, &args.clear)?
    };

    if patch.is_empty() {
        println!("No changes.");
        return Ok(());
    }

    store.edit(company.id, patch)?;
    println!("Saved.");
    Ok(())
}

/// Walk the common fields, keeping the current value on empty input.
/// Returns None when cancelled.
fn interactive_patch(company: &Company) -> Result<Option<CompanyPatch>> {
    macro_rules! ask {
        ($label:expr, $current:expr) => {
            match prompt_field($label, $current)? {
                FormResult::Value(v) => v,
                FormResult::Cancelled => return Ok(None),
            }
        };
    }

    let name = ask!("name", Some(company.name.as_str()));
    let owner = ask!("account owner", Some(company.account_owner.as_str()));
    let partner = ask!("partner contact", company.partnership_contact.as_deref());
    let responsible = ask!("responsible", company.responsible.as_deref());
    let email = ask!("email", Some(company.email.as_str()));
    let phone = ask!("phone", Some(company.phone.as_str()));
    let website = ask!("website", company.website.as_deref());
    let brokers = ask!("brokers", Some(company.broker_count.to_string().as_str()));
    let commission = ask!("commission", Some(company.commission_rate.to_string().as_str()));
    let status = ask!("status", Some(company.status.as_str()));
    let notes = ask!("notes", company.notes.as_deref());

    let mut patch = CompanyPatch::default();
    let changed = |new: &str, old: &str| new != old;

    if changed(&name, &company.name) {
        patch.name = Some(name);
    }
    if changed(&owner, &company.account_owner) {
        patch.account_owner = Some(owner);
    }
    if changed(&partner, company.partnership_contact.as_deref().unwrap_or("")) {
        patch.partnership_contact = Some(Some(partner));
    }
    if changed(&responsible, company.responsible.as_deref().unwrap_or("")) {
        patch.responsible = Some(Some(responsible));
    }
    if changed(&email, &company.email) {
        patch.email = Some(email);
    }
    if changed(&phone, &company.phone) {
        patch.phone = Some(phone);
    }
    if changed(&website, company.website.as_deref().unwrap_or("")) {
        patch.website = Some(Some(website));
    }
    if changed(&brokers, &company.broker_count.to_string()) {
        patch.broker_count = Some(brokers.parse()?);
    }
    if changed(&commission, &company.commission_rate.to_string()) {
        patch.commission_rate = Some(commission.replace(',', ".").parse()?);
    }
    if changed(&status, company.status.as_str()) {
        patch.status = Some(parse_status(&status)?);
    }
    if changed(&notes, company.notes.as_deref().unwrap_or("")) {
        patch.notes = Some(Some(notes));
    }

    Ok(Some(patch))
}
