use anyhow::Result;

use crate::cli::display::print_company_detail;
use crate::cli::ui::find_company;
use crate::store::CompanyStore;

/// Execute the show command
pub fn run_show(store: &impl CompanyStore, identifier: &str) -> Result<()> {
    if let Some(company) = find_company(store.list(), identifier)? {
        print_company_detail(&company);
    }
    Ok(())
}
