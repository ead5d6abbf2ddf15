use anyhow::Result;

use crate::cli::ui::{find_company, short_id};
use crate::store::CompanyStore;

/// Execute the duplicate command
pub fn run_duplicate(store: &mut impl CompanyStore, identifier: &str) -> Result<()> {
    let Some(source) = find_company(store.list(), identifier)? else {
        return Ok(());
    };

    let copy = store.duplicate(source.id)?;
    println!("Created: {} ({})", copy.name, short_id(copy.id));
    Ok(())
}
