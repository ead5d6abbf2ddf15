use anyhow::Result;

use crate::cli::display::company_line;
use crate::cli::ui::term_size;
use crate::cli::ListArgs;
use crate::store::CompanyStore;
use crate::view::filter_companies;

/// Columns other than the name take this many characters.
const FIXED_COLUMNS_WIDTH: usize = 70;

/// Execute the list command
pub fn run_list(store: &impl CompanyStore, args: &ListArgs) -> Result<()> {
    let criteria = args.filter.to_criteria()?;
    let matches = filter_companies(store.list(), &criteria);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        if store.list().is_empty() {
            println!("No partners yet. Add one with `partnerhub add`.");
        } else {
            println!("No matches.");
        }
        return Ok(());
    }

    let (width, _) = term_size();
    let name_width = width.saturating_sub(FIXED_COLUMNS_WIDTH).clamp(16, 40);

    for company in &matches {
        println!("{}", company_line(company, name_width));
    }

    if criteria.is_empty() {
        println!("\n{} partners", matches.len());
    } else {
        println!("\n{} of {} partners", matches.len(), store.list().len());
    }

    Ok(())
}
