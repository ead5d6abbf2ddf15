use anyhow::{anyhow, Result};
use chrono::Local;

use crate::cli::display::{format_date, history_line, history_newest_first};
use crate::cli::fields::parse_channel;
use crate::cli::ui::{find_company, non_empty, parse_date, prompt_field, FormResult};
use crate::cli::{HistoryArgs, HistoryCommand};
use crate::models::ContactHistoryEntry;
use crate::store::CompanyStore;

/// Execute the history command
pub fn run_history(store: &mut impl CompanyStore, args: &HistoryArgs) -> Result<()> {
    match &args.command {
        HistoryCommand::Add {
            identifier,
            summary,
            channel,
            date,
            notes,
            follow_up,
        } => {
            let Some(company) = find_company(store.list(), identifier)? else {
                return Ok(());
            };

            let summary = match non_empty(summary.clone()) {
                Some(s) => s,
                None => match prompt_field("summary", None)? {
                    FormResult::Value(v) if !v.trim().is_empty() => v,
                    FormResult::Value(_) => return Err(anyhow!("A summary is required.")),
                    FormResult::Cancelled => {
                        println!("Cancelled.");
                        return Ok(());
                    }
                },
            };

            let date = match date {
                Some(d) => parse_date(d)?,
                None => Local::now().date_naive(),
            };
            let mut entry = ContactHistoryEntry::new(date, parse_channel(channel)?, summary);
            entry.notes = non_empty(notes.clone());
            entry.follow_up = follow_up.as_deref().map(parse_date).transpose()?;

            let updated = store.add_interaction(company.id, entry)?;
            match updated.next_contact {
                Some(next) => println!("Logged. Next contact {}.", format_date(next)),
                None => println!("Logged."),
            }
        }
        HistoryCommand::List { identifier } => {
            let Some(company) = find_company(store.list(), identifier)? else {
                return Ok(());
            };

            println!("{}\n", company.name);
            if company.contact_history.is_empty() {
                println!("  No interactions logged.");
                return Ok(());
            }
            for entry in history_newest_first(&company.contact_history) {
                println!("  {}", history_line(entry));
                if let Some(ref notes) = entry.notes {
                    println!("    {}", notes);
                }
            }
        }
    }
    Ok(())
}
