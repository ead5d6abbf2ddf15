use anyhow::Result;

use crate::cli::ui::confirm;
use crate::cli::{ConfigArgs, ConfigCommand};
use crate::config::{mask_secret, Config, SettingSpec, Source};
use crate::db::Database;

/// Execute the config command
pub fn run_config(db: &Database, args: &ConfigArgs) -> Result<()> {
    match args.command.as_ref().unwrap_or(&ConfigCommand::Show) {
        ConfigCommand::Show => {
            for line in describe_lines(&Config::describe(db)?) {
                println!("{}", line);
            }
        }
        ConfigCommand::Set { key, value } => {
            Config::set(db, key, value)?;
            if value.trim().is_empty() {
                println!("Removed {}.", key);
            } else {
                println!("Saved {}.", key);
            }
        }
        ConfigCommand::Clear => {
            if confirm("Remove all stored settings?")? {
                Config::clear(db)?;
                println!("Settings cleared.");
            } else {
                println!("Cancelled.");
            }
        }
    }
    Ok(())
}

fn describe_lines(rows: &[(&SettingSpec, Option<String>, Source)]) -> Vec<String> {
    let width = rows.iter().map(|(s, _, _)| s.key.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(spec, value, source)| {
            let shown = match value {
                Some(v) if spec.secret => mask_secret(v),
                Some(v) => v.clone(),
                None => "(not set)".to_string(),
            };
            format!(
                "{:<width$}  {}  [{}]",
                spec.key,
                shown,
                source.as_str(),
                width = width
            )
        })
        .collect()
}
