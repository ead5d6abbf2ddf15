use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::cli::{ExportArgs, ExportFormat};
use crate::models::Company;
use crate::report::{
    export_file_name, render_html, summary_headline, write_location_csv, write_summary_csv,
};
use crate::store::CompanyStore;
use crate::view::filter_companies;

impl ExportFormat {
    fn file_stem(&self) -> &'static str {
        match self {
            Self::Csv => "partner_map",
            Self::Summary => "partner_summary",
            Self::Html => "partner_report",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            Self::Csv | Self::Summary => "csv",
            Self::Html => "html",
        }
    }
}

/// Execute the export command
pub fn run_export(store: &impl CompanyStore, args: &ExportArgs) -> Result<()> {
    let criteria = args.filter.to_criteria()?;
    let companies: Vec<Company> = filter_companies(store.list(), &criteria)
        .into_iter()
        .cloned()
        .collect();

    let now = Local::now().naive_local();
    match args.output.as_deref() {
        Some("-") => {
            let stdout = io::stdout();
            write_export(args.format, stdout.lock(), &companies, now)?;
        }
        target => {
            let path = match target {
                Some(p) => p.to_string(),
                None => export_file_name(args.format.file_stem(), args.format.extension(), now),
            };
            let file = File::create(&path).with_context(|| format!("Cannot create {}", path))?;
            write_export(args.format, BufWriter::new(file), &companies, now)?;
            eprintln!("{}", summary_headline(&companies));
            eprintln!("Wrote {}", path);
        }
    }
    Ok(())
}

fn write_export<W: Write>(
    format: ExportFormat,
    mut out: W,
    companies: &[Company],
    now: chrono::NaiveDateTime,
) -> Result<()> {
    match format {
        ExportFormat::Csv => write_location_csv(&mut out, companies)?,
        ExportFormat::Summary => write_summary_csv(&mut out, companies)?,
        ExportFormat::Html => out.write_all(render_html(companies, now).as_bytes())?,
    }
    out.flush()?;
    Ok(())
}
