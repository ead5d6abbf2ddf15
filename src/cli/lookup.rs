use anyhow::Result;

use crate::cli::ui::error;
use crate::cli::{LookupArgs, LookupCommand};
use crate::config::Config;
use crate::lookup::{Geocoder, LookupError, PostalCodeClient, RegistryClient};
use crate::validate::digits_only;
use crate::validate::document::{format_cnpj, format_postal_code};

/// Execute the lookup command. Service failures are reported, not returned.
pub fn run_lookup(args: &LookupArgs, config: &Config) -> Result<()> {
    let outcome = match &args.command {
        LookupCommand::Cnpj { number } => lookup_cnpj(config, number),
        LookupCommand::Cep { code } => lookup_postal(config, code),
        LookupCommand::Geo { query } => lookup_geo(config, &query.join(" ")),
    };
    if let Err(e) = outcome {
        error(&e.to_string());
    }
    Ok(())
}

fn lookup_cnpj(config: &Config, number: &str) -> Result<(), LookupError> {
    let record = RegistryClient::new(&config.lookup.registry_url)?.lookup(number)?;
    println!(
        "{}",
        record.name.as_deref().unwrap_or("(no name on record)")
    );
    println!("  CNPJ         {}", format_cnpj(&digits_only(number)));
    if !record.postal_code.is_empty() {
        println!("  postal code  {}", format_postal_code(&record.postal_code));
    }
    if !record.address.is_empty() {
        println!("  address      {}", record.address);
    }
    Ok(())
}

fn lookup_postal(config: &Config, code: &str) -> Result<(), LookupError> {
    let record = PostalCodeClient::new(&config.lookup.postal_url)?.lookup(code)?;
    println!("{}", format_postal_code(&digits_only(code)));
    println!("  street        {}", record.street);
    println!("  neighborhood  {}", record.neighborhood);
    println!("  city          {} - {}", record.city, record.region);
    Ok(())
}

fn lookup_geo(config: &Config, query: &str) -> Result<(), LookupError> {
    let point = Geocoder::new(&config.lookup.geocoder_url)?.search(query)?;
    println!("{:.6}, {:.6}", point.lat, point.lng);
    Ok(())
}
