//! Import of records exported from the browser dashboard.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::fs;
use tracing::info;

use crate::cli::ui::warning;
use crate::cli::ImportArgs;
use crate::models::legacy::LegacyCompany;
use crate::models::{Company, CompanyDraft};
use crate::store::{CompanyStore, KeyValueStore, Repository};
use crate::validate::validate_draft;

/// Outcome of converting a legacy export.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<Company>,
    /// (record position, name, reason)
    pub skipped: Vec<(usize, String, String)>,
}

/// Convert legacy JSON into records. Records that cannot be converted or
/// that fail validation are skipped, so the collection only ever holds
/// valid records.
pub fn convert_legacy(json: &str, today: NaiveDate) -> Result<ImportReport> {
    let legacy: Vec<LegacyCompany> =
        serde_json::from_str(json).context("Expected a JSON array of partner records")?;

    let mut report = ImportReport::default();
    for (idx, record) in legacy.into_iter().enumerate() {
        let name = record.name.clone();
        let company = match record.into_company(today) {
            Ok(c) => c,
            Err(e) => {
                report.skipped.push((idx + 1, name, e.to_string()));
                continue;
            }
        };

        if let Err(errors) = validate_draft(&CompanyDraft::from(&company)) {
            report.skipped.push((idx + 1, name, errors.to_string()));
            continue;
        }
        report.imported.push(company);
    }
    Ok(report)
}

/// Execute the import command
pub fn run_import<S: KeyValueStore>(repo: &mut Repository<S>, args: &ImportArgs) -> Result<()> {
    let json = fs::read_to_string(&args.path)
        .with_context(|| format!("Cannot read {}", args.path))?;
    let report = convert_legacy(&json, Local::now().date_naive())?;

    for (pos, name, reason) in &report.skipped {
        warning(&format!("record {} ({}) skipped: {}", pos, name, reason));
    }

    if args.dry_run {
        for c in &report.imported {
            println!("  {}  {}", c.identifier.display(), c.name);
        }
        println!("\nWould import {} records.", report.imported.len());
        return Ok(());
    }

    let count = report.imported.len();
    let next = if args.replace {
        report.imported
    } else {
        let mut all = repo.list().to_vec();
        all.extend(report.imported);
        all
    };
    repo.replace_all(next)?;
    info!(count, replace = args.replace, "imported legacy records");
    println!("Imported {} records.", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IdentifierKind;
    use crate::store::MemoryStore;

    const EXPORT: &str = r#"[
        {
            "id": "1718000000000",
            "name": "Imobiliária Horizonte",
            "cnpj": "11.222.333/0001-81",
            "docType": "CNPJ",
            "cep": "01310-100",
            "address": "Av. Paulista, 1000 - Bela Vista - São Paulo/SP",
            "location": {"lat": -23.56, "lng": -46.65},
            "responsible": "Carla",
            "hiringManager": "Ana",
            "email": "contato@horizonte.com.br",
            "phone": "(11) 99876-5432",
            "registrationDate": "2025-03-10",
            "brokerCount": 12,
            "commissionRate": 5,
            "status": "Ativo"
        },
        {
            "id": "1718000000001",
            "name": "Sem Dono",
            "cnpj": "33.000.167/0001-01",
            "hiringManager": "",
            "email": "x@y.com",
            "phone": "11999999999",
            "status": "Inativo"
        },
        {
            "id": "1718000000002",
            "name": "Status Estranho",
            "cnpj": "33.000.167/0001-01",
            "status": "Pausado"
        }
    ]"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_convert_skips_invalid_records() {
        let report = convert_legacy(EXPORT, today()).unwrap();
        assert_eq!(report.imported.len(), 1);
        assert_eq!(report.skipped.len(), 2);

        let c = &report.imported[0];
        assert_eq!(c.identifier.kind(), IdentifierKind::Cnpj);
        assert_eq!(c.address.city, "São Paulo");
        assert_eq!(c.registered_on, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());

        assert_eq!(report.skipped[0].0, 2);
        assert!(report.skipped[0].2.contains("account owner"));
        assert!(report.skipped[1].2.contains("Unknown status"));
    }

    #[test]
    fn test_not_an_array() {
        assert!(convert_legacy("{}", today()).is_err());
    }

    #[test]
    fn test_run_import_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, EXPORT).unwrap();

        let backend = MemoryStore::new();
        let mut repo = Repository::open(&backend).unwrap();
        let existing = repo
            .create(crate::models::sample_draft(), today())
            .unwrap();

        let args = ImportArgs {
            path: path.to_string_lossy().into_owned(),
            dry_run: false,
            replace: false,
        };
        run_import(&mut repo, &args).unwrap();

        let reopened = Repository::open(&backend).unwrap();
        assert_eq!(reopened.list().len(), 2);
        assert_eq!(reopened.list()[0].id, existing.id);
    }

    #[test]
    fn test_replace_stores_only_valid_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, EXPORT).unwrap();

        let backend = MemoryStore::new();
        let mut repo = Repository::open(&backend).unwrap();
        repo.create(crate::models::sample_draft(), today()).unwrap();

        let args = ImportArgs {
            path: path.to_string_lossy().into_owned(),
            dry_run: false,
            replace: true,
        };
        run_import(&mut repo, &args).unwrap();

        let reopened = Repository::open(&backend).unwrap();
        assert_eq!(reopened.list().len(), 1);
        for c in reopened.list() {
            assert!(validate_draft(&CompanyDraft::from(c)).is_ok());
            assert!(!c.account_owner.is_empty());
        }
    }

    #[test]
    fn test_dry_run_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, EXPORT).unwrap();

        let backend = MemoryStore::new();
        let mut repo = Repository::open(&backend).unwrap();
        let args = ImportArgs {
            path: path.to_string_lossy().into_owned(),
            dry_run: true,
            replace: false,
        };
        run_import(&mut repo, &args).unwrap();
        assert!(Repository::open(&backend).unwrap().list().is_empty());
    }
}
