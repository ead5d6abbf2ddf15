use anyhow::Result;
use chrono::Local;
use std::thread;
use tracing::{debug, info};

use crate::cli::fields::parse_kind;
use crate::cli::ui::{non_empty, prompt_field, select, short_id, warning, FormResult};
use crate::cli::AddArgs;
use crate::config::Config;
use crate::lookup::{autofill_lookup, PostalCodeClient, RegistryClient, RequestSlot};
use crate::models::{CompanyDraft, Identifier, IdentifierKind};
use crate::store::CompanyStore;
use crate::validate::is_valid_cnpj;

/// Account owner preset on self-service registrations.
pub const SELF_REGISTRATION_OWNER: &str = "Self-registration";

/// Execute the add command
pub fn run_add(store: &mut impl CompanyStore, args: &AddArgs, config: &Config) -> Result<()> {
    let draft = CompanyDraft::new();
    create(store, args, config, draft)
}

/// Execute the register command: the public form, with the account owner preset.
pub fn run_register(store: &mut impl CompanyStore, args: &AddArgs, config: &Config) -> Result<()> {
    let mut draft = CompanyDraft::new();
    draft.account_owner = SELF_REGISTRATION_OWNER.to_string();
    create(store, args, config, draft)
}

fn create(
    store: &mut impl CompanyStore,
    args: &AddArgs,
    config: &Config,
    mut draft: CompanyDraft,
) -> Result<()> {
    if args.fields.is_empty() {
        if !interactive_mode(&mut draft)? {
            println!("Cancelled.");
            return Ok(());
        }
    } else {
        args.fields.apply_to_draft(&mut draft)?;
    }

    if args.lookup {
        Autofill::new(config)?.run(&mut draft);
    }

    let company = store.create(draft, Local::now().date_naive())?;
    info!(id = %company.id, "partner created");
    println!("\nCreated: {} ({})", company.name, short_id(company.id));
    Ok(())
}

/// Registry and postal lookups for one form. Each kind has its own slot so
/// a response is only applied if no newer request of that kind started.
struct Autofill {
    registry: RegistryClient,
    postal: PostalCodeClient,
    registry_slot: RequestSlot,
    postal_slot: RequestSlot,
}

impl Autofill {
    fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            registry: RegistryClient::new(&config.lookup.registry_url)?,
            postal: PostalCodeClient::new(&config.lookup.postal_url)?,
            registry_slot: RequestSlot::new(),
            postal_slot: RequestSlot::new(),
        })
    }

    /// Fill what the lookups know. Failures are reported, never fatal.
    ///
    /// The postal lookup for the typed code runs while the registry is
    /// queried. A registry record with an address supersedes it, and the
    /// postal result is then dropped when it arrives.
    fn run(&self, draft: &mut CompanyDraft) {
        let cnpj = match &draft.identifier {
            Identifier::Cnpj { number } if is_valid_cnpj(number) => Some(number.clone()),
            Identifier::Cnpj { number } if !number.is_empty() => {
                debug!("CNPJ check digits do not match, registry lookup skipped");
                None
            }
            _ => None,
        };
        let postal_code = (draft.address.is_empty() && !draft.postal_code.trim().is_empty())
            .then(|| draft.postal_code.clone());

        thread::scope(|s| {
            let pending_postal = postal_code.map(|code| {
                let ticket = self.postal_slot.begin();
                (ticket, s.spawn(move || autofill_lookup(&self.postal, &code)))
            });

            if let Some(number) = cnpj {
                self.apply_registry(&number, draft);
            }

            if let Some((ticket, handle)) = pending_postal {
                let record = handle.join().ok().flatten();
                match record.map(|r| self.postal_slot.accept(ticket, r)) {
                    Some(Some(record)) => {
                        record.apply_to(draft);
                        println!("Address filled from the postal code.");
                    }
                    Some(None) => debug!("postal result superseded by the registry address"),
                    None => {}
                }
            }
        });
    }

    fn apply_registry(&self, cnpj: &str, draft: &mut CompanyDraft) {
        let ticket = self.registry_slot.begin();
        match self.registry.lookup(cnpj) {
            Ok(record) => {
                if let Some(record) = self.registry_slot.accept(ticket, record) {
                    record.apply_to(draft);
                    if !record.address.is_empty() {
                        // newer address source: any postal lookup in flight is stale
                        self.postal_slot.begin();
                    }
                    println!("Filled from the company registry.");
                }
            }
            Err(e) => warning(&e.to_string()),
        }
    }
}

/// Prompt for the fields a new record needs. Returns false when cancelled.
fn interactive_mode(draft: &mut CompanyDraft) -> Result<bool> {
    macro_rules! ask {
        ($label:expr, $current:expr) => {
            match prompt_field($label, $current)? {
                FormResult::Value(v) => v,
                FormResult::Cancelled => return Ok(false),
            }
        };
    }

    draft.name = ask!("name", None);

    let kinds = [IdentifierKind::Cnpj, IdentifierKind::Cpf, IdentifierKind::License];
    let labels: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
    let Some(idx) = select("document type", &labels)? else {
        return Ok(false);
    };
    let kind = parse_kind(labels[idx])?;
    let number = ask!("document", None);
    let region = if kind == IdentifierKind::License {
        Some(ask!("license region", None))
    } else {
        None
    };
    draft.identifier = Identifier::new(kind, &number, region.as_deref());

    let owner = ask!("account owner", Some(draft.account_owner.as_str()));
    draft.account_owner = owner;
    draft.partnership_contact = non_empty(Some(ask!("partner contact", None)));
    draft.responsible = non_empty(Some(ask!("responsible", None)));
    draft.email = ask!("email", None);
    draft.phone = ask!("phone", None);
    draft.website = non_empty(Some(ask!("website", None)));
    draft.postal_code = ask!("postal code", None);

    let brokers = ask!("brokers", Some("0"));
    draft.broker_count = brokers.trim().parse()?;
    let commission = ask!(
        "commission",
        Some(CompanyDraft::DEFAULT_COMMISSION.to_string().as_str())
    );
    draft.commission_rate = commission.trim().replace(',', ".").parse()?;
    draft.notes = non_empty(Some(ask!("notes", None)));

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CompanyFields;
    use crate::config::LookupConfig;
    use crate::store::{MemoryStore, Repository};

    fn fields() -> CompanyFields {
        CompanyFields {
            name: Some("Imobiliária Horizonte".to_string()),
            document: Some("11.222.333/0001-81".to_string()),
            email: Some("contato@horizonte.com.br".to_string()),
            phone: Some("(11) 99876-5432".to_string()),
            postal_code: Some("01001-000".to_string()),
            ..Default::default()
        }
    }

    fn config_for(url: &str) -> Config {
        Config {
            lookup: LookupConfig {
                registry_url: url.to_string(),
                postal_url: url.to_string(),
                geocoder_url: url.to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_register_presets_owner() {
        let backend = MemoryStore::new();
        let mut repo = Repository::open(&backend).unwrap();
        let args = AddArgs {
            fields: fields(),
            lookup: false,
        };
        run_register(&mut repo, &args, &Config::default()).unwrap();
        assert_eq!(repo.list()[0].account_owner, SELF_REGISTRATION_OWNER);
    }

    #[test]
    fn test_add_without_owner_is_rejected() {
        let backend = MemoryStore::new();
        let mut repo = Repository::open(&backend).unwrap();
        let args = AddArgs {
            fields: fields(),
            lookup: false,
        };
        let err = run_add(&mut repo, &args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("account owner"));
        assert!(repo.list().is_empty());
    }

    #[test]
    fn test_add_with_lookup_fills_address() {
        let mut server = mockito::Server::new();
        let registry = server
            .mock("GET", "/api/cnpj/v1/11222333000181")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"razao_social": "HORIZONTE LTDA", "nome_fantasia": "Horizonte",
                    "cep": "01310100", "logradouro": "Avenida Paulista", "numero": "1000",
                    "bairro": "Bela Vista", "municipio": "São Paulo", "uf": "SP"}"#,
            )
            .create();
        // answers for the typed code, which the registry address supersedes
        let postal = server
            .mock("GET", "/ws/01001000/json/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"logradouro": "Praça da Sé", "bairro": "Sé",
                    "localidade": "São Paulo", "uf": "SP"}"#,
            )
            .create();

        let backend = MemoryStore::new();
        let mut repo = Repository::open(&backend).unwrap();
        let mut f = fields();
        f.owner = Some("Ana".to_string());
        let args = AddArgs {
            fields: f,
            lookup: true,
        };
        run_add(&mut repo, &args, &config_for(&server.url())).unwrap();

        registry.assert();
        postal.assert();
        let c = &repo.list()[0];
        assert_eq!(c.address.street, "Avenida Paulista");
        assert_eq!(c.address.neighborhood, "Bela Vista");
        assert_eq!(c.address.city, "São Paulo");
        assert_eq!(c.postal_code, "01310100");
    }

    #[test]
    fn test_postal_fills_when_registry_has_no_address() {
        let mut server = mockito::Server::new();
        let registry = server
            .mock("GET", "/api/cnpj/v1/11222333000181")
            .with_status(404)
            .create();
        let postal = server
            .mock("GET", "/ws/01001000/json/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"logradouro": "Praça da Sé", "bairro": "Sé",
                    "localidade": "São Paulo", "uf": "SP"}"#,
            )
            .create();

        let autofill = Autofill::new(&config_for(&server.url())).unwrap();
        let mut draft = CompanyDraft::new();
        fields().apply_to_draft(&mut draft).unwrap();
        autofill.run(&mut draft);

        registry.assert();
        postal.assert();
        assert_eq!(draft.address.street, "Praça da Sé");
        assert_eq!(draft.postal_code, "01001-000");
    }

    #[test]
    fn test_registry_skipped_for_bad_check_digits() {
        let mut server = mockito::Server::new();
        let registry = server
            .mock("GET", mockito::Matcher::Regex("^/api/cnpj".to_string()))
            .expect(0)
            .create();

        let autofill = Autofill::new(&config_for(&server.url())).unwrap();
        let mut draft = CompanyDraft::new();
        let mut f = fields();
        f.document = Some("11.222.333/0001-82".to_string());
        f.postal_code = None;
        f.apply_to_draft(&mut draft).unwrap();
        autofill.run(&mut draft);

        registry.assert();
        assert!(draft.address.is_empty());
    }

    #[test]
    fn test_lookup_failure_does_not_block_create() {
        let backend = MemoryStore::new();
        let mut repo = Repository::open(&backend).unwrap();
        let mut f = fields();
        f.owner = Some("Ana".to_string());
        let args = AddArgs {
            fields: f,
            lookup: true,
        };
        run_add(&mut repo, &args, &config_for("http://127.0.0.1:9")).unwrap();
        assert_eq!(repo.list().len(), 1);
        assert!(repo.list()[0].address.is_empty());
    }
}
