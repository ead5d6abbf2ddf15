use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{http_client, join_url, LookupError, LookupResult};
use crate::models::{CompanyDraft, PostalAddress};
use crate::validate::digits_only;

/// Company data returned by the tax-ID registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryRecord {
    /// Legal name, falling back to the trade name.
    pub name: Option<String>,
    pub postal_code: String,
    pub address: PostalAddress,
}

impl RegistryRecord {
    /// Fill the draft's name, postal code and address from the registry.
    /// The complement is kept, since the registry does not return one.
    pub fn apply_to(&self, draft: &mut CompanyDraft) {
        if let Some(ref name) = self.name {
            draft.name = name.clone();
        }
        draft.postal_code = self.postal_code.clone();
        let complement = draft.address.complement.take();
        draft.address = PostalAddress {
            complement,
            ..self.address.clone()
        };
    }
}

#[derive(Deserialize)]
struct RegistryResponse {
    razao_social: Option<String>,
    nome_fantasia: Option<String>,
    cep: Option<String>,
    logradouro: Option<String>,
    numero: Option<String>,
    bairro: Option<String>,
    municipio: Option<String>,
    uf: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<RegistryResponse> for RegistryRecord {
    fn from(r: RegistryResponse) -> Self {
        Self {
            name: non_blank(r.razao_social).or_else(|| non_blank(r.nome_fantasia)),
            postal_code: digits_only(&r.cep.unwrap_or_default()),
            address: PostalAddress {
                street: r.logradouro.unwrap_or_default(),
                number: r.numero.unwrap_or_default(),
                complement: None,
                neighborhood: r.bairro.unwrap_or_default(),
                city: r.municipio.unwrap_or_default(),
                region: r.uf.unwrap_or_default(),
            },
        }
    }
}

/// Client for the BrasilAPI-shaped CNPJ registry.
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> LookupResult<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.to_string(),
        })
    }

    pub fn lookup(&self, cnpj: &str) -> LookupResult<RegistryRecord> {
        let digits = digits_only(cnpj);
        if digits.len() != 14 {
            return Err(LookupError::Incomplete {
                what: "CNPJ",
                expected: 14,
                got: digits.len(),
            });
        }

        let url = join_url(&self.base_url, &format!("api/cnpj/v1/{}", digits));
        debug!(%url, "registry lookup");
        let response = self.client.get(&url).send().map_err(|e| {
            warn!(error = %e, "registry lookup failed");
            LookupError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "registry lookup returned an error status");
            return Err(match status {
                StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                    LookupError::NotFound("CNPJ not found".to_string())
                }
                s if s.is_server_error() => {
                    LookupError::Connection(format!("registry returned {}", s))
                }
                _ => LookupError::NotFound("CNPJ not found".to_string()),
            });
        }

        let body: RegistryResponse = response.json()?;
        Ok(body.into())
    }
}
