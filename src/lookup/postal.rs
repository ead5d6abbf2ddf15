use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{http_client, join_url, LookupError, LookupResult};
use crate::models::CompanyDraft;
use crate::validate::digits_only;

/// Address data for a postal code.
#[derive(Debug, Clone, PartialEq)]
pub struct PostalRecord {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub region: String,
}

impl PostalRecord {
    /// Overwrite street, neighborhood, city and region. Number and
    /// complement are left alone.
    pub fn apply_to(&self, draft: &mut CompanyDraft) {
        draft.address.street = self.street.clone();
        draft.address.neighborhood = self.neighborhood.clone();
        draft.address.city = self.city.clone();
        draft.address.region = self.region.clone();
    }
}

#[derive(Deserialize)]
struct PostalResponse {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    logradouro: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    uf: Option<String>,
}

impl PostalResponse {
    /// The service flags unknown codes with `"erro": true` (or `"true"`).
    fn is_error(&self) -> bool {
        match self.erro {
            Some(serde_json::Value::Bool(b)) => b,
            Some(serde_json::Value::String(ref s)) => s == "true",
            _ => false,
        }
    }
}

/// Client for the ViaCEP-shaped postal-code service.
pub struct PostalCodeClient {
    client: Client,
    base_url: String,
}

impl PostalCodeClient {
    pub fn new(base_url: &str) -> LookupResult<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.to_string(),
        })
    }

    pub fn lookup(&self, postal_code: &str) -> LookupResult<PostalRecord> {
        let digits = digits_only(postal_code);
        if digits.len() != 8 {
            return Err(LookupError::Incomplete {
                what: "postal code",
                expected: 8,
                got: digits.len(),
            });
        }

        let url = join_url(&self.base_url, &format!("ws/{}/json/", digits));
        debug!(%url, "postal code lookup");
        let response = self.client.get(&url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(if status.is_server_error() {
                LookupError::Connection(format!("postal service returned {}", status))
            } else {
                LookupError::NotFound("Postal code not found".to_string())
            });
        }

        let body: PostalResponse = response.json()?;
        if body.is_error() {
            return Err(LookupError::NotFound("Postal code not found".to_string()));
        }

        Ok(PostalRecord {
            street: body.logradouro.unwrap_or_default(),
            neighborhood: body.bairro.unwrap_or_default(),
            city: body.localidade.unwrap_or_default(),
            region: body.uf.unwrap_or_default(),
        })
    }
}

/// Lookup for autofill: every failure is logged and swallowed.
pub fn autofill_lookup(client: &PostalCodeClient, postal_code: &str) -> Option<PostalRecord> {
    match client.lookup(postal_code) {
        Ok(record) => Some(record),
        Err(LookupError::Incomplete { .. }) => None,
        Err(e) => {
            warn!(error = %e, "postal code autofill skipped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_draft;

    #[test]
    fn test_lookup_success() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/ws/01001000/json/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"cep": "01001-000", "logradouro": "Praça da Sé", "complemento": "lado ímpar",
                    "bairro": "Sé", "localidade": "São Paulo", "uf": "SP"}"#,
            )
            .create();

        let client = PostalCodeClient::new(&server.url()).unwrap();
        let record = client.lookup("01001-000").unwrap();
        mock.assert();
        assert_eq!(
            record,
            PostalRecord {
                street: "Praça da Sé".to_string(),
                neighborhood: "Sé".to_string(),
                city: "São Paulo".to_string(),
                region: "SP".to_string(),
            }
        );
    }

    #[test]
    fn test_erro_flag_is_not_found() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/ws/99999999/json/")
            .with_status(200)
            .with_body(r#"{"erro": true}"#)
            .create();
        server
            .mock("GET", "/ws/99999998/json/")
            .with_status(200)
            .with_body(r#"{"erro": "true"}"#)
            .create();

        let client = PostalCodeClient::new(&server.url()).unwrap();
        assert!(matches!(
            client.lookup("99999999"),
            Err(LookupError::NotFound(_))
        ));
        assert!(matches!(
            client.lookup("99999998"),
            Err(LookupError::NotFound(_))
        ));
    }

    #[test]
    fn test_autofill_updates_address_fields() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/ws/01310100/json/")
            .with_status(200)
            .with_body(
                r#"{"logradouro": "Avenida Paulista", "bairro": "Bela Vista",
                    "localidade": "São Paulo", "uf": "SP"}"#,
            )
            .create();

        let client = PostalCodeClient::new(&server.url()).unwrap();
        let mut draft = sample_draft();
        draft.address.street = "old".to_string();
        let record = autofill_lookup(&client, &draft.postal_code).unwrap();
        record.apply_to(&mut draft);
        assert_eq!(draft.address.street, "Avenida Paulista");
        assert_eq!(draft.address.number, "1000");
    }

    #[test]
    fn test_autofill_ignores_failures() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(500)
            .create();

        let client = PostalCodeClient::new(&server.url()).unwrap();
        assert!(autofill_lookup(&client, "01310-100").is_none());
        assert!(autofill_lookup(&client, "0131").is_none());
    }
}
