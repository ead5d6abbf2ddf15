//! Records exported from the browser dashboard's local storage.
//!
//! Those records use camelCase keys, Portuguese enum labels, and keep the
//! address only as one composed string.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::{
    Company, CompanyStatus, ContactChannel, ContactHistoryEntry, GeoPoint, Identifier,
    IdentifierKind, PostalAddress,
};
use crate::validate::document::digits_only;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCompany {
    pub name: String,
    #[serde(default)]
    pub cnpj: String,
    #[serde(default)]
    pub creci: Option<String>,
    #[serde(default, rename = "creciUF")]
    pub creci_uf: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: Option<LegacyLocation>,
    #[serde(default)]
    pub responsible: Option<String>,
    #[serde(default)]
    pub partnership_manager: Option<String>,
    #[serde(default)]
    pub hiring_manager: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub broker_count: u32,
    #[serde(default)]
    pub commission_rate: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_contact_date: Option<String>,
    #[serde(default)]
    pub last_contact_type: Option<String>,
    #[serde(default)]
    pub contact_summary: Option<String>,
    #[serde(default)]
    pub next_contact_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub contact_history: Vec<LegacyHistoryEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LegacyLocation {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyHistoryEntry {
    pub date: String,
    #[serde(rename = "type")]
    pub channel: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub next_contact_date: Option<String>,
}

/// Parse `YYYY-MM-DD`, also tolerating a full ISO timestamp. Blank is `None`.
fn parse_day(s: Option<&str>) -> Result<Option<NaiveDate>> {
    let s = match s.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(None),
    };
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| anyhow!("Invalid date: {}", s))
}

fn blank_to_none(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

impl LegacyCompany {
    /// Convert into the current model. Records without a registration date
    /// get `fallback_date`.
    pub fn into_company(self, fallback_date: NaiveDate) -> Result<Company> {
        let kind = self
            .doc_type
            .as_deref()
            .and_then(IdentifierKind::parse)
            .unwrap_or(IdentifierKind::Cnpj);

        let identifier = match kind {
            IdentifierKind::License => {
                let number = self.creci.clone().unwrap_or_else(|| self.cnpj.clone());
                Identifier::new(kind, &number, self.creci_uf.as_deref())
            }
            _ => Identifier::new(kind, &self.cnpj, None),
        };

        let status = match self.status.as_deref() {
            Some(s) => CompanyStatus::parse(s).ok_or_else(|| anyhow!("Unknown status: {}", s))?,
            None => CompanyStatus::Active,
        };

        let history = self
            .contact_history
            .into_iter()
            .map(|h| -> Result<ContactHistoryEntry> {
                let date = parse_day(Some(&h.date))?
                    .ok_or_else(|| anyhow!("History entry without date"))?;
                Ok(ContactHistoryEntry {
                    id: Uuid::new_v4(),
                    date,
                    channel: ContactChannel::parse(&h.channel).unwrap_or_default(),
                    summary: h.summary,
                    notes: blank_to_none(h.notes),
                    follow_up: parse_day(h.next_contact_date.as_deref())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Company {
            id: Uuid::new_v4(),
            name: self.name,
            identifier,
            postal_code: digits_only(&self.cep),
            address: PostalAddress::parse_composed(&self.address),
            location: self
                .location
                .map(|l| GeoPoint { lat: l.lat, lng: l.lng })
                .unwrap_or_default(),
            responsible: blank_to_none(self.responsible),
            partnership_contact: blank_to_none(self.partnership_manager),
            account_owner: self.hiring_manager,
            website: blank_to_none(self.website),
            email: self.email,
            phone: digits_only(&self.phone),
            registered_on: parse_day(self.registration_date.as_deref())?.unwrap_or(fallback_date),
            broker_count: self.broker_count,
            commission_rate: self.commission_rate,
            status,
            last_contact: parse_day(self.last_contact_date.as_deref())?,
            last_contact_channel: self
                .last_contact_type
                .as_deref()
                .and_then(ContactChannel::parse),
            contact_summary: blank_to_none(self.contact_summary),
            next_contact: parse_day(self.next_contact_date.as_deref())?,
            notes: blank_to_none(self.notes),
            contact_history: history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "k2j3h4g5f",
        "name": "Lar Doce Lar Imóveis",
        "cnpj": "11.222.333/0001-81",
        "docType": "CNPJ",
        "cep": "80010-000",
        "address": "Rua XV de Novembro, 200 - Centro - Curitiba/PR",
        "location": { "lat": -25.43, "lng": -49.27 },
        "responsible": "Paulo",
        "partnershipManager": "",
        "hiringManager": "Beatriz",
        "email": "contato@lardocelar.com.br",
        "phone": "(41) 99876-1234",
        "registrationDate": "2025-11-03",
        "brokerCount": 8,
        "commissionRate": 4.5,
        "status": "Inativo",
        "lastContactDate": "2026-01-10",
        "lastContactType": "WhatsApp",
        "nextContactDate": "",
        "contactHistory": [
            { "id": "a1", "date": "2026-01-10", "type": "Reunião", "summary": "Renewal" }
        ]
    }"#;

    #[test]
    fn test_convert_legacy_record() {
        let legacy: LegacyCompany = serde_json::from_str(SAMPLE).unwrap();
        let fallback = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let company = legacy.into_company(fallback).unwrap();

        assert_eq!(company.identifier.value(), "11222333000181");
        assert_eq!(company.status, CompanyStatus::Inactive);
        assert_eq!(company.address.street, "Rua XV de Novembro");
        assert_eq!(company.address.city, "Curitiba");
        assert_eq!(company.address.region, "PR");
        assert_eq!(company.partnership_contact, None);
        assert_eq!(company.account_owner, "Beatriz");
        assert_eq!(company.phone, "41998761234");
        assert_eq!(company.registered_on, NaiveDate::from_ymd_opt(2025, 11, 3).unwrap());
        assert_eq!(company.last_contact_channel, Some(ContactChannel::Chat));
        assert_eq!(company.next_contact, None);
        assert_eq!(company.contact_history.len(), 1);
        assert_eq!(company.contact_history[0].channel, ContactChannel::Meeting);
    }

    #[test]
    fn test_convert_license_record() {
        let json = r#"{
            "name": "Corretor Autônomo",
            "cnpj": "12345-J",
            "creci": "12345-J",
            "creciUF": "rj",
            "docType": "CRECI",
            "hiringManager": "Ana"
        }"#;
        let legacy: LegacyCompany = serde_json::from_str(json).unwrap();
        let company = legacy
            .into_company(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap())
            .unwrap();

        assert_eq!(
            company.identifier,
            Identifier::License {
                number: "12345J".to_string(),
                region: "RJ".to_string()
            }
        );
        assert_eq!(company.registered_on, NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
    }

    #[test]
    fn test_bad_date_is_error() {
        let json = r#"{ "name": "X", "hiringManager": "Ana", "lastContactDate": "10/01/2026" }"#;
        let legacy: LegacyCompany = serde_json::from_str(json).unwrap();
        assert!(legacy
            .into_company(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap())
            .is_err());
    }
}
