use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ContactChannel, ContactHistoryEntry, GeoPoint, PostalAddress};
use crate::validate::document::{digits_only, format_cnpj, format_cpf, normalize_license};

/// Suffix appended to the name of a duplicated record.
pub const COPY_MARKER: &str = " (Copy)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    #[default]
    Cnpj,
    Cpf,
    License,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cnpj => "cnpj",
            Self::Cpf => "cpf",
            Self::License => "license",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cnpj" => Some(Self::Cnpj),
            "cpf" => Some(Self::Cpf),
            "license" | "creci" => Some(Self::License),
            _ => None,
        }
    }
}

/// Registration document of a partner. Numbers are stored normalized:
/// digits only for CNPJ/CPF, separators stripped and uppercased for licenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Identifier {
    Cnpj { number: String },
    Cpf { number: String },
    License { number: String, region: String },
}

impl Identifier {
    pub fn new(kind: IdentifierKind, raw: &str, region: Option<&str>) -> Self {
        match kind {
            IdentifierKind::Cnpj => Self::Cnpj {
                number: digits_only(raw),
            },
            IdentifierKind::Cpf => Self::Cpf {
                number: digits_only(raw),
            },
            IdentifierKind::License => Self::License {
                number: normalize_license(raw),
                region: region.unwrap_or_default().trim().to_uppercase(),
            },
        }
    }

    pub fn kind(&self) -> IdentifierKind {
        match self {
            Self::Cnpj { .. } => IdentifierKind::Cnpj,
            Self::Cpf { .. } => IdentifierKind::Cpf,
            Self::License { .. } => IdentifierKind::License,
        }
    }

    /// The bare number, as stored.
    pub fn value(&self) -> &str {
        match self {
            Self::Cnpj { number } | Self::Cpf { number } | Self::License { number, .. } => number,
        }
    }

    /// Human-readable form: masked CNPJ/CPF, `number/REGION` for licenses.
    pub fn display(&self) -> String {
        match self {
            Self::Cnpj { number } => format_cnpj(number),
            Self::Cpf { number } => format_cpf(number),
            Self::License { number, region } => format!("{}/{}", number, region),
        }
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::Cnpj {
            number: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    #[default]
    Active,
    Inactive,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" | "ativo" => Some(Self::Active),
            "inactive" | "inativo" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// A partner organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub identifier: Identifier,
    pub postal_code: String,
    pub address: PostalAddress,
    pub location: GeoPoint,
    pub responsible: Option<String>,
    pub partnership_contact: Option<String>,
    pub account_owner: String,
    pub website: Option<String>,
    pub email: String,
    pub phone: String,
    pub registered_on: NaiveDate,
    pub broker_count: u32,
    pub commission_rate: f64,
    pub status: CompanyStatus,
    pub last_contact: Option<NaiveDate>,
    pub last_contact_channel: Option<ContactChannel>,
    pub contact_summary: Option<String>,
    pub next_contact: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(default)]
    pub contact_history: Vec<ContactHistoryEntry>,
}

/// Everything a form submission carries: a `Company` minus its ID and
/// registration date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompanyDraft {
    pub name: String,
    pub identifier: Identifier,
    pub postal_code: String,
    pub address: PostalAddress,
    pub location: GeoPoint,
    pub responsible: Option<String>,
    pub partnership_contact: Option<String>,
    pub account_owner: String,
    pub website: Option<String>,
    pub email: String,
    pub phone: String,
    pub broker_count: u32,
    pub commission_rate: f64,
    pub status: CompanyStatus,
    pub last_contact: Option<NaiveDate>,
    pub last_contact_channel: Option<ContactChannel>,
    pub contact_summary: Option<String>,
    pub next_contact: Option<NaiveDate>,
    pub notes: Option<String>,
    pub contact_history: Vec<ContactHistoryEntry>,
}

impl CompanyDraft {
    /// Commission rate the registration form starts with.
    pub const DEFAULT_COMMISSION: f64 = 5.0;

    pub fn new() -> Self {
        Self {
            commission_rate: Self::DEFAULT_COMMISSION,
            ..Self::default()
        }
    }
}

impl From<&Company> for CompanyDraft {
    fn from(c: &Company) -> Self {
        Self {
            name: c.name.clone(),
            identifier: c.identifier.clone(),
            postal_code: c.postal_code.clone(),
            address: c.address.clone(),
            location: c.location,
            responsible: c.responsible.clone(),
            partnership_contact: c.partnership_contact.clone(),
            account_owner: c.account_owner.clone(),
            website: c.website.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            broker_count: c.broker_count,
            commission_rate: c.commission_rate,
            status: c.status,
            last_contact: c.last_contact,
            last_contact_channel: c.last_contact_channel,
            contact_summary: c.contact_summary.clone(),
            next_contact: c.next_contact,
            notes: c.notes.clone(),
            contact_history: c.contact_history.clone(),
        }
    }
}

/// Submitted fields of an edit. `None` leaves the stored value untouched;
/// for optional fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub identifier: Option<Identifier>,
    pub postal_code: Option<String>,
    pub address: Option<PostalAddress>,
    pub location: Option<GeoPoint>,
    pub responsible: Option<Option<String>>,
    pub partnership_contact: Option<Option<String>>,
    pub account_owner: Option<String>,
    pub website: Option<Option<String>>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub broker_count: Option<u32>,
    pub commission_rate: Option<f64>,
    pub status: Option<CompanyStatus>,
    pub last_contact: Option<Option<NaiveDate>>,
    pub last_contact_channel: Option<Option<ContactChannel>>,
    pub contact_summary: Option<Option<String>>,
    pub next_contact: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
    pub contact_history: Option<Vec<ContactHistoryEntry>>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Company {
    /// Build a new record from a submitted draft, assigning a fresh ID and
    /// the given registration date.
    pub fn from_draft(draft: CompanyDraft, registered_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            identifier: draft.identifier,
            postal_code: digits_only(&draft.postal_code),
            address: draft.address,
            location: draft.location,
            responsible: non_empty(draft.responsible),
            partnership_contact: non_empty(draft.partnership_contact),
            account_owner: draft.account_owner.trim().to_string(),
            website: non_empty(draft.website),
            email: draft.email.trim().to_string(),
            phone: digits_only(&draft.phone),
            registered_on,
            broker_count: draft.broker_count,
            commission_rate: draft.commission_rate,
            status: draft.status,
            last_contact: draft.last_contact,
            last_contact_channel: draft.last_contact_channel,
            contact_summary: non_empty(draft.contact_summary),
            next_contact: draft.next_contact,
            notes: non_empty(draft.notes),
            contact_history: draft.contact_history,
        }
    }

    /// Merge submitted fields in place. ID and registration date never change.
    pub fn merge(&mut self, patch: CompanyPatch) {
        if let Some(v) = patch.name {
            self.name = v.trim().to_string();
        }
        if let Some(v) = patch.identifier {
            self.identifier = v;
        }
        if let Some(v) = patch.postal_code {
            self.postal_code = digits_only(&v);
        }
        if let Some(v) = patch.address {
            self.address = v;
        }
        if let Some(v) = patch.location {
            self.location = v;
        }
        if let Some(v) = patch.responsible {
            self.responsible = non_empty(v);
        }
        if let Some(v) = patch.partnership_contact {
            self.partnership_contact = non_empty(v);
        }
        if let Some(v) = patch.account_owner {
            self.account_owner = v.trim().to_string();
        }
        if let Some(v) = patch.website {
            self.website = non_empty(v);
        }
        if let Some(v) = patch.email {
            self.email = v.trim().to_string();
        }
        if let Some(v) = patch.phone {
            self.phone = digits_only(&v);
        }
        if let Some(v) = patch.broker_count {
            self.broker_count = v;
        }
        if let Some(v) = patch.commission_rate {
            self.commission_rate = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.last_contact {
            self.last_contact = v;
        }
        if let Some(v) = patch.last_contact_channel {
            self.last_contact_channel = v;
        }
        if let Some(v) = patch.contact_summary {
            self.contact_summary = non_empty(v);
        }
        if let Some(v) = patch.next_contact {
            self.next_contact = v;
        }
        if let Some(v) = patch.notes {
            self.notes = non_empty(v);
        }
        if let Some(v) = patch.contact_history {
            self.contact_history = v;
        }
    }

    /// A copy under a new ID with the name marked; every other field is kept.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("{}{}", self.name, COPY_MARKER),
            ..self.clone()
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CompanyStatus::Active
    }

    /// Partnership contact, falling back to the operational responsible.
    pub fn partner_contact_or_responsible(&self) -> Option<&str> {
        self.partnership_contact
            .as_deref()
            .or(self.responsible.as_deref())
    }

    /// Log an interaction. The entry's follow-up date, when present, becomes
    /// the record's next-contact date. Without one, a scheduled follow-up due
    /// on or before the entry's date counts as done and is cleared.
    pub fn record_interaction(&mut self, entry: ContactHistoryEntry) {
        self.last_contact = Some(entry.date);
        self.last_contact_channel = Some(entry.channel);
        self.contact_summary = Some(entry.summary.clone());
        match entry.follow_up {
            Some(follow_up) => self.next_contact = Some(follow_up),
            None => {
                if self.next_contact.is_some_and(|next| next <= entry.date) {
                    self.next_contact = None;
                }
            }
        }
        self.contact_history.push(entry);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_draft() -> CompanyDraft {
        CompanyDraft {
            name: "Imobiliária Horizonte".to_string(),
            identifier: Identifier::new(IdentifierKind::Cnpj, "11.222.333/0001-81", None),
            postal_code: "01310-100".to_string(),
            address: PostalAddress {
                street: "Av. Paulista".to_string(),
                number: "1000".to_string(),
                complement: None,
                neighborhood: "Bela Vista".to_string(),
                city: "São Paulo".to_string(),
                region: "SP".to_string(),
            },
            responsible: Some("Carla".to_string()),
            partnership_contact: Some("Marcos".to_string()),
            account_owner: "Ana".to_string(),
            email: "contato@horizonte.com.br".to_string(),
            phone: "(11) 99876-5432".to_string(),
            broker_count: 12,
            ..CompanyDraft::new()
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_draft_normalizes() {
        let company = Company::from_draft(sample_draft(), day(2026, 1, 5));
        assert_eq!(company.identifier.value(), "11222333000181");
        assert_eq!(company.identifier.display(), "11.222.333/0001-81");
        assert_eq!(company.postal_code, "01310100");
        assert_eq!(company.phone, "11998765432");
        assert_eq!(company.registered_on, day(2026, 1, 5));
        assert_eq!(company.commission_rate, 5.0);
        assert_eq!(company.status, CompanyStatus::Active);
    }

    #[test]
    fn test_merge_only_touches_submitted_fields() {
        let original = Company::from_draft(sample_draft(), day(2026, 1, 5));
        let mut edited = original.clone();

        edited.merge(CompanyPatch {
            broker_count: Some(30),
            partnership_contact: Some(None),
            ..Default::default()
        });

        assert_eq!(edited.id, original.id);
        assert_eq!(edited.registered_on, original.registered_on);
        assert_eq!(edited.broker_count, 30);
        assert_eq!(edited.partnership_contact, None);
        assert_eq!(edited.name, original.name);
        assert_eq!(edited.email, original.email);
        assert_eq!(edited.address, original.address);
    }

    #[test]
    fn test_duplicate_keeps_everything_but_id_and_name() {
        let mut original = Company::from_draft(sample_draft(), day(2026, 1, 5));
        original.record_interaction(ContactHistoryEntry::new(
            day(2026, 2, 1),
            ContactChannel::Meeting,
            "Kickoff".to_string(),
        ));

        let copy = original.duplicate();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.name, "Imobiliária Horizonte (Copy)");

        let mut normalized = copy.clone();
        normalized.id = original.id;
        normalized.name = original.name.clone();
        assert_eq!(normalized, original);
    }

    #[test]
    fn test_record_interaction_updates_quick_fields() {
        let mut company = Company::from_draft(sample_draft(), day(2026, 1, 5));
        let mut entry = ContactHistoryEntry::new(
            day(2026, 3, 10),
            ContactChannel::Chat,
            "Sent new commission table".to_string(),
        );
        entry.follow_up = Some(day(2026, 3, 20));
        company.record_interaction(entry);

        assert_eq!(company.last_contact, Some(day(2026, 3, 10)));
        assert_eq!(company.last_contact_channel, Some(ContactChannel::Chat));
        assert_eq!(company.next_contact, Some(day(2026, 3, 20)));
        assert_eq!(company.contact_history.len(), 1);
    }

    #[test]
    fn test_license_identifier() {
        let id = Identifier::new(IdentifierKind::License, " 12345-j ", Some("sp"));
        assert_eq!(id.value(), "12345J");
        assert_eq!(id.display(), "12345J/SP");
        assert_eq!(id.kind(), IdentifierKind::License);
    }

    #[test]
    fn test_serde_roundtrip() {
        let company = Company::from_draft(sample_draft(), day(2026, 1, 5));
        let json = serde_json::to_string(&company).unwrap();
        assert!(json.contains("\"kind\":\"cnpj\""));
        let back: Company = serde_json::from_str(&json).unwrap();
        assert_eq!(back, company);
    }
}
