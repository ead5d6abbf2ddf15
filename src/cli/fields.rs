//! Turning command-line flags into filter criteria, drafts and patches.

use anyhow::{anyhow, bail, Result};

use crate::cli::ui::parse_date;
use crate::cli::{CompanyFields, FilterArgs};
use crate::models::{
    Company, CompanyDraft, CompanyPatch, CompanyStatus, ContactChannel, GeoPoint, Identifier,
    IdentifierKind,
};
use crate::view::Criteria;

/// Optional fields `edit --clear` accepts.
pub const CLEARABLE: [&str; 9] = [
    "responsible",
    "partner-contact",
    "website",
    "complement",
    "last-contact",
    "last-channel",
    "contact-summary",
    "next-contact",
    "notes",
];

pub fn parse_status(s: &str) -> Result<CompanyStatus> {
    CompanyStatus::parse(s).ok_or_else(|| anyhow!("Unknown status '{}': use active or inactive", s))
}

pub fn parse_channel(s: &str) -> Result<ContactChannel> {
    ContactChannel::parse(s).ok_or_else(|| {
        let known: Vec<&str> = ContactChannel::all().iter().map(|c| c.as_str()).collect();
        anyhow!("Unknown channel '{}': use one of {}", s, known.join(", "))
    })
}

pub fn parse_kind(s: &str) -> Result<IdentifierKind> {
    IdentifierKind::parse(s)
        .ok_or_else(|| anyhow!("Unknown document type '{}': use cnpj, cpf or license", s))
}

impl FilterArgs {
    pub fn to_criteria(&self) -> Result<Criteria> {
        Ok(Criteria {
            search: self.search.clone(),
            status: self.status.as_deref().map(parse_status).transpose()?,
            commission_min: self.min_commission,
            commission_max: self.max_commission,
            registered_from: self.from.as_deref().map(parse_date).transpose()?,
            registered_to: self.to.as_deref().map(parse_date).transpose()?,
            partnership_contact: self.partner_contact.clone(),
            account_owner: self.owner.clone(),
        })
    }
}

impl CompanyFields {
    pub fn is_empty(&self) -> bool {
        let CompanyFields {
            name,
            doc_type,
            document,
            license_region,
            postal_code,
            street,
            number,
            complement,
            neighborhood,
            city,
            region,
            lat,
            lng,
            responsible,
            partner_contact,
            owner,
            website,
            email,
            phone,
            brokers,
            commission,
            status,
            last_contact,
            last_channel,
            contact_summary,
            next_contact,
            notes,
        } = self;
        [
            name,
            doc_type,
            document,
            license_region,
            postal_code,
            street,
            number,
            complement,
            neighborhood,
            city,
            region,
            responsible,
            partner_contact,
            owner,
            website,
            email,
            phone,
            status,
            last_contact,
            last_channel,
            contact_summary,
            next_contact,
            notes,
        ]
        .iter()
        .all(|f| f.is_none())
            && lat.is_none()
            && lng.is_none()
            && brokers.is_none()
            && commission.is_none()
    }

    /// Identifier built from the flags, starting from `current`.
    fn identifier(&self, current: &Identifier) -> Result<Option<Identifier>> {
        if self.doc_type.is_none() && self.document.is_none() && self.license_region.is_none() {
            return Ok(None);
        }
        let kind = match self.doc_type.as_deref() {
            Some(s) => parse_kind(s)?,
            None => current.kind(),
        };
        let number = match self.document.as_deref() {
            Some(n) => n.to_string(),
            None if kind == current.kind() => current.value().to_string(),
            None => bail!("--document is required when changing the document type"),
        };
        let current_region = match current {
            Identifier::License { region, .. } => Some(region.as_str()),
            _ => None,
        };
        let region = self.license_region.as_deref().or(current_region);
        Ok(Some(Identifier::new(kind, &number, region)))
    }

    fn location(&self, current: GeoPoint) -> Option<GeoPoint> {
        if self.lat.is_none() && self.lng.is_none() {
            return None;
        }
        Some(GeoPoint {
            lat: self.lat.unwrap_or(current.lat),
            lng: self.lng.unwrap_or(current.lng),
        })
    }

    /// Overwrite the draft with every field given on the command line.
    pub fn apply_to_draft(&self, draft: &mut CompanyDraft) -> Result<()> {
        if let Some(ref v) = self.name {
            draft.name = v.clone();
        }
        if let Some(identifier) = self.identifier(&draft.identifier)? {
            draft.identifier = identifier;
        }
        if let Some(ref v) = self.postal_code {
            draft.postal_code = v.clone();
        }
        let address = &mut draft.address;
        for (flag, target) in [
            (&self.street, &mut address.street),
            (&self.number, &mut address.number),
            (&self.neighborhood, &mut address.neighborhood),
            (&self.city, &mut address.city),
            (&self.region, &mut address.region),
        ] {
            if let Some(v) = flag {
                *target = v.trim().to_string();
            }
        }
        if self.complement.is_some() {
            address.complement = crate::cli::ui::non_empty(self.complement.clone());
        }
        if let Some(location) = self.location(draft.location) {
            draft.location = location;
        }
        if self.responsible.is_some() {
            draft.responsible = self.responsible.clone();
        }
        if self.partner_contact.is_some() {
            draft.partnership_contact = self.partner_contact.clone();
        }
        if let Some(ref v) = self.owner {
            draft.account_owner = v.clone();
        }
        if self.website.is_some() {
            draft.website = self.website.clone();
        }
        if let Some(ref v) = self.email {
            draft.email = v.clone();
        }
        if let Some(ref v) = self.phone {
            draft.phone = v.clone();
        }
        if let Some(v) = self.brokers {
            draft.broker_count = v;
        }
        if let Some(v) = self.commission {
            draft.commission_rate = v;
        }
        if let Some(ref v) = self.status {
            draft.status = parse_status(v)?;
        }
        if let Some(ref v) = self.last_contact {
            draft.last_contact = Some(parse_date(v)?);
        }
        if let Some(ref v) = self.last_channel {
            draft.last_contact_channel = Some(parse_channel(v)?);
        }
        if self.contact_summary.is_some() {
            draft.contact_summary = self.contact_summary.clone();
        }
        if let Some(ref v) = self.next_contact {
            draft.next_contact = Some(parse_date(v)?);
        }
        if self.notes.is_some() {
            draft.notes = self.notes.clone();
        }
        Ok(())
    }

    /// Only the fields given on the command line, plus the cleared ones.
    pub fn to_patch(&self, current: &Company, clear: &[String]) -> Result<CompanyPatch> {
        for field in clear {
            if !CLEARABLE.contains(&field.as_str()) {
                bail!(
                    "Cannot clear '{}'. Clearable fields: {}",
                    field,
                    CLEARABLE.join(", ")
                );
            }
        }
        let cleared = |name: &str| clear.iter().any(|c| c == name);

        let address_changed = self.street.is_some()
            || self.number.is_some()
            || self.complement.is_some()
            || self.neighborhood.is_some()
            || self.city.is_some()
            || self.region.is_some()
            || cleared("complement");
        let address = if address_changed {
            let mut draft = CompanyDraft::from(current);
            self.apply_to_draft_address(&mut draft);
            if cleared("complement") {
                draft.address.complement = None;
            }
            Some(draft.address)
        } else {
            None
        };

        let optional = |flag: &Option<String>, name: &str| -> Option<Option<String>> {
            if cleared(name) {
                Some(None)
            } else {
                flag.clone().map(Some)
            }
        };
        let optional_date = |flag: &Option<String>, name: &str| -> Result<_> {
            if cleared(name) {
                Ok(Some(None))
            } else {
                flag.as_deref().map(|d| parse_date(d).map(Some)).transpose()
            }
        };

        Ok(CompanyPatch {
            name: self.name.clone(),
            identifier: self.identifier(&current.identifier)?,
            postal_code: self.postal_code.clone(),
            address,
            location: self.location(current.location),
            responsible: optional(&self.responsible, "responsible"),
            partnership_contact: optional(&self.partner_contact, "partner-contact"),
            account_owner: self.owner.clone(),
            website: optional(&self.website, "website"),
            email: self.email.clone(),
            phone: self.phone.clone(),
            broker_count: self.brokers,
            commission_rate: self.commission,
            status: self.status.as_deref().map(parse_status).transpose()?,
            last_contact: optional_date(&self.last_contact, "last-contact")?,
            last_contact_channel: if cleared("last-channel") {
                Some(None)
            } else {
                self.last_channel
                    .as_deref()
                    .map(|c| parse_channel(c).map(Some))
                    .transpose()?
            },
            contact_summary: optional(&self.contact_summary, "contact-summary"),
            next_contact: optional_date(&self.next_contact, "next-contact")?,
            notes: optional(&self.notes, "notes"),
            contact_history: None,
        })
    }

    fn apply_to_draft_address(&self, draft: &mut CompanyDraft) {
        let only_address = CompanyFields {
            street: self.street.clone(),
            number: self.number.clone(),
            complement: self.complement.clone(),
            neighborhood: self.neighborhood.clone(),
            city: self.city.clone(),
            region: self.region.clone(),
            ..Default::default()
        };
        // Address-only fields cannot fail to apply.
        let _ = only_address.apply_to_draft(draft);
    }
}
