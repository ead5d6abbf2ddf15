//! Derived views over the partner collection: filtering, dashboard
//! statistics, upcoming follow-ups and input suggestions. All pure.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Company, CompanyStatus};

/// How many follow-ups the dashboard shows.
pub const UPCOMING_LIMIT: usize = 5;

/// Active filter criteria. Unset (or blank) criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    /// Case-insensitive match against name or identifier number.
    pub search: Option<String>,
    pub status: Option<CompanyStatus>,
    pub commission_min: Option<f64>,
    pub commission_max: Option<f64>,
    pub registered_from: Option<NaiveDate>,
    pub registered_to: Option<NaiveDate>,
    pub partnership_contact: Option<String>,
    pub account_owner: Option<String>,
}

fn needle(s: &Option<String>) -> Option<String> {
    s.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.unwrap_or_default().to_lowercase().contains(needle)
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        needle(&self.search).is_none()
            && self.status.is_none()
            && self.commission_min.is_none()
            && self.commission_max.is_none()
            && self.registered_from.is_none()
            && self.registered_to.is_none()
            && needle(&self.partnership_contact).is_none()
            && needle(&self.account_owner).is_none()
    }

    pub fn matches(&self, c: &Company) -> bool {
        if let Some(q) = needle(&self.search) {
            let by_name = c.name.to_lowercase().contains(&q);
            let by_identifier = c.identifier.value().to_lowercase().contains(&q)
                || c.identifier.display().to_lowercase().contains(&q);
            if !by_name && !by_identifier {
                return false;
            }
        }
        if let Some(status) = self.status {
            if c.status != status {
                return false;
            }
        }
        if let Some(min) = self.commission_min {
            if c.commission_rate < min {
                return false;
            }
        }
        if let Some(max) = self.commission_max {
            if c.commission_rate > max {
                return false;
            }
        }
        if let Some(from) = self.registered_from {
            if c.registered_on < from {
                return false;
            }
        }
        if let Some(to) = self.registered_to {
            if c.registered_on > to {
                return false;
            }
        }
        if let Some(q) = needle(&self.partnership_contact) {
            if !contains_ci(c.partnership_contact.as_deref(), &q) {
                return false;
            }
        }
        if let Some(q) = needle(&self.account_owner) {
            if !contains_ci(Some(&c.account_owner), &q) {
                return false;
            }
        }
        true
    }
}

/// Records satisfying every set criterion, in collection order.
pub fn filter_companies<'a>(companies: &'a [Company], criteria: &Criteria) -> Vec<&'a Company> {
    companies.iter().filter(|c| criteria.matches(c)).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_companies: usize,
    pub total_brokers: u64,
    pub avg_brokers: u64,
    pub active_percentage: u64,
}

/// Statistics over the whole, unfiltered collection.
pub fn dashboard_stats(companies: &[Company]) -> DashboardStats {
    let total = companies.len();
    if total == 0 {
        return DashboardStats::default();
    }

    let total_brokers: u64 = companies.iter().map(|c| u64::from(c.broker_count)).sum();
    let active = companies.iter().filter(|c| c.is_active()).count();

    DashboardStats {
        total_companies: total,
        total_brokers,
        avg_brokers: (total_brokers as f64 / total as f64).round() as u64,
        active_percentage: (active as f64 * 100.0 / total as f64).round() as u64,
    }
}

/// (active, inactive)
pub fn status_breakdown(companies: &[Company]) -> (usize, usize) {
    let active = companies.iter().filter(|c| c.is_active()).count();
    (active, companies.len() - active)
}

/// Follow-ups due today or later, soonest first, at most [`UPCOMING_LIMIT`].
pub fn upcoming_contacts(companies: &[Company], today: NaiveDate) -> Vec<&Company> {
    let mut due: Vec<&Company> = companies
        .iter()
        .filter(|c| c.next_contact.is_some_and(|d| d >= today))
        .collect();
    // sort_by_key is stable: ties keep collection order
    due.sort_by_key(|c| c.next_contact);
    due.truncate(UPCOMING_LIMIT);
    due
}

/// Unique non-empty values (first occurrence wins), then sorted.
fn distinct_sorted<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for v in values.flatten().map(str::trim) {
        if !v.is_empty() && !seen.iter().any(|s| s == v) {
            seen.push(v.to_string());
        }
    }
    seen.sort();
    seen
}

pub fn partnership_contact_suggestions(companies: &[Company]) -> Vec<String> {
    distinct_sorted(companies.iter().map(|c| c.partnership_contact.as_deref()))
}

pub fn account_owner_suggestions(companies: &[Company]) -> Vec<String> {
    distinct_sorted(companies.iter().map(|c| Some(c.account_owner.as_str())))
}
