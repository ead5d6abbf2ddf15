//! Shared UI primitives for partnerhub
//!
//! Conventions:
//! - Prompts: lowercase with colon and space: `name: `
//! - Feedback: single word when possible: `Saved.`
//! - Errors and warnings go to stderr

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use inquire::{ui::RenderConfig, Confirm, InquireError, Select, Text};
use uuid::Uuid;

use crate::models::Company;
use crate::store::StoreError;

/// Shortest UUID prefix accepted as an identifier.
const MIN_ID_PREFIX: usize = 4;

// ============================================================================
// Layout Primitives
// ============================================================================

/// Truncate a string to max_chars, adding ellipsis if needed.
/// Result will be at most max_chars characters (including ellipsis if truncated).
pub fn truncate(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars - 1).collect();
    format!("{}…", kept.trim_end())
}

/// First eight characters of an ID, enough to address a record.
pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Get terminal dimensions, defaulting to 80x24 if unavailable
pub fn term_size() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

/// Number of rows a selection list may use.
pub fn visible_lines() -> usize {
    let (_, height) = term_size();
    height.saturating_sub(4).max(5)
}

// ============================================================================
// Message Functions
// ============================================================================

/// Print an error message to stderr
#[inline]
pub fn error(msg: &str) {
    eprintln!("Error: {}", msg);
}

/// Print a warning message to stderr
#[inline]
pub fn warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}

/// Print every reason a submission was rejected, one per line.
pub fn print_store_error(err: &StoreError) {
    match err {
        StoreError::Invalid(errors) => {
            eprintln!("Not saved:");
            for e in errors.iter() {
                eprintln!("  - {}", e);
            }
        }
        other => error(&other.to_string()),
    }
}

// ============================================================================
// Prompts
// ============================================================================

/// Get a minimal render config for inquire prompts
pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Display a selection menu and return the chosen index
pub fn select<T: ToString>(prompt: &str, options: &[T]) -> Result<Option<usize>> {
    if options.is_empty() {
        return Ok(None);
    }

    let items: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    let result = Select::new(prompt, items.clone())
        .with_render_config(minimal_render_config())
        .with_page_size(visible_lines())
        .with_vim_mode(true)
        .prompt_skippable()?;

    Ok(result.and_then(|selected| items.iter().position(|i| *i == selected)))
}

/// Prompt for yes/no confirmation (default: no). Cancelling counts as no.
pub fn confirm(prompt: &str) -> Result<bool> {
    let result = Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt();

    match result {
        Ok(answer) => Ok(answer),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Result type for form inputs that can be cancelled
pub enum FormResult<T> {
    Value(T),
    Cancelled,
}

/// Prompt for a field with optional current value
/// Format: `field [current]: ` or `field: ` if no current value
/// Empty input keeps the current value; `-` clears it.
pub fn prompt_field(field: &str, current: Option<&str>) -> Result<FormResult<String>> {
    let has_value = current.is_some_and(|v| !v.is_empty());
    let prompt = match current {
        Some(val) if !val.is_empty() => format!("{} [{}]: ", field, truncate(val, 30)),
        _ => format!("{}: ", field),
    };

    let result = Text::new(&prompt)
        .with_render_config(minimal_render_config())
        .prompt();

    match result {
        Ok(input) => {
            let input = input.trim();
            if input == "-" && has_value {
                Ok(FormResult::Value(String::new()))
            } else if input.is_empty() {
                Ok(FormResult::Value(current.unwrap_or("").to_string()))
            } else {
                Ok(FormResult::Value(input.to_string()))
            }
        }
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Ok(FormResult::Cancelled)
        }
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse `YYYY-MM-DD`, or `today`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("today") {
        return Ok(chrono::Local::now().date_naive());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Blank input becomes `None`.
pub fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// ============================================================================
// Record Lookup
// ============================================================================

/// How an identifier matched the collection.
#[derive(Debug, PartialEq)]
pub enum Matches<'a> {
    None,
    One(&'a Company),
    Many(Vec<&'a Company>),
}

/// Resolve an identifier: full UUID, unique UUID prefix, then
/// case-insensitive name search.
pub fn match_companies<'a>(companies: &'a [Company], identifier: &str) -> Matches<'a> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Matches::None;
    }

    if let Ok(id) = Uuid::parse_str(identifier) {
        return match companies.iter().find(|c| c.id == id) {
            Some(c) => Matches::One(c),
            None => Matches::None,
        };
    }

    let lower = identifier.to_lowercase();
    if lower.len() >= MIN_ID_PREFIX && lower.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        let by_prefix: Vec<&Company> = companies
            .iter()
            .filter(|c| c.id.to_string().starts_with(&lower))
            .collect();
        if by_prefix.len() == 1 {
            return Matches::One(by_prefix[0]);
        }
    }

    let by_name: Vec<&Company> = companies
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&lower))
        .collect();
    match by_name.len() {
        0 => Matches::None,
        1 => Matches::One(by_name[0]),
        _ => Matches::Many(by_name),
    }
}

/// Find a partner by UUID, ID prefix or name. Prompts for a choice when
/// several names match. Returns None if not found or selection cancelled.
pub fn find_company(companies: &[Company], identifier: &str) -> Result<Option<Company>> {
    match match_companies(companies, identifier) {
        Matches::None => {
            println!("No partner matches '{}'.", identifier.trim());
            Ok(None)
        }
        Matches::One(c) => Ok(Some(c.clone())),
        Matches::Many(list) => {
            let labels: Vec<String> = list
                .iter()
                .map(|c| format!("{}  {}  {}", short_id(c.id), c.name, c.identifier.display()))
                .collect();
            Ok(select("partner:", &labels)?.map(|idx| list[idx].clone()))
        }
    }
}
