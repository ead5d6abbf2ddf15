use chrono::NaiveDateTime;
use std::fmt::Write;

use super::format_commission;
use crate::models::Company;
use crate::view::dashboard_stats;

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = "body{background:#f8fafc;font-family:sans-serif;margin:2rem}\
.cards{display:flex;gap:1.5rem;margin-bottom:2rem}\
.card{background:#fff;border-radius:1rem;box-shadow:0 4px 6px -1px rgb(0 0 0/.1);padding:1.5rem;flex:1}\
.card p.label{font-size:.75rem;font-weight:bold;color:#94a3b8;text-transform:uppercase;margin:0}\
.card p.value{font-size:1.875rem;font-weight:bold;margin:.25rem 0 0}\
table{width:100%;border-collapse:collapse;background:#fff}\
th,td{padding:1rem;text-align:left;border-bottom:1px solid #e2e8f0}\
.status-active{color:#15803d}.status-inactive{color:#64748b}";

/// Standalone HTML report: headline statistics and one table row per
/// partner. Every piece of record text is escaped.
pub fn render_html(companies: &[Company], generated_at: NaiveDateTime) -> String {
    let stats = dashboard_stats(companies);
    let active = companies.iter().filter(|c| c.is_active()).count();

    let mut rows = String::new();
    for c in companies {
        let status_class = if c.is_active() {
            "status-active"
        } else {
            "status-inactive"
        };
        // Writing to a String cannot fail.
        let _ = write!(
            rows,
            "<tr><td><strong>{}</strong></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td class=\"{}\">{}</td></tr>\n",
            escape_html(&c.name),
            escape_html(&c.identifier.display()),
            escape_html(&c.account_owner),
            c.broker_count,
            escape_html(&format_commission(c.commission_rate)),
            status_class,
            c.status.label(),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Partner Report - PartnerHub</title>
<style>{style}</style>
</head>
<body>
<header>
<h1>PartnerHub</h1>
<p>Strategic report of partner agencies</p>
<p class="generated">Generated at {generated}</p>
</header>
<section class="cards">
<div class="card"><p class="label">Total partners</p><p class="value">{total}</p></div>
<div class="card"><p class="label">Total brokers</p><p class="value">{brokers}</p></div>
<div class="card"><p class="label">Active</p><p class="value">{active}</p></div>
</section>
<table>
<thead><tr><th>Name</th><th>Document</th><th>Account owner</th><th>Brokers</th><th>Commission</th><th>Status</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
</body>
</html>
"#,
        style = STYLE,
        generated = generated_at.format("%Y-%m-%d %H:%M"),
        total = stats.total_companies,
        brokers = stats.total_brokers,
        active = active,
        rows = rows,
    )
}
