//! Terminal rendering of the token list

use crate::application::{ExplorerPhase, ExplorerSnapshot};
use crate::domain::{HoverState, TokenRow};

const DESCRIPTION_PREVIEW_CHARS: usize = 8;

/// `ABCD...WXYZ`
pub fn short_mint(mint: &str) -> String {
    let chars: Vec<char> = mint.chars().collect();
    if chars.len() <= 8 {
        return mint.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// `$1.23M`, `$4.56k`, `$7.89`; absent or zero is `N/A`
pub fn format_market_cap(market_cap: Option<f64>) -> String {
    match market_cap {
        Some(v) if v != 0.0 && !v.is_nan() => {
            if v >= 1_000_000.0 {
                format!("${:.2}M", v / 1_000_000.0)
            } else if v >= 1_000.0 {
                format!("${:.2}k", v / 1_000.0)
            } else {
                format!("${:.2}", v)
            }
        }
        _ => "N/A".to_string(),
    }
}

pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        return description.to_string();
    }
    let preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    format!("{}...", preview)
}

pub fn format_created_at(row: &TokenRow) -> String {
    row.record
        .created_at_utc()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| row.record.created_at.to_string())
}

/// `Showing 30 of ~120 tokens`
pub fn result_header(snapshot: &ExplorerSnapshot) -> String {
    format!(
        "Showing {} of {} tokens",
        snapshot.rows.len(),
        snapshot.cursor.total
    )
}

pub fn render_row(row: &TokenRow) -> String {
    let mut out = format!(
        "{} ({})  {}  created {}",
        row.record.name,
        row.record.symbol,
        short_mint(row.mint()),
        format_created_at(row)
    );

    if let Some(ath) = row.enrichment.ath_market_cap {
        out.push_str(&format!("\n    ATH: {}", format_market_cap(Some(ath))));
    }

    match row.hover {
        HoverState::NotRequested => {}
        HoverState::Loading => out.push_str("\n    loading..."),
        HoverState::Enriched => {
            out.push_str(&format!(
                "\n    Market cap: {}",
                format_market_cap(row.enrichment.market_cap)
            ));
            if let Some(image) = &row.enrichment.image {
                out.push_str(&format!("\n    Image: {}", image));
            }
            if let Some(description) = &row.enrichment.description {
                out.push_str(&format!("\n    {}", truncate_description(description)));
            }
        }
    }

    out
}

pub fn render_snapshot(snapshot: &ExplorerSnapshot) -> String {
    let mut lines = vec![result_header(snapshot)];
    if snapshot.rows.is_empty() {
        lines.push("No tokens found".to_string());
    }
    lines.extend(snapshot.rows.iter().map(render_row));
    if snapshot.phase == ExplorerPhase::Exhausted && !snapshot.rows.is_empty() {
        lines.push("-- end of results --".to_string());
    }
    lines.join("\n")
}
