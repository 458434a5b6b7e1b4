use crate::model::row::{CleanRow, SourceRow};

/// Stands in for a missing company or project name.
pub const BLANK_SENTINEL: &str = "BLANKO";

fn or_sentinel(value: Option<String>) -> String {
    match value {
        Some(v) if v != "0" => v,
        _ => BLANK_SENTINEL.to_string(),
    }
}

/// Drop rows without a usable offer number and fill in sentinels.
/// Order is preserved.
pub fn clean(rows: Vec<SourceRow>) -> Vec<CleanRow> {
    rows.into_iter()
        .filter_map(|row| match row.offer_number {
            Some(ref offer) if offer != "0" => Some(CleanRow {
                offer_number: offer.clone(),
                company: or_sentinel(row.company),
                project_name: or_sentinel(row.project_name),
                status_code: row.status_code,
                scope_of_work: row.scope_of_work,
                revenue: row.revenue.unwrap_or(0.0),
                offer_country: row.offer_country,
                installation_country: row.installation_country,
                member_code: row.member_code,
                due_date: row.due_date,
            }),
            _ => None,
        })
        .collect()
}
