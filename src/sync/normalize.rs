use std::collections::HashMap;

use crate::config::ReclassConfig;
use crate::model::row::{CleanRow, NormalizedRow};

/// Look `code` up in `table`; unknown codes come back unchanged.
pub fn reclassify(table: &HashMap<String, String>, code: Option<String>) -> Option<String> {
    code.map(|c| table.get(&c).cloned().unwrap_or(c))
}

pub fn card_title(row: &CleanRow) -> String {
    format!("{}_{}_{}", row.company, row.offer_number, row.project_name)
}

pub fn card_description(row: &CleanRow) -> String {
    format!(
        "**Leistungsumfang**: {} \n**Angebotsland**: {} \n**Aufstellungsland**: {}",
        row.scope_of_work.as_deref().unwrap_or_default(),
        row.offer_country.as_deref().unwrap_or_default(),
        row.installation_country.as_deref().unwrap_or_default(),
    )
}

pub fn normalize(row: CleanRow, tables: &ReclassConfig) -> NormalizedRow {
    let title = card_title(&row);
    let description = card_description(&row);
    NormalizedRow {
        title,
        description,
        label_name: reclassify(&tables.status, row.status_code),
        member_name: reclassify(&tables.members, row.member_code),
        due: row.due_date,
        revenue: row.revenue,
        offer_number: row.offer_number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_row() -> CleanRow {
        CleanRow {
            offer_number: "4711".into(),
            company: "ACME".into(),
            project_name: "Plant".into(),
            status_code: Some("H".into()),
            scope_of_work: Some("Service".into()),
            revenue: 1500.0,
            offer_country: Some("DE".into()),
            installation_country: Some("ES".into()),
            member_code: Some("PS".into()),
            due_date: Some("2024-05-01T00:00:00".into()),
        }
    }

    #[test]
    fn maps_known_codes() {
        let row = normalize(clean_row(), &ReclassConfig::default());
        assert_eq!(row.label_name.as_deref(), Some("HOT"));
        assert_eq!(row.member_name.as_deref(), Some("Pedro J Sanchez"));
    }

    #[test]
    fn unknown_codes_pass_through() {
        let mut source = clean_row();
        source.status_code = Some("X".into());
        source.member_code = Some("ZZ".into());
        let row = normalize(source, &ReclassConfig::default());
        assert_eq!(row.label_name.as_deref(), Some("X"));
        assert_eq!(row.member_name.as_deref(), Some("ZZ"));
    }

    #[test]
    fn absent_codes_stay_absent() {
        let tables = ReclassConfig::default();
        assert_eq!(reclassify(&tables.status, None), None);
    }

    #[test]
    fn builds_title_and_description() {
        let row = normalize(clean_row(), &ReclassConfig::default());
        assert_eq!(row.title, "ACME_4711_Plant");
        assert_eq!(
            row.description,
            "**Leistungsumfang**: Service \n**Angebotsland**: DE \n**Aufstellungsland**: ES"
        );
        assert_eq!(row.due.as_deref(), Some("2024-05-01T00:00:00"));
        assert_eq!(row.revenue, 1500.0);
        assert_eq!(row.offer_number, "4711");
    }

    #[test]
    fn missing_description_parts_render_empty() {
        let mut source = clean_row();
        source.scope_of_work = None;
        source.due_date = None;
        let row = normalize(source, &ReclassConfig::default());
        assert!(row.description.starts_with("**Leistungsumfang**:  \n"));
        assert_eq!(row.due, None);
    }

    #[test]
    fn sentinel_names_flow_into_title() {
        let mut source = clean_row();
        source.company = "BLANKO".into();
        let row = normalize(source, &ReclassConfig::default());
        assert_eq!(row.title, "BLANKO_4711_Plant");
    }
}
