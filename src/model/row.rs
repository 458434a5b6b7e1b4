/// One record of the offer list as read from the workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRow {
    /// 1-based row number in the sheet, for error messages.
    pub sheet_row: u32,
    pub offer_number: Option<String>,
    pub company: Option<String>,
    pub project_name: Option<String>,
    pub status_code: Option<String>,
    pub scope_of_work: Option<String>,
    pub revenue: Option<f64>,
    pub offer_country: Option<String>,
    pub installation_country: Option<String>,
    pub member_code: Option<String>,
    pub due_date: Option<String>,
}

/// A row that passed the identity filter, with sentinels substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRow {
    pub offer_number: String,
    pub company: String,
    pub project_name: String,
    pub status_code: Option<String>,
    pub scope_of_work: Option<String>,
    pub revenue: f64,
    pub offer_country: Option<String>,
    pub installation_country: Option<String>,
    pub member_code: Option<String>,
    pub due_date: Option<String>,
}

/// Everything needed to create and decorate one card.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub offer_number: String,
    pub title: String,
    pub description: String,
    pub label_name: Option<String>,
    pub member_name: Option<String>,
    pub due: Option<String>,
    pub revenue: f64,
}
