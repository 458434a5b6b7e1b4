pub mod cleaner;
pub mod loader;

use std::path::{Path, PathBuf};

use crate::config::SheetLayout;
use crate::error::Result;
use crate::model::row::CleanRow;

/// Locate the workbook in `folder`, read it and clean the rows.
pub fn load_offer_list(folder: &Path, layout: &SheetLayout) -> Result<(PathBuf, Vec<CleanRow>)> {
    let path = loader::find_spreadsheet(folder, &layout.extension)?;
    let rows = loader::load_rows(&path, layout)?;
    Ok((path, cleaner::clean(rows)))
}
