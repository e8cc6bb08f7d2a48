//! Case template creation: a header-only file with the ten case columns,
//! handed to users as an input form.

use crate::error::Result;
use crate::read::has_extension;
use caseflow_model::CASE_COLUMNS;
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Output format for [`write_template`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Csv,
    Xlsx,
}

impl TemplateFormat {
    /// Explicit format wins; otherwise infer from the output extension,
    /// defaulting to CSV.
    pub fn for_path(path: &Path, explicit: Option<TemplateFormat>) -> TemplateFormat {
        match explicit {
            Some(format) => format,
            None if has_extension(path, "xlsx") => TemplateFormat::Xlsx,
            None => TemplateFormat::Csv,
        }
    }
}

/// Write a header-only template file with the ten case columns.
pub fn write_template(path: &Path, format: TemplateFormat) -> Result<()> {
    match format {
        TemplateFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)?;
            writer.write_record(CASE_COLUMNS)?;
            writer.flush()?;
        }
        TemplateFormat::Xlsx => {
            let mut workbook = Workbook::new();
            let sheet = workbook.add_worksheet();
            for (idx, column) in CASE_COLUMNS.iter().enumerate() {
                sheet.write_string(0, idx as u16, *column)?;
            }
            workbook.save(path)?;
        }
    }
    Ok(())
}
