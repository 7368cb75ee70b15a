use super::{SheetError, SheetRecord};
use crate::core::CellValue;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Days, NaiveDate};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// First worksheet of an Excel/ODS file.
pub fn read_grid(path: &Path) -> Result<Vec<Vec<CellValue>>, SheetError> {
    let mut workbook = open_workbook_auto(path)?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SheetError::NoWorksheet(path.to_path_buf()))?;
    let range = workbook.worksheet_range(&name)?;
    log::debug!("Reading sheet '{}' ({:?})", name, range.get_size());

    Ok(range
        .rows()
        .map(|row| row.iter().map(to_cell).collect())
        .collect())
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Int(n) => CellValue::Number(Decimal::from(*n)),
        Data::Float(f) => match Decimal::from_f64(*f) {
            Some(d) => CellValue::Number(d.normalize()),
            None => CellValue::NotANumber(f.to_string()),
        },
        Data::Bool(b) => CellValue::text(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(dt) => match serial_to_date(dt.as_f64()) {
            Some(date) => CellValue::Text(date.format("%d-%m-%Y").to_string()),
            None => CellValue::Text(dt.as_f64().to_string()),
        },
        Data::Error(e) => CellValue::NotANumber(format!("#{:?}", e)),
        other => CellValue::Text(other.to_string()),
    }
}

/// Excel 1900-system serial to a calendar date (time of day dropped).
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

pub fn write_records<R: SheetRecord>(path: &Path, records: &[R]) -> Result<(), SheetError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("0.00");

    for (col, column) in R::columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column.name, &header)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, cell) in record.cells().iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(s) | CellValue::NotANumber(s) => {
                    worksheet.write_string(row, col, s.as_str())?;
                }
                CellValue::Number(d) => {
                    let value = d.to_f64().unwrap_or_default();
                    if d.scale() > 0 {
                        worksheet.write_number_with_format(row, col, value, &money)?;
                    } else {
                        worksheet.write_number(row, col, value)?;
                    }
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn excel_serials_become_day_first_dates() {
        assert_eq!(serial_to_date(45383.0), NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(serial_to_date(45383.75), NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(serial_to_date(0.0), None);
    }

    #[test]
    fn cells_from_calamine_data() {
        assert_eq!(to_cell(&Data::Float(118.5)), CellValue::Number(dec!(118.5)));
        assert_eq!(to_cell(&Data::Int(3)), CellValue::Number(dec!(3)));
        assert_eq!(to_cell(&Data::String(" ".into())), CellValue::Empty);
        assert_eq!(to_cell(&Data::String("Acme".into())), CellValue::text("Acme"));
        assert_eq!(to_cell(&Data::Empty), CellValue::Empty);
    }
}
