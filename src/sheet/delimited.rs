use super::{SheetError, SheetRecord};
use crate::core::CellValue;
use std::fs::File;
use std::path::Path;

pub fn read_grid(path: &Path) -> Result<Vec<Vec<CellValue>>, SheetError> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut grid = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                let field = field.trim_start_matches('\u{feff}');
                if field.trim().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::text(field)
                }
            })
            .collect();
        grid.push(row);
    }
    Ok(grid)
}

pub fn write_records<R: SheetRecord>(path: &Path, records: &[R]) -> Result<(), SheetError> {
    let mut wtr = csv::Writer::from_path(path)?;
    if records.is_empty() {
        wtr.write_record(R::columns().iter().map(|c| c.name))?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
