use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use nv_results::RawRow;
use snafu::prelude::*;

use crate::nvload::*;

/// Reads the first worksheet of a workbook. The first row holds the field names.
pub fn read_xlsx_rows(path: &str) -> NvResult<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyExcelSnafu {})?
        .context(OpeningExcelSnafu { path })?;

    let mut iter = wrange.rows();
    let header: Vec<String> = match iter.next() {
        Some(cells) => cells
            .iter()
            .map(|c| read_cell(c, 1))
            .collect::<NvResult<Vec<String>>>()?,
        None => return Ok(Vec::new()),
    };
    debug!("read_xlsx_rows: header: {:?}", header);

    let mut res: Vec<RawRow> = Vec::new();
    for (idx, cells) in iter.enumerate() {
        let lineno = (idx + 2) as u64;
        let values = cells
            .iter()
            .map(|c| read_cell(c, lineno))
            .collect::<NvResult<Vec<String>>>()?;
        res.push(RawRow::from_pairs(header.iter().zip(values)));
    }
    debug!("read_xlsx_rows: {} rows in {:?}", res.len(), path);
    Ok(res)
}

fn read_cell(cell: &DataType, lineno: u64) -> NvResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok("".to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        // Counts typed in Excel come back as floats.
        DataType::Float(f) if f.fract() == 0.0 => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}
