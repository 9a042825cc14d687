//! CSV reading and writing of [`LabeledMatrix`].

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::engine::errors::EvalError;
use crate::engine::matrix::{LabeledMatrix, SignedMatrix};

/// Loads a labeled matrix from a CSV file.
pub fn read_labeled_matrix(path: impl AsRef<Path>) -> Result<LabeledMatrix, EvalError> {
    let file = File::open(path.as_ref())?;
    read_labeled_matrix_from(file)
}

/// Loads a labeled matrix from any reader.
///
/// Row labels must repeat the header names in the same order. Cells may be
/// written as integers (`-1`) or integer-valued floats (`-1.0`).
pub fn read_labeled_matrix_from<R: Read>(reader: R) -> Result<LabeledMatrix, EvalError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let names: Vec<String> = rdr.headers()?.iter().skip(1).map(str::to_string).collect();

    let mut rows = Vec::with_capacity(names.len());
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let label = record.get(0).unwrap_or_default();
        match names.get(i) {
            Some(expected) if expected == label => {}
            Some(expected) => {
                return Err(EvalError::InvalidMatrix(format!(
                    "row {} is labeled '{}' but column {} is '{}'",
                    i, label, i, expected
                )))
            }
            None => {
                return Err(EvalError::InvalidMatrix(format!(
                    "more rows than the {} header columns",
                    names.len()
                )))
            }
        }
        let row = record
            .iter()
            .skip(1)
            .map(|cell| parse_cell(cell, label))
            .collect::<Result<Vec<i8>, EvalError>>()?;
        rows.push(row);
    }
    if rows.len() != names.len() {
        return Err(EvalError::InvalidMatrix(format!(
            "{} rows for {} header columns",
            rows.len(),
            names.len()
        )));
    }

    LabeledMatrix::new(names, SignedMatrix::from_rows(rows)?)
}

fn parse_cell(cell: &str, row: &str) -> Result<i8, EvalError> {
    if let Ok(v) = cell.parse::<i8>() {
        return Ok(v);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && (-1.0..=1.0).contains(&v) => Ok(v as i8),
        _ => Err(EvalError::InvalidMatrix(format!(
            "row '{}' holds non-signed cell '{}'",
            row, cell
        ))),
    }
}

/// Writes a labeled matrix as CSV, creating or truncating the file.
pub fn write_labeled_matrix(path: impl AsRef<Path>, m: &LabeledMatrix) -> Result<(), EvalError> {
    let file = File::create(path.as_ref())?;
    write_labeled_matrix_to(file, m)
}

/// Writes a labeled matrix to any writer.
pub fn write_labeled_matrix_to<W: Write>(writer: W, m: &LabeledMatrix) -> Result<(), EvalError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(std::iter::once("").chain(m.names.iter().map(String::as_str)))?;
    for (i, name) in m.names.iter().enumerate() {
        let cells: Vec<String> = (0..m.size()).map(|j| m.matrix.get(i, j).to_string()).collect();
        wtr.write_record(std::iter::once(name.as_str()).chain(cells.iter().map(String::as_str)))?;
    }
    wtr.flush()?;
    Ok(())
}
