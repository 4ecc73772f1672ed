//! Plain-text serialization of sequences and grids.
//!
//! Array file: one line of space-separated base-10 integers.
//! Grid file:  a `"R C"` header line followed by R lines of C integers each.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::data::{Grid, Sequence};
use crate::error::{Error, Result};

pub fn write_array<W: Write>(writer: &mut W, sequence: &Sequence) -> std::io::Result<()> {
    write_line(writer, sequence.as_slice())
}

pub fn write_grid<W: Write>(writer: &mut W, grid: &Grid) -> std::io::Result<()> {
    writeln!(writer, "{} {}", grid.rows(), grid.cols())?;
    for row in grid.iter_rows() {
        write_line(writer, row)?;
    }
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, values: &[i64]) -> std::io::Result<()> {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            writer.write_all(b" ")?;
        }
        write!(writer, "{value}")?;
    }
    writer.write_all(b"\n")
}

/// Create or truncate `path` and write `sequence` to it.
pub fn write_array_file(path: impl AsRef<Path>, sequence: &Sequence) -> Result<()> {
    let path = path.as_ref();
    write_file(path, |w| write_array(w, sequence))?;
    info!(path = %path.display(), elements = sequence.len(), "wrote array file");
    Ok(())
}

/// Create or truncate `path` and write `grid` to it.
pub fn write_grid_file(path: impl AsRef<Path>, grid: &Grid) -> Result<()> {
    let path = path.as_ref();
    write_file(path, |w| write_grid(w, grid))?;
    info!(
        path = %path.display(),
        rows = grid.rows(),
        cols = grid.cols(),
        "wrote grid file"
    );
    Ok(())
}

fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    body(&mut writer).map_err(|e| Error::io(path, e))?;
    writer.flush().map_err(|e| Error::io(path, e))
}

pub fn parse_array(path: impl AsRef<Path>) -> Result<Sequence> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let sequence = parse_array_str(&text)?;
    info!(path = %path.display(), elements = sequence.len(), "read array file");
    Ok(sequence)
}

pub fn parse_grid(path: impl AsRef<Path>) -> Result<Grid> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let grid = parse_grid_str(&text)?;
    info!(
        path = %path.display(),
        rows = grid.rows(),
        cols = grid.cols(),
        "read grid file"
    );
    Ok(grid)
}

/// Every whitespace-separated token is one element. Empty input is the empty sequence.
pub fn parse_array_str(text: &str) -> Result<Sequence> {
    let mut values = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        for (col_idx, token) in line.split_whitespace().enumerate() {
            values.push(parse_token(token, line_idx + 1, col_idx + 1)?);
        }
    }
    Ok(Sequence::from(values))
}

pub fn parse_grid_str(text: &str) -> Result<Grid> {
    let mut lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() || lines[0].trim().is_empty() {
        return Err(Error::format(1, "missing \"rows cols\" header"));
    }

    let header: Vec<&str> = lines[0].split_whitespace().collect();
    if header.len() != 2 {
        return Err(Error::format(
            1,
            format!("header must hold 2 values, found {}", header.len()),
        ));
    }
    let rows = parse_dimension(header[0], 1)?;
    let cols = parse_dimension(header[1], 2)?;

    let declared = rows
        .checked_mul(cols)
        .ok_or_else(|| Error::format(1, format!("grid {rows}x{cols} is too large")))?;

    // Blank lines past the declared rows are tolerated; anything else is counted.
    let mut data = lines.split_off(1);
    while data.len() > rows && data.last().is_some_and(|l| l.trim().is_empty()) {
        data.pop();
    }
    if cols > 0 {
        if let Some(i) = data.iter().position(|l| l.trim().is_empty()) {
            return Err(Error::format(
                i + 2,
                format!("blank line where a row of {cols} values was expected"),
            ));
        }
    }
    if data.len() != rows {
        return Err(Error::format(
            data.len().min(rows) + 2,
            format!("header declares {rows} rows, found {}", data.len()),
        ));
    }

    // The header is untrusted; never reserve more cells than the text could hold.
    let mut cells = Vec::with_capacity(declared.min(text.len() / 2 + 1));
    for (i, line) in data.iter().enumerate() {
        let line_no = i + 2;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != cols {
            return Err(Error::format(
                line_no,
                format!("expected {cols} values, found {}", tokens.len()),
            ));
        }
        for (col_idx, token) in tokens.into_iter().enumerate() {
            cells.push(parse_token(token, line_no, col_idx + 1)?);
        }
    }

    Grid::from_parts(rows, cols, cells)
}

fn parse_token(token: &str, line: usize, column: usize) -> Result<i64> {
    token.parse::<i64>().map_err(|_| Error::Parse {
        token: token.to_string(),
        line,
        column,
    })
}

fn parse_dimension(token: &str, column: usize) -> Result<usize> {
    token.parse::<usize>().map_err(|_| Error::Parse {
        token: token.to_string(),
        line: 1,
        column,
    })
}
