/*!
# IO

Utilities for reading and writing edge tables and matrices as delimited text (CSV by default).
Loading data is not part of the core computations, but the column names used here
(`id_start`, `id_end`, `distance`) are exactly those downstream toll computations expect.

## Formats

- **EdgeTable**: a header line naming the columns `id_start`, `id_end` and `distance`
  (in any order, further columns are ignored), followed by one row per edge.
  Empty `distance` fields denote pairs without a direct edge in unrolled tables.
- **MatrixTable**: a header line listing all identifiers after an (ignored) leading cell,
  followed by one row per identifier: the identifier and one cell per column.
  Empty cells denote pairs without a direct edge.

Both formats follow RFC 4180: fields may be quoted and quoted fields may contain the
delimiter. Lines starting with the comment byte (`#` by default) and empty lines are skipped,
fields are trimmed.

## Traits

- [`EdgeTableRead`] / [`EdgeTableWrite`] read a [`DistanceMatrix`] from an edge table and
  write its unrolled form.
- [`MatrixTableRead`] / [`MatrixTableWrite`] do the same for square matrix tables.
*/

pub mod edge_table;
pub mod matrix_table;

use std::io::{ErrorKind, Read, Write};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

pub use edge_table::*;
pub use matrix_table::*;

/// Shorthand for creating a new IO-error
macro_rules! io_error {
    ($kind: expr, $info: expr) => {
        std::io::Error::new($kind, $info)
    };
}

/// Shorthand for returning `Err(std::io::Error)` early when a condition fails
macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(io_error!($kind, $info));
        }
    };
}

/// Tries to parse the field at `column` and returns early if it is missing or cannot be parsed
macro_rules! parse_field {
    ($fields : expr, $column : expr, $name : expr, $line : expr) => {{
        let Some(field) = $fields.get($column) else {
            return Err(io_error!(
                ErrorKind::InvalidData,
                format!("Premature end of line {} when parsing {}.", $line, $name)
            ));
        };

        match field.parse() {
            Ok(value) => value,
            Err(_) => {
                return Err(io_error!(
                    ErrorKind::InvalidData,
                    format!("Invalid value found in line {}. Cannot parse {}.", $line, $name)
                ));
            }
        }
    }};
}

/// Like [`parse_field`] but maps empty fields to `None`
macro_rules! parse_optional_field {
    ($fields : expr, $column : expr, $name : expr, $line : expr) => {{
        match $fields.get($column) {
            Some(field) if field.is_empty() => None,
            _ => Some(parse_field!($fields, $column, $name, $line)),
        }
    }};
}

use io_error;
use parse_field;
use parse_optional_field;
use raise_error_unless;

/// Creates a reader with a header line that tolerates rows of different lengths.
/// Missing fields are reported by [`parse_field`] instead.
fn csv_reader<R: Read>(reader: R, delimiter: u8, comment: Option<u8>) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .comment(comment)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn csv_writer<W: Write>(writer: W, delimiter: u8) -> csv::Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_writer(writer)
}

/// Converts a [`csv::Error`] into an IO-error; malformed data becomes `ErrorKind::InvalidData`
fn csv_error(err: csv::Error) -> std::io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(err) => err,
        kind => io_error!(ErrorKind::InvalidData, format!("Malformed table: {kind:?}")),
    }
}

/// Line of a record within the input (`0` if unknown)
fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |pos| pos.line())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reader_settings() {
        let table = "# comment\n\"id\",\"name\"\n1,\"a,b\"\n\n# x\n2 , c\n";
        let mut reader = csv_reader(Cursor::new(table), b',', Some(b'#'));

        assert_eq!(reader.headers().unwrap().iter().collect::<Vec<_>>(), vec!["id", "name"]);
        let records: Vec<StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].iter().collect::<Vec<_>>(), vec!["1", "a,b"]);
        assert_eq!(records[1].iter().collect::<Vec<_>>(), vec!["2", "c"]);
        assert!(line_of(&records[1]) > line_of(&records[0]));
    }

    #[test]
    fn errors() {
        let io = csv_error(csv::Error::from(io_error!(ErrorKind::NotFound, "gone")));
        assert_eq!(io.kind(), ErrorKind::NotFound);

        let mut reader = csv_reader(Cursor::new(&b"a,b\n\xff,1\n"[..]), b',', None);
        let err = reader.records().next().unwrap().unwrap_err();
        assert_eq!(csv_error(err).kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_macros() {
        fn parse(fields: &[&str]) -> std::io::Result<(u64, Option<f64>)> {
            let record = StringRecord::from(fields.to_vec());
            let id: u64 = parse_field!(record, 0, "id", 1);
            let d: Option<f64> = parse_optional_field!(record, 1, "distance", 1);
            Ok((id, d))
        }

        assert_eq!(parse(&["3", "1.5"]).unwrap(), (3, Some(1.5)));
        assert_eq!(parse(&["3", ""]).unwrap(), (3, None));
        assert_eq!(parse(&["x", "1"]).unwrap_err().kind(), ErrorKind::InvalidData);
        assert_eq!(parse(&["3", "abc"]).unwrap_err().kind(), ErrorKind::InvalidData);
        assert_eq!(parse(&["3"]).unwrap_err().kind(), ErrorKind::InvalidData);
    }
}
