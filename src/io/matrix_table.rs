//! # MatrixTable
//!
//! The MatrixTable-Format writes a [`DistanceMatrix`] as a square table:
//! ```text
//! ,1001,1002,1003
//! 1001,0,10,
//! 1002,10,0,5
//! 1003,,5,0
//! ```
//! The leading cell of the header is ignored. Empty cells denote pairs without a direct edge.

use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
    str::FromStr,
};

use super::*;
use crate::prelude::*;

/// A reader for the MatrixTable-Format
#[derive(Debug, Clone)]
pub struct MatrixTableReader {
    /// Separator between fields
    delimiter: u8,
    /// Lines starting with `comment` are skipped when reading
    comment: Option<u8>,
}

impl Default for MatrixTableReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            comment: Some(b'#'),
        }
    }
}

impl MatrixTableReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the delimiter
    pub fn delimiter(mut self, delimiter: u8) -> MatrixTableReader {
        self.delimiter = delimiter;
        self
    }

    /// Updates the comment byte; `None` disables comments
    pub fn comment(mut self, comment: Option<u8>) -> MatrixTableReader {
        self.comment = comment;
        self
    }

    /// Reads the table and builds the matrix through [`DistanceMatrix::from_rows`].
    ///
    /// # Errors
    /// - [`Error::Io`] if a line cannot be read or parsed, or a row is labelled with a different
    ///   identifier than the corresponding header column,
    /// - [`Error::InvalidInput`] if the table is not square or violates the matrix invariants.
    pub fn try_read_matrix<I, R>(&self, reader: R) -> Result<DistanceMatrix<I>>
    where
        I: Identifier + FromStr,
        R: Read,
    {
        let (ids, rows) = self.read_cells(reader)?;
        DistanceMatrix::from_rows(ids, rows)
    }

    fn read_cells<I, R>(&self, reader: R) -> std::io::Result<(Vec<I>, Vec<Vec<Option<Distance>>>)>
    where
        I: Identifier + FromStr,
        R: Read,
    {
        let mut reader = csv_reader(reader, self.delimiter, self.comment);
        let header = reader.headers().map_err(csv_error)?.clone();
        raise_error_unless!(!header.is_empty(), ErrorKind::NotFound, "Header not found");

        let header_line = line_of(&header);
        let mut ids: Vec<I> = Vec::with_capacity(header.len().saturating_sub(1));
        for column in 1..header.len() {
            ids.push(parse_field!(header, column, "Header>Identifier", header_line));
        }

        let mut rows = Vec::with_capacity(ids.len());
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let line = line_of(&record);

            let label: I = parse_field!(record, 0, "Row>Identifier", line);
            raise_error_unless!(
                ids.get(rows.len()) == Some(&label),
                ErrorKind::InvalidData,
                format!("Row in line {line} is labelled {label:?} which does not match the header")
            );

            let mut row = Vec::with_capacity(record.len().saturating_sub(1));
            for column in 1..record.len() {
                row.push(parse_optional_field!(record, column, "Cell", line));
            }
            rows.push(row);
        }

        Ok((ids, rows))
    }
}

/// A writer for the MatrixTable-Format
#[derive(Debug, Clone)]
pub struct MatrixTableWriter {
    /// Separator between fields
    delimiter: u8,
}

impl Default for MatrixTableWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl MatrixTableWriter {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the delimiter
    pub fn delimiter(mut self, delimiter: u8) -> MatrixTableWriter {
        self.delimiter = delimiter;
        self
    }

    /// Writes the matrix as a square table
    pub fn try_write_matrix<I, W>(&self, matrix: &DistanceMatrix<I>, writer: W) -> std::io::Result<()>
    where
        I: Identifier + Display,
        W: Write,
    {
        let mut writer = csv_writer(writer, self.delimiter);

        let header = std::iter::once(String::new()).chain(matrix.ids().iter().map(|id| id.to_string()));
        writer.write_record(header).map_err(csv_error)?;

        for (id, row) in matrix.rows() {
            let cells = row
                .iter()
                .map(|cell| cell.map_or(String::new(), |d| d.to_string()));
            writer
                .write_record(std::iter::once(id.to_string()).chain(cells))
                .map_err(csv_error)?;
        }

        writer.flush()
    }
}

/// Trait for reading distance matrices from a MatrixTable.
/// Shorthand for default settings.
pub trait MatrixTableRead: Sized {
    /// Tries to read the matrix from a given reader
    fn try_read_matrix_table<R: Read>(reader: R) -> Result<Self>;

    /// Tries to read the matrix from a given file
    fn try_read_matrix_table_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_read_matrix_table(File::open(path)?)
    }
}

impl<I> MatrixTableRead for DistanceMatrix<I>
where
    I: Identifier + FromStr,
{
    fn try_read_matrix_table<R: Read>(reader: R) -> Result<Self> {
        MatrixTableReader::default().try_read_matrix(reader)
    }
}

/// Trait for writing distance matrices as a MatrixTable.
/// Shorthand for default settings.
pub trait MatrixTableWrite {
    /// Tries to write the matrix to a writer
    fn try_write_matrix_table<W: Write>(&self, writer: W) -> Result<()>;

    /// Tries to write the matrix to a file
    fn try_write_matrix_table_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_matrix_table(writer)
    }
}

impl<I> MatrixTableWrite for DistanceMatrix<I>
where
    I: Identifier + Display,
{
    fn try_write_matrix_table<W: Write>(&self, writer: W) -> Result<()> {
        MatrixTableWriter::default().try_write_matrix(self, writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const TABLE: &str = ",1001,1002,1003\n1001,0,10,\n1002,10,0,5\n1003,,5,0\n";

    #[test]
    fn write() {
        let matrix =
            DistanceMatrix::from_edges([(1001u64, 1002, 10.0), (1002, 1003, 5.0)]).unwrap();

        let mut buffer = Vec::new();
        matrix.try_write_matrix_table(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), TABLE);
    }

    #[test]
    fn read() {
        let matrix = DistanceMatrix::<u64>::try_read_matrix_table(Cursor::new(TABLE)).unwrap();
        assert_eq!(
            matrix,
            DistanceMatrix::from_edges([(1001u64, 1002, 10.0), (1002, 1003, 5.0)]).unwrap()
        );

        let tabs = MatrixTableReader::new()
            .delimiter(b'\t')
            .try_read_matrix::<String, _>(Cursor::new("id\ta\tb\na\t0\t1\nb\t1\t0\n"))
            .unwrap();
        assert_eq!(tabs.get(&"a".into(), &"b".into()), Some(1.0));
    }

    #[test]
    fn read_errors() {
        let not_square = ",1,2\n1,0,1\n";
        assert!(matches!(
            DistanceMatrix::<u64>::try_read_matrix_table(Cursor::new(not_square)),
            Err(Error::InvalidInput(_))
        ));

        let ragged = ",1,2\n1,0,1\n2,1\n";
        assert!(matches!(
            DistanceMatrix::<u64>::try_read_matrix_table(Cursor::new(ragged)),
            Err(Error::InvalidInput(_))
        ));

        let mislabelled = ",1,2\n2,0,1\n1,1,0\n";
        assert!(matches!(
            DistanceMatrix::<u64>::try_read_matrix_table(Cursor::new(mislabelled)),
            Err(Error::Io(_))
        ));

        let asymmetric = ",1,2\n1,0,1\n2,2,0\n";
        assert!(matches!(
            DistanceMatrix::<u64>::try_read_matrix_table(Cursor::new(asymmetric)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn quoted_identifiers() {
        let matrix = DistanceMatrix::from_edges([
            ("Main St, 4".to_string(), "Depot".to_string(), 2.0),
            ("Depot".to_string(), "Port \"North\"".to_string(), 1.5),
        ])
        .unwrap();

        let mut buffer = Vec::new();
        matrix.try_write_matrix_table(&mut buffer).unwrap();
        let written = String::from_utf8(buffer).unwrap();
        assert!(written.starts_with(",\"Main St, 4\",Depot,\"Port \"\"North\"\"\"\n"));

        let read = DistanceMatrix::<String>::try_read_matrix_table(Cursor::new(written)).unwrap();
        assert_eq!(read, matrix);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");

        let matrix = DistanceMatrix::from_edges([(3u64, 1, 2.5), (1, 2, 4.0), (2, 3, 1.0)]).unwrap();
        matrix.try_write_matrix_table_file(&path).unwrap();

        assert_eq!(DistanceMatrix::<u64>::try_read_matrix_table_file(&path).unwrap(), matrix);
    }
}
