//! # EdgeTable
//!
//! The EdgeTable-Format consists of a header line naming (at least) the columns
//! `id_start`, `id_end` and `distance`, followed by one delimited row per edge.

use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
    str::FromStr,
};

use csv::StringRecord;
use log::debug;

use super::*;
use crate::{algo::Unroll, prelude::*};

/// Column name of the start identifier
pub const ID_START: &str = "id_start";
/// Column name of the end identifier
pub const ID_END: &str = "id_end";
/// Column name of the distance
pub const DISTANCE: &str = "distance";

/// A reader for the EdgeTable-Format
#[derive(Debug, Clone)]
pub struct EdgeTableReader {
    /// Separator between fields
    delimiter: u8,
    /// Lines starting with `comment` are skipped when reading
    comment: Option<u8>,
}

impl Default for EdgeTableReader {
    /// Default to comma-separated values with `#`-comments
    fn default() -> Self {
        Self {
            delimiter: b',',
            comment: Some(b'#'),
        }
    }
}

impl EdgeTableReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the delimiter
    pub fn delimiter(mut self, delimiter: u8) -> EdgeTableReader {
        self.delimiter = delimiter;
        self
    }

    /// Updates the comment byte; `None` disables comments
    pub fn comment(mut self, comment: Option<u8>) -> EdgeTableReader {
        self.comment = comment;
        self
    }

    /// Reads all rows as edges; every row must carry a distance
    ///
    /// # Errors
    /// Returns an error if the header lacks a required column or any row cannot be parsed.
    pub fn try_read_edges<I, R>(&self, reader: R) -> std::io::Result<Vec<WeightedEdge<I>>>
    where
        I: Identifier + FromStr,
        R: Read,
    {
        self.read_rows(reader, |fields, columns, line| {
            Ok(WeightedEdge(
                parse_field!(fields, columns.id_start, ID_START, line),
                parse_field!(fields, columns.id_end, ID_END, line),
                parse_field!(fields, columns.distance, DISTANCE, line),
            ))
        })
    }

    /// Reads all rows as unrolled edges; empty distance fields become `None`
    ///
    /// # Errors
    /// Returns an error if the header lacks a required column or any row cannot be parsed.
    pub fn try_read_unrolled<I, R>(&self, reader: R) -> std::io::Result<Vec<UnrolledEdge<I>>>
    where
        I: Identifier + FromStr,
        R: Read,
    {
        self.read_rows(reader, |fields, columns, line| {
            Ok(UnrolledEdge::new(
                parse_field!(fields, columns.id_start, ID_START, line),
                parse_field!(fields, columns.id_end, ID_END, line),
                parse_optional_field!(fields, columns.distance, DISTANCE, line),
            ))
        })
    }

    fn read_rows<T, R, F>(&self, reader: R, mut parse_row: F) -> std::io::Result<Vec<T>>
    where
        R: Read,
        F: FnMut(&StringRecord, &Columns, u64) -> std::io::Result<T>,
    {
        let mut reader = csv_reader(reader, self.delimiter, self.comment);
        let header = reader.headers().map_err(csv_error)?.clone();
        raise_error_unless!(!header.is_empty(), ErrorKind::NotFound, "Header not found");
        let columns = Columns::from_header(&header)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            rows.push(parse_row(&record, &columns, line_of(&record))?);
        }

        debug!("Read {} rows from edge table", rows.len());
        Ok(rows)
    }
}

/// Positions of the required columns within a row
struct Columns {
    id_start: usize,
    id_end: usize,
    distance: usize,
}

impl Columns {
    fn from_header(header: &StringRecord) -> std::io::Result<Self> {
        let find = |name: &str| {
            header.iter().position(|c| c == name).ok_or(io_error!(
                ErrorKind::InvalidData,
                format!("Missing column {name} in header")
            ))
        };

        Ok(Self {
            id_start: find(ID_START)?,
            id_end: find(ID_END)?,
            distance: find(DISTANCE)?,
        })
    }
}

/// A writer for the EdgeTable-Format
#[derive(Debug, Clone)]
pub struct EdgeTableWriter {
    /// Separator between fields
    delimiter: u8,
}

impl Default for EdgeTableWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl EdgeTableWriter {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the delimiter
    pub fn delimiter(mut self, delimiter: u8) -> EdgeTableWriter {
        self.delimiter = delimiter;
        self
    }

    /// Writes the header and one row per unrolled edge. `None` distances are written as
    /// empty fields. Identifiers containing the delimiter are quoted.
    pub fn try_write_unrolled<'a, I, T, W>(&self, rows: T, writer: W) -> std::io::Result<()>
    where
        I: Display + 'a,
        T: IntoIterator<Item = &'a UnrolledEdge<I>>,
        W: Write,
    {
        let mut writer = csv_writer(writer, self.delimiter);
        writer.write_record([ID_START, ID_END, DISTANCE]).map_err(csv_error)?;

        for row in rows {
            let distance = row.distance.map_or(String::new(), |d| d.to_string());
            writer
                .write_record([row.id_start.to_string(), row.id_end.to_string(), distance])
                .map_err(csv_error)?;
        }

        writer.flush()
    }

    /// Writes the header and one row per edge
    pub fn try_write_edges<'a, I, T, W>(&self, edges: T, writer: W) -> std::io::Result<()>
    where
        I: Display + 'a,
        T: IntoIterator<Item = &'a WeightedEdge<I>>,
        W: Write,
    {
        let mut writer = csv_writer(writer, self.delimiter);
        writer.write_record([ID_START, ID_END, DISTANCE]).map_err(csv_error)?;

        for WeightedEdge(u, v, d) in edges {
            writer
                .write_record([u.to_string(), v.to_string(), d.to_string()])
                .map_err(csv_error)?;
        }

        writer.flush()
    }
}

/// Trait for creating distance matrices from an edge table.
/// Used as shorthand for default EdgeTableReader settings
pub trait EdgeTableRead: Sized {
    /// Tries to read the matrix from a given reader
    fn try_read_edge_table<R: Read>(reader: R) -> Result<Self>;

    /// Tries to read the matrix from a given file
    fn try_read_edge_table_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_read_edge_table(File::open(path)?)
    }
}

impl<I> EdgeTableRead for DistanceMatrix<I>
where
    I: Identifier + FromStr,
{
    fn try_read_edge_table<R: Read>(reader: R) -> Result<Self> {
        let edges: Vec<WeightedEdge<I>> = EdgeTableReader::default().try_read_edges(reader)?;
        DistanceMatrix::from_edges(edges)
    }
}

/// Trait for writing the unrolled form of a distance matrix in the EdgeTable-Format.
/// Shorthand for default settings.
pub trait EdgeTableWrite {
    /// Tries to write the unrolled matrix to a writer
    fn try_write_edge_table<W: Write>(&self, writer: W) -> Result<()>;

    /// Tries to write the unrolled matrix to a file
    fn try_write_edge_table_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_edge_table(writer)
    }
}

impl<I> EdgeTableWrite for DistanceMatrix<I>
where
    I: Identifier + Display,
{
    fn try_write_edge_table<W: Write>(&self, writer: W) -> Result<()> {
        let rows = self.unrolled();
        EdgeTableWriter::default().try_write_unrolled(&rows, writer)?;
        Ok(())
    }
}
