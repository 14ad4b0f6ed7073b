//! Record reader for the UST facility CSV
//!
//! Opens the source file, validates the documented 27-column header, and
//! yields raw rows lazily in a single pass. Rows whose column count differs
//! from the header are a structural error and abort the run; everything
//! downstream of the reader treats problems as per-record drops instead.

use crate::constants::{EXPECTED_COLUMN_COUNT, EXPECTED_HEADER};
use crate::{Error, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

// =============================================================================
// Column Layout
// =============================================================================

/// Column positions of the published UST facility dataset
///
/// Mirrors [`EXPECTED_HEADER`] one-to-one. Columns the pipeline does not
/// use are still named here so the layout is explicit about what is
/// ignored rather than merely unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum UstColumn {
    SiteId = 0,
    SiteName,
    SiteAddress,
    City,
    Zip,
    TankNo,
    Status,
    Compartment,
    EstimatedTotalCapacity,
    SubstanceStored,
    LastUsedDate,
    ClosureType,
    ConstructionTypeTank,
    TankDetails,
    ConstructionTypePiping,
    PipingDetails,
    InstallationDate,
    SpillProtection,
    OverfillProtection,
    Latitude,
    Longitude,
    CollectionMethod,
    ReferencePointType,
    UstLatitude,
    UstLongitude,
    CollectionMethodSite,
    ReferencePointTypeSite,
}

impl UstColumn {
    /// Zero-based position within a raw row
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Fetch a column value from a raw row, trimmed
pub fn field(record: &StringRecord, column: UstColumn) -> &str {
    record.get(column.index()).unwrap_or("").trim()
}

// =============================================================================
// Reader
// =============================================================================

/// Lazy, single-pass reader over the UST facility CSV
///
/// Not restartable: the underlying file handle is consumed as rows are
/// read. The handle is closed on all exit paths, including parse failure.
pub struct TankCsvReader {
    reader: csv::Reader<File>,
    path: PathBuf,
}

impl TankCsvReader {
    /// Open the file and validate its header against the documented layout
    ///
    /// # Errors
    /// * `Error::Input` if the file does not exist or is not readable
    /// * `Error::CsvParsing` if the header does not match the documented
    ///   27-column layout
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::input(path.display().to_string(), format!("cannot open: {}", e)))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| {
                Error::csv_parsing(
                    path.display().to_string(),
                    "cannot read header row",
                    Some(e),
                )
            })?
            .clone();

        validate_header(path, &headers)?;
        debug!("Validated {} header columns", headers.len());

        Ok(Self {
            reader,
            path: path.to_path_buf(),
        })
    }

    /// Path of the file being read
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterate over raw rows
    ///
    /// A row with a column count different from the header surfaces as an
    /// `Error::CsvParsing` item; the caller treats that as fatal since the
    /// header contract is violated.
    pub fn records(&mut self) -> impl Iterator<Item = Result<StringRecord>> + '_ {
        let file = self.path.display().to_string();
        self.reader.records().map(move |result| {
            result.map_err(|e| Error::csv_parsing(file.clone(), "malformed row", Some(e)))
        })
    }
}

fn validate_header(path: &Path, headers: &StringRecord) -> Result<()> {
    if headers.len() != EXPECTED_COLUMN_COUNT {
        return Err(Error::csv_parsing(
            path.display().to_string(),
            format!(
                "expected {} columns, found {}",
                EXPECTED_COLUMN_COUNT,
                headers.len()
            ),
            None,
        ));
    }

    for (position, expected) in EXPECTED_HEADER.iter().enumerate() {
        let found = headers.get(position).unwrap_or("").trim();
        if found != *expected {
            return Err(Error::csv_parsing(
                path.display().to_string(),
                format!(
                    "unexpected column {} name: expected '{}', found '{}'",
                    position + 1,
                    expected,
                    found
                ),
                None,
            ));
        }
    }

    Ok(())
}

// =============================================================================
// Line Counting
// =============================================================================

/// Count newline characters in the input so progress bars have a total
///
/// A buffered byte scan, not a CSV parse: quoted embedded newlines would be
/// overcounted, which only inflates the progress total slightly.
pub fn count_lines(path: &Path) -> Result<usize> {
    let file = File::open(path)
        .map_err(|e| Error::input(path.display().to_string(), format!("cannot open: {}", e)))?;
    let mut reader = BufReader::with_capacity(1024 * 1024, file);
    let mut count = 0usize;

    loop {
        let buffer = reader.fill_buf()?;
        if buffer.is_empty() {
            break;
        }
        count += buffer.iter().filter(|&&byte| byte == b'\n').count();
        let consumed = buffer.len();
        reader.consume(consumed);
    }

    Ok(count)
}

// =============================================================================
// Header Staging
// =============================================================================

/// Staging copy of a headerless download with the canonical header prepended
///
/// The temporary file is removed when this value is dropped, which covers
/// interrupt and error paths as well as normal completion.
pub struct StagedInput {
    temp: tempfile::NamedTempFile,
}

impl StagedInput {
    /// Create a staging copy of `source` with the documented header line
    /// prepended
    pub fn create(source: &Path) -> Result<Self> {
        let mut temp = tempfile::Builder::new()
            .prefix("ust-import-")
            .suffix(".csv")
            .tempfile()
            .map_err(|e| Error::staging("cannot create staging file", e))?;

        let mut input = File::open(source).map_err(|e| {
            Error::input(source.display().to_string(), format!("cannot open: {}", e))
        })?;

        let output = temp.as_file_mut();
        writeln!(output, "{}", EXPECTED_HEADER.join(","))
            .map_err(|e| Error::staging("cannot write header line", e))?;
        io::copy(&mut input, output)
            .map_err(|e| Error::staging("cannot copy source into staging file", e))?;
        output
            .flush()
            .map_err(|e| Error::staging("cannot flush staging file", e))?;

        debug!(
            "Staged '{}' with injected header at '{}'",
            source.display(),
            temp.path().display()
        );

        Ok(Self { temp })
    }

    /// Path of the staged file
    pub fn path(&self) -> &Path {
        self.temp.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn header_line() -> String {
        EXPECTED_HEADER.join(",")
    }

    fn data_row(site_id: &str) -> String {
        let mut columns = vec![""; EXPECTED_COLUMN_COUNT];
        columns[UstColumn::SiteId.index()] = site_id;
        columns[UstColumn::City.index()] = "Essex";
        columns.join(",")
    }

    #[test]
    fn reads_rows_after_valid_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", header_line()).unwrap();
        writeln!(file, "{}", data_row("100")).unwrap();
        writeln!(file, "{}", data_row("200")).unwrap();

        let mut reader = TankCsvReader::open(file.path()).unwrap();
        let rows: Vec<_> = reader.records().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(field(&rows[0], UstColumn::SiteId), "100");
        assert_eq!(field(&rows[1], UstColumn::City), "Essex");
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let result = TankCsvReader::open(Path::new("/no/such/file.csv"));
        assert!(matches!(result, Err(Error::Input { .. })));
    }

    #[test]
    fn wrong_column_count_in_header_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a,b,c").unwrap();

        let result = TankCsvReader::open(file.path());
        assert!(matches!(result, Err(Error::CsvParsing { .. })));
    }

    #[test]
    fn renamed_column_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut names = EXPECTED_HEADER.to_vec();
        names[3] = "Town";
        writeln!(file, "{}", names.join(",")).unwrap();

        let result = TankCsvReader::open(file.path());
        assert!(matches!(result, Err(Error::CsvParsing { .. })));
    }

    #[test]
    fn short_row_surfaces_as_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", header_line()).unwrap();
        writeln!(file, "only,three,columns").unwrap();

        let mut reader = TankCsvReader::open(file.path()).unwrap();
        let results: Vec<_> = reader.records().collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::CsvParsing { .. })));
    }

    #[test]
    fn counts_lines_including_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", header_line()).unwrap();
        writeln!(file, "{}", data_row("1")).unwrap();
        writeln!(file, "{}", data_row("2")).unwrap();

        assert_eq!(count_lines(file.path()).unwrap(), 3);
    }

    #[test]
    fn staged_input_injects_header_and_cleans_up() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", data_row("300")).unwrap();

        let staged_path;
        {
            let staged = StagedInput::create(file.path()).unwrap();
            staged_path = staged.path().to_path_buf();

            let mut reader = TankCsvReader::open(staged.path()).unwrap();
            let rows: Vec<_> = reader.records().collect::<Result<_>>().unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(field(&rows[0], UstColumn::SiteId), "300");
        }

        // Staging file is removed on drop
        assert!(!staged_path.exists());
    }
}
