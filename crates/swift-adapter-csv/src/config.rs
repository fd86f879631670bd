//! Reader settings shared by the batch and country loaders

/// Dialect of a CSV source.
///
/// Both loaders match columns by normalized header name, so a source
/// without a header row is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvConfig {
    pub delimiter: u8,
    pub quote: u8,
    pub has_header: bool,
    /// Allow rows shorter or longer than the header
    pub flexible: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_header: true,
            flexible: true,
        }
    }
}

impl CsvConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(self, delimiter: u8) -> Self {
        Self { delimiter, ..self }
    }

    pub fn with_quote(self, quote: u8) -> Self {
        Self { quote, ..self }
    }

    /// Treat the first row as data.
    pub fn without_header(self) -> Self {
        Self {
            has_header: false,
            ..self
        }
    }

    /// Reject rows whose width differs from the header.
    pub fn strict_rows(self) -> Self {
        Self {
            flexible: false,
            ..self
        }
    }

    /// `csv` reader over `source` in this dialect.
    ///
    /// The header is returned as an ordinary record so callers can
    /// normalize it before matching columns.
    pub fn reader<R: std::io::Read>(&self, source: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .has_headers(false)
            .flexible(self.flexible)
            .from_reader(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_dialect_by_default() {
        let config = CsvConfig::new();
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.quote, b'"');
        assert!(config.has_header && config.flexible);
    }

    #[test]
    fn test_builder_overrides() {
        let config = CsvConfig::new()
            .with_delimiter(b';')
            .with_quote(b'\'')
            .without_header()
            .strict_rows();
        assert_eq!(
            config,
            CsvConfig {
                delimiter: b';',
                quote: b'\'',
                has_header: false,
                flexible: false,
            }
        );
    }

    #[test]
    fn test_reader_returns_header_as_record() {
        let mut reader = CsvConfig::new()
            .with_delimiter(b';')
            .reader("A;B\n1;2\n".as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "B");
    }
}
