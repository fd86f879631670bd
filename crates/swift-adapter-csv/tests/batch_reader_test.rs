//! Integration tests for reading SWIFT code batch files from disk

use std::io::Write;

use swift_adapter_csv::{CsvConfig, CsvError, SwiftCodeReader, load_countries};
use tempfile::NamedTempFile;

/// Helper to create a batch file with the given content
fn create_csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const HEADER: &str =
    "COUNTRY ISO2 CODE,SWIFT CODE,CODE TYPE,NAME,ADDRESS,TOWN NAME,COUNTRY NAME,TIME ZONE";

#[test]
fn test_invalid_rows_are_skipped_and_reported() {
    let content = format!(
        "{HEADER}\n\
         AL,AAISALTRXXX,BIC11,UNITED BANK OF ALBANIA SH.A,\"HYRJA 3 RR. DRITAN HOXHA ND. 11 TIRANA, TIRANA, 1023\",TIRANA,ALBANIA,Europe/Tirane\n\
         BG,ABIEBGS1XXX,BIC11,ABV INVESTMENTS LTD,\"TSAR ASEN 20  VARNA, VARNA, 9002\",VARNA,BULGARIA,Europe/Sofia\n\
         BG,ADCRBGS1,BIC11,ADAMANT CAPITAL PARTNERS AD,,SOFIA,BULGARIA,Europe/Sofia\n\
         PL,AAAAPLP1,BIC11,BANK,,WARSZAWA,POLAND,Europe/Warsaw\n\
         PL,BAD-CODEXXX,BIC11,BANK,,WARSZAWA,POLAND,Europe/Warsaw\n\
         ZZ,AAAAZZZZXXX,BIC11,BANK,,NOWHERE,NOWHERE,UTC\n\
         PL,AAAAPLPWXXX,BIC11,BANK,,WARSZAWA,GERMANY,Europe/Warsaw\n"
    );
    let file = create_csv_file(&content);
    let countries = load_countries().unwrap();

    let report = SwiftCodeReader::new(&countries)
        .read_path(file.path())
        .unwrap();

    let codes: Vec<_> = report.records.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["AAISALTRXXX", "ABIEBGS1XXX", "ADCRBGS1", "AAAAPLP1"]);
    assert_eq!(report.rejected.len(), 3);
    assert_eq!(report.rejected[0].line, 6);
    assert_eq!(report.rejected[0].code, "BAD-CODEXXX");
    assert!(report.rejected[2].reason.contains("does not match"));
}

#[test]
fn test_duplicate_codes_keep_first_occurrence() {
    let content = format!(
        "{HEADER}\n\
         PL,AAAAPLPWXXX,BIC11,FIRST BANK,FIRST ADDRESS,WARSZAWA,POLAND,Europe/Warsaw\n\
         PL,aaaaplpwxxx,BIC11,SECOND BANK,SECOND ADDRESS,WARSZAWA,POLAND,Europe/Warsaw\n"
    );
    let file = create_csv_file(&content);
    let countries = load_countries().unwrap();

    let report = SwiftCodeReader::new(&countries)
        .read_path(file.path())
        .unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].bank_name, "FIRST BANK");
    assert_eq!(report.duplicates, 1);
}

#[test]
fn test_semicolon_delimited_batch() {
    let content = "SWIFT CODE;COUNTRY ISO2 CODE;NAME\nAAAAPLPWXXX;PL;BANK\n";
    let countries = load_countries().unwrap();

    let report = SwiftCodeReader::new(&countries)
        .with_config(CsvConfig::new().with_delimiter(b';'))
        .read(content.as_bytes())
        .unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].bank_name, "BANK");
}

#[test]
fn test_missing_batch_file() {
    let countries = load_countries().unwrap();
    let err = SwiftCodeReader::new(&countries)
        .read_path("/path/that/does/not/exist.csv")
        .unwrap_err();
    assert!(matches!(err, CsvError::Io(_)));
}

#[test]
fn test_headerless_batches_are_refused() {
    let countries = load_countries().unwrap();
    let err = SwiftCodeReader::new(&countries)
        .with_config(CsvConfig::new().without_header())
        .read("AAAAPLPWXXX,PL\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, CsvError::Unsupported(_)));
}
