//! End-to-end behavior of the registry service over a real store.

use std::sync::Arc;

use swift_adapter_csv::load_countries;
use swift_adapter_db::DbConnection;
use swift_model::{BranchDocument, RecordInput};
use swift_registry::{ErrorKind, RegistryService};

async fn service() -> anyhow::Result<RegistryService<DbConnection>> {
    let store = DbConnection::memory();
    store.initialize().await?;
    Ok(RegistryService::new(store, Arc::new(load_countries()?)))
}

async fn libsql_service() -> anyhow::Result<RegistryService<DbConnection>> {
    let store = DbConnection::new();
    store.initialize().await?;
    Ok(RegistryService::new(store, Arc::new(load_countries()?)))
}

fn us_headquarters() -> RecordInput {
    RecordInput::headquarters("AAAABBB1XXX", "US")
        .with_bank_name("BANK OF TESTS")
        .with_address("1 MAIN ST")
        .with_country_name("UNITED STATES")
}

fn us_branch() -> RecordInput {
    RecordInput::branch("AAAABBB1ABC", "US")
        .with_bank_name("BANK OF TESTS")
        .with_address("2 SIDE ST")
}

#[tokio::test]
async fn test_add_headquarters_then_get_details() -> anyhow::Result<()> {
    let service = service().await?;
    let message = service.add(us_headquarters()).await?;
    assert!(message.contains("Headquarter SWIFT code AAAABBB1XXX added"));

    let view = service.get_details("AAAABBB1XXX").await?;
    assert!(view.is_headquarters);
    assert_eq!(view.country_name, "UNITED STATES");
    assert_eq!(view.branches, Some(Vec::new()));
    Ok(())
}

#[tokio::test]
async fn test_lookup_is_case_insensitive() -> anyhow::Result<()> {
    let service = service().await?;
    service.add(us_headquarters()).await?;

    let lower = service.get_details("aaaabbb1xxx").await?;
    let upper = service.get_details("AAAABBB1XXX").await?;
    assert_eq!(lower, upper);
    Ok(())
}

#[tokio::test]
async fn test_branch_attaches_to_headquarters() -> anyhow::Result<()> {
    for service in [service().await?, libsql_service().await?] {
        service.add(us_headquarters()).await?;
        let message = service.add(us_branch()).await?;
        assert!(message.contains("added to headquarter AAAABBB1XXX"));

        let branch = service.get_details("AAAABBB1ABC").await?;
        assert!(!branch.is_headquarters);
        assert_eq!(branch.country_name, "UNITED STATES");
        assert_eq!(branch.branches, None);

        let hq = service.get_details("AAAABBB1XXX").await?;
        let listed: Vec<String> = hq
            .branches
            .unwrap_or_default()
            .into_iter()
            .map(|b| b.code)
            .collect();
        assert_eq!(listed, vec!["AAAABBB1ABC"]);

        let country = service.get_by_country("us").await?;
        assert_eq!(country.country_iso2, "US");
        assert_eq!(country.country_name, "UNITED STATES");
        let codes: Vec<&str> = country.records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["AAAABBB1XXX", "AAAABBB1ABC"]);
        assert!(country.records[0].is_headquarters);
        assert!(!country.records[1].is_headquarters);
    }
    Ok(())
}

#[tokio::test]
async fn test_branch_add_failures() -> anyhow::Result<()> {
    let service = service().await?;

    let err = service.add(us_branch()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.message().contains("AAAABBB1XXX is missing"));

    service.add(us_headquarters()).await?;
    service.add(us_branch()).await?;

    let err = service.add(us_branch()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let wrong_country = RecordInput::branch("AAAABBB1DEF", "DE");
    let err = service.add(wrong_country).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert!(err.message().contains("does not match headquarter"));
    Ok(())
}

#[tokio::test]
async fn test_headquarters_add_failures() -> anyhow::Result<()> {
    let service = service().await?;

    let mismatch = us_headquarters().with_country_name("GERMANY");
    let err = service.add(mismatch).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let wrong_suffix = RecordInput::headquarters("AAAABBB1ABC", "US");
    assert_eq!(
        service.add(wrong_suffix).await.unwrap_err().kind(),
        ErrorKind::BadRequest
    );

    let branch_with_hq_suffix = RecordInput::branch("AAAABBB1XXX", "US");
    assert_eq!(
        service.add(branch_with_hq_suffix).await.unwrap_err().kind(),
        ErrorKind::BadRequest
    );

    let unknown_country = RecordInput::headquarters("AAAAZZZZXXX", "ZZ");
    assert_eq!(
        service.add(unknown_country).await.unwrap_err().kind(),
        ErrorKind::BadRequest
    );

    service.add(us_headquarters()).await?;
    let err = service.add(us_headquarters()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    Ok(())
}

#[tokio::test]
async fn test_headquarters_with_supplied_branches() -> anyhow::Result<()> {
    let service = service().await?;
    let record = us_headquarters().with_branches(vec![BranchDocument::new(
        "aaaabbb1abc",
        "BANK OF TESTS",
        "2 SIDE ST",
        "us",
    )]);
    service.add(record).await?;

    let branch = service.get_details("AAAABBB1ABC").await?;
    assert_eq!(branch.country_iso2, "US");

    let foreign = RecordInput::headquarters("CCCCBBB1XXX", "US").with_branches(vec![
        BranchDocument::new("DDDDBBB1ABC", "BANK", "ST", "US"),
    ]);
    let err = service.add(foreign).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert!(service.get_details("CCCCBBB1XXX").await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_delete_headquarters_cascades() -> anyhow::Result<()> {
    for service in [service().await?, libsql_service().await?] {
        service.add(us_headquarters()).await?;
        service.add(us_branch()).await?;
        service
            .add(
                RecordInput::headquarters("ZZZZBBB1XXX", "US").with_country_name("united states"),
            )
            .await?;

        let message = service.delete("aaaabbb1xxx").await?;
        assert!(message.contains("AAAABBB1XXX"));

        for code in ["AAAABBB1XXX", "AAAABBB1ABC"] {
            let err = service.get_details(code).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound, "{code}");
        }
        assert!(service.get_details("ZZZZBBB1XXX").await.is_ok());

        let err = service.delete("AAAABBB1XXX").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.message().contains("not found, cannot delete"));
    }
    Ok(())
}

#[tokio::test]
async fn test_delete_branch_keeps_headquarters() -> anyhow::Result<()> {
    for service in [service().await?, libsql_service().await?] {
        service.add(us_headquarters()).await?;
        service.add(us_branch()).await?;

        let message = service.delete("AAAABBB1ABC").await?;
        assert_eq!(message, "Branch AAAABBB1ABC deleted successfully");

        let hq = service.get_details("AAAABBB1XXX").await?;
        assert_eq!(hq.branches, Some(Vec::new()));

        let err = service.delete("AAAABBB1ABC").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            err.message(),
            "branch AAAABBB1ABC not found under headquarter AAAABBB1XXX"
        );

        let err = service.delete("QQQQBBB1ABC").await.unwrap_err();
        assert_eq!(
            err.message(),
            "branch QQQQBBB1ABC not found and its headquarter QQQQBBB1XXX does not exist"
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_get_details_not_found_messages() -> anyhow::Result<()> {
    let service = service().await?;

    let err = service.get_details("AAAABBB1XXX").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "headquarter not found: AAAABBB1XXX");

    let err = service.get_details("AAAABBB1ABC").await.unwrap_err();
    assert!(err.message().contains("because its headquarter AAAABBB1XXX is missing"));

    service.add(us_headquarters()).await?;
    let err = service.get_details("AAAABBB1ABC").await.unwrap_err();
    assert_eq!(err.message(), "no branch found for SWIFT code AAAABBB1ABC");

    let err = service.get_details("AAA").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    Ok(())
}

#[tokio::test]
async fn test_eight_character_code_without_suffix_is_a_branch() -> anyhow::Result<()> {
    let service = service().await?;
    service.add(us_headquarters()).await?;
    service.add(RecordInput::branch("AAAABBB1", "US")).await?;

    let view = service.get_details("AAAABBB1").await?;
    assert!(!view.is_headquarters);
    service.delete("AAAABBB1").await?;
    assert!(service.get_details("AAAABBB1").await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_eight_character_headquarters() -> anyhow::Result<()> {
    let service = service().await?;
    let message = service
        .add(RecordInput::headquarters("AAAABXXX", "US").with_bank_name("SHORT BANK"))
        .await?;
    assert!(message.contains("Headquarter SWIFT code AAAABXXX added"));

    let view = service.get_details("AAAABXXX").await?;
    assert!(view.is_headquarters);
    assert_eq!(view.country_name, "UNITED STATES");

    let err = service
        .add(RecordInput::branch("AAAACXXX", "US"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert!(err.message().contains("cannot end with 'XXX'"));

    service.delete("AAAABXXX").await?;
    assert_eq!(
        service.get_details("AAAABXXX").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    Ok(())
}

#[tokio::test]
async fn test_get_by_country_errors() -> anyhow::Result<()> {
    let service = service().await?;

    let err = service.get_by_country("PL").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "no SWIFT codes found for country PL");

    let err = service.get_by_country("P1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let err = service.get_by_country("ZZ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    Ok(())
}
