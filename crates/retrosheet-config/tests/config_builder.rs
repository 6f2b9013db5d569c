use retrosheet_config::{
    Declaration, FixedProbe, JsonCodec, RetrosheetConfigBuilder, RetrosheetError, SheetSchema,
    index_to_letter,
};

fn builder() -> RetrosheetConfigBuilder {
    RetrosheetConfigBuilder::with_probe(&FixedProbe(false))
}

fn letters(schema: &SheetSchema) -> Vec<(&str, &str)> {
    schema
        .iter()
        .map(|(name, letter)| (name, letter.as_str()))
        .collect()
}

#[test]
fn players_sheet_maps_to_first_three_letters() {
    let mut builder = builder();
    builder
        .add_sheet("Players", ["Name", "Team", "Position"])
        .expect("valid columns");
    let config = builder.build();

    let players = config.sheet("Players").expect("sheet registered");
    assert_eq!(
        letters(players),
        vec![("Name", "A"), ("Team", "B"), ("Position", "C")]
    );
    assert_eq!(config.sheets().len(), 1);
}

#[test]
fn schema_letters_match_mapper_for_wide_sheets() {
    let columns: Vec<String> = (0..800).map(|i| format!("c{i}")).collect();
    let mut builder = builder();
    builder.add_sheet("Wide", columns.clone()).unwrap();
    let config = builder.build();
    let wide = config.sheet("Wide").unwrap();

    assert_eq!(wide.len(), columns.len());
    for (idx, (name, letter)) in wide.iter().enumerate() {
        assert_eq!(name, columns[idx]);
        assert_eq!(*letter, index_to_letter(idx as u32));
    }
    assert_eq!(wide.letter("c701").unwrap().as_str(), "ZZ");
    assert_eq!(wide.letter("c702").unwrap().as_str(), "AAA");
}

#[test]
fn blank_column_is_rejected_without_storing() {
    let mut builder = builder();
    let err = builder
        .add_sheet("Players", ["Name", "", "Date"])
        .unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @r#"invalid schema for sheet `Players`: columns[1] "" must not be blank"#
    );
    assert!(builder.build().sheet("Players").is_none());
}

#[test]
fn later_sheet_registration_overwrites() {
    let mut builder = builder();
    builder.add_sheet("Players", ["Name"]).unwrap();
    builder.add_sheet("Players", ["Team", "Name"]).unwrap();
    let config = builder.build();
    assert_eq!(
        letters(config.sheet("Players").unwrap()),
        vec![("Team", "A"), ("Name", "B")]
    );
}

#[test]
fn duplicate_form_endpoint_keeps_last_link() {
    let mut builder = builder();
    builder
        .add_form("sheet1", "https://forms.example/1")
        .unwrap()
        .add_form("sheet1", "https://forms.example/2")
        .unwrap();
    let config = builder.build();
    assert_eq!(config.forms().len(), 1);
    assert_eq!(config.form("sheet1"), Some("https://forms.example/2"));
}

#[test]
fn slash_in_endpoint_is_invalid_argument() {
    let mut builder = builder();
    builder.add_form("ok", "https://x/1").unwrap();

    let err = builder.add_form("a/b", "https://x").unwrap_err();
    assert_eq!(
        err,
        RetrosheetError::InvalidArgument {
            endpoint: "a/b".to_string()
        }
    );
    insta::assert_snapshot!(err.to_string(), @"form endpoint name cannot contain '/', found `a/b`");

    let config = builder.build();
    assert_eq!(config.forms().len(), 1);
    assert_eq!(config.form("ok"), Some("https://x/1"));
}

#[test]
fn chained_configuration() -> Result<(), RetrosheetError> {
    let mut builder = RetrosheetConfigBuilder::with_probe(&FixedProbe(true));
    builder
        .set_logging(true)
        .set_json_codec(JsonCodec::strict())
        .add_sheet("Players", ["Name", "Team"])?
        .add_sheet_with_letters("Scores", [("Player", "A"), ("Points", "E")])?
        .add_form("add_score", "https://forms.example/score")?;
    let config = builder.build();

    assert!(config.is_logging_enabled());
    assert!(config.use_proxy_for_write());
    assert_eq!(*config.json(), JsonCodec::strict());
    assert_eq!(config.sheet("Scores").unwrap().column("E"), Some("Points"));
    Ok(())
}

#[test]
fn config_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<retrosheet_config::RetrosheetConfig>();

    let mut builder = builder();
    builder.add_sheet("Players", ["Name"]).unwrap();
    let config = std::sync::Arc::new(builder.build());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = config.clone();
            std::thread::spawn(move || config.sheet("Players").map(SheetSchema::len))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(1));
    }
}

#[test]
fn fixture_declaration_builds() {
    let text = std::fs::read_to_string("tests/fixtures/players.yaml").expect("fixture exists");
    let declaration = Declaration::from_yaml_str(&text).expect("fixture parses");
    let config = declaration
        .into_builder(&FixedProbe(false))
        .expect("fixture validates")
        .build();

    assert!(config.is_logging_enabled());
    assert_eq!(
        letters(config.sheet("Scores").unwrap()),
        vec![("Player", "A"), ("Points", "D")]
    );
    assert_eq!(
        config
            .sheet("Players")
            .unwrap()
            .rewrite_query("SELECT Name WHERE Team = 'Reds'"),
        "SELECT A WHERE B = 'Reds'"
    );
}

#[test]
fn broken_fixture_reports_issues() {
    let text = std::fs::read_to_string("tests/fixtures/broken.yaml").expect("fixture exists");
    let declaration = Declaration::from_yaml_str(&text).expect("fixture parses");
    let err = declaration.build().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r#"
    declaration has 2 issue(s)
      - sheets.Players.columns[1]: column "  " must not be blank
      - forms.players/add: form endpoint name cannot contain '/'
    "#);
}
