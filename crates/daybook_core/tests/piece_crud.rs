use daybook_core::db::open_db_in_memory;
use daybook_core::{
    PieceInput, PieceService, PieceServiceError, PieceValidationError, SqlitePieceRepository,
};
use rusqlite::params;

#[test]
fn create_piece_decodes_display_day_and_derives_day_key() {
    let conn = open_db_in_memory().unwrap();
    let service = PieceService::new(SqlitePieceRepository::new(&conn));

    let created = service
        .create_piece(
            PieceInput {
                content: "first entry".to_string(),
                knot: None,
                real_day: "2o25o8o1".to_string(),
            },
            "",
        )
        .unwrap();

    assert_eq!(created.real_day, "20250801");
    assert_eq!(created.day_key, "0801");
    assert!(!created.changed_at.is_empty());
}

#[test]
fn create_piece_defaults_blank_day_to_today() {
    let conn = open_db_in_memory().unwrap();
    let service = PieceService::new(SqlitePieceRepository::new(&conn));

    let created = service
        .create_piece(
            PieceInput {
                content: "dated today".to_string(),
                knot: None,
                real_day: String::new(),
            },
            "",
        )
        .unwrap();

    assert_eq!(created.real_day.len(), 8);
    assert!(created.real_day.bytes().all(|byte| byte.is_ascii_digit()));
    assert_eq!(created.day_key, created.real_day[4..]);
}

#[test]
fn update_piece_replaces_fields_and_refreshes_changed_at() {
    let conn = open_db_in_memory().unwrap();
    let service = PieceService::new(SqlitePieceRepository::new(&conn));

    let created = service
        .create_piece(
            PieceInput {
                content: "before".to_string(),
                knot: None,
                real_day: "20250801".to_string(),
            },
            "",
        )
        .unwrap();

    conn.execute(
        "UPDATE pieces SET changed_at = '2000-01-01 00:00:00' WHERE id = ?1;",
        params![created.id],
    )
    .unwrap();

    let updated = service
        .update_piece(
            created.id,
            PieceInput {
                content: "after".to_string(),
                knot: Some("hub".to_string()),
                real_day: "20251231".to_string(),
            },
            "",
        )
        .unwrap();

    assert_eq!(updated.content, "after");
    assert_eq!(updated.knot.as_deref(), Some("hub"));
    assert_eq!(updated.real_day, "20251231");
    assert_eq!(updated.day_key, "1231");
    assert_ne!(updated.changed_at, "2000-01-01 00:00:00");
}

#[test]
fn update_missing_piece_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = PieceService::new(SqlitePieceRepository::new(&conn));

    let err = service
        .update_piece(
            4242,
            PieceInput {
                content: "ghost".to_string(),
                knot: None,
                real_day: "20250801".to_string(),
            },
            "",
        )
        .unwrap_err();
    assert!(matches!(err, PieceServiceError::PieceNotFound(4242)));
}

#[test]
fn create_piece_rejects_malformed_day() {
    let conn = open_db_in_memory().unwrap();
    let service = PieceService::new(SqlitePieceRepository::new(&conn));

    let err = service
        .create_piece(
            PieceInput {
                content: "bad day".to_string(),
                knot: None,
                real_day: "2025".to_string(),
            },
            "",
        )
        .unwrap_err();
    assert!(matches!(
        err,
        PieceServiceError::Validation(PieceValidationError::InvalidRealDay(_))
    ));
}

#[test]
fn piece_detail_bundles_rendered_content_and_knot_refs() {
    let conn = open_db_in_memory().unwrap();
    let service = PieceService::new(SqlitePieceRepository::new(&conn));

    let hub = service
        .create_piece(
            PieceInput {
                content: "hub body".to_string(),
                knot: Some("alpha".to_string()),
                real_day: "20250801".to_string(),
            },
            "",
        )
        .unwrap();

    let member = service
        .create_piece(
            PieceInput {
                content: "note\nsecond line".to_string(),
                knot: None,
                real_day: "20250802".to_string(),
            },
            "alpha",
        )
        .unwrap();

    let detail = service
        .piece_detail(member.id)
        .unwrap()
        .expect("member detail should exist");

    assert_eq!(detail.content, "note\nsecond line");
    assert_eq!(detail.content_parsed, "note<br />second line");
    assert_eq!(detail.real_day, "2o25o8o2");
    assert_eq!(detail.day_key, "o8o2");
    assert_eq!(detail.knots.len(), 1);
    assert_eq!(detail.knots[0].hub_id, hub.id);
    assert_eq!(detail.knots[0].label, "alpha");
}

#[test]
fn piece_detail_of_missing_piece_is_none() {
    let conn = open_db_in_memory().unwrap();
    let service = PieceService::new(SqlitePieceRepository::new(&conn));

    assert!(service.piece_detail(99).unwrap().is_none());
}
