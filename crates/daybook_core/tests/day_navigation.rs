use daybook_core::db::open_db_in_memory;
use daybook_core::{DayService, PieceDraft, PieceRepository, SqlitePieceRepository};
use rusqlite::Connection;

fn insert_day(conn: &Connection, real_day: &str) {
    let repo = SqlitePieceRepository::new(conn);
    repo.insert_piece(&PieceDraft::new(format!("entry {real_day}"), None, real_day))
        .unwrap();
}

#[test]
fn neighbors_on_empty_store_are_absent() {
    let conn = open_db_in_memory().unwrap();
    let service = DayService::new(SqlitePieceRepository::new(&conn));

    let neighbors = service.neighbors("0115").unwrap();
    assert_eq!(neighbors.prev, None);
    assert_eq!(neighbors.next, None);
}

#[test]
fn neighbors_pick_nearest_populated_keys() {
    let conn = open_db_in_memory().unwrap();
    insert_day(&conn, "20240101");
    insert_day(&conn, "20240115");
    insert_day(&conn, "20240201");
    let service = DayService::new(SqlitePieceRepository::new(&conn));

    let neighbors = service.neighbors("0115").unwrap();
    assert_eq!(neighbors.prev.as_deref(), Some("0101"));
    assert_eq!(neighbors.next.as_deref(), Some("0201"));
}

#[test]
fn neighbors_wrap_around_at_the_edges() {
    let conn = open_db_in_memory().unwrap();
    insert_day(&conn, "20240101");
    insert_day(&conn, "20240115");
    insert_day(&conn, "20240201");
    let service = DayService::new(SqlitePieceRepository::new(&conn));

    let at_min = service.neighbors("0101").unwrap();
    assert_eq!(at_min.prev.as_deref(), Some("0201"));
    assert_eq!(at_min.next.as_deref(), Some("0115"));

    let at_max = service.neighbors("0201").unwrap();
    assert_eq!(at_max.prev.as_deref(), Some("0115"));
    assert_eq!(at_max.next.as_deref(), Some("0101"));
}

#[test]
fn current_day_key_tracks_most_recent_entry_on_or_before_today() {
    let conn = open_db_in_memory().unwrap();
    insert_day(&conn, "20240101");
    insert_day(&conn, "20240115");
    let service = DayService::new(SqlitePieceRepository::new(&conn));

    assert_eq!(service.current_day_key_on("20240110").unwrap(), "0101");
    assert_eq!(service.current_day_key_on("20240120").unwrap(), "0115");
    assert_eq!(service.current_day_key_on("20251231").unwrap(), "0115");
}

#[test]
fn current_day_key_falls_back_to_today_on_empty_store() {
    let conn = open_db_in_memory().unwrap();
    let service = DayService::new(SqlitePieceRepository::new(&conn));

    assert_eq!(service.current_day_key_on("20250804").unwrap(), "0804");
}

#[test]
fn day_page_orders_by_real_day_and_display_encodes_day_fields() {
    let conn = open_db_in_memory().unwrap();
    // Two different years share the truncated key 0101.
    insert_day(&conn, "20230101");
    insert_day(&conn, "20240101");
    let service = DayService::new(SqlitePieceRepository::new(&conn));

    let page = service.day_page("0101").unwrap();
    assert_eq!(page.day_key, "o1o1");
    assert_eq!(page.pieces.len(), 2);
    assert_eq!(page.pieces[0].real_day, "2o24o1o1");
    assert_eq!(page.pieces[1].real_day, "2o23o1o1");
    assert_eq!(page.pieces[0].day_key, "o1o1");
}

#[test]
fn day_page_with_single_populated_day_wraps_to_itself() {
    let conn = open_db_in_memory().unwrap();
    insert_day(&conn, "20240101");
    let service = DayService::new(SqlitePieceRepository::new(&conn));

    let page = service.day_page("0101").unwrap();
    assert_eq!(page.prev.as_deref(), Some("o1o1"));
    assert_eq!(page.next.as_deref(), Some("o1o1"));
}

#[test]
fn day_page_renders_piece_content() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePieceRepository::new(&conn);
    repo.insert_piece(&PieceDraft::new("hello\nworld", None, "20240101"))
        .unwrap();
    let service = DayService::new(SqlitePieceRepository::new(&conn));

    let page = service.day_page("0101").unwrap();
    assert_eq!(page.pieces[0].content_parsed, "hello<br />world");
    assert_eq!(page.pieces[0].content, "hello\nworld");
}
