mod common;

use taskboard::domain::{ColumnType, KanbanError};
use taskboard::infrastructure::{BoardRepository, CardRepository};
use taskboard::services::{BoardService, CardService};

#[tokio::test]
async fn test_create_board_builds_template_columns() {
    let pool = common::setup_test_db().await;

    let board = BoardService::create_board(&pool, "Sprint 1").await.unwrap();
    assert_eq!(board.name, "Sprint 1");

    let loaded = BoardService::get_board(&pool, &board.id).await.unwrap();
    let layout: Vec<(String, i64, ColumnType)> = loaded
        .columns
        .iter()
        .map(|c| (c.name.clone(), c.position, c.column_type))
        .collect();

    assert_eq!(
        layout,
        vec![
            ("Inicial".to_string(), 1, ColumnType::Initial),
            ("Pendente".to_string(), 2, ColumnType::Pending),
            ("Final".to_string(), 3, ColumnType::Final),
            ("Cancelado".to_string(), 4, ColumnType::Canceled),
        ]
    );
}

#[tokio::test]
async fn test_create_board_rejects_blank_name() {
    let pool = common::setup_test_db().await;

    let err = BoardService::create_board(&pool, "  ").await.unwrap_err();
    assert!(matches!(err, KanbanError::BadRequest(_)));
    assert!(BoardService::list_boards(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_boards_returns_all() {
    let pool = common::setup_test_db().await;
    BoardService::create_board(&pool, "Alpha").await.unwrap();
    BoardService::create_board(&pool, "Beta").await.unwrap();

    let mut names: Vec<String> = BoardService::list_boards(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    names.sort();

    assert_eq!(names, vec!["Alpha", "Beta"]);
}

#[tokio::test]
async fn test_new_card_starts_unblocked_in_initial() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, "Sprint 1").await.unwrap();

    let card = CardService::create_card(&pool, &board.id, "Fix bug", "Crash on save")
        .await
        .unwrap();

    assert_eq!(card.column_type, ColumnType::Initial);
    assert_eq!(card.board_id, board.id);
    assert!(!card.card.blocked);
    assert_eq!(card.card.block_reason, None);
    assert_eq!(card.card.unblock_reason, None);

    let loaded = BoardService::get_board(&pool, &board.id).await.unwrap();
    let initial = loaded.column(ColumnType::Initial).unwrap();
    assert_eq!(initial.cards.len(), 1);
    assert_eq!(initial.cards[0].id, card.card.id);
}

#[tokio::test]
async fn test_create_card_on_missing_board() {
    let pool = common::setup_test_db().await;

    let err = CardService::create_card(&pool, "missing", "Fix bug", "")
        .await
        .unwrap_err();
    assert!(matches!(err, KanbanError::BoardNotFound(id) if id == "missing"));
}

#[tokio::test]
async fn test_create_card_on_board_without_initial_column() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, "Broken").await.unwrap();

    sqlx::query("DELETE FROM board_columns WHERE board_id = ? AND column_type = 'INITIAL'")
        .bind(&board.id)
        .execute(&pool)
        .await
        .unwrap();

    let err = CardService::create_card(&pool, &board.id, "Fix bug", "")
        .await
        .unwrap_err();
    assert!(matches!(err, KanbanError::InvariantViolation(_)));
}

#[tokio::test]
async fn test_operations_on_missing_card() {
    let pool = common::setup_test_db().await;

    assert!(matches!(
        CardService::move_to_next(&pool, "nope").await,
        Err(KanbanError::CardNotFound(_))
    ));
    assert!(matches!(
        CardService::cancel_card(&pool, "nope").await,
        Err(KanbanError::CardNotFound(_))
    ));
    assert!(matches!(
        CardService::block_card(&pool, "nope", Some("reason")).await,
        Err(KanbanError::CardNotFound(_))
    ));
    assert!(matches!(
        CardService::unblock_card(&pool, "nope", Some("reason")).await,
        Err(KanbanError::CardNotFound(_))
    ));
}

#[tokio::test]
async fn test_full_card_lifecycle_scenario() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, "Sprint 1").await.unwrap();
    let card = CardService::create_card(&pool, &board.id, "Fix bug", "")
        .await
        .unwrap();
    let id = card.card.id.clone();

    let (moved, transition) = CardService::move_to_next(&pool, &id).await.unwrap();
    assert_eq!(moved.column_type, ColumnType::Pending);
    assert_eq!(transition.from, ColumnType::Initial);
    assert_eq!(transition.to, ColumnType::Pending);

    let blocked = CardService::block_card(&pool, &id, Some("waiting for review"))
        .await
        .unwrap();
    assert!(blocked.card.blocked);

    let err = CardService::move_to_next(&pool, &id).await.unwrap_err();
    assert!(matches!(err, KanbanError::CardBlocked(_)));

    let unblocked = CardService::unblock_card(&pool, &id, Some("review done"))
        .await
        .unwrap();
    assert!(!unblocked.card.blocked);
    assert_eq!(unblocked.card.block_reason.as_deref(), Some("waiting for review"));
    assert_eq!(unblocked.card.unblock_reason.as_deref(), Some("review done"));

    let err = CardService::move_to_next(&pool, &id).await.unwrap_err();
    assert!(matches!(err, KanbanError::InvalidTransition(_)));

    let (canceled, _) = CardService::cancel_card(&pool, &id).await.unwrap();
    assert_eq!(canceled.column_type, ColumnType::Canceled);

    let reloaded = CardService::get_card(&pool, &id).await.unwrap();
    assert_eq!(reloaded.column_type, ColumnType::Canceled);
    assert_eq!(reloaded.card.created_at, card.card.created_at);
}

#[tokio::test]
async fn test_failed_operations_leave_card_unchanged() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, "Sprint 1").await.unwrap();
    let card = CardService::create_card(&pool, &board.id, "Fix bug", "")
        .await
        .unwrap();
    let id = card.card.id.clone();

    assert!(matches!(
        CardService::block_card(&pool, &id, Some("")).await,
        Err(KanbanError::MissingReason(_))
    ));
    assert!(matches!(
        CardService::unblock_card(&pool, &id, None).await,
        Err(KanbanError::MissingReason(_))
    ));

    let reloaded = CardService::get_card(&pool, &id).await.unwrap();
    assert_eq!(reloaded.card, card.card);
}

#[tokio::test]
async fn test_final_card_cannot_move_or_cancel() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, "Sprint 1").await.unwrap();
    let card = CardService::create_card(&pool, &board.id, "Ship it", "")
        .await
        .unwrap();
    let id = card.card.id.clone();

    let final_column = board.column(ColumnType::Final).unwrap().id.clone();
    sqlx::query("UPDATE cards SET column_id = ? WHERE id = ?")
        .bind(&final_column)
        .bind(&id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(matches!(
        CardService::move_to_next(&pool, &id).await,
        Err(KanbanError::AlreadyFinal(_))
    ));
    assert!(matches!(
        CardService::cancel_card(&pool, &id).await,
        Err(KanbanError::AlreadyFinalized(_))
    ));

    CardService::block_card(&pool, &id, Some("frozen")).await.unwrap();
    assert!(matches!(
        CardService::move_to_next(&pool, &id).await,
        Err(KanbanError::CardBlocked(_))
    ));
}

#[tokio::test]
async fn test_blocked_card_can_be_canceled() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, "Sprint 1").await.unwrap();
    let card = CardService::create_card(&pool, &board.id, "Fix bug", "")
        .await
        .unwrap();
    let id = card.card.id.clone();

    CardService::block_card(&pool, &id, Some("stuck")).await.unwrap();
    let (canceled, transition) = CardService::cancel_card(&pool, &id).await.unwrap();

    assert_eq!(canceled.column_type, ColumnType::Canceled);
    assert_eq!(transition.from, ColumnType::Initial);
    assert!(canceled.card.blocked);
}

#[tokio::test]
async fn test_recancel_does_not_rewrite_card() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, "Sprint 1").await.unwrap();
    let card = CardService::create_card(&pool, &board.id, "Fix bug", "")
        .await
        .unwrap();
    let id = card.card.id.clone();

    let (first, _) = CardService::cancel_card(&pool, &id).await.unwrap();
    let (second, transition) = CardService::cancel_card(&pool, &id).await.unwrap();

    assert!(transition.is_noop());
    assert_eq!(second.column_type, ColumnType::Canceled);
    assert_eq!(second.card.version, first.card.version);
    assert_eq!(second.card.updated_at, first.card.updated_at);
}

#[tokio::test]
async fn test_stale_save_is_rejected() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, "Sprint 1").await.unwrap();
    let card = CardService::create_card(&pool, &board.id, "Fix bug", "")
        .await
        .unwrap();
    let id = card.card.id.clone();
    let pending = board.column(ColumnType::Pending).unwrap().id.clone();

    let mut conn = pool.acquire().await.unwrap();
    let mut first = CardRepository::find_card_by_id(&mut *conn, &id).await.unwrap().unwrap();
    let mut second = first.clone();

    first.column_id = pending.clone();
    CardRepository::save_card(&mut *conn, &mut first).await.unwrap();
    assert_eq!(first.version, 1);

    second.column_id = pending;
    let err = CardRepository::save_card(&mut *conn, &mut second).await.unwrap_err();
    assert!(matches!(err, KanbanError::Conflict(_)));
    assert_eq!(second.version, 0);
}

#[tokio::test]
async fn test_delete_board_cascades_to_cards() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, "Doomed").await.unwrap();
    let keep = BoardService::create_board(&pool, "Survivor").await.unwrap();

    let first = CardService::create_card(&pool, &board.id, "One", "").await.unwrap();
    let second = CardService::create_card(&pool, &board.id, "Two", "").await.unwrap();
    CardService::move_to_next(&pool, &second.card.id).await.unwrap();
    let other = CardService::create_card(&pool, &keep.id, "Three", "").await.unwrap();

    BoardService::delete_board(&pool, &board.id).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    assert!(BoardRepository::find_board_by_id(&mut *conn, &board.id).await.unwrap().is_none());
    assert!(BoardRepository::find_columns_by_board(&mut *conn, &board.id).await.unwrap().is_empty());
    for id in [&first.card.id, &second.card.id] {
        assert!(CardRepository::find_card_by_id(&mut *conn, id).await.unwrap().is_none());
    }
    assert!(CardRepository::find_card_by_id(&mut *conn, &other.card.id).await.unwrap().is_some());
    drop(conn);

    assert!(matches!(
        CardService::get_card(&pool, &first.card.id).await,
        Err(KanbanError::CardNotFound(_))
    ));
    assert!(matches!(
        BoardService::delete_board(&pool, &board.id).await,
        Err(KanbanError::BoardNotFound(_))
    ));
}

#[tokio::test]
async fn test_init_db_enables_wal_on_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("taskboard.db").display());

    let pool = taskboard::infrastructure::db::init_db(&url).await.unwrap();
    let mode = taskboard::infrastructure::db::verify_wal_mode(&pool).await.unwrap();
    assert_eq!(mode.to_lowercase(), "wal");

    let board = BoardService::create_board(&pool, "On disk").await.unwrap();
    assert_eq!(board.columns.len(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_on_same_card_never_surface_database_errors() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("race.db").display());
    let pool = taskboard::infrastructure::db::init_db(&url).await.unwrap();
    let board = BoardService::create_board(&pool, "Race").await.unwrap();

    for _ in 0..20 {
        let card = CardService::create_card(&pool, &board.id, "Contended", "")
            .await
            .unwrap();
        let id = card.card.id.clone();

        let first = tokio::spawn({
            let pool = pool.clone();
            let id = id.clone();
            async move { CardService::move_to_next(&pool, &id).await }
        });
        let second = tokio::spawn({
            let pool = pool.clone();
            let id = id.clone();
            async move { CardService::move_to_next(&pool, &id).await }
        });

        let results = [first.await.unwrap(), second.await.unwrap()];
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(succeeded, 1, "exactly one move must win: {:?}", results);

        for result in &results {
            if let Err(err) = result {
                assert!(
                    matches!(err, KanbanError::Conflict(_) | KanbanError::InvalidTransition(_)),
                    "loser must see a domain error, got {:?}",
                    err
                );
            }
        }

        let reloaded = CardService::get_card(&pool, &id).await.unwrap();
        assert_eq!(reloaded.column_type, ColumnType::Pending);
        assert_eq!(reloaded.card.version, 1);
    }
}
