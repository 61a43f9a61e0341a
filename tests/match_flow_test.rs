//! Tests for the per-match turn loop over in-memory connections.

use std::path::PathBuf;

use strictly_arena::{
    Cell, Connection, GameMatch, JsonResultStore, Mark, MatchState, Outcome, Participant,
    ResultLog, Slot, Square,
};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};

const PIPE_CAPACITY: usize = 64 * 1024;

/// Creates a match between two in-memory clients. The temp dir must stay in
/// scope for the history file to remain.
fn setup_match() -> (
    TempDir,
    ResultLog,
    GameMatch<DuplexStream>,
    DuplexStream,
    DuplexStream,
) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let results = ResultLog::new(JsonResultStore::new(history_path(&dir)));

    let (x_server, x_client) = duplex(PIPE_CAPACITY);
    let (o_server, o_client) = duplex(PIPE_CAPACITY);
    let game = GameMatch::new(
        "match-1".to_string(),
        Participant::new(Connection::new(x_server, "x"), "ann"),
        Participant::new(Connection::new(o_server, "o"), "bob"),
        results.clone(),
    );

    (dir, results, game, x_client, o_client)
}

fn history_path(dir: &TempDir) -> PathBuf {
    dir.path().join("history.json")
}

async fn read_all(mut client: DuplexStream) -> String {
    let mut out = String::new();
    client
        .read_to_string(&mut out)
        .await
        .expect("Failed to read client output");
    out
}

fn occupied(game: &GameMatch<DuplexStream>) -> usize {
    game.board()
        .squares()
        .iter()
        .filter(|s| **s != Square::Empty)
        .count()
}

#[tokio::test]
async fn test_row_win_is_recorded() {
    let (_dir, results, game, mut x, mut o) = setup_match();
    x.write_all(b"1 1\n1 2\n1 3\n").await.unwrap();
    o.write_all(b"2 1\n2 2\n").await.unwrap();

    let report = game.run().await;

    assert_eq!(report.state, MatchState::Finished(Outcome::Win(Mark::X)));
    assert_eq!(report.moves_applied, 5);

    let entries = results.snapshot().await;
    assert_eq!(entries.len(), 1);
    let summary = &entries[0];
    assert_eq!(summary.game_id(), "match-1");
    assert_eq!(summary.player1(), "ann");
    assert_eq!(summary.player2(), "bob");
    assert_eq!(*summary.winner(), Outcome::Win(Mark::X));
    assert!(*summary.finished());
    assert_eq!(summary.board(), &report.board);

    let x_out = read_all(x).await;
    let o_out = read_all(o).await;
    assert!(x_out.contains("Game over! Player X wins!\n"));
    assert!(o_out.contains("Game over! Player X wins!\n"));
}

#[tokio::test]
async fn test_full_board_without_line_is_draw() {
    let (_dir, results, game, mut x, mut o) = setup_match();
    // X O X / X O O / O X X
    x.write_all(b"1 1\n1 3\n2 1\n3 2\n3 3\n").await.unwrap();
    o.write_all(b"1 2\n2 2\n2 3\n3 1\n").await.unwrap();

    let report = game.run().await;

    assert_eq!(report.state, MatchState::Finished(Outcome::Draw));
    assert_eq!(report.moves_applied, 9);
    assert_eq!(results.len().await, 1);
    assert_eq!(*results.snapshot().await[0].winner(), Outcome::Draw);

    let x_out = read_all(x).await;
    assert!(x_out.contains("Game over! It's a draw!\n"));
}

#[tokio::test]
async fn test_disconnect_of_active_player_aborts_without_record() {
    let (dir, results, game, x, o) = setup_match();
    let (x_read, mut x_write) = tokio::io::split(x);
    x_write.shutdown().await.unwrap();

    let report = game.run().await;

    assert_eq!(report.state, MatchState::Aborted);
    assert_eq!(report.moves_applied, 0);
    assert!(results.is_empty().await);
    assert!(!history_path(&dir).exists());

    let mut x_read = x_read;
    let mut x_out = String::new();
    x_read.read_to_string(&mut x_out).await.unwrap();
    let o_out = read_all(o).await;
    assert!(x_out.contains("Player disconnected! game over!\n"));
    assert!(o_out.contains("Player disconnected! game over!\n"));
}

#[tokio::test]
async fn test_second_player_dropping_mid_match_aborts() {
    let (_dir, results, game, mut x, o) = setup_match();
    x.write_all(b"2 2\n").await.unwrap();
    drop(o);

    let report = game.run().await;

    assert_eq!(report.state, MatchState::Aborted);
    assert!(results.is_empty().await);
    let x_out = read_all(x).await;
    assert!(x_out.contains("Player disconnected! game over!\n"));
}

#[tokio::test]
async fn test_unparseable_move_is_rejected_and_turn_kept() {
    let (_dir, _results, game, mut x, mut o) = setup_match();
    x.write_all(b"a b\n1 1\n1 2\n1 3\n").await.unwrap();
    o.write_all(b"2 1\n2 2\n").await.unwrap();

    let report = game.run().await;
    assert_eq!(report.state, MatchState::Finished(Outcome::Win(Mark::X)));
    assert_eq!(report.moves_applied, 5);

    let x_out = read_all(x).await;
    let o_out = read_all(o).await;
    assert!(x_out.contains("Invalid move: invalid numbers\n"));
    assert!(!o_out.contains("Invalid move"));

    // Three accepted moves plus one re-prompt; the board is not re-sent.
    assert_eq!(x_out.matches("Your turn!").count(), 4);
    assert_eq!(x_out.matches("    1 2 3").count(), 5);
    assert_eq!(o_out.matches("Your turn!").count(), 2);
}

#[tokio::test]
async fn test_non_utf8_move_is_rejected_not_a_disconnect() {
    let (_dir, results, game, mut x, mut o) = setup_match();
    x.write_all(b"\xff\xfe\n\xff 1\n1 1\n1 2\n1 3\n")
        .await
        .unwrap();
    o.write_all(b"2 1\n2 2\n").await.unwrap();

    let report = game.run().await;
    assert_eq!(report.state, MatchState::Finished(Outcome::Win(Mark::X)));
    assert_eq!(report.moves_applied, 5);
    assert_eq!(results.len().await, 1);

    let x_out = read_all(x).await;
    assert!(x_out.contains("Invalid move: expected two numbers separated by space\n"));
    assert!(x_out.contains("Invalid move: invalid numbers\n"));
    assert!(!x_out.contains("Player disconnected!"));
    let o_out = read_all(o).await;
    assert!(!o_out.contains("Player disconnected!"));
}

#[tokio::test]
async fn test_rejections_leave_board_and_turn_untouched() {
    let (_dir, _results, mut game, mut x, mut o) = setup_match();

    x.write_all(b"5 5\n1\n1 1\n").await.unwrap();
    assert_eq!(game.play_turn().await.unwrap(), None);
    assert_eq!(game.moves_applied(), 1);
    assert_eq!(occupied(&game), 1);
    assert_eq!(game.active_slot(), Slot::Second);

    o.write_all(b"1 1\n0 2\n2 2\n").await.unwrap();
    assert_eq!(game.play_turn().await.unwrap(), None);
    assert_eq!(game.moves_applied(), 2);
    assert_eq!(occupied(&game), 2);
    assert_eq!(
        game.board().get(Cell::new(0, 0).unwrap()),
        Square::Occupied(Mark::X)
    );
    assert_eq!(
        game.board().get(Cell::new(1, 1).unwrap()),
        Square::Occupied(Mark::O)
    );
    assert_eq!(game.active_slot(), Slot::First);
    assert_eq!(game.state(), MatchState::InProgress);

    drop(game);
    let o_out = read_all(o).await;
    assert!(o_out.contains("Invalid move: cell already occupied\n"));
    assert!(o_out.contains("Invalid move: row and column must be between 1 and 3\n"));
    let x_out = read_all(x).await;
    assert!(x_out.contains("Invalid move: row and column must be between 1 and 3\n"));
    assert!(x_out.contains("Invalid move: expected two numbers separated by space\n"));
}

#[tokio::test]
async fn test_turns_alternate_first_seat_on_even_moves() {
    let (_dir, _results, mut game, mut x, mut o) = setup_match();
    // First eight moves of a drawn game; none of them ends it.
    x.write_all(b"1 1\n1 3\n2 1\n3 2\n").await.unwrap();
    o.write_all(b"1 2\n2 2\n2 3\n3 1\n").await.unwrap();

    for n in 0..8 {
        let expected = if n % 2 == 0 { Slot::First } else { Slot::Second };
        assert_eq!(game.active_slot(), expected, "before move {n}");
        assert_eq!(game.play_turn().await.unwrap(), None);
        assert_eq!(game.moves_applied(), n + 1);
    }
    assert_eq!(game.active_slot(), Slot::First);
    assert_eq!(game.participant(Slot::First).name(), "ann");
}

#[tokio::test]
async fn test_persisted_snapshot_matches_memory() {
    let (_dir, results, game, mut x, mut o) = setup_match();
    x.write_all(b"1 1\n2 2\n3 3\n").await.unwrap();
    o.write_all(b"1 2\n1 3\n").await.unwrap();

    let report = game.run().await;
    assert_eq!(report.state, MatchState::Finished(Outcome::Win(Mark::X)));

    let persisted = results.store().load().await.expect("Load failed");
    assert_eq!(persisted, results.snapshot().await);
}
