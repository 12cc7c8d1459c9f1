mod common;

use common::{board_from_fen, tables};
use magicboard::{Board, DrawReason, GameStatus, Move};

#[test]
fn fools_mate_played_out() {
    let mut board = Board::new(tables());
    for mv in ["f2f3", "e7e5", "g2g4"] {
        board.make_move(Move::parse(mv).unwrap()).unwrap();
        assert_eq!(board.status(), GameStatus::Ongoing);
    }
    board.make_move(Move::parse("d8h4").unwrap()).unwrap();

    assert!(board.is_in_check(board.side_to_move()));
    assert!(board.is_checkmate());
    assert!(!board.is_stalemate());
    assert!(board.legal_moves().is_empty());
    assert_eq!(board.status(), GameStatus::Checkmate);
    // The ending queries leave the position where it was
    assert_eq!(board.history_len(), 4);
}

#[test]
fn check_with_an_escape_is_not_mate() {
    // Queen checks from h4 but g3 can be interposed
    let mut board = board_from_fen("rnb1kbnr/pppp1ppp/8/4p3/7q/5P2/PPPPP1PP/RNBQKBNR w KQkq - 1 3");
    assert!(board.is_in_check(board.side_to_move()));
    assert!(!board.is_checkmate());
    assert!(board.legal_moves().contains(&Move::parse("g2g3").unwrap()));
    assert_eq!(board.status(), GameStatus::Ongoing);
}

#[test]
fn cornered_king_without_moves_is_stalemate() {
    let mut board = board_from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(!board.is_in_check(board.side_to_move()));
    assert!(!board.is_checkmate());
    assert!(board.is_stalemate());
    assert_eq!(board.status(), GameStatus::Stalemate(DrawReason::NoLegalMoves));
}

#[test]
fn fifty_move_rule() {
    let mut board = board_from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 99 80");
    assert_eq!(board.status(), GameStatus::Ongoing);

    board.make_move(Move::parse("e1d1").unwrap()).unwrap();
    assert_eq!(board.halfmove_clock(), 100);
    assert!(board.is_stalemate());
    assert_eq!(board.status(), GameStatus::Stalemate(DrawReason::FiftyMoveRule));

    // A pawn move would have reset the clock
    assert!(board.unmake_move());
    board.make_move(Move::parse("e2e4").unwrap()).unwrap();
    assert_eq!(board.halfmove_clock(), 0);
    assert_eq!(board.status(), GameStatus::Ongoing);
}

#[test]
fn mate_outranks_fifty_move_rule() {
    let mut board = board_from_fen("4k3/8/8/8/8/8/PP6/K6q w - - 120 90");
    assert!(board.is_checkmate());
    assert!(!board.is_stalemate());
    assert_eq!(board.status(), GameStatus::Checkmate);
}

#[test]
fn insufficient_material() {
    let cases = [
        ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", true),
        ("4k3/8/8/8/8/8/8/1N2K3 w - - 0 1", true),
        ("4k3/8/8/8/8/8/8/2b1K3 w - - 0 1", true),
        // bishops on c1 and c5, both dark
        ("4k3/8/8/2b5/8/8/8/2B1K3 w - - 0 1", true),
        // c1 dark, f5 light
        ("4k3/8/8/5b2/8/8/8/2B1K3 w - - 0 1", false),
        ("4k3/8/8/8/8/8/8/1NN1K3 w - - 0 1", false),
        ("4k3/8/8/8/8/8/8/1N2K1n1 w - - 0 1", false),
        ("4k3/8/8/8/8/8/P7/4K3 w - - 0 1", false),
        ("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", false),
    ];
    for (fen, expected) in cases {
        let mut board = board_from_fen(fen);
        assert_eq!(board.has_insufficient_material(), expected, "{fen}");
        let status = board.status();
        if expected {
            assert_eq!(status, GameStatus::Stalemate(DrawReason::InsufficientMaterial), "{fen}");
        } else {
            assert_eq!(status, GameStatus::Ongoing, "{fen}");
        }
    }
}
