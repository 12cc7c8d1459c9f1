use std::collections::HashMap;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use magicboard::perft::{divide, perft};
use magicboard::{AttackTables, Board};
use shakmaty::{Chess, Move, Position, Role};

#[derive(Parser, Debug)]
#[command(author, version, about = "Perft from the initial position", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 4)]
    depth: u32,

    /// Print the subtree count of every root move
    #[arg(long)]
    divide: bool,

    /// Cross-check against shakmaty restricted to the same rules
    /// (no castling or en-passant capture, pawns do not promote)
    #[arg(long)]
    reference: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let build = Instant::now();
    let tables = AttackTables::shared();
    println!("Attack tables built in {} ms", build.elapsed().as_millis());

    let mut board = Board::new(tables);
    println!("Running perft from the initial position at depth {}", args.depth);

    let start = Instant::now();
    let (nodes, per_move) = if args.divide {
        let report = divide(&mut board, args.depth);
        for (mv, count) in &report.moves {
            println!("{}: {}", mv, count);
        }
        (report.nodes, Some(report.moves))
    } else {
        (perft(&mut board, args.depth), None)
    };
    let duration = start.elapsed();

    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros().max(1) as f64)
    );

    if args.reference {
        let pos = Chess::default();
        let expected = perft_restricted(&pos, args.depth);
        let mut mismatches = 0;

        if let Some(per_move) = per_move {
            let reference = divide_restricted(&pos, args.depth);
            for (mv, count) in &per_move {
                match reference.get(mv) {
                    Some(want) if want == count => {}
                    Some(want) => {
                        eprintln!("{}: got {} expected {}", mv, count, want);
                        mismatches += 1;
                    }
                    None => {
                        eprintln!("{}: not generated by reference", mv);
                        mismatches += 1;
                    }
                }
            }
            for mv in reference.keys() {
                if !per_move.iter().any(|(m, _)| m == mv) {
                    eprintln!("{}: missing", mv);
                    mismatches += 1;
                }
            }
        }

        if nodes != expected || mismatches > 0 {
            bail!(
                "reference mismatch at depth {}: got {} expected {}",
                args.depth,
                nodes,
                expected
            );
        }
        println!("Reference perft({}) = {} nodes, match", args.depth, expected);
    }

    Ok(())
}

// Legal moves without castling or en passant; each promotion group becomes
// one plain pawn move so the pawn stays a pawn on the last rank.
fn restricted_moves(pos: &Chess) -> Vec<Move> {
    pos.legal_moves()
        .iter()
        .filter(|m| !m.is_castle() && !m.is_en_passant())
        .filter_map(|m| match m {
            Move::Normal {
                role,
                from,
                capture,
                to,
                promotion: Some(Role::Queen),
            } => Some(Move::Normal {
                role: *role,
                from: *from,
                capture: *capture,
                to: *to,
                promotion: None,
            }),
            Move::Normal {
                promotion: Some(_), ..
            } => None,
            other => Some(other.clone()),
        })
        .collect()
}

fn move_text(m: &Move) -> String {
    match m.from() {
        Some(from) => format!("{}{}", from, m.to()),
        None => format!("{}", m.to()),
    }
}

fn perft_restricted(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for m in restricted_moves(pos) {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_restricted(&new_pos, depth - 1);
    }
    nodes
}

fn divide_restricted(pos: &Chess, depth: u32) -> HashMap<String, u64> {
    let mut out = HashMap::new();
    if depth == 0 {
        return out;
    }
    for m in restricted_moves(pos) {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        out.insert(move_text(&m), perft_restricted(&new_pos, depth - 1));
    }
    out
}
