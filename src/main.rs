use mineprob::{analyze, Board, Cell, EngineConfig, EngineError, Position};
use std::io::Read;

/// Reads a board snapshot from stdin (`.` hidden, `F` flagged, `0`-`8`
/// revealed counts, one row per line), analyzes it, and prints the mine
/// probability of every constrained cell plus any genuine 50/50 pairs.
fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Analysis error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<(), EngineError> {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() || input.trim().is_empty() {
        eprintln!("Expected a board on stdin, e.g.:\n  .1.\n  .2.\n  ...");
        std::process::exit(2);
    }

    let board = Board::from_ascii(&input)?;
    let analysis = analyze(&board, &EngineConfig::default())?;

    let (width, height) = board.dimensions();
    println!("Mine probabilities:");
    for row in 0..height as i32 {
        for col in 0..width as i32 {
            let pos = Position::new(row, col);
            match board.get(pos) {
                Some(Cell::Revealed(n)) => print!("  {n}   "),
                Some(Cell::Flagged) => print!("  F   "),
                _ => match analysis.probabilities.get(&pos) {
                    Some(p) => print!("{:>5.0}% ", p.as_f64() * 100.0),
                    None => print!("  ?   "),
                },
            }
        }
        println!();
    }

    if analysis.groups.is_empty() {
        println!("\nNo 50/50 situations.");
    } else {
        println!("\n50/50 pairs:");
        for group in &analysis.groups {
            println!(
                "  ({}, {}) <-> ({}, {})",
                group.first.row, group.first.col, group.second.row, group.second.col
            );
        }
    }

    if !analysis.unresolved.is_empty() {
        println!("\n{} cell(s) could not be determined.", analysis.unresolved.len());
    }

    Ok(())
}
