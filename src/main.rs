use std::io::{self, Read};
use std::process;

use npuzzle_solver::{parse_board, solve};

// Input: whitespace-separated integers forming an n x n grid in row-major
// order, 0 marking the blank. Line breaks are free-form.
fn main() {
    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        eprintln!("failed to read stdin: {}", err);
        process::exit(1);
    }

    let board = match parse_board(&input) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("invalid board: {}", err);
            process::exit(1);
        }
    };

    let solution = solve(&board);

    if let Some(path) = solution.path() {
        println!("Minimum number of moves = {}", path.len() - 1);
        println!("Solution:");
        for board in path {
            println!("{}", board);
            println!();
        }
        println!(
            "Visited {} board positions (generated {} total).",
            solution.visited(),
            solution.generated()
        );
    } else {
        println!("No solution exists.");
    }
}
