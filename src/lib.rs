use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    error::Error,
    fmt::{self, Display, Write},
    ops::Index,
};

use itertools::Itertools;
use smallvec::SmallVec;

const BLANK: u8 = 0;

// u8 tiles hold values up to 255, which caps the grid at 16x16
const MAX_DIM: usize = 16;

// up, down, left, right; the order fixes how ties between equally
// cheap frontier nodes are broken, nothing else
const DELTAS: &[(i32, i32)] = &[(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    n: usize,
    tiles: Vec<u8>,
    blank: (usize, usize),
}

impl Board {
    pub fn new(from: Vec<Vec<u8>>) -> Result<Board, BoardError> {
        let n = from.len();
        for (row, cells) in from.iter().enumerate() {
            if cells.len() != n {
                return Err(BoardError::Ragged {
                    row,
                    len: cells.len(),
                    expected: n,
                });
            }
        }

        Board::from_tiles(from.into_iter().flatten().collect())
    }

    pub fn from_tiles(tiles: Vec<u8>) -> Result<Board, BoardError> {
        if tiles.is_empty() {
            return Err(BoardError::Empty);
        }
        let mut n = 1;
        while n * n < tiles.len() {
            n += 1;
        }
        if n * n != tiles.len() {
            return Err(BoardError::NotSquare { cells: tiles.len() });
        }
        if n > MAX_DIM {
            return Err(BoardError::TooLarge { n });
        }

        let mut seen = [false; MAX_DIM * MAX_DIM];
        let mut blank = None;
        for (ix, &tile) in tiles.iter().enumerate() {
            if tile as usize >= tiles.len() || seen[tile as usize] {
                return Err(BoardError::NotAPermutation);
            }
            seen[tile as usize] = true;
            if tile == BLANK {
                blank = Some((ix / n, ix % n));
            }
        }
        // a permutation of 0..n*n always contains the blank
        let blank = blank.ok_or(BoardError::NotAPermutation)?;

        Ok(Board { n, tiles, blank })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn blank(&self) -> (usize, usize) {
        self.blank
    }

    pub fn hamming(&self) -> u32 {
        let mut count = 0;
        for (ix, &tile) in self.tiles.iter().enumerate() {
            if tile != BLANK && tile as usize != ix + 1 {
                count += 1;
            }
        }
        count
    }

    pub fn manhattan(&self) -> u32 {
        let mut distance = 0;
        for (ix, &tile) in self.tiles.iter().enumerate() {
            if tile == BLANK {
                continue;
            }
            let home = tile as usize - 1;
            distance +=
                (ix / self.n).abs_diff(home / self.n) + (ix % self.n).abs_diff(home % self.n);
        }
        distance as u32
    }

    pub fn is_goal(&self) -> bool {
        let cells = self.tiles.len();
        self.tiles
            .iter()
            .enumerate()
            .all(|(ix, &tile)| tile as usize == (ix + 1) % cells)
    }

    pub fn neighbors(&self) -> SmallVec<[Board; 4]> {
        let mut out = SmallVec::new();
        let (row, col) = self.blank;
        for &(di, dj) in DELTAS {
            let to = (row as i32 + di, col as i32 + dj);
            if to.0 < 0 || to.0 >= self.n as i32 || to.1 < 0 || to.1 >= self.n as i32 {
                continue;
            }
            let to = (to.0 as usize, to.1 as usize);
            let mut slid = self.clone();
            slid.tiles.swap(row * self.n + col, to.0 * self.n + to.1);
            slid.blank = to;
            out.push(slid);
        }

        out
    }

    // swapping one pair of tiles moves a board into the other half of the
    // state space, so a board and its twin never share a goal
    pub fn twin(&self) -> Board {
        let mut tiles = self.tiles.clone();
        let mut first = None;
        for ix in 0..tiles.len() {
            if tiles[ix] == BLANK {
                continue;
            }
            match first {
                None => first = Some(ix),
                Some(f) => {
                    tiles.swap(f, ix);
                    break;
                }
            }
        }

        Board {
            n: self.n,
            tiles,
            blank: self.blank,
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for line in self.tiles.chunks(self.n) {
            if !first {
                f.write_char('\n')?;
            } else {
                first = false;
            }

            write!(f, "{}", line.iter().format(" "))?;
        }

        Ok(())
    }
}

impl Index<(usize, usize)> for Board {
    type Output = u8;
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.tiles[index.0 * self.n + index.1]
    }
}

pub fn parse_board(b: &str) -> Result<Board, BoardError> {
    let mut tiles = Vec::new();
    for token in b.split_whitespace() {
        let tile = token
            .parse()
            .map_err(|_| BoardError::BadTile(token.to_string()))?;
        tiles.push(tile);
    }

    Board::from_tiles(tiles)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BoardError {
    Empty,
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
    NotSquare {
        cells: usize,
    },
    TooLarge {
        n: usize,
    },
    NotAPermutation,
    BadTile(String),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Empty => write!(f, "board has no cells"),
            BoardError::Ragged { row, len, expected } => {
                write!(f, "row {} has {} cells, expected {}", row, len, expected)
            }
            BoardError::NotSquare { cells } => {
                write!(f, "{} cells do not form a square grid", cells)
            }
            BoardError::TooLarge { n } => {
                write!(
                    f,
                    "{0}x{0} exceeds the largest supported board ({1}x{1})",
                    n, MAX_DIM
                )
            }
            BoardError::NotAPermutation => {
                write!(
                    f,
                    "tiles must contain every value from 0 to n*n-1 exactly once"
                )
            }
            BoardError::BadTile(token) => write!(f, "unreadable tile value {:?}", token),
        }
    }
}

impl Error for BoardError {}

struct SearchNode {
    board: Board,
    parent: Option<usize>,
    moves: u32,
}

struct Open {
    priority: u32,
    node: usize,
}

// flipped so the std max-heap pops the cheapest frontier node first
impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.cmp(&self.priority)
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl Eq for Open {}

enum Step {
    Expanded,
    Goal(usize),
    Exhausted,
}

struct Search {
    nodes: Vec<SearchNode>,
    queue: BinaryHeap<Open>,
    visited: usize,
    generated: usize,
}

impl Search {
    fn new(initial: Board) -> Search {
        let mut queue = BinaryHeap::new();
        queue.push(Open {
            priority: initial.manhattan(),
            node: 0,
        });

        Search {
            nodes: vec![SearchNode {
                board: initial,
                parent: None,
                moves: 0,
            }],
            queue,
            visited: 0,
            generated: 0,
        }
    }

    fn step(&mut self) -> Step {
        let Some(Open { node, .. }) = self.queue.pop() else {
            return Step::Exhausted;
        };

        if self.nodes[node].board.is_goal() {
            return Step::Goal(node);
        }

        self.visited += 1;
        let parent = self.nodes[node].parent;
        let moves = self.nodes[node].moves;
        for next in self.nodes[node].board.neighbors() {
            // don't undo the slide that produced this node; any other
            // revisit is allowed and may re-enter the frontier at a
            // different cost
            if parent.map_or(false, |p| next == self.nodes[p].board) {
                continue;
            }

            let priority = next.manhattan() + moves + 1;
            self.nodes.push(SearchNode {
                board: next,
                parent: Some(node),
                moves: moves + 1,
            });
            self.queue.push(Open {
                priority,
                node: self.nodes.len() - 1,
            });
            self.generated += 1;
        }

        Step::Expanded
    }

    fn path_to(&self, goal: usize) -> Vec<Board> {
        let mut path = Vec::new();
        let mut current = Some(goal);
        while let Some(node) = current {
            path.push(self.nodes[node].board.clone());
            current = self.nodes[node].parent;
        }
        path.reverse();
        path
    }
}

pub struct Solution {
    path: Option<Vec<Board>>,
    visited: usize,
    generated: usize,
}

impl Solution {
    pub fn is_solvable(&self) -> bool {
        self.path.is_some()
    }

    pub fn moves(&self) -> Option<usize> {
        self.path.as_ref().map(|path| path.len() - 1)
    }

    pub fn path(&self) -> Option<&[Board]> {
        self.path.as_deref()
    }

    pub fn visited(&self) -> usize {
        self.visited
    }

    pub fn generated(&self) -> usize {
        self.generated
    }
}

// Exactly one of a board and its twin can reach the goal. Stepping the two
// searches in lockstep turns an unsolvable input into a finite twin solve
// instead of an endless expansion, since pruning only the immediate
// reversal can never drain the frontier on its own.
pub fn solve(initial: &Board) -> Solution {
    let mut twin = Search::new(initial.twin());
    let mut primary = Search::new(initial.clone());

    let goal = loop {
        match primary.step() {
            Step::Goal(node) => break Some(node),
            Step::Exhausted => break None,
            Step::Expanded => {}
        }
        if let Step::Goal(_) = twin.step() {
            break None;
        }
    };

    Solution {
        path: goal.map(|node| primary.path_to(node)),
        visited: primary.visited + twin.visited,
        generated: primary.generated + twin.generated,
    }
}
