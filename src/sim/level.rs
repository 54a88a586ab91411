/// Level catalog: embedded text maps, parser, and load-time validation.
///
/// ## Tile legend:
///   '#' = Wall                 '.' = Open (seeds a pellet)
///   'o' = Open + power pellet  'P' = player home
///   '1'..'4' = pursuer spawn (identity Red/Green/Pink/Magenta)
///
/// A malformed level is a fatal configuration error: the catalog refuses to
/// load rather than run with undefined behavior. Transient in-game
/// conditions (an agent requesting a move into a wall) are not errors and
/// never reach this module.

use std::error::Error;
use std::fmt;

use crate::domain::agent::PursuerId;
use crate::domain::grid::{Cell, Maze};

#[derive(Clone, Debug)]
pub struct LevelDef {
    pub name: String,
    pub maze: Maze,
    pub power_pellets: Vec<(usize, usize)>,
    pub pursuer_spawns: Vec<(usize, usize, PursuerId)>,
    pub home: (usize, usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelError {
    NonRectangular { level: String, row: usize },
    UnknownTile { level: String, ch: char, x: usize, y: usize },
    MissingHome { level: String },
    DuplicateHome { level: String },
    NoPursuers { level: String },
    DuplicateSpawn { level: String, digit: char },
    BlockedCell { level: String, what: &'static str, x: usize, y: usize },
    NoPellets { level: String },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::NonRectangular { level, row } => {
                write!(f, "level '{level}': row {row} has a different width")
            }
            LevelError::UnknownTile { level, ch, x, y } => {
                write!(f, "level '{level}': unknown tile '{ch}' at ({x}, {y})")
            }
            LevelError::MissingHome { level } => {
                write!(f, "level '{level}': no player home ('P') marker")
            }
            LevelError::DuplicateHome { level } => {
                write!(f, "level '{level}': more than one player home marker")
            }
            LevelError::NoPursuers { level } => {
                write!(f, "level '{level}': no pursuer spawn markers")
            }
            LevelError::DuplicateSpawn { level, digit } => {
                write!(f, "level '{level}': duplicate pursuer spawn '{digit}'")
            }
            LevelError::BlockedCell { level, what, x, y } => {
                write!(f, "level '{level}': {what} at ({x}, {y}) is not an open cell")
            }
            LevelError::NoPellets { level } => {
                write!(f, "level '{level}': nothing to collect")
            }
        }
    }
}

impl Error for LevelError {}

impl LevelDef {
    /// Parse one level from its text rows, then validate placement.
    pub fn parse(name: &str, rows: &[&str]) -> Result<LevelDef, LevelError> {
        let level = name.to_string();
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());

        let mut cells = Vec::with_capacity(width * height);
        let mut power_pellets = Vec::new();
        let mut spawns: Vec<(usize, usize, PursuerId)> = Vec::new();
        let mut home = None;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(LevelError::NonRectangular { level, row: y });
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '#' => Cell::Wall,
                    '.' => Cell::Open,
                    'o' => {
                        power_pellets.push((x, y));
                        Cell::Open
                    }
                    'P' => {
                        if home.replace((x, y)).is_some() {
                            return Err(LevelError::DuplicateHome { level });
                        }
                        Cell::Open
                    }
                    '1'..='4' => {
                        let id = match ch {
                            '1' => PursuerId::Red,
                            '2' => PursuerId::Green,
                            '3' => PursuerId::Pink,
                            _ => PursuerId::Magenta,
                        };
                        if spawns.iter().any(|&(_, _, other)| other == id) {
                            return Err(LevelError::DuplicateSpawn { level, digit: ch });
                        }
                        spawns.push((x, y, id));
                        Cell::Open
                    }
                    _ => return Err(LevelError::UnknownTile { level, ch, x, y }),
                };
                cells.push(cell);
            }
        }

        let home = home.ok_or(LevelError::MissingHome { level: name.to_string() })?;
        if spawns.is_empty() {
            return Err(LevelError::NoPursuers { level: name.to_string() });
        }

        let def = LevelDef {
            name: name.to_string(),
            maze: Maze::new(width, height, cells),
            power_pellets,
            pursuer_spawns: spawns,
            home,
        };
        def.validate()?;
        Ok(def)
    }

    /// Semantic placement checks, also applied to programmatically built
    /// definitions: every configured coordinate must land on an Open cell
    /// inside the grid, and the level must have something to collect.
    pub fn validate(&self) -> Result<(), LevelError> {
        let level = || self.name.clone();
        let open = |x: usize, y: usize| self.maze.is_open(x as i32, y as i32);

        for &(x, y) in &self.power_pellets {
            if !open(x, y) {
                return Err(LevelError::BlockedCell { level: level(), what: "power pellet", x, y });
            }
        }
        for &(x, y, _) in &self.pursuer_spawns {
            if !open(x, y) {
                return Err(LevelError::BlockedCell { level: level(), what: "pursuer spawn", x, y });
            }
        }
        let (hx, hy) = self.home;
        if !open(hx, hy) {
            return Err(LevelError::BlockedCell { level: level(), what: "player home", x: hx, y: hy });
        }

        let any_open = (0..self.maze.height())
            .any(|y| (0..self.maze.width()).any(|x| open(x, y)));
        if !any_open {
            return Err(LevelError::NoPellets { level: level() });
        }
        Ok(())
    }
}

/// The shipped level sequence, in play order.
pub fn catalog() -> Result<Vec<LevelDef>, LevelError> {
    EMBEDDED
        .iter()
        .map(|(name, rows)| LevelDef::parse(name, rows))
        .collect()
}

const EMBEDDED: [(&str, &[&str]); 3] = [
    (
        "NEURAL PATH",
        &[
            "#########################",
            "#.........#...#.........#",
            "#.o#.###.###.###.###.#o.#",
            "#.#...#...#...#...#...#.#",
            "#...#...#...#...#...#...#",
            "###.###.##1.##2.###.#####",
            "#.......................#",
            "#.#.#####.##P.........#.#",
            "#.#...................#.#",
            "#.###.####3#.#4####.###.#",
            "#.......#...#...#.......#",
            "###.###.#.#.#.#.#.###.###",
            "#.o...#...#...#...#...o.#",
            "#.###.###.#####.###.###.#",
            "#########################",
        ],
    ),
    (
        "CYBER CORE",
        &[
            "#########################",
            "#o.....................o#",
            "#.#####.#######.#####.#.#",
            "#.#.......#.......#...#.#",
            "#.#.#####.#.#####.#.#.#.#",
            "#......#..1.#.2.....#...#",
            "#.#.##.####.#.#####.###.#",
            "#.#.........P...........#",
            "#.####.##########.#####.#",
            "#......#..3...4.........#",
            "#.#.##.####.#######.###.#",
            "#.#.......#.......#...#.#",
            "#.#######.#######.###.#.#",
            "#o.....................o#",
            "#########################",
        ],
    ),
    (
        "SYNTH MAZE",
        &[
            "#########################",
            "#o....#.....#.....#....o#",
            "#.###.#.###.#.###.#.###.#",
            "#.#.....#.......#.....#.#",
            "#.#.#####.#####.#####.#.#",
            "#.........1...2.........#",
            "#.#.###.###.#.###.###.#.#",
            "#.#...#.....P.....#...#.#",
            "#.###.#####.#.#####.###.#",
            "#.........3...4.........#",
            "#.#.###.#######.###.###.#",
            "#.#.....#.....#...#...#.#",
            "#.#######.###.###.#####.#",
            "#o.....................o#",
            "#########################",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_parses_all_levels() {
        let levels = catalog().expect("embedded catalog must be valid");
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].name, "NEURAL PATH");
        assert_eq!(levels[1].name, "CYBER CORE");
        assert_eq!(levels[2].name, "SYNTH MAZE");
        for def in &levels {
            assert_eq!(def.maze.width(), 25);
            assert_eq!(def.maze.height(), 15);
            assert_eq!(def.pursuer_spawns.len(), 4);
            assert_eq!(def.power_pellets.len(), 4);
            assert_eq!(def.home, (12, 7));
        }
    }

    #[test]
    fn catalog_matches_configured_coordinates() {
        let levels = catalog().unwrap();
        assert_eq!(
            levels[0].power_pellets,
            vec![(2, 2), (22, 2), (2, 12), (22, 12)]
        );
        assert_eq!(
            levels[1].power_pellets,
            vec![(1, 1), (23, 1), (1, 13), (23, 13)]
        );
        assert_eq!(levels[1].power_pellets, levels[2].power_pellets);

        for def in &levels {
            assert_eq!(
                def.pursuer_spawns,
                vec![
                    (10, 5, PursuerId::Red),
                    (14, 5, PursuerId::Green),
                    (10, 9, PursuerId::Pink),
                    (14, 9, PursuerId::Magenta),
                ]
            );
        }
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = LevelDef::parse("bad", &["#P#", "#1#", "##"]).unwrap_err();
        assert_eq!(err, LevelError::NonRectangular { level: "bad".into(), row: 2 });
    }

    #[test]
    fn rejects_unknown_tile() {
        let err = LevelDef::parse("bad", &["#P1", "##x"]).unwrap_err();
        assert!(matches!(err, LevelError::UnknownTile { ch: 'x', x: 2, y: 1, .. }));
    }

    #[test]
    fn rejects_missing_or_duplicate_home() {
        assert!(matches!(
            LevelDef::parse("bad", &["##", "1."]).unwrap_err(),
            LevelError::MissingHome { .. }
        ));
        assert!(matches!(
            LevelDef::parse("bad", &["PP", "1."]).unwrap_err(),
            LevelError::DuplicateHome { .. }
        ));
    }

    #[test]
    fn rejects_duplicate_spawn_identity() {
        assert!(matches!(
            LevelDef::parse("bad", &["P1", "1."]).unwrap_err(),
            LevelError::DuplicateSpawn { digit: '1', .. }
        ));
    }

    #[test]
    fn rejects_level_without_pursuers() {
        assert!(matches!(
            LevelDef::parse("bad", &["P.", ".."]).unwrap_err(),
            LevelError::NoPursuers { .. }
        ));
    }

    #[test]
    fn validate_rejects_power_pellet_on_wall() {
        let mut def = LevelDef::parse("ok", &["P1", ".."]).unwrap();
        def.power_pellets.push((5, 5));
        assert!(matches!(
            def.validate().unwrap_err(),
            LevelError::BlockedCell { what: "power pellet", .. }
        ));
    }

    #[test]
    fn validate_rejects_spawn_out_of_bounds() {
        let mut def = LevelDef::parse("ok", &["P1", ".."]).unwrap();
        def.pursuer_spawns.push((9, 0, PursuerId::Green));
        assert!(matches!(
            def.validate().unwrap_err(),
            LevelError::BlockedCell { what: "pursuer spawn", .. }
        ));
    }
}
