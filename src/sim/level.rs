//! Level grid and plan parsing
//!
//! A level is a fixed-size grid of static cells plus the actor spawns found
//! while parsing its text plan. The grid never changes after parsing and is
//! shared by every `GameState` of the same level.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::actor::{ActorKind, Bounce, Heading};
use crate::Vector;

/// Static classification of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    #[default]
    Empty,
    Wall,
    /// Electrified cell; touching it loses the level
    Hazard,
}

impl CellKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Empty => "empty",
            CellKind::Wall => "wall",
            CellKind::Hazard => "hazard",
        }
    }
}

/// What a single plan character turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Cell kind stamped into the grid
    pub cell: CellKind,
    /// Actor spawned at the cell, if any
    pub spawn: Option<ActorKind>,
}

impl Glyph {
    /// A purely static cell
    pub const fn cell(cell: CellKind) -> Self {
        Self { cell, spawn: None }
    }

    /// An actor spawn over an empty cell
    pub const fn actor(kind: ActorKind) -> Self {
        Self {
            cell: CellKind::Empty,
            spawn: Some(kind),
        }
    }
}

/// Character-to-glyph lookup used when parsing plans.
///
/// The default legend covers the stock characters; callers may add their own
/// entries to introduce new hazards or pickups without touching the parser.
#[derive(Debug, Clone)]
pub struct Legend {
    glyphs: HashMap<char, Glyph>,
}

impl Default for Legend {
    fn default() -> Self {
        let mut legend = Self::empty();
        legend.insert('.', Glyph::cell(CellKind::Empty));
        legend.insert('#', Glyph::cell(CellKind::Wall));
        legend.insert('!', Glyph::cell(CellKind::Hazard));
        legend.insert('@', Glyph::actor(ActorKind::Player));
        legend.insert('o', Glyph::actor(ActorKind::Cookie));
        legend.insert('m', Glyph::actor(ActorKind::Monster));
        legend.insert('x', Glyph::actor(ActorKind::WinSpot));
        legend.insert('<', Glyph::actor(ActorKind::Cloud(Heading::Left)));
        legend.insert('>', Glyph::actor(ActorKind::Cloud(Heading::Right)));
        legend.insert('|', Glyph::actor(ActorKind::Lightning(Bounce::Vertical)));
        legend.insert('=', Glyph::actor(ActorKind::Lightning(Bounce::Horizontal)));
        // Stationary lightning also electrifies the cell it sits in
        legend.insert(
            '+',
            Glyph {
                cell: CellKind::Hazard,
                spawn: Some(ActorKind::Lightning(Bounce::Still)),
            },
        );
        legend
    }
}

impl Legend {
    /// Legend with no entries
    pub fn empty() -> Self {
        Self {
            glyphs: HashMap::new(),
        }
    }

    /// Add or replace a glyph, returning the previous mapping
    pub fn insert(&mut self, ch: char, glyph: Glyph) -> Option<Glyph> {
        self.glyphs.insert(ch, glyph)
    }

    /// Builder-style `insert`
    pub fn with(mut self, ch: char, glyph: Glyph) -> Self {
        self.insert(ch, glyph);
        self
    }

    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }
}

/// An actor waiting to be realized when a level starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorSpawn {
    pub kind: ActorKind,
    /// Top-left corner of the spawn cell
    pub pos: Vector,
    /// Plan character the spawn came from
    pub glyph: char,
}

/// Errors raised while parsing a level plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level plan is empty")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },

    #[error("level has no player spawn")]
    MissingPlayer,

    #[error("level has {count} player spawns, expected exactly one")]
    MultiplePlayers { count: usize },

    #[error("level grid is {width}x{height} but holds {cells} cells")]
    CellCount {
        width: usize,
        height: usize,
        cells: usize,
    },
}

/// Serialized form of a `Level`, checked before it becomes one
#[derive(Deserialize)]
struct LevelSnapshot {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
    player_spawn: Vector,
    spawns: Vec<ActorSpawn>,
}

impl TryFrom<LevelSnapshot> for Level {
    type Error = LevelError;

    fn try_from(snapshot: LevelSnapshot) -> Result<Self, Self::Error> {
        if snapshot.width == 0 || snapshot.height == 0 {
            return Err(LevelError::Empty);
        }
        if snapshot.cells.len() != snapshot.width * snapshot.height {
            return Err(LevelError::CellCount {
                width: snapshot.width,
                height: snapshot.height,
                cells: snapshot.cells.len(),
            });
        }
        let extra = snapshot
            .spawns
            .iter()
            .filter(|s| s.kind == ActorKind::Player)
            .count();
        if extra > 0 {
            return Err(LevelError::MultiplePlayers { count: extra + 1 });
        }
        Ok(Self {
            width: snapshot.width,
            height: snapshot.height,
            cells: snapshot.cells,
            player_spawn: snapshot.player_spawn,
            spawns: snapshot.spawns,
        })
    }
}

/// Parsed level: static grid + initial actor roster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LevelSnapshot")]
pub struct Level {
    width: usize,
    height: usize,
    /// Row-major cells
    cells: Vec<CellKind>,
    /// Spawn cell of the single player
    player_spawn: Vector,
    /// Non-player spawns in plan order (row by row, left to right)
    spawns: Vec<ActorSpawn>,
}

impl Level {
    /// Parse a plan with the default legend
    pub fn parse(plan: &str) -> Result<Self, LevelError> {
        Self::parse_with(plan, &Legend::default())
    }

    /// Parse a plan, one row per line.
    ///
    /// Surrounding blank lines and per-line indentation are ignored so plans
    /// can be written as indented string literals.
    pub fn parse_with(plan: &str, legend: &Legend) -> Result<Self, LevelError> {
        let rows: Vec<&str> = plan.trim().lines().map(str::trim).collect();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(LevelError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut players = Vec::new();
        let mut spawns = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(LevelError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, glyph) in row.chars().enumerate() {
                let entry = legend
                    .get(glyph)
                    .ok_or(LevelError::UnknownGlyph { glyph, x, y })?;
                cells.push(entry.cell);

                let pos = Vector::new(x as f32, y as f32);
                match entry.spawn {
                    Some(ActorKind::Player) => players.push(pos),
                    Some(kind) => spawns.push(ActorSpawn { kind, pos, glyph }),
                    None => {}
                }
            }
        }

        let player_spawn = match players.as_slice() {
            [] => return Err(LevelError::MissingPlayer),
            [pos] => *pos,
            _ => {
                return Err(LevelError::MultiplePlayers {
                    count: players.len(),
                });
            }
        };

        log::info!(
            "Parsed level {}x{} with {} actors",
            width,
            rows.len(),
            spawns.len() + 1
        );

        Ok(Self {
            width,
            height: rows.len(),
            cells,
            player_spawn,
            spawns,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn player_spawn(&self) -> Vector {
        self.player_spawn
    }

    pub fn spawns(&self) -> &[ActorSpawn] {
        &self.spawns
    }

    /// Cell at integer coordinates. Everything outside the grid is wall.
    pub fn cell(&self, x: i32, y: i32) -> CellKind {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return CellKind::Wall;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    /// Rows of cells, top to bottom (for renderers)
    pub fn rows(&self) -> impl Iterator<Item = &[CellKind]> {
        self.cells.chunks(self.width)
    }

    /// Does the box at `pos` with `size` cover any cell of `kind`?
    ///
    /// Every cell the box overlaps, even partially, counts. The covered range
    /// is `[floor(x), ceil(x + w))` by `[floor(y), ceil(y + h))`.
    pub fn touches(&self, pos: Vector, size: Vector, kind: CellKind) -> bool {
        let x_start = pos.x.floor() as i32;
        let x_end = (pos.x + size.x).ceil() as i32;
        let y_start = pos.y.floor() as i32;
        let y_end = (pos.y + size.y).ceil() as i32;

        (y_start..y_end).any(|y| (x_start..x_end).any(|x| self.cell(x, y) == kind))
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(plan: &str) -> Result<Self, Self::Err> {
        Self::parse(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PLAN: &str = "
        ......
        .#..o.
        .#@.+.
        .####.
    ";

    #[test]
    fn test_parse_dimensions_and_spawns() {
        let level = Level::parse(PLAN).unwrap();
        assert_eq!(level.width(), 6);
        assert_eq!(level.height(), 4);
        assert_eq!(level.player_spawn(), Vector::new(2.0, 2.0));

        let spawns = level.spawns();
        assert_eq!(spawns.len(), 2);
        assert_eq!(spawns[0].kind, ActorKind::Cookie);
        assert_eq!(spawns[0].pos, Vector::new(4.0, 1.0));
        assert_eq!(spawns[1].kind, ActorKind::Lightning(Bounce::Still));
        assert_eq!(spawns[1].glyph, '+');
    }

    #[test]
    fn test_actor_cells_are_empty_except_stationary_lightning() {
        let level = Level::parse(PLAN).unwrap();
        assert_eq!(level.cell(2, 2), CellKind::Empty); // player
        assert_eq!(level.cell(4, 1), CellKind::Empty); // cookie
        assert_eq!(level.cell(4, 2), CellKind::Hazard);
        assert_eq!(level.cell(1, 1), CellKind::Wall);
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let level = Level::parse(PLAN).unwrap();
        assert_eq!(level.cell(-1, 0), CellKind::Wall);
        assert_eq!(level.cell(0, -1), CellKind::Wall);
        assert_eq!(level.cell(6, 0), CellKind::Wall);
        assert_eq!(level.cell(0, 4), CellKind::Wall);
        assert!(level.touches(Vector::new(-0.5, 0.0), Vector::new(1.0, 1.0), CellKind::Wall));
    }

    #[test]
    fn test_touches_partial_overlap() {
        let level = Level::parse(PLAN).unwrap();
        // Box straddling the empty cell (2,1) and the wall at (1,1)
        assert!(level.touches(Vector::new(1.9, 1.0), Vector::new(0.5, 0.5), CellKind::Wall));
        // Box flush against the wall's right edge does not cover it
        assert!(!level.touches(Vector::new(2.0, 1.0), Vector::new(0.8, 1.0), CellKind::Wall));
        // Player standing exactly on the floor row does not touch it
        assert!(!level.touches(Vector::new(2.0, 2.0), Vector::new(0.8, 1.0), CellKind::Wall));
        assert!(level.touches(Vector::new(2.0, 2.1), Vector::new(0.8, 1.0), CellKind::Wall));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Level::parse("   \n  ").unwrap_err(), LevelError::Empty);
        assert_eq!(
            Level::parse("@..\n..").unwrap_err(),
            LevelError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            Level::parse("@.?").unwrap_err(),
            LevelError::UnknownGlyph {
                glyph: '?',
                x: 2,
                y: 0
            }
        );
        assert_eq!(Level::parse("...").unwrap_err(), LevelError::MissingPlayer);
        assert_eq!(
            Level::parse("@.@").unwrap_err(),
            LevelError::MultiplePlayers { count: 2 }
        );
    }

    #[test]
    fn test_custom_legend_glyph() {
        let legend = Legend::default().with('~', Glyph::cell(CellKind::Hazard));
        let level = Level::parse_with("@~", &legend).unwrap();
        assert_eq!(level.cell(1, 0), CellKind::Hazard);
        assert!(Level::parse("@~").is_err());
    }

    #[test]
    fn test_from_str() {
        let level: Level = "@.o\n...".parse().unwrap();
        assert_eq!(level.width(), 3);
        assert_eq!(level.rows().count(), 2);
    }

    #[test]
    fn test_deserialize_checks_grid() {
        let level = Level::parse(PLAN).unwrap();
        let json = serde_json::to_string(&level).unwrap();
        let back: Level = serde_json::from_str(&json).unwrap();
        assert_eq!(back.width(), level.width());
        assert_eq!(back.rows().count(), level.height());
        assert_eq!(back.spawns(), level.spawns());

        let short = r#"{"width":3,"height":2,"cells":["wall"],"player_spawn":[0.0,0.0],"spawns":[]}"#;
        assert!(serde_json::from_str::<Level>(short).is_err());

        let flat = r#"{"width":0,"height":0,"cells":[],"player_spawn":[0.0,0.0],"spawns":[]}"#;
        assert!(serde_json::from_str::<Level>(flat).is_err());
    }

    fn grid_plan() -> &'static str {
        "
        #..!....
        .#...!..
        ..@.##..
        !...#...
        .######!
        "
    }

    fn kind_strategy() -> impl Strategy<Value = CellKind> {
        prop_oneof![
            Just(CellKind::Empty),
            Just(CellKind::Wall),
            Just(CellKind::Hazard)
        ]
    }

    proptest! {
        #[test]
        fn prop_touches_matches_cell_scan(
            fx in 0.0f32..1.0,
            fy in 0.0f32..1.0,
            w in 0.05f32..3.0,
            h in 0.05f32..3.0,
            kind in kind_strategy(),
        ) {
            let level = Level::parse(grid_plan()).unwrap();
            // Keep the box fully inside the 8x5 grid
            let pos = Vector::new(fx * (7.99 - w), fy * (4.99 - h));
            let size = Vector::new(w, h);

            let expected = (0..5).any(|cy| {
                (0..8).any(|cx| {
                    let (cx_f, cy_f) = (cx as f32, cy as f32);
                    cx_f + 1.0 > pos.x
                        && cx_f < pos.x + size.x
                        && cy_f + 1.0 > pos.y
                        && cy_f < pos.y + size.y
                        && level.cell(cx, cy) == kind
                })
            });
            prop_assert_eq!(level.touches(pos, size, kind), expected);
        }

        #[test]
        fn prop_boxes_outside_grid_touch_wall(
            x in -4.0f32..-0.01,
            y in 0.0f32..4.0,
            w in 0.05f32..2.0,
            h in 0.05f32..1.0,
        ) {
            let level = Level::parse(grid_plan()).unwrap();
            prop_assert!(level.touches(Vector::new(x, y), Vector::new(w, h), CellKind::Wall));
        }
    }
}
