//! Built-in level plans
//!
//! Legend (see `sim::Legend`):
//! - `#` wall, `.` empty, `!` electrified cell
//! - `@` player start, `o` cookie, `x` win spot
//! - `+` stationary lightning, `=` horizontal and `|` vertical bouncing lightning
//! - `m` monster, `<` / `>` clouds drifting left / right

/// Walled pit over a lightning floor
pub const PIT: &str = "
    ......................
    ..#................#..
    ..#.............x=.#..
    ..#.........o.o....#..
    ..#.@......#####...#..
    ..#####............#..
    ......#++++++++++++#..
    ......##############..
    ......................
";

/// Cloud ferry across an electrified gap, guarded by a monster
pub const FERRY: &str = "
    ........................
    .#....................#.
    .#.................x..#.
    .#..o.......o.........#.
    .#@....m......>.......#.
    .########.......#######.
    .########!!!!!!!#######.
    .######################.
    ........................
";

/// Corridor of vertical lightning columns
pub const STORM: &str = "
    ....................
    .#................#.
    .#.....|.....|....#.
    .#.............x..#.
    .#@...o.....o.....#.
    .##################.
    ....................
";

/// Plans in play order
pub const PLANS: &[&str] = &[PIT, FERRY, STORM];
