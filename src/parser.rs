use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::data::{MapCell, Pos};
use crate::level::Level;
use crate::map::Grid;
use crate::state::State;
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErr {
    Pos(usize, usize),
    MultiplePlayers,
    NoPlayer,
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::Pos(r, c) => write!(f, "Invalid cell at pos: [{}, {}]", r, c),
            ParserErr::MultiplePlayers => write!(f, "More than one player"),
            ParserErr::NoPlayer => write!(f, "No player"),
        }
    }
}

impl Error for ParserErr {}

impl FromStr for Level {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parses (a subset of) the format described [here](http://www.sokobano.de/wiki/index.php?title=Level_format)
pub(crate) fn parse(level: &str) -> Result<Level, ParserErr> {
    // trim so we can specify levels using raw strings more easily
    let level = level.trim_matches('\n').trim_end();

    let mut grid = Vec::new();
    let mut boxes = Vec::new();
    let mut player_pos = None;

    for (r, line) in level.lines().enumerate() {
        let mut line_tiles = Vec::new();
        for (c, cur_char) in line.chars().enumerate() {
            let pos = Pos::new(r as i32, c as i32);

            let tile = match cur_char {
                '#' => MapCell::Wall,
                '@' => {
                    set_player(&mut player_pos, pos)?;
                    MapCell::Floor
                }
                '+' => {
                    set_player(&mut player_pos, pos)?;
                    MapCell::Goal
                }
                '$' => {
                    boxes.push(pos);
                    MapCell::Floor
                }
                '*' => {
                    boxes.push(pos);
                    MapCell::Goal
                }
                '.' => MapCell::Goal,
                ' ' | '-' | '_' => MapCell::Floor,
                _ => return Err(ParserErr::Pos(r, c)),
            };
            line_tiles.push(tile);
        }
        grid.push(line_tiles);
    }

    let player_pos = player_pos.ok_or(ParserErr::NoPlayer)?;
    Ok(Level::new(
        Grid::new(Vec2d::new(&grid)),
        State::new(player_pos, boxes),
    ))
}

/// Builds a level from two separate layers:
/// the static map (`#` wall, `.` goal, ` ` floor) and the items on it (`@` player, `$` box, ` ` nothing).
pub(crate) fn parse_layers(map_rows: &[&str], item_rows: &[&str]) -> Result<Level, ParserErr> {
    let mut grid = Vec::new();
    for (r, line) in map_rows.iter().enumerate() {
        let mut line_tiles = Vec::new();
        for (c, cur_char) in line.chars().enumerate() {
            line_tiles.push(match cur_char {
                '#' => MapCell::Wall,
                '.' => MapCell::Goal,
                ' ' => MapCell::Floor,
                _ => return Err(ParserErr::Pos(r, c)),
            });
        }
        grid.push(line_tiles);
    }

    let mut boxes = Vec::new();
    let mut player_pos = None;
    for (r, line) in item_rows.iter().enumerate() {
        for (c, cur_char) in line.chars().enumerate() {
            let pos = Pos::new(r as i32, c as i32);
            match cur_char {
                '@' => set_player(&mut player_pos, pos)?,
                '$' => boxes.push(pos),
                ' ' => {}
                _ => return Err(ParserErr::Pos(r, c)),
            }
        }
    }

    let player_pos = player_pos.ok_or(ParserErr::NoPlayer)?;
    Ok(Level::new(
        Grid::new(Vec2d::new(&grid)),
        State::new(player_pos, boxes),
    ))
}

fn set_player(player_pos: &mut Option<Pos>, pos: Pos) -> Result<(), ParserErr> {
    if player_pos.is_some() {
        return Err(ParserErr::MultiplePlayers);
    }
    *player_pos = Some(pos);
    Ok(())
}
