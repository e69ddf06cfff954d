#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// True for the directions whose leading edge is at index 0.
    pub fn toward_zero(&self) -> bool {
        matches!(self, Direction::Up | Direction::Left)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

impl Coordinate {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

pub type TileId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub coordinates: Coordinate,
    pub power: u32,
}

impl Tile {
    pub fn new(id: TileId, coordinates: Coordinate, power: u32) -> Self {
        Self {
            id,
            coordinates,
            power,
        }
    }

    pub fn value(&self) -> u32 {
        2u32.pow(self.power)
    }
}

/// Records that `from_id` was consumed by `to_id` during a single turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Merger {
    pub from_id: TileId,
    pub to_id: TileId,
}
