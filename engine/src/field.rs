use std::collections::HashSet;

use crate::session_rng::SessionRng;
use crate::types::{Coordinate, Tile};

/// The complete grid state: the set of all tiles and their coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub tiles: Vec<Tile>,
}

impl Field {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn tile_at(&self, coordinates: Coordinate) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.coordinates == coordinates)
    }

    pub fn ensure_valid(&self, grid_size: usize) -> Result<(), String> {
        if grid_size == 0 {
            return Err("Grid size must be at least 1".to_string());
        }

        let mut occupied = HashSet::new();
        let mut ids = HashSet::new();
        for tile in &self.tiles {
            if tile.coordinates.x >= grid_size || tile.coordinates.y >= grid_size {
                return Err(format!(
                    "Tile {} at ({}, {}) is outside the {}x{} grid",
                    tile.id, tile.coordinates.x, tile.coordinates.y, grid_size, grid_size
                ));
            }
            if !occupied.insert(tile.coordinates) {
                return Err(format!(
                    "Two tiles share coordinates ({}, {})",
                    tile.coordinates.x, tile.coordinates.y
                ));
            }
            if !ids.insert(tile.id) {
                return Err(format!("Duplicate tile id {}", tile.id));
            }
        }
        Ok(())
    }
}

/// Produces the opening field: two tiles with ids 1 and 2 at distinct random
/// coordinates, each worth 2 or 4.
pub fn generate_start_field(grid_size: usize, rng: &mut SessionRng) -> Result<Field, String> {
    if grid_size < 2 {
        return Err(format!(
            "Grid size must be at least 2 to place two starting tiles, got {}",
            grid_size
        ));
    }

    let first = random_coordinate(grid_size, rng);
    let mut second = random_coordinate(grid_size, rng);
    while second == first {
        second = random_coordinate(grid_size, rng);
    }

    let tiles = vec![
        Tile::new(1, first, rng.random_range(1..=2)),
        Tile::new(2, second, rng.random_range(1..=2)),
    ];
    Ok(Field::new(tiles))
}

/// Picks a spawn site uniformly among all unoccupied cells, or `None` when
/// the grid is full.
pub fn get_free_coordinates(
    field: &Field,
    grid_size: usize,
    rng: &mut SessionRng,
) -> Option<Coordinate> {
    let mut free = Vec::new();
    for y in 0..grid_size {
        for x in 0..grid_size {
            let coordinates = Coordinate::new(x, y);
            if field.tile_at(coordinates).is_none() {
                free.push(coordinates);
            }
        }
    }

    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}

fn random_coordinate(grid_size: usize, rng: &mut SessionRng) -> Coordinate {
    Coordinate::new(
        rng.random_range(0..grid_size),
        rng.random_range(0..grid_size),
    )
}
