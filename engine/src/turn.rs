use crate::field::Field;
use crate::types::{Coordinate, Direction, Merger, Tile};

#[derive(Clone, Debug)]
pub struct TurnOutcome {
    pub new_field: Field,
    pub mergers: Vec<Merger>,
    pub changed: bool,
}

/// Slides and merges all tiles toward `direction`, one row or column at a
/// time. The returned field is fully resolved: merge sources are gone and
/// each surviving merged tile already carries its doubled value. The input
/// field is never mutated.
pub fn calculate_turn(
    grid_size: usize,
    field: &Field,
    direction: Direction,
) -> Result<TurnOutcome, String> {
    field.ensure_valid(grid_size)?;

    let mut new_tiles = Vec::with_capacity(field.tiles.len());
    let mut mergers = Vec::new();
    let mut changed = false;

    for line in 0..grid_size {
        let ordered = collect_line(field, grid_size, direction, line);
        let compacted = resolve_line(&ordered, &mut mergers);
        for (slot, mut tile) in compacted.into_iter().enumerate() {
            let target = slot_coordinates(grid_size, direction, line, slot);
            if tile.coordinates != target {
                changed = true;
            }
            tile.coordinates = target;
            new_tiles.push(tile);
        }
    }

    if !mergers.is_empty() {
        changed = true;
    }

    Ok(TurnOutcome {
        new_field: Field::new(new_tiles),
        mergers,
        changed,
    })
}

/// True iff no direction would change the field. The four-direction
/// simulation is the authoritative definition; the full-board adjacency
/// shortcut is checked against it in tests.
pub fn check_if_game_is_over(field: &Field, grid_size: usize) -> Result<bool, String> {
    for direction in Direction::ALL {
        if calculate_turn(grid_size, field, direction)?.changed {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Tiles of one row or column, ordered from the leading edge backward.
fn collect_line(field: &Field, grid_size: usize, direction: Direction, line: usize) -> Vec<Tile> {
    let mut tiles: Vec<Tile> = field
        .tiles
        .iter()
        .filter(|tile| {
            if direction.is_vertical() {
                tile.coordinates.x == line
            } else {
                tile.coordinates.y == line
            }
        })
        .copied()
        .collect();

    tiles.sort_by_key(|tile| {
        let along = if direction.is_vertical() {
            tile.coordinates.y
        } else {
            tile.coordinates.x
        };
        if direction.toward_zero() {
            along
        } else {
            grid_size - 1 - along
        }
    });
    tiles
}

/// Walks a line from the leading edge, compacting tiles into consecutive
/// slots. A tile merges with the entry ahead of it iff their powers match
/// and that entry did not itself just form from a merge; the sliding tile
/// survives with power + 1 and the entry ahead is consumed.
fn resolve_line(ordered: &[Tile], mergers: &mut Vec<Merger>) -> Vec<Tile> {
    let mut compacted: Vec<Tile> = Vec::with_capacity(ordered.len());
    let mut last_is_merge_product = false;

    for tile in ordered {
        let merge_target = if last_is_merge_product {
            None
        } else {
            compacted
                .last()
                .filter(|last| last.power == tile.power)
                .map(|last| last.id)
        };
        match merge_target {
            Some(target_id) => {
                mergers.push(Merger {
                    from_id: target_id,
                    to_id: tile.id,
                });
                let slot = compacted.len() - 1;
                compacted[slot] = Tile::new(tile.id, tile.coordinates, tile.power + 1);
                last_is_merge_product = true;
            }
            None => {
                compacted.push(*tile);
                last_is_merge_product = false;
            }
        }
    }
    compacted
}

fn slot_coordinates(grid_size: usize, direction: Direction, line: usize, slot: usize) -> Coordinate {
    let along = if direction.toward_zero() {
        slot
    } else {
        grid_size - 1 - slot
    };
    if direction.is_vertical() {
        Coordinate::new(line, along)
    } else {
        Coordinate::new(along, line)
    }
}
