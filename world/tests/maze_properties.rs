use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use maze_escape_core::{
    CellCoord, CellState, Command, Difficulty, Direction, Event, GameState, GridDimensions,
};
use maze_escape_world::{self as world, generate, query, Grid, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn reachable_from_start(grid: &Grid) -> HashSet<CellCoord> {
    let mut visited = HashSet::new();
    let mut frontier = VecDeque::new();

    let _ = visited.insert(grid.start());
    frontier.push_back(grid.start());

    while let Some(cell) = frontier.pop_front() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let Some(neighbor) = cell.step(direction) else {
                continue;
            };
            let Some(state) = grid.cell(neighbor) else {
                continue;
            };
            if state.is_walkable() && visited.insert(neighbor) {
                frontier.push_back(neighbor);
            }
        }
    }

    visited
}

fn walkable_cells(grid: &Grid) -> Vec<CellCoord> {
    grid.iter()
        .filter(|(_, state)| state.is_walkable())
        .map(|(cell, _)| cell)
        .collect()
}

/// Counts unordered pairs of adjacent walkable cells.
fn adjacent_walkable_pairs(grid: &Grid) -> usize {
    let mut pairs = 0;
    for (cell, state) in grid.iter() {
        if !state.is_walkable() {
            continue;
        }
        // Count each pair once by only looking right and down.
        for direction in [Direction::Right, Direction::Down] {
            if let Some(neighbor) = cell.step(direction) {
                if grid.cell(neighbor).is_some_and(CellState::is_walkable) {
                    pairs += 1;
                }
            }
        }
    }
    pairs
}

/// Shortest path from start to goal, exclusive of the start cell.
fn path_to_goal(grid: &Grid) -> Vec<CellCoord> {
    let mut previous: Vec<Option<CellCoord>> = vec![None; grid.dimensions().cell_count()];
    let columns = grid.columns() as usize;
    let index = |cell: CellCoord| cell.row() as usize * columns + cell.column() as usize;

    let mut visited = HashSet::new();
    let mut frontier = VecDeque::new();
    let _ = visited.insert(grid.start());
    frontier.push_back(grid.start());

    while let Some(cell) = frontier.pop_front() {
        if cell == grid.goal() {
            break;
        }
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let Some(neighbor) = cell.step(direction) else {
                continue;
            };
            let Some(state) = grid.cell(neighbor) else {
                continue;
            };
            if state.is_walkable() && visited.insert(neighbor) {
                previous[index(neighbor)] = Some(cell);
                frontier.push_back(neighbor);
            }
        }
    }

    let mut path = Vec::new();
    let mut cursor = grid.goal();
    while cursor != grid.start() {
        path.push(cursor);
        cursor = previous[index(cursor)].expect("goal must be reachable from start");
    }
    path.reverse();
    path
}

fn direction_between(from: CellCoord, to: CellCoord) -> Direction {
    if to.column() > from.column() {
        Direction::Right
    } else if to.column() < from.column() {
        Direction::Left
    } else if to.row() > from.row() {
        Direction::Down
    } else {
        Direction::Up
    }
}

#[test]
fn every_walkable_cell_is_reachable_from_start() {
    for (seed, side) in [(1_u64, 5_u32), (2, 7), (3, 11), (4, 21), (5, 31), (6, 41)] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = generate(GridDimensions::new(side, side), &mut rng);

        let reachable = reachable_from_start(&grid);
        let walkable = walkable_cells(&grid);

        assert_eq!(
            reachable.len(),
            walkable.len(),
            "unreachable cells in {side}x{side} maze with seed {seed}"
        );
        for cell in walkable {
            assert!(reachable.contains(&cell));
        }
    }
}

#[test]
fn generated_mazes_contain_exactly_one_start_and_goal() {
    for difficulty in Difficulty::ALL {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let grid = generate(difficulty.dimensions(), &mut rng);

        let starts = grid
            .iter()
            .filter(|(_, state)| *state == CellState::Start)
            .count();
        let goals = grid
            .iter()
            .filter(|(_, state)| *state == CellState::Goal)
            .count();

        assert_eq!(starts, 1);
        assert_eq!(goals, 1);
    }
}

#[test]
fn generated_mazes_are_perfect() {
    for (seed, side) in [(10_u64, 5_u32), (11, 11), (12, 21), (13, 41)] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = generate(GridDimensions::new(side, side), &mut rng);

        let walkable = walkable_cells(&grid).len();
        let pairs = adjacent_walkable_pairs(&grid);

        assert_eq!(
            pairs,
            walkable - 1,
            "{side}x{side} maze with seed {seed} is not a spanning tree"
        );
    }
}

#[test]
fn fixed_seed_reproduces_identical_grids() {
    let dimensions = GridDimensions::new(11, 11);

    let mut first_rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let mut second_rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let first = generate(dimensions, &mut first_rng);
    let second = generate(dimensions, &mut second_rng);

    assert_eq!(first, second);
}

#[test]
fn walking_the_solution_path_wins_exactly_once() {
    let mut world = World::new();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::NewGame {
            dimensions: GridDimensions::new(11, 11),
            seed: 2024,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(1500),
        },
        &mut events,
    );
    events.clear();

    let path = path_to_goal(query::grid(&world));
    let mut position = query::player(&world);
    let mut solved_events = Vec::new();

    for next in path {
        let direction = direction_between(position, next);
        let mut step_events = Vec::new();
        world::apply(
            &mut world,
            Command::Move { direction },
            &mut step_events,
        );

        assert!(step_events.contains(&Event::PlayerMoved {
            from: position,
            to: next
        }));
        solved_events.extend(
            step_events
                .into_iter()
                .filter(|event| matches!(event, Event::MazeSolved { .. })),
        );
        position = next;
    }

    assert_eq!(query::game_state(&world), GameState::Won);
    assert_eq!(
        solved_events,
        vec![Event::MazeSolved {
            elapsed: Duration::from_millis(1500)
        }]
    );

    // Post-win moves are no-ops and do not fire a second solve.
    let goal = query::player(&world);
    for direction in [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ] {
        let mut post_events = Vec::new();
        world::apply(&mut world, Command::Move { direction }, &mut post_events);
        assert!(post_events.is_empty());
    }
    assert_eq!(query::player(&world), goal);
    assert_eq!(query::game_state(&world), GameState::Won);
}

#[test]
fn player_never_occupies_a_wall_under_random_input() {
    let mut world = World::new();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::NewGame {
            dimensions: GridDimensions::new(21, 21),
            seed: 77,
        },
        &mut events,
    );

    // Pseudo-random walk; the exact sequence is irrelevant, the invariant is.
    let directions = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    for _ in 0..2_000 {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let direction = directions[(state >> 33) as usize % directions.len()];
        world::apply(&mut world, Command::Move { direction }, &mut events);

        let player = query::player(&world);
        let state_at_player = query::grid(&world)
            .cell(player)
            .expect("player must stay inside the grid");
        assert!(state_at_player.is_walkable());

        if query::game_state(&world) == GameState::Won {
            break;
        }
    }
}

#[test]
fn solve_freezes_the_clock() {
    let mut world = World::new();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::NewGame {
            dimensions: GridDimensions::new(5, 5),
            seed: 500,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(3),
        },
        &mut events,
    );

    let path = path_to_goal(query::grid(&world));
    let mut position = query::player(&world);
    for next in path {
        let direction = direction_between(position, next);
        world::apply(&mut world, Command::Move { direction }, &mut events);
        position = next;
    }
    assert_eq!(query::game_state(&world), GameState::Won);

    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(10),
        },
        &mut events,
    );

    assert_eq!(query::elapsed(&world), Duration::from_secs(3));
}
