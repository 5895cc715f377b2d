use maze_gen::{
    new_generator, steps, Coord, Direction, Generator, GeneratorKind, MazeError, SeededRandom,
    StepEvent, WalkPolicy, WallGrid, WilsonGenerator, MAX_DIMENSION,
};
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = GeneratorKind> {
    prop_oneof![
        Just(GeneratorKind::Dfs),
        Just(GeneratorKind::Wilson),
        Just(GeneratorKind::Sidewinder),
        Just(GeneratorKind::Division),
    ]
}

fn wall_layout(grid: &WallGrid) -> Vec<bool> {
    grid.coords()
        .flat_map(|coord| Direction::ALL.iter().map(move |dir| grid.has_wall(coord, *dir)))
        .collect()
}

#[test]
fn out_of_range_dimensions_are_rejected_not_clamped() {
    assert!(matches!(
        WallGrid::new(MAX_DIMENSION + 1, 4),
        Err(MazeError::InvalidDimension { width: 51, height: 4, .. })
    ));
    assert!(matches!(
        WallGrid::new(3, 1),
        Err(MazeError::InvalidDimension { .. })
    ));
}

#[test]
fn largest_grid_is_still_a_perfect_maze() {
    for kind in GeneratorKind::ALL.iter().copied() {
        let grid = WallGrid::new(MAX_DIMENSION, MAX_DIMENSION).unwrap();
        let maze = new_generator(kind, grid, 17).run_to_completion();
        assert!(maze.is_perfect_maze(), "{}", kind);
    }
}

#[test]
fn same_seed_gives_the_same_event_stream() {
    for kind in GeneratorKind::ALL.iter().copied() {
        let mut left = new_generator(kind, WallGrid::new(7, 5).unwrap(), 123);
        let mut right = new_generator(kind, WallGrid::new(7, 5).unwrap(), 123);
        let left: Vec<StepEvent> = steps(left.as_mut()).collect();
        let right: Vec<StepEvent> = steps(right.as_mut()).collect();
        assert_eq!(left, right, "{}", kind);
    }
}

#[test]
fn carved_walls_match_removal_events() {
    for kind in [GeneratorKind::Dfs, GeneratorKind::Wilson, GeneratorKind::Sidewinder]
        .iter()
        .copied()
    {
        let mut generator = new_generator(kind, WallGrid::new(5, 5).unwrap(), 8);
        let removed = steps(generator.as_mut())
            .filter(|event| matches!(event, StepEvent::WallRemoved { .. }))
            .count();
        assert_eq!(removed, 24, "{}", kind);
    }
}

#[test]
fn removal_events_point_at_neighbours() {
    let mut generator = new_generator(GeneratorKind::Wilson, WallGrid::new(6, 6).unwrap(), 3);
    while let Some(event) = generator.next_step() {
        if let StepEvent::WallRemoved {
            from,
            to,
            direction,
        } = event
        {
            assert_eq!(from.direction_to(to), Some(direction));
            assert!(!generator.grid().has_wall(from, direction));
            assert!(!generator.grid().has_wall(to, -direction));
        }
    }
}

#[test]
fn abandoned_run_leaves_a_valid_partial_grid() {
    for kind in GeneratorKind::ALL.iter().copied() {
        let mut generator = new_generator(kind, WallGrid::new(9, 9).unwrap(), 55);
        for _ in 0..20 {
            generator.next_step();
        }
        assert!(!generator.is_done());
        let mut grid = generator.into_grid();
        assert!(grid.walls_are_symmetric());
        grid.reset();
        assert_eq!(grid.passage_count(), 0);
        assert!(grid.coords().all(|c: Coord| !grid.is_visited(c)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_size_and_seed_is_a_spanning_tree(
        kind in kind_strategy(),
        width in 2usize..=20,
        height in 2usize..=20,
        seed in any::<u64>(),
    ) {
        let grid = WallGrid::new(width, height).unwrap();
        let maze = new_generator(kind, grid, seed).run_to_completion();
        prop_assert!(maze.is_perfect_maze());
        prop_assert_eq!(maze.passage_count(), width * height - 1);
    }

    #[test]
    fn stepping_and_instant_agree(
        kind in kind_strategy(),
        width in 2usize..=12,
        height in 2usize..=12,
        seed in any::<u64>(),
    ) {
        let instant = new_generator(kind, WallGrid::new(width, height).unwrap(), seed)
            .run_to_completion();

        let mut stepped = new_generator(kind, WallGrid::new(width, height).unwrap(), seed);
        while stepped.next_step().is_some() {
            // a driver would render here
            let _ = stepped.grid().passage_count();
        }
        prop_assert_eq!(wall_layout(&instant), wall_layout(stepped.grid()));
    }

    #[test]
    fn avoid_path_walks_terminate(
        width in 2usize..=10,
        height in 2usize..=10,
        seed in any::<u64>(),
    ) {
        let grid = WallGrid::new(width, height).unwrap();
        let mut generator =
            WilsonGenerator::with_policy(grid, SeededRandom::from_seed(seed), WalkPolicy::AvoidPath);
        let count = steps(&mut generator).count();
        prop_assert!(count >= width * height);
        prop_assert!(generator.grid().is_perfect_maze());
    }
}
