//! Unit tests for cr-grid.
//!
//! Grids are drawn as ASCII rows: `.` path, `H` house, `S` shop, `T` tree,
//! `L` lamp.

#[cfg(test)]
mod helpers {
    use crate::{CellKind, Grid};

    pub fn grid_from(rows: &[&str]) -> Grid {
        let height = rows.len();
        let width = rows[0].len();
        let kinds = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|c| match c {
                'H' => CellKind::House,
                'S' => CellKind::Shop,
                'T' => CellKind::Tree,
                'L' => CellKind::Lamp,
                _ => CellKind::Path,
            })
            .collect();
        Grid::new(width, height, kinds).unwrap()
    }
}

// ── Construction & point queries ──────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use cr_core::Point;

    use crate::{CellKind, Grid, GridError};

    #[test]
    fn positions_are_row_major() {
        let g = Grid::open(3, 2).unwrap();
        let positions: Vec<Point> = g.cells().map(|c| c.position()).collect();
        assert_eq!(positions[0], Point::new(0, 0));
        assert_eq!(positions[2], Point::new(2, 0));
        assert_eq!(positions[3], Point::new(0, 1));
        assert_eq!(g.cell_count(), 6);
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(
            Grid::new(0, 3, vec![]),
            Err(GridError::InvalidDimensions { width: 0, height: 3 })
        ));
        assert!(matches!(
            Grid::new(2, 2, vec![CellKind::Path; 3]),
            Err(GridError::DimensionMismatch { expected: 4, got: 3 })
        ));
    }

    #[test]
    fn from_fn_asks_every_position() {
        let g = Grid::from_fn(4, 4, |p| if p.x == p.y { CellKind::Tree } else { CellKind::Path })
            .unwrap();
        assert!(g.is_movement_obstruction(Point::new(2, 2)));
        assert!(!g.is_movement_obstruction(Point::new(2, 1)));
    }
}

#[cfg(test)]
mod queries {
    use cr_core::{AgentId, Point};

    use super::helpers::grid_from;

    #[test]
    fn obstruction_table() {
        let g = grid_from(&[".HSTL"]);
        let at = |x| Point::new(x, 0);
        assert!(!g.is_movement_obstruction(at(0)));
        assert!(g.is_movement_obstruction(at(1)));
        assert!(g.is_movement_obstruction(at(2)));
        assert!(g.is_movement_obstruction(at(3)));
        assert!(!g.is_movement_obstruction(at(4)));

        assert!(!g.is_view_obstruction(at(0)));
        assert!(g.is_view_obstruction(at(1)));
        assert!(g.is_view_obstruction(at(2)));
        assert!(!g.is_view_obstruction(at(3)));
        assert!(!g.is_view_obstruction(at(4)));
    }

    #[test]
    fn out_of_bounds_defaults() {
        let g = grid_from(&["..", ".."]);
        let outside = [Point::new(-1, 0), Point::new(0, -1), Point::new(2, 0), Point::new(0, 2)];
        for p in outside {
            assert!(!g.within_bounds(p));
            assert!(g.is_movement_obstruction(p));
            assert!(g.is_view_obstruction(p));
            assert!(!g.is_occupied(p));
            assert!(!g.is_free(p));
            assert_eq!(g.light(p), 0.0);
            assert_eq!(g.occupant(p), None);
            assert!(g.cell(p).is_none());
        }
    }

    #[test]
    fn is_free_matches_definition() {
        let mut g = grid_from(&[".H.", "T.L", "..S"]);
        g.place_occupant(Point::new(1, 1), AgentId(0)).unwrap();
        g.place_occupant(Point::new(2, 1), AgentId(1)).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                let p = Point::new(x, y);
                let expected =
                    g.within_bounds(p) && !g.is_movement_obstruction(p) && !g.is_occupied(p);
                assert_eq!(g.is_free(p), expected, "at {p}");
            }
        }
    }
}

// ── Line of sight ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod line_of_sight {
    use cr_core::Point;
    use proptest::prelude::*;

    use super::helpers::grid_from;
    use crate::Grid;

    fn traced(g: &Grid, from: Point, to: Point) -> Vec<Point> {
        let mut out = Vec::new();
        g.trace_line(from, to, |c| {
            out.push(c.position());
            true
        });
        out
    }

    #[test]
    fn straight_line_visits_every_cell_from_source() {
        let g = Grid::open(5, 1).unwrap();
        let cells = traced(&g, Point::new(0, 0), Point::new(4, 0));
        assert_eq!(cells, (0..5).map(|x| Point::new(x, 0)).collect::<Vec<_>>());
    }

    #[test]
    fn diagonal_line_steps_diagonally() {
        let g = Grid::open(4, 4).unwrap();
        let cells = traced(&g, Point::new(3, 3), Point::new(0, 0));
        assert_eq!(cells, vec![Point::new(3, 3), Point::new(2, 2), Point::new(1, 1), Point::new(0, 0)]);
    }

    #[test]
    fn shallow_line_is_connected() {
        let g = Grid::open(10, 10).unwrap();
        let cells = traced(&g, Point::new(1, 2), Point::new(8, 5));
        assert_eq!(cells.len(), 8);
        assert_eq!(cells.first(), Some(&Point::new(1, 2)));
        assert_eq!(cells.last(), Some(&Point::new(8, 5)));
        for pair in cells.windows(2) {
            assert_eq!(pair[1].x - pair[0].x, 1);
            assert!((pair[1].y - pair[0].y).abs() <= 1);
        }
    }

    #[test]
    fn visitor_can_stop_early() {
        let g = Grid::open(6, 1).unwrap();
        let mut count = 0;
        g.trace_line(Point::new(0, 0), Point::new(5, 0), |c| {
            count += 1;
            c.x() < 2
        });
        assert_eq!(count, 3);
    }

    #[test]
    fn visited_cells_outlive_the_walk() {
        let g = grid_from(&["..H"]);
        let mut kept = Vec::new();
        g.trace_line(Point::new(0, 0), Point::new(2, 0), |c| {
            kept.push(c);
            true
        });
        assert_eq!(kept.len(), 3);
        assert!(kept[2].kind().obstructs_view());
        assert!(std::ptr::eq(kept[1], g.cell(Point::new(1, 0)).unwrap()));
    }

    #[test]
    fn out_of_bounds_endpoint_is_noop() {
        let g = Grid::open(3, 3).unwrap();
        assert!(traced(&g, Point::new(0, 0), Point::new(3, 0)).is_empty());
        assert!(traced(&g, Point::new(-1, 0), Point::new(2, 2)).is_empty());
    }

    #[test]
    fn look_stops_at_range() {
        let g = Grid::open(10, 1).unwrap();
        let seen = g.look(Point::new(0, 0), Point::new(9, 0), 3.0);
        let xs: Vec<i32> = seen.iter().map(|c| c.x()).collect();
        assert_eq!(xs, vec![0, 1, 2, 3]);
    }

    #[test]
    fn look_includes_blocking_cell() {
        let g = grid_from(&["..H..."]);
        let seen = g.look(Point::new(0, 0), Point::new(5, 0), 10.0);
        let xs: Vec<i32> = seen.iter().map(|c| c.x()).collect();
        assert_eq!(xs, vec![0, 1, 2]);
    }

    #[test]
    fn visibility() {
        let g = grid_from(&["..H..", ".....", "..T.."]);
        // Range.
        assert!(g.is_visible(Point::new(0, 1), Point::new(4, 1), 4.0));
        assert!(!g.is_visible(Point::new(0, 1), Point::new(4, 1), 3.9));
        // House blocks, tree does not.
        assert!(!g.is_visible(Point::new(0, 0), Point::new(4, 0), 10.0));
        assert!(g.is_visible(Point::new(0, 2), Point::new(4, 2), 10.0));
        // A blocking destination is still seen.
        assert!(g.is_visible(Point::new(0, 0), Point::new(2, 0), 10.0));
    }

    proptest! {
        #[test]
        fn trace_length_is_symmetric(
            ax in 0i32..16, ay in 0i32..16, bx in 0i32..16, by in 0i32..16,
        ) {
            let g = Grid::open(16, 16).unwrap();
            let (a, b) = (Point::new(ax, ay), Point::new(bx, by));
            let forward = traced(&g, a, b);
            let backward = traced(&g, b, a);
            prop_assert_eq!(forward.len(), backward.len());
            prop_assert_eq!(forward.first(), Some(&a));
            prop_assert_eq!(forward.last(), Some(&b));
        }

        #[test]
        fn look_is_deterministic(
            ax in 0i32..16, ay in 0i32..16, bx in 0i32..16, by in 0i32..16, range in 0.0f64..20.0,
        ) {
            let g = Grid::open(16, 16).unwrap();
            let (a, b) = (Point::new(ax, ay), Point::new(bx, by));
            let first: Vec<Point> = g.look(a, b, range).iter().map(|c| c.position()).collect();
            let second: Vec<Point> = g.look(a, b, range).iter().map(|c| c.position()).collect();
            prop_assert_eq!(&first, &second);
            for p in first {
                prop_assert!(a.distance_to(p) <= range);
            }
        }
    }
}

// ── Sampling & proximity ──────────────────────────────────────────────────────

#[cfg(test)]
mod sampling {
    use cr_core::{Point, SimRng};

    use super::helpers::grid_from;
    use crate::{CellKind, GridError};

    #[test]
    fn unsatisfiable_predicate_fails() {
        let g = grid_from(&["HHH", "HHH"]);
        let mut rng = SimRng::new(1);
        let err = g.random_cell(&mut rng, |c| !c.kind().obstructs_movement()).unwrap_err();
        assert!(matches!(err, GridError::NoSatisfyingCell { attempts: 384 }));
    }

    #[test]
    fn finds_the_only_match() {
        let g = grid_from(&["HHH", "H.H", "HHH"]);
        let mut rng = SimRng::new(7);
        let cell = g.random_cell(&mut rng, |c| c.kind() == CellKind::Path).unwrap();
        assert_eq!(cell.position(), Point::new(1, 1));
    }

    #[test]
    fn same_seed_same_cell() {
        let g = grid_from(&["....", "....", "...."]);
        let a = g.random_cell(&mut SimRng::new(42), |_| true).unwrap().position();
        let b = g.random_cell(&mut SimRng::new(42), |_| true).unwrap().position();
        assert_eq!(a, b);
    }
}

#[cfg(test)]
mod proximity {
    use cr_core::{AgentId, Point};

    use super::helpers::grid_from;
    use crate::Grid;

    fn populated() -> Grid {
        let mut g = Grid::open(11, 11).unwrap();
        g.place_occupant(Point::new(5, 5), AgentId(0)).unwrap();
        g.place_occupant(Point::new(8, 5), AgentId(1)).unwrap();
        g.place_occupant(Point::new(6, 5), AgentId(2)).unwrap();
        g.place_occupant(Point::new(5, 9), AgentId(3)).unwrap();
        g.place_occupant(Point::new(4, 4), AgentId(4)).unwrap();
        g
    }

    #[test]
    fn nearest_first_within_range() {
        let g = populated();
        let found = g.agents_around(Point::new(5, 5), 3.0, |_| true);
        assert_eq!(found, vec![AgentId(2), AgentId(4), AgentId(1)]);
    }

    #[test]
    fn center_is_excluded() {
        let g = populated();
        let found = g.agents_around(Point::new(5, 5), 10.0, |_| true);
        assert!(!found.contains(&AgentId(0)));
        assert!(found.contains(&AgentId(3)));
    }

    #[test]
    fn filter_applies() {
        let g = populated();
        let found = g.agents_around(Point::new(5, 5), 3.0, |id| id != AgentId(2));
        assert_eq!(found, vec![AgentId(4), AgentId(1)]);
    }

    #[test]
    fn walls_hide_agents() {
        let mut g = grid_from(&[".H.", "..."]);
        g.place_occupant(Point::new(2, 0), AgentId(9)).unwrap();
        assert!(g.agents_around(Point::new(0, 0), 5.0, |_| true).is_empty());
        assert_eq!(g.agents_around(Point::new(2, 1), 5.0, |_| true), vec![AgentId(9)]);
    }

    #[test]
    fn zero_range_finds_nothing() {
        let g = populated();
        assert!(g.agents_around(Point::new(5, 5), 0.0, |_| true).is_empty());
    }
}

// ── Mutation ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod mutation {
    use cr_core::{AgentId, Point};

    use super::helpers::grid_from;
    use crate::{CellKind, GridError};

    #[test]
    fn one_agent_per_cell() {
        let mut g = grid_from(&["..T"]);
        g.place_occupant(Point::new(0, 0), AgentId(0)).unwrap();
        assert!(matches!(
            g.place_occupant(Point::new(0, 0), AgentId(1)),
            Err(GridError::CellNotFree(_))
        ));
        assert!(matches!(
            g.place_occupant(Point::new(2, 0), AgentId(1)),
            Err(GridError::CellNotFree(_))
        ));
        assert!(matches!(
            g.place_occupant(Point::new(5, 0), AgentId(1)),
            Err(GridError::OutOfBounds(_))
        ));
    }

    #[test]
    fn move_and_clear() {
        let mut g = grid_from(&["..."]);
        g.place_occupant(Point::new(0, 0), AgentId(3)).unwrap();
        g.move_occupant(Point::new(0, 0), Point::new(1, 0)).unwrap();
        assert_eq!(g.occupant(Point::new(0, 0)), None);
        assert_eq!(g.occupant(Point::new(1, 0)), Some(AgentId(3)));
        assert_eq!(g.clear_occupant(Point::new(1, 0)), Some(AgentId(3)));
        assert!(g.is_free(Point::new(1, 0)));
    }

    #[test]
    fn crime_counts_accumulate() {
        let mut g = grid_from(&["..."]);
        assert_eq!(g.record_crime(Point::new(1, 0)), 1);
        assert_eq!(g.record_crime(Point::new(1, 0)), 2);
        assert_eq!(g.record_crime(Point::new(2, 0)), 1);
        assert_eq!(g.record_crime(Point::new(9, 9)), 0);
        assert_eq!(g.max_crime_count(), 2);
    }

    #[test]
    fn set_kind_swaps_mask() {
        let mut g = grid_from(&["..."]);
        let before = g.movement_mask();
        g.set_kind(Point::new(1, 0), CellKind::House).unwrap();
        assert!(!before.is_blocked(Point::new(1, 0)));
        assert!(g.movement_mask().is_blocked(Point::new(1, 0)));
        assert!(g.is_movement_obstruction(Point::new(1, 0)));
    }

    #[test]
    fn set_kind_refuses_to_bury_an_agent() {
        let mut g = grid_from(&["..."]);
        g.place_occupant(Point::new(0, 0), AgentId(0)).unwrap();
        assert!(g.set_kind(Point::new(0, 0), CellKind::Tree).is_err());
        assert!(g.set_kind(Point::new(0, 0), CellKind::Lamp).is_ok());
    }
}

// ── Lighting ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lighting {
    use cr_core::{LightingConfig, Point};

    use super::helpers::grid_from;
    use crate::{CellKind, Grid, Lighting};

    fn lamp_grid(lamp: Point) -> Grid {
        Grid::from_fn(20, 20, |p| if p == lamp { CellKind::Lamp } else { CellKind::Path }).unwrap()
    }

    #[test]
    fn falloff_hits_threshold_at_radius() {
        let cfg = LightingConfig::default();
        let l = Lighting::new(&cfg);
        assert!((l.light_at_distance(0.0) - 1.0).abs() < 1e-12);
        assert!(l.light_at_distance(14.9) >= cfg.threshold);
        assert_eq!(l.light_at_distance(15.5), 0.0);
    }

    #[test]
    fn default_radius_lights_whole_neighbourhood() {
        let lamp = Point::new(5, 5);
        let mut g = lamp_grid(lamp);
        assert_eq!(Lighting::new(&LightingConfig::default()).apply(&mut g), 1);
        for cell in g.cells() {
            let d = lamp.distance_to(cell.position());
            if d < 15.0 {
                assert!(cell.light() > 0.0, "{} should be lit", cell.position());
            } else if d > 15.0 {
                assert_eq!(cell.light(), 0.0);
            }
        }
        assert_eq!(g.light(lamp), 1.0);
    }

    #[test]
    fn small_radius_leaves_far_cells_dark() {
        let lamp = Point::new(5, 5);
        let mut g = lamp_grid(lamp);
        Lighting::new(&LightingConfig { radius: 2.0, threshold: 0.1 }).apply(&mut g);
        for cell in g.cells() {
            if lamp.distance_to(cell.position()) > 2.0 {
                assert_eq!(cell.light(), 0.0, "{} should be dark", cell.position());
            }
        }
        assert!(g.light(Point::new(6, 5)) > 0.0);
    }

    #[test]
    fn lamps_combine_by_maximum() {
        let mut g = grid_from(&["L...L"]);
        let l = Lighting::new(&LightingConfig::default());
        l.apply(&mut g);
        assert!((g.light(Point::new(2, 0)) - l.light_at_distance(2.0)).abs() < 1e-12);
        assert!((g.light(Point::new(1, 0)) - l.light_at_distance(1.0)).abs() < 1e-12);
        assert_eq!(g.light(Point::new(0, 0)), 1.0);
        assert_eq!(g.light(Point::new(4, 0)), 1.0);
    }

    #[test]
    fn houses_cast_shadows_and_trees_do_not() {
        let mut g = grid_from(&["L.H..", "LT..."]);
        Lighting::new(&LightingConfig::default()).apply(&mut g);
        // Row 0: the house is neither lit nor see-through.
        assert_eq!(g.light(Point::new(2, 0)), 0.0);
        assert_eq!(g.light(Point::new(3, 0)), 0.0);
        // Row 1: trees take no light but let it pass.
        assert_eq!(g.light(Point::new(1, 1)), 0.0);
        assert!(g.light(Point::new(2, 1)) > 0.0);
    }

    #[test]
    fn relight_after_edit() {
        let mut g = grid_from(&["L.H.."]);
        let l = Lighting::new(&LightingConfig::default());
        l.apply(&mut g);
        assert_eq!(g.light(Point::new(3, 0)), 0.0);

        g.set_kind(Point::new(2, 0), CellKind::Path).unwrap();
        l.relight(&mut g);
        assert!(g.light(Point::new(3, 0)) > 0.0);

        g.set_kind(Point::new(0, 0), CellKind::Path).unwrap();
        l.relight(&mut g);
        assert!(g.cells().all(|c| c.light() == 0.0));
    }
}
