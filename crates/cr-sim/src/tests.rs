//! Integration tests for cr-sim.

use cr_agent::Traits;
use cr_core::{Point, Round, SimConfig};
use cr_grid::{CellKind, Grid};

use crate::{CrimeEvent, RoundSummary, SimBuilder, SimObserver, Simulation};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(population: usize) -> SimConfig {
    SimConfig { population, rounds: 10, seed: 42, ..SimConfig::default() }
}

/// 10×10 with a block of houses, a tree and two lamps.
fn town() -> Grid {
    Grid::from_fn(10, 10, |p| match (p.x, p.y) {
        (3..=5, 3..=5) => CellKind::House,
        (8, 1)         => CellKind::Tree,
        (1, 1) | (7, 8) => CellKind::Lamp,
        _              => CellKind::Path,
    })
    .unwrap()
}

fn traits(age: f64, apparent_wealth: f64) -> Traits {
    Traits { age, education: age, income: age, apparent_wealth, vision_range: 4.0 }
}

/// Every agent stands on a cell that names it, and no other cell is occupied.
fn assert_occupancy_consistent<P: cr_path::PathFinder>(sim: &Simulation<P>) {
    let grid = sim.grid();
    for agent in sim.agents().iter() {
        assert_eq!(grid.occupant(agent.position()), Some(agent.id()));
        assert!(agent.is_active());
    }
    let occupied = grid.cells().filter(|c| c.occupant().is_some()).count();
    assert_eq!(occupied, sim.population());
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use cr_agent::AgentError;
    use cr_core::CoreError;
    use cr_grid::GridError;
    use cr_path::SyncPathFinder;

    use super::*;
    use crate::SimError;

    #[test]
    fn builds_and_populates() {
        let sim = SimBuilder::new(test_config(20), town()).build().unwrap();
        assert_eq!(sim.population(), 20);
        assert_eq!(sim.turn_order().count(), 20);
        assert_eq!(sim.round(), Round::ZERO);
        assert_eq!(sim.max_crime(), 0);
        assert!(!sim.pathfinder().is_concurrent());
        assert_occupancy_consistent(&sim);
    }

    #[test]
    fn overpopulation_errors() {
        let grid = Grid::new(2, 2, vec![CellKind::Path, CellKind::Path, CellKind::Path, CellKind::Shop]).unwrap();
        let result = SimBuilder::new(test_config(4), grid).build();
        assert!(matches!(result, Err(SimError::Overpopulated { population: 4, free_cells: 3 })));
    }

    #[test]
    fn invalid_config_errors() {
        let mut config = test_config(5);
        config.decision.light_weight = 0;
        config.decision.light_random_weight = 0;
        let result = SimBuilder::new(config, town()).build();
        assert!(matches!(result, Err(SimError::Config(CoreError::Config(_)))));

        let config = SimConfig { parallel: true, threads: 0, ..test_config(5) };
        assert!(SimBuilder::new(config, town()).build().is_err());
    }

    #[test]
    fn lighting_runs_unless_prelit() {
        let sim = SimBuilder::new(test_config(0), town()).build().unwrap();
        assert!((sim.grid().light(Point::new(1, 1)) - 1.0).abs() < 1e-12);
        assert!(sim.grid().light(Point::new(2, 1)) > 0.0);

        let sim = SimBuilder::new(test_config(0), town()).prelit().build().unwrap();
        assert_eq!(sim.grid().light(Point::new(1, 1)), 0.0);
    }

    #[test]
    fn custom_pathfinder() {
        let mut sim = SimBuilder::new(test_config(5), town())
            .build_with(|mask| Ok(SyncPathFinder::new(mask)))
            .unwrap();
        sim.run_round().unwrap();
        assert_eq!(sim.population(), 5);
    }

    #[test]
    fn parallel_config_builds_worker_pool() {
        let config = SimConfig { parallel: true, threads: 2, ..test_config(5) };
        let mut sim = SimBuilder::new(config, town()).build().unwrap();
        assert!(sim.pathfinder().is_concurrent());
        sim.shutdown();
    }

    #[test]
    fn spawn_on_occupied_cell_errors() {
        let mut sim = SimBuilder::new(test_config(0), town()).build().unwrap();
        let id = sim.spawn_agent_at(traits(0.5, 0.5), Point::new(0, 0)).unwrap();
        assert_eq!(sim.turn_order().next(), Some(id));

        let err = sim.spawn_agent_at(traits(0.5, 0.5), Point::new(0, 0)).unwrap_err();
        assert!(matches!(err, SimError::Agent(AgentError::Grid(GridError::CellNotFree(_)))));
        let err = sim.spawn_agent_at(traits(0.5, 0.5), Point::new(4, 4)).unwrap_err();
        assert!(matches!(err, SimError::Agent(AgentError::Grid(GridError::CellNotFree(_)))));
    }
}

// ── Round loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn population_is_held_constant() {
        let mut sim = SimBuilder::new(test_config(20), town()).build().unwrap();
        for _ in 0..50 {
            let summary = sim.run_round().unwrap();
            assert_eq!(summary.population, 20);
            assert_eq!(sim.population(), 20);
            assert_eq!(summary.spawned, summary.removed);
            assert_occupancy_consistent(&sim);
        }
        assert_eq!(sim.round(), Round(50));
    }

    #[test]
    fn one_round_without_removals_keeps_the_roster() {
        let mut sim = SimBuilder::new(test_config(8), Grid::open(12, 12).unwrap()).build().unwrap();
        let before = sim.agents().ids();
        let summary = sim.run_round().unwrap();
        // Thinking agents only wait on their first round.
        assert_eq!(summary.removed, 0);
        assert_eq!(summary.acted, 8);
        assert_eq!(sim.agents().ids(), before);
    }

    #[test]
    fn robbery_counts_on_the_victims_cell() {
        let grid = Grid::open(2, 1).unwrap();
        let mut sim = SimBuilder::new(test_config(0), grid).build().unwrap();
        // Zero propensity against 0.9 wealth: always robs.  The victim has
        // nothing worth taking in return.
        let robber = sim.spawn_agent_at(traits(0.0, 0.0), Point::new(0, 0)).unwrap();
        let victim = sim.spawn_agent_at(traits(1.0, 0.9), Point::new(1, 0)).unwrap();

        let mut crimes = 0;
        for _ in 0..10 {
            crimes += sim.run_round().unwrap().crimes;
            if crimes > 0 {
                break;
            }
        }

        assert_eq!(crimes, 1);
        assert_eq!(sim.total_crimes(), 1);
        assert_eq!(sim.grid().cell(Point::new(1, 0)).unwrap().crime_count(), 1);
        assert_eq!(sim.grid().cell(Point::new(0, 0)).unwrap().crime_count(), 0);
        assert_eq!(sim.max_crime(), 1);
        assert!(sim.agent(robber).is_none());
        assert!(sim.agent(victim).is_none());
        assert!(sim.grid().is_free(Point::new(0, 0)));
        assert!(sim.grid().is_free(Point::new(1, 0)));
    }

    #[test]
    fn round_timeout_retires_agents() {
        let config = SimConfig { round_timeout: 2, ..test_config(5) };
        let mut sim = SimBuilder::new(config, town()).build().unwrap();
        let first_generation = sim.agents().ids();

        let mut removed = 0;
        for _ in 0..3 {
            removed += sim.run_round().unwrap().removed;
        }

        assert!(removed >= 5);
        assert_eq!(sim.population(), 5);
        for id in first_generation {
            assert!(sim.agent(id).is_none());
        }
        assert_occupancy_consistent(&sim);
    }

    #[test]
    fn same_seed_same_run() {
        let snapshot = |sim: &Simulation| {
            let agents: Vec<_> = sim
                .agents()
                .ids()
                .into_iter()
                .filter_map(|id| sim.agent(id))
                .map(|a| (a.id(), a.position(), a.state()))
                .collect();
            let crimes: Vec<u32> = sim.grid().cells().map(|c| c.crime_count()).collect();
            (agents, crimes, sim.max_crime(), sim.turn_order().collect::<Vec<_>>())
        };

        let mut a = SimBuilder::new(test_config(25), town()).build().unwrap();
        let mut b = SimBuilder::new(test_config(25), town()).build().unwrap();
        for _ in 0..60 {
            assert_eq!(a.run_round().unwrap(), b.run_round().unwrap());
        }
        assert_eq!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn concurrent_strategy_keeps_running() {
        let config = SimConfig { parallel: true, threads: 2, ..test_config(10) };
        let mut sim = SimBuilder::new(config, town()).build().unwrap();
        for _ in 0..20 {
            sim.run_round().unwrap();
            assert_eq!(sim.population(), 10);
        }
        sim.shutdown();
        // Routes never arrive after shutdown, but rounds still run.
        sim.run_round().unwrap();
        assert_occupancy_consistent(&sim);
    }

    #[test]
    fn job_table_stays_bounded_by_population() {
        let config = SimConfig { parallel: true, threads: 2, ..test_config(40) };
        let grid = Grid::open(30, 30).unwrap();
        let mut sim = SimBuilder::new(config, grid).build().unwrap();
        for _ in 0..600 {
            sim.run_round().unwrap();
            let cr_path::AnyPathFinder::Concurrent(finder) = sim.pathfinder() else {
                panic!("expected the concurrent strategy");
            };
            assert!(
                finder.pending_jobs() <= sim.population(),
                "{} jobs pending for {} agents at {}",
                finder.pending_jobs(),
                sim.population(),
                sim.round()
            );
        }
        sim.shutdown();
    }
}

// ── Observer hooks ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        starts:        Vec<Round>,
        ends:          usize,
        crime_events:  Vec<CrimeEvent>,
        summed_crimes: usize,
        finished:      Option<Round>,
    }

    impl SimObserver for Counter {
        fn on_round_start(&mut self, round: Round) {
            self.starts.push(round);
        }

        fn on_crime(&mut self, event: &CrimeEvent) {
            self.crime_events.push(*event);
        }

        fn on_round_end(&mut self, summary: &RoundSummary, grid: &Grid) {
            self.ends += 1;
            self.summed_crimes += summary.crimes;
            assert!(grid.max_crime_count() <= summary.max_crime);
        }

        fn on_sim_end(&mut self, rounds: Round, _grid: &Grid) {
            self.finished = Some(rounds);
        }
    }

    #[test]
    fn hooks_fire_in_order() {
        let config = SimConfig { rounds: 7, ..test_config(15) };
        let mut sim = SimBuilder::new(config, town()).build().unwrap();
        let mut counter = Counter::default();
        sim.run(&mut counter).unwrap();

        assert_eq!(counter.starts, (0..7).map(Round).collect::<Vec<_>>());
        assert_eq!(counter.ends, 7);
        assert_eq!(counter.finished, Some(Round(7)));
        assert_eq!(counter.crime_events.len(), counter.summed_crimes);
        assert_eq!(sim.round(), Round(7));
    }

    #[test]
    fn crime_event_describes_the_robbery() {
        let mut sim = SimBuilder::new(test_config(0), Grid::open(2, 1).unwrap()).build().unwrap();
        let robber = sim.spawn_agent_at(traits(0.0, 0.0), Point::new(0, 0)).unwrap();
        let victim = sim.spawn_agent_at(traits(1.0, 0.9), Point::new(1, 0)).unwrap();

        let mut counter = Counter::default();
        sim.run_rounds(10, &mut counter).unwrap();

        assert_eq!(counter.crime_events.len(), 1);
        let event = counter.crime_events[0];
        assert_eq!(event.robber, robber);
        assert_eq!(event.victim, victim);
        assert_eq!(event.position, Point::new(1, 0));
        assert_eq!(event.count, 1);
        assert_eq!(counter.finished, None);
    }
}
