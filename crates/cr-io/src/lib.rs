//! `cr-io`: file formats around the grid-city crime simulation.
//!
//! | Module       | Direction | Format                                        |
//! |--------------|-----------|-----------------------------------------------|
//! | [`map`]      | in / out  | `.map` grid files (cell-kind indices)         |
//! | [`params`]   | in        | TOML run parameters → [`RunParameters`]       |
//! | [`heatmap`]  | out / in  | `heatmap_<rounds>.csv` crime-count matrices   |
//! | [`observer`] | out       | [`HeatMapObserver`] driving the CSV dumps     |
//!
//! # Usage
//!
//! ```rust,ignore
//! use cr_io::{HeatMapObserver, HeatMapWriter, load_map, load_params};
//!
//! let params = load_params(Path::new("run.toml"))?;
//! let grid = load_map(&params.map)?;
//! let mut sim = SimBuilder::new(params.sim.clone(), grid).build()?;
//! let mut obs = HeatMapObserver::new(HeatMapWriter::new(Path::new("out"))?, 1000);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod error;
pub mod heatmap;
pub mod map;
pub mod observer;
pub mod params;


pub use error::{IoError, IoResult};
pub use heatmap::{HeatMap, HeatMapWriter};
pub use map::{load_map, parse_map, save_map, write_map};
pub use observer::HeatMapObserver;
pub use params::{RunParameters, load_params};
