//! tripmate: a conversational trip planner.
//!
//! A chat model decides which travel back-end to consult (Amadeus flights
//! and hotels, OpenWeatherMap forecasts, DuckDuckGo recommendations); the
//! executor in [`generation`] runs those tool calls and feeds the formatted
//! results back until the model answers.
//!
//! # Quick Start
//!
//! ```no_run
//! use tripmate::prelude::*;
//!
//! # async fn example() -> tripmate::error::Result<()> {
//! let config = TripConfig::from_env();
//! let mut session = TravelSession::new(TravelAgent::new(&config)?);
//! let reply = session.send("Find me a hotel in Rome from 2025-05-03 to 2025-05-07").await;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod generation;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod travel;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::TripError;
