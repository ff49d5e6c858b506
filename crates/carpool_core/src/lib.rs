//! Trip matching and route-detour evaluation for a campus carpool service.
//!
//! A rider describes a desired trip as a [`model::MatchRequest`]. The core
//! decides which published driver [`model::Trip`]s the rider may join
//! ([`validator`]), scores how well each one fits ([`matching`]), and checks
//! whether picking the rider up would stretch the driver's route too far
//! ([`detour`]). [`service::MatchService`] runs the whole pipeline against
//! trip and user stores.

pub mod clock;
pub mod config;
pub mod detour;
pub mod error;
pub mod geo;
pub mod matching;
pub mod model;
pub mod routing;
pub mod service;
pub mod store;
pub mod validator;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
