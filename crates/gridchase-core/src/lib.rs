//! Turn engine, episode lifecycle, and run loop for the GridChase simulation.
//!
//! This crate drives the chase: every tick each agent in registry order is
//! shown an [`Observation`], a [`PolicyProvider`] picks an action, and the
//! [`TurnEngine`] validates and applies it. The [`EpisodeManager`] keeps
//! score and rolls the world back to its starting snapshot whenever a
//! pursuer catches a target.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `gridchase-config.yaml` into
//!   strongly-typed structs.
//! - [`decision`] -- [`PolicyProvider`] trait and the built-in policies.
//! - [`episode`] -- [`EpisodeManager`]: snapshot, scoring, and reset.
//! - [`perception`] -- Per-agent observation assembly from world state.
//! - [`render`] -- [`Renderer`] trait and a plain-text frame renderer.
//! - [`runner`] -- Bounded simulation loop.
//! - [`setup`] -- [`EpisodeSetup`]: builds a ready episode from config.
//! - [`tick`] -- One pass over every agent.
//! - [`turn`] -- Single-agent move validation and resolution.
//!
//! [`Observation`]: gridchase_types::Observation
//! [`PolicyProvider`]: decision::PolicyProvider
//! [`TurnEngine`]: turn::TurnEngine
//! [`EpisodeManager`]: episode::EpisodeManager
//! [`EpisodeSetup`]: setup::EpisodeSetup
//! [`Renderer`]: render::Renderer

pub mod config;
pub mod decision;
pub mod episode;
pub mod perception;
pub mod render;
pub mod runner;
pub mod setup;
pub mod tick;
pub mod turn;
