//! Greenlight Core
//!
//! Core types shared by the Greenlight client and action binary.
//!
//! This crate contains:
//! - Domain types: check suites, verdicts, artifacts and deployments
//! - DTOs: request and response bodies for the GitHub REST and GraphQL APIs

pub mod domain;
pub mod dto;
