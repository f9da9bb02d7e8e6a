#![warn(clippy::all, clippy::pedantic)]

pub mod components_tests;
pub mod difficulty_tests;
pub mod round_tests;

pub mod test_utils;
