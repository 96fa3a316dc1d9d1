//! Scenario suites for the sliding interface.


mod intersect_tests;
mod motion_tests;
mod state_tests;
