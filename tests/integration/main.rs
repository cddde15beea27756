//! Integration tests for the assembled engine.

mod helpers;

mod admission_test;
mod reaper_test;
mod session_test;
