mod bounded_tests;
mod pattern_tests;
