//! Integration tests for termsvg.

mod cast_test;
mod cli_test;
mod helpers;
mod render_test;
