use super::*;

mod command_test;
mod error_test;
