//! Integration tests for overlay-ctl

mod cli_install;
mod cli_pull;
mod round_trip;
mod test_utils;
