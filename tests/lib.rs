mod common;

mod buy_test;
mod teardown_test;
