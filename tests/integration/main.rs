//! Integration tests for partstat, run against fake host trees.

#![cfg(target_os = "linux")]


mod partition_tests;
