//! Integration tests for layered method dispatch

mod late_registration;
mod priority_order;
mod result_shaping;
mod test_utils;
