//! Integration test harness for the shipway binary

mod helpers;
mod test_checksum;
mod test_collect;
mod test_detect;
