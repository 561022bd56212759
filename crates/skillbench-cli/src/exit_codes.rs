//! Process exit codes. Scripts that chain extraction after a benchmark run
//! branch on these, so they are part of the CLI contract.

pub const SUCCESS: i32 = 0;
pub const NO_RESULTS: i32 = 1; // No job matched, or nothing could be extracted
pub const CONFIG_ERROR: i32 = 2; // Bad config, unreadable input, failed write
