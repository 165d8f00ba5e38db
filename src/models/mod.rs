//! Scheduling domain models.
//!
//! Provides the data types for one scheduling round: the immutable problem
//! inputs and the decoded solution.
//!
//! # Domain Mapping
//!
//! | fab-dispatch | Test floor |
//! |--------------|------------|
//! | Lot | Batch of chips awaiting one test operation |
//! | Machine | A single tester |
//! | Process time | Deterministic duration of lot on machine; `0` = incompatible |
//! | Schedule | Per-machine dispatch plan with time offsets |

mod problem;
mod schedule;

pub use problem::ProblemInput;
pub use schedule::{Assignment, Schedule};
