//! Release decision and publication engine
//!
//! On every trunk push the engine answers one question and acts on it:
//! did the merged change request a release, and if so, mint the next tag,
//! collect the per-platform binaries, stamp their checksums, and publish
//! them together exactly once.
//!
//! # Core Invariants
//!
//! 1. **Absence of a signal is success, not failure**
//!    - No label on the merged change is a normal no-op run
//!    - Only an unreachable metadata source fails the run
//!
//! 2. **Tags are monotonic and minted from fresh state**
//!    - Prior tags are re-read from the repository on every run
//!    - The deduced tag orders strictly above all prior tags
//!    - A tag that already exists on the host is a fatal race, never reused
//!
//! 3. **A release is all platforms or nothing**
//!    - The collector blocks (bounded) until the expected set is complete
//!    - Every published artifact has exactly one checksum entry, and vice
//!      versa
//!    - An attachment failure leaves a visible remnant and a failed run,
//!      never a silent half-release
//!
//! # Components
//!
//! - **signal**: did the merged change carry the release label
//! - **version**: deduce the next tag from prior tags
//! - **artifacts**: barrier-wait and validate the staged platform set
//! - **checksum**: detached SHA-256 manifest entry per artifact
//! - **host**: the release host seam (GitHub implementation)
//! - **publish**: the single create-and-attach transaction
//! - **engine**: stage orchestration and run state machine

pub mod artifacts;
pub mod checksum;
pub mod engine;
pub mod host;
pub mod publish;
pub mod signal;
pub mod version;

pub use engine::{Engine, RunMode};
pub use version::ReleaseTag;
