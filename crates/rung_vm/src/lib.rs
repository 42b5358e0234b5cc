//! Rung VM - deterministic stack VM for tiered eligibility logic
//!
//! Goals:
//! - Programs are data: sources + constants supplied once, verified once
//! - The integrity pass bounds every stack move and memory read statically;
//!   the dispatch loop then runs without runtime checks
//! - No I/O, no allocation growth, no recursion through zipmap chains
//! - 256-bit words throughout; constants and context are read-only per call

pub mod exec;
pub mod math;
pub mod opcode;
pub mod operand;
pub mod providers;
pub mod state;
pub mod verify;
pub mod wire;

pub use exec::{ChainProvider, ExecError, TierProvider, Vm, VmOutcome};
pub use opcode::{op, Opcode};
pub use operand::{MemoryOperand, Region, SelectLteOperand, TierRangeOperand, ZipmapOperand};
pub use state::{Op, Program, StateConfig};
pub use verify::VerifyError;
pub use wire::{fingerprint, WireError};
