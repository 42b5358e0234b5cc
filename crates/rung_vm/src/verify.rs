//! Integrity pass: a static dry-run of every reachable instruction.
//!
//! This is the only gate between untrusted user-authored bytecode and a
//! dispatch loop that performs no bounds checking of its own. It computes
//! the worst-case stack height, checks every memory operand at the point it
//! is read, checks declared arities, and walks zipmap chains at their true
//! base heights. It runs exactly once, at construction.

use std::fmt;

use crate::operand::{Region, SelectLteOperand};
use crate::state::Op;
use rung_tier::LANES;

// NOTE: this enum is written with a hand-rolled `Display`/`Error` impl rather
// than `#[derive(thiserror::Error)]`. The `source` field here is a bytecode
// source-index, but thiserror unconditionally treats any field literally named
// `source` as the error's `std::error::Error` source (and has no opt-out
// attribute), which fails to compile for a `usize`. The impls below reproduce
// exactly the messages the derive would have produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    TruncatedSource { source: usize },
    UnknownOpcode { source: usize, pc: usize, byte: u8 },
    BadOperand { source: usize, pc: usize, byte: u8 },
    BadArity { source: usize, pc: usize, count: u8, min: u8 },
    StackUnderflow { source: usize, pc: usize, needs: usize, has: usize },
    OutOfBoundsStack { source: usize, pc: usize, offset: usize, height: usize },
    OutOfBoundsConstant { source: usize, pc: usize, offset: usize, len: usize },
    MissingSource { source: usize, pc: usize, target: usize },
    RecursiveZipmap { source: usize, pc: usize, target: usize },
    BadSelectLteLength { source: usize, pc: usize, length: u8 },
    MaxTierExceeded { source: usize, pc: usize, start: u8, end: u8 },
    BadEntrypoint { index: usize },
    NoResult { source: usize },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::TruncatedSource { source } => {
                write!(f, "source {source}: odd-length instruction stream")
            }
            VerifyError::UnknownOpcode { source, pc, byte } => {
                write!(f, "source {source} pc {pc}: unknown opcode 0x{byte:02x}")
            }
            VerifyError::BadOperand { source, pc, byte } => {
                write!(f, "source {source} pc {pc}: malformed operand 0x{byte:02x}")
            }
            VerifyError::BadArity { source, pc, count, min } => {
                write!(f, "source {source} pc {pc}: arity {count} below minimum {min}")
            }
            VerifyError::StackUnderflow { source, pc, needs, has } => {
                write!(f, "source {source} pc {pc}: stack underflow (needs {needs}, has {has})")
            }
            VerifyError::OutOfBoundsStack { source, pc, offset, height } => {
                write!(f, "source {source} pc {pc}: stack read at {offset} but height is {height}")
            }
            VerifyError::OutOfBoundsConstant { source, pc, offset, len } => {
                write!(f, "source {source} pc {pc}: constant read at {offset} but pool holds {len}")
            }
            VerifyError::MissingSource { source, pc, target } => {
                write!(f, "source {source} pc {pc}: zipmap target {target} does not exist")
            }
            VerifyError::RecursiveZipmap { source, pc, target } => {
                write!(f, "source {source} pc {pc}: zipmap re-enters source {target}")
            }
            VerifyError::BadSelectLteLength { source, pc, length } => {
                write!(f, "source {source} pc {pc}: select_lte length {length} outside 1..=30")
            }
            VerifyError::MaxTierExceeded { source, pc, start, end } => {
                write!(f, "source {source} pc {pc}: tier range {start}..{end} exceeds tier 8")
            }
            VerifyError::BadEntrypoint { index } => {
                write!(f, "entrypoint {index} does not exist")
            }
            VerifyError::NoResult { source } => {
                write!(f, "source {source}: evaluation would end with an empty stack")
            }
        }
    }
}

impl std::error::Error for VerifyError {}

/// What the pass guarantees about a verified program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Worst-case stack height over every entrypoint.
    pub stack_height: usize,
    /// One past the highest context offset ever read.
    pub context_reads: usize,
}

pub(crate) fn verify(
    sources: &[Vec<Op>],
    constants: usize,
    entrypoints: &[usize],
) -> Result<Bounds, VerifyError> {
    let mut sim = Sim { sources, constants, max_height: 0, context_reads: 0 };
    for &entry in entrypoints {
        if entry >= sources.len() {
            return Err(VerifyError::BadEntrypoint { index: entry });
        }
        let mut visiting = vec![entry];
        let end = sim.source(entry, 0, 0, &mut visiting)?;
        if end == 0 {
            return Err(VerifyError::NoResult { source: entry });
        }
    }
    Ok(Bounds { stack_height: sim.max_height, context_reads: sim.context_reads })
}

struct Sim<'a> {
    sources: &'a [Vec<Op>],
    constants: usize,
    max_height: usize,
    context_reads: usize,
}

impl Sim<'_> {
    /// Walk one source with `args` leading argument words visible through
    /// Constant addressing, starting from stack height `base`. Returns the
    /// height after the last instruction.
    fn source(
        &mut self,
        index: usize,
        args: usize,
        base: usize,
        visiting: &mut Vec<usize>,
    ) -> Result<usize, VerifyError> {
        let sources = self.sources;
        let mut height = base;
        for (pc, &op) in sources[index].iter().enumerate() {
            let at = Pos { source: index, pc };
            height = self.step(op, args, height, at, visiting)?;
            self.max_height = self.max_height.max(height);
        }
        Ok(height)
    }

    fn step(
        &mut self,
        op: Op,
        args: usize,
        height: usize,
        at: Pos,
        visiting: &mut Vec<usize>,
    ) -> Result<usize, VerifyError> {
        let Pos { source, pc } = at;
        match op {
            Op::Memory(m) => {
                let offset = m.offset as usize;
                match m.region {
                    Region::Stack => {
                        if offset >= height {
                            return Err(VerifyError::OutOfBoundsStack {
                                source,
                                pc,
                                offset,
                                height,
                            });
                        }
                    }
                    Region::Constant => {
                        let len = args + self.constants;
                        if offset >= len {
                            return Err(VerifyError::OutOfBoundsConstant {
                                source,
                                pc,
                                offset,
                                len,
                            });
                        }
                    }
                    Region::Context => {
                        self.context_reads = self.context_reads.max(offset + 1);
                    }
                }
                Ok(height + 1)
            }
            Op::Zipmap(z) => {
                let target = z.source as usize;
                if target >= self.sources.len() {
                    return Err(VerifyError::MissingSource { source, pc, target });
                }
                if visiting.contains(&target) {
                    return Err(VerifyError::RecursiveZipmap { source, pc, target });
                }
                let popped = z.val_size as usize + 1;
                let mut height = self.pops(height, popped, at)?;
                visiting.push(target);
                // every iteration starts where the previous one ended, so
                // each is re-walked at its true base height
                for _ in 0..z.iterations() {
                    height = self.source(target, popped, height, visiting)?;
                }
                visiting.pop();
                Ok(height)
            }
            Op::BlockNumber
            | Op::BlockTimestamp
            | Op::Caller
            | Op::ThisAddress
            | Op::Always
            | Op::Never => Ok(height + 1),
            Op::Add(n)
            | Op::Sub(n)
            | Op::Mul(n)
            | Op::Div(n)
            | Op::Mod(n)
            | Op::Exp(n)
            | Op::Min(n)
            | Op::Max(n)
            | Op::SatAdd(n)
            | Op::SatSub(n)
            | Op::SatMul(n)
            | Op::Every(n)
            | Op::Any(n) => Ok(self.pops(height, n as usize, at)? + 1),
            Op::IsZero => Ok(self.pops(height, 1, at)? + 1),
            Op::Equal | Op::Less | Op::Greater | Op::SatDiff => {
                Ok(self.pops(height, 2, at)? + 1)
            }
            Op::EagerIf => Ok(self.pops(height, 3, at)? + 1),
            Op::UpdateTimesForRange(r) => {
                if r.start as usize > LANES || r.end as usize > LANES {
                    return Err(VerifyError::MaxTierExceeded {
                        source,
                        pc,
                        start: r.start,
                        end: r.end,
                    });
                }
                Ok(self.pops(height, 2, at)? + 1)
            }
            Op::SelectLte(s) => {
                if s.length == 0 || s.length > SelectLteOperand::MAX_LENGTH {
                    return Err(VerifyError::BadSelectLteLength { source, pc, length: s.length });
                }
                Ok(self.pops(height, s.length as usize + 1, at)? + 1)
            }
            Op::TierReport { context_words } => {
                Ok(self.pops(height, context_words as usize + 1, at)? + 1)
            }
            Op::TierTimeForTier { context_words } => {
                Ok(self.pops(height, context_words as usize + 2, at)? + 1)
            }
            Op::Erc20BalanceOf | Op::Erc721BalanceOf | Op::Erc721OwnerOf => {
                Ok(self.pops(height, 2, at)? + 1)
            }
            Op::Erc20TotalSupply => Ok(self.pops(height, 1, at)? + 1),
        }
    }

    fn pops(&self, height: usize, needs: usize, at: Pos) -> Result<usize, VerifyError> {
        if height < needs {
            return Err(VerifyError::StackUnderflow {
                source: at.source,
                pc: at.pc,
                needs,
                has: height,
            });
        }
        Ok(height - needs)
    }
}

#[derive(Clone, Copy)]
struct Pos {
    source: usize,
    pc: usize,
}
