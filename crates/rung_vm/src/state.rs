//! Serialized program model and its compiled in-memory form.
//!
//! A `StateConfig` is what an owning application supplies once, at
//! construction. Compilation decodes every 2-byte instruction into an [`Op`]
//! with its operand already unpacked, then hands the whole thing to the
//! integrity pass. Only programs that survive both steps exist as
//! [`Program`] values.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::opcode::Opcode;
use crate::operand::{MemoryOperand, SelectLteOperand, TierRangeOperand, ZipmapOperand};
use crate::verify::{self, VerifyError};

/// Construction-time input: one byte-sequence per source plus the constants
/// pool. Source 0 is the default entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    pub sources: Vec<Vec<u8>>,
    pub constants: Vec<U256>,
}

/// One compiled instruction. Operands are decoded exactly once, here, and
/// opaque to the dispatch loop thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Memory(MemoryOperand),
    Zipmap(ZipmapOperand),
    BlockNumber,
    BlockTimestamp,
    Caller,
    ThisAddress,
    Add(u8),
    Sub(u8),
    Mul(u8),
    Div(u8),
    Mod(u8),
    Exp(u8),
    Min(u8),
    Max(u8),
    SatAdd(u8),
    SatSub(u8),
    SatMul(u8),
    IsZero,
    EagerIf,
    Equal,
    Less,
    Greater,
    Every(u8),
    Any(u8),
    Always,
    Never,
    SatDiff,
    UpdateTimesForRange(TierRangeOperand),
    SelectLte(SelectLteOperand),
    TierReport { context_words: u8 },
    TierTimeForTier { context_words: u8 },
    Erc20BalanceOf,
    Erc20TotalSupply,
    Erc721BalanceOf,
    Erc721OwnerOf,
}

fn arity(count: u8, min: u8, source: usize, pc: usize) -> Result<u8, VerifyError> {
    if count < min {
        return Err(VerifyError::BadArity { source, pc, count, min });
    }
    Ok(count)
}

pub(crate) fn compile_source(index: usize, bytes: &[u8]) -> Result<Vec<Op>, VerifyError> {
    if bytes.len() % 2 != 0 {
        return Err(VerifyError::TruncatedSource { source: index });
    }
    let mut ops = Vec::with_capacity(bytes.len() / 2);
    for (pc, pair) in bytes.chunks_exact(2).enumerate() {
        let opcode = Opcode::from_u8(pair[0]).ok_or(VerifyError::UnknownOpcode {
            source: index,
            pc,
            byte: pair[0],
        })?;
        let operand = pair[1];
        let bad = VerifyError::BadOperand { source: index, pc, byte: operand };
        let op = match opcode {
            Opcode::Memory => Op::Memory(MemoryOperand::decode(operand).ok_or(bad)?),
            Opcode::Zipmap => Op::Zipmap(ZipmapOperand::decode(operand)),
            Opcode::BlockNumber => Op::BlockNumber,
            Opcode::BlockTimestamp => Op::BlockTimestamp,
            Opcode::Caller => Op::Caller,
            Opcode::ThisAddress => Op::ThisAddress,
            Opcode::Add => Op::Add(arity(operand, 2, index, pc)?),
            Opcode::Sub => Op::Sub(arity(operand, 2, index, pc)?),
            Opcode::Mul => Op::Mul(arity(operand, 2, index, pc)?),
            Opcode::Div => Op::Div(arity(operand, 2, index, pc)?),
            Opcode::Mod => Op::Mod(arity(operand, 2, index, pc)?),
            Opcode::Exp => Op::Exp(arity(operand, 2, index, pc)?),
            Opcode::Min => Op::Min(arity(operand, 2, index, pc)?),
            Opcode::Max => Op::Max(arity(operand, 2, index, pc)?),
            Opcode::SatAdd => Op::SatAdd(arity(operand, 2, index, pc)?),
            Opcode::SatSub => Op::SatSub(arity(operand, 2, index, pc)?),
            Opcode::SatMul => Op::SatMul(arity(operand, 2, index, pc)?),
            Opcode::IsZero => Op::IsZero,
            Opcode::EagerIf => Op::EagerIf,
            Opcode::Equal => Op::Equal,
            Opcode::Less => Op::Less,
            Opcode::Greater => Op::Greater,
            Opcode::Every => Op::Every(arity(operand, 1, index, pc)?),
            Opcode::Any => Op::Any(arity(operand, 1, index, pc)?),
            Opcode::Always => Op::Always,
            Opcode::Never => Op::Never,
            Opcode::SatDiff => Op::SatDiff,
            Opcode::UpdateTimesForRange => {
                Op::UpdateTimesForRange(TierRangeOperand::decode(operand))
            }
            Opcode::SelectLte => Op::SelectLte(SelectLteOperand::decode(operand).ok_or(bad)?),
            Opcode::TierReport => Op::TierReport { context_words: operand },
            Opcode::TierTimeForTier => Op::TierTimeForTier { context_words: operand },
            Opcode::Erc20BalanceOf => Op::Erc20BalanceOf,
            Opcode::Erc20TotalSupply => Op::Erc20TotalSupply,
            Opcode::Erc721BalanceOf => Op::Erc721BalanceOf,
            Opcode::Erc721OwnerOf => Op::Erc721OwnerOf,
        };
        ops.push(op);
    }
    Ok(ops)
}

/// A compiled, verified program. Construction is the only gate between
/// untrusted bytecode and the check-free dispatch loop.
#[derive(Debug, Clone)]
pub struct Program {
    sources: Vec<Vec<Op>>,
    constants: Vec<U256>,
    stack_height: usize,
    context_reads: usize,
    entrypoints: Vec<usize>,
}

impl Program {
    /// Compile and verify with source 0 as the only entrypoint.
    pub fn compile(config: &StateConfig) -> Result<Self, VerifyError> {
        Self::with_entrypoints(config, &[0])
    }

    /// Compile and verify, declaring which sources may be evaluated
    /// directly. Sources only reached through zipmap are verified in their
    /// argument context and stay internal.
    pub fn with_entrypoints(
        config: &StateConfig,
        entrypoints: &[usize],
    ) -> Result<Self, VerifyError> {
        let mut sources = Vec::with_capacity(config.sources.len());
        for (index, bytes) in config.sources.iter().enumerate() {
            sources.push(compile_source(index, bytes)?);
        }
        let bounds = verify::verify(&sources, config.constants.len(), entrypoints)?;
        tracing::debug!(
            stack_height = bounds.stack_height,
            context_reads = bounds.context_reads,
            "program verified"
        );
        Ok(Self {
            sources,
            constants: config.constants.clone(),
            stack_height: bounds.stack_height,
            context_reads: bounds.context_reads,
            entrypoints: entrypoints.to_vec(),
        })
    }

    /// Minimum stack allocation any evaluation of this program needs.
    pub fn stack_height(&self) -> usize {
        self.stack_height
    }

    /// Number of leading context words the program may read.
    pub fn context_reads(&self) -> usize {
        self.context_reads
    }

    pub fn constants(&self) -> &[U256] {
        &self.constants
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn is_entrypoint(&self, index: usize) -> bool {
        self.entrypoints.contains(&index)
    }

    pub(crate) fn source(&self, index: usize) -> &[Op] {
        &self.sources[index]
    }
}
