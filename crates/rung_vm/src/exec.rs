//! Dispatch loop: the runtime evaluator for verified programs.
//!
//! One `Vm` per evaluation: it borrows the program, the providers and a
//! read-only context, and exclusively owns the one mutable stack. The
//! integrity pass has already bounded every stack move and memory read, so
//! the hot loop uses direct indexed access; the `debug_assert!`s are the
//! debug-only bounds checks the runtime deliberately omits.

use primitive_types::U256;

use crate::math;
use crate::operand::Region;
use crate::state::{Op, Program};
use rung_tier as tier;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ExecError {
    #[error("arithmetic fault in {op}")]
    Arithmetic { op: &'static str },
    #[error(transparent)]
    Tier(#[from] tier::TierError),
    #[error("context too narrow: program reads {needs} words, caller supplied {got}")]
    MissingContext { needs: usize, got: usize },
    #[error("source {index} is not a declared entrypoint")]
    InvalidEntrypoint { index: usize },
}

/// Chain observables and token queries. Pure reads with no effect on VM
/// state; the integration seam with the owning application.
pub trait ChainProvider {
    fn block_number(&self) -> U256;
    fn block_timestamp(&self) -> U256;
    fn caller(&self) -> U256;
    fn this_address(&self) -> U256;
    fn erc20_balance_of(&self, token: U256, account: U256) -> U256;
    fn erc20_total_supply(&self, token: U256) -> U256;
    fn erc721_balance_of(&self, token: U256, account: U256) -> U256;
    fn erc721_owner_of(&self, token: U256, id: U256) -> U256;
}

/// External tier provider: the two-method capability interface every
/// tier-aware collaborator implements.
pub trait TierProvider {
    fn report(&self, account: U256, context: &[U256]) -> U256;
    fn report_time_for_tier(&self, account: U256, tier: u32, context: &[U256]) -> u32;
}

pub struct Vm<'a, C: ChainProvider, T: TierProvider> {
    program: &'a Program,
    chain: &'a C,
    tiers: &'a T,
    context: &'a [U256],
    stack: Vec<U256>,
    top: usize,
    steps: u64,
}

/// Final state of a halted evaluation: the whole stack, bottom first. By
/// convention callers read the top word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmOutcome {
    pub stack: Vec<U256>,
    pub steps: u64,
}

impl<'a, C: ChainProvider, T: TierProvider> Vm<'a, C, T> {
    /// Stage one evaluation. The single context-width check happens here so
    /// the loop itself never has to.
    pub fn new(
        program: &'a Program,
        chain: &'a C,
        tiers: &'a T,
        context: &'a [U256],
    ) -> Result<Self, ExecError> {
        if context.len() < program.context_reads() {
            return Err(ExecError::MissingContext {
                needs: program.context_reads(),
                got: context.len(),
            });
        }
        Ok(Self {
            program,
            chain,
            tiers,
            context,
            stack: vec![U256::zero(); program.stack_height()],
            top: 0,
            steps: 0,
        })
    }

    /// Evaluate one source in a single atomic pass. Any fault aborts the
    /// whole evaluation; no partial stack is observable.
    pub fn run(mut self, entry: usize) -> Result<VmOutcome, ExecError> {
        if !self.program.is_entrypoint(entry) {
            return Err(ExecError::InvalidEntrypoint { index: entry });
        }
        self.eval_source(entry, &[])?;
        tracing::trace!(steps = self.steps, depth = self.top, "evaluation halted");
        self.stack.truncate(self.top);
        Ok(VmOutcome { stack: self.stack, steps: self.steps })
    }

    #[inline]
    fn push(&mut self, value: U256) {
        debug_assert!(self.top < self.stack.len());
        self.stack[self.top] = value;
        self.top += 1;
    }

    #[inline]
    fn pop(&mut self) -> U256 {
        debug_assert!(self.top > 0);
        self.top -= 1;
        self.stack[self.top]
    }

    fn eval_source(&mut self, index: usize, args: &[U256]) -> Result<(), ExecError> {
        let program = self.program;
        for &op in program.source(index) {
            self.steps += 1;
            match op {
                Op::Memory(m) => {
                    let offset = m.offset as usize;
                    let value = match m.region {
                        Region::Stack => {
                            debug_assert!(offset < self.top);
                            self.stack[offset]
                        }
                        Region::Constant => {
                            if offset < args.len() {
                                args[offset]
                            } else {
                                program.constants()[offset - args.len()]
                            }
                        }
                        Region::Context => {
                            debug_assert!(offset < self.context.len());
                            self.context[offset]
                        }
                    };
                    self.push(value);
                }
                Op::Zipmap(z) => {
                    let popped = z.val_size as usize + 1;
                    let base = self.top - popped;
                    let mut vals = [U256::zero(); 8];
                    vals[..popped].copy_from_slice(&self.stack[base..self.top]);
                    self.top = base;
                    let bits = 256 / z.iterations();
                    for k in 0..z.iterations() {
                        let mut call_args = [U256::zero(); 8];
                        for (slot, val) in call_args[..popped].iter_mut().zip(&vals[..popped]) {
                            *slot = sub_word(*val, k, bits);
                        }
                        self.eval_source(z.source as usize, &call_args[..popped])?;
                    }
                }
                Op::BlockNumber => self.push(self.chain.block_number()),
                Op::BlockTimestamp => self.push(self.chain.block_timestamp()),
                Op::Caller => self.push(self.chain.caller()),
                Op::ThisAddress => self.push(self.chain.this_address()),
                Op::Add(n) => self.fold(n, "add", |a, b| a.checked_add(b))?,
                Op::Sub(n) => self.fold(n, "sub", |a, b| a.checked_sub(b))?,
                Op::Mul(n) => self.fold(n, "mul", |a, b| a.checked_mul(b))?,
                Op::Div(n) => self.fold(n, "div", |a, b| a.checked_div(b))?,
                Op::Mod(n) => self.fold(n, "mod", |a, b| a.checked_rem(b))?,
                Op::Exp(n) => self.fold(n, "exp", |a, b| a.checked_pow(b))?,
                Op::Min(n) => self.fold_total(n, |a, b| a.min(b)),
                Op::Max(n) => self.fold_total(n, |a, b| a.max(b)),
                Op::SatAdd(n) => self.fold_total(n, math::sat_add),
                Op::SatSub(n) => self.fold_total(n, math::sat_sub),
                Op::SatMul(n) => self.fold_total(n, math::sat_mul),
                Op::IsZero => {
                    let a = self.pop();
                    self.push(bool_word(a.is_zero()));
                }
                Op::EagerIf => {
                    let if_false = self.pop();
                    let if_true = self.pop();
                    let condition = self.pop();
                    self.push(if condition.is_zero() { if_false } else { if_true });
                }
                Op::Equal => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(bool_word(a == b));
                }
                Op::Less => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(bool_word(a < b));
                }
                Op::Greater => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(bool_word(a > b));
                }
                Op::Every(n) => {
                    let base = self.top - n as usize;
                    let mut out = self.stack[base];
                    for i in 0..n as usize {
                        if self.stack[base + i].is_zero() {
                            out = U256::zero();
                            break;
                        }
                    }
                    self.top = base;
                    self.push(out);
                }
                Op::Any(n) => {
                    let base = self.top - n as usize;
                    let mut out = U256::zero();
                    for i in 0..n as usize {
                        let v = self.stack[base + i];
                        if !v.is_zero() {
                            out = v;
                            break;
                        }
                    }
                    self.top = base;
                    self.push(out);
                }
                Op::Always => self.push(tier::ALWAYS_REPORT),
                Op::Never => self.push(tier::NEVER_REPORT),
                Op::SatDiff => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(tier::diff(a, b));
                }
                Op::UpdateTimesForRange(r) => {
                    let time = clamp_u32(self.pop());
                    let report = self.pop();
                    self.push(tier::update_times_for_range(report, r.start, r.end, time)?);
                }
                Op::SelectLte(s) => {
                    let pivot = clamp_u32(self.pop());
                    let base = self.top - s.length as usize;
                    let combined =
                        tier::select_lte(pivot, &self.stack[base..self.top], s.logic, s.mode);
                    self.top = base;
                    self.push(combined);
                }
                Op::TierReport { context_words } => {
                    let base = self.top - context_words as usize;
                    let account = self.stack[base - 1];
                    let report = self.tiers.report(account, &self.stack[base..self.top]);
                    self.top = base - 1;
                    self.push(report);
                }
                Op::TierTimeForTier { context_words } => {
                    let base = self.top - context_words as usize;
                    let tier_arg = clamp_u32(self.stack[base - 1]);
                    let account = self.stack[base - 2];
                    let time = self.tiers.report_time_for_tier(
                        account,
                        tier_arg,
                        &self.stack[base..self.top],
                    );
                    self.top = base - 2;
                    self.push(U256::from(time));
                }
                Op::Erc20BalanceOf => {
                    let account = self.pop();
                    let token = self.pop();
                    self.push(self.chain.erc20_balance_of(token, account));
                }
                Op::Erc20TotalSupply => {
                    let token = self.pop();
                    self.push(self.chain.erc20_total_supply(token));
                }
                Op::Erc721BalanceOf => {
                    let account = self.pop();
                    let token = self.pop();
                    self.push(self.chain.erc721_balance_of(token, account));
                }
                Op::Erc721OwnerOf => {
                    let id = self.pop();
                    let token = self.pop();
                    self.push(self.chain.erc721_owner_of(token, id));
                }
            }
        }
        Ok(())
    }

    /// Left fold over the top `n` items; first operand is the deepest.
    fn fold(
        &mut self,
        n: u8,
        op: &'static str,
        f: impl Fn(U256, U256) -> Option<U256>,
    ) -> Result<(), ExecError> {
        let base = self.top - n as usize;
        let mut acc = self.stack[base];
        for i in 1..n as usize {
            acc = f(acc, self.stack[base + i]).ok_or(ExecError::Arithmetic { op })?;
        }
        self.top = base;
        self.push(acc);
        Ok(())
    }

    fn fold_total(&mut self, n: u8, f: impl Fn(U256, U256) -> U256) {
        let base = self.top - n as usize;
        let mut acc = self.stack[base];
        for i in 1..n as usize {
            acc = f(acc, self.stack[base + i]);
        }
        self.top = base;
        self.push(acc);
    }
}

#[inline]
fn bool_word(b: bool) -> U256 {
    if b {
        U256::one()
    } else {
        U256::zero()
    }
}

/// Timestamps and tier indices live in 32 bits; wider words saturate.
#[inline]
fn clamp_u32(v: U256) -> u32 {
    if v > U256::from(u32::MAX) {
        u32::MAX
    } else {
        v.low_u32()
    }
}

fn sub_word(v: U256, k: usize, bits: usize) -> U256 {
    if bits == 256 {
        return v;
    }
    (v >> (k * bits)) & ((U256::one() << bits) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{op, Opcode};
    use crate::operand::{MemoryOperand, SelectLteOperand, TierRangeOperand, ZipmapOperand};
    use crate::providers::{StaticChain, StaticTier};
    use crate::state::StateConfig;
    use rung_tier::{Logic, Mode, NEVER_LANE, NEVER_REPORT};

    fn constant(offset: u8) -> [u8; 2] {
        op(Opcode::Memory, MemoryOperand::constant(offset).encode())
    }

    fn run_with(
        config: &StateConfig,
        chain: &StaticChain,
        tiers: &StaticTier,
        context: &[U256],
    ) -> Result<VmOutcome, ExecError> {
        let program = Program::compile(config).unwrap();
        Vm::new(&program, chain, tiers, context)?.run(0)
    }

    fn run(config: &StateConfig) -> Result<VmOutcome, ExecError> {
        run_with(config, &StaticChain::default(), &StaticTier::default(), &[])
    }

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    // ── arithmetic ──────────────────────────────────────────────

    #[test]
    fn adds_two_constants() {
        let config = StateConfig {
            sources: vec![[constant(0), constant(1), op(Opcode::Add, 2)].concat()],
            constants: vec![u(10), u(20)],
        };
        let outcome = run(&config).unwrap();
        assert_eq!(outcome.stack, vec![u(30)]);
        assert_eq!(outcome.steps, 3);
    }

    #[test]
    fn checked_mul_faults_where_saturating_clamps() {
        let half = U256::MAX / 2;
        let constants = vec![half, u(3)];
        let checked = StateConfig {
            sources: vec![[constant(0), constant(1), op(Opcode::Mul, 2)].concat()],
            constants: constants.clone(),
        };
        let err = run(&checked).unwrap_err();
        assert_eq!(err, ExecError::Arithmetic { op: "mul" });

        let saturating = StateConfig {
            sources: vec![[constant(0), constant(1), op(Opcode::SatMul, 2)].concat()],
            constants,
        };
        let outcome = run(&saturating).unwrap();
        assert_eq!(outcome.stack, vec![U256::MAX]);
    }

    #[test]
    fn division_by_zero_faults() {
        let config = StateConfig {
            sources: vec![[constant(0), constant(1), op(Opcode::Div, 2)].concat()],
            constants: vec![u(1), u(0)],
        };
        assert_eq!(run(&config).unwrap_err(), ExecError::Arithmetic { op: "div" });
    }

    #[test]
    fn variadic_fold_is_left_to_right() {
        // 100 - 7 - 3 = 90
        let config = StateConfig {
            sources: vec![[constant(0), constant(1), constant(2), op(Opcode::Sub, 3)].concat()],
            constants: vec![u(100), u(7), u(3)],
        };
        assert_eq!(run(&config).unwrap().stack, vec![u(90)]);
    }

    // ── logic ───────────────────────────────────────────────────

    #[test]
    fn eager_if_picks_branch_by_condition() {
        let config = StateConfig {
            sources: vec![[
                constant(0),
                constant(1),
                constant(2),
                op(Opcode::EagerIf, 0),
            ]
            .concat()],
            constants: vec![u(1), u(111), u(222)],
        };
        assert_eq!(run(&config).unwrap().stack, vec![u(111)]);

        let config = StateConfig {
            sources: vec![[
                constant(0),
                constant(1),
                constant(2),
                op(Opcode::EagerIf, 0),
            ]
            .concat()],
            constants: vec![u(0), u(111), u(222)],
        };
        assert_eq!(run(&config).unwrap().stack, vec![u(222)]);
    }

    #[test]
    fn every_returns_first_unless_any_zero() {
        let all = StateConfig {
            sources: vec![[constant(0), constant(1), op(Opcode::Every, 2)].concat()],
            constants: vec![u(5), u(9)],
        };
        assert_eq!(run(&all).unwrap().stack, vec![u(5)]);

        let with_zero = StateConfig {
            sources: vec![[constant(0), constant(1), op(Opcode::Every, 2)].concat()],
            constants: vec![u(5), u(0)],
        };
        assert_eq!(run(&with_zero).unwrap().stack, vec![u(0)]);
    }

    #[test]
    fn any_returns_first_nonzero() {
        let config = StateConfig {
            sources: vec![[constant(0), constant(1), op(Opcode::Any, 2)].concat()],
            constants: vec![u(0), u(9)],
        };
        assert_eq!(run(&config).unwrap().stack, vec![u(9)]);
    }

    #[test]
    fn comparisons() {
        let config = StateConfig {
            sources: vec![[constant(0), constant(1), op(Opcode::Less, 0)].concat()],
            constants: vec![u(3), u(4)],
        };
        assert_eq!(run(&config).unwrap().stack, vec![u(1)]);
    }

    // ── memory regions ──────────────────────────────────────────

    #[test]
    fn stack_read_duplicates_slot() {
        let config = StateConfig {
            sources: vec![[
                constant(0),
                op(Opcode::Memory, MemoryOperand::stack(0).encode()),
                op(Opcode::Add, 2),
            ]
            .concat()],
            constants: vec![u(21)],
        };
        assert_eq!(run(&config).unwrap().stack, vec![u(42)]);
    }

    #[test]
    fn context_read_and_width_check() {
        let config = StateConfig {
            sources: vec![op(Opcode::Memory, MemoryOperand::context(0).encode()).to_vec()],
            constants: vec![],
        };
        let chain = StaticChain::default();
        let tiers = StaticTier::default();
        let outcome = run_with(&config, &chain, &tiers, &[u(42)]).unwrap();
        assert_eq!(outcome.stack, vec![u(42)]);

        let err = run_with(&config, &chain, &tiers, &[]).unwrap_err();
        assert_eq!(err, ExecError::MissingContext { needs: 1, got: 0 });
    }

    #[test]
    fn only_declared_entrypoints_run() {
        let config = StateConfig {
            sources: vec![op(Opcode::Always, 0).to_vec(), op(Opcode::Never, 0).to_vec()],
            constants: vec![],
        };
        let program = Program::compile(&config).unwrap();
        let chain = StaticChain::default();
        let tiers = StaticTier::default();
        let err = Vm::new(&program, &chain, &tiers, &[]).unwrap().run(1).unwrap_err();
        assert_eq!(err, ExecError::InvalidEntrypoint { index: 1 });

        let program = Program::with_entrypoints(&config, &[0, 1]).unwrap();
        let outcome = Vm::new(&program, &chain, &tiers, &[]).unwrap().run(1).unwrap();
        assert_eq!(outcome.stack, vec![NEVER_REPORT]);
    }

    // ── chain introspection ─────────────────────────────────────

    #[test]
    fn chain_observables() {
        let chain = StaticChain {
            block_timestamp: u(777),
            caller: u(0xabcd),
            ..StaticChain::default()
        };
        let config = StateConfig {
            sources: vec![[
                op(Opcode::BlockTimestamp, 0),
                op(Opcode::Caller, 0),
                op(Opcode::Add, 2),
            ]
            .concat()],
            constants: vec![],
        };
        let outcome = run_with(&config, &chain, &StaticTier::default(), &[]).unwrap();
        assert_eq!(outcome.stack, vec![u(777 + 0xabcd)]);
    }

    #[test]
    fn erc20_balance_query() {
        let token = u(0x1000);
        let holder = u(0x2000);
        let mut chain = StaticChain::default();
        chain.erc20_balances.insert((token, holder), u(5_000));
        let config = StateConfig {
            sources: vec![[constant(0), constant(1), op(Opcode::Erc20BalanceOf, 0)].concat()],
            constants: vec![token, holder],
        };
        let outcome = run_with(&config, &chain, &StaticTier::default(), &[]).unwrap();
        assert_eq!(outcome.stack, vec![u(5_000)]);
    }

    // ── tier ops ────────────────────────────────────────────────

    #[test]
    fn tier_report_via_provider() {
        let account = u(0xbeef);
        let report = rung_tier::pack([1, 2, 3, 4, 5, 6, 7, 8]);
        let tiers = StaticTier::default().with_report(account, report);
        let config = StateConfig {
            sources: vec![[
                op(Opcode::Memory, MemoryOperand::context(0).encode()),
                op(Opcode::TierReport, 0),
            ]
            .concat()],
            constants: vec![],
        };
        let outcome = run_with(&config, &StaticChain::default(), &tiers, &[account]).unwrap();
        assert_eq!(outcome.stack, vec![report]);

        // unknown accounts fall back to the never-report
        let outcome = run_with(&config, &StaticChain::default(), &tiers, &[u(1)]).unwrap();
        assert_eq!(outcome.stack, vec![NEVER_REPORT]);
    }

    #[test]
    fn tier_time_for_tier_via_provider() {
        let account = u(0xbeef);
        let report = rung_tier::pack([10, 20, 30, 40, NEVER_LANE, NEVER_LANE, NEVER_LANE, NEVER_LANE]);
        let tiers = StaticTier::default().with_report(account, report);
        let config = StateConfig {
            sources: vec![[
                constant(0),
                constant(1),
                op(Opcode::TierTimeForTier, 0),
            ]
            .concat()],
            constants: vec![account, u(4)],
        };
        let outcome = run_with(&config, &StaticChain::default(), &tiers, &[]).unwrap();
        assert_eq!(outcome.stack, vec![u(40)]);
    }

    #[test]
    fn update_times_for_range_op() {
        let range = TierRangeOperand { start: 0, end: 4 };
        let config = StateConfig {
            sources: vec![[
                op(Opcode::Never, 0),
                constant(0),
                op(Opcode::UpdateTimesForRange, range.encode()),
            ]
            .concat()],
            constants: vec![u(99)],
        };
        let outcome = run(&config).unwrap();
        assert_eq!(
            rung_tier::unpack(outcome.stack[0]),
            [99, 99, 99, 99, NEVER_LANE, NEVER_LANE, NEVER_LANE, NEVER_LANE]
        );
    }

    #[test]
    fn select_lte_op_combines_reports() {
        let sel = SelectLteOperand { logic: Logic::Any, mode: Mode::Min, length: 2 };
        let config = StateConfig {
            sources: vec![[
                op(Opcode::Always, 0),
                op(Opcode::Never, 0),
                constant(0), // pivot
                op(Opcode::SelectLte, sel.encode()),
            ]
            .concat()],
            constants: vec![u(1_000)],
        };
        let outcome = run(&config).unwrap();
        assert_eq!(outcome.stack, vec![rung_tier::ALWAYS_REPORT]);
    }

    #[test]
    fn sat_diff_op() {
        let a = rung_tier::pack([100, 50, 0, 0, 0, 0, 0, 0]);
        let b = rung_tier::pack([60, 80, 0, 0, 0, 0, 0, 0]);
        let config = StateConfig {
            sources: vec![[constant(0), constant(1), op(Opcode::SatDiff, 0)].concat()],
            constants: vec![a, b],
        };
        let outcome = run(&config).unwrap();
        assert_eq!(rung_tier::unpack(outcome.stack[0]), [40, 0, 0, 0, 0, 0, 0, 0]);
    }

    // ── zipmap ──────────────────────────────────────────────────

    #[test]
    fn zipmap_loop_size_zero_equals_manual_inline() {
        // inner: arg0 + arg1
        let inner = [constant(0), constant(1), op(Opcode::Add, 2)].concat();
        let zip = ZipmapOperand { source: 1, loop_size: 0, val_size: 1 };
        let zipped = StateConfig {
            sources: vec![
                [constant(0), constant(1), op(Opcode::Zipmap, zip.encode())].concat(),
                inner.clone(),
            ],
            constants: vec![u(10), u(20)],
        };
        let inlined = StateConfig { sources: vec![inner], constants: vec![u(10), u(20)] };
        assert_eq!(run(&zipped).unwrap().stack, run(&inlined).unwrap().stack);
        assert_eq!(run(&zipped).unwrap().stack, vec![u(30)]);
    }

    #[test]
    fn zipmap_loop_size_three_maps_eight_lanes() {
        // two words of eight 32-bit lanes; inner adds the lane pair
        let a = rung_tier::pack([1, 2, 3, 4, 5, 6, 7, 8]);
        let b = rung_tier::pack([10, 20, 30, 40, 50, 60, 70, 80]);
        let zip = ZipmapOperand { source: 1, loop_size: 3, val_size: 1 };
        let config = StateConfig {
            sources: vec![
                [constant(0), constant(1), op(Opcode::Zipmap, zip.encode())].concat(),
                [constant(0), constant(1), op(Opcode::Add, 2)].concat(),
            ],
            constants: vec![a, b],
        };
        let outcome = run(&config).unwrap();
        let want: Vec<U256> = (1..=8).map(|i| u(i * 11)).collect();
        assert_eq!(outcome.stack, want);
    }

    #[test]
    fn zipmap_inner_sees_args_before_constants() {
        // inner: arg0 + constants[0] (pool index shifts past the one arg)
        let zip = ZipmapOperand { source: 1, loop_size: 0, val_size: 0 };
        let config = StateConfig {
            sources: vec![
                [constant(1), op(Opcode::Zipmap, zip.encode())].concat(),
                [constant(0), constant(1), op(Opcode::Add, 2)].concat(),
            ],
            constants: vec![u(100), u(7)],
        };
        // outer pushes constants[1] (7); inner adds arg0 (7) + constants[0] (100)
        assert_eq!(run(&config).unwrap().stack, vec![u(107)]);
    }

    // ── fault atomicity ─────────────────────────────────────────

    #[test]
    fn fault_yields_no_partial_stack() {
        let config = StateConfig {
            sources: vec![[
                constant(0),
                constant(0),
                constant(1),
                op(Opcode::Add, 2),
            ]
            .concat()],
            constants: vec![U256::MAX, u(1)],
        };
        let err = run(&config).unwrap_err();
        assert_eq!(err, ExecError::Arithmetic { op: "add" });
    }
}
