use primitive_types::U256;
use rung_vm::operand::MemoryOperand;
use rung_vm::providers::{StaticChain, StaticTier};
use rung_vm::{fingerprint, op, Opcode, Program, StateConfig, Vm};

fn main() {
    // claim = base_rate * erc20 balance of the caller
    let token = U256::from(0x7001u64);
    let claimant = U256::from(0xa11ce_u64);

    let source = [
        op(Opcode::Memory, MemoryOperand::constant(0).encode()), // base rate
        op(Opcode::Memory, MemoryOperand::constant(1).encode()), // token
        op(Opcode::Caller, 0),
        op(Opcode::Erc20BalanceOf, 0),
        op(Opcode::Mul, 2),
    ]
    .concat();
    let config = StateConfig {
        sources: vec![source],
        constants: vec![U256::from(3u64), token],
    };

    let program = Program::compile(&config).expect("verify");
    println!("program:    {}", fingerprint(&config));
    println!("stack size: {}", program.stack_height());

    let mut chain = StaticChain { caller: claimant, ..StaticChain::default() };
    chain.erc20_balances.insert((token, claimant), U256::from(1_000u64));

    let outcome = Vm::new(&program, &chain, &StaticTier::default(), &[])
        .expect("context")
        .run(0)
        .expect("run");
    println!("claim:      {}", outcome.stack[0]);
    println!("steps:      {}", outcome.steps);
}
