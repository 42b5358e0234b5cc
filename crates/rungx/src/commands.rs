use colored::Colorize;
use primitive_types::U256;
use serde::Deserialize;
use std::fs;
use std::io::{self, Read};

use rung_vm::operand::{MemoryOperand, Region, SelectLteOperand, TierRangeOperand, ZipmapOperand};
use rung_vm::providers::{StaticChain, StaticTier};
use rung_vm::{fingerprint, Opcode, Program, StateConfig, Vm};
use rung_tier::{Logic, Mode};

use crate::CliError;

/// On-disk program format: hex instruction streams plus decimal or 0x-hex
/// constant words.
#[derive(Debug, Deserialize)]
struct ProgramFile {
    sources: Vec<String>,
    constants: Vec<String>,
}

fn read_input(file: &str) -> Result<String, CliError> {
    if file == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::other(format!("read stdin: {e}")))?;
        Ok(buf)
    } else {
        fs::read_to_string(file).map_err(|e| CliError::other(format!("read {file}: {e}")))
    }
}

fn load(file: &str) -> Result<StateConfig, CliError> {
    let content = read_input(file)?;
    let parsed: ProgramFile = serde_json::from_str(&content)
        .map_err(|e| CliError::input(format!("parse program JSON: {e}")))?;

    let mut sources = Vec::with_capacity(parsed.sources.len());
    for (i, s) in parsed.sources.iter().enumerate() {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped)
            .map_err(|e| CliError::input(format!("source {i}: {e}")))?;
        sources.push(bytes);
    }

    let mut constants = Vec::with_capacity(parsed.constants.len());
    for (i, c) in parsed.constants.iter().enumerate() {
        constants.push(
            parse_word(c).map_err(|e| CliError::input(format!("constant {i}: {e}")))?,
        );
    }
    Ok(StateConfig { sources, constants })
}

fn parse_word(s: &str) -> Result<U256, String> {
    let s = s.trim();
    if let Some(hexpart) = s.strip_prefix("0x") {
        U256::from_str_radix(hexpart, 16).map_err(|e| format!("bad hex word '{s}': {e}"))
    } else {
        U256::from_dec_str(s).map_err(|e| format!("bad decimal word '{s}': {e}"))
    }
}

// ── verify ──────────────────────────────────────────────────────

pub fn verify(file: &str) -> Result<(), CliError> {
    let config = load(file)?;
    let program =
        Program::compile(&config).map_err(|e| CliError::verify(e.to_string()))?;
    println!("{} {}", "program:   ".dimmed(), fingerprint(&config).cyan());
    println!("{} {}", "stack size:".dimmed(), program.stack_height());
    println!("{} {}", "context:   ".dimmed(), program.context_reads());
    println!("{}", "verified".green());
    Ok(())
}

// ── run ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: &str,
    source: usize,
    context: &[String],
    caller: &str,
    block: &str,
    timestamp: &str,
    reports: &[String],
) -> Result<(), CliError> {
    let config = load(file)?;
    let program = Program::with_entrypoints(&config, &[source])
        .map_err(|e| CliError::verify(e.to_string()))?;

    let mut context_words = Vec::with_capacity(context.len());
    for word in context {
        context_words.push(parse_word(word).map_err(|e| CliError::input(e))?);
    }

    let chain = StaticChain {
        caller: parse_word(caller).map_err(|e| CliError::input(e))?,
        block_number: parse_word(block).map_err(|e| CliError::input(e))?,
        block_timestamp: parse_word(timestamp).map_err(|e| CliError::input(e))?,
        ..StaticChain::default()
    };

    let mut tiers = StaticTier::default();
    for entry in reports {
        let (account, report) = entry
            .split_once('=')
            .ok_or_else(|| CliError::input(format!("bad --report '{entry}', want ACCOUNT=REPORT")))?;
        tiers = tiers.with_report(
            parse_word(account).map_err(|e| CliError::input(e))?,
            parse_word(report).map_err(|e| CliError::input(e))?,
        );
    }

    let outcome = Vm::new(&program, &chain, &tiers, &context_words)
        .map_err(|e| CliError::eval(e.to_string()))?
        .run(source)
        .map_err(|e| CliError::eval(e.to_string()))?;

    for (i, word) in outcome.stack.iter().enumerate().rev() {
        let marker = if i + 1 == outcome.stack.len() { "top" } else { "   " };
        println!("{} {} {}", marker.dimmed(), format!("[{i}]").dimmed(), format!("{word}").cyan());
    }
    println!("{} {}", "steps:".dimmed(), outcome.steps);
    Ok(())
}

// ── disasm ──────────────────────────────────────────────────────

pub fn disasm(file: &str) -> Result<(), CliError> {
    let config = load(file)?;
    for (i, source) in config.sources.iter().enumerate() {
        println!("{}", format!("source {i}:").bold());
        if source.len() % 2 != 0 {
            return Err(CliError::input(format!("source {i}: odd-length instruction stream")));
        }
        for (pc, pair) in source.chunks_exact(2).enumerate() {
            match Opcode::from_u8(pair[0]) {
                Some(code) => println!(
                    "  {:>3}  {:<24} {}",
                    pc,
                    code.mnemonic(),
                    render_operand(code, pair[1]).dimmed()
                ),
                None => println!("  {:>3}  {} 0x{:02x}", pc, "??".red(), pair[0]),
            }
        }
    }
    Ok(())
}

fn render_operand(code: Opcode, operand: u8) -> String {
    use Opcode::*;
    match code {
        Memory => match MemoryOperand::decode(operand) {
            Some(m) => {
                let region = match m.region {
                    Region::Stack => "stack",
                    Region::Constant => "constant",
                    Region::Context => "context",
                };
                format!("{region}[{}]", m.offset)
            }
            None => format!("?? 0x{operand:02x}"),
        },
        Zipmap => {
            let z = ZipmapOperand::decode(operand);
            format!("source {} x{} over {} words", z.source, z.iterations(), z.val_size + 1)
        }
        SelectLte => match SelectLteOperand::decode(operand) {
            Some(s) => {
                let logic = match s.logic {
                    Logic::Any => "any",
                    Logic::Every => "every",
                };
                let mode = match s.mode {
                    Mode::Min => "min",
                    Mode::Max => "max",
                    Mode::First => "first",
                };
                format!("{logic}/{mode} over {} reports", s.length)
            }
            None => format!("?? 0x{operand:02x}"),
        },
        UpdateTimesForRange => {
            let r = TierRangeOperand::decode(operand);
            format!("lanes {}..{}", r.start, r.end)
        }
        Add | Sub | Mul | Div | Mod | Exp | Min | Max | SatAdd | SatSub | SatMul | Every
        | Any => format!("x{operand}"),
        TierReport | TierTimeForTier => format!("{operand} context words"),
        _ => String::new(),
    }
}

// ── id ──────────────────────────────────────────────────────────

pub fn id(file: &str) -> Result<(), CliError> {
    let config = load(file)?;
    println!("{}", fingerprint(&config).cyan());
    Ok(())
}
