//! Serialized program format.
//!
//! Layout: one format version byte, then the sources (leb128 count, then
//! per source a leb128 byte length and the raw 2-byte instructions), then
//! the constants (leb128 count, then fixed 32-byte big-endian words).
//! Encoding is deterministic, so the blake3 fingerprint of the wire bytes
//! identifies a program.

use primitive_types::U256;
use thiserror::Error;

use crate::state::StateConfig;

pub const VERSION: u8 = 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WireError {
    #[error("unsupported format version {0}")]
    Version(u8),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("source {0}: odd-length instruction stream")]
    OddSource(usize),
    #[error("{0} trailing bytes after constants")]
    TrailingBytes(usize),
    #[error("varint: {0}")]
    Varint(String),
}

pub fn encode(config: &StateConfig) -> Vec<u8> {
    let mut out = vec![VERSION];
    write_varint(&mut out, config.sources.len() as u64);
    for source in &config.sources {
        write_varint(&mut out, source.len() as u64);
        out.extend_from_slice(source);
    }
    write_varint(&mut out, config.constants.len() as u64);
    let mut word = [0u8; 32];
    for constant in &config.constants {
        constant.to_big_endian(&mut word);
        out.extend_from_slice(&word);
    }
    out
}

pub fn decode(bytes: &[u8]) -> Result<StateConfig, WireError> {
    let (&version, mut rest) = bytes.split_first().ok_or(WireError::UnexpectedEof)?;
    if version != VERSION {
        return Err(WireError::Version(version));
    }

    let source_count = read_varint(&mut rest)?;
    let mut sources = Vec::with_capacity(source_count.min(64) as usize);
    for index in 0..source_count as usize {
        let len = read_varint(&mut rest)? as usize;
        if len % 2 != 0 {
            return Err(WireError::OddSource(index));
        }
        if rest.len() < len {
            return Err(WireError::UnexpectedEof);
        }
        let (body, tail) = rest.split_at(len);
        sources.push(body.to_vec());
        rest = tail;
    }

    let constant_count = read_varint(&mut rest)?;
    let mut constants = Vec::with_capacity(constant_count.min(64) as usize);
    for _ in 0..constant_count {
        if rest.len() < 32 {
            return Err(WireError::UnexpectedEof);
        }
        let (word, tail) = rest.split_at(32);
        constants.push(U256::from_big_endian(word));
        rest = tail;
    }

    if !rest.is_empty() {
        return Err(WireError::TrailingBytes(rest.len()));
    }
    Ok(StateConfig { sources, constants })
}

/// `"b3:" + hex(blake3(wire bytes))`, the stable identity of a program.
pub fn fingerprint(config: &StateConfig) -> String {
    let bytes = encode(config);
    format!("b3:{}", hex::encode(blake3::hash(&bytes).as_bytes()))
}

fn write_varint(out: &mut Vec<u8>, value: u64) {
    // writing into a Vec cannot fail
    leb128::write::unsigned(out, value).expect("infallible write");
}

fn read_varint(rest: &mut &[u8]) -> Result<u64, WireError> {
    leb128::read::unsigned(rest).map_err(|e| match e {
        leb128::read::Error::IoError(_) => WireError::UnexpectedEof,
        other => WireError::Varint(other.to_string()),
    })
}
