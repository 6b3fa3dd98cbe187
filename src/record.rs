//! Learned-code records: the serialization boundary with the storage
//! collaborator.
//!
//! A record is a versioned JSON document carrying everything needed to
//! retransmit a learned code later: protocol identity, bit count, data
//! word, address/command fields, flags, carrier metadata, verification
//! status, capture timestamp — and, only for `Raw` codes, the full symbol
//! array. The codec does not decide where records live; callers hand in
//! paths.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol, ValidationStatus};

/// Record format version; bump on breaking layout changes.
pub const RECORD_VERSION: &str = "1.0";

/// A persisted learned code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedCodeRecord {
    pub version: String,
    pub protocol: ProtocolId,
    pub bits: u16,
    /// Data word as a hex string (stable across JSON integer handling).
    pub data_hex: String,
    pub address: u16,
    pub command: u16,
    pub flags: CodeFlags,
    pub carrier_hz: u32,
    pub duty_cycle_pct: u8,
    pub repeat_period_ms: u16,
    pub validation: ValidationStatus,
    /// When the code was learned.
    pub captured_at: DateTime<Utc>,
    /// Full timing sequence; present only for `Raw` codes.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub raw_symbols: Option<Vec<TimingSymbol>>,
}

impl LearnedCodeRecord {
    /// Snapshot a decoded code, timestamped now.
    pub fn from_code(code: &DecodedCode) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            protocol: code.protocol,
            bits: code.bits,
            data_hex: format!("{:X}", code.data),
            address: code.address,
            command: code.command,
            flags: code.flags,
            carrier_hz: code.carrier_hz,
            duty_cycle_pct: code.duty_cycle_pct,
            repeat_period_ms: code.repeat_period_ms,
            validation: code.validation,
            captured_at: Utc::now(),
            raw_symbols: code.raw.clone(),
        }
    }

    /// Rebuild a transmittable code from the record.
    pub fn into_code(self) -> Result<DecodedCode> {
        let data = u64::from_str_radix(&self.data_hex, 16)
            .with_context(|| format!("invalid data_hex {:?}", self.data_hex))?;
        Ok(DecodedCode {
            protocol: self.protocol,
            data,
            bits: self.bits,
            address: self.address,
            command: self.command,
            flags: self.flags,
            carrier_hz: self.carrier_hz,
            duty_cycle_pct: self.duty_cycle_pct,
            repeat_period_ms: self.repeat_period_ms,
            validation: self.validation,
            raw: self.raw_symbols,
        })
    }

    /// Write the record as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write record to {:?}", path))?;
        tracing::info!(protocol = %self.protocol, path = ?path, "learned code saved");
        Ok(())
    }

    /// Read a record back from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read record from {:?}", path))?;
        let record: LearnedCodeRecord =
            serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(record)
    }
}
