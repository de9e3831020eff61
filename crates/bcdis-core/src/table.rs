//! Table-driven instruction-set metadata.

use crate::{BytecodeMetadata, OperandScale, OperandType, TableError};

/// How the disassembler treats an opcode beyond its operand list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OpcodeKind {
    /// Ordinary instruction.
    #[default]
    Normal,
    /// One-byte prefix selecting the operand scale of the next opcode.
    ScalePrefix(OperandScale),
    /// Breakpoint that replaced another instruction in place. The
    /// operand bytes belong to the replaced instruction.
    DebugBreak,
}

/// Description of a single opcode.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpcodeInfo {
    /// Opcode byte.
    pub byte: u8,
    /// Mnemonic without scale suffix.
    pub name: String,
    /// Operand types in encoding order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub operands: Vec<OperandType>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: OpcodeKind,
}

impl OpcodeInfo {
    /// Creates an ordinary opcode.
    pub fn new(byte: u8, name: impl Into<String>, operands: &[OperandType]) -> Self {
        Self {
            byte,
            name: name.into(),
            operands: operands.to_vec(),
            kind: OpcodeKind::Normal,
        }
    }

    /// Sets the kind.
    pub fn with_kind(mut self, kind: OpcodeKind) -> Self {
        self.kind = kind;
        self
    }

    fn validate(&self) -> Result<(), TableError> {
        if self.name.is_empty() {
            return Err(TableError::EmptyMnemonic(self.byte));
        }
        if let OpcodeKind::ScalePrefix(scale) = self.kind {
            if !self.operands.is_empty() {
                return Err(TableError::PrefixWithOperands {
                    byte: self.byte,
                    name: self.name.clone(),
                });
            }
            if scale == OperandScale::Single {
                return Err(TableError::SingleScalePrefix {
                    byte: self.byte,
                    name: self.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct TableFile {
    opcodes: Vec<OpcodeInfo>,
}

/// Opcode table indexed by opcode byte.
#[derive(Debug, Clone)]
pub struct OpcodeTable {
    entries: Vec<Option<OpcodeInfo>>,
}

impl OpcodeTable {
    /// Starts an empty table.
    pub fn builder() -> OpcodeTableBuilder {
        OpcodeTableBuilder::default()
    }

    /// Builds a table from a list of opcode descriptions.
    pub fn from_entries(
        entries: impl IntoIterator<Item = OpcodeInfo>,
    ) -> Result<Self, TableError> {
        let mut slots: Vec<Option<OpcodeInfo>> = vec![None; 256];
        for info in entries {
            info.validate()?;
            let slot = &mut slots[info.byte as usize];
            if let Some(existing) = slot {
                return Err(TableError::DuplicateOpcode {
                    byte: info.byte,
                    first: existing.name.clone(),
                    second: info.name,
                });
            }
            *slot = Some(info);
        }
        Ok(Self { entries: slots })
    }

    /// Parses a JSON opcode table.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let file: TableFile = serde_json::from_str(json)?;
        let table = Self::from_entries(file.opcodes)?;
        log::debug!("loaded opcode table with {} opcodes", table.len());
        Ok(table)
    }

    /// Serializes the table to pretty-printed JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, TableError> {
        let file = TableFile {
            opcodes: self.iter().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Returns the description of `opcode`, if defined.
    pub fn get(&self, opcode: u8) -> Option<&OpcodeInfo> {
        self.entries[opcode as usize].as_ref()
    }

    /// Iterates over defined opcodes in byte order.
    pub fn iter(&self) -> impl Iterator<Item = &OpcodeInfo> {
        self.entries.iter().flatten()
    }

    /// Number of defined opcodes.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if no opcode is defined.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up an opcode byte by mnemonic.
    pub fn find(&self, name: &str) -> Option<u8> {
        self.iter().find(|info| info.name == name).map(|info| info.byte)
    }

    fn entry(&self, opcode: u8) -> &OpcodeInfo {
        self.get(opcode)
            .unwrap_or_else(|| panic!("undefined opcode {opcode:#04x}"))
    }
}

impl BytecodeMetadata for OpcodeTable {
    fn is_defined(&self, opcode: u8) -> bool {
        self.get(opcode).is_some()
    }

    fn operand_types(&self, opcode: u8) -> &[OperandType] {
        &self.entry(opcode).operands
    }

    fn name(&self, opcode: u8) -> &str {
        &self.entry(opcode).name
    }

    fn scale_prefix(&self, opcode: u8) -> Option<OperandScale> {
        match self.get(opcode)?.kind {
            OpcodeKind::ScalePrefix(scale) => Some(scale),
            _ => None,
        }
    }

    fn is_debug_break(&self, opcode: u8) -> bool {
        matches!(
            self.get(opcode).map(|info| info.kind),
            Some(OpcodeKind::DebugBreak)
        )
    }
}

/// Incremental [`OpcodeTable`] construction.
#[derive(Debug, Default)]
pub struct OpcodeTableBuilder {
    entries: Vec<OpcodeInfo>,
}

impl OpcodeTableBuilder {
    /// Adds an ordinary opcode.
    pub fn opcode(mut self, byte: u8, name: &str, operands: &[OperandType]) -> Self {
        self.entries.push(OpcodeInfo::new(byte, name, operands));
        self
    }

    /// Adds a scale prefix.
    pub fn scale_prefix(mut self, byte: u8, name: &str, scale: OperandScale) -> Self {
        self.entries
            .push(OpcodeInfo::new(byte, name, &[]).with_kind(OpcodeKind::ScalePrefix(scale)));
        self
    }

    /// Adds a debug-break marker.
    pub fn debug_break(mut self, byte: u8, name: &str, operands: &[OperandType]) -> Self {
        self.entries
            .push(OpcodeInfo::new(byte, name, operands).with_kind(OpcodeKind::DebugBreak));
        self
    }

    /// Validates and builds the table.
    pub fn build(self) -> Result<OpcodeTable, TableError> {
        OpcodeTable::from_entries(self.entries)
    }
}
