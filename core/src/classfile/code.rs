use core::fmt;

use super::Opcode;

/// An instruction stream being built, with operand stack tracking.
///
/// Every emitted instruction must be followed by the matching
/// [`push_stack`](Self::push_stack) / [`pop_stack`](Self::pop_stack) calls so
/// that `max_stack` is exact.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    bytes: Vec<u8>,

    /// Current stack depth
    stack_depth: usize,

    /// Maximum stack depth observed
    max_stack: usize,
}

impl CodeBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, opcode: Opcode) {
        debug_assert_eq!(opcode.operand_len(), 0, "{opcode} takes an operand");
        self.bytes.push(opcode as u8);
    }

    pub fn emit_u1(&mut self, opcode: Opcode, operand: u8) {
        debug_assert_eq!(opcode.operand_len(), 1, "{opcode} takes no u1 operand");
        self.bytes.extend_from_slice(&[opcode as u8, operand]);
    }

    pub fn emit_u2(&mut self, opcode: Opcode, operand: u16) {
        debug_assert_eq!(opcode.operand_len(), 2, "{opcode} takes no u2 operand");
        self.bytes.push(opcode as u8);
        self.bytes.extend_from_slice(&operand.to_be_bytes());
    }

    /// Push values onto the operand stack.
    pub fn push_stack(&mut self, n: usize) {
        self.stack_depth += n;
        self.max_stack = self.max_stack.max(self.stack_depth);
    }

    /// Pop values from the operand stack.
    pub fn pop_stack(&mut self, n: usize) {
        debug_assert!(
            self.stack_depth >= n,
            "Stack underflow: popping {} from depth {}",
            n,
            self.stack_depth
        );
        self.stack_depth = self.stack_depth.saturating_sub(n);
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack_depth
    }

    pub fn max_stack(&self) -> usize {
        self.max_stack
    }
}

impl fmt::Debug for CodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CodeBlock {{")?;
        writeln!(f, "  max_stack: {}", self.max_stack)?;
        writeln!(f, "  instructions:")?;

        let mut offset = 0;
        while offset < self.bytes.len() {
            let byte = self.bytes[offset];
            let Ok(opcode) = Opcode::try_from(byte) else {
                writeln!(f, "    {:4}  .byte 0x{:02X}", offset, byte)?;
                offset += 1;
                continue;
            };

            let operands = &self.bytes[offset + 1..];
            match opcode.operand_len() {
                0 => writeln!(f, "    {:4}  {}", offset, opcode)?,
                1 if !operands.is_empty() => {
                    writeln!(f, "    {:4}  {} #{}", offset, opcode, operands[0])?
                }
                2 if operands.len() >= 2 => {
                    let index = u16::from_be_bytes([operands[0], operands[1]]);
                    writeln!(f, "    {:4}  {} #{}", offset, opcode, index)?
                }
                _ => writeln!(f, "    {:4}  {} <truncated>", offset, opcode)?,
            }
            offset += 1 + opcode.operand_len();
        }

        write!(f, "}}")
    }
}
