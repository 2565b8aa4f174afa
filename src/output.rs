use crate::{ops::Instruction, state::Machine};

/// Render the machine state about to execute, on a single line.
///
/// `TRACE: PC | M[PC] M[PC+1] M[PC+2] | R0 R1 .. R7`, all in hex.
pub fn trace(machine: &Machine) -> String {
    let pc = machine.pc();
    let regs: Vec<String> = machine
        .registers()
        .iter()
        .map(|reg| format!("{reg:02X}"))
        .collect();
    format!(
        "TRACE: {:02X} | {:02X} {:02X} {:02X} | {}",
        pc,
        machine.read_memory(pc),
        machine.read_memory(pc.wrapping_add(1)),
        machine.read_memory(pc.wrapping_add(2)),
        regs.join(" "),
    )
}

/// One line of a disassembly listing.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ListingLine {
    pub address: u8,
    pub bytes: Vec<u8>,
    /// `None` for bytes that aren't a whole instruction
    pub instr: Option<Instruction>,
}

/// Walk `image` from address 0, decoding instructions back to back.
///
/// Bytes that do not decode, or instructions cut short by the end of the image,
/// are listed one byte at a time.
pub fn disassemble(image: &[u8]) -> Vec<ListingLine> {
    let mut lines = Vec::new();
    let mut addr = 0;
    while addr < image.len() {
        let at = |offs: usize| image.get(addr + offs).copied().unwrap_or(0);
        // `image` fits in memory, so `addr` fits in a byte
        let address = addr as u8;
        let decoded = Instruction::decode(address, [at(0), at(1), at(2)])
            .ok()
            .filter(|instr| addr + instr.width() as usize <= image.len());

        let width = decoded.map_or(1, |instr| instr.width() as usize);
        lines.push(ListingLine {
            address,
            bytes: image[addr..addr + width].to_vec(),
            instr: decoded,
        });
        addr += width;
    }
    lines
}

impl std::fmt::Display for ListingLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes: String = self.bytes.iter().map(|byte| format!("{byte:02X} ")).collect();
        write!(f, "{:02X}: {bytes:<9} ", self.address)?;
        match self.instr {
            Some(instr) => write!(f, "{instr}"),
            None => write!(f, ".byte {:#010b}", self.bytes[0]),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::state::Register;

    #[test]
    fn trace_format() {
        let mut machine = Machine::new();
        machine.load(&[0b1000_0010, 0, 8]).unwrap();
        assert_eq!(
            trace(&machine),
            "TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4"
        );

        machine.set_pc(0xFF);
        machine.write_memory(0xFF, 0xAB);
        machine.set_reg(Register::R1, 0x1F);
        assert_eq!(
            trace(&machine),
            "TRACE: FF | AB 82 00 | 00 1F 00 00 00 00 00 F4"
        );
    }

    #[test]
    fn listing() {
        let image = [0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001, 0xFF, 0b1000_0010, 1];
        let lines: Vec<String> = disassemble(&image).iter().map(|l| l.to_string()).collect();
        assert_eq!(
            lines,
            [
                "00: 82 00 08  LDI R0, 8",
                "03: 47 00     PRN R0",
                "05: 01        HLT",
                "06: FF        .byte 0b11111111",
                // Truncated LDI
                "07: 82        .byte 0b10000010",
                "08: 01        HLT",
            ]
        );
    }

    #[test]
    fn listing_of_empty_image() {
        assert!(disassemble(&[]).is_empty());
    }
}
