//! Branch-call-jump converters
//!
//! Each converter rewrites relative branch targets to absolute ones on
//! encode and back on decode, in place. Buffers shorter than one
//! instruction are left untouched.

use memchr::memchr2;

/// Instruction set handled by a [`BranchConverter`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchArch {
    Arm,
    ArmThumb,
    Ia64,
    PowerPc,
    Sparc,
    X86,
}

impl BranchArch {
    /// Smallest buffer the converter will touch
    pub fn min_size(&self) -> usize {
        match self {
            Self::Arm | Self::ArmThumb | Self::PowerPc | Self::Sparc => 4,
            Self::X86 => 5,
            Self::Ia64 => 16,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Arm => "arm",
            Self::ArmThumb => "armt",
            Self::Ia64 => "ia64",
            Self::PowerPc => "ppc",
            Self::Sparc => "sparc",
            Self::X86 => "x86",
        }
    }
}

/// In-place branch converter with its own state
///
/// Only x86 carries state between calls; a new converter starts from the
/// initial state, so use a fresh one for each encode or decode pass.
#[derive(Clone, Debug)]
pub struct BranchConverter {
    arch: BranchArch,
    x86_state: u32,
}

impl BranchConverter {
    pub fn new(arch: BranchArch) -> Self {
        Self { arch, x86_state: 0 }
    }

    pub fn arch(&self) -> BranchArch {
        self.arch
    }

    /// Convert relative targets to absolute; returns bytes processed
    pub fn encode(&mut self, data: &mut [u8], ip: u32) -> usize {
        self.convert(data, ip, true)
    }

    /// Convert absolute targets back to relative; returns bytes processed
    pub fn decode(&mut self, data: &mut [u8], ip: u32) -> usize {
        self.convert(data, ip, false)
    }

    pub fn convert(&mut self, data: &mut [u8], ip: u32, encoding: bool) -> usize {
        match self.arch {
            BranchArch::Arm => arm_convert(data, ip, encoding),
            BranchArch::ArmThumb => armt_convert(data, ip, encoding),
            BranchArch::Ia64 => ia64_convert(data, ip, encoding),
            BranchArch::PowerPc => ppc_convert(data, ip, encoding),
            BranchArch::Sparc => sparc_convert(data, ip, encoding),
            BranchArch::X86 => x86_convert(data, ip, &mut self.x86_state, encoding),
        }
    }
}

#[inline]
fn relocate(src: u32, cur: u32, encoding: bool) -> u32 {
    if encoding {
        cur.wrapping_add(src)
    } else {
        src.wrapping_sub(cur)
    }
}

/// ARM BL: 24-bit word offset, opcode byte 0xEB
fn arm_convert(data: &mut [u8], ip: u32, encoding: bool) -> usize {
    if data.len() < 4 {
        return 0;
    }
    let limit = data.len() - 4;
    let ip = ip.wrapping_add(8);
    let mut i = 0;
    while i <= limit {
        if data[i + 3] == 0xEB {
            let src = (u32::from(data[i + 2]) << 16)
                | (u32::from(data[i + 1]) << 8)
                | u32::from(data[i]);
            let dest = relocate(src << 2, ip.wrapping_add(i as u32), encoding) >> 2;
            data[i + 2] = (dest >> 16) as u8;
            data[i + 1] = (dest >> 8) as u8;
            data[i] = dest as u8;
        }
        i += 4;
    }
    i
}

/// Thumb BL pair: two 16-bit halves with 0xF0/0xF8 prefixes
fn armt_convert(data: &mut [u8], ip: u32, encoding: bool) -> usize {
    if data.len() < 4 {
        return 0;
    }
    let limit = data.len() - 4;
    let ip = ip.wrapping_add(4);
    let mut i = 0;
    while i <= limit {
        if (data[i + 1] & 0xF8) == 0xF0 && (data[i + 3] & 0xF8) == 0xF8 {
            let src = ((u32::from(data[i + 1]) & 7) << 19)
                | (u32::from(data[i]) << 11)
                | ((u32::from(data[i + 3]) & 7) << 8)
                | u32::from(data[i + 2]);
            let dest = relocate(src << 1, ip.wrapping_add(i as u32), encoding) >> 1;
            data[i + 1] = 0xF0 | ((dest >> 19) & 7) as u8;
            data[i] = (dest >> 11) as u8;
            data[i + 3] = 0xF8 | ((dest >> 8) & 7) as u8;
            data[i + 2] = dest as u8;
            i += 2;
        }
        i += 2;
    }
    i
}

/// PowerPC `bl`: primary opcode 18 with AA=0, LK=1
fn ppc_convert(data: &mut [u8], ip: u32, encoding: bool) -> usize {
    if data.len() < 4 {
        return 0;
    }
    let limit = data.len() - 4;
    let mut i = 0;
    while i <= limit {
        if (data[i] >> 2) == 0x12 && (data[i + 3] & 3) == 1 {
            let src = ((u32::from(data[i]) & 3) << 24)
                | (u32::from(data[i + 1]) << 16)
                | (u32::from(data[i + 2]) << 8)
                | (u32::from(data[i + 3]) & !3);
            let dest = relocate(src, ip.wrapping_add(i as u32), encoding);
            data[i] = 0x48 | ((dest >> 24) & 3) as u8;
            data[i + 1] = (dest >> 16) as u8;
            data[i + 2] = (dest >> 8) as u8;
            data[i + 3] = (data[i + 3] & 3) | dest as u8;
        }
        i += 4;
    }
    i
}

/// SPARC `call` with a displacement that fits in 22 bits
fn sparc_convert(data: &mut [u8], ip: u32, encoding: bool) -> usize {
    if data.len() < 4 {
        return 0;
    }
    let limit = data.len() - 4;
    let mut i = 0;
    while i <= limit {
        if (data[i] == 0x40 && (data[i + 1] & 0xC0) == 0x00)
            || (data[i] == 0x7F && (data[i + 1] & 0xC0) == 0xC0)
        {
            let src = u32::from_be_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
            let mut dest = relocate(src << 2, ip.wrapping_add(i as u32), encoding) >> 2;
            dest = ((0u32.wrapping_sub((dest >> 22) & 1) << 22) & 0x3FFF_FFFF)
                | (dest & 0x3F_FFFF)
                | 0x4000_0000;
            data[i..i + 4].copy_from_slice(&dest.to_be_bytes());
        }
        i += 4;
    }
    i
}

/// Slots that may hold a branch, per IA-64 bundle template
const IA64_BRANCH_TABLE: [u8; 32] = [
    0, 0, 0, 0, 0, 0, 0, 0, //
    0, 0, 0, 0, 0, 0, 0, 0, //
    4, 4, 6, 6, 0, 0, 7, 7, //
    4, 4, 0, 0, 4, 4, 0, 0, //
];

/// IA-64 bundles: 128 bits holding a 5-bit template and three 41-bit slots
fn ia64_convert(data: &mut [u8], ip: u32, encoding: bool) -> usize {
    if data.len() < 16 {
        return 0;
    }
    let limit = data.len() - 16;
    let mut i = 0;
    while i <= limit {
        let mask = u32::from(IA64_BRANCH_TABLE[(data[i] & 0x1F) as usize]);
        for slot in 0..3 {
            if (mask >> slot) & 1 == 0 {
                continue;
            }
            let bit_pos = 5 + 41 * slot;
            let byte_pos = (bit_pos >> 3) as usize;
            let bit_res = bit_pos & 7;

            let mut instruction = 0u64;
            for j in 0..6 {
                instruction |= u64::from(data[i + j + byte_pos]) << (8 * j);
            }

            let mut norm = instruction >> bit_res;
            if ((norm >> 37) & 0xF) == 0x5 && ((norm >> 9) & 0x7) == 0 {
                let mut src = ((norm >> 13) & 0xF_FFFF) as u32;
                src |= (((norm >> 36) & 1) as u32) << 20;

                let dest = relocate(src << 4, ip.wrapping_add(i as u32), encoding) >> 4;

                norm &= !(0x8F_FFFFu64 << 13);
                norm |= u64::from(dest & 0xF_FFFF) << 13;
                norm |= u64::from(dest & 0x10_0000) << (36 - 20);

                instruction &= (1u64 << bit_res) - 1;
                instruction |= norm << bit_res;
                for j in 0..6 {
                    data[i + j + byte_pos] = (instruction >> (8 * j)) as u8;
                }
            }
        }
        i += 16;
    }
    i
}

/// Whether a byte is a sign extension (0x00 or 0xFF)
#[inline]
fn is_ms_byte(b: u8) -> bool {
    b.wrapping_add(1) & 0xFE == 0
}

/// x86 CALL/JMP rel32 (E8/E9), with a 3-bit history of recent opcode bytes
fn x86_convert(data: &mut [u8], ip: u32, state: &mut u32, encoding: bool) -> usize {
    if data.len() < 5 {
        return 0;
    }
    let limit = data.len() - 4;
    let ip = ip.wrapping_add(5);
    let mut mask = *state & 7;
    let mut pos = 0usize;

    loop {
        let p = if pos >= limit {
            pos
        } else {
            memchr2(0xE8, 0xE9, &data[pos..limit]).map_or(limit, |off| pos + off)
        };
        let d = p - pos;
        pos = p;

        if p >= limit {
            *state = if d > 2 { 0 } else { mask >> d };
            return pos;
        }

        if d > 2 {
            mask = 0;
        } else {
            mask >>= d;
            if mask != 0
                && (mask > 4 || mask == 3 || is_ms_byte(data[p + (mask >> 1) as usize + 1]))
            {
                mask = (mask >> 1) | 4;
                pos += 1;
                continue;
            }
        }

        if is_ms_byte(data[p + 4]) {
            let mut v = u32::from_le_bytes([data[p + 1], data[p + 2], data[p + 3], data[p + 4]]);
            let cur = ip.wrapping_add(pos as u32);
            pos += 5;
            v = relocate(v, cur, encoding);
            if mask != 0 {
                let sh = (mask & 6) << 2;
                if is_ms_byte((v >> sh) as u8) {
                    v ^= (0x100u32 << sh).wrapping_sub(1);
                    v = relocate(v, cur, encoding);
                }
                mask = 0;
            }
            data[p + 1] = v as u8;
            data[p + 2] = (v >> 8) as u8;
            data[p + 3] = (v >> 16) as u8;
            data[p + 4] = 0u8.wrapping_sub(((v >> 24) & 1) as u8);
        } else {
            mask = (mask >> 1) | 4;
            pos += 1;
        }
    }
}
