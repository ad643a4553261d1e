use color_print::cformat;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Operation of the MR8 CPU. The discriminant is the opcode byte.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
pub enum OpKind {
    ADD = 0x00,
    SUB = 0x01,
    INC = 0x02,
    DEC = 0x03,
    B = 0x04,
    BNZ = 0x05,
    BZ = 0x06,
    // 0x07 (SP -> X) has no mnemonic, `STX` is the absolute store below.
    XTS = 0x08,
    LDA = 0x09,
    STA = 0x0A,
    BR = 0x0B,
    XTA = 0x0C,
    ATX = 0x0D,
    LDX = 0x0E,
    STX = 0x0F,
    JSR = 0x10,
    RTS = 0x11,
    BSR = 0x12,
    BN = 0x13,
    BNR = 0x14,
    BPR = 0x15,
    BP = 0x16,
    BC = 0x17,
    BCR = 0x18,
    XSRA = 0x19,
    XSLA = 0x1A,
    ASRX = 0x1B,
    ASLX = 0x1C,
    AND = 0x1D,
    OR = 0x1E,
    #[strum(to_string = "XOR", serialize = "EOR")]
    XOR = 0x1F,
    CLF = 0x20,
    CLC = 0x21,
    CLN = 0x22,
    CLZ = 0x23,
    XXA = 0x24,
    BRR = 0x25,
    RTR = 0x26,
    BA = 0x27,
    ADDF = 0x28,
    SUBF = 0x29,
    BNC = 0x2A,
    BNCR = 0x2B,
    PHA = 0x2C,
    PLA = 0x2D,
    PHX = 0x2E,
    PLX = 0x2F,
    NOTA = 0x30,
    NOTX = 0x31,
    NEG = 0x32,
    SWAP = 0x33,
    ADC = 0x34,
    SBC = 0x35,
    SETBRK = 0x36,
    BRK = 0x37,
    ROL = 0x38,
    ROR = 0x39,
    ASL = 0x3A,
    ASR = 0x3B,
    BVS = 0x3C,
    BVC = 0x3D,
    BVSR = 0x3E,
    BVCR = 0x3F,
    JSRI = 0x40,
    BX = 0x41,
    BAX = 0x42,
    DECOD = 0x44,
    DECBIN = 0x45,
    ADDBCD = 0x46,
    SUBBCD = 0x47,
    LDAD = 0x48,
    LDSUB = 0x49,
    LD2 = 0x4A,
    ST2 = 0x4B,
    TST = 0x4C,
    HALT = 0xFF,
}

/// Operand encoding that follows the opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// No operand.
    Implied,
    /// One byte immediate.
    Imm8,
    /// Signed 8-bit displacement from the end of the instruction.
    Rel8,
    /// 16-bit address, little-endian.
    Abs16,
}

impl Form {
    /// Encoded length in bytes, opcode included.
    pub fn len(&self) -> u16 {
        match self {
            Form::Implied => 1,
            Form::Imm8 | Form::Rel8 => 2,
            Form::Abs16 => 3,
        }
    }
}

impl OpKind {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_uppercase().parse::<Self>() {
            Ok(op) => Ok(op),
            Err(_) => Err(format!("Unknown mnemonic: {s}")),
        }
    }

    pub fn opcode(self) -> u8 {
        self.into()
    }

    pub fn len(self) -> u16 {
        self.form().len()
    }

    pub fn form(self) -> Form {
        use OpKind::*;
        match self {
            ADD | SUB | INC | DEC | XTS | XTA | ATX | RTS | XSRA | XSLA | ASRX | ASLX | AND
            | OR | XOR | CLF | CLC | CLN | CLZ | XXA | RTR | BA | ADDF | SUBF | PHA | PLA
            | PHX | PLX | NOTA | NOTX | NEG | SWAP | BRK | ROL | ROR | ASL | ASR | BX | BAX
            | DECOD | DECBIN | ADDBCD | SUBBCD | TST | HALT => Form::Implied,

            ADC | SBC => Form::Imm8,

            BR | BSR | BNR | BPR | BCR | BRR | BNCR | BVSR | BVCR => Form::Rel8,

            B | BNZ | BZ | LDA | STA | LDX | STX | JSR | BN | BP | BC | BNC | SETBRK | BVS
            | BVC | JSRI | LDAD | LDSUB | LD2 | ST2 => Form::Abs16,
        }
    }

    /// Every operation, in opcode order.
    pub fn all() -> impl Iterator<Item = OpKind> {
        OpKind::iter()
    }

    pub fn cformat(&self) -> String {
        let operand = match self.form() {
            Form::Implied => "",
            Form::Imm8 => "imm8",
            Form::Rel8 => "rel8",
            Form::Abs16 => "abs16",
        };
        cformat!(
            "<yellow>{:02X}</> <red>{:<7}</><blue>{:<6}</>",
            self.opcode(),
            self.to_string(),
            operand
        )
    }
}

#[test]
fn parse_is_case_insensitive() {
    assert_eq!(OpKind::parse("lda"), Ok(OpKind::LDA));
    assert_eq!(OpKind::parse("Bsr"), Ok(OpKind::BSR));
    assert!(OpKind::parse("hoge").is_err());
}

#[test]
fn aliases_share_opcode() {
    assert_eq!(OpKind::parse("EOR"), Ok(OpKind::XOR));
    assert_eq!(OpKind::parse("xor").map(OpKind::opcode), Ok(0x1F));
    assert_eq!(OpKind::XOR.to_string(), "XOR");
}

#[test]
fn stx_is_absolute_store() {
    assert_eq!(OpKind::STX.opcode(), 0x0F);
    assert_eq!(OpKind::STX.len(), 3);
    assert!(OpKind::try_from(0x07u8).is_err());
}

#[test]
fn lengths() {
    assert_eq!(OpKind::LDA.len(), 3);
    assert_eq!(OpKind::ADC.len(), 2);
    assert_eq!(OpKind::BSR.form(), Form::Rel8);
    assert_eq!(OpKind::BP.form(), Form::Abs16);
    assert_eq!(OpKind::HALT.len(), 1);
    for op in OpKind::all() {
        assert!((1..=3).contains(&op.len()), "{op}");
    }
}

#[test]
fn decode_round_trip() {
    for op in OpKind::all() {
        assert_eq!(OpKind::try_from(op.opcode()), Ok(op));
    }
}
