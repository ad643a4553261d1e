use arch::{Form, OpKind};

use crate::{
    defines::Defines,
    error::{Diag, Error},
    eval::Evaluator,
    image::Segment,
    label::Labels,
    loader::Record,
    parser::{Line, Stmt},
};

/// Bytes produced by one instruction, kept for the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emit {
    /// Index into the record list.
    pub record: usize,
    pub pc: u16,
    pub bytes: Vec<u8>,
}

/// Encode every instruction against the final label table.
///
/// On an operand error the instruction is still emitted at its full length, with
/// placeholder bytes, so addresses stay in step with [`pass1`](crate::pass1::pass1).
pub fn pass2(
    records: &[Record],
    origin: u16,
    defines: &Defines,
    labels: &Labels,
) -> (Vec<Segment>, Vec<Emit>, Vec<Diag>) {
    let mut enc = Encoder {
        eval: Evaluator::new(defines, labels),
        pc: origin,
        open: None,
        segments: vec![],
        emits: vec![],
        diags: vec![],
    };

    for (idx, record) in records.iter().enumerate() {
        match Line::parse(&record.text).stmt {
            Stmt::Blank => {}
            Stmt::Org(operands) => {
                enc.close();
                match enc.eval.org_target(&operands) {
                    Ok(addr) => enc.pc = addr,
                    Err(error) => enc.diags.push(record.diag(error)),
                }
            }
            Stmt::Inst { mnemonic, operands } => match OpKind::parse(mnemonic) {
                Ok(op) => enc.inst(idx, record, op, &operands),
                Err(_) => {
                    let error = Error::UnknownMnemonic(mnemonic.to_string());
                    enc.diags.push(record.diag(error));
                }
            },
        }
    }
    enc.close();

    (enc.segments, enc.emits, enc.diags)
}

struct Encoder<'a> {
    eval: Evaluator<'a>,
    pc: u16,
    open: Option<Segment>,
    segments: Vec<Segment>,
    emits: Vec<Emit>,
    diags: Vec<Diag>,
}

impl Encoder<'_> {
    fn close(&mut self) {
        if let Some(seg) = self.open.take() {
            if !seg.bytes.is_empty() {
                self.segments.push(seg);
            }
        }
    }

    fn inst(&mut self, idx: usize, record: &Record, op: OpKind, operands: &[&str]) {
        let form = op.form();
        let mut bytes = vec![op.opcode()];

        let encoded = match (form, operands) {
            (Form::Implied, []) => Ok(()),
            (Form::Implied, _) => Err(Error::OperandCount(op.to_string(), 0, operands.len())),
            (_, [token]) => self
                .eval
                .eval(token)
                .and_then(|val| self.encode(form, token, val, &mut bytes)),
            (_, _) => Err(Error::OperandCount(op.to_string(), 1, operands.len())),
        };
        if let Err(error) = encoded {
            self.diags.push(record.diag(error));
        }
        // placeholder bytes for whatever could not be encoded
        bytes.resize(form.len() as usize, 0);

        let pc = self.pc;
        self.open
            .get_or_insert_with(|| Segment {
                base: pc,
                bytes: vec![],
            })
            .bytes
            .extend_from_slice(&bytes);
        // pass 1 rejects instructions past $FFFF, so only the final one can wrap
        self.pc = pc.wrapping_add(form.len());
        self.emits.push(Emit {
            record: idx,
            pc,
            bytes,
        });
    }

    /// Append the operand bytes. Out of range values are reported after the truncated
    /// bytes have been written.
    fn encode(&self, form: Form, token: &str, val: i64, bytes: &mut Vec<u8>) -> Result<(), Error> {
        match form {
            Form::Implied => Ok(()),
            Form::Imm8 => {
                bytes.push(val as u8);
                match val {
                    0..=0xFF => Ok(()),
                    _ => Err(Error::ImmOutOfRange(token.to_string(), val)),
                }
            }
            Form::Rel8 => {
                let offset = val - (self.pc as i64 + 2);
                bytes.push(offset as u8);
                match offset {
                    -128..=127 => Ok(()),
                    _ => Err(Error::BranchOutOfRange(token.to_string(), offset)),
                }
            }
            Form::Abs16 => {
                bytes.extend_from_slice(&(val as u16).to_le_bytes());
                match val {
                    0..=0xFFFF => Ok(()),
                    _ => Err(Error::AddrOutOfRange(token.to_string(), val)),
                }
            }
        }
    }
}
