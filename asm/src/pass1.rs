use arch::OpKind;

use crate::{
    defines::Defines,
    error::{Diag, Error},
    eval::Evaluator,
    label::{Label, Labels},
    loader::Record,
    parser::{Line, Stmt},
};

/// Walk the records once, assigning an address to every label.
///
/// Only `.org` operands are evaluated here, against the labels seen so far.
/// Every instruction must end at or below $FFFF.
pub fn pass1(records: &[Record], origin: u16, defines: &Defines) -> (Labels, Vec<Diag>) {
    let mut labels = Labels::new();
    let mut diags = vec![];
    let mut pc = origin as u32;

    for record in records {
        let line = Line::parse(&record.text);

        for name in &line.labels {
            // a label right after the last byte of memory reads as $0000
            let label = Label {
                addr: pc as u16,
                file: record.file.clone(),
                line: record.line,
            };
            if let Some(prev) = labels.insert(name, label) {
                let error = Error::DuplicateLabel(name.to_string(), prev.pos());
                diags.push(record.diag(error));
            }
        }

        match line.stmt {
            Stmt::Blank => {}
            Stmt::Org(operands) => {
                match Evaluator::new(defines, &labels).org_target(&operands) {
                    Ok(addr) => pc = addr as u32,
                    Err(error) => diags.push(record.diag(error)),
                }
            }
            Stmt::Inst { mnemonic, .. } => match OpKind::parse(mnemonic) {
                Ok(op) => {
                    let end = pc + op.len() as u32;
                    if end > 0x10000 {
                        let error = Error::AddressOverflow(op.to_string(), pc);
                        diags.push(record.diag(error));
                    }
                    pc = end;
                }
                Err(_) => {
                    let error = Error::UnknownMnemonic(mnemonic.to_string());
                    diags.push(record.diag(error));
                }
            },
        }
    }

    (labels, diags)
}
