use crate::assembler::Assembly;
use crate::parser::Line;
use color_print::cformat;

const RULE: &str = "-------------------+-----------------------------------------------------";

/// Colored listing of every record: address and bytes for instructions, labels in green.
pub fn dump(asm: &Assembly) -> String {
    let mut emits = asm.emits.iter().peekable();
    let mut out = String::new();
    let mut file = None;

    for (idx, record) in asm.records.iter().enumerate() {
        // Print file header whenever the source file changes
        if file != Some(&record.file) {
            let pad = 45usize.saturating_sub(record.file.len());
            out.push_str(&format!(
                "{}+------[{}]{}\n",
                "-".repeat(19),
                record.file,
                "-".repeat(pad)
            ));
            file = Some(&record.file);
        }

        let line = Line::parse(&record.text);
        let labels: String = line
            .labels
            .iter()
            .map(|name| {
                let addr = asm
                    .labels
                    .get_val(name)
                    .map(|addr| format!("@{addr:04X}"))
                    .unwrap_or_default();
                cformat!("<g>{}:</><c>{}</> ", name, addr)
            })
            .collect();

        let body = match emits.next_if(|emit| emit.record == idx) {
            Some(emit) => {
                let bin = emit
                    .bytes
                    .iter()
                    .map(|b| format!("{b:02X}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                let pc = cformat!("<yellow>{}</>", format!("{:04X}", emit.pc));
                format!(
                    "[{}] {:<11} | {:>4}:   {}{}",
                    pc, bin, record.line, labels, line.code
                )
            }
            None => format!("{:19}| {:>4}: {}{}", "", record.line, labels, line.code),
        };
        out.push_str(&body);
        out.push('\n');
    }
    out.push_str(RULE);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{Assembler, Config};

    fn listing(src: &str) -> String {
        let asm = Assembler::new(Config::default());
        dump(&asm.assemble_str("main.asm", src).unwrap())
    }

    #[test]
    fn lists_bytes_and_labels() {
        let text = listing("top:\nLDA $10\n.org $20\nBR top");
        assert!(text.contains("[main.asm]"));
        assert!(text.contains("09 10 00"));
        assert!(text.contains("0B DE"));
        assert!(text.contains("top:"));
        assert!(text.contains("0020"));
        assert!(text.ends_with(&format!("{RULE}\n")));
    }

    #[test]
    fn label_on_instruction_line() {
        let text = listing("INC\nstart: loop: LDA $10");
        let row = text
            .lines()
            .find(|row| row.contains("09 10 00"))
            .unwrap();
        assert!(row.contains("start:"));
        assert!(row.contains("loop:"));
        assert!(row.contains("@0001"));
        assert!(row.contains("LDA $10"));
    }
}
