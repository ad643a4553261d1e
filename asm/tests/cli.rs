use std::{
    fs,
    path::PathBuf,
    process::Command,
    time::{SystemTime, UNIX_EPOCH},
};

use mr8asm::RomHeader;

fn temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!("mr8asm-cli-{tag}-{}-{nanos}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn mr8asm() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mr8asm"))
}

#[test]
fn cpp_to_stdout() {
    let dir = temp_dir("cpp");
    let src = dir.join("main.asm");
    fs::write(&src, "start: LDA $10\n       HALT\n").unwrap();

    let out = mr8asm()
        .arg(&src)
        .args(["-t", "cpp", "-v", "BOOT"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "const uint16_t BOOT_ORIGIN = 0x0000;\n\
         const uint8_t BOOT[] = {\n  \
         0x09, 0x10, 0x00, 0xFF,\n\
         };\n"
    );
    // progress lines go to stderr
    assert!(String::from_utf8_lossy(&out.stderr).contains("1. Load Sources"));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn rom_next_to_input() {
    let dir = temp_dir("rom");
    let src = dir.join("prog.asm");
    fs::write(&src, "LDA VALUE\n").unwrap();

    let out = mr8asm()
        .arg(&src)
        .args(["-q", "-o", "$0100", "-D", "VALUE=$1234"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stderr.is_empty());

    let rom = fs::read(dir.join("prog.rom")).unwrap();
    let (header, payload) = RomHeader::parse(&rom).unwrap();
    assert_eq!(header.origin, 0x0100);
    assert_eq!(payload, &[0x09, 0x34, 0x12]);
    assert_eq!(header.verify(payload), Ok(()));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn errors_fail_the_run() {
    let dir = temp_dir("err");
    let src = dir.join("bad.asm");
    fs::write(&src, "FOO\n").unwrap();

    let out = mr8asm().arg(&src).arg("-q").output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unknown mnemonic"));
    assert!(!dir.join("bad.rom").exists());
    fs::remove_dir_all(&dir).ok();
}
