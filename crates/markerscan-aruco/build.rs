//! Generates `builtins.rs` from the `data/*_CODES.json` dictionary tables.

use serde::Deserialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::{env, fs};

const LOOKUP_SIGNATURE: &str = "pub fn builtin_dictionary(name: &str) -> Option<Dictionary> {\n";

#[derive(Deserialize)]
struct DictionaryFile {
    name: String,
    marker_size: usize,
    max_correction_bits: u8,
    codes: Vec<u64>,
}

fn load_tables(dir: &Path) -> Vec<DictionaryFile> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("read {}: {e}", dir.display()))
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("_CODES.json"))
        })
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|path| {
            println!("cargo:rerun-if-changed={}", path.display());
            let table = parse_table(path);
            let bits = table.marker_size * table.marker_size;
            assert!(bits <= 64, "{}: {bits} bits do not fit in u64", table.name);
            for &code in &table.codes {
                assert!(
                    bits == 64 || code >> bits == 0,
                    "{}: code {code:#x} exceeds {bits} bits",
                    table.name
                );
            }
            table
        })
        .collect()
}

fn parse_table(path: &Path) -> DictionaryFile {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => panic!("read {}: {e}", path.display()),
    };
    match serde_json::from_str(&raw) {
        Ok(table) => table,
        Err(e) => panic!("parse {}: {e}", path.display()),
    }
}

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR");
    let data_dir = Path::new(&manifest_dir).join("data");
    println!("cargo:rerun-if-changed={}", data_dir.display());

    let tables = load_tables(&data_dir);

    let mut out = String::new();
    for t in &tables {
        let _ = writeln!(out, "/// `{}`: {} codes.", t.name, t.codes.len());
        let _ = writeln!(
            out,
            "pub const {}: crate::Dictionary = crate::Dictionary {{",
            t.name
        );
        let _ = writeln!(out, "    name: {:?},", t.name);
        let _ = writeln!(out, "    marker_size: {},", t.marker_size);
        let _ = writeln!(out, "    max_correction_bits: {},", t.max_correction_bits);
        let _ = write!(out, "    codes: &[");
        for (i, code) in t.codes.iter().enumerate() {
            if i % 8 == 0 {
                out.push_str("\n        ");
            }
            let _ = write!(out, "0x{code:04x}, ");
        }
        out.push_str("\n    ],\n};\n\n");
    }

    out.push_str("/// Names of all embedded dictionaries.\n");
    let _ = write!(out, "pub const BUILTIN_DICTIONARY_NAMES: &[&str] = &[");
    for t in &tables {
        let _ = write!(out, "{:?}, ", t.name);
    }
    out.push_str("];\n\n");

    out.push_str("/// Look up an embedded dictionary by name.\n");
    out.push_str(LOOKUP_SIGNATURE);
    out.push_str("    match name {\n");
    for t in &tables {
        let _ = writeln!(out, "        {:?} => Some({}),", t.name, t.name);
    }
    out.push_str("        _ => None,\n    }\n}\n");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR"));
    fs::write(out_dir.join("builtins.rs"), out).expect("write builtins.rs");
}
