//! Reading the input sequences and deriving their display names.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::AlignerError;

/// Opens `path` for buffered reading, decompressing `.gz` files.
pub fn reader(path: &Path) -> Result<Box<dyn BufRead>, AlignerError> {
    let file = File::open(path).map_err(|source| AlignerError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let reader: Box<dyn BufRead> = if path.extension() == Some(std::ffi::OsStr::new("gz")) {
        Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(reader)
}

/// Reads the first record of a FASTA file.
///
/// Returns the first whitespace-delimited token of the `>` header, if any,
/// and the residues with all whitespace removed. Reading stops at the next
/// header. A file that does not start with a header is read as bare residues.
pub fn read_sequence(path: &Path) -> Result<(Option<String>, Vec<u8>), AlignerError> {
    let input = reader(path)?;
    let unavailable = |source: std::io::Error| AlignerError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let mut name = None;
    let mut residues = Vec::new();

    for (idx, line) in input.split(b'\n').enumerate() {
        let line = line.map_err(unavailable)?;
        if line.first() == Some(&b'>') {
            if idx > 0 {
                break;
            }
            let token: Vec<u8> = line[1..]
                .iter()
                .take_while(|c| !c.is_ascii_whitespace())
                .copied()
                .collect();
            if !token.is_empty() {
                name = Some(String::from_utf8_lossy(&token).into_owned());
            }
            continue;
        }
        residues.extend(line.iter().filter(|c| !c.is_ascii_whitespace()));
    }

    debug!(
        "Read {} residues from {} (header name: {:?})",
        residues.len(),
        path.display(),
        name
    );

    Ok((name, residues))
}

/// File name without directories or the final extension.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Drops a `PREFIX_` naming convention: everything up to and including the
/// first underscore, unless the name starts with one.
pub fn strip_prefix(name: &str) -> &str {
    match name.find('_') {
        Some(pos) if pos > 0 => &name[pos + 1..],
        _ => name,
    }
}

/// Name shown in the report: the header name, else the file's base name,
/// with any `PREFIX_` removed.
pub fn display_name(header_name: Option<&str>, path: &Path) -> String {
    let name = match header_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => base_name(path),
    };
    strip_prefix(&name).to_string()
}
