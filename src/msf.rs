//! GCG checksums and two-sequence MSF ("PileUp") output.

use std::io::Write;

use crate::traceback::{AlignmentResult, GAP};

/// Gap symbol in MSF output.
pub const MSF_GAP: u8 = b'.';
pub const COLUMNS_PER_LINE: usize = 50;
pub const COLUMNS_PER_CHUNK: usize = 10;
pub const NAME_WIDTH: usize = 12;

const CHECKSUM_CYCLE: usize = 57;
const CHECKSUM_MODULUS: u64 = 10_000;
const NUCLEIC_RESIDUES: &[u8] = b"ACGTUN";

/// GCG checksum: position weights cycle 1..=57 over every column, gaps
/// included.
pub fn checksum(seq: &[u8]) -> u32 {
    let sum = seq.iter().enumerate().fold(0u64, |acc, (i, &c)| {
        let weight = (i % CHECKSUM_CYCLE) as u64 + 1;
        acc + weight * u64::from(c.to_ascii_uppercase())
    });
    (sum % CHECKSUM_MODULUS) as u32
}

pub fn pairwise_checksum(check1: u32, check2: u32) -> u32 {
    ((u64::from(check1) + u64::from(check2)) % CHECKSUM_MODULUS) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceType {
    Nucleic,
    Protein,
}

impl SequenceType {
    /// Classifies the residues of both aligned sequences, gaps ignored.
    pub fn classify(seq1: &[u8], seq2: &[u8]) -> Self {
        let nucleic = seq1
            .iter()
            .chain(seq2)
            .filter(|&&c| c != GAP && c != MSF_GAP)
            .all(|c| NUCLEIC_RESIDUES.contains(&c.to_ascii_uppercase()));
        if nucleic {
            SequenceType::Nucleic
        } else {
            SequenceType::Protein
        }
    }

    pub fn letter(&self) -> char {
        match self {
            SequenceType::Nucleic => 'N',
            SequenceType::Protein => 'P',
        }
    }
}

/// Replaces alignment gap bytes with the MSF gap symbol.
pub fn to_msf_gaps(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .map(|&c| if c == GAP { MSF_GAP } else { c })
        .collect()
}

/// One block line: the padded name, then residues in chunks of ten separated
/// by a single space. Residue bytes are written unchanged.
fn write_block_line<W: Write>(
    writer: &mut W,
    name: &str,
    residues: &[u8],
) -> std::io::Result<()> {
    write!(writer, "{:<width$}", name, width = NAME_WIDTH)?;
    for (idx, chunk) in residues.chunks(COLUMNS_PER_CHUNK).enumerate() {
        if idx > 0 {
            writer.write_all(b" ")?;
        }
        writer.write_all(chunk)?;
    }
    writer.write_all(b"\n")
}

/// Writes the MSF section (from `PileUp` to the last block).
pub fn write_msf<W: Write>(
    writer: &mut W,
    name1: &str,
    name2: &str,
    result: &AlignmentResult,
) -> std::io::Result<()> {
    let align1 = to_msf_gaps(&result.aligned_seq1);
    let align2 = to_msf_gaps(&result.aligned_seq2);
    let len = align1.len();

    let check1 = checksum(&align1);
    let check2 = checksum(&align2);
    let check = pairwise_checksum(check1, check2);
    let seq_type = SequenceType::classify(&align1, &align2);

    writer.write_all(b"PileUp\n\n")?;
    writeln!(
        writer,
        "   MSF:   {}  Type: {}    Check:  {:4}   ..\n",
        len,
        seq_type.letter(),
        check
    )?;
    for (name, check) in [(name1, check1), (name2, check2)] {
        writeln!(
            writer,
            " Name: {} oo  Len:   {}  Check:  {:4}  Weight:  10.0",
            name, len, check
        )?;
    }
    writer.write_all(b"\n//\n\n")?;

    for (block1, block2) in align1
        .chunks(COLUMNS_PER_LINE)
        .zip(align2.chunks(COLUMNS_PER_LINE))
    {
        write_block_line(writer, name1, block1)?;
        write_block_line(writer, name2, block2)?;
        writer.write_all(b"\n")?;
    }

    Ok(())
}

/// Writes the score line followed by the MSF section.
pub fn write_report<W: Write>(
    writer: &mut W,
    name1: &str,
    name2: &str,
    result: &AlignmentResult,
) -> std::io::Result<()> {
    write!(writer, "Alignment score: {}\n\n", result.score)?;
    write_msf(writer, name1, name2, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Position;
    use crate::traceback::TracebackOperation;

    fn result_from(seq1: &[u8], seq2: &[u8], score: i32) -> AlignmentResult {
        let operations = seq1
            .iter()
            .zip(seq2)
            .map(|(&a, &b)| {
                if a == GAP {
                    TracebackOperation::Insertion
                } else if b == GAP {
                    TracebackOperation::Deletion
                } else if a == b {
                    TracebackOperation::Match
                } else {
                    TracebackOperation::Mismatch
                }
            })
            .collect();
        AlignmentResult {
            score,
            aligned_seq1: seq1.to_vec(),
            aligned_seq2: seq2.to_vec(),
            operations,
            start_position: Position::default(),
            end_position: Position::new(seq1.len(), seq2.len()),
        }
    }

    fn render(result: &AlignmentResult) -> String {
        let mut out = Vec::new();
        write_report(&mut out, "seq1", "seq2", result).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn checksum_weights_every_position() {
        assert_eq!(checksum(b""), 0);
        assert_eq!(checksum(b"A"), 65);
        // 1*65 + 2*67
        assert_eq!(checksum(b"AC"), 199);
        assert_eq!(checksum(b"ac"), 199);
        assert_eq!(checksum(b"A.CACACTA"), 3069);
        assert_eq!(checksum(b"AGCACAC.A"), 2815);
    }

    #[test]
    fn checksum_weight_cycles_after_57() {
        let seq = vec![b'A'; 58];
        // weights 1..=57 then 1 again
        let expected = ((57 * 58 / 2 + 1) * 65) % 10_000;
        assert_eq!(checksum(&seq), expected as u32);
    }

    #[test]
    fn checksum_counts_gap_symbol() {
        assert_ne!(checksum(b"A.C"), checksum(b"AC"));
        assert_eq!(checksum(b"A.C"), 65 + 2 * 46 + 3 * 67);
    }

    #[test]
    fn pairwise_checksum_wraps() {
        assert_eq!(pairwise_checksum(3069, 2815), 5884);
        assert_eq!(pairwise_checksum(9999, 2), 1);
    }

    #[test]
    fn classifies_sequence_type() {
        assert_eq!(SequenceType::classify(b"ACGT", b"AC-T"), SequenceType::Nucleic);
        assert_eq!(SequenceType::classify(b"acgu", b"N.CG"), SequenceType::Nucleic);
        assert_eq!(SequenceType::classify(b"ACGT", b"ACEK"), SequenceType::Protein);
        assert_eq!(SequenceType::classify(b"MKL", b"MKL"), SequenceType::Protein);
        assert_eq!(SequenceType::classify(b"", b""), SequenceType::Nucleic);
        assert_eq!(SequenceType::Protein.letter(), 'P');
    }

    #[test]
    fn textbook_report() {
        let result = result_from(b"A-CACACTA", b"AGCACAC-A", 12);
        let expected = "\
Alignment score: 12

PileUp

   MSF:   9  Type: N    Check:  5884   ..

 Name: seq1 oo  Len:   9  Check:  3069  Weight:  10.0
 Name: seq2 oo  Len:   9  Check:  2815  Weight:  10.0

//

seq1        A.CACACTA
seq2        AGCACAC.A

";
        assert_eq!(render(&result), expected);
    }

    #[test]
    fn empty_alignment_has_header_only() {
        let report = render(&AlignmentResult::empty());
        assert!(report.starts_with("Alignment score: 0\n\nPileUp\n\n"));
        assert!(report.contains("   MSF:   0  Type: N    Check:     0   ..\n"));
        assert!(report.ends_with("//\n\n"));
    }

    #[test]
    fn blocks_of_fifty_in_chunks_of_ten() {
        let seq: Vec<u8> = b"ACGTACGTAC".iter().cycle().take(63).copied().collect();
        let result = result_from(&seq, &seq, 126);
        let report = render(&result);
        let lines: Vec<&str> = report.lines().skip_while(|l| *l != "//").skip(2).collect();

        let full = "ACGTACGTAC ACGTACGTAC ACGTACGTAC ACGTACGTAC ACGTACGTAC";
        assert_eq!(lines[0], format!("seq1        {}", full));
        assert_eq!(lines[1], format!("seq2        {}", full));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "seq1        ACGTACGTAC ACG");
        assert_eq!(lines[4], "seq2        ACGTACGTAC ACG");
        assert_eq!(lines[5], "");
        assert_eq!(lines.len(), 6);
        assert!(!lines[0].ends_with(' '));
    }

    #[test]
    fn residue_bytes_are_written_verbatim() {
        // a two-byte UTF-8 sequence split by the chunk boundary after column 10
        let mut seq = b"ACGTACGTA".to_vec();
        seq.extend_from_slice("é".as_bytes());
        seq.extend_from_slice(b"CG");
        let result = result_from(&seq, &seq, 0);
        let mut out = Vec::new();
        write_msf(&mut out, "s1", "s2", &result).unwrap();

        let mut expected = b"s1          ACGTACGTA\xC3 \xA9CG\n".to_vec();
        expected.extend_from_slice(b"s2          ACGTACGTA\xC3 \xA9CG\n\n");
        assert!(out.ends_with(&expected));
    }

    #[test]
    fn long_names_are_not_truncated() {
        let result = result_from(b"AC", b"AC", 4);
        let mut out = Vec::new();
        write_msf(&mut out, "a_very_long_name", "s2", &result).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("\na_very_long_nameAC\n"));
        assert!(report.contains("\ns2          AC\n"));
    }
}
