//! FASTA reading and writing.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Error;

/// Line width used for sequence output unless configured otherwise.
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// One FASTA record as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaEntry {
    /// First whitespace-delimited token of the header.
    pub name: String,
    /// Remainder of the header after the name, trimmed.
    pub description: String,
    /// Concatenated, upper-cased sequence lines.
    pub sequence: String,
}

/// Read a FASTA file, decompressing it when the path ends in `.gz`.
pub fn read_fasta_path(path: &Path) -> Result<Vec<FastaEntry>, Error> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        parse_fasta_gz(file)
    } else {
        parse_fasta(BufReader::new(file))
    }
}

/// Reads gzip-compressed FASTA.
pub fn parse_fasta_gz<R: Read>(reader: R) -> Result<Vec<FastaEntry>, Error> {
    parse_fasta(BufReader::new(GzDecoder::new(reader)))
}

/// Reads FASTA from a buffered reader.
pub fn parse_fasta<R: BufRead>(reader: R) -> Result<Vec<FastaEntry>, Error> {
    let mut entries = Vec::new();
    let mut current: Option<FastaEntry> = None;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(header) = line.strip_prefix('>') {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            let header = header.trim();
            let (name, description) = match header.split_once(char::is_whitespace) {
                Some((name, rest)) => (name, rest.trim()),
                None => (header, ""),
            };
            if name.is_empty() {
                return Err(Error::Parse(format!(
                    "empty FASTA header (line {})",
                    line_num + 1
                )));
            }
            current = Some(FastaEntry {
                name: name.to_string(),
                description: description.to_string(),
                sequence: String::new(),
            });
        } else if let Some(entry) = current.as_mut() {
            let trimmed = line.trim();
            let start = entry.sequence.len();
            entry.sequence.push_str(trimmed);
            entry.sequence[start..].make_ascii_uppercase();
        } else if !line.trim().is_empty() {
            return Err(Error::Parse(format!(
                "sequence data before first FASTA header (line {})",
                line_num + 1
            )));
        }
    }

    if let Some(entry) = current {
        entries.push(entry);
    }
    Ok(entries)
}

/// Write one FASTA entry, wrapping the sequence at `line_width` characters.
///
/// The name must be non-empty and must not contain `>` or a line break, since
/// either would corrupt the entry boundaries for downstream search engines.
pub fn write_entry<W: Write>(
    writer: &mut W,
    name: &str,
    description: &str,
    sequence: &[u8],
    line_width: usize,
) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::Format("FASTA entry has an empty name".to_string()));
    }
    if name.contains(['>', '\n', '\r']) {
        return Err(Error::Format(format!(
            "invalid character in FASTA entry name: {name:?}"
        )));
    }
    if description.contains(['\n', '\r']) {
        return Err(Error::Format(format!(
            "line break in FASTA description for {name}"
        )));
    }
    if line_width == 0 {
        return Err(Error::Format("FASTA line width must be positive".to_string()));
    }

    if description.is_empty() {
        writeln!(writer, ">{name}")?;
    } else {
        writeln!(writer, ">{name} {description}")?;
    }
    for chunk in sequence.chunks(line_width) {
        writer.write_all(chunk)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Cursor;

    fn make_gz(content: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn parse_multiple_entries() {
        let fasta = b">ref-T1 gene_name=TP53 source=reference\nMEEP\nqsdp\n>plain\nMAK\n";
        let entries = parse_fasta(Cursor::new(fasta)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "ref-T1");
        assert_eq!(entries[0].description, "gene_name=TP53 source=reference");
        assert_eq!(entries[0].sequence, "MEEPQSDP");
        assert_eq!(entries[1].name, "plain");
        assert_eq!(entries[1].description, "");
        assert_eq!(entries[1].sequence, "MAK");
    }

    #[test]
    fn parse_gz() {
        let gz = make_gz(b">a\nMA\n>b\nKK\n");
        let entries = parse_fasta_gz(Cursor::new(gz)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].sequence, "KK");
    }

    #[test]
    fn parse_rejects_headerless_sequence() {
        assert!(parse_fasta(Cursor::new(b"MAK\n>a\nMA\n")).is_err());
        assert!(parse_fasta(Cursor::new(b">\nMA\n")).is_err());
    }

    #[test]
    fn write_wraps_lines() {
        let mut buf = Vec::new();
        write_entry(&mut buf, "p1", "length=10", b"ABCDEFGHIJ", 4).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), ">p1 length=10\nABCD\nEFGH\nIJ\n");
    }

    #[test]
    fn write_exact_multiple_of_width() {
        let mut buf = Vec::new();
        write_entry(&mut buf, "p1", "", b"ABCD", 2).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), ">p1\nAB\nCD\n");
    }

    #[test]
    fn write_rejects_bad_names() {
        let mut buf = Vec::new();
        assert!(write_entry(&mut buf, "a>b", "", b"MA", 80).is_err());
        assert!(write_entry(&mut buf, "a\nb", "", b"MA", 80).is_err());
        assert!(write_entry(&mut buf, "", "", b"MA", 80).is_err());
        assert!(write_entry(&mut buf, "a", "", b"MA", 0).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn write_then_read_back() {
        let mut buf = Vec::new();
        write_entry(&mut buf, "Decoy-1", "source=decoy", b"KLEFNIIS", 3).unwrap();
        let entries = parse_fasta(Cursor::new(buf)).unwrap();
        assert_eq!(entries[0].name, "Decoy-1");
        assert_eq!(entries[0].sequence, "KLEFNIIS");
    }

    #[test]
    fn read_gz_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra.fa.gz");
        std::fs::write(&path, make_gz(b">x\nSIINFEKL\n")).unwrap();
        let entries = read_fasta_path(&path).unwrap();
        assert_eq!(entries[0].sequence, "SIINFEKL");
    }
}
