use super::{MotifError, Result};
use crate::motif::{Corpus, Sequence};
use bio::io::fasta;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read as ioRead};
use std::path::Path;

fn open_sequence_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    fn is_gzipped(path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.ends_with(".gz") || path_str.ends_with(".gzip")
    }
    let file = File::open(path)
        .map_err(|e| MotifError::invalid(format!("{}: {}", path.display(), e)))?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(MotifError::invalid(format!(
                "Invalid gzip header: {}",
                path.to_string_lossy()
            )))
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

/// Loads a corpus from a FASTA (including JASPAR `.sites`) or tab-delimited file.
///
/// The format is chosen by the first non-blank line: a `>` header means FASTA, anything else is
/// read as `id<TAB>sequence` (or a bare sequence per line).
pub fn read_corpus(path: &Path) -> Result<Corpus> {
    let mut text = String::new();
    open_sequence_reader(path)?
        .read_to_string(&mut text)
        .map_err(|e| MotifError::invalid(format!("{}: {}", path.display(), e)))?;
    let text = text.trim_start();

    let sequences = if text.starts_with('>') {
        parse_fasta(text)?
    } else {
        parse_tabular(text)?
    };
    log::info!(
        "Loaded {} sequences from {}",
        sequences.len(),
        path.display()
    );
    Corpus::new(sequences)
}

fn parse_fasta(text: &str) -> Result<Vec<Sequence>> {
    let mut sequences = Vec::new();
    for (index, result) in fasta::Reader::new(text.as_bytes()).records().enumerate() {
        let record = result
            .map_err(|e| MotifError::invalid(format!("FASTA record {}: {}", index + 1, e)))?;
        let bases = std::str::from_utf8(record.seq()).map_err(|_| {
            MotifError::invalid(format!("FASTA record {} is not valid text", record.id()))
        })?;
        sequences.push(Sequence::new(record.id(), bases)?);
    }
    Ok(sequences)
}

fn parse_tabular(text: &str) -> Result<Vec<Sequence>> {
    let mut sequences = Vec::new();
    for (line_number, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let (id, bases) = match line.split_once('\t') {
            Some((id, rest)) => {
                let bases = rest.split('\t').next().unwrap_or_default();
                (id.trim().to_string(), bases.trim())
            }
            None => (format!("seq_{}", sequences.len() + 1), line.trim()),
        };
        if bases.is_empty() {
            return Err(MotifError::invalid(format!(
                "Missing sequence at line {}",
                line_number + 1
            )));
        }
        sequences.push(Sequence::new(id, bases)?);
    }
    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_multiline_fasta_and_normalizes_case() {
        let file = write_temp("\n>s1 first\nacgtAC\nGT\n\n>s2\nTTTTGGGG\n", ".fa");
        let corpus = read_corpus(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0).id(), "s1");
        assert_eq!(corpus.get(0).to_string(), "ACGTACGT");
        assert_eq!(corpus.get(1).to_string(), "TTTTGGGG");
    }

    #[test]
    fn reads_tab_delimited_sites() {
        let file = write_temp(
            "# comment\nsiteA\tACGTACGT\nsiteB\tGGGGCCCC\nTTTTAAAA\n",
            ".tsv",
        );
        let corpus = read_corpus(file.path()).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.get(1).id(), "siteB");
        assert_eq!(corpus.get(2).id(), "seq_3");
    }

    #[test]
    fn reads_gzipped_fasta() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">s1\nACGTACGT\n").unwrap();
        let mut file = tempfile::Builder::new().suffix(".fa.gz").tempfile().unwrap();
        file.write_all(&encoder.finish().unwrap()).unwrap();
        let corpus = read_corpus(file.path()).unwrap();
        assert_eq!(corpus.get(0).to_string(), "ACGTACGT");
    }

    #[test]
    fn rejects_ambiguity_codes() {
        let file = write_temp(">s1\nACGNACGT\n", ".fa");
        let err = read_corpus(file.path()).unwrap_err();
        assert!(matches!(err, MotifError::InvalidInput(_)));
        assert!(err.to_string().contains("'N'"));
    }

    #[test]
    fn rejects_tab_line_without_sequence() {
        let file = write_temp("siteA\tACGT\nsiteB\t\n", ".tsv");
        assert_eq!(
            read_corpus(file.path()).unwrap_err().to_string(),
            "Invalid input: Missing sequence at line 2"
        );
    }

    #[test]
    fn rejects_empty_file() {
        let file = write_temp("\n\n", ".fa");
        assert!(matches!(
            read_corpus(file.path()),
            Err(MotifError::InvalidInput(_))
        ));
    }

    #[test]
    fn missing_file_is_invalid_input() {
        let err = read_corpus(Path::new("/nonexistent/input.fa")).unwrap_err();
        assert!(matches!(err, MotifError::InvalidInput(_)));
    }
}
