use std::fs::File;
use std::io::Read;
use std::path::Path;

use bio::io::fasta;

use crate::sequence::parse_strand;
use crate::types::{NamedStrand, OligoError};

/// Read an oligo panel from a FASTA file, one strand per record
pub fn read_oligo_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<NamedStrand>, OligoError> {
    let file = File::open(path)?;
    read_oligo_records(file)
}

/// Parse FASTA records from any reader into named strands.
///
/// Record sequences must use the `ATGCXU` alphabet and fit a single register.
pub fn read_oligo_records<R: Read>(reader: R) -> Result<Vec<NamedStrand>, OligoError> {
    let reader = fasta::Reader::new(reader);
    let mut strands = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| OligoError::Parse(e.to_string()))?;
        let strand = parse_strand(record.seq())?;
        strands.push(NamedStrand {
            name: record.id().to_string(),
            strand,
        });
    }

    Ok(strands)
}
