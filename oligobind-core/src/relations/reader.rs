use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::relations::{CodeWidth, Relation, RelationHeader};
use crate::types::{OligoError, Strand, check_length};

/// Decodes flagged-triple records back into [`Relation`]s.
///
/// Every code is validated as a strand of the file's length, so a reader
/// never yields a strand with bits outside the alphabet.
///
/// # Examples
///
/// ```rust,no_run
/// use std::fs::File;
/// use oligobind_core::relations::RelationReader;
///
/// let reader = RelationReader::with_header(File::open("binding.bin")?)?;
/// for relation in reader {
///     let relation = relation?;
///     if relation.bound {
///         println!("{} binds {}", relation.strand1, relation.strand2);
///     }
/// }
/// # Ok::<(), oligobind_core::types::OligoError>(())
/// ```
#[derive(Debug)]
pub struct RelationReader<R: Read> {
    inner: R,
    header: Option<RelationHeader>,
    strand_length: usize,
    code_width: CodeWidth,
    record: Vec<u8>,
    finished: bool,
}

impl<R: Read> RelationReader<R> {
    /// Reader for a file that starts with a header.
    ///
    /// # Errors
    ///
    /// [`OligoError::InvalidRelationFile`] if the header is missing or malformed.
    pub fn with_header(mut inner: R) -> Result<Self, OligoError> {
        let header = RelationHeader::read_from(&mut inner)?;
        Ok(Self::build(inner, Some(header), header.strand_length, header.code_width))
    }

    /// Reader for a headerless file of `strand_length`-base records.
    ///
    /// # Errors
    ///
    /// Same length limits as strand encoding.
    pub fn raw(inner: R, strand_length: usize) -> Result<Self, OligoError> {
        check_length(strand_length)?;
        Ok(Self::build(
            inner,
            None,
            strand_length,
            CodeWidth::for_length(strand_length),
        ))
    }

    fn build(
        inner: R,
        header: Option<RelationHeader>,
        strand_length: usize,
        code_width: CodeWidth,
    ) -> Self {
        Self {
            inner,
            header,
            strand_length,
            code_width,
            record: vec![0; code_width.record_len()],
            finished: false,
        }
    }

    /// Header, if the file carried one
    #[must_use]
    pub const fn header(&self) -> Option<&RelationHeader> {
        self.header.as_ref()
    }

    #[must_use]
    pub const fn strand_length(&self) -> usize {
        self.strand_length
    }

    fn read_relation(&mut self) -> Result<Option<Relation>, OligoError> {
        let expected = self.record.len();
        let mut filled = 0;
        while filled < expected {
            match self.inner.read(&mut self.record[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled == 0 {
            return Ok(None);
        }
        if filled < expected {
            return Err(OligoError::InvalidRelationFile(format!(
                "truncated record: {filled} of {expected} bytes"
            )));
        }

        let width = self.code_width.bytes();
        let strand1 = Strand::from_code(self.code_width.get(&self.record), self.strand_length)?;
        let strand2 = Strand::from_code(
            self.code_width.get(&self.record[width..]),
            self.strand_length,
        )?;
        let bound = match self.record[2 * width] {
            0 => false,
            1 => true,
            flag => {
                return Err(OligoError::InvalidRelationFile(format!(
                    "invalid flag byte {flag}"
                )));
            }
        };

        Ok(Some(Relation {
            strand1,
            strand2,
            bound,
        }))
    }
}

impl<R: Read> Iterator for RelationReader<R> {
    type Item = Result<Relation, OligoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_relation() {
            Ok(Some(relation)) => Some(Ok(relation)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Read every relation from a header-prefixed file
pub fn read_relation_file<P: AsRef<Path>>(path: P) -> Result<Vec<Relation>, OligoError> {
    let file = File::open(path)?;
    RelationReader::with_header(BufReader::new(file))?.collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::relations::RelationWriter;

    fn relation(first: &str, second: &str, bound: bool) -> Relation {
        Relation {
            strand1: first.parse().unwrap(),
            strand2: second.parse().unwrap(),
            bound,
        }
    }

    fn encode_relations(length: usize, relations: &[Relation], header: bool) -> Vec<u8> {
        let mut writer =
            RelationWriter::new(Vec::new(), RelationHeader::new(length).unwrap(), header).unwrap();
        for relation in relations {
            writer.write_relation(relation).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_reader_with_header() {
        let relations = [
            relation("AGCTTC", "TCGTAG", true),
            relation("AAAAAA", "CCCCCC", false),
        ];
        let bytes = encode_relations(6, &relations, true);
        assert_eq!(bytes.len(), 8 + 2 * 9);

        let reader = RelationReader::with_header(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.strand_length(), 6);
        assert_eq!(
            reader.header().unwrap().code_width,
            crate::relations::CodeWidth::Narrow
        );
        let decoded: Vec<Relation> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(decoded, relations);
    }

    #[test]
    fn test_reader_raw_wide_codes() {
        let relations = [relation("ACGTACGTACGTA", "TTTTTTTTTTTTT", true)];
        let bytes = encode_relations(13, &relations, false);
        assert_eq!(bytes.len(), 17);

        let reader = RelationReader::raw(Cursor::new(bytes), 13).unwrap();
        assert!(reader.header().is_none());
        let decoded: Vec<Relation> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(decoded, relations);
    }

    #[test]
    fn test_reader_truncated_record() {
        let mut bytes = encode_relations(4, &[relation("ATGC", "GCAT", true)], true);
        bytes.pop();

        let mut reader = RelationReader::with_header(Cursor::new(bytes)).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(OligoError::InvalidRelationFile(_)))
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_reader_rejects_bad_flag() {
        let mut bytes = encode_relations(4, &[relation("ATGC", "GCAT", true)], false);
        let last = bytes.len() - 1;
        bytes[last] = 7;

        let mut reader = RelationReader::raw(Cursor::new(bytes), 4).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(OligoError::InvalidRelationFile(_)))
        ));
    }

    #[test]
    fn test_reader_rejects_code_outside_alphabet() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0b010_u32.to_ne_bytes());
        bytes.extend_from_slice(&0b001_u32.to_ne_bytes());
        bytes.push(0);

        let mut reader = RelationReader::raw(Cursor::new(bytes), 1).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(OligoError::InvalidCode { code: 0b010, .. }))
        ));
    }

    #[test]
    fn test_reader_short_header() {
        let result = RelationReader::with_header(Cursor::new(b"OLG".to_vec()));
        assert!(matches!(result, Err(OligoError::InvalidRelationFile(_))));
    }
}
