//! Append-only CSV ledger of provisioned committees.
//!
//! The ledger is small (tens to low hundreds of rows) and meant to be opened
//! and hand-edited by operators between runs, so every check re-reads the
//! whole file. Rows that do not parse are skipped rather than fatal, except
//! a quoted field spanning lines: it would swallow every row after it, so it
//! fails the read.
//!
//! Uniqueness holds independently on three columns: `cttee_id`,
//! `campaign_id` and `interest_id`. No file locking is done; a single writer
//! process is assumed.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{Collision, LedgerColumn, MappingRecord, LEDGER_HEADER};

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The preflight open-for-append failed (permissions, missing directory)
    #[error("mapping ledger {} cannot be opened for writing: {source}", path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read mapping ledger {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write mapping ledger {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A quoted field runs past the end of its line, usually an unbalanced quote
    #[error(
        "mapping ledger {} has an unterminated quoted field starting on line {line}",
        path.display()
    )]
    UnterminatedField { path: PathBuf, line: u64 },

    /// Appending would break one of the uniqueness constraints
    #[error("{column} '{value}' is already mapped to committee {existing_committee_id}")]
    Duplicate {
        column: LedgerColumn,
        value: String,
        existing_committee_id: i64,
    },

    #[error(
        "refusing to record committee {committee_id} without both a campaign and an interest id"
    )]
    IncompleteRecord { committee_id: i64 },
}

#[derive(Debug, Clone)]
pub struct MappingLedger {
    path: PathBuf,
}

impl MappingLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every well-formed record. A missing file is an empty ledger.
    pub fn load(&self) -> Result<Vec<MappingRecord>, LedgerError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.read_error(e.into())),
        };

        // The header row is not special-cased: its first field is not numeric.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Skipping undecodable ledger row"
                    );
                    continue;
                }
                Err(e) => return Err(self.read_error(e)),
            };

            if row.iter().any(|field| field.contains(['\n', '\r'])) {
                let line = row.position().map_or(0, |p| p.line());
                tracing::error!(path = %self.path.display(), line, "Unterminated quoted field");
                return Err(LedgerError::UnterminatedField {
                    path: self.path.clone(),
                    line,
                });
            }

            match parse_row(&row) {
                Some(record) => records.push(record),
                None => tracing::debug!(
                    path = %self.path.display(),
                    line = ?row.position().map(|p| p.line()),
                    "Skipping malformed ledger row"
                ),
            }
        }

        Ok(records)
    }

    /// First existing record that collides with any of the given values.
    ///
    /// `committee_id` is compared numerically, the ids as exact strings. An
    /// empty `campaign_id` or `interest_id` is not compared, which allows a
    /// committee-only check before anything exists remotely.
    pub fn find_duplicate(
        &self,
        committee_id: i64,
        campaign_id: &str,
        interest_id: &str,
    ) -> Result<Option<Collision>, LedgerError> {
        let collision = self.load()?.into_iter().find_map(|existing| {
            let (column, value) = if existing.committee_id == committee_id {
                (LedgerColumn::CommitteeId, committee_id.to_string())
            } else if !campaign_id.is_empty() && existing.campaign_id == campaign_id {
                (LedgerColumn::CampaignId, campaign_id.to_string())
            } else if !interest_id.is_empty() && existing.interest_id == interest_id {
                (LedgerColumn::InterestId, interest_id.to_string())
            } else {
                return None;
            };
            Some(Collision {
                column,
                value,
                existing,
            })
        });

        Ok(collision)
    }

    pub fn exists_duplicate(
        &self,
        committee_id: i64,
        campaign_id: &str,
        interest_id: &str,
    ) -> Result<bool, LedgerError> {
        Ok(self
            .find_duplicate(committee_id, campaign_id, interest_id)?
            .is_some())
    }

    pub fn find_by_committee(
        &self,
        committee_id: i64,
    ) -> Result<Option<MappingRecord>, LedgerError> {
        Ok(self
            .load()?
            .into_iter()
            .find(|record| record.committee_id == committee_id))
    }

    /// Open the ledger for append, creating it if absent, without writing.
    ///
    /// Fails with [`LedgerError::NotWritable`] on permission or missing
    /// directory problems.
    pub fn check_writable(&self) -> Result<(), LedgerError> {
        self.open_for_append().map(drop)
    }

    /// Append one record, creating the file with its header on first use.
    ///
    /// The write-access check runs before anything else so permission and
    /// path problems surface before the duplicate check. The duplicate check
    /// is repeated here immediately before the write.
    pub fn append(&self, record: &MappingRecord) -> Result<(), LedgerError> {
        if record.campaign_id.trim().is_empty() || record.interest_id.trim().is_empty() {
            return Err(LedgerError::IncompleteRecord {
                committee_id: record.committee_id,
            });
        }

        let file = self.open_for_append()?;

        if let Some(collision) = self.find_duplicate(
            record.committee_id,
            &record.campaign_id,
            &record.interest_id,
        )? {
            tracing::warn!(
                committee_id = record.committee_id,
                column = %collision.column,
                value = %collision.value,
                existing_committee_id = collision.existing.committee_id,
                "Duplicate mapping rejected"
            );
            return Err(LedgerError::Duplicate {
                column: collision.column,
                value: collision.value,
                existing_committee_id: collision.existing.committee_id,
            });
        }

        let len = file
            .metadata()
            .map_err(|e| self.write_error(e.into()))?
            .len();

        if len > 0 && self.ends_without_newline().map_err(|e| self.write_error(e.into()))? {
            (&file)
                .write_all(b"\n")
                .map_err(|e| self.write_error(e.into()))?;
        }

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&file);
            if len == 0 {
                writer
                    .write_record(LEDGER_HEADER)
                    .map_err(|e| self.write_error(e))?;
                tracing::info!(path = %self.path.display(), "Created mapping ledger");
            }
            writer
                .write_record(record.to_row())
                .map_err(|e| self.write_error(e))?;
            writer.flush().map_err(|e| self.write_error(e.into()))?;
        }
        file.sync_all().map_err(|e| self.write_error(e.into()))?;

        tracing::info!(
            path = %self.path.display(),
            committee_id = record.committee_id,
            campaign_id = %record.campaign_id,
            interest_id = %record.interest_id,
            "Mapping written"
        );

        Ok(())
    }

    fn open_for_append(&self) -> Result<File, LedgerError> {
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|source| LedgerError::NotWritable {
                path: self.path.clone(),
                source,
            })
    }

    fn ends_without_newline(&self) -> io::Result<bool> {
        let mut file = File::open(&self.path)?;
        if file.metadata()?.len() == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    fn read_error(&self, source: csv::Error) -> LedgerError {
        LedgerError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: csv::Error) -> LedgerError {
        LedgerError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

/// `None` for rows with fewer than four fields or a non-numeric committee id.
fn parse_row(row: &csv::StringRecord) -> Option<MappingRecord> {
    if row.len() < 4 {
        return None;
    }
    let committee_id = row.get(0)?.parse::<i64>().ok()?;
    Some(MappingRecord {
        committee_id,
        committee_name: row.get(1)?.to_string(),
        campaign_id: row.get(2)?.to_string(),
        interest_id: row.get(3)?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ledger_in(dir: &TempDir) -> MappingLedger {
        MappingLedger::new(dir.path().join("mapping.csv"))
    }

    #[test]
    fn test_missing_file_is_empty_ledger() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);

        assert!(ledger.load().unwrap().is_empty());
        assert!(!ledger.exists_duplicate(101, "C1", "I1").unwrap());
        assert!(!ledger.path().exists());
    }

    #[test]
    fn test_first_append_writes_header() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);

        ledger
            .append(&MappingRecord::new(101, "Health Committee", "C1", "I1"))
            .unwrap();

        let contents = fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(
            contents,
            "cttee_id,cttee_name,campaign_id,interest_id\n101,Health Committee,C1,I1\n"
        );
    }

    #[test]
    fn test_each_column_is_checked_independently() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger
            .append(&MappingRecord::new(101, "Health Committee", "C1", "I1"))
            .unwrap();

        let by_committee = ledger.find_duplicate(101, "C9", "I9").unwrap().unwrap();
        assert_eq!(by_committee.column, LedgerColumn::CommitteeId);

        let by_campaign = ledger.find_duplicate(202, "C1", "I9").unwrap().unwrap();
        assert_eq!(by_campaign.column, LedgerColumn::CampaignId);
        assert_eq!(by_campaign.existing.committee_id, 101);

        let by_interest = ledger.find_duplicate(202, "C9", "I1").unwrap().unwrap();
        assert_eq!(by_interest.column, LedgerColumn::InterestId);

        assert!(!ledger.exists_duplicate(202, "C2", "I2").unwrap());
    }

    #[test]
    fn test_committee_only_check_ignores_empty_ids() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(
            ledger.path(),
            "cttee_id,cttee_name,campaign_id,interest_id\n101,Health Committee,,\n",
        )
        .unwrap();

        assert!(!ledger.exists_duplicate(202, "", "").unwrap());
        assert!(ledger.exists_duplicate(101, "", "").unwrap());
    }

    #[test]
    fn test_append_rejects_duplicates_and_leaves_file_unchanged() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger
            .append(&MappingRecord::new(101, "Health Committee", "C1", "I1"))
            .unwrap();
        let before = fs::read_to_string(ledger.path()).unwrap();

        for duplicate in [
            MappingRecord::new(101, "Health Committee", "C2", "I2"),
            MappingRecord::new(202, "Finance Committee", "C1", "I2"),
            MappingRecord::new(202, "Finance Committee", "C2", "I1"),
        ] {
            let err = ledger.append(&duplicate).unwrap_err();
            assert!(matches!(err, LedgerError::Duplicate { existing_committee_id: 101, .. }));
        }

        assert_eq!(fs::read_to_string(ledger.path()).unwrap(), before);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(
            ledger.path(),
            "cttee_id,cttee_name,campaign_id,interest_id\n\
             7,Short Row\n\
             abc,Bad Id,C9,I9\n\
             101,Health Committee,C1,I1\n",
        )
        .unwrap();

        let records = ledger.load().unwrap();
        assert_eq!(records, vec![MappingRecord::new(101, "Health Committee", "C1", "I1")]);

        assert!(!ledger.exists_duplicate(7, "", "").unwrap());
        assert!(!ledger.exists_duplicate(999, "C9", "I9").unwrap());
        assert!(ledger.exists_duplicate(101, "", "").unwrap());
    }

    #[test]
    fn test_names_with_commas_and_quotes_survive() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        let record = MappingRecord::new(
            404,
            "Environment, Food and \"Rural\" Affairs Committee",
            "C4",
            "I4",
        );

        ledger.append(&record).unwrap();

        assert_eq!(ledger.find_by_committee(404).unwrap(), Some(record));
    }

    #[test]
    fn test_missing_trailing_newline_is_repaired() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(
            ledger.path(),
            "cttee_id,cttee_name,campaign_id,interest_id\n101,Health Committee,C1,I1",
        )
        .unwrap();

        ledger
            .append(&MappingRecord::new(202, "Finance Committee", "C2", "I2"))
            .unwrap();

        let records = ledger.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].committee_id, 202);
    }

    #[test]
    fn test_unwritable_path_fails_before_any_write() {
        let dir = TempDir::new().unwrap();
        let ledger = MappingLedger::new(dir.path().join("missing").join("mapping.csv"));

        let err = ledger
            .append(&MappingRecord::new(101, "Health Committee", "C1", "I1"))
            .unwrap_err();

        assert!(matches!(err, LedgerError::NotWritable { .. }));
        assert!(matches!(
            ledger.check_writable(),
            Err(LedgerError::NotWritable { .. })
        ));
    }

    #[test]
    fn test_check_writable_creates_empty_file() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);

        ledger.check_writable().unwrap();

        assert_eq!(fs::read_to_string(ledger.path()).unwrap(), "");
        ledger
            .append(&MappingRecord::new(101, "Health Committee", "C1", "I1"))
            .unwrap();
        assert!(fs::read_to_string(ledger.path())
            .unwrap()
            .starts_with("cttee_id,cttee_name,campaign_id,interest_id\n"));
    }

    #[test]
    fn test_unbalanced_quote_fails_instead_of_hiding_rows() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(
            ledger.path(),
            "cttee_id,cttee_name,campaign_id,interest_id\n\
             5,\"Bad name,C5,I5\n\
             101,Health Committee,C1,I1\n",
        )
        .unwrap();

        assert!(matches!(
            ledger.load(),
            Err(LedgerError::UnterminatedField { line: 2, .. })
        ));
        assert!(ledger.exists_duplicate(101, "", "").is_err());

        let err = ledger
            .append(&MappingRecord::new(101, "Health Committee", "C9", "I9"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnterminatedField { .. }));
        assert!(fs::read_to_string(ledger.path())
            .unwrap()
            .ends_with("101,Health Committee,C1,I1\n"));
    }

    #[test]
    fn test_incomplete_record_is_refused() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);

        let err = ledger
            .append(&MappingRecord::new(101, "Health Committee", "", "I1"))
            .unwrap_err();

        assert!(matches!(err, LedgerError::IncompleteRecord { committee_id: 101 }));
        assert!(!ledger.path().exists());
    }
}
