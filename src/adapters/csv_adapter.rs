//! CSV position table adapter.
//!
//! One file per position, `<data_dir>/<rarity>_<pos>.csv`, with header
//! `player,team,role,1st,2nd,...`. Every row has the same width; missing
//! prices are empty fields. Files are written to a `.tmp` sibling and renamed
//! into place so a reader never sees a half-written table.

use crate::domain::error::BoardError;
use crate::domain::money::UsdCents;
use crate::domain::position::Position;
use crate::domain::roster::Role;
use crate::domain::table::{IDENTITY_COLUMNS, PlayerRow, PositionTable};
use crate::ports::table_port::TablePort;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvTableAdapter {
    base_path: PathBuf,
    rarity: String,
}

impl CsvTableAdapter {
    pub fn new(base_path: PathBuf, rarity: &str) -> Self {
        Self {
            base_path,
            rarity: rarity.to_string(),
        }
    }

    pub fn csv_path(&self, position: Position) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", self.rarity, position.key()))
    }
}

fn table_error(path: &Path, reason: impl Into<String>) -> BoardError {
    BoardError::Table {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

impl TablePort for CsvTableAdapter {
    fn write_table(&self, table: &PositionTable) -> Result<PathBuf, BoardError> {
        fs::create_dir_all(&self.base_path).map_err(|e| {
            table_error(&self.base_path, format!("failed to create directory: {}", e))
        })?;

        let path = self.csv_path(table.position);
        let tmp = path.with_extension("csv.tmp");
        let width = table.rank_count();

        let mut writer = csv::Writer::from_path(&tmp)
            .map_err(|e| table_error(&tmp, format!("failed to create: {}", e)))?;
        writer
            .write_record(table.header())
            .map_err(|e| table_error(&tmp, format!("failed to write header: {}", e)))?;

        for row in &table.rows {
            let mut record = vec![row.player.clone(), row.team.clone(), row.role.to_string()];
            record.extend(row.prices.iter().map(|p| p.to_string()));
            record.resize(IDENTITY_COLUMNS.len() + width, String::new());
            writer
                .write_record(&record)
                .map_err(|e| table_error(&tmp, format!("failed to write row: {}", e)))?;
        }
        writer
            .flush()
            .map_err(|e| table_error(&tmp, format!("failed to flush: {}", e)))?;
        drop(writer);

        fs::rename(&tmp, &path)
            .map_err(|e| table_error(&path, format!("failed to replace: {}", e)))?;
        Ok(path)
    }

    fn read_table(&self, position: Position) -> Result<PositionTable, BoardError> {
        let path = self.csv_path(position);
        if !path.is_file() {
            return Err(BoardError::MissingArtifact {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| table_error(&path, format!("failed to read: {}", e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| table_error(&path, format!("CSV parse error: {}", e)))?
            .clone();
        let leading: Vec<&str> = headers.iter().take(IDENTITY_COLUMNS.len()).collect();
        if leading != IDENTITY_COLUMNS {
            return Err(table_error(
                &path,
                format!("expected header to start with {}", IDENTITY_COLUMNS.join(",")),
            ));
        }

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record =
                result.map_err(|e| table_error(&path, format!("CSV parse error: {}", e)))?;

            let player = record
                .get(0)
                .ok_or_else(|| table_error(&path, "missing player column"))?
                .to_string();
            let team = record
                .get(1)
                .ok_or_else(|| table_error(&path, "missing team column"))?
                .to_string();
            let role: Role = record
                .get(2)
                .ok_or_else(|| table_error(&path, "missing role column"))?
                .parse()
                .map_err(|e: String| table_error(&path, e))?;

            let mut prices = Vec::new();
            let mut ended = false;
            for cell in record.iter().skip(IDENTITY_COLUMNS.len()) {
                if cell.trim().is_empty() {
                    ended = true;
                    continue;
                }
                if ended {
                    return Err(table_error(
                        &path,
                        format!("gap in price columns for {}", player),
                    ));
                }
                let price: UsdCents = cell
                    .parse()
                    .map_err(|e| table_error(&path, format!("{} for {}", e, player)))?;
                prices.push(price);
            }

            rows.push(PlayerRow {
                player,
                team,
                role,
                prices,
            });
        }

        Ok(PositionTable::new(position, rows))
    }
}
