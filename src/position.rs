//! Per-host window position, stored as `hostname,+x+y` rows in a CSV file

use std::fs::File;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use csv::StringRecord;

const BOM: char = '\u{feff}';

/// Window outer position in logical points
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl WindowPosition {
    pub fn from_pos(pos: egui::Pos2) -> Self {
        Self {
            x: pos.x.round() as i32,
            y: pos.y.round() as i32,
        }
    }

    pub fn to_pos(self) -> egui::Pos2 {
        egui::pos2(self.x as f32, self.y as f32)
    }

    /// Parse "+x+y" offset notation; a leading "WxH" size part is ignored
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let offset = &s[s.find('+')?..];
        let mut parts = offset.split('+').filter(|p| !p.is_empty());
        let x = parts.next()?.trim().parse().ok()?;
        let y = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { x, y })
    }

    pub fn to_offset_string(self) -> String {
        format!("+{}+{}", self.x, self.y)
    }
}

/// Hostname used as the row key
pub fn local_hostname() -> String {
    gethostname::gethostname().to_string_lossy().into_owned()
}

/// Position file shared by several hosts
pub struct PositionStore {
    path: PathBuf,
    host: String,
}

impl PositionStore {
    pub fn new(path: PathBuf, host: String) -> Self {
        Self { path, host }
    }

    /// Missing file is `Ok(None)`
    fn read_rows(&self) -> Result<Option<Vec<StringRecord>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("opening {}", self.path.display()));
            }
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("reading {}", self.path.display()))?;
        Ok(Some(rows))
    }

    fn is_local(&self, row: &StringRecord) -> bool {
        row.get(0)
            .is_some_and(|host| host.trim_start_matches(BOM) == self.host)
    }

    /// Saved position for this host, if any
    pub fn load(&self) -> Result<Option<WindowPosition>> {
        let Some(rows) = self.read_rows()? else {
            log::info!("no window position file at {}", self.path.display());
            return Ok(None);
        };
        let Some(row) = rows.iter().find(|row| self.is_local(row)) else {
            return Ok(None);
        };
        let raw = row.get(1).unwrap_or_default();
        let pos = WindowPosition::parse(raw);
        if pos.is_none() {
            log::warn!("ignoring malformed window position {raw:?} for {}", self.host);
        }
        Ok(pos)
    }

    /// Replace this host's row, keeping every other row in order
    pub fn save(&self, pos: WindowPosition) -> Result<()> {
        let mut rows: Vec<StringRecord> = self
            .read_rows()?
            .unwrap_or_default()
            .into_iter()
            .filter(|row| !self.is_local(row))
            .collect();
        rows.push(StringRecord::from(vec![
            self.host.clone(),
            pos.to_offset_string(),
        ]));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        for row in &rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        log::info!("saved window position {} for {}", pos.to_offset_string(), self.host);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir, host: &str) -> PositionStore {
        PositionStore::new(dir.path().join("window_position.csv"), host.to_owned())
    }

    #[test]
    fn parses_offset_notation() {
        assert_eq!(WindowPosition::parse("+10+20"), Some(WindowPosition { x: 10, y: 20 }));
        assert_eq!(WindowPosition::parse(" +-5+-7 "), Some(WindowPosition { x: -5, y: -7 }));
        assert_eq!(WindowPosition::parse("400x420+3+4"), Some(WindowPosition { x: 3, y: 4 }));
        assert_eq!(WindowPosition::parse("10+20"), None);
        assert_eq!(WindowPosition::parse("+1+2+3"), None);
        assert_eq!(WindowPosition::parse("+a+b"), None);
        assert_eq!(WindowPosition::parse(""), None);
    }

    #[test]
    fn offset_string_round_trips() {
        let p = WindowPosition { x: -12, y: 340 };
        assert_eq!(p.to_offset_string(), "+-12+340");
        assert_eq!(WindowPosition::parse(&p.to_offset_string()), Some(p));
    }

    #[test]
    fn missing_file_means_no_position() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store(&dir, "alpha").load().unwrap(), None);
    }

    #[test]
    fn write_then_read_for_same_host() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir, "alpha");
        s.save(WindowPosition { x: 100, y: 50 }).unwrap();
        assert_eq!(s.load().unwrap(), Some(WindowPosition { x: 100, y: 50 }));
        s.save(WindowPosition { x: 7, y: 8 }).unwrap();
        assert_eq!(s.load().unwrap(), Some(WindowPosition { x: 7, y: 8 }));
        let text = std::fs::read_to_string(dir.path().join("window_position.csv")).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn other_hosts_rows_survive_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let a = store(&dir, "alpha");
        let b = store(&dir, "beta");
        b.save(WindowPosition { x: 1, y: 2 }).unwrap();
        a.save(WindowPosition { x: 300, y: 400 }).unwrap();
        a.save(WindowPosition { x: 301, y: 401 }).unwrap();
        assert_eq!(b.load().unwrap(), Some(WindowPosition { x: 1, y: 2 }));
        assert_eq!(a.load().unwrap(), Some(WindowPosition { x: 301, y: 401 }));
        let text = std::fs::read_to_string(dir.path().join("window_position.csv")).unwrap();
        assert_eq!(text, "beta,+1+2\nalpha,+301+401\n");
    }

    #[test]
    fn reads_files_with_bom_and_foreign_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("window_position.csv");
        std::fs::write(&path, "\u{feff}alpha,+10+20\ngamma,+5+5,extra\n").unwrap();
        let a = store(&dir, "alpha");
        assert_eq!(a.load().unwrap(), Some(WindowPosition { x: 10, y: 20 }));
        a.save(WindowPosition { x: 11, y: 21 }).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "gamma,+5+5,extra\nalpha,+11+21\n");
    }

    #[test]
    fn malformed_row_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("window_position.csv"), "alpha,nowhere\n").unwrap();
        assert_eq!(store(&dir, "alpha").load().unwrap(), None);
    }
}
