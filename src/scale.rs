//! Discrete window scale factor and its flat-file persistence

use std::path::Path;

use anyhow::{Context, Result, bail};

/// Supported scale factors, in cycling order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Scale {
    #[default]
    X1,
    X1_5,
    X2,
    X2_5,
}

impl Scale {
    pub const ALL: [Scale; 4] = [Scale::X1, Scale::X1_5, Scale::X2, Scale::X2_5];

    pub fn factor(self) -> f32 {
        match self {
            Scale::X1 => 1.0,
            Scale::X1_5 => 1.5,
            Scale::X2 => 2.0,
            Scale::X2_5 => 2.5,
        }
    }

    pub fn from_factor(factor: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.factor() == factor)
    }

    /// Next factor, wrapping after the largest
    pub fn next(self) -> Self {
        match self {
            Scale::X1 => Scale::X1_5,
            Scale::X1_5 => Scale::X2,
            Scale::X2 => Scale::X2_5,
            Scale::X2_5 => Scale::X1,
        }
    }
}

/// Read the persisted factor
pub fn load(path: &Path) -> Result<Scale> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scale factor from {}", path.display()))?;
    let factor: f32 = text
        .trim()
        .parse()
        .with_context(|| format!("parsing scale factor {:?}", text.trim()))?;
    match Scale::from_factor(factor) {
        Some(scale) => Ok(scale),
        None => bail!("unsupported scale factor {factor}"),
    }
}

/// Like `load`, but any failure means factor 1.0
pub fn load_or_default(path: &Path) -> Scale {
    match load(path) {
        Ok(scale) => scale,
        Err(err) => {
            if path.exists() {
                log::warn!("{err:#}; using factor 1.0");
            } else {
                log::debug!("no saved scale factor at {}", path.display());
            }
            Scale::default()
        }
    }
}

pub fn save(path: &Path, scale: Scale) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, format!("{:?}", scale.factor()))
        .with_context(|| format!("writing scale factor to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_steps_return_to_start() {
        for start in Scale::ALL {
            let mut s = start;
            for _ in 0..4 {
                s = s.next();
            }
            assert_eq!(s, start);
        }
        assert_eq!(Scale::X2_5.next(), Scale::X1);
    }

    #[test]
    fn factors_round_trip() {
        for s in Scale::ALL {
            assert_eq!(Scale::from_factor(s.factor()), Some(s));
        }
        assert_eq!(Scale::from_factor(3.0), None);
    }

    #[test]
    fn saves_and_loads_factor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("factor.txt");
        save(&path, Scale::X2_5).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2.5");
        assert_eq!(load(&path).unwrap(), Scale::X2_5);
        save(&path, Scale::X1).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1.0");
    }

    #[test]
    fn accepts_integer_and_padded_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("factor.txt");
        std::fs::write(&path, "2\n").unwrap();
        assert_eq!(load(&path).unwrap(), Scale::X2);
    }

    #[test]
    fn missing_or_bad_file_falls_back_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("factor.txt");
        assert_eq!(load_or_default(&path), Scale::X1);
        std::fs::write(&path, "huge").unwrap();
        assert!(load(&path).is_err());
        assert_eq!(load_or_default(&path), Scale::X1);
        std::fs::write(&path, "3.0").unwrap();
        assert_eq!(load_or_default(&path), Scale::X1);
    }
}
