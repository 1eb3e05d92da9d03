use core::fmt;
use serde::{Deserialize, Serialize};

/// File kinds the cartridge knows how to launch or store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TeensyFileType {
    Sid,
    Crt,
    Prg,
    P00,
    Hex,
    Kla,
    Koa,
    Art,
    Aas,
    Hpi,
    Seq,
    Txt,
    D64,
    Zip,
    Unknown,
}

impl TeensyFileType {
    /// Classify an extension, with or without the leading dot
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        let known = [
            ("sid", TeensyFileType::Sid),
            ("crt", TeensyFileType::Crt),
            ("prg", TeensyFileType::Prg),
            ("p00", TeensyFileType::P00),
            ("hex", TeensyFileType::Hex),
            ("kla", TeensyFileType::Kla),
            ("koa", TeensyFileType::Koa),
            ("art", TeensyFileType::Art),
            ("aas", TeensyFileType::Aas),
            ("hpi", TeensyFileType::Hpi),
            ("seq", TeensyFileType::Seq),
            ("txt", TeensyFileType::Txt),
            ("d64", TeensyFileType::D64),
            ("zip", TeensyFileType::Zip),
        ];
        known
            .into_iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, file_type)| file_type)
            .unwrap_or(TeensyFileType::Unknown)
    }

    /// Classify a path by its extension
    pub fn from_path(path: &str) -> Self {
        crate::path::extension(path)
            .map(Self::from_extension)
            .unwrap_or(TeensyFileType::Unknown)
    }

    /// Whether the cartridge can launch this kind of file directly
    pub fn is_launchable(self) -> bool {
        !matches!(self, TeensyFileType::Hex | TeensyFileType::Unknown)
    }
}

impl fmt::Display for TeensyFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_is_case_insensitive() {
        assert_eq!(TeensyFileType::from_extension("SID"), TeensyFileType::Sid);
        assert_eq!(TeensyFileType::from_extension(".prg"), TeensyFileType::Prg);
        assert_eq!(TeensyFileType::from_extension("exe"), TeensyFileType::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(TeensyFileType::from_path("/music/a.sid"), TeensyFileType::Sid);
        assert_eq!(TeensyFileType::from_path(r"C:\games\x.CRT"), TeensyFileType::Crt);
        assert_eq!(TeensyFileType::from_path("/readme"), TeensyFileType::Unknown);
    }

    #[test]
    fn test_launchable() {
        assert!(TeensyFileType::Sid.is_launchable());
        assert!(!TeensyFileType::Hex.is_launchable());
    }
}
