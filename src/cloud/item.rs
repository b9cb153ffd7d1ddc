use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Item {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    sha256: Option<String>,
    // file type tag, only reported in debug output
    #[serde(default)]
    ftype: Option<String>,
}

impl Item {
    /// Path relative to the mirror root.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }

    pub fn ftype(&self) -> Option<&str> {
        self.ftype.as_deref()
    }
}
