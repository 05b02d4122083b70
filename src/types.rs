use serde::Deserialize;

/// A single character as returned by the API. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub next: Option<String>,
}

/// One API response: a slice of characters plus next-page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

impl Page {
    pub fn has_next(&self) -> bool {
        self.info.next.is_some()
    }
}
