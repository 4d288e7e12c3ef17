use serde::{Deserialize, Serialize};

/// A single match from a family/model search.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceInfo {
    pub name: String,
    pub full_name: String,
}

impl ResourceInfo {
    /// Root resources have no parent path, so both names agree.
    pub fn root(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
        }
    }
}
