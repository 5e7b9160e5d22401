use std::fmt;

/// Kind of model an upload record describes
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModelType {
    SplitCustomEpi,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelType::SplitCustomEpi => write!(f, "split_custom_epi")
        }
    }
}
