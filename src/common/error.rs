use std::fmt::{Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ComposeError {
    // Inputs
    ImageDecode(String),
    ImageEncode(String),
    InvalidDimensions { width: u32, height: u32 },
    InvalidOption(&'static str),
    InvalidDataUrl,

    // Symbol
    EmptyData,
    DataTooLong,

    // Reader
    SymbolNotFound,
    Unreadable(String),

    // Art
    Generation(String),
}

impl Display for ComposeError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            // Inputs
            Self::ImageDecode(e) => write!(f, "Failed to decode image: {e}"),
            Self::ImageEncode(e) => write!(f, "Failed to encode image: {e}"),
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid dimensions: {width}x{height}")
            }
            Self::InvalidOption(name) => write!(f, "Invalid option: {name}"),
            Self::InvalidDataUrl => f.write_str("Invalid data url"),

            // Symbol
            Self::EmptyData => f.write_str("Empty data"),
            Self::DataTooLong => f.write_str("Data too long"),

            // Reader
            Self::SymbolNotFound => f.write_str("Symbol not found"),
            Self::Unreadable(e) => write!(f, "Symbol unreadable: {e}"),

            // Art
            Self::Generation(e) => write!(f, "Art generation failed: {e}"),
        }
    }
}

impl std::error::Error for ComposeError {}

pub type ComposeResult<T> = Result<T, ComposeError>;
