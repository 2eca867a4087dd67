use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed or unusable data (empty sets, a single class, unparsable rows).
    InvalidData(String),
    /// Parameters outside the supported range.
    InvalidConfig(String),
    /// A vector or matrix whose length disagrees with the expected dimensionality.
    InvalidShape(String),
    /// An inference method was called before `fit`.
    NotFitted(&'static str),
    /// More than two distinct labels were given to a binary classifier.
    TooManyClasses(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::InvalidShape(msg) => write!(f, "invalid shape: {msg}"),
            Error::NotFitted(method) => {
                write!(f, "you must call 'fit' before calling '{method}'")
            }
            Error::TooManyClasses(n) => {
                write!(f, "found {n} classes, but only binary classification is supported")
            }
        }
    }
}

impl std::error::Error for Error {}
