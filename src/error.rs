use std::convert::From;
use std::error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidMonth,
    DateParse,
    ColorParse,
    ConfigParse,
    DuplicateToken,
    UnknownCommand,
    IOError(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(parse_error: chrono::ParseError) -> Error {
        Error::new(
            ErrorKind::DateParse,
            &format!("Could not parse date: {}", parse_error),
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(ErrorKind::ConfigParse, &toml_error.to_string())
    }
}

impl<E: fmt::Debug> From<nom::Err<E>> for Error {
    fn from(nom_error: nom::Err<E>) -> Error {
        Error::new(ErrorKind::DateParse, &format!("{:?}", nom_error))
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        if let ErrorKind::IOError(err) = err.kind {
            err
        } else {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                match err.message {
                    Some(message) => message,
                    None => err.kind.as_str(),
                },
            )
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::InvalidMonth => "invalid month".to_owned(),
            ErrorKind::DateParse => "invalid date format".to_owned(),
            ErrorKind::ColorParse => "invalid color".to_owned(),
            ErrorKind::ConfigParse => "invalid configuration".to_owned(),
            ErrorKind::DuplicateToken => "duplicate token id".to_owned(),
            ErrorKind::UnknownCommand => "unknown command".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_message() {
        let plain = Error::from(ErrorKind::InvalidMonth);
        assert_eq!(plain.to_string(), "invalid month");

        let detailed = plain.with_msg("13 is not a month");
        assert_eq!(detailed.to_string(), "invalid month: 13 is not a month");
    }

    #[test]
    fn io_errors_pass_through() {
        let err = Error::from(io::Error::from(io::ErrorKind::NotFound));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn other_errors_become_invalid_input() {
        let io_err: io::Error = Error::from(ErrorKind::UnknownCommand).into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(io_err.to_string(), "unknown command");

        let io_err: io::Error = Error::new(ErrorKind::InvalidMonth, "13").into();
        assert_eq!(io_err.to_string(), "13");
    }

    #[test]
    fn nom_errors_convert() {
        let nom_err: nom::Err<nom::error::Error<&str>> = nom::Err::Error(
            nom::error::Error::new("x", nom::error::ErrorKind::Digit),
        );
        let err = Error::from(nom_err);
        assert!(matches!(err.kind, ErrorKind::DateParse));
    }
}
