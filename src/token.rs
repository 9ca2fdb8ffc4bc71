use derive_more::{Display, From};
use nom::{
    bytes::complete::take_while_m_n, character::complete::char, combinator::all_consuming,
    combinator::map_res, sequence::preceded, sequence::tuple, IResult,
};
use phf::phf_map;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// Identifier a token is dragged by.
#[derive(Debug, Display, From, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        TokenId(id.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TokenColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        TokenColor { r, g, b }
    }
}

static NAMED_COLORS: phf::Map<&'static str, TokenColor> = phf_map! {
    "black" => TokenColor::rgb(0x00, 0x00, 0x00),
    "white" => TokenColor::rgb(0xff, 0xff, 0xff),
    "red" => TokenColor::rgb(0xff, 0x00, 0x00),
    "green" => TokenColor::rgb(0x00, 0x80, 0x00),
    "blue" => TokenColor::rgb(0x00, 0x00, 0xff),
    "yellow" => TokenColor::rgb(0xff, 0xff, 0x00),
    "orange" => TokenColor::rgb(0xff, 0xa5, 0x00),
    "purple" => TokenColor::rgb(0x80, 0x00, 0x80),
    "pink" => TokenColor::rgb(0xff, 0xc0, 0xcb),
    "gray" => TokenColor::rgb(0x80, 0x80, 0x80),
    "cornsilk" => TokenColor::rgb(0xff, 0xf8, 0xdc),
    "lightblue" => TokenColor::rgb(0xad, 0xd8, 0xe6),
    "lightcoral" => TokenColor::rgb(0xf0, 0x80, 0x80),
    "lightgreen" => TokenColor::rgb(0x90, 0xee, 0x90),
    "lightpink" => TokenColor::rgb(0xff, 0xb6, 0xc1),
    "lightsalmon" => TokenColor::rgb(0xff, 0xa0, 0x7a),
    "lightyellow" => TokenColor::rgb(0xff, 0xff, 0xe0),
    "lemonchiffon" => TokenColor::rgb(0xff, 0xfa, 0xcd),
    "lavender" => TokenColor::rgb(0xe6, 0xe6, 0xfa),
    "khaki" => TokenColor::rgb(0xf0, 0xe6, 0x8c),
    "plum" => TokenColor::rgb(0xdd, 0xa0, 0xdd),
    "salmon" => TokenColor::rgb(0xfa, 0x80, 0x72),
    "skyblue" => TokenColor::rgb(0x87, 0xce, 0xeb),
    "turquoise" => TokenColor::rgb(0x40, 0xe0, 0xd0),
};

pub const DEFAULT_COLOR: &str = "lightgreen";

fn hex_component(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |hex: &str| u8::from_str_radix(hex, 16),
    )(input)
}

fn hex_color(input: &str) -> IResult<&str, TokenColor> {
    let (rest, (r, g, b)) = preceded(
        char('#'),
        tuple((hex_component, hex_component, hex_component)),
    )(input)?;

    Ok((rest, TokenColor { r, g, b }))
}

impl FromStr for TokenColor {
    type Err = Error;

    /// Accepts `#rrggbb` or one of the known color names.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(color) = NAMED_COLORS.get(s.to_lowercase().as_str()) {
            return Ok(*color);
        }

        all_consuming(hex_color)(s)
            .map(|(_, color)| color)
            .map_err(|_| Error::new(ErrorKind::ColorParse, &format!("unknown color '{}'", s)))
    }
}

impl fmt::Display for TokenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for TokenColor {
    fn default() -> Self {
        NAMED_COLORS[DEFAULT_COLOR]
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub name: String,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub color: TokenColor,
}

impl Token {
    pub fn new(id: &str, name: &str, color: TokenColor) -> Self {
        Token {
            id: TokenId::from(id),
            name: name.to_owned(),
            color,
        }
    }
}

/// The fixed set of tokens available for a session, in palette order.
#[derive(Debug, Clone)]
pub struct TokenSet {
    tokens: Vec<Token>,
}

impl TokenSet {
    pub fn new(tokens: Vec<Token>) -> Result<Self> {
        for (i, token) in tokens.iter().enumerate() {
            if tokens[..i].iter().any(|other| other.id == token.id) {
                return Err(Error::new(
                    ErrorKind::DuplicateToken,
                    &format!("'{}' is defined more than once", token.id),
                ));
            }
        }

        Ok(TokenSet { tokens })
    }

    pub fn get(&self, id: &TokenId) -> Option<&Token> {
        self.tokens.iter().find(|token| &token.id == id)
    }

    pub fn nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(n)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        TokenSet {
            tokens: vec![
                Token::new("gløer", "Gløer", NAMED_COLORS["lightblue"]),
                Token::new("erik", "Erik", NAMED_COLORS["lightcoral"]),
                Token::new("elias", "Elias", NAMED_COLORS["lemonchiffon"]),
            ],
        }
    }
}
