use std::fmt;

/// Metadata table id of `TypeDef` tokens (`0x02`)
pub const TABLE_TYPE_DEF: u8 = 0x02;
/// Metadata table id of `MethodDef` tokens (`0x06`)
pub const TABLE_METHOD_DEF: u8 = 0x06;

/// A metadata token referencing one row of a metadata table.
///
/// Tokens are 32-bit values where the high byte selects the table and the
/// low 24 bits select the row within it. This crate only consumes two tables:
/// `TypeDef` (`0x02`) and `MethodDef` (`0x06`); both indices of the dispatch
/// maps produced by resolution are keyed on these.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a `TypeDef` token (`0x02` table) from a row index
    #[must_use]
    pub fn type_def(row: u32) -> Self {
        Token(u32::from(TABLE_TYPE_DEF) << 24 | (row & 0x00FF_FFFF))
    }

    /// Creates a `MethodDef` token (`0x06` table) from a row index
    #[must_use]
    pub fn method_def(row: u32) -> Self {
        Token(u32::from(TABLE_METHOD_DEF) << 24 | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table id from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0, or a table prefix with row 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row() == 0
    }

    /// Returns true for tokens of the `TypeDef` table with a non-zero row
    #[must_use]
    pub fn is_type_def(&self) -> bool {
        self.table() == TABLE_TYPE_DEF && !self.is_null()
    }

    /// Returns true for tokens of the `MethodDef` table with a non-zero row
    #[must_use]
    pub fn is_method_def(&self) -> bool {
        self.table() == TABLE_METHOD_DEF && !self.is_null()
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
