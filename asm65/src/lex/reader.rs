use std::str::Chars;

/// One positioned source character. Every end-of-input sentinel compares
/// equal to every other, whatever reader produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    pub offset: u32,
    pub width: u32,
    pub value: char,
}

impl Character {
    pub const EOF: Self = Self {
        offset: u32::MAX,
        width: 0,
        value: '\0',
    };

    pub fn is_eof(self) -> bool {
        self == Self::EOF
    }
}

/// Strictly forward, single-pass character source. After exhaustion every
/// call keeps returning [`Character::EOF`].
#[derive(Debug)]
pub struct Reader<'a> {
    chars: Chars<'a>,
    offset: u32,
}

impl<'a> Reader<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars(),
            offset: 0,
        }
    }

    pub fn get(&mut self) -> Character {
        let Some(value) = self.chars.next() else {
            return Character::EOF;
        };
        let width = value.len_utf8() as u32;
        let read = Character {
            offset: self.offset,
            width,
            value,
        };
        self.offset += width;
        read
    }
}
