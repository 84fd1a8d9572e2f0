//! Grade-1 Braille transliteration through the North American Braille ASCII
//! table. Position `i` in the table maps to the cell `U+2800 + i`.

const BRAILLE_ASCII: &str = " A1B'K2L@CIF/MSP\"E3H9O6R^DJG>NTQ,*5<-U8V.%[$+X!&;:4\\0Z7(_?W]#Y)=";

const BRAILLE_BLOCK_START: u32 = 0x2800;

const BRAILLE_BLOCK_END: u32 = BRAILLE_BLOCK_START + 0x3F;

/// Cells already in the six-dot block map to themselves.
pub fn to_braille_char(ch: char) -> Option<char> {
    if (BRAILLE_BLOCK_START..=BRAILLE_BLOCK_END).contains(&(ch as u32)) {
        return Some(ch);
    }
    let upper = ch.to_ascii_uppercase();
    let idx = BRAILLE_ASCII.chars().position(|c| c == upper)?;
    char::from_u32(BRAILLE_BLOCK_START + idx as u32)
}

/// Characters without a Braille ASCII cell are dropped.
pub fn to_braille(text: &str) -> String {
    text.chars().filter_map(to_braille_char).collect()
}

pub fn visual_char_count(input: &str) -> usize {
    input.chars().filter(|&c| c != '\n').count()
}
