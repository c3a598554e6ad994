//! Helvetica 字宽与自动换行

/// Helvetica AFM 字宽（1/1000 em），覆盖 ASCII 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// WinAnsiEncoding 0x80..=0xFF 的 Helvetica 字宽，未定义的码位取默认宽度
const HELVETICA_HIGH_WIDTHS: [u16; 128] = [
    556, 556, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 556, 611, 556, // 0x80
    556, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 556, 500, 667, // 0x90
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

const DEFAULT_WIDTH: u16 = 556;

/// 行高系数：(ascender - descender + lineGap) / 1000
pub const LINE_HEIGHT_FACTOR: f32 = 1.156;

/// 基线到行顶的距离系数
pub const ASCENT_FACTOR: f32 = 0.718;

/// 字符在 WinAnsiEncoding 中的编码；内置字体没有字形的字符写成 `?`
pub fn win_ansi_code(c: char) -> u8 {
    match c as u32 {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
        _ => match c {
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        },
    }
}

/// 按实际写出的字形取宽度
fn glyph_width(c: char) -> u16 {
    match win_ansi_code(c) {
        code @ 0x20..=0x7E => HELVETICA_WIDTHS[usize::from(code - 0x20)],
        code @ 0x80..=0xFF => HELVETICA_HIGH_WIDTHS[usize::from(code - 0x80)],
        _ => DEFAULT_WIDTH,
    }
}

pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c))).sum();
    units as f32 * size / 1000.0
}

pub fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT_FACTOR
}

/// 按单词贪心换行；单个单词超宽时按字符拆开。空文本没有行。
pub fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    if text.is_empty() {
        return lines;
    }

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, size) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = split_word(word, max_width, size);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        lines.push(current);
    }

    lines
}

/// 文本在给定宽度内换行后占用的高度
pub fn height_of(text: &str, max_width: f32, size: f32) -> f32 {
    wrap_text(text, max_width, size).len() as f32 * line_height(size)
}

fn split_word(word: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for c in word.chars() {
        current.push(c);
        if current.chars().count() > 1 && text_width(&current, size) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    pieces.push(current);
    pieces
}
