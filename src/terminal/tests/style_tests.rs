use super::term;
use crate::terminal::{Attribute, CellStyle, Color, ScreenBuffer, TerminalEvent};

#[test]
fn every_attribute_resets_to_initial_pen() {
    let attributes = [
        Attribute::Bold,
        Attribute::Dim,
        Attribute::Italic,
        Attribute::Underline,
        Attribute::Blink,
        Attribute::Inverse,
        Attribute::Strikethrough,
        Attribute::NormalIntensity,
        Attribute::NoItalic,
        Attribute::NoUnderline,
        Attribute::NoBlink,
        Attribute::NoInverse,
        Attribute::NoStrikethrough,
        Attribute::Foreground(Color::Indexed(3)),
        Attribute::Foreground(Color::Indexed(200)),
        Attribute::Foreground(Color::Rgb(1, 2, 3)),
        Attribute::Foreground(Color::Default),
        Attribute::Background(Color::Indexed(4)),
        Attribute::Background(Color::Rgb(9, 8, 7)),
        Attribute::Background(Color::Default),
    ];

    for attr in attributes {
        let mut buffer = ScreenBuffer::new(2, 2);
        let initial = *buffer.pen();
        buffer.apply(TerminalEvent::SetAttribute(attr));
        buffer.apply(TerminalEvent::ResetAttributes);
        assert_eq!(*buffer.pen(), initial, "attribute {:?}", attr);
    }
}

#[test]
fn every_sgr_code_resets_to_initial_pen() {
    let codes = [
        "1", "2", "3", "4", "5", "7", "9", "22", "23", "24", "25", "27", "29", "31", "39", "42",
        "49", "93", "105", "38;5;100", "48;5;17", "38;2;1;2;3", "48;2;4;5;6",
    ];
    for code in codes {
        let t = term(2, 2, &format!("\x1b[{}m\x1b[0m", code));
        assert_eq!(*t.buffer().pen(), CellStyle::default(), "code {}", code);
    }
}

#[test]
fn colored_character_between_defaults() {
    let t = term(10, 1, "A\x1b[31mB\x1b[0mC");
    let buffer = t.buffer();
    let a = buffer.cell(0, 0).unwrap();
    let b = buffer.cell(0, 1).unwrap();
    let c = buffer.cell(0, 2).unwrap();
    assert_eq!((a.ch, b.ch, c.ch), ('A', 'B', 'C'));
    assert_eq!(a.style.fg, Color::Default);
    assert_eq!(b.style.fg, Color::Indexed(1));
    assert_eq!(c.style.fg, Color::Default);
}

#[test]
fn attributes_accumulate() {
    let t = term(5, 1, "\x1b[1;3;4;7;9mx");
    let style = t.buffer().cell(0, 0).unwrap().style;
    assert!(style.bold && style.italic && style.underline && style.reverse);
    assert!(style.strikethrough);
    assert!(!style.dim);
}

#[test]
fn normal_intensity_clears_bold_and_dim() {
    let t = term(5, 1, "\x1b[1;2;22mx");
    let style = t.buffer().cell(0, 0).unwrap().style;
    assert!(!style.bold && !style.dim);
}

#[test]
fn background_applies_to_printed_cells() {
    let t = term(5, 1, "\x1b[44mx");
    assert_eq!(t.buffer().cell(0, 0).unwrap().style.bg, Color::Indexed(4));
    assert_eq!(t.buffer().cell(0, 1).unwrap().style.bg, Color::Default);
}
