use super::term;

#[test]
fn cursor_position_moves_absolutely() {
    let t = term(10, 5, "\x1b[3;4Hx");
    assert_eq!(t.buffer().cell(2, 3).unwrap().ch, 'x');
    assert_eq!((t.cursor_row(), t.cursor_col()), (2, 4));
}

#[test]
fn cursor_position_is_clamped_to_grid() {
    let t = term(10, 5, "\x1b[99;99H");
    assert_eq!((t.cursor_row(), t.cursor_col()), (4, 9));
}

#[test]
fn relative_moves_stop_at_edges() {
    let t = term(10, 5, "\x1b[2;2H\x1b[10A\x1b[10D");
    assert_eq!((t.cursor_row(), t.cursor_col()), (0, 0));
    let t = term(10, 5, "\x1b[10B\x1b[10C");
    assert_eq!((t.cursor_row(), t.cursor_col()), (4, 9));
}

#[test]
fn next_and_previous_line_reset_column() {
    let t = term(10, 5, "\x1b[3;5H\x1b[E");
    assert_eq!((t.cursor_row(), t.cursor_col()), (3, 0));
    let t = term(10, 5, "\x1b[3;5H\x1b[2F");
    assert_eq!((t.cursor_row(), t.cursor_col()), (0, 0));
}

#[test]
fn column_and_row_absolute() {
    let t = term(10, 5, "\x1b[7G\x1b[4d");
    assert_eq!((t.cursor_row(), t.cursor_col()), (3, 6));
}

#[test]
fn carriage_return_overwrites_line() {
    let t = term(10, 2, "hello\rj");
    assert_eq!(t.buffer().line(0), "jello");
}

#[test]
fn backspace_moves_left() {
    let t = term(10, 2, "ab\x08c");
    assert_eq!(t.buffer().line(0), "ac");
}

#[test]
fn tab_advances_to_next_stop() {
    let t = term(20, 2, "a\tb");
    assert_eq!(t.buffer().cell(0, 8).unwrap().ch, 'b');
    let t = term(10, 2, "\t\t\tz");
    assert_eq!(t.buffer().cell(0, 9).unwrap().ch, 'z');
}

#[test]
fn save_and_restore_cursor_with_pen() {
    let t = term(10, 5, "\x1b[2;3H\x1b[1m\x1b7\x1b[5;5H\x1b[0m\x1b8x");
    let cell = t.buffer().cell(1, 2).unwrap();
    assert_eq!(cell.ch, 'x');
    assert!(cell.style.bold);
}

#[test]
fn csi_save_restore() {
    let t = term(10, 5, "\x1b[2;2H\x1b[s\x1b[H\x1b[uy");
    assert_eq!(t.buffer().cell(1, 1).unwrap().ch, 'y');
}

#[test]
fn cursor_visibility() {
    let t = term(10, 5, "\x1b[?25l");
    assert!(!t.buffer().cursor_visible());
    assert!(!t.snapshot().cursor.visible);
    let t = term(10, 5, "\x1b[?25l\x1b[?25h");
    assert!(t.buffer().cursor_visible());
}
