//! Property-based invariant tests for cursor movement and wrapped layout.
//!
//! These tests verify invariants that must hold for any document and any
//! sequence of editing steps:
//!
//! 1. The cursor row always names a line of the buffer.
//! 2. Up then Down (away from the document edges) is the identity.
//! 3. Right never carries x past the line length.
//! 4. Left from beyond the end of a line lands on its last character.
//! 5. A line of length L occupies `ceil((L + 1) / w)` screen rows.
//! 6. Distinct visible positions map to distinct screen cells.
//! 7. Each step scrolls by at most one line and keeps the cursor row in the
//!    window. After a resize strands the cursor outside the window, each
//!    scroll adjustment brings the window one line closer.
//! 8. Inserting grows exactly one line by exactly one character.
//! 9. Painting never panics and always presents exactly one frame.

use std::collections::HashSet;

use mog_core::buffer::TextBuffer;
use mog_core::controller::{Controller, Direction};
use mog_core::cursor::{Cursor, SimpleCursor};
use mog_core::geometry::{BufferPos, ScreenSize};
use mog_core::surface::GridSurface;
use mog_core::viewport::{Viewport, WrappedViewport, wrapped_rows};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z ]{0,24}", 1..12)
}

fn size_strategy() -> impl Strategy<Value = ScreenSize> {
    (1u16..=12, 1u16..=8).prop_map(|(w, h)| ScreenSize::new(w, h).expect("non-zero size"))
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Move(Direction),
    Insert(char),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Move(Direction::Up)),
        Just(Step::Move(Direction::Down)),
        Just(Step::Move(Direction::Left)),
        Just(Step::Move(Direction::Right)),
        prop::char::range('a', 'z').prop_map(Step::Insert),
    ]
}

fn apply(ctl: &mut Controller, step: Step) {
    match step {
        Step::Move(direction) => ctl.move_cursor(direction),
        Step::Insert(ch) => ctl.insert_char(ch),
    }
}

fn window_contains(ctl: &Controller, y: usize) -> bool {
    let offset = ctl.viewport().offset();
    let height = usize::from(ctl.viewport().size().height());
    offset <= y && y < offset + height
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Cursor row stays inside the document
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cursor_row_stays_in_document(
        lines in lines_strategy(),
        size in size_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..64),
    ) {
        let mut ctl = Controller::new(TextBuffer::from_lines(&lines), size);
        for step in steps {
            apply(&mut ctl, step);
            prop_assert!(
                ctl.cursor().y() < ctl.buffer().line_count(),
                "cursor row {} outside {} lines after {:?}",
                ctl.cursor().y(), ctl.buffer().line_count(), step
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Up/Down round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn up_then_down_restores_row(
        lines in prop::collection::vec("[a-z]{0,8}", 3..10),
        row_seed in any::<prop::sample::Index>(),
        x in 0usize..12,
    ) {
        let count = lines.len();
        // Rows strictly inside the document so neither move is blocked.
        let y = 1 + row_seed.index(count - 2);
        let size = ScreenSize::new(10, 40).expect("non-zero size");
        let mut ctl = Controller::from_parts(
            TextBuffer::from_lines(&lines),
            SimpleCursor::at(x, y),
            WrappedViewport::new(size),
        );
        ctl.move_cursor(Direction::Up);
        ctl.move_cursor(Direction::Down);
        prop_assert_eq!(ctl.cursor().position(), BufferPos::new(x, y));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Right saturates at the line length
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn right_saturates_at_line_length(line in "[a-z]{0,20}", presses in 0usize..40) {
        let len = line.chars().count();
        let mut ctl = Controller::new(
            TextBuffer::from_lines([line.as_str()]),
            ScreenSize::new(8, 8).expect("non-zero size"),
        );
        for _ in 0..presses {
            ctl.move_cursor(Direction::Right);
        }
        prop_assert_eq!(ctl.cursor().x(), presses.min(len));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Left from beyond the end of the line
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn left_from_overshoot_lands_on_last_char(line in "[a-z]{0,20}", extra in 1usize..20) {
        let len = line.chars().count();
        let mut ctl = Controller::from_parts(
            TextBuffer::from_lines([line.as_str()]),
            SimpleCursor::at(len + extra, 0),
            WrappedViewport::new(ScreenSize::new(8, 8).expect("non-zero size")),
        );
        ctl.move_cursor(Direction::Left);
        prop_assert_eq!(ctl.cursor().x(), len.saturating_sub(1));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Wrapped row count
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wrapped_rows_is_ceiling_of_len_plus_one(len in 0usize..10_000, width in 1u16..=500) {
        let w = usize::from(width);
        prop_assert_eq!(wrapped_rows(len, width), (len + 1).div_ceil(w));
        // The cell just past the last character is always inside the rows.
        prop_assert!((len / w) < wrapped_rows(len, width));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Visible positions map to distinct cells
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn screen_mapping_is_injective(lines in lines_strategy(), size in size_strategy(), offset in 0usize..4) {
        let buffer = TextBuffer::from_lines(&lines);
        let viewport = WrappedViewport::with_offset(size, offset);
        let mut seen = HashSet::new();
        for y in offset..buffer.line_count() {
            // Every character plus the end-of-line slot.
            for x in 0..=buffer.line_len(y) {
                let pos = viewport.buffer_pos_to_screen_pos(&buffer, BufferPos::new(x, y));
                prop_assert!(pos.x < usize::from(size.width()));
                prop_assert!(
                    seen.insert((pos.x, pos.y)),
                    "({}, {}) collides at screen {:?}", x, y, pos
                );
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Scrolling follows the cursor one line at a time
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scroll_follows_cursor_one_line_at_a_time(
        lines in lines_strategy(),
        size in size_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..64),
    ) {
        let mut ctl = Controller::new(TextBuffer::from_lines(&lines), size);
        for step in steps {
            let before = ctl.viewport().offset();
            apply(&mut ctl, step);
            let after = ctl.viewport().offset();
            prop_assert!(before.abs_diff(after) <= 1, "offset jumped {} -> {}", before, after);
            prop_assert!(
                window_contains(&ctl, ctl.cursor().y()),
                "cursor row {} outside window at offset {}",
                ctl.cursor().y(), after
            );
        }
    }
}

fn rows_outside_window(ctl: &Controller, y: usize) -> usize {
    let offset = ctl.viewport().offset();
    let height = usize::from(ctl.viewport().size().height());
    if y < offset {
        offset - y
    } else {
        (y + 1).saturating_sub(offset + height)
    }
}

proptest! {
    #[test]
    fn window_returns_to_cursor_after_resize(
        lines in lines_strategy(),
        size in size_strategy(),
        resized in size_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..32),
    ) {
        let mut ctl = Controller::new(TextBuffer::from_lines(&lines), size);
        for step in steps {
            apply(&mut ctl, step);
        }
        ctl.resize(resized);

        let y = ctl.cursor().y();
        let mut outside = rows_outside_window(&ctl, y);
        while outside > 0 {
            let before = ctl.viewport().offset();
            ctl.adjust_scroll();
            prop_assert_eq!(before.abs_diff(ctl.viewport().offset()), 1);
            let now = rows_outside_window(&ctl, y);
            prop_assert_eq!(now, outside - 1);
            outside = now;
        }
        prop_assert!(window_contains(&ctl, y));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Insert touches exactly one line
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn insert_grows_only_current_line(
        lines in lines_strategy(),
        row_seed in any::<prop::sample::Index>(),
        x in 0usize..30,
        ch in prop::char::range('a', 'z'),
    ) {
        let y = row_seed.index(lines.len());
        let buffer = TextBuffer::from_lines(&lines);
        let mut ctl = Controller::from_parts(
            buffer.clone(),
            SimpleCursor::at(x, y),
            WrappedViewport::new(ScreenSize::new(10, 20).expect("non-zero size")),
        );
        ctl.insert_char(ch);

        let after = ctl.buffer();
        prop_assert_eq!(after.line_count(), buffer.line_count());
        for row in 0..buffer.line_count() {
            if row == y {
                prop_assert_eq!(after.line_len(row), buffer.line_len(row) + 1);
            } else {
                prop_assert_eq!(after.line(row), buffer.line(row));
            }
        }
        let at = x.min(buffer.line_len(y));
        prop_assert_eq!(after.line(y).chars().nth(at), Some(ch));
        prop_assert_eq!(ctl.cursor().position(), BufferPos::new(at + 1, y));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Painting is total
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn paint_presents_one_frame_with_cursor_on_grid(
        lines in lines_strategy(),
        size in size_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..32),
    ) {
        let mut ctl = Controller::new(TextBuffer::from_lines(&lines), size);
        for step in steps {
            apply(&mut ctl, step);
        }
        let mut grid = GridSurface::new(size.width(), size.height());
        ctl.paint(&mut grid).expect("grid surface never fails");
        prop_assert_eq!(grid.presents(), 1);
        let (col, _row) = grid.cursor().expect("cursor shown");
        prop_assert!(col < size.width());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// End-to-end scenarios
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn typing_at_start_then_moving_right() {
    let mut ctl = Controller::new(
        TextBuffer::from_lines(["bb"]),
        ScreenSize::new(80, 24).unwrap(),
    );
    ctl.insert_char('a');
    assert_eq!(ctl.buffer().line(0).as_str(), "abb");
    assert_eq!(ctl.cursor().position(), BufferPos::new(1, 0));
    ctl.move_cursor(Direction::Right);
    ctl.move_cursor(Direction::Right);
    assert_eq!(ctl.cursor().x(), 3);
    ctl.move_cursor(Direction::Right);
    assert_eq!(ctl.cursor().x(), 3);
}

#[test]
fn vertical_move_into_short_line_then_type_appends() {
    let mut ctl = Controller::from_parts(
        TextBuffer::from_lines(["hello", "hi"]),
        SimpleCursor::at(5, 0),
        WrappedViewport::new(ScreenSize::new(80, 24).unwrap()),
    );
    ctl.move_cursor(Direction::Down);
    assert_eq!(ctl.cursor().position(), BufferPos::new(5, 1));
    ctl.insert_char('!');
    assert_eq!(ctl.buffer().line(1).as_str(), "hi!");
    assert_eq!(ctl.cursor().position(), BufferPos::new(3, 1));
}

#[test]
fn walking_down_a_long_document_scrolls_line_by_line() {
    let lines: Vec<String> = (0..10).map(|i| format!("line {i}")).collect();
    let mut ctl = Controller::new(TextBuffer::from_lines(&lines), ScreenSize::new(20, 3).unwrap());
    for expected_y in 1..10 {
        ctl.move_cursor(Direction::Down);
        assert_eq!(ctl.cursor().y(), expected_y);
        assert_eq!(ctl.viewport().offset(), expected_y.saturating_sub(2));
    }
    // Bottom edge: further moves are no-ops.
    ctl.move_cursor(Direction::Down);
    assert_eq!(ctl.cursor().y(), 9);
    assert_eq!(ctl.viewport().offset(), 7);

    let mut grid = GridSurface::new(20, 3);
    ctl.paint(&mut grid).unwrap();
    assert_eq!(grid.row_text(0).trim_end(), "line 7");
    assert_eq!(grid.row_text(2).trim_end(), "line 9");
    assert_eq!(grid.cursor(), Some((0, 2)));
}

#[test]
fn wrapped_line_shifts_following_lines_down() {
    let buffer = TextBuffer::from_lines(["abcdefg", "xy"]);
    let viewport = WrappedViewport::new(ScreenSize::new(3, 5).unwrap());
    let mut grid = GridSurface::new(3, 5);
    viewport.paint(&buffer, &SimpleCursor::at(1, 1), &mut grid).unwrap();
    assert_eq!(grid.to_text(), "abc\ndef\ng  \nxy \n~  ");
    assert_eq!(grid.cursor(), Some((1, 3)));
}
