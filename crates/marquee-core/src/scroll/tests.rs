use core::sync::atomic::AtomicU32;

use super::*;
use crate::{
    display::{DrawMode, mock::DrawCall},
    test_support::{BlockLcd, CELL, block_lcd},
    viewport::{Alignment, Viewport},
};

const LONG: &str = "HELLO WORLD";

fn offsets<const W: usize, const H: usize>(lcd: &BlockLcd<W, H>) -> std::vec::Vec<i32> {
    lcd.scroll_lines().map(ScrollLine::offset).collect()
}

fn quick<const W: usize, const H: usize>(lcd: &mut BlockLcd<W, H>) {
    lcd.set_scroll_config(
        ScrollConfig::default()
            .with_delay(0)
            .with_end_pause(0),
    )
    .unwrap();
}

#[test]
fn fitting_text_is_drawn_statically() {
    let mut lcd = block_lcd::<40, 8>();
    lcd.puts_scroll(0, 0, "abc");

    let mut plain = block_lcd::<40, 8>();
    plain.puts(0, 0, "abc");

    assert_eq!(lcd.scroll_line_count(), 0);
    assert_eq!(lcd.display().pixels(), plain.display().pixels());
}

#[test]
fn empty_text_and_rows_below_viewport_are_ignored() {
    let mut lcd = block_lcd::<40, 8>();
    lcd.puts_scroll(0, 0, "");
    lcd.puts_scroll(0, 1, LONG);

    assert_eq!(lcd.scroll_line_count(), 0);
    assert!(lcd.display().calls().is_empty());
}

#[test]
fn hello_world_scrolls_after_delay_and_wraps() {
    let mut lcd = block_lcd::<40, 8>();
    lcd.put_scrolling(0, 0, 0, LONG, Redraw::Text, 7);

    assert_eq!(lcd.scroll_line_count(), 1);
    assert_eq!(lcd.display().count_on(0, 0, 40, 8), 40 * 8);

    let line = lcd.scroll_lines().next().unwrap().clone();
    assert_eq!(line.text(), LONG);
    assert_eq!(line.text_width(), 11 * CELL);
    assert_eq!(line.rect(), (0, 0, 40, CELL));
    assert_eq!(line.start_tick(), 100);
    assert_eq!(line.user_data(), 7);
    assert!(!line.bounces());

    lcd.display_mut().clear_calls();
    lcd.step(99);
    assert_eq!(offsets(&lcd), [0]);
    assert!(lcd.display().calls().is_empty());

    lcd.step(100);
    assert_eq!(offsets(&lcd), [6]);
    assert_eq!(
        lcd.display().calls().last(),
        Some(&DrawCall::Update {
            x: 0,
            y: 0,
            width: 40,
            height: CELL,
        })
    );

    let mut expected = block_lcd::<40, 8>();
    expected.putsxyofs(0, 0, 6, LONG);
    assert_eq!(lcd.display().pixels(), expected.display().pixels());

    for (tick, offset) in (101..).zip((12..=84).step_by(6)) {
        lcd.step(tick);
        assert_eq!(offsets(&lcd), [offset]);
    }

    lcd.step(200);
    let line = lcd.scroll_lines().next().unwrap();
    assert_eq!(line.offset(), 0);
    assert_eq!(line.start_tick(), 400);

    lcd.step(399);
    assert_eq!(offsets(&lcd), [0]);
    lcd.step(400);
    assert_eq!(offsets(&lcd), [6]);
}

#[test]
fn short_overflow_bounces() {
    let mut lcd = block_lcd::<40, 8>();
    quick(&mut lcd);
    lcd.puts_scroll(0, 0, "abcdefg");
    assert!(lcd.scroll_lines().next().unwrap().bounces());

    let mut seen = std::vec::Vec::new();
    for tick in 1..=7 {
        lcd.step(tick);
        seen.push(offsets(&lcd)[0]);
    }

    assert_eq!(seen, [6, 12, 16, 10, 4, 0, 6]);
    assert_eq!(
        lcd.scroll_lines().next().unwrap().direction(),
        Direction::Forward
    );
}

#[test]
fn zero_bidir_limit_always_wraps() {
    let mut lcd = block_lcd::<40, 8>();
    lcd.set_scroll_config(ScrollConfig::default().with_bidir_limit(0))
        .unwrap();
    lcd.puts_scroll(0, 0, "abcdefg");
    assert!(!lcd.scroll_lines().next().unwrap().bounces());
}

#[test]
fn same_text_keeps_offset_and_new_text_restarts() {
    let mut lcd = block_lcd::<40, 8>();
    quick(&mut lcd);
    lcd.put_scrolling(0, 0, 0, LONG, Redraw::Text, 1);
    lcd.step(1);
    lcd.step(2);
    assert_eq!(offsets(&lcd), [12]);

    lcd.display_mut().clear_calls();
    lcd.put_scrolling(0, 0, 0, LONG, Redraw::Text, 5);
    assert_eq!(offsets(&lcd), [12]);
    assert_eq!(lcd.scroll_lines().next().unwrap().user_data(), 5);
    assert!(lcd.display().calls().is_empty());

    lcd.put_scrolling(0, 0, 3, "GOODBYE WORLD", Redraw::Text, 5);
    assert_eq!(lcd.scroll_line_count(), 1);
    let line = lcd.scroll_lines().next().unwrap();
    assert_eq!(line.offset(), 3);
    assert_eq!(line.text(), "GOODBYE WORLD");
    assert_eq!(line.direction(), Direction::Forward);
}

#[test]
fn registry_limit_falls_back_to_static_text() {
    let mut lcd = block_lcd::<40, 24>();
    lcd.set_scroll_config(ScrollConfig::default().with_max_lines(2))
        .unwrap();

    for row in 0..3 {
        lcd.puts_scroll(0, row, LONG);
    }

    assert_eq!(lcd.scroll_line_count(), 2);
    assert_eq!(lcd.display().count_on(0, 16, 40, 8), 40 * 8);
}

#[test]
fn registry_never_exceeds_capacity() {
    let mut lcd = block_lcd::<40, 144>();
    for row in 0..18 {
        lcd.puts_scroll(0, row, LONG);
    }
    assert_eq!(lcd.scroll_line_count(), SCROLLABLE_LINES);
}

#[test]
fn restart_stops_overlapping_lines_only() {
    let mut lcd = block_lcd::<40, 16>();
    lcd.puts_scroll(0, 0, LONG);
    lcd.puts_scroll(0, 1, LONG);
    assert_eq!(lcd.scroll_line_count(), 2);

    lcd.putsxy_scroll_func(16, 0, "ANOTHER LINE", Some(Redraw::Text), 0);

    let rects: std::vec::Vec<_> = lcd.scroll_lines().map(ScrollLine::rect).collect();
    assert_eq!(rects, [(0, CELL, 40, CELL), (16, 0, 24, CELL)]);
}

#[test]
fn pixel_put_without_redraw_is_static() {
    let mut lcd = block_lcd::<40, 8>();
    lcd.putsxy_scroll_func(0, 0, LONG, None, 0);
    assert_eq!(lcd.scroll_line_count(), 0);
    assert_eq!(lcd.display().count_on(0, 0, 40, 8), 40 * 8);
}

#[test]
fn clearing_stops_lines() {
    let mut lcd = block_lcd::<40, 16>();
    lcd.puts_scroll(0, 0, LONG);
    lcd.puts_scroll(0, 1, LONG);

    lcd.clear_viewport_rect(0, 8, 40, 8);
    assert_eq!(lcd.scroll_line_count(), 1);
    assert_eq!(lcd.display().count_on(0, 8, 40, 8), 0);

    lcd.puts_scroll(0, 1, LONG);
    lcd.clear_viewport();
    assert_eq!(lcd.scroll_line_count(), 0);

    lcd.puts_scroll(0, 0, LONG);
    lcd.clear_display();
    assert_eq!(lcd.scroll_line_count(), 0);
    assert_eq!(lcd.display().count_on(0, 0, 40, 16), 0);
}

#[test]
fn stops_are_scoped_to_their_viewport() {
    let mut lcd = block_lcd::<40, 16>();
    let lower = lcd.add_viewport(Viewport::new(0, 8, 40, 8)).unwrap();
    lcd.puts_scroll(0, 0, LONG);
    lcd.set_viewport(Some(lower));
    lcd.puts_scroll(0, 0, LONG);
    assert_eq!(lcd.scroll_line_count(), 2);

    lcd.scroll_stop_viewport_rect(lower, 0, 0, 40, 8);
    let owners: std::vec::Vec<_> = lcd.scroll_lines().map(ScrollLine::viewport).collect();
    assert_eq!(owners, [ViewportId::DEFAULT]);

    lcd.puts_scroll(0, 0, LONG);
    lcd.set_viewport(None);
    assert!(lcd.remove_viewport(lower).is_ok());
    assert_eq!(lcd.scroll_line_count(), 1);

    lcd.scroll_stop();
    assert_eq!(lcd.scroll_line_count(), 0);
}

#[test]
fn step_draws_in_line_viewport_and_restores_active() {
    let mut lcd = block_lcd::<40, 16>();
    quick(&mut lcd);
    let lower = lcd
        .add_viewport(Viewport::new(0, 8, 40, 8).with_drawmode(DrawMode::SOLID))
        .unwrap();
    let upper = lcd
        .add_viewport(Viewport::new(0, 0, 40, 8).with_drawmode(DrawMode::FG))
        .unwrap();

    lcd.set_viewport(Some(lower));
    lcd.puts_scroll(0, 0, LONG);
    lcd.set_viewport(Some(upper));
    lcd.display_mut().clear_calls();

    lcd.step(1);

    assert_eq!(lcd.get_viewport().0, upper);
    assert_eq!(lcd.display().draw_mode(), DrawMode::FG);
    assert_eq!(
        lcd.display().calls().last(),
        Some(&DrawCall::Update {
            x: 0,
            y: 8,
            width: 40,
            height: CELL,
        })
    );
    assert_eq!(lcd.display().count_on(0, 0, 40, 8), 0);
}

fn underline(lcd: &mut BlockLcd<40, 8>, line: &ScrollLine) {
    lcd.erase_rect(0, 0, 40, 8);
    lcd.hline(0, line.user_data() as i32 - 1, 7);
}

#[test]
fn custom_redraw_receives_line() {
    let mut lcd = block_lcd::<40, 8>();
    quick(&mut lcd);
    lcd.put_scrolling(0, 0, 0, LONG, Redraw::Custom(underline), 12);

    lcd.step(1);
    assert_eq!(lcd.display().count_on(0, 0, 40, 8), 12);
    assert_eq!(lcd.display().count_on(0, 7, 12, 1), 12);
}

#[test]
fn start_delay_survives_tick_wraparound() {
    let mut lcd = block_lcd::<40, 8>();
    lcd.set_tick(u32::MAX - 10);
    lcd.puts_scroll(0, 0, LONG);
    assert_eq!(lcd.scroll_lines().next().unwrap().start_tick(), 89);

    lcd.step(u32::MAX);
    assert_eq!(offsets(&lcd), [0]);
    lcd.step(88);
    assert_eq!(offsets(&lcd), [0]);
    lcd.step(89);
    assert_eq!(offsets(&lcd), [6]);
}

#[test]
fn pump_reads_tick_source() {
    let ticks = AtomicU32::new(0);
    let mut lcd = block_lcd::<40, 8>();
    lcd.puts_scroll(0, 0, LONG);

    ticks.store(100, Ordering::Relaxed);
    lcd.pump(&ticks);
    assert_eq!(offsets(&lcd), [6]);
}

#[test]
fn invalid_config_is_rejected_and_kept() {
    let mut lcd = block_lcd::<40, 8>();
    assert_eq!(
        lcd.set_scroll_config(ScrollConfig::default().with_step(0)),
        Err(ConfigError::InvalidStep)
    );
    assert_eq!(lcd.scroll_config(), ScrollConfig::default());
}

#[test]
fn long_text_is_truncated_on_a_char_boundary() {
    let mut text = std::string::String::new();
    while text.len() < SCROLL_LINE_BYTES - 2 {
        text.push('\u{e9}');
    }
    text.push('\u{20ac}');

    let stored = truncate_text(&text);
    assert_eq!(stored.len(), SCROLL_LINE_BYTES - 2);
    assert!(stored.ends_with('\u{e9}'));
}

#[test]
fn scroll_width_covers_only_the_stored_text() {
    let mut lcd = block_lcd::<40, 8>();
    let text: std::string::String = core::iter::repeat_n('a', VISUAL_BUFFER_CHARS + 40).collect();
    lcd.puts_scroll(0, 0, &text);

    let line = lcd.scroll_lines().next().unwrap();
    assert_eq!(line.text().chars().count(), VISUAL_BUFFER_CHARS);
    assert_eq!(line.text_width(), VISUAL_BUFFER_CHARS as i32 * CELL);
}

#[test]
fn centered_overflowing_line_stays_inside_its_rect() {
    let mut lcd = block_lcd::<64, 8>();
    quick(&mut lcd);
    let id = lcd
        .add_viewport(Viewport::new(0, 0, 64, 8).with_alignment(Alignment::Center))
        .unwrap();
    lcd.set_viewport(Some(id));

    lcd.putsxy_scroll_func(32, 0, LONG, Some(Redraw::Text), 0);
    assert_eq!(lcd.scroll_lines().next().unwrap().rect(), (32, 0, 32, CELL));
    assert_eq!(lcd.display().count_on(0, 0, 32, 8), 0);

    for tick in 1..=4 {
        lcd.step(tick);
        assert_eq!(lcd.display().count_on(0, 0, 32, 8), 0);
    }
    assert_eq!(offsets(&lcd), [24]);
}
