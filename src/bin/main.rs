//! Host demo: a framed, scrolling title and a tick counter rendered into
//! the LS027B7DH01 surface, with ASCII snapshots of the panel in the log.

use std::{
    sync::atomic::{AtomicU32, Ordering},
    thread,
    time::Duration,
};

use log::{LevelFilter, info, warn};
use ls027b7dh01::{Config, Ls027, Surface};
use marquee_core::{
    Alignment, Bitmap, Lcd, LtrClassifier, PixelFont, Redraw, ScrollConfig, ScrollLine, Viewport,
};

use bus::{HostSpi, NullPin};

#[path = "main/bus.rs"]
mod bus;
#[path = "main/snapshot.rs"]
mod snapshot;

type DemoLcd = Lcd<Surface, PixelFont, LtrClassifier>;

const TICK_MS: u64 = 10;
const RUN_TICKS: u32 = 600;
const SNAPSHOT_EVERY: u32 = 60;
const EXTCOMIN_EVERY: u32 = 100;

const TITLE: &str = "Now playing: The quick brown fox jumps over the lazy dog";
const SUBTITLE: &str = "Side B, track 04";

// 6x6 rounded frame: corners, 1 px edges, empty center.
static FRAME: [u8; 6] = [0b011110, 0b100001, 0b100001, 0b100001, 0b100001, 0b011110];

/// Title repaint with a progress rule along the bottom row.
fn title_with_progress(lcd: &mut DemoLcd, line: &ScrollLine) {
    lcd.scroll_fn(line);

    let (x, y, width, height) = line.rect();
    let travel = line.text_width().max(1);
    let len = width * line.offset() / travel;
    if len > 0 {
        lcd.hline(x, x + len - 1, y + height - 1);
    }
}

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut driver = Ls027::new(HostSpi::default(), NullPin, NullPin, Config::default());
    if let Err(err) = driver.enable_display() {
        warn!("display enable failed: {:?}", err);
    }
    if let Err(err) = driver.clear_all() {
        warn!("display clear failed: {:?}", err);
    }

    let mut lcd = Lcd::new(Surface::new(), PixelFont::new(), LtrClassifier);
    let scroll = ScrollConfig::default()
        .with_delay(50)
        .with_end_pause(80)
        .with_step(2);
    if let Err(err) = lcd.set_scroll_config(scroll) {
        warn!("scroll config rejected: {:?}", err);
    }

    lcd.nine_segment_bmp(&Bitmap::new(&FRAME, 6, 6), 8, 8, 136, 36);

    let (title, subtitle, status) = match (
        lcd.add_viewport(Viewport::new(12, 12, 128, 10)),
        lcd.add_viewport(Viewport::new(12, 28, 128, 10)),
        lcd.add_viewport(Viewport::new(8, 52, 136, 8).with_alignment(Alignment::Right)),
    ) {
        (Ok(title), Ok(subtitle), Ok(status)) => (title, subtitle, status),
        _ => {
            warn!("viewport table full");
            return;
        }
    };

    lcd.set_viewport(Some(title));
    lcd.put_scrolling(0, 0, 0, TITLE, Redraw::Custom(title_with_progress), 0);
    lcd.set_viewport(Some(subtitle));
    lcd.puts_scroll(0, 0, SUBTITLE);
    lcd.set_viewport(None);
    lcd.update();

    info!(
        "scroll lines registered: {} (title {} px in a 128 px viewport)",
        lcd.scroll_line_count(),
        lcd.string_size(TITLE).0
    );

    let ticks = AtomicU32::new(0);
    let mut sent = 0;

    for tick in 0..RUN_TICKS {
        ticks.store(tick, Ordering::Relaxed);
        lcd.pump(&ticks);

        if tick % 20 == 0 {
            lcd.set_viewport(Some(status));
            lcd.clear_viewport();
            lcd.putsxyf(0, 0, format_args!("t={tick}"));
            lcd.update_viewport();
            lcd.set_viewport(None);
        }

        match lcd.display_mut().flush(&mut driver) {
            Ok(rows) => sent += rows,
            Err(err) => warn!("flush failed: {:?}", err),
        }

        if tick % EXTCOMIN_EVERY == 0 {
            if let Err(err) = driver.toggle_extcomin() {
                warn!("extcomin toggle failed: {:?}", err);
            }
        }

        if tick % SNAPSHOT_EVERY == 0 {
            let offset = lcd.scroll_lines().next().map_or(0, ScrollLine::offset);
            info!("tick {tick}: title offset {offset}, {sent} rows sent");
            for row in snapshot::rows(lcd.display().frame(), 8, 8, 136, 52) {
                info!("|{row}|");
            }
        }

        thread::sleep(Duration::from_millis(TICK_MS));
    }

    let (spi, _, _) = driver.release();
    info!(
        "done: {} rows in {} transactions, {} bytes",
        sent, spi.transactions, spi.bytes
    );
}
