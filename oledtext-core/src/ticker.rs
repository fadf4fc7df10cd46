//! Scrolling marquee
//!
//! A [`TickerState`] owns a bounded queue of borrowed strings and a column
//! window on one text row. Each call to [`Display::ticker_tick`] redraws the
//! window with the queued text one pixel further left. Characters that
//! scroll past the left edge are clipped with the session skip counter, and
//! the right edge is enforced by narrowing the display width while drawing.
//!
//! ```text
//!   bgn_col                end_col
//!      |<------ window ------->|
//!      |  ...ELLO WORLD  NEXT  |  <- text enters at end_col + 1
//!      +-----------------------+
//! ```
//!
//! The ticker never allocates: the queue is a `heapless::Deque` and a full
//! queue is reported to the caller.

use heapless::Deque;
use oledtext_hal::Transport;

use crate::display::{Display, Magnification};
use crate::font::Font;

/// Default queue capacity
pub const TICKER_QUEUE_DIM: usize = 6;

/// State of one marquee, owned by the caller
pub struct TickerState<'f, 's, const N: usize = TICKER_QUEUE_DIM> {
    font: Option<Font<'f>>,
    row: u8,
    mag: Magnification,
    bgn_col: u8,
    end_col: u8,
    queue: Deque<&'s [u8], N>,
    /// Column the front string is drawn at
    col: u8,
    /// Pixels of the lead character already scrolled off
    skip: u8,
    /// Window must be cleared before the next frame
    init: bool,
}

impl<'f, 's, const N: usize> TickerState<'f, 's, N> {
    /// An idle ticker with no font; ticks return -1 until initialised
    pub const fn new() -> Self {
        Self {
            font: None,
            row: 0,
            mag: Magnification::X1,
            bgn_col: 0,
            end_col: 0,
            queue: Deque::new(),
            col: 0,
            skip: 0,
            init: false,
        }
    }

    /// Queue a string, or pass `None` to drop everything queued
    ///
    /// Returns false when the queue is full.
    pub fn text(&mut self, text: Option<&'s str>) -> bool {
        let Some(text) = text else {
            self.queue.clear();
            return true;
        };
        if self.queue.is_empty() {
            self.init = true;
        }
        if self.queue.push_back(text.as_bytes()).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("ticker queue full ({} strings)", N);
            return false;
        }
        true
    }

    /// Strings still queued
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// True once everything queued has scrolled off
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Font the ticker draws with
    pub fn font(&self) -> Option<Font<'f>> {
        self.font
    }

    /// Text row in pages
    pub fn row(&self) -> u8 {
        self.row
    }

    /// First column of the window
    pub fn bgn_col(&self) -> u8 {
        self.bgn_col
    }

    /// Last column of the window, after clamping
    pub fn end_col(&self) -> u8 {
        self.end_col
    }

    /// Column the front string will be drawn at next tick
    pub fn col(&self) -> u8 {
        self.col
    }
}

impl<const N: usize> Default for TickerState<'_, '_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'f, T: Transport> Display<'f, T> {
    /// Configure a ticker and empty its queue
    ///
    /// `end_col` is clamped to the last visible column.
    pub fn ticker_init<const N: usize>(
        &self,
        state: &mut TickerState<'f, '_, N>,
        font: Option<Font<'f>>,
        row: u8,
        mag: Magnification,
        bgn_col: u8,
        end_col: u8,
    ) {
        state.font = font;
        state.row = row;
        state.mag = mag;
        state.bgn_col = bgn_col;
        state.end_col = end_col.min(self.display_width().saturating_sub(1));
        state.queue.clear();
    }

    /// Redraw the window and scroll one pixel
    ///
    /// Returns -1 if the ticker has no font, 0 once the queue has drained,
    /// otherwise the number of strings still queued. Selects the ticker's
    /// font and magnification on the session.
    pub fn ticker_tick<const N: usize>(&mut self, state: &mut TickerState<'f, '_, N>) -> i8 {
        let Some(font) = state.font else {
            return -1;
        };
        if state.queue.is_empty() {
            return 0;
        }
        self.set_font(Some(font));
        self.set_magnification(state.mag);

        let last_row = state.row.saturating_add(self.font_rows().saturating_sub(1));
        if state.init {
            #[cfg(feature = "defmt")]
            defmt::trace!("ticker start: cols {}..={}", state.bgn_col, state.end_col);
            self.clear_region(state.bgn_col, state.end_col, state.row, last_row);
            // Start just outside the window so the first frame is blank
            state.col = state.end_col.saturating_add(1);
            state.skip = 0;
            state.init = false;
        }

        let end_col = state.end_col;
        self.with_width(end_col.saturating_add(1), |d| {
            d.skip_columns(state.skip);
            d.place(state.col, state.row);
            'queue: for text in state.queue.iter() {
                for &ch in text.iter() {
                    if d.col() > end_col {
                        break 'queue;
                    }
                    d.write(ch);
                }
            }
            if d.col() <= end_col {
                d.clear_region(d.col(), end_col, state.row, last_row);
            }
        });

        if state.queue.len() == 1 && state.queue.front().is_some_and(|s| s.is_empty()) {
            state.queue.clear();
            return 0;
        }

        if state.col > state.bgn_col {
            state.col -= 1;
        } else {
            state.skip = state.skip.saturating_add(1);
            let lead = state.queue.front().and_then(|s| s.first().copied());
            let scrolled_off = match lead {
                Some(ch) => state.skip >= self.ticker_advance(ch),
                None => true,
            };
            if scrolled_off {
                state.skip = 0;
                if let Some(front) = state.queue.front_mut() {
                    let s = *front;
                    *front = s.get(1..).unwrap_or_default();
                }
                if state.queue.len() > 1 && state.queue.front().is_some_and(|s| s.is_empty()) {
                    state.queue.pop_front();
                }
            }
        }

        i8::try_from(state.queue.len()).unwrap_or(i8::MAX)
    }

    /// Pixels `ch` occupies in the ticker, including a blank space cell
    fn ticker_advance(&self, ch: u8) -> u8 {
        let blank_space = ch == b' '
            && self.options().nonfont_space
            && self.font().is_some_and(|f| f.glyph_index(ch).is_none());
        if blank_space {
            self.font_width().saturating_add(self.letter_spacing())
        } else {
            self.char_spacing(ch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::tests::session;
    use crate::font::system5x7::SYSTEM5X7;

    fn system() -> Font<'static> {
        Font::program(&SYSTEM5X7)
    }

    fn window(d: &oledtext_hal::mock::MockController, c0: usize, c1: usize) -> &[u8] {
        &d.page(0)[c0..=c1]
    }

    #[test]
    fn test_tick_without_font() {
        let mut d = session();
        let mut t: TickerState = TickerState::new();
        assert!(t.text(Some("HI")));
        assert_eq!(d.ticker_tick(&mut t), -1);
    }

    #[test]
    fn test_empty_queue_returns_zero() {
        let mut d = session();
        let mut t: TickerState = TickerState::new();
        d.ticker_init(&mut t, Some(system()), 0, Magnification::X1, 0, 19);
        assert_eq!(d.ticker_tick(&mut t), 0);
        assert!(d.transport().data().is_empty());
    }

    #[test]
    fn test_init_clamps_end_col() {
        let d = session();
        let mut t: TickerState = TickerState::new();
        d.ticker_init(&mut t, Some(system()), 2, Magnification::X1, 10, 250);
        assert_eq!(t.end_col(), 127);
        assert_eq!((t.bgn_col(), t.row()), (10, 2));
    }

    #[test]
    fn test_queue_full_and_reset() {
        let mut t: TickerState<'_, '_, 2> = TickerState::new();
        assert!(t.text(Some("a")));
        assert!(t.text(Some("b")));
        assert!(!t.text(Some("c")));
        assert_eq!(t.queue_len(), 2);
        assert!(t.text(None));
        assert!(t.is_idle());
    }

    #[test]
    fn test_single_string_scrolls_through_and_stops() {
        let mut d = session();
        d.transport_mut().fill(0xAA);
        let mut t: TickerState = TickerState::new();
        d.ticker_init(&mut t, Some(system()), 0, Magnification::X1, 0, 19);
        assert!(t.text(Some("HI")));

        // First frame only clears the window
        assert_eq!(d.ticker_tick(&mut t), 1);
        assert!(window(d.transport(), 0, 19).iter().all(|&b| b == 0));
        assert_eq!(d.transport().ram(0, 20), 0xAA);
        assert_eq!(t.col(), 19);

        // Leading column of 'H' appears at the right edge
        assert_eq!(d.ticker_tick(&mut t), 1);
        assert_eq!(d.transport().ram(0, 19), 0x7F);
        assert_eq!(d.transport().ram(0, 20), 0xAA);

        let mut ticks = 2;
        loop {
            let r = d.ticker_tick(&mut t);
            ticks += 1;
            if r == 0 {
                break;
            }
            assert_eq!(r, 1);
            assert!(ticks < 100);
        }
        // 20 ticks to reach column 0, 12 to scroll "HI" off, one to finish
        assert_eq!(ticks, 33);
        assert!(t.is_idle());
        assert!(window(d.transport(), 0, 19).iter().all(|&b| b == 0));
        assert_eq!(d.transport().ram(0, 20), 0xAA);
        assert_eq!(d.ticker_tick(&mut t), 0);
    }

    #[test]
    fn test_window_position_mid_scroll() {
        let mut d = session();
        let mut t: TickerState = TickerState::new();
        d.ticker_init(&mut t, Some(system()), 1, Magnification::X1, 4, 30);
        t.text(Some("A"));
        // blank frame, then one column per tick from column 30
        for _ in 0..11 {
            d.ticker_tick(&mut t);
        }
        assert_eq!(t.col(), 20);
        assert_eq!(&d.transport().page(1)[21..27], &[0x7E, 0x11, 0x11, 0x11, 0x7E, 0]);
        assert_eq!(d.transport().ram(1, 27), 0);
    }

    #[test]
    fn test_front_string_dequeued_after_scroll_off() {
        let mut d = session();
        let mut t: TickerState = TickerState::new();
        d.ticker_init(&mut t, Some(system()), 0, Magnification::X1, 0, 5);
        t.text(Some("A"));
        t.text(Some("B"));

        for _ in 0..11 {
            assert_eq!(d.ticker_tick(&mut t), 2);
        }
        assert_eq!(d.ticker_tick(&mut t), 1);
        // Last column of 'A' clipped away, 'B' follows its spacing column
        assert_eq!(d.transport().ram(0, 0), 0);
        assert_eq!(&d.transport().page(0)[1..6], &[0x7F, 0x49, 0x49, 0x49, 0x36]);
        assert_eq!(t.queue_len(), 1);
    }

    #[test]
    fn test_tick_selects_magnification() {
        let mut d = session();
        let mut t: TickerState = TickerState::new();
        d.ticker_init(&mut t, Some(system()), 2, Magnification::X2, 0, 40);
        t.text(Some("-"));
        d.ticker_tick(&mut t);
        assert_eq!(d.magnification(), Magnification::X2);
        assert_eq!(d.font_rows(), 2);
        d.ticker_tick(&mut t);
        d.ticker_tick(&mut t);
        // two magnified columns visible on both pages
        for page in [2, 3] {
            assert_eq!(&d.transport().page(page)[39..41], &[0x08, 0x08]);
        }
    }

    #[test]
    fn test_advance_for_synthetic_space() {
        static NO_SPACE: [u8; 12] = [0, 0, 3, 8, b'A', 2, 1, 2, 3, 4, 5, 6];
        let mut d = session();
        d.set_font(Some(Font::ram(&NO_SPACE)));
        assert_eq!(d.ticker_advance(b' '), 4);
        assert_eq!(d.ticker_advance(b'A'), 4);
        assert_eq!(d.ticker_advance(b'z'), 1);
    }
}
