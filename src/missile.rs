use std::time::{Duration, Instant};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

/// Full animation window. Deliberately shorter than the go-live latency; the
/// sequencer schedules the two as separate timers.
pub const DURATION: Duration = Duration::from_millis(4000);

const LAUNCH_END: Duration = Duration::from_millis(1300);
const EXPLOSION_END: Duration = Duration::from_millis(2500);

/// Stages of the fixed timeline: rocket climb, main explosion, falling
/// bombs with secondary bursts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Launch,
    Explosion,
    Fallout,
    Done,
}

impl Phase {
    pub fn at(elapsed: Duration) -> Self {
        if elapsed < LAUNCH_END {
            Phase::Launch
        } else if elapsed < EXPLOSION_END {
            Phase::Explosion
        } else if elapsed < DURATION {
            Phase::Fallout
        } else {
            Phase::Done
        }
    }
}

/// Presentation-only state for one run of the rocket sequence. Carries
/// nothing but its start time; completion is signalled by the sequencer's
/// animation timer, not by this struct.
#[derive(Debug, Clone)]
pub struct MissileAnimation {
    started: Instant,
}

impl MissileAnimation {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn phase(&self) -> Phase {
        Phase::at(self.elapsed())
    }
}

/// Draws the current animation frame over the chat. Everything is derived
/// from elapsed time so the render tick only controls smoothness.
pub struct MissileWidget<'a> {
    animation: &'a MissileAnimation,
}

impl<'a> MissileWidget<'a> {
    pub fn new(animation: &'a MissileAnimation) -> Self {
        Self { animation }
    }
}

fn put(buf: &mut Buffer, area: Rect, x: i32, y: i32, symbol: &str, style: Style) {
    if x >= area.left() as i32
        && x < area.right() as i32
        && y >= area.top() as i32
        && y < area.bottom() as i32
    {
        buf.set_string(x as u16, y as u16, symbol, style);
    }
}

impl Widget for MissileWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 12 || area.height < 8 {
            return;
        }

        let elapsed = self.animation.elapsed();
        let ms = elapsed.as_millis() as u64;
        let cx = (area.left() + area.width / 2) as i32;
        let top = area.top() as i32;
        let bottom = area.bottom() as i32;
        let apex = top + 3;

        let flame = Style::default().fg(Color::LightRed);
        let smoke = Style::default().fg(Color::DarkGray);
        let hull = Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD);
        let blast = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let ring = Style::default().fg(Color::LightYellow);
        let outer = Style::default().fg(Color::Red);

        match Phase::at(elapsed) {
            Phase::Launch => {
                let progress = (ms as f64 / LAUNCH_END.as_millis() as f64).min(1.0);
                let travel = (bottom - 2 - apex) as f64;
                let row = bottom - 2 - (progress * travel).round() as i32;

                put(buf, area, cx, row - 1, "▲", flame);
                put(buf, area, cx, row, "█", hull);
                put(buf, area, cx, row + 1, "█", hull);
                // Flicker by frame parity
                let tail = if (ms / 100) % 2 == 0 { "▼" } else { "▿" };
                put(buf, area, cx, row + 2, tail, flame);

                let mut y = row + 4;
                while y < bottom - 1 {
                    put(buf, area, cx, y, "·", smoke);
                    y += 2;
                }
            }
            Phase::Explosion => {
                let t = (ms - LAUNCH_END.as_millis() as u64) as f64
                    / (EXPLOSION_END - LAUNCH_END).as_millis() as f64;
                let cy = apex as f64;

                put(buf, area, cx, apex, "✸", blast);

                let radius = 1.0 + t * 7.0;
                for step in 0..16 {
                    let angle = std::f64::consts::TAU * step as f64 / 16.0;
                    // Cells are about twice as tall as wide
                    let x = cx as f64 + radius * 2.0 * angle.cos();
                    let y = cy + radius * angle.sin();
                    put(buf, area, x.round() as i32, y.round() as i32, "*", ring);
                }
                if t > 0.3 {
                    let r2 = radius * 1.5;
                    for step in 0..12 {
                        let angle = std::f64::consts::TAU * step as f64 / 12.0;
                        let x = cx as f64 + r2 * 2.0 * angle.cos();
                        let y = cy + r2 * angle.sin();
                        put(buf, area, x.round() as i32, y.round() as i32, "o", outer);
                    }
                }
            }
            Phase::Fallout => {
                let t = (ms - EXPLOSION_END.as_millis() as u64) as f64
                    / (DURATION - EXPLOSION_END).as_millis() as f64;

                // Four bombs dropping on slightly staggered clocks
                for (i, dx) in [-10i32, -4, 4, 10].into_iter().enumerate() {
                    let local = (t * 1.4 - i as f64 * 0.1).clamp(0.0, 1.0);
                    let y = apex as f64 + local * (bottom - 2 - apex) as f64;
                    put(buf, area, cx + dx, y.round() as i32, "●", smoke);
                }

                // Ground bursts light up one after another
                let bursts = [
                    (0.30, 0.70, 0.0),
                    (0.45, 0.75, 0.15),
                    (0.60, 0.80, 0.30),
                    (0.70, 0.85, 0.45),
                ];
                for (fx, fy, start) in bursts {
                    if t >= start && t < start + 0.35 {
                        let x = area.left() as f64 + fx * area.width as f64;
                        let y = area.top() as f64 + fy * area.height as f64;
                        put(buf, area, x.round() as i32, y.round() as i32, "✶", ring);
                    }
                }
            }
            Phase::Done => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_follow_the_fixed_timeline() {
        assert_eq!(Phase::at(Duration::from_millis(0)), Phase::Launch);
        assert_eq!(Phase::at(Duration::from_millis(1299)), Phase::Launch);
        assert_eq!(Phase::at(Duration::from_millis(1300)), Phase::Explosion);
        assert_eq!(Phase::at(Duration::from_millis(2499)), Phase::Explosion);
        assert_eq!(Phase::at(Duration::from_millis(2500)), Phase::Fallout);
        assert_eq!(Phase::at(Duration::from_millis(3999)), Phase::Fallout);
        assert_eq!(Phase::at(Duration::from_millis(4000)), Phase::Done);
    }

    #[test]
    fn window_is_four_seconds() {
        assert_eq!(DURATION, Duration::from_millis(4000));
    }

    #[test]
    fn a_fresh_animation_starts_in_launch() {
        let animation = MissileAnimation::start();
        assert_eq!(animation.phase(), Phase::Launch);
    }

    #[test]
    fn widget_renders_without_panicking_across_the_timeline() {
        // Drive the drawing math over a synthetic buffer at each phase.
        let area = Rect::new(0, 0, 60, 20);
        for offset_ms in [0, 700, 1300, 2000, 2500, 3200, 3990, 4100] {
            let animation = MissileAnimation {
                started: Instant::now() - Duration::from_millis(offset_ms),
            };
            let mut buf = Buffer::empty(area);
            MissileWidget::new(&animation).render(area, &mut buf);
        }

        // Tiny areas are skipped, not drawn out of bounds.
        let animation = MissileAnimation::start();
        let tiny = Rect::new(0, 0, 4, 3);
        let mut tiny_buf = Buffer::empty(tiny);
        MissileWidget::new(&animation).render(tiny, &mut tiny_buf);
    }
}
