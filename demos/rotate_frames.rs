//! Drive a rotating-border circle image from a calloop timer and write a few
//! frames to PNG files.
//!
//! Usage: `cargo run --example rotate_frames -- [image] [out_dir]`

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopSignal};
use circle_image::prelude::*;

const SIZE: u32 = 256;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const SNAPSHOT_EVERY: u32 = 30;
const SNAPSHOTS: u32 = 8;

/// Redraw requests are coalesced into a single flag checked once per tick.
#[derive(Default)]
struct RedrawFlag(Cell<bool>);

impl Host for RedrawFlag {
    fn request_redraw(&self) {
        self.0.set(true);
    }
}

struct Demo {
    view: CircleImageView<Rc<RedrawFlag>>,
    redraw: Rc<RedrawFlag>,
    canvas: PixmapCanvas,
    out_dir: PathBuf,
    frame: u32,
    saved: u32,
    signal: LoopSignal,
}

impl Demo {
    fn tick(&mut self, now: Instant) {
        self.view.on_frame(now);
        if self.redraw.0.replace(false) {
            self.canvas.clear(Color::TRANSPARENT);
            self.view.draw(&mut self.canvas);
        }

        self.frame += 1;
        if self.frame % SNAPSHOT_EVERY != 0 {
            return;
        }

        let path = self.out_dir.join(format!("frame_{:03}.png", self.frame));
        match self.canvas.save_png(&path) {
            Ok(()) => {
                let state = self.view.renderer().animation_state();
                log::info!(
                    "wrote {} (rotation {:.1}, solid {:.1}, dotted {:.1})",
                    path.display(),
                    state.rotation,
                    state.solid_sweep,
                    state.dotted_sweep
                );
                self.saved += 1;
            }
            Err(e) => {
                log::error!("failed to write {}: {}", path.display(), e);
                self.signal.stop();
            }
        }
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let source = args
        .next()
        .map(ImageSource::from)
        .unwrap_or(ImageSource::Color(Color::from_hex(0x2E3440)));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "frames".to_string()));
    std::fs::create_dir_all(&out_dir)?;

    let mut event_loop: EventLoop<Demo> = EventLoop::try_new()?;

    let redraw = Rc::new(RedrawFlag::default());
    let config = CircleImageConfig::new()
        .border_width(12)
        .border_padding(4)
        .border_style(BorderStyle::Rotate);
    let mut view = CircleImageView::with_config(redraw.clone(), config);
    view.on_size_changed(SIZE, SIZE);
    view.update(|renderer| renderer.set_image(source));

    let mut demo = Demo {
        view,
        redraw,
        canvas: PixmapCanvas::new(SIZE, SIZE)?,
        out_dir,
        frame: 0,
        saved: 0,
        signal: event_loop.get_signal(),
    };

    event_loop
        .handle()
        .insert_source(Timer::from_duration(FRAME_INTERVAL), |_, _, demo| {
            demo.tick(Instant::now());
            if demo.saved >= SNAPSHOTS {
                demo.signal.stop();
                return TimeoutAction::Drop;
            }
            TimeoutAction::ToDuration(FRAME_INTERVAL)
        })
        .map_err(|e| e.error)?;

    event_loop.run(None, &mut demo, |_| {})?;
    log::info!("wrote {} frames to {}", demo.saved, demo.out_dir.display());
    Ok(())
}
