use std::thread;
use std::time::{Duration, Instant};

use sonar::prelude::*;

const FRAME: Duration = Duration::from_millis(16);
const RUN_FOR: Duration = Duration::from_secs(5);

fn main() {
    env_logger::init();

    // Faster stagger than the defaults so every ring shows up within the run
    let color = "#1e90ff".parse::<Color>().unwrap_or(Color::BLUE);
    let mut pulse = pulse_animation(
        PulseConfig::props()
            .color(color)
            .diameter(240.0)
            .duration(600.0)
            .speed(900.0)
            .num_pulses(4),
    );
    pulse.start();

    let window = Size::new(320.0, 320.0);
    let started = Instant::now();
    let mut last_frame = started;
    let mut last_report = started;

    while started.elapsed() < RUN_FOR {
        let now = Instant::now();
        advance_animations(now - last_frame);
        last_frame = now;

        if take_frame_request() && now - last_report >= Duration::from_millis(250) {
            last_report = now;
            let frames = layout_view(&pulse.render(), Constraints::tight(window));
            for (ring, frame) in pulse.pulses().iter().zip(&frames.children) {
                log::info!(
                    "t={:>5}ms {} d={:>6.1} opacity={:.2} at ({:.1}, {:.1})",
                    started.elapsed().as_millis(),
                    ring.view_key(),
                    ring.diameter.get_untracked(),
                    ring.opacity.get_untracked(),
                    frame.rect.x,
                    frame.rect.y,
                );
            }
        }

        thread::sleep(FRAME);
    }

    // Grow the rings mid-flight: timelines restart, cells are kept
    let changes = pulse.on_config_change(
        PulseConfig::props()
            .color(color)
            .diameter(300.0)
            .duration(600.0)
            .speed(900.0)
            .num_pulses(4),
    );
    log::info!("config change: {:?}", changes);

    pulse.stop();
}
