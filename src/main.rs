//! Bouncy Arena entry point
//!
//! On the web the library's `start` hook does the setup and JavaScript drives
//! `WebArena`. Natively this runs a headless demo of either preset.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use bouncy_arena::sim::GameEvent;
    use bouncy_arena::{ArenaConfig, FrameLoop, InputEvent};

    const WIDTH: f32 = 1100.0;
    const HEIGHT: f32 = 600.0;
    const FRAME_MS: f64 = 16.0;

    pub fn run(preset: &str, seed: u64) -> Result<(), bouncy_arena::ConfigError> {
        let config = ArenaConfig::preset(preset, WIDTH, HEIGHT)?;
        let shooter = config.game.is_some();
        let mut host = FrameLoop::new(config, seed)?;

        if shooter {
            shoot_until_reset(&mut host);
        } else {
            drop_and_throw(&mut host);
        }

        host.stop();
        Ok(())
    }

    /// Click the first live card every 45 frames until the arena resets
    fn shoot_until_reset(host: &mut FrameLoop) {
        let mut now = 0.0;
        let mut shots = 0;

        for frame in 0..5000u32 {
            now += FRAME_MS;
            if frame % 45 == 44 {
                let target = host.arena().bodies.iter().find(|b| b.alive).map(|b| b.pos);
                if let Some(target) = target {
                    host.dispatch(InputEvent::Click {
                        x: target.x,
                        y: target.y,
                    });
                    shots += 1;
                }
            }
            host.frame(now);

            let events = host.drain_events();
            for event in &events {
                log::info!("frame {}: {:?}", frame, event);
            }
            if events.contains(&GameEvent::ArenaReset) {
                println!("Cleared the arena with {} shots in {} frames", shots, frame + 1);
                return;
            }
        }
        println!("Gave up after {} shots", shots);
    }

    /// Let the buttons land, then fling one to the right
    fn drop_and_throw(host: &mut FrameLoop) {
        let mut now = 0.0;
        let mut step = |host: &mut FrameLoop, frames: u32| {
            for _ in 0..frames {
                now += FRAME_MS;
                host.frame(now);
            }
            now
        };

        let t = step(host, 300);
        report(host, "after drop");

        let start = host.arena().bodies[0].pos;
        host.dispatch(InputEvent::PointerDown {
            body: Some(0),
            x: start.x,
            y: start.y,
            time_ms: t,
        });
        for i in 1..=4 {
            host.dispatch(InputEvent::PointerMove {
                x: start.x + 40.0 * i as f32,
                y: start.y - 30.0 * i as f32,
                time_ms: t + 8.0 * i as f64,
            });
        }
        host.dispatch(InputEvent::PointerUp);

        step(host, 400);
        report(host, "after throw");

        for event in host.drain_events() {
            log::info!("{:?}", event);
        }
    }

    fn report(host: &FrameLoop, label: &str) {
        for body in &host.arena().bodies {
            println!(
                "{label}: body {} at ({:.1}, {:.1}) vel ({:.2}, {:.2}) rot {:.0}",
                body.id, body.pos.x, body.pos.y, body.vel.x, body.vel.y, body.rotation
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let preset = args.next().unwrap_or_else(|| "cards".to_string());
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random::<u64>);
    log::info!("Bouncy Arena (native) demo: preset={} seed={}", preset, seed);

    if let Err(e) = demo::run(&preset, seed) {
        eprintln!("error: {e}");
        std::process::exit(2);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `bouncy_arena::web::start`, this is just to satisfy the compiler
}
