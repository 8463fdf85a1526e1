//! Interactive host: winit event loop feeding the stage and presenting
//! frames through wgpu.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use scheduler::PeriodicTrigger;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::assets::AssetProvider;
use crate::frame::FrameLoop;
use crate::gpu::WindowPresenter;
use crate::runtime::{time_source_for_policy, FrameScheduler, RenderPolicy};
use crate::stage::Stage;
use crate::types::RendererConfig;

/// Presenter and window kept together so the surface drops first.
struct WindowState {
    presenter: WindowPresenter,
    window: Arc<Window>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Exit,
    Advance,
    TogglePlayback,
}

fn key_action(event: &KeyEvent) -> Option<KeyAction> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    match &event.logical_key {
        Key::Named(NamedKey::Escape) => Some(KeyAction::Exit),
        Key::Named(NamedKey::Space) => Some(KeyAction::Advance),
        Key::Character(value) if value.as_str() == " " => Some(KeyAction::Advance),
        Key::Character(value) if value.eq_ignore_ascii_case("p") => {
            Some(KeyAction::TogglePlayback)
        }
        _ => None,
    }
}

/// Maps a cursor position to [0, 1] x [0, 1]; `None` for an empty window.
fn normalize_cursor(position: PhysicalPosition<f64>, size: PhysicalSize<u32>) -> Option<(f32, f32)> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    Some((
        (position.x / size.width as f64) as f32,
        (position.y / size.height as f64) as f32,
    ))
}

/// Transitions only start while the loop plays; a paused stage never
/// advances its timeline, so schedules would otherwise pile up.
fn fire_due_trigger(
    frame_loop: &FrameLoop,
    trigger: &mut PeriodicTrigger,
    stage: &mut Stage,
    now: Duration,
) {
    if frame_loop.is_playing() && trigger.poll(now) {
        if let Some(started) = stage.trigger(now) {
            tracing::debug!(index = started.index, "periodic transition");
        }
    }
}

pub fn run(config: &RendererConfig, assets: &dyn AssetProvider) -> Result<()> {
    let RenderPolicy::Animate { target_fps } = config.policy else {
        bail!("window host requires an animate render policy");
    };

    let mut stage = Stage::new(config, assets).context("failed to build stage")?;

    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(config.surface_size.0, config.surface_size.1))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);
    let presenter = WindowPresenter::new(window.as_ref())
        .context("failed to initialise window presenter")?;

    let initial = window.inner_size();
    if stage.resize(initial.width, initial.height).is_err() {
        tracing::warn!("window reported an empty initial size");
    }

    let mut state = WindowState { presenter, window };
    let mut clock = time_source_for_policy(&config.policy);
    let mut pacing = FrameScheduler::new(&config.policy);
    let interval = config.trigger_interval;
    let mut trigger = PeriodicTrigger::new(interval, clock.peek());
    let mut frame_loop = FrameLoop::new();

    tracing::info!(
        fps = ?target_fps,
        interval = ?config.trigger_interval,
        "window running (space: next image, p: pause, esc: quit)"
    );
    state.window.request_redraw();

    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window.id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                elwt.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => match key_action(&event) {
                Some(KeyAction::Exit) => elwt.exit(),
                Some(KeyAction::Advance) if frame_loop.is_playing() => {
                    let now = clock.peek();
                    if let Some(started) = stage.trigger(now) {
                        tracing::debug!(index = started.index, "manual transition");
                    }
                }
                Some(KeyAction::TogglePlayback) => {
                    if frame_loop.toggle() {
                        // the periodic cadence restarts from the moment of resume
                        trigger = PeriodicTrigger::new(interval, clock.peek());
                        pacing.reset();
                        state.window.request_redraw();
                    }
                }
                Some(KeyAction::Advance) | None => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                if let Some((x, y)) = normalize_cursor(position, state.window.inner_size()) {
                    stage.set_pointer(x, y);
                }
            }
            WindowEvent::Resized(new_size) => {
                state.presenter.resize(new_size);
                let _ = stage.resize(new_size.width, new_size.height);
            }
            WindowEvent::RedrawRequested => {
                let sample = clock.sample();
                fire_due_trigger(&frame_loop, &mut trigger, &mut stage, sample.elapsed);
                match frame_loop.tick(&mut stage, sample.elapsed, &mut state.presenter) {
                    Ok(_) => pacing.mark_rendered(Instant::now()),
                    Err(err) => match err.downcast_ref::<wgpu::SurfaceError>() {
                        Some(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let size = state.presenter.size();
                            state.presenter.resize(size);
                        }
                        Some(wgpu::SurfaceError::OutOfMemory) => {
                            tracing::error!("surface out of memory; exiting");
                            elwt.exit();
                        }
                        Some(other) => {
                            tracing::warn!(error = ?other, "surface error; retrying next frame");
                        }
                        None => {
                            tracing::error!(error = %err, "failed to present frame");
                            elwt.exit();
                        }
                    },
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            if !frame_loop.is_playing() {
                elwt.set_control_flow(ControlFlow::Wait);
                return;
            }
            fire_due_trigger(&frame_loop, &mut trigger, &mut stage, clock.peek());

            let now = Instant::now();
            let trigger_deadline =
                now + trigger.next_due().saturating_sub(clock.peek());
            if pacing.ready_for_frame(now) {
                tracing::trace!("scheduler: issuing redraw now");
                state.window.request_redraw();
                elwt.set_control_flow(ControlFlow::Wait);
            } else {
                let deadline = pacing
                    .next_deadline()
                    .map_or(trigger_deadline, |frame| frame.min(trigger_deadline));
                tracing::trace!(
                    deadline_ms = deadline.saturating_duration_since(now).as_millis(),
                    "scheduler: waiting"
                );
                elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_positions_are_normalised() {
        let size = PhysicalSize::new(800, 400);
        assert_eq!(
            normalize_cursor(PhysicalPosition::new(400.0, 100.0), size),
            Some((0.5, 0.25))
        );
        assert_eq!(
            normalize_cursor(PhysicalPosition::new(1.0, 1.0), PhysicalSize::new(0, 10)),
            None
        );
    }

    #[test]
    fn periodic_trigger_advances_stage() {
        let config = RendererConfig {
            surface_size: (16, 9),
            render_scale: 1.0,
            ..RendererConfig::default()
        };
        let mut stage = Stage::new(&config, &crate::assets::demo_assets(4, 8, 8)).unwrap();
        let frame_loop = FrameLoop::new();
        let mut trigger = PeriodicTrigger::new(Duration::from_secs(5), Duration::ZERO);
        fire_due_trigger(&frame_loop, &mut trigger, &mut stage, Duration::from_secs(4));
        assert_eq!(stage.current_index(), 0);
        fire_due_trigger(&frame_loop, &mut trigger, &mut stage, Duration::from_secs(5));
        assert_eq!(stage.current_index(), 1);
    }

    #[test]
    fn paused_loop_starts_no_transitions() {
        let config = RendererConfig {
            surface_size: (16, 9),
            render_scale: 1.0,
            ..RendererConfig::default()
        };
        let mut stage = Stage::new(&config, &crate::assets::demo_assets(4, 8, 8)).unwrap();
        let mut frame_loop = FrameLoop::new();
        frame_loop.stop();
        let mut trigger = PeriodicTrigger::new(Duration::from_secs(5), Duration::ZERO);
        for second in [5, 10, 15, 20] {
            fire_due_trigger(&frame_loop, &mut trigger, &mut stage, Duration::from_secs(second));
        }
        assert_eq!(stage.current_index(), 0);
        assert_eq!(stage.timeline_state(), scheduler::TimelineState::Idle);

        frame_loop.play();
        fire_due_trigger(&frame_loop, &mut trigger, &mut stage, Duration::from_secs(21));
        assert_eq!(stage.current_index(), 1);
    }
}
